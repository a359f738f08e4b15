// 進捗カウンター - 全ワーカーで共有される (processed, total)

use crate::core::ProgressState;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;

/// ジョブ単位の進捗カウンター
///
/// `total` は列挙完了時に一度だけ設定され、以後変化しない。
/// `processed` はアイテム完了（成功・失敗とも）ごとに1ずつ増え、`total` を超えない。
#[derive(Debug, Default)]
pub struct ProgressTracker {
    processed: AtomicUsize,
    total: OnceLock<usize>,
    finished: AtomicBool,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 総数を設定する。2回目以降の呼び出しは無視され `false` を返す
    pub fn set_total(&self, total: usize) -> bool {
        let accepted = self.total.set(total).is_ok();
        if !accepted {
            tracing::warn!(total, "Progress total was already fixed; ignoring");
        }
        accepted
    }

    /// 完了数を1つ進め、更新後の値を返す
    pub fn increment(&self) -> usize {
        let total = self.total();
        match self
            .processed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |processed| {
                (processed < total).then_some(processed + 1)
            }) {
            Ok(previous) => previous + 1,
            Err(current) => {
                tracing::warn!(current, total, "Progress increment beyond total ignored");
                current
            }
        }
    }

    /// ある時点の (processed, total) を読む。ワーカーの処理を待たない
    pub fn snapshot(&self) -> ProgressState {
        ProgressState {
            processed: self.processed.load(Ordering::Acquire),
            total: self.total(),
        }
    }

    /// ジョブが完了（またはキャンセル後に停止）したことを記録する
    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    fn total(&self) -> usize {
        self.total.get().copied().unwrap_or(0)
    }
}
