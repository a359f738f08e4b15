// テスト用の合成バックエンド
// 実行中アイテムをゲートで止め、キャンセルのタイミングを決定的に検証する

use super::{CompositeReport, CompositorBackend};
use crate::core::{OutputFormat, ProcessingError, ProcessingResult, WorkItem};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Semaphore;

/// ゲートが開くまで合成を完了しないテストダブル
#[derive(Debug)]
pub struct GatedCompositor {
    gate: Semaphore,
    started: AtomicUsize,
    started_ids: Mutex<Vec<String>>,
    failing_ids: HashSet<String>,
}

impl GatedCompositor {
    /// ゲートが閉じた状態で作成
    pub fn closed() -> Self {
        Self {
            gate: Semaphore::new(0),
            started: AtomicUsize::new(0),
            started_ids: Mutex::new(Vec::new()),
            failing_ids: HashSet::new(),
        }
    }

    /// 最初からゲートが開いた状態で作成
    pub fn open() -> Self {
        let compositor = Self::closed();
        compositor.open_gate();
        compositor
    }

    /// 指定したIDのアイテムを失敗させる
    pub fn failing_on(mut self, ids: &[&str]) -> Self {
        self.failing_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn open_gate(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    pub fn started_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn started_ids(&self) -> Vec<String> {
        self.started_ids.lock().unwrap().clone()
    }

    /// 指定数のアイテムが開始されるまで待機
    pub async fn wait_until_started(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.started_count() < count {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("items did not start in time");
    }
}

#[async_trait]
impl CompositorBackend for GatedCompositor {
    async fn composite(
        &self,
        item: &WorkItem,
        _format: OutputFormat,
    ) -> ProcessingResult<CompositeReport> {
        self.started_ids.lock().unwrap().push(item.id.clone());
        self.started.fetch_add(1, Ordering::SeqCst);

        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ProcessingError::internal(anyhow::anyhow!("gate closed: {e}")))?;
        permit.forget();

        if self.failing_ids.contains(&item.id) {
            return Err(ProcessingError::io(
                &item.image_path,
                std::io::Error::other("injected failure"),
            ));
        }

        Ok(CompositeReport {
            dimensions: (1, 1),
            mask_applied: false,
            bytes_written: 0,
            processing_time_ms: 0,
        })
    }

    fn strategy_name(&self) -> &'static str {
        "Gated"
    }
}
