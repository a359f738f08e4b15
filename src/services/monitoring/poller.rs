// 進捗ポーラー - 一定間隔でスナップショットを読み、変化があればレポーターへ渡す

use super::ProgressTracker;
use crate::core::{ProgressReporter, ProgressState};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// 進捗ポーリングタスクを起動する
///
/// `processed == total` になるか、トラッカーが完了扱いになった時点で終了し、
/// 最後に読んだスナップショットを返す。
pub fn spawn_progress_poller<R>(
    tracker: Arc<ProgressTracker>,
    reporter: Arc<R>,
    interval: Duration,
) -> tokio::task::JoinHandle<ProgressState>
where
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_reported: Option<ProgressState> = None;

        loop {
            ticker.tick().await;

            // 完了フラグを先に読むことで、直後のスナップショットが最終値になる
            let finished = tracker.is_finished();
            let snapshot = tracker.snapshot();

            if last_reported != Some(snapshot) {
                reporter.report_progress(snapshot).await;
                last_reported = Some(snapshot);
            }

            if finished || (snapshot.total > 0 && snapshot.is_complete()) {
                return snapshot;
            }
        }
    })
}
