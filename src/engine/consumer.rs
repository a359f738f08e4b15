// Consumer - 並列ワーカー機能

use super::job::JobState;
use crate::{
    compositor::CompositorBackend,
    core::{OutputFormat, Outcome, ProgressReporter, WorkItem},
    services::processing::process_single_item,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// ワーカーIDごとの実行中アイテム
///
/// 猶予期間切れで強制終了したワーカーのアイテムを特定するために使う。
pub type InFlightItems = Arc<Mutex<HashMap<usize, WorkItem>>>;

/// 全ワーカーで共有する依存関係
pub struct WorkerContext<B: ?Sized, R: ?Sized> {
    pub compositor: Arc<B>,
    pub reporter: Arc<R>,
    pub format: OutputFormat,
    pub state: JobState,
    pub in_flight: InFlightItems,
}

impl<B: ?Sized, R: ?Sized> Clone for WorkerContext<B, R> {
    fn clone(&self) -> Self {
        Self {
            compositor: Arc::clone(&self.compositor),
            reporter: Arc::clone(&self.reporter),
            format: self.format,
            state: self.state.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<B: ?Sized, R: ?Sized> WorkerContext<B, R> {
    fn mark_started(&self, worker_id: usize, item: &WorkItem) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(worker_id, item.clone());
    }

    // 進捗の加算、結果の記録、実行中リストからの削除の間にawaitを挟まない。
    // 強制終了されてもアイテムが二重に数えられることはない
    fn complete(&self, worker_id: usize, item: &WorkItem, outcome: Outcome) {
        self.state.progress.increment();
        self.state.aggregator.record(item, outcome);
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&worker_id);
    }
}

/// 単一Consumerワーカー
///
/// キューからアイテムを受け取るたびにキャンセルを確認し、キャンセル済みなら開始せずに終了する。
/// 実行中のアイテムは中断しない。
pub async fn run_single_consumer<B, R>(
    worker_id: usize,
    context: WorkerContext<B, R>,
    work_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<WorkItem>>>,
) where
    B: CompositorBackend + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let cancellation = &context.state.cancellation;

    loop {
        // 次の作業を取得
        let next = {
            let mut rx = work_rx.lock().await;
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => None,
                item = rx.recv() => item,
            }
        };

        let Some(item) = next else {
            break; // チャンネル終了またはキャンセル
        };

        if cancellation.is_cancelled() {
            tracing::debug!(worker_id, item = %item.id, "Cancelled before start; item not processed");
            break;
        }

        context.mark_started(worker_id, &item);
        let outcome =
            process_single_item(context.compositor.as_ref(), &item, context.format, worker_id)
                .await;

        let failure_reason = match &outcome {
            Outcome::Failure { reason, .. } => Some(reason.clone()),
            Outcome::Success => None,
        };
        context.complete(worker_id, &item, outcome);

        if let Some(reason) = failure_reason {
            context.reporter.report_error(&item.id, &reason).await;
        }
    }

    tracing::trace!(worker_id, "Worker exited");
}

/// Consumers: 並列ワーカープール
pub fn spawn_consumers<B, R>(
    context: WorkerContext<B, R>,
    work_rx: mpsc::Receiver<WorkItem>,
    worker_count: usize,
) -> JoinSet<()>
where
    B: CompositorBackend + ?Sized + 'static,
    R: ProgressReporter + ?Sized + 'static,
{
    let work_rx = Arc::new(tokio::sync::Mutex::new(work_rx));
    let mut workers = JoinSet::new();

    for worker_id in 0..worker_count {
        workers.spawn(run_single_consumer(
            worker_id,
            context.clone(),
            Arc::clone(&work_rx),
        ));
    }

    workers
}
