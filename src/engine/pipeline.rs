// Pipeline - Producer-Consumer パイプライン
// 配信、ワーカープール、二段階の停止処理をまとめる

use super::{
    consumer::{spawn_consumers, InFlightItems, WorkerContext},
    job::JobState,
    producer::spawn_producer,
};
use crate::{
    compositor::CompositorBackend,
    core::{
        FailureKind, JobId, JobResult, Outcome, OutputFormat, ProcessingConfig, ProgressReporter,
        WorkItem,
    },
};
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// 猶予期間切れで強制終了したアイテムに記録する理由
pub const INTERRUPTED_REASON: &str = "猶予期間内に完了しなかったため強制終了しました";

/// パイプライン実行時の設定値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub worker_count: usize,
    pub buffer_size: usize,
    pub grace_period: Duration,
}

impl PipelineSettings {
    pub fn from_config<C: ProcessingConfig + ?Sized>(config: &C) -> Self {
        Self {
            worker_count: config.max_concurrent_tasks(),
            buffer_size: config.channel_buffer_size(),
            grace_period: config.shutdown_grace_period(),
        }
    }
}

/// 責任が明確に分離されたパイプライン
pub struct ProcessingPipeline<B: ?Sized> {
    compositor: Arc<B>,
}

impl<B> ProcessingPipeline<B>
where
    B: CompositorBackend + ?Sized + 'static,
{
    /// 新しいパイプラインを作成
    pub fn new(compositor: Arc<B>) -> Self {
        Self { compositor }
    }

    /// 作業アイテムを処理し、ジョブ結果を返す
    ///
    /// 全アイテムの結果が揃うか、キャンセル後に実行中アイテムが終わった時点で戻る。
    /// キャンセルから猶予期間を過ぎても終わらないワーカーは強制終了し、
    /// そのアイテムは `Interrupted` として記録する。
    pub async fn execute<R>(
        &self,
        job_id: JobId,
        items: Vec<WorkItem>,
        format: OutputFormat,
        settings: PipelineSettings,
        state: &JobState,
        reporter: Arc<R>,
    ) -> JobResult
    where
        R: ProgressReporter + ?Sized + 'static,
    {
        let start_time = Instant::now();
        let total = items.len();

        // Producer-Consumerチャンネル構築
        let (work_tx, work_rx) = mpsc::channel::<WorkItem>(settings.buffer_size);
        let in_flight = InFlightItems::default();

        // Producer起動
        let producer_handle = spawn_producer(items, work_tx, state.cancellation.clone());

        // Consumer Pool起動
        let context = WorkerContext {
            compositor: Arc::clone(&self.compositor),
            reporter: Arc::clone(&reporter),
            format,
            state: state.clone(),
            in_flight: Arc::clone(&in_flight),
        };
        let mut workers = spawn_consumers(context, work_rx, settings.worker_count);

        let drained = tokio::select! {
            _ = join_workers(&mut workers) => true,
            _ = grace_period_expired(state, settings.grace_period) => false,
        };

        if !drained {
            tracing::warn!(
                job = %job_id,
                grace_period_ms = settings.grace_period.as_millis() as u64,
                "Grace period expired; terminating remaining workers"
            );
            workers.abort_all();
            join_workers(&mut workers).await;
        }

        match producer_handle.await {
            Ok(dispatched) => tracing::debug!(job = %job_id, dispatched, "Producer finished"),
            Err(e) => tracing::warn!(job = %job_id, error = %e, "Producer task failed"),
        }

        // 強制終了・異常終了したワーカーが抱えていたアイテム
        for item in take_in_flight(&in_flight) {
            state.progress.increment();
            state.aggregator.record(
                &item,
                Outcome::failure(FailureKind::Interrupted, INTERRUPTED_REASON),
            );
            reporter.report_error(&item.id, INTERRUPTED_REASON).await;
        }

        state.progress.mark_finished();

        state.aggregator.finalize(
            job_id,
            total,
            state.cancellation.is_cancelled(),
            start_time.elapsed(),
        )
    }
}

async fn join_workers(workers: &mut JoinSet<()>) {
    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                tracing::error!(error = %e, "Worker panicked");
            }
        }
    }
}

// キャンセルされてから猶予期間が経過するまで待つ
async fn grace_period_expired(state: &JobState, grace_period: Duration) {
    state.cancellation.cancelled().await;
    tokio::time::sleep(grace_period).await;
}

fn take_in_flight(in_flight: &InFlightItems) -> Vec<WorkItem> {
    let mut items: Vec<WorkItem> = in_flight
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .drain()
        .map(|(_, item)| item)
        .collect();
    items.sort_by_key(|item| item.index);
    items
}
