// Job - 1回のジョブ実行が所有する共有状態と、呼び出し側に返すハンドル

use crate::core::{JobId, JobResult, ProcessingError, ProcessingResult, ProgressState};
use crate::services::{CancellationController, ProgressTracker, ResultAggregator};
use std::sync::Arc;

/// ジョブ単位の共有状態
///
/// 全ワーカーが参照で共有する。モジュールレベルの状態は持たないため、複数ジョブを同時に実行できる。
#[derive(Debug, Clone, Default)]
pub struct JobState {
    pub progress: Arc<ProgressTracker>,
    pub aggregator: Arc<ResultAggregator>,
    pub cancellation: CancellationController,
}

impl JobState {
    pub fn new(cancellation: CancellationController) -> Self {
        Self {
            progress: Arc::new(ProgressTracker::new()),
            aggregator: Arc::new(ResultAggregator::new()),
            cancellation,
        }
    }
}

/// 投入済みジョブへのハンドル
///
/// `poll` と `cancel` はいつでも呼べる。`wait` / `result` はジョブの終了（完了またはキャンセル）まで待つ。
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    state: JobState,
    task: Option<tokio::task::JoinHandle<JobResult>>,
    finished: Option<JobResult>,
}

impl JobHandle {
    pub(crate) fn new(id: JobId, state: JobState, task: tokio::task::JoinHandle<JobResult>) -> Self {
        Self {
            id,
            state,
            task: Some(task),
            finished: None,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    /// 現在の進捗スナップショット。完了後は最終値を返し続ける
    pub fn poll(&self) -> ProgressState {
        self.state.progress.snapshot()
    }

    /// キャンセルを要求してすぐに戻る。停止処理はバックグラウンドで進む
    pub fn cancel(&self) {
        self.state.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancellation.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// 外部のポーラーと共有するための進捗トラッカー
    pub fn progress(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.state.progress)
    }

    /// 別タスク（シグナルハンドラーなど）からキャンセルするためのコントローラー
    pub fn cancellation(&self) -> CancellationController {
        self.state.cancellation.clone()
    }

    /// ジョブの終了を待つ。ハンドルは残るので、その後も `poll` で最終値を読める
    ///
    /// 途中でドロップしても結果は失われない。2回目以降は同じ結果を返す。
    pub async fn wait(&mut self) -> ProcessingResult<JobResult> {
        if let Some(task) = self.task.as_mut() {
            let joined = task.await;
            self.task = None;
            self.finished = Some(joined.map_err(ProcessingError::task)?);
        }

        self.finished.clone().ok_or_else(|| {
            ProcessingError::internal(anyhow::anyhow!("ジョブタスクが異常終了しました: {}", self.id))
        })
    }

    /// ジョブの終了を待ち、結果を受け取る
    pub async fn result(mut self) -> ProcessingResult<JobResult> {
        self.wait().await
    }
}
