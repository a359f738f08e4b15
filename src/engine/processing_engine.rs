// ProcessingEngine - 完全依存性注入によるジョブ実行エンジン
// 全ての依存関係がコンストラクタで注入される

use super::{
    job::{JobHandle, JobState},
    pipeline::{PipelineSettings, ProcessingPipeline},
};
use crate::{
    compositor::CompositorBackend,
    core::{JobConfig, JobId, ProcessingConfig, ProcessingError, ProcessingResult, ProgressReporter},
    file_scanner::FileScanner,
    services::{spawn_progress_poller, CancellationController},
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 完全依存性注入による合成ジョブエンジン
///
/// エンジン自体は状態をほとんど持たず、ジョブごとの進捗・キャンセル・結果は
/// `JobHandle` が所有する。同じエンジンから複数のジョブを同時に実行できる。
pub struct ProcessingEngine<B, C, R> {
    compositor: Arc<B>,
    config: Arc<C>,
    reporter: Arc<R>,
    last_job_id: AtomicU64,
}

impl<B, C, R> ProcessingEngine<B, C, R>
where
    B: CompositorBackend + 'static,
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
{
    /// 新しい処理エンジンを作成
    ///
    /// 全ての依存関係をコンストラクタで注入する（Constructor Injection）
    pub fn new(compositor: B, config: C, reporter: R) -> Self {
        Self {
            compositor: Arc::new(compositor),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            last_job_id: AtomicU64::new(0),
        }
    }

    /// ジョブを投入する
    ///
    /// 設定の検証、作業アイテムの列挙、出力ディレクトリの作成までを同期的に行い、
    /// 失敗した場合はワーカーを起動せずにエラーを返す。
    /// tokioランタイム内から呼び出すこと。
    pub fn submit(&self, job: JobConfig) -> ProcessingResult<JobHandle> {
        self.submit_with_cancellation(job, CancellationController::new())
    }

    /// 呼び出し側が用意したキャンセルコントローラーでジョブを投入する
    ///
    /// 投入前にキャンセル済みなら、アイテムは1件もディスパッチされない。
    pub fn submit_with_cancellation(
        &self,
        job: JobConfig,
        cancellation: CancellationController,
    ) -> ProcessingResult<JobHandle> {
        self.validate_settings()?;
        validate_directory(&job.input_dir, "入力")?;
        validate_directory(&job.mask_dir, "マスク")?;

        let items = FileScanner::build_work_items(&job)?;

        std::fs::create_dir_all(&job.output_dir)
            .map_err(|e| ProcessingError::io(&job.output_dir, e))?;

        let job_id = JobId(self.last_job_id.fetch_add(1, Ordering::Relaxed) + 1);
        let state = JobState::new(cancellation);
        let total = items.len();
        state.progress.set_total(total);

        let settings = PipelineSettings::from_config(self.config.as_ref());
        let poll_interval = self.config.progress_poll_interval();
        let format = job.output_format;

        tracing::info!(
            job = %job_id,
            total,
            format = %format,
            workers = settings.worker_count,
            strategy = self.compositor.strategy_name(),
            input = %job.input_dir.display(),
            output = %job.output_dir.display(),
            "Job submitted"
        );

        let pipeline = ProcessingPipeline::new(Arc::clone(&self.compositor));
        let reporter = Arc::clone(&self.reporter);
        let task = tokio::spawn({
            let state = state.clone();
            async move {
                reporter.report_started(total).await;
                let poller = spawn_progress_poller(
                    Arc::clone(&state.progress),
                    Arc::clone(&reporter),
                    poll_interval,
                );

                let result = pipeline
                    .execute(job_id, items, format, settings, &state, Arc::clone(&reporter))
                    .await;

                if let Err(e) = poller.await {
                    tracing::warn!(job = %job_id, error = %e, "Progress poller failed");
                }
                reporter.report_completed(&result).await;

                tracing::info!(
                    job = %job_id,
                    succeeded = result.succeeded,
                    failed = result.failed,
                    cancelled = result.cancelled,
                    elapsed_ms = result.elapsed_ms,
                    "Job finished"
                );
                result
            }
        });

        Ok(JobHandle::new(job_id, state, task))
    }

    fn validate_settings(&self) -> ProcessingResult<()> {
        if self.config.max_concurrent_tasks() == 0 {
            return Err(ProcessingError::configuration(
                "並列タスク数は1以上である必要があります",
            ));
        }

        if self.config.channel_buffer_size() == 0 {
            return Err(ProcessingError::configuration(
                "バッファサイズは1以上である必要があります",
            ));
        }

        if self.config.progress_poll_interval().is_zero() {
            return Err(ProcessingError::configuration(
                "進捗ポーリング間隔は0より大きい必要があります",
            ));
        }

        Ok(())
    }

    /// 設定への参照を取得（読み取り専用アクセス）
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 合成バックエンドへの参照を取得
    pub fn compositor(&self) -> &B {
        &self.compositor
    }
}

fn validate_directory(path: &Path, label: &str) -> ProcessingResult<()> {
    if !path.is_dir() {
        return Err(ProcessingError::configuration(format!(
            "{label}ディレクトリが存在しません: {}",
            path.display()
        )));
    }
    Ok(())
}
