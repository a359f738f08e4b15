// 高レベル公開API
// ProcessingEngineを簡単に使用できるようにするための便利な関数

use super::ProcessingEngine;
use crate::{
    compositor::{standard::StandardCompositor, CompositorBackend},
    core::{JobConfig, JobResult, ProcessingConfig, ProcessingResult, ProgressReporter},
    services::{ConsoleProgressReporter, DefaultProcessingConfig, NoOpProgressReporter},
};

/// 設定済みProcessingEngineでジョブを実行し、完了まで待つ
pub async fn run_job<B, C, R>(
    engine: &ProcessingEngine<B, C, R>,
    job: JobConfig,
) -> ProcessingResult<JobResult>
where
    B: CompositorBackend + 'static,
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
{
    engine.submit(job)?.result().await
}

/// ProcessingEngine作成のヘルパー関数
///
/// 標準合成器・デフォルト設定・コンソール出力での簡単なエンジン作成
pub fn create_default_engine(
) -> ProcessingEngine<StandardCompositor, DefaultProcessingConfig, ConsoleProgressReporter> {
    ProcessingEngine::new(
        StandardCompositor::new(),
        DefaultProcessingConfig::default(),
        ConsoleProgressReporter::new(),
    )
}

/// ProcessingEngine作成のヘルパー関数（静音版）
///
/// テストやバックグラウンド処理用の静音エンジン作成
pub fn create_quiet_engine(
) -> ProcessingEngine<StandardCompositor, DefaultProcessingConfig, NoOpProgressReporter> {
    ProcessingEngine::new(
        StandardCompositor::new(),
        DefaultProcessingConfig::default(),
        NoOpProgressReporter::new(),
    )
}
