// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod aggregation;
pub mod cancellation;
pub mod config;
pub mod monitoring;
pub mod processing;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use aggregation::{write_json_report, ResultAggregator};
pub use cancellation::CancellationController;
pub use config::DefaultProcessingConfig;
pub use monitoring::{
    spawn_progress_poller, ConsoleProgressReporter, NoOpProgressReporter, ProgressTracker,
};
pub use processing::process_single_item;
