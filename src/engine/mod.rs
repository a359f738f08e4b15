// エンジン層 - 並列処理とオーケストレーション
// サービス層を組み合わせて高レベルな処理を提供

pub mod api;
pub mod consumer;
pub mod job;
mod pipeline;
pub mod processing_engine;
pub mod producer;

// 公開API - 主要エンジンクラス
pub use api::{create_default_engine, create_quiet_engine, run_job};
pub use job::{JobHandle, JobState};
pub use pipeline::INTERRUPTED_REASON;
pub use processing_engine::ProcessingEngine;
