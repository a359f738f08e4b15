//! 画像とマスクをRGBAに合成するバッチジョブエンジン
//!
//! 入力ディレクトリの画像を列挙し、ワーカープールで並列に合成する。
//! 呼び出し側は `ProcessingEngine::submit` で受け取った `JobHandle` を通じて
//! 進捗の取得、キャンセル、結果の待機を行う。

pub mod cli;
pub mod compositor;
pub mod core;
pub mod engine;
pub mod file_scanner;
pub mod image_loader;
pub mod services;

pub use compositor::{standard::StandardCompositor, CompositeReport, CompositorBackend};
pub use engine::{create_default_engine, create_quiet_engine, run_job, JobHandle, ProcessingEngine};
pub use services::{
    CancellationController, ConsoleProgressReporter, DefaultProcessingConfig, NoOpProgressReporter,
};
