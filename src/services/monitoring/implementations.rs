// 進捗監視の具象実装

use crate::core::{JobResult, ProgressReporter, ProgressState};
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    /// 進捗行の文字列表現
    pub fn format_progress(progress: &ProgressState) -> String {
        format!(
            "Progress: {}/{} ({}%)",
            progress.processed,
            progress.total,
            progress.percentage() as u32
        )
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_items: usize) {
        if !self.quiet {
            println!("🚀 Starting compositing {total_items} images...");
        }
    }

    async fn report_progress(&self, progress: ProgressState) {
        if !self.quiet {
            println!("📊 {}", Self::format_progress(&progress));
        }
    }

    async fn report_error(&self, item_id: &str, reason: &str) {
        if !self.quiet {
            eprintln!("❌ Error processing {item_id}: {reason}");
        }
    }

    async fn report_completed(&self, result: &JobResult) {
        if self.quiet {
            return;
        }
        if result.cancelled {
            println!(
                "🛑 Cancelled. Succeeded: {}, Failed: {}, Not started: {}",
                result.succeeded,
                result.failed,
                result.unprocessed()
            );
        } else {
            println!(
                "✅ Completed! Total: {}, Succeeded: {}, Failed: {}",
                result.total, result.succeeded, result.failed
            );
        }
    }
}

/// 何もしない進捗報告実装（テスト・バックグラウンド処理用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_items: usize) {
        // 何もしない
    }

    async fn report_progress(&self, _progress: ProgressState) {
        // 何もしない
    }

    async fn report_error(&self, _item_id: &str, _reason: &str) {
        // 何もしない
    }

    async fn report_completed(&self, _result: &JobResult) {
        // 何もしない
    }
}
