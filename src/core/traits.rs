// 合成ジョブのトレイト定義
// エンジンが依存する抽象化インターフェースを定義

use super::types::{JobResult, ProgressState};
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// ワーカープールとジョブ制御の設定を抽象化するトレイト
#[automock]
pub trait ProcessingConfig: Send + Sync {
    /// 最大同時実行ワーカー数を取得
    fn max_concurrent_tasks(&self) -> usize;

    /// 作業キューのバッファサイズを取得
    fn channel_buffer_size(&self) -> usize;

    /// キャンセル後、実行中アイテムの完了を待つ猶予期間
    fn shutdown_grace_period(&self) -> Duration;

    /// 進捗ポーリング間隔
    fn progress_poll_interval(&self) -> Duration;
}

// ProcessingConfig for Box<dyn ProcessingConfig>
impl ProcessingConfig for Box<dyn ProcessingConfig> {
    fn max_concurrent_tasks(&self) -> usize {
        self.as_ref().max_concurrent_tasks()
    }

    fn channel_buffer_size(&self) -> usize {
        self.as_ref().channel_buffer_size()
    }

    fn shutdown_grace_period(&self) -> Duration {
        self.as_ref().shutdown_grace_period()
    }

    fn progress_poll_interval(&self) -> Duration {
        self.as_ref().progress_poll_interval()
    }
}

/// 進捗報告の抽象化トレイト
///
/// 表示方法は実装側が決める。エンジンは描画について何も知らない。
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// ジョブ開始時の報告
    async fn report_started(&self, total_items: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, progress: ProgressState);

    /// アイテム失敗時の報告
    async fn report_error(&self, item_id: &str, reason: &str);

    /// ジョブ完了時の報告
    async fn report_completed(&self, result: &JobResult);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: usize) {
        self.as_ref().report_started(total_items).await
    }

    async fn report_progress(&self, progress: ProgressState) {
        self.as_ref().report_progress(progress).await
    }

    async fn report_error(&self, item_id: &str, reason: &str) {
        self.as_ref().report_error(item_id, reason).await
    }

    async fn report_completed(&self, result: &JobResult) {
        self.as_ref().report_completed(result).await
    }
}
