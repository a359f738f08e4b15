// キャンセル制御 - ジョブ単位の一方向フラグ

use tokio_util::sync::CancellationToken;

/// 協調的キャンセルのためのコントローラー
///
/// フラグは `false` から `true` への一方向のみ。ワーカーは新しいアイテムを始める前にだけ確認し、
/// 実行中のアイテムは中断しない。
#[derive(Debug, Clone, Default)]
pub struct CancellationController {
    token: CancellationToken,
}

impl CancellationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャンセルを要求する。既にキャンセル済みなら何もしない
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::info!("Cancellation requested");
        }
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// キャンセルされるまで待機する
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
