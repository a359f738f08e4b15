use crate::core::{OutputFormat, ProcessingResult, WorkItem};
use async_trait::async_trait;
use mockall::automock;

pub mod standard;
#[cfg(test)]
pub mod test_mocks;

/// 合成1回分の結果情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeReport {
    /// 出力画像のサイズ（元画像と同じ）
    pub dimensions: (u32, u32),
    /// マスクからアルファを作ったかどうか。falseなら完全不透明
    pub mask_applied: bool,
    /// 書き込んだバイト数
    pub bytes_written: u64,
    /// 合成にかかった時間（ミリ秒）
    pub processing_time_ms: u64,
}

/// 合成バックエンドのトレイト
///
/// 1アイテムにつき出力ファイルを1つだけ書き込む。同じ入力なら同じ出力になること。
#[automock]
#[async_trait]
pub trait CompositorBackend: Send + Sync {
    /// 画像とマスクを合成して出力先に保存する
    async fn composite(&self, item: &WorkItem, format: OutputFormat)
        -> ProcessingResult<CompositeReport>;

    /// 合成戦略の名前を取得
    fn strategy_name(&self) -> &'static str;
}
