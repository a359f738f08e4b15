// Worker - 単一アイテム処理機能

use crate::compositor::CompositorBackend;
use crate::core::{OutputFormat, Outcome, WorkItem};

/// 単一アイテムの合成処理
///
/// エラーはアイテム単位の `Outcome::Failure` に変換され、ジョブ全体には伝播しない。
pub async fn process_single_item<B>(
    compositor: &B,
    item: &WorkItem,
    format: OutputFormat,
    worker_id: usize,
) -> Outcome
where
    B: CompositorBackend + ?Sized,
{
    match compositor.composite(item, format).await {
        Ok(report) => {
            tracing::debug!(
                worker_id,
                item = %item.id,
                width = report.dimensions.0,
                height = report.dimensions.1,
                mask_applied = report.mask_applied,
                elapsed_ms = report.processing_time_ms,
                "Item composited"
            );
            Outcome::Success
        }
        Err(error) => {
            let reason = error.to_string();
            tracing::warn!(
                worker_id,
                item = %item.id,
                reason = %reason,
                severity = error.severity().as_str(),
                "Item failed"
            );
            Outcome::failure(error.failure_kind(), reason)
        }
    }
}
