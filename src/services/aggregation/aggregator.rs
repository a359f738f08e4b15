// 結果集約 - アイテムごとのOutcomeを受け取り、ジョブ結果を組み立てる

use crate::core::{ItemFailure, JobId, JobResult, Outcome, WorkItem};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug)]
struct RecordedOutcome {
    item_id: String,
    outcome: Outcome,
}

/// ワーカーから並行に呼ばれる結果集約器
///
/// 列挙インデックスをキーに保持するため、失敗一覧は常に列挙順で並ぶ。
/// 同じアイテムへの2回目の記録は無視される。
#[derive(Debug, Default)]
pub struct ResultAggregator {
    outcomes: Mutex<BTreeMap<usize, RecordedOutcome>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 結果を記録する。既に記録済みのアイテムなら `false`
    pub fn record(&self, item: &WorkItem, outcome: Outcome) -> bool {
        let mut outcomes = self.outcomes.lock().unwrap_or_else(PoisonError::into_inner);

        if outcomes.contains_key(&item.index) {
            tracing::warn!(item = %item.id, "Outcome already recorded; ignoring duplicate");
            return false;
        }

        outcomes.insert(
            item.index,
            RecordedOutcome {
                item_id: item.id.clone(),
                outcome,
            },
        );
        true
    }

    pub fn recorded_count(&self) -> usize {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// 記録済みの結果からジョブ結果を作る
    pub fn finalize(
        &self,
        job_id: JobId,
        total: usize,
        cancelled: bool,
        elapsed: Duration,
    ) -> JobResult {
        let outcomes = self.outcomes.lock().unwrap_or_else(PoisonError::into_inner);

        let mut succeeded = 0;
        let mut failures = Vec::new();
        for recorded in outcomes.values() {
            match &recorded.outcome {
                Outcome::Success => succeeded += 1,
                Outcome::Failure { kind, reason } => failures.push(ItemFailure {
                    item_id: recorded.item_id.clone(),
                    kind: *kind,
                    reason: reason.clone(),
                }),
            }
        }

        JobResult {
            job_id,
            total,
            succeeded,
            failed: failures.len(),
            failures,
            cancelled,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}
