// Producer - 作業アイテム配信機能

use crate::core::WorkItem;
use crate::services::CancellationController;
use tokio::sync::mpsc;

/// Producer: 作業アイテムを列挙順に配信
///
/// キャンセルされた時点で配信を止め、送信側をドロップしてキューを閉じる。
pub fn spawn_producer(
    items: Vec<WorkItem>,
    work_tx: mpsc::Sender<WorkItem>,
    cancellation: CancellationController,
) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(async move {
        let mut dispatched = 0;

        for item in items {
            if cancellation.is_cancelled() {
                break;
            }

            let sent = tokio::select! {
                biased;
                _ = cancellation.cancelled() => false,
                sent = work_tx.send(item) => sent.is_ok(),
            };

            if !sent {
                // キャンセル、またはチャンネルが閉じられた場合は終了
                break;
            }
            dispatched += 1;
        }

        // work_txをドロップしてチャンネル終了シグナル
        dispatched
    })
}
