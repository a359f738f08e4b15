// 合成処理機能
// 単一アイテムの合成とOutcomeへの変換

pub mod worker;

// 公開API
pub use worker::process_single_item;
