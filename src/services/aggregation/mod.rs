// 結果集約機能
// アイテム単位の結果の収集、ジョブ結果とレポートの生成

pub mod aggregator;
pub mod report;

pub use aggregator::ResultAggregator;
pub use report::{write_json_report, JobInfo, JobReport};
