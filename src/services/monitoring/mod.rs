// 進捗監視機能
// 共有カウンター、ポーリング、進捗の表示

pub mod implementations;
pub mod poller;
pub mod tracker;

// 公開API
pub use implementations::{ConsoleProgressReporter, NoOpProgressReporter};
pub use poller::spawn_progress_poller;
pub use tracker::ProgressTracker;
