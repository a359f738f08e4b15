// 設定管理の具象実装

use crate::core::{ProcessingConfig, ProcessingError, ProcessingResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// デフォルト設定実装
///
/// JSON設定ファイルから読み込む場合、省略したフィールドはデフォルト値になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultProcessingConfig {
    max_concurrent: usize,
    buffer_size: usize,
    grace_period_ms: u64,
    poll_interval_ms: u64,
}

impl DefaultProcessingConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            max_concurrent: cpu_count.max(1),
            buffer_size: 100,
            grace_period_ms: 5_000,
            poll_interval_ms: 100,
        }
    }

    /// JSON設定ファイルから読み込む
    pub fn from_json_file(path: &Path) -> ProcessingResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ProcessingError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            ProcessingError::configuration(format!("{}: {e}", path.display()))
        })
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period_ms = grace_period.as_millis() as u64;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval_ms = poll_interval.as_millis() as u64;
        self
    }
}

impl Default for DefaultProcessingConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl ProcessingConfig for DefaultProcessingConfig {
    fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn shutdown_grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    fn progress_poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
