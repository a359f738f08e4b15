// 合成ジョブに関連するデータ型定義

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 出力画像フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    /// LZW圧縮TIFF
    Tiff,
}

impl OutputFormat {
    /// 文字列からフォーマットを決定する
    ///
    /// `tiff` / `tif` 以外の値はすべてPNGとして扱う。
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tiff" | "tif" => Self::Tiff,
            _ => Self::Png,
        }
    }

    /// 出力ファイルの拡張子（ドットなし）
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// ジョブ設定（ジョブ開始後は不変）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub input_dir: PathBuf,
    pub mask_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl JobConfig {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        mask_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        output_format: OutputFormat,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            mask_dir: mask_dir.into(),
            output_dir: output_dir.into(),
            output_format,
        }
    }
}

/// 1枚の入力画像に対応する作業単位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// 列挙順のインデックス（ファイル名順）
    pub index: usize,
    /// 入力ファイル名。ジョブ内で一意
    pub id: String,
    pub image_path: PathBuf,
    /// 存在しない場合は完全不透明のアルファを合成する
    pub mask_path: PathBuf,
    pub output_path: PathBuf,
}

/// 進捗スナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProgressState {
    pub processed: usize,
    pub total: usize,
}

impl ProgressState {
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }

    /// 進捗率（0.0〜100.0）。totalが0の場合は0.0
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.processed as f64 / self.total as f64) * 100.0
        }
    }
}

/// 失敗の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Decode,
    Io,
    Encode,
    DimensionMismatch,
    /// 猶予期間切れの強制終了、またはワーカーの異常終了
    Interrupted,
    Internal,
}

/// 個別アイテムの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { kind: FailureKind, reason: String },
}

impl Outcome {
    pub fn failure(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            reason: reason.into(),
        }
    }
}

/// ジョブ結果に記録される失敗アイテム
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub item_id: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// ジョブ単位の一意なID（エンジン内で採番）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// ジョブ全体のサマリー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobResult {
    pub job_id: JobId,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 列挙順に並んだ失敗一覧
    pub failures: Vec<ItemFailure>,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

impl JobResult {
    /// 結果が記録されなかったアイテム数（キャンセル時のみ0より大きくなる）
    pub fn unprocessed(&self) -> usize {
        self.total.saturating_sub(self.succeeded + self.failed)
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0 && !self.cancelled && self.unprocessed() == 0
    }
}
