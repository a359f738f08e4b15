// 合成ジョブ専用のエラー型定義
// ジョブ全体を止める致命的エラーと、アイテム単位に閉じるエラーを同じ型で表現する

use super::types::FailureKind;
use std::path::Path;
use thiserror::Error;

/// 合成処理固有のエラー型
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("デコードエラー: {file_path} - {source}")]
    DecodeError {
        file_path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("I/Oエラー: {path} - {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("エンコードエラー: {file_path} - {source}")]
    EncodeError {
        file_path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(
        "マスクサイズ不一致: {file_path} (画像 {image_width}x{image_height}, マスク {mask_width}x{mask_height})"
    )]
    DimensionMismatchError {
        file_path: String,
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("内部エラー: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl ProcessingError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// デコードエラーの作成
    pub fn decode(file_path: &Path, source: image::ImageError) -> Self {
        Self::DecodeError {
            file_path: file_path.display().to_string(),
            source,
        }
    }

    /// I/Oエラーの作成
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }

    /// エンコードエラーの作成
    pub fn encode(file_path: &Path, source: anyhow::Error) -> Self {
        Self::EncodeError {
            file_path: file_path.display().to_string(),
            source,
        }
    }

    pub fn dimension_mismatch(file_path: &Path, image: (u32, u32), mask: (u32, u32)) -> Self {
        Self::DimensionMismatchError {
            file_path: file_path.display().to_string(),
            image_width: image.0,
            image_height: image.1,
            mask_width: mask.0,
            mask_height: mask.1,
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// 内部エラーの作成
    pub fn internal(source: anyhow::Error) -> Self {
        Self::InternalError { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } => ErrorSeverity::High,
            Self::DecodeError { .. } | Self::DimensionMismatchError { .. } => ErrorSeverity::Medium,
            Self::IoError { .. } | Self::EncodeError { .. } => ErrorSeverity::Medium,
            Self::TaskError { .. } => ErrorSeverity::High,
            Self::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// `Failure` として記録する際の分類
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::DecodeError { .. } => FailureKind::Decode,
            Self::IoError { .. } => FailureKind::Io,
            Self::EncodeError { .. } => FailureKind::Encode,
            Self::DimensionMismatchError { .. } => FailureKind::DimensionMismatch,
            Self::TaskError { .. } => FailureKind::Interrupted,
            Self::ConfigurationError { .. } | Self::InternalError { .. } => FailureKind::Internal,
        }
    }

    /// エラーコンテキストを取得
    pub fn context(&self) -> ErrorContext {
        match self {
            Self::ConfigurationError { message } => ErrorContext::new("configuration")
                .with_suggestion(format!("入力・マスク・出力ディレクトリを確認してください: {message}")),
            Self::DecodeError { file_path, .. } => ErrorContext::new("decode")
                .with_resource(file_path.clone())
                .with_suggestion("画像ファイルの形式と整合性を確認してください"),
            Self::IoError { path, .. } => ErrorContext::new("filesystem")
                .with_resource(path.clone())
                .with_suggestion("ファイルパスとアクセス権限、空き容量を確認してください"),
            Self::EncodeError { file_path, .. } => ErrorContext::new("encode")
                .with_resource(file_path.clone()),
            Self::DimensionMismatchError { file_path, .. } => ErrorContext::new("composite")
                .with_resource(file_path.clone())
                .with_suggestion("マスク画像のサイズを元画像に合わせてください"),
            _ => ErrorContext::new("unknown"),
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - システム停止レベル
    Critical,
}

impl ErrorSeverity {
    /// 重要度の文字列表現を取得
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// エラーコンテキスト情報
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// 実行していた操作
    pub operation: String,
    /// 関連するリソース（ファイルパス等）
    pub resource: Option<String>,
    /// エラー解決のための提案
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// 新しいエラーコンテキストを作成
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            resource: None,
            suggestion: None,
        }
    }

    /// リソース情報を追加
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// 提案を追加
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// 合成処理の結果型
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;
