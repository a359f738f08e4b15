// JSONジョブレポートの出力

use crate::core::{JobConfig, JobResult, OutputFormat};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// ジョブ情報（入力・出力先とフォーマット）
#[derive(Debug, Clone, Serialize)]
pub struct JobInfo {
    pub timestamp: String,
    pub input_dir: PathBuf,
    pub mask_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct JobReport<'a> {
    pub job_info: JobInfo,
    pub result: &'a JobResult,
}

impl<'a> JobReport<'a> {
    pub fn new(config: &JobConfig, result: &'a JobResult) -> Self {
        Self {
            job_info: JobInfo {
                timestamp: chrono::Utc::now().to_rfc3339(),
                input_dir: config.input_dir.clone(),
                mask_dir: config.mask_dir.clone(),
                output_dir: config.output_dir.clone(),
                output_format: config.output_format,
            },
            result,
        }
    }
}

/// ジョブ結果をJSONファイルに書き出す
pub async fn write_json_report(path: &Path, config: &JobConfig, result: &JobResult) -> Result<()> {
    // 親ディレクトリが存在しない場合は作成
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("ディレクトリ作成エラー: {}", parent.display()))?;
    }

    let report = JobReport::new(config, result);
    let json = serde_json::to_string_pretty(&report).context("JSON変換エラー")?;

    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("レポート書き込みエラー: {}", path.display()))?;

    tracing::info!(report = %path.display(), job = %result.job_id, "Job report written");
    Ok(())
}
