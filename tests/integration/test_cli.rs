// CLIコマンドのテスト
use crate::fixtures::{write_color_image, write_corrupted, JobDirs};
use clap::Parser;
use mask_compositor::cli::{execute_run, Cli, RunConfig};
use mask_compositor::core::{OutputFormat, ProcessingError};
use serde_json::Value;
use std::fs;

fn run_config(dirs: &JobDirs, extra: &[&str]) -> RunConfig {
    let mut argv = vec![
        "mask_compositor".to_string(),
        dirs.input.display().to_string(),
        dirs.masks.display().to_string(),
        dirs.output.display().to_string(),
    ];
    argv.extend(extra.iter().map(|arg| arg.to_string()));
    RunConfig::from(Cli::try_parse_from(argv).unwrap())
}

#[tokio::test]
async fn test_cli_run_with_report() {
    let dirs = JobDirs::new();
    write_color_image(&dirs.input.join("ok.png"), 3, 3);
    write_corrupted(&dirs.input.join("bad.jpg"));
    let report = dirs.root().join("report.json");
    let report_arg = report.display().to_string();

    let config = run_config(
        &dirs,
        &["--format", "tiff", "--threads", "2", "--report", &report_arg, "--quiet"],
    );
    assert_eq!(config.job.output_format, OutputFormat::Tiff);

    let result = execute_run(config).await.unwrap();
    assert_eq!(result.total, 2);
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.failed, 1);
    assert!(dirs.output.join("ok.tiff").exists());

    let json: Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["job_info"]["output_format"], "tiff");
    assert_eq!(json["result"]["total"], 2);
    assert_eq!(json["result"]["failures"][0]["item_id"], "bad.jpg");
    assert_eq!(json["result"]["failures"][0]["kind"], "decode");
}

#[tokio::test]
async fn test_cli_run_with_settings_file() {
    let dirs = JobDirs::new();
    write_color_image(&dirs.input.join("a.png"), 2, 2);
    let settings = dirs.root().join("settings.json");
    fs::write(&settings, r#"{ "max_concurrent": 1, "poll_interval_ms": 5 }"#).unwrap();
    let settings_arg = settings.display().to_string();

    let result = execute_run(run_config(&dirs, &["--settings", &settings_arg, "--quiet"]))
        .await
        .unwrap();

    assert!(result.is_clean());
}

#[tokio::test]
async fn test_cli_rejects_empty_input() {
    let dirs = JobDirs::new();

    let error = execute_run(run_config(&dirs, &["--quiet"]))
        .await
        .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<ProcessingError>(),
        Some(ProcessingError::ConfigurationError { .. })
    ));
}

#[tokio::test]
async fn test_cli_rejects_zero_threads() {
    let dirs = JobDirs::new();
    write_color_image(&dirs.input.join("a.png"), 2, 2);

    let error = execute_run(run_config(&dirs, &["--threads", "0", "--quiet"]))
        .await
        .unwrap_err();

    assert!(error.to_string().contains("並列タスク数"));
    assert!(!dirs.output.exists());
}
