use crate::cli::Cli;
use crate::compositor::standard::StandardCompositor;
use crate::core::{JobConfig, JobResult, OutputFormat, ProcessingConfig};
use crate::engine::ProcessingEngine;
use crate::services::{
    write_json_report, CancellationController, ConsoleProgressReporter, DefaultProcessingConfig,
};
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration struct for run command to reduce argument count
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub job: JobConfig,
    pub threads: Option<usize>,
    pub grace_period: Option<Duration>,
    pub poll_interval: Option<Duration>,
    pub settings: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub quiet: bool,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            job: JobConfig::new(
                cli.input_dir,
                cli.mask_dir,
                cli.output_dir,
                OutputFormat::parse_lenient(&cli.format),
            ),
            threads: cli.threads,
            grace_period: cli.grace_period_ms.map(Duration::from_millis),
            poll_interval: cli.poll_interval_ms.map(Duration::from_millis),
            settings: cli.settings,
            report: cli.report,
            quiet: cli.quiet,
        }
    }
}

impl RunConfig {
    /// 設定ファイルとコマンドライン引数から処理設定を組み立てる（引数が優先）
    pub fn processing_config(&self) -> Result<DefaultProcessingConfig> {
        let mut config = match &self.settings {
            Some(path) => DefaultProcessingConfig::from_json_file(path)?,
            None => DefaultProcessingConfig::default(),
        };

        if let Some(threads) = self.threads {
            config = config.with_max_concurrent(threads);
        }
        if let Some(grace_period) = self.grace_period {
            config = config.with_grace_period(grace_period);
        }
        if let Some(poll_interval) = self.poll_interval {
            config = config.with_poll_interval(poll_interval);
        }

        Ok(config)
    }
}

/// Execute run command
///
/// Ctrl-Cでキャンセルを要求し、実行中のアイテムが終わるのを待ってから結果を表示する。
pub async fn execute_run(config: RunConfig) -> Result<JobResult> {
    let processing_config = config.processing_config()?;
    let reporter = if config.quiet {
        ConsoleProgressReporter::quiet()
    } else {
        ConsoleProgressReporter::new()
    };

    if !config.quiet {
        println!("🎨 マスク合成開始");
        println!("   - 入力ディレクトリ: {}", config.job.input_dir.display());
        println!("   - マスクディレクトリ: {}", config.job.mask_dir.display());
        println!("   - 出力ディレクトリ: {}", config.job.output_dir.display());
        println!("   - 出力形式: {}", config.job.output_format);
        println!("⚙️  処理設定:");
        println!(
            "   - 並行処理数: {}",
            processing_config.max_concurrent_tasks()
        );
        println!(
            "   - 猶予期間: {}ms",
            processing_config.shutdown_grace_period().as_millis()
        );
    }

    let engine = ProcessingEngine::new(StandardCompositor::new(), processing_config, reporter);

    let cancellation = CancellationController::new();
    let signal_task = tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("🛑 キャンセル要求を受け付けました。実行中の画像の完了を待っています...");
                cancellation.cancel();
            }
        }
    });

    let submitted = engine.submit_with_cancellation(config.job.clone(), cancellation);
    let result = match submitted {
        Ok(handle) => handle.result().await,
        Err(error) => Err(error),
    };
    signal_task.abort();
    let result = result?;

    if !config.quiet {
        print_summary(&result);
    }

    if let Some(report_path) = &config.report {
        write_json_report(report_path, &config.job, &result).await?;
        if !config.quiet {
            println!("📄 レポートは {} に保存されました", report_path.display());
        }
    }

    Ok(result)
}

fn print_summary(result: &JobResult) {
    println!("📊 処理結果 ({}):", result.job_id);
    println!("   - 総ファイル数: {}", result.total);
    println!("   - 成功: {}", result.succeeded);
    println!("   - 失敗: {}", result.failed);
    if result.cancelled {
        println!("   - 未処理: {}", result.unprocessed());
    }
    println!("   - 処理時間: {}ms", result.elapsed_ms);

    if !result.failures.is_empty() {
        println!("⚠️  {}個のファイルでエラーが発生しました", result.failed);
        for failure in &result.failures {
            println!("   - {}: {}", failure.item_id, failure.reason);
        }
    }
}
