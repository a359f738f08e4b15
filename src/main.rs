use clap::Parser;
use mask_compositor::{
    cli::{execute_run, Cli, RunConfig},
    core::ProcessingError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mask_compositor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(error) = execute_run(RunConfig::from(cli)).await {
        eprintln!("❌ エラー: {error:#}");

        if let Some(processing_error) = error.downcast_ref::<ProcessingError>() {
            let context = processing_error.context();
            if let Some(suggestion) = context.suggestion {
                eprintln!("💡 {suggestion}");
            }
            tracing::debug!(
                operation = %context.operation,
                severity = processing_error.severity().as_str(),
                "Job rejected"
            );
        }

        std::process::exit(1);
    }
}
