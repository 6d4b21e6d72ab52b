mod cli;
mod config;
mod core;
mod error;

use crate::cli::Cli;
use crate::config::Config;
use crate::core::{AnalysisRequester, Job, OutputFormat, TranscriptService, pipeline};
use crate::error::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "vidsum=debug" } else { "vidsum=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(&cli)?;
    tracing::debug!(?config, "configuration loaded");

    let job = Job {
        url: cli.url,
        format: OutputFormat::from_selector(&cli.format),
        language: cli.language,
        output_dir: config.output_dir.clone(),
    };

    let transcript_service = TranscriptService::new()?;
    let analysis_requester = AnalysisRequester::new(&config);

    let outcome = pipeline::run(&job, &transcript_service, &analysis_requester).await?;

    tracing::info!(
        video_id = %outcome.video_id,
        path = %outcome.path.display(),
        "analysis written"
    );
    println!("{}", outcome.rendered);

    Ok(())
}
