mod cloud;
mod config;
mod helpers;
mod pipeline;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cloud::aws::AwsClients;
use config::{CONFIG_ENV, RunConfig};
use pipeline::{Pipeline, ensure_input, image_id, write_summary};

/// Convert an OVA file into an AWS AMI using VM Import/Export.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the .ova file to import.
    #[arg(short, long)]
    input: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn convert(cli: Cli) -> Result<()> {
    ensure_input(&cli.input)?;

    let settings = config::load_from_env(CONFIG_ENV)?;
    let run = RunConfig::new(cli.input, settings.bucket_prefix())?;

    let aws = AwsClients::from_env(&settings)
        .await
        .context("error initializing AWS clients; check your credentials and region")?;
    info!(region = aws.region.as_str(), "using AWS session");

    let task = Pipeline::new(&settings, &aws.region, &aws.storage, &aws.access, &aws.images)
        .run(&run)
        .await?;

    let mut stdout = std::io::stdout().lock();
    write_summary(&task, &mut stdout)?;
    stdout.flush()?;

    image_id(&task)?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match convert(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
