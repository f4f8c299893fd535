//! ReelKit CLI
//!
//! Command-line interface for probing the engine and running transcoding
//! jobs with cooperative cancellation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reelkit::{Config, Engine, FfmpegCliEngine, JobHost, TranscodeJob};

#[derive(Parser)]
#[command(name = "reelkit")]
#[command(about = "Media job engine - cancellable transcoding jobs")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show engine availability and version
    Info,

    /// Run one transcoding job with the given engine arguments
    Transcode {
        /// Arguments handed to the engine, e.g. -- -i in.mov out.mp4
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        arguments: Vec<String>,

        /// Suppress per-snapshot progress lines
        #[arg(short, long)]
        quiet: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reelkit=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Info => cmd_info(&config),
        Commands::Transcode { arguments, quiet } => cmd_transcode(config, arguments, quiet).await,
    }
}

fn cmd_info(config: &Config) -> anyhow::Result<()> {
    println!("ReelKit Engine Information");
    println!("==========================\n");

    let engine = FfmpegCliEngine::from_config(&config.engine);
    let available = engine.is_available();

    println!("Binary: {}", engine.binary());
    println!("Available: {}", if available { "Yes" } else { "No" });
    if let Some(version) = engine.version() {
        println!("Version: {}", version);
    }

    println!("\nHost: {} concurrent job(s)", config.host.max_concurrent);

    Ok(())
}

async fn cmd_transcode(
    config: Config,
    arguments: Vec<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let engine = Arc::new(FfmpegCliEngine::from_config(&config.engine));
    if !engine.is_available() {
        return Err(reelkit::Error::EngineNotAvailable(engine.binary().to_string()).into());
    }

    let host = JobHost::with_config(config.host);
    let (done_tx, mut done_rx) = tokio::sync::oneshot::channel();

    let job = TranscodeJob::new(
        engine.clone(),
        arguments,
        move |stats| {
            if !quiet {
                println!("{stats}");
            }
        },
        move |code| {
            let _ = done_tx.send(code);
        },
    );

    println!("Transcoding... Press Ctrl+C to cancel.\n");
    job.start(&host);

    let code = tokio::select! {
        result = &mut done_rx => result.unwrap_or(-1),
        _ = tokio::signal::ctrl_c() => {
            println!("\nCancel requested, waiting for the engine...");
            job.cancel();
            done_rx.await.unwrap_or(-1)
        }
    };

    host.shutdown();

    if engine.is_success(code) {
        println!("\nDone.");
        Ok(())
    } else if engine.is_cancel(code) {
        println!("\nCancelled.");
        std::process::exit(code);
    } else {
        anyhow::bail!("engine failed with code {}", code);
    }
}
