use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use tempo_run::{
    config::Config,
    data::{parse_observation_batch, CondensedRecord, JsonFileStore, Observation},
    model::PaceModel,
    pipeline::PaceEngine,
    PaceError,
};

#[derive(Parser)]
#[command(
    name = "tempo-run",
    version,
    about = "Match songs to your running pace",
    long_about = "Tempo-Run learns from runners' (song, pace) observations which songs make people run faster or slower, and recommends songs that match a desired pace."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append observations from a JSON array file ("-" reads stdin)
    Ingest {
        input: String,
    },

    /// Aggregate the observation log and generate features per song
    Condense,

    /// Train the pace model on the condensed table
    Train,

    /// List the most-observed songs as JSON
    TopSongs {
        /// Number of songs (defaults to the configured listing size)
        #[arg(short)]
        n: Option<usize>,
    },

    /// Estimate the pace a song gives and compare it with a desired pace
    Predict {
        /// Song as "Title - Artist"
        song: String,

        /// Desired pace to compare against
        #[arg(short, long)]
        desired_pace: Option<f64>,
    },

    /// Write the default configuration to a file
    InitConfig {
        #[arg(default_value = "tempo-run.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<PaceError>() {
            Some(pace_err) => {
                debug!("{:?}", pace_err);
                error!("{}", pace_err.user_message());
            }
            None => error!("{:#}", err),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting Tempo-Run v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            debug!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    let observations = JsonFileStore::<Vec<Observation>>::new(&config.storage.observations);
    let condensed = JsonFileStore::<Vec<CondensedRecord>>::new(&config.storage.condensed);
    let model = JsonFileStore::<PaceModel>::new(&config.storage.model);

    let engine = PaceEngine::from_config(config.clone());

    match cli.command {
        Command::Ingest { input } => {
            let payload = if input == "-" {
                let mut buffer = String::new();
                tokio::io::stdin().read_to_string(&mut buffer).await?;
                buffer
            } else {
                tokio::fs::read_to_string(&input).await?
            };

            let batch = parse_observation_batch(&payload)?;
            let total = engine.ingest(&observations, batch)?;
            println!("{} observations stored", total);
        }

        Command::Condense => {
            let summary = engine.condense(&observations, &condensed).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Train => {
            let report = engine.train(&condensed, &model)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::TopSongs { n } => {
            let top = engine.top_songs(&condensed, n)?;
            println!("{}", serde_json::to_string_pretty(&top)?);
        }

        Command::Predict { song, desired_pace } => {
            let recommendation = engine.recommend(&condensed, &model, &song, desired_pace).await?;
            let estimate = &recommendation.estimate;

            println!("{}: estimated pace {:.2} ({})", estimate.song_name, estimate.pace, estimate.source);
            if let Some(verdict) = recommendation.verdict {
                println!("{}", verdict.advice());
            }
        }

        Command::InitConfig { path } => {
            Config::default().save_to_file(&path)?;
            println!("Default configuration written to {}", path.display());
        }
    }

    Ok(())
}
