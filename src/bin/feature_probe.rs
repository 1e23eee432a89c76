// Ask the feature service about one song and print what comes back

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

use tempo_run::{
    config::Config,
    enrichment::{ChatFeatureService, EnrichmentOutcome, FeatureEnricher},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let song = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if song.trim().is_empty() {
        bail!("usage: feature-probe \"Title - Artist\"");
    }

    let config = match std::env::var("TEMPO_RUN_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::default(),
    };

    let service = ChatFeatureService::from_config(&config.service);
    eprintln!("🎧 Probing {} ({}) for '{}'", config.service.base_url, service.model(), song.trim());

    let enricher = FeatureEnricher::with_retries(Arc::new(service), config.service.retries);
    match enricher.enrich_song(&song).await {
        EnrichmentOutcome::Enriched { features, attempts } => {
            eprintln!("   ✅ Features after {} attempt(s)", attempts);
            println!("{}", serde_json::to_string_pretty(&features)?);
        }
        EnrichmentOutcome::Degraded { attempts, last_error } => {
            eprintln!("   ❌ No features after {} attempt(s)", attempts);
            if let Some(err) = last_error {
                eprintln!("   Last error: {}", err);
            }
            println!("{{}}");
        }
        EnrichmentOutcome::Skipped => {
            bail!("Input is not in the expected format 'Song Name - Artist'");
        }
    }

    Ok(())
}
