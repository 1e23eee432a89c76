use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{prompt::split_song_name, service::FeatureService};
use crate::{
    data::types::{AggregatedSong, CondensedRecord, SongFeatures},
    error::ServiceError,
};

/// Default number of additional attempts after the first one
pub const DEFAULT_RETRIES: u32 = 2;

/// Result of enriching a single song
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// The service produced a non-empty feature record
    Enriched { features: SongFeatures, attempts: u32 },

    /// Every attempt failed or came back empty
    Degraded { attempts: u32, last_error: Option<ServiceError> },

    /// The song name has no " - " separator; the service was not called
    Skipped,
}

impl EnrichmentOutcome {
    /// Features to store for this song (empty unless enriched)
    pub fn into_features(self) -> SongFeatures {
        match self {
            Self::Enriched { features, .. } => features,
            _ => SongFeatures::empty(),
        }
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, Self::Enriched { .. })
    }
}

/// What happened across a batch of songs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentSummary {
    pub enriched: usize,
    pub degraded: Vec<String>,
    pub skipped: Vec<String>,
}

impl EnrichmentSummary {
    pub fn total(&self) -> usize {
        self.enriched + self.degraded.len() + self.skipped.len()
    }
}

/// Requests features for songs with a bounded retry loop
///
/// Enrichment failure never propagates: a song whose attempts are exhausted
/// gets the empty feature record.
#[derive(Clone)]
pub struct FeatureEnricher {
    service: Arc<dyn FeatureService>,
    retries: u32,
}

impl FeatureEnricher {
    pub fn new(service: Arc<dyn FeatureService>) -> Self {
        Self::with_retries(service, DEFAULT_RETRIES)
    }

    pub fn with_retries(service: Arc<dyn FeatureService>, retries: u32) -> Self {
        Self { service, retries }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Enrich one song given as "Title - Artist"
    pub async fn enrich_song(&self, song_name: &str) -> EnrichmentOutcome {
        let Some((title, artist)) = split_song_name(song_name) else {
            warn!("Input is not in the expected format 'Song Name - Artist': '{}'", song_name);
            return EnrichmentOutcome::Skipped;
        };

        let max_attempts = self.retries + 1;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.service.generate_features(&title, &artist).await {
                Ok(features) if !features.is_empty() => {
                    debug!("Features for '{}' generated on attempt {}", song_name, attempt);
                    return EnrichmentOutcome::Enriched { features, attempts: attempt };
                }
                Ok(_) => {
                    warn!("No features generated for '{}' on attempt {}", song_name, attempt);
                    last_error = None;
                }
                Err(err) => {
                    warn!("Error generating features for '{}' on attempt {}: {}", song_name, attempt, err);
                    let transient = err.is_transient();
                    last_error = Some(err);
                    if !transient {
                        return EnrichmentOutcome::Degraded { attempts: attempt, last_error };
                    }
                }
            }
        }

        EnrichmentOutcome::Degraded { attempts: max_attempts, last_error }
    }

    /// Enrich every aggregated song, one at a time, into condensed records
    pub async fn enrich_all(&self, songs: Vec<AggregatedSong>) -> (Vec<CondensedRecord>, EnrichmentSummary) {
        let mut summary = EnrichmentSummary::default();
        let mut records = Vec::with_capacity(songs.len());
        let total = songs.len();

        for (i, song) in songs.into_iter().enumerate() {
            info!("   Processing song {}/{}: '{}'", i + 1, total, song.song_name);

            let outcome = self.enrich_song(&song.song_name).await;
            match &outcome {
                EnrichmentOutcome::Enriched { .. } => summary.enriched += 1,
                EnrichmentOutcome::Degraded { .. } => summary.degraded.push(song.song_name.clone()),
                EnrichmentOutcome::Skipped => summary.skipped.push(song.song_name.clone()),
            }

            records.push(CondensedRecord::new(song, outcome.into_features()));
        }

        (records, summary)
    }
}
