use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::classify::PaceMatch;
use crate::{
    data::{
        store::Store,
        types::{CondensedRecord, SongFeatures},
    },
    enrichment::{EnrichmentOutcome, FeatureEnricher},
    error::{DataError, PaceError, Result},
    model::PaceModel,
};

/// Where an estimated pace came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceSource {
    /// Stored average pace of a known song
    Database,

    /// Model prediction from freshly generated features
    Predicted,
}

impl fmt::Display for PaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => f.write_str("database"),
            Self::Predicted => f.write_str("predicted"),
        }
    }
}

/// Estimated pace for one queried song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceEstimate {
    pub song_name: String,
    pub pace: f64,
    pub source: PaceSource,

    /// Features fed to the model; absent for database hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<SongFeatures>,
}

/// Estimate plus optional comparison against a desired pace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub estimate: PaceEstimate,
    pub desired_pace: Option<f64>,
    pub verdict: Option<PaceMatch>,
}

/// Lookup-or-predict pace estimation over a condensed table and a model
///
/// Queries never write back: a predicted song stays unknown to the table.
/// The model is only needed for songs missing from the table, so a
/// predictor without one still answers database hits.
pub struct PacePredictor {
    records: Vec<CondensedRecord>,
    model: Option<PaceModel>,
    model_location: String,
    enricher: FeatureEnricher,
}

impl PacePredictor {
    pub fn new(records: Vec<CondensedRecord>, model: PaceModel, enricher: FeatureEnricher) -> Self {
        Self {
            records,
            model: Some(model),
            model_location: "<in-memory model>".to_string(),
            enricher,
        }
    }

    /// Predictor that can only answer songs already in the table
    pub fn lookup_only(records: Vec<CondensedRecord>, model_location: impl Into<String>, enricher: FeatureEnricher) -> Self {
        Self {
            records,
            model: None,
            model_location: model_location.into(),
            enricher,
        }
    }

    /// Load the condensed table, and the model when one has been saved
    pub fn from_stores(
        condensed: &dyn Store<Vec<CondensedRecord>>,
        model: &dyn Store<PaceModel>,
        enricher: FeatureEnricher,
    ) -> Result<Self> {
        let records = condensed.load()?;
        debug!("Predictor ready with {} known songs", records.len());

        if model.exists() {
            let loaded = model.load()?;
            loaded.validate()?;
            let mut predictor = Self::new(records, loaded, enricher);
            predictor.model_location = model.describe();
            Ok(predictor)
        } else {
            warn!("No model at {}; only known songs can be answered", model.describe());
            Ok(Self::lookup_only(records, model.describe(), enricher))
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Case-insensitive exact match on song name
    pub fn lookup(&self, song_name: &str) -> Option<&CondensedRecord> {
        let wanted = song_name.trim().to_lowercase();
        self.records
            .iter()
            .find(|record| record.song_name().to_lowercase() == wanted)
    }

    /// Resolve a pace for the song: stored average if known, else predicted
    pub async fn estimate(&self, song_name: &str) -> Result<PaceEstimate> {
        let song_name = song_name.trim();

        if let Some(record) = self.lookup(song_name) {
            info!("Song found in database. Using stored average pace.");
            return Ok(PaceEstimate {
                song_name: record.song_name().to_string(),
                pace: record.avg_pace(),
                source: PaceSource::Database,
                features: None,
            });
        }

        let Some(model) = self.model.as_ref() else {
            return Err(DataError::NotFound { path: self.model_location.clone() }.into());
        };

        info!("Song not found in database. Generating features...");
        let features = match self.enricher.enrich_song(song_name).await {
            EnrichmentOutcome::Enriched { features, .. } => features,
            EnrichmentOutcome::Skipped => {
                return Err(PaceError::FeatureUnavailable {
                    song: song_name.to_string(),
                    reason: "expected the form 'Title - Artist'".to_string(),
                });
            }
            EnrichmentOutcome::Degraded { attempts, last_error } => {
                let reason = match last_error {
                    Some(err) => format!("{} attempt(s) failed, last error: {}", attempts, err),
                    None => format!("{} attempt(s) returned no features", attempts),
                };
                return Err(PaceError::FeatureUnavailable { song: song_name.to_string(), reason });
            }
        };

        let pace = model.predict(&features);
        debug!("Predicted pace {:.3} from {:?}", pace, features.numeric_vector());

        Ok(PaceEstimate {
            song_name: song_name.to_string(),
            pace,
            source: PaceSource::Predicted,
            features: Some(features),
        })
    }

    /// Estimate and, when a desired pace is given, classify against it
    pub async fn recommend(&self, song_name: &str, desired_pace: Option<f64>) -> Result<Recommendation> {
        let estimate = self.estimate(song_name).await?;
        let verdict = desired_pace.map(|desired| PaceMatch::classify(estimate.pace, desired));

        Ok(Recommendation { estimate, desired_pace, verdict })
    }

    pub fn known_songs(&self) -> usize {
        self.records.len()
    }
}
