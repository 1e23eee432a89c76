use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{aggregator::Aggregator, listing::top_songs};
use crate::{
    config::Config,
    data::{
        observations::append_observations,
        store::Store,
        types::{CondensedRecord, Observation, TopSong},
    },
    enrichment::{ChatFeatureService, FeatureEnricher, FeatureService},
    error::Result,
    model::{PaceModel, RegressionTrainer, TrainingReport},
    recommend::{PacePredictor, Recommendation},
};

/// What a condense run produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CondenseSummary {
    pub observations: usize,
    pub songs: usize,
    pub enriched: usize,
    pub degraded: Vec<String>,
    pub skipped: Vec<String>,
}

/// Orchestrates the pipeline stages over explicitly supplied stores
///
/// Stages:
/// 1. Ingest - append observation batches to the log
/// 2. Condense - aggregate per song and attach generated features
/// 3. Train - fit the pace model on the condensed table
/// 4. Recommend - look up or predict a song's pace
pub struct PaceEngine {
    config: Config,
    service: Arc<dyn FeatureService>,
}

impl PaceEngine {
    pub fn new(config: Config, service: Arc<dyn FeatureService>) -> Self {
        Self { config, service }
    }

    /// Engine backed by the chat-completions feature service from `config`
    pub fn from_config(config: Config) -> Self {
        let service = Arc::new(ChatFeatureService::from_config(&config.service));
        Self::new(config, service)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn enricher(&self) -> FeatureEnricher {
        FeatureEnricher::with_retries(self.service.clone(), self.config.service.retries)
    }

    // ==========================================
    // STAGE 1: INGEST
    // ==========================================

    /// Append a batch of observations; returns the log size afterwards
    pub fn ingest(&self, store: &dyn Store<Vec<Observation>>, batch: Vec<Observation>) -> Result<usize> {
        info!("📥 Ingesting {} observations into {}", batch.len(), store.describe());
        append_observations(store, batch)
    }

    // ==========================================
    // STAGE 2: CONDENSE
    // ==========================================

    /// Rebuild the condensed table from the full observation log
    pub async fn condense(
        &self,
        observations: &dyn Store<Vec<Observation>>,
        condensed: &dyn Store<Vec<CondensedRecord>>,
    ) -> Result<CondenseSummary> {
        info!("🧮 Step 1: Aggregating observations from {}...", observations.describe());
        let rows = observations.load()?;
        let songs = Aggregator::aggregate(&rows)?;
        info!("   {} observations -> {} distinct songs", rows.len(), songs.len());

        info!("🎧 Step 2: Generating song features via '{}'...", self.service.name());
        let song_count = songs.len();
        let (records, enrichment) = self.enricher().enrich_all(songs).await;

        if !enrichment.degraded.is_empty() {
            warn!("   {} songs kept empty features after retries", enrichment.degraded.len());
        }
        if !enrichment.skipped.is_empty() {
            warn!("   {} songs skipped (no 'Title - Artist' form)", enrichment.skipped.len());
        }

        info!("💾 Step 3: Saving condensed table to {}...", condensed.describe());
        condensed.save(&records)?;

        let summary = CondenseSummary {
            observations: rows.len(),
            songs: song_count,
            enriched: enrichment.enriched,
            degraded: enrichment.degraded,
            skipped: enrichment.skipped,
        };

        info!("   ✅ Condensed {} songs ({} enriched)", summary.songs, summary.enriched);
        Ok(summary)
    }

    // ==========================================
    // STAGE 3: TRAIN
    // ==========================================

    /// Fit the model on the condensed table and persist it
    ///
    /// The model is saved whatever its held-out score.
    pub fn train(
        &self,
        condensed: &dyn Store<Vec<CondensedRecord>>,
        model: &dyn Store<PaceModel>,
    ) -> Result<TrainingReport> {
        info!("🌲 Training pace model from {}...", condensed.describe());
        let records = condensed.load()?;

        let trainer = RegressionTrainer::new(self.config.training.clone());
        let fitted = trainer.train(&records)?;

        model.save(&fitted)?;
        info!("   ✅ Model saved to {}", model.describe());

        Ok(fitted.report)
    }

    // ==========================================
    // STAGE 4: QUERY
    // ==========================================

    /// Top songs by observation count; `n` defaults to the configured listing size
    pub fn top_songs(&self, condensed: &dyn Store<Vec<CondensedRecord>>, n: Option<usize>) -> Result<Vec<TopSong>> {
        let n = n.unwrap_or(self.config.listing.top_n);
        debug!("Listing top {} songs from {}", n, condensed.describe());
        top_songs(&condensed.load()?, n)
    }

    /// Estimate a song's pace and compare it with the desired pace
    pub async fn recommend(
        &self,
        condensed: &dyn Store<Vec<CondensedRecord>>,
        model: &dyn Store<PaceModel>,
        song_name: &str,
        desired_pace: Option<f64>,
    ) -> Result<Recommendation> {
        info!("🏃 Estimating pace for '{}'", song_name.trim());
        let predictor = PacePredictor::from_stores(condensed, model, self.enricher())?;
        predictor.recommend(song_name, desired_pace).await
    }
}
