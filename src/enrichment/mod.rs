//! # Feature Enrichment Module
//!
//! Obtains semantic audio features (tempo, danceability, energy, mood,
//! genre) for songs from an external generative model.
//!
//! ## Core Pieces
//!
//! - **FeatureService**: the single capability `generate_features(title, artist)`
//! - **ChatFeatureService**: OpenAI-compatible chat completions implementation
//! - **FeatureEnricher**: splits song names, retries, degrades to empty features
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tempo_run::{config::Config, enrichment::{ChatFeatureService, FeatureEnricher}};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = Config::default();
//! let service = Arc::new(ChatFeatureService::from_config(&config.service));
//! let enricher = FeatureEnricher::with_retries(service, config.service.retries);
//!
//! let outcome = enricher.enrich_song("Eye of the Tiger - Survivor").await;
//! println!("{:?}", outcome.into_features());
//! # }
//! ```

pub mod chat;
pub mod enricher;
pub mod prompt;
pub mod service;

pub use chat::ChatFeatureService;
pub use enricher::{EnrichmentOutcome, EnrichmentSummary, FeatureEnricher, DEFAULT_RETRIES};
pub use prompt::{build_feature_prompt, parse_feature_response, split_song_name};
pub use service::FeatureService;
