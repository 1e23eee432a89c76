//! # Recommendation Module
//!
//! Answers "what pace will this song give me?" for any song, known or not,
//! and compares the answer against the runner's desired pace.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tempo_run::{
//!     data::{CondensedRecord, JsonFileStore},
//!     enrichment::{ChatFeatureService, FeatureEnricher},
//!     model::PaceModel,
//!     recommend::PacePredictor,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> tempo_run::Result<()> {
//! let service = ChatFeatureService::new("https://api.groq.com/openai/v1", "llama3-8b-8192", None);
//! let predictor = PacePredictor::from_stores(
//!     &JsonFileStore::<Vec<CondensedRecord>>::new("condensed_training_data.json"),
//!     &JsonFileStore::<PaceModel>::new("pace_model.json"),
//!     FeatureEnricher::new(Arc::new(service)),
//! )?;
//!
//! let recommendation = predictor.recommend("Titanium - David Guetta", Some(5.0)).await?;
//! if let Some(verdict) = recommendation.verdict {
//!     println!("{}", verdict.advice());
//! }
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod predictor;

pub use classify::{PaceMatch, PACE_MATCH_TOLERANCE};
pub use predictor::{PaceEstimate, PacePredictor, PaceSource, Recommendation};
