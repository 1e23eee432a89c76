//! # Tempo-Run
//!
//! Learn which songs make runners faster or slower, and recommend songs
//! that match a desired running pace.
//!
//! Runners' apps report (song, pace) observations. The library keeps them in
//! an append-only log, condenses them into one row per song, enriches each
//! song with audio features from a generative model, and fits a random
//! forest that predicts average pace from those features.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tempo_run::{
//!     config::Config,
//!     data::{CondensedRecord, JsonFileStore},
//!     model::PaceModel,
//!     pipeline::PaceEngine,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let engine = PaceEngine::from_config(config.clone());
//!
//! let condensed = JsonFileStore::<Vec<CondensedRecord>>::new(&config.storage.condensed);
//! let model = JsonFileStore::<PaceModel>::new(&config.storage.model);
//!
//! let recommendation = engine
//!     .recommend(&condensed, &model, "Eye of the Tiger - Survivor", Some(5.0))
//!     .await?;
//! println!("{:.2} ({})", recommendation.estimate.pace, recommendation.estimate.source);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`data`] - Record types and the store interface
//! - [`pipeline`] - Aggregation, listing and the stage engine
//! - [`enrichment`] - Feature generation with retries
//! - [`model`] - Random-forest pace regression
//! - [`recommend`] - Lookup-or-predict and pace matching
//! - [`config`] - Configuration management

pub mod config;
pub mod data;
pub mod enrichment;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod recommend;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{PaceError, Result},
    pipeline::PaceEngine,
    recommend::{PaceMatch, PacePredictor, Recommendation},
};
