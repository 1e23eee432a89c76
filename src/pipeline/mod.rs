//! # Pipeline Module
//!
//! Batch stages that turn the raw observation log into a condensed,
//! feature-enriched table and a trained pace model.
//!
//! ## Core Features
//!
//! - **Aggregation**: per-song mean, sample standard deviation and count
//! - **Listing**: most-observed songs from the condensed table
//! - **Engine**: ingest, condense, train and recommend over explicit stores
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tempo_run::{
//!     config::Config,
//!     data::{CondensedRecord, JsonFileStore, Observation},
//!     model::PaceModel,
//!     pipeline::PaceEngine,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> tempo_run::Result<()> {
//! let config = Config::default();
//! let observations = JsonFileStore::<Vec<Observation>>::new(&config.storage.observations);
//! let condensed = JsonFileStore::<Vec<CondensedRecord>>::new(&config.storage.condensed);
//! let model = JsonFileStore::<PaceModel>::new(&config.storage.model);
//!
//! let engine = PaceEngine::from_config(config.clone());
//! engine.condense(&observations, &condensed).await?;
//! let report = engine.train(&condensed, &model)?;
//! println!("R^2 {:.3}", report.r2);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod engine;
pub mod listing;

pub use aggregator::Aggregator;
pub use engine::{CondenseSummary, PaceEngine};
pub use listing::top_songs;
