//! # Pace Model Module
//!
//! Random-forest regression from (tempo, danceability, energy) to the
//! average pace runners hold while a song plays.
//!
//! ## Core Features
//!
//! - **Regression trees**: CART with squared-error splits, stored as a flat arena
//! - **Bagging**: bootstrap-sampled trees grown in parallel with rayon
//! - **Evaluation**: seeded 80/20 hold-out with R² and MSE
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tempo_run::{config::TrainingConfig, data::SongFeatures, model::RegressionTrainer};
//!
//! # fn main() -> tempo_run::Result<()> {
//! # let table: Vec<tempo_run::data::CondensedRecord> = Vec::new();
//! let trainer = RegressionTrainer::new(TrainingConfig::default());
//! let model = trainer.train(&table)?;
//!
//! let pace = model.predict(&SongFeatures { tempo: Some(128.0), ..Default::default() });
//! println!("R^2 {:.3}, predicted pace {:.2}", model.report.r2, pace);
//! # Ok(())
//! # }
//! ```

pub mod forest;
pub mod metrics;
pub mod split;
pub mod trainer;
pub mod tree;

/// One model input: tempo, danceability, energy
pub type FeatureRow = [f64; 3];

pub use forest::{ForestParams, RandomForest};
pub use metrics::{mean_squared_error, r2_score};
pub use split::{train_test_split, TrainTestSplit};
pub use trainer::{PaceModel, RegressionTrainer, TrainingReport, MIN_TRAINING_ROWS};
pub use tree::{RegressionTree, TreeParams};
