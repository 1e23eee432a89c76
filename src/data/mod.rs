//! # Data Module
//!
//! Typed records for every table the pipeline touches, plus the narrow
//! storage interface used to load and save them wholesale.
//!
//! ## Tables
//!
//! - **Observations**: append-only log of raw (song, pace) points
//! - **Condensed table**: one [`CondensedRecord`] per distinct song
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tempo_run::data::{CondensedRecord, JsonFileStore, Store};
//!
//! # fn main() -> tempo_run::Result<()> {
//! let store = JsonFileStore::<Vec<CondensedRecord>>::new("condensed_training_data.json");
//! let table = store.load()?;
//! println!("{} songs", table.len());
//! # Ok(())
//! # }
//! ```

pub mod observations;
pub mod store;
pub mod types;

pub use observations::{append_observations, parse_observation_batch};
pub use store::{JsonFileStore, MemoryStore, Store};
pub use types::{
    AggregatedSong, CondensedRecord, Observation, SongFeatures, TopSong, FEATURE_NAMES,
};
