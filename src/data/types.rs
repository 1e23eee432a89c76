use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Names of the numeric predictors, in model input order
pub const FEATURE_NAMES: [&str; 3] = ["bpm", "danceability", "energy"];

/// One recorded (song, pace) data point from a run session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Streaming-service track identifier
    #[serde(rename = "trackId")]
    pub track_id: String,

    /// Song name in the form "Title - Artist"
    #[serde(rename = "songName")]
    pub song_name: String,

    /// Pace measured while the song played
    pub pace: f64,
}

impl Observation {
    pub fn new(track_id: impl Into<String>, song_name: impl Into<String>, pace: f64) -> Self {
        Self {
            track_id: track_id.into(),
            song_name: song_name.into(),
            pace,
        }
    }
}

/// Per-song statistical summary of its observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSong {
    #[serde(rename = "trackId")]
    pub track_id: String,

    #[serde(rename = "songName")]
    pub song_name: String,

    /// Arithmetic mean of the observed paces
    pub avg_pace: f64,

    /// Sample standard deviation; `None` for a single observation
    #[serde(default)]
    pub pace_std: Option<f64>,

    /// Number of observations, always at least one
    pub count: usize,
}

/// Semantic audio descriptors for a song
///
/// Every field is optional. A record with no fields at all is the "empty"
/// record produced when enrichment fails or is skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongFeatures {
    /// Tempo in beats per minute
    #[serde(rename = "bpm", alias = "tempo", default)]
    pub tempo: Option<f64>,

    /// How danceable the song is (0.0-1.0)
    #[serde(default)]
    pub danceability: Option<f64>,

    /// Energy level of the song (0.0-1.0)
    #[serde(default)]
    pub energy: Option<f64>,

    /// Short description of the mood
    #[serde(default)]
    pub mood: Option<String>,

    /// General genre label
    #[serde(default)]
    pub genre: Option<String>,
}

impl SongFeatures {
    /// The empty record
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.tempo.is_none()
            && self.danceability.is_none()
            && self.energy.is_none()
            && self.mood.is_none()
            && self.genre.is_none()
    }

    /// Model input vector, substituting 0 for missing values
    pub fn numeric_vector(&self) -> [f64; 3] {
        [
            self.tempo.unwrap_or(0.0),
            self.danceability.unwrap_or(0.0),
            self.energy.unwrap_or(0.0),
        ]
    }

    /// Check value ranges of the numeric fields that are present
    pub fn validate(&self) -> Result<(), ServiceError> {
        if let Some(tempo) = self.tempo {
            if !tempo.is_finite() || tempo <= 0.0 {
                return Err(ServiceError::InvalidFeature {
                    field: "bpm".to_string(),
                    value: tempo.to_string(),
                });
            }
        }

        for (field, value) in [("danceability", self.danceability), ("energy", self.energy)] {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ServiceError::InvalidFeature {
                        field: field.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// One row of the training/lookup table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedRecord {
    #[serde(flatten)]
    pub song: AggregatedSong,

    #[serde(flatten)]
    pub features: SongFeatures,
}

impl CondensedRecord {
    pub fn new(song: AggregatedSong, features: SongFeatures) -> Self {
        Self { song, features }
    }

    pub fn song_name(&self) -> &str {
        &self.song.song_name
    }

    pub fn avg_pace(&self) -> f64 {
        self.song.avg_pace
    }
}

/// Entry of the top-songs listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSong {
    #[serde(rename = "songName")]
    pub song_name: String,
    pub avg_pace: f64,
    pub count: usize,
}

impl From<&CondensedRecord> for TopSong {
    fn from(record: &CondensedRecord) -> Self {
        Self {
            song_name: record.song.song_name.clone(),
            avg_pace: record.song.avg_pace,
            count: record.song.count,
        }
    }
}
