//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    data::types::{AggregatedSong, CondensedRecord, SongFeatures},
    enrichment::FeatureService,
    error::ServiceError,
};

type Reply = Result<SongFeatures, ServiceError>;

/// Feature service that replays a script of replies
pub struct ScriptedService {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedService {
    /// Answer every request with the same reply
    pub fn always(reply: Reply) -> Self {
        Self::build(VecDeque::new(), reply)
    }

    /// Answer with `replies` in order, then with empty records
    pub fn sequence(replies: Vec<Reply>) -> Self {
        Self::build(replies.into(), Ok(SongFeatures::empty()))
    }

    fn build(script: VecDeque<Reply>, fallback: Reply) -> Self {
        Self {
            script: Mutex::new(script),
            fallback,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn features(tempo: f64) -> SongFeatures {
        SongFeatures {
            tempo: Some(tempo),
            danceability: Some(0.5),
            energy: Some(0.5),
            mood: Some("driving".to_string()),
            genre: Some("rock".to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeatureService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate_features(&self, title: &str, artist: &str) -> Result<SongFeatures, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((title.to_string(), artist.to_string()));

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Condensed record with the given features and pace
pub fn condensed(name: &str, avg_pace: f64, count: usize, tempo: f64, danceability: f64, energy: f64) -> CondensedRecord {
    CondensedRecord::new(
        AggregatedSong {
            track_id: format!("track-{}", name.to_lowercase().replace(' ', "-")),
            song_name: name.to_string(),
            avg_pace,
            pace_std: None,
            count,
        },
        SongFeatures {
            tempo: Some(tempo),
            danceability: Some(danceability),
            energy: Some(energy),
            mood: None,
            genre: None,
        },
    )
}

/// Table where pace rises linearly with tempo
pub fn tempo_driven_table(rows: usize) -> Vec<CondensedRecord> {
    (0..rows)
        .map(|i| {
            let tempo = 80.0 + i as f64 * 5.0;
            condensed(
                &format!("Song {} - Artist {}", i, i % 7),
                1.5 + tempo / 60.0,
                1 + i % 4,
                tempo,
                (i % 10) as f64 / 10.0,
                ((i * 3) % 10) as f64 / 10.0,
            )
        })
        .collect()
}
