use std::collections::HashMap;

use crate::{
    data::types::{AggregatedSong, Observation},
    error::{DataError, Result},
};

/// Groups raw observations by song identity and summarizes their paces
pub struct Aggregator;

#[derive(Default)]
struct PaceAccumulator {
    paces: Vec<f64>,
}

impl PaceAccumulator {
    fn mean(&self) -> f64 {
        self.paces.iter().sum::<f64>() / self.paces.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator)
    fn sample_std(&self, mean: f64) -> Option<f64> {
        let n = self.paces.len();
        if n < 2 {
            return None;
        }

        let sum_sq: f64 = self.paces.iter().map(|p| (p - mean).powi(2)).sum();
        Some((sum_sq / (n - 1) as f64).sqrt())
    }
}

impl Aggregator {
    /// Aggregate observations into one row per (track id, song name) pair
    ///
    /// Groups are emitted in the order they are first seen.
    pub fn aggregate(observations: &[Observation]) -> Result<Vec<AggregatedSong>> {
        if observations.is_empty() {
            return Err(DataError::EmptyInput { what: "training data".to_string() }.into());
        }

        let mut order: Vec<(String, String)> = Vec::new();
        let mut groups: HashMap<(String, String), PaceAccumulator> = HashMap::new();

        for (index, obs) in observations.iter().enumerate() {
            Self::validate(index, obs)?;

            let key = (obs.track_id.clone(), obs.song_name.clone());
            let group = groups.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                PaceAccumulator::default()
            });
            group.paces.push(obs.pace);
        }

        let songs: Vec<AggregatedSong> = order
            .into_iter()
            .filter_map(|key| {
                let acc = groups.remove(&key)?;
                let avg_pace = acc.mean();
                Some(AggregatedSong {
                    pace_std: acc.sample_std(avg_pace),
                    count: acc.paces.len(),
                    avg_pace,
                    track_id: key.0,
                    song_name: key.1,
                })
            })
            .collect();

        tracing::debug!(
            "Aggregated {} observations into {} songs",
            observations.len(),
            songs.len()
        );

        Ok(songs)
    }

    fn validate(index: usize, obs: &Observation) -> Result<()> {
        if obs.track_id.trim().is_empty() {
            return Err(DataError::MissingField { index, field: "trackId".to_string() }.into());
        }

        if obs.song_name.trim().is_empty() {
            return Err(DataError::MissingField { index, field: "songName".to_string() }.into());
        }

        if !obs.pace.is_finite() {
            return Err(DataError::InvalidValue {
                index,
                field: "pace".to_string(),
                value: obs.pace.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaceError;

    fn find<'a>(songs: &'a [AggregatedSong], track: &str, name: &str) -> &'a AggregatedSong {
        songs
            .iter()
            .find(|s| s.track_id == track && s.song_name == name)
            .expect("group present")
    }

    #[test]
    fn test_groups_by_track_and_name() {
        let observations = vec![
            Observation::new("t1", "Run - Foo Fighters", 3.0),
            Observation::new("t2", "Stronger - Kanye West", 2.5),
            Observation::new("t1", "Run - Foo Fighters", 3.4),
            Observation::new("t1", "Run - Foo Fighters", 3.2),
            // Same name, different track id: a distinct group
            Observation::new("t9", "Run - Foo Fighters", 4.0),
        ];

        let songs = Aggregator::aggregate(&observations).unwrap();
        assert_eq!(songs.len(), 3);

        let run = find(&songs, "t1", "Run - Foo Fighters");
        assert_eq!(run.count, 3);
        assert!((run.avg_pace - 3.2).abs() < 1e-12);
        assert!((run.pace_std.unwrap() - 0.2).abs() < 1e-12);

        let other = find(&songs, "t9", "Run - Foo Fighters");
        assert_eq!(other.count, 1);
        assert_eq!(other.avg_pace, 4.0);
    }

    #[test]
    fn test_single_observation_has_no_std() {
        let songs = Aggregator::aggregate(&[Observation::new("t1", "A - B", 2.75)]).unwrap();
        assert_eq!(songs[0].count, 1);
        assert_eq!(songs[0].pace_std, None);
    }

    #[test]
    fn test_mean_matches_members() {
        let paces = [2.0, 2.5, 4.0, 3.1, 2.2, 3.9];
        let observations: Vec<Observation> = paces
            .iter()
            .enumerate()
            .map(|(i, &p)| Observation::new(format!("t{}", i % 2), format!("Song {} - X", i % 2), p))
            .collect();

        let songs = Aggregator::aggregate(&observations).unwrap();
        assert_eq!(songs.len(), 2);

        for song in &songs {
            let members: Vec<f64> = observations
                .iter()
                .filter(|o| o.track_id == song.track_id && o.song_name == song.song_name)
                .map(|o| o.pace)
                .collect();
            let expected = members.iter().sum::<f64>() / members.len() as f64;
            assert!((song.avg_pace - expected).abs() < 1e-12);
            assert_eq!(song.count, members.len());
        }
    }

    #[test]
    fn test_empty_input_is_data_error() {
        let result = Aggregator::aggregate(&[]);
        assert!(matches!(result, Err(PaceError::Data(DataError::EmptyInput { .. }))));
    }

    #[test]
    fn test_blank_song_name_is_missing_field() {
        let result = Aggregator::aggregate(&[
            Observation::new("t1", "A - B", 3.0),
            Observation::new("t2", "  ", 3.0),
        ]);

        match result {
            Err(PaceError::Data(DataError::MissingField { index, field })) => {
                assert_eq!(index, 1);
                assert_eq!(field, "songName");
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_nan_pace_rejected() {
        let result = Aggregator::aggregate(&[Observation::new("t1", "A - B", f64::NAN)]);
        assert!(matches!(result, Err(PaceError::Data(DataError::InvalidValue { .. }))));
    }
}
