use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest |estimated - desired| still counted as a match, in pace units
pub const PACE_MATCH_TOLERANCE: f64 = 0.1;

/// How an estimated pace compares to the runner's desired pace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaceMatch {
    /// Close enough to queue the song
    Matches,

    /// The song tends to push runners above the desired pace
    FasterThanDesired,

    /// The song tends to hold runners below the desired pace
    SlowerThanDesired,
}

impl PaceMatch {
    /// Compare an estimate against a desired pace
    pub fn classify(estimated: f64, desired: f64) -> Self {
        let diff = estimated - desired;
        if diff.abs() < PACE_MATCH_TOLERANCE {
            Self::Matches
        } else if diff > 0.0 {
            Self::FasterThanDesired
        } else {
            Self::SlowerThanDesired
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matches => "matches",
            Self::FasterThanDesired => "faster-than-desired",
            Self::SlowerThanDesired => "slower-than-desired",
        }
    }

    /// Advice shown to the runner
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Matches => "This song closely matches your desired pace. Queue it!",
            Self::FasterThanDesired => {
                "This song is predicted to be faster than your desired pace (it may help you run faster)."
            }
            Self::SlowerThanDesired => {
                "This song is predicted to be slower than your desired pace (it may help you run slower)."
            }
        }
    }
}

impl fmt::Display for PaceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_examples() {
        assert_eq!(PaceMatch::classify(5.05, 5.0), PaceMatch::Matches);
        assert_eq!(PaceMatch::classify(6.0, 5.0), PaceMatch::FasterThanDesired);
        assert_eq!(PaceMatch::classify(4.0, 5.0), PaceMatch::SlowerThanDesired);
    }

    #[test]
    fn test_tolerance_boundary() {
        assert_eq!(PaceMatch::classify(4.95, 5.0), PaceMatch::Matches);
        assert_eq!(PaceMatch::classify(5.2, 5.0), PaceMatch::FasterThanDesired);
        assert_eq!(PaceMatch::classify(4.8, 5.0), PaceMatch::SlowerThanDesired);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PaceMatch::FasterThanDesired.to_string(), "faster-than-desired");
        assert_eq!(
            serde_json::to_string(&PaceMatch::SlowerThanDesired).unwrap(),
            "\"slower-than-desired\""
        );
        assert!(PaceMatch::Matches.advice().contains("Queue it"));
    }
}
