use async_trait::async_trait;

use crate::{data::types::SongFeatures, error::ServiceError};

/// Capability to generate semantic audio features for one song
///
/// Implementations talk to a generative model (see
/// [`ChatFeatureService`](super::ChatFeatureService)) or, in tests, replay
/// scripted answers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeatureService: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Generate features for a song identified by title and artist
    ///
    /// An empty record is a valid answer; the caller decides whether to retry.
    async fn generate_features(&self, title: &str, artist: &str) -> Result<SongFeatures, ServiceError>;
}
