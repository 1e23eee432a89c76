use tracing::{debug, info};

use crate::{
    data::{store::Store, types::Observation},
    error::{DataError, Result},
};

/// Parse an ingestion payload: a JSON array of observation objects
pub fn parse_observation_batch(payload: &str) -> Result<Vec<Observation>> {
    let value: serde_json::Value = serde_json::from_str(payload).map_err(|e| DataError::Malformed {
        source_name: "observation batch".to_string(),
        reason: e.to_string(),
    })?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(DataError::Malformed {
                source_name: "observation batch".to_string(),
                reason: "Data must be a JSON array.".to_string(),
            }
            .into())
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Observation>(item).map_err(|e| {
                DataError::Malformed {
                    source_name: format!("observation {}", index),
                    reason: e.to_string(),
                }
                .into()
            })
        })
        .collect()
}

/// Append a batch to the observation log, creating the log if absent
///
/// Returns the total number of observations stored after the append.
pub fn append_observations(
    store: &dyn Store<Vec<Observation>>,
    batch: Vec<Observation>,
) -> Result<usize> {
    let mut existing = store.load_or_default()?;
    debug!("Observation log {} holds {} rows", store.describe(), existing.len());

    let added = batch.len();
    existing.extend(batch);
    store.save(&existing)?;

    info!("Appended {} observations to {} ({} total)", added, store.describe(), existing.len());
    Ok(existing.len())
}
