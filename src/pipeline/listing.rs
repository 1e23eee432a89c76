use crate::{
    data::types::{CondensedRecord, TopSong},
    error::{DataError, Result},
};

/// Most-observed songs in the condensed table
///
/// Sorted by observation count, highest first; ties keep table order.
pub fn top_songs(records: &[CondensedRecord], n: usize) -> Result<Vec<TopSong>> {
    if records.is_empty() {
        return Err(DataError::EmptyInput { what: "training data".to_string() }.into());
    }

    let mut ranked: Vec<&CondensedRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.song.count.cmp(&a.song.count));

    Ok(ranked.into_iter().take(n).map(TopSong::from).collect())
}
