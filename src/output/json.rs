//! JSON serialization of collected stories

use crate::crawler::ArticleRecord;
use crate::HarvestError;
use std::fs;
use std::path::Path;

/// Writes the collected records as a pretty-printed JSON array.
///
/// Output is UTF-8 with non-ASCII characters preserved as-is; the
/// indentation is cosmetic.
///
/// # Arguments
///
/// * `path` - Destination file, overwritten if it exists
/// * `records` - The run's records, already in their final order
pub fn write_stories(path: &Path, records: &[ArticleRecord]) -> Result<(), HarvestError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}
