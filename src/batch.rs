//! Batch loading from a delimited file.
//!
//! Row 0 is a header and is skipped. Every later row needs at least `id, display_name,
//! target_ref`; extra fields are ignored. Rows with fewer fields (blank lines included) are
//! dropped without an error. That is a deliberate policy, not a parse failure: a partially
//! filled lead sheet still runs. No quoting or escaping is interpreted.

use log::debug;
use std::path::Path;

use crate::pipeline::RunError;
use crate::utils::config::MIN_BATCH_FIELDS;
use crate::{Batch, Record};

/// Parse batch text. Positions are assigned in row order over the rows that were kept.
pub fn parse_batch(text: &str, delimiter: char) -> Batch {
    let mut batch = Batch::new();
    let mut skipped = 0_usize;
    for line in text.lines().skip(1) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() < MIN_BATCH_FIELDS {
            skipped += 1;
            continue;
        }
        batch.push(Record::new(batch.len(), fields[0], fields[1], fields[2]));
    }
    if skipped > 0 {
        debug!("Skipped {} row(s) with fewer than {} fields", skipped, MIN_BATCH_FIELDS);
    }
    batch
}

/// Read and parse the batch file. An unreadable file aborts the run.
pub fn load_batch(path: &Path, delimiter: char) -> Result<Batch, RunError> {
    let text = std::fs::read_to_string(path).map_err(|source| RunError::BatchLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let batch = parse_batch(&text, delimiter);
    debug!("Loaded {} record(s) from {}", batch.len(), path.display());
    Ok(batch)
}
