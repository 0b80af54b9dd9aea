//! Resilient JSONL reading.
//!
//! Reads a JSONL file line by line, deserializing each non-empty line into
//! `T`. Lines that fail to parse are collected as [`Warning`]s instead of
//! aborting the load, so one corrupted record does not make the whole file
//! unreadable.

use crate::error::Result;
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Read a JSONL file, skipping malformed lines.
///
/// Returns the successfully parsed records together with a warning for each
/// line that was skipped. Empty lines (after trimming) are ignored silently.
///
/// # Errors
///
/// Returns an error only if the file itself cannot be opened or read; parse
/// failures never abort the load.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    let mut lines = BufReader::new(file).lines();

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(trimmed) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line_number, error = %e, "skipping malformed JSONL line");
                warnings.push(Warning::MalformedJson {
                    line_number,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok((records, warnings))
}
