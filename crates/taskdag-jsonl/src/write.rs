//! Atomic JSONL writing.
//!
//! Writes go to a temporary `.tmp` sibling first and are renamed into place
//! once fully flushed. On POSIX systems the rename is atomic, so a crash
//! mid-write leaves the original file intact.

use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Atomically write a slice of values to a JSONL file.
///
/// Each value is serialized onto its own line. The target file is either
/// fully replaced or left unchanged; it is never observed half-written.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, a value fails
/// to serialize, or the final rename fails. On failure the original file is
/// untouched (a stale `.tmp` file may remain).
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    let file = File::create(&temp_path).await?;
    let mut writer = BufWriter::new(file);

    for value in values {
        let json = serde_json::to_string(value)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    drop(writer);

    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}
