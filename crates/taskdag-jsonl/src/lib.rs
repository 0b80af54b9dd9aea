//! JSONL (JSON Lines) persistence utilities for taskdag.
//!
//! Provides resilient line-by-line reading (malformed lines become warnings
//! rather than hard failures) and crash-safe atomic writes using the
//! temp-file-then-rename pattern.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod read;
pub mod warning;
pub mod write;

pub use error::{Error, Result};
pub use read::read_jsonl_resilient;
pub use warning::Warning;
pub use write::write_jsonl_atomic;
