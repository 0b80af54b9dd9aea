//! User-facing command implementations.

pub mod init;
