#[cfg(feature = "csv")]
/// This module provides a CSV item reader and writer for `;` delimited batch files.
pub mod csv;

/// In-memory item reader and writer, used when rows are already loaded.
pub mod memory;
