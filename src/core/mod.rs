/// Item reader, processor and writer traits
pub mod item;

/// Chunk-oriented step and its builder
pub mod step;

/// Unit of work spanning a whole batch
pub mod transaction;
