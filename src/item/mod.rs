#[cfg(feature = "logger")]
/// This module provides logging item writer and listeners, useful for debugging.
pub mod logger;

#[cfg(feature = "flat-file")]
/// This module provides a line-oriented flat-file item reader and writer.
pub mod flat_file;

/// This module provides an in-memory item reader.
pub mod vec;
