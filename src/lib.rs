//! Multi-source lyrics resolution: reads track identity from audio tags,
//! tries an ordered chain of lyrics providers, and writes the result as an
//! LRC file and/or embedded tag.

pub mod batch;
pub mod config;
pub mod errors;
pub mod lyrics;
pub mod providers;
pub mod tags;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{LyricsFinderError, Result};
