//! Audio output: the growing destination file and per-chunk scratch files.

pub mod appender;
mod scratch;

pub use appender::{AppendWriter, create_destination};
pub use scratch::{ScratchFile, scratch_dir};
