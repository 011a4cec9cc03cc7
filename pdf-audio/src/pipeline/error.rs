//! Pipeline errors.

use crate::document::ExtractionError;
use speech_client::SpeechError;
use std::io;
use thiserror::Error;

/// Anything that stops a conversion run. Chunk numbers are 1-based.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Not ready to convert: {0}")]
    NotReady(String),

    #[error("No text extracted from PDF")]
    EmptyText,

    #[error("Failed at chunk {chunk}: {detail}")]
    SynthesisCanceled { chunk: usize, detail: String },

    #[error("Unexpected result at chunk {chunk}")]
    SynthesisUnexpected { chunk: usize, reason: String },

    #[error("Speech client failed at chunk {chunk}: {source}")]
    Synthesis { chunk: usize, source: SpeechError },

    #[error("Failed to append chunk {chunk} to output: {source}")]
    AppendIo { chunk: usize, source: io::Error },

    #[error("Failed to create file in selected folder: {0}")]
    Destination(#[source] io::Error),

    #[error("Failed to finish writing output: {0}")]
    Finalize(#[source] io::Error),

    #[error("Failed to prepare scratch file: {0}")]
    Scratch(#[source] io::Error),
}

impl PipelineError {
    /// The chunk number this error belongs to, if any
    pub fn chunk(&self) -> Option<usize> {
        match self {
            Self::SynthesisCanceled { chunk, .. }
            | Self::SynthesisUnexpected { chunk, .. }
            | Self::Synthesis { chunk, .. }
            | Self::AppendIo { chunk, .. } => Some(*chunk),
            _ => None,
        }
    }
}
