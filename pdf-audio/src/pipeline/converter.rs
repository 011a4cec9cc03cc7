//! One chunk through the synthesize → append sequence.

use super::PipelineError;
use crate::audio::{AppendWriter, ScratchFile};
use crate::text::TextChunk;
use speech_client::{SpeechProvider, SynthesisResult};
use std::path::Path;

/// Synthesize `chunk` into a fresh scratch file and append it to `writer`.
///
/// The scratch file exists only for this call. Nothing is appended unless the
/// provider reports Completed. Returns the number of bytes appended.
pub async fn process_chunk(
    provider: &dyn SpeechProvider,
    writer: &mut AppendWriter,
    scratch_dir: &Path,
    chunk: &TextChunk,
) -> Result<u64, PipelineError> {
    let number = chunk.index + 1;
    let scratch = ScratchFile::create(scratch_dir, chunk.index).map_err(PipelineError::Scratch)?;

    let outcome = provider
        .synthesize(&chunk.text, scratch.path())
        .await
        .map_err(|source| PipelineError::Synthesis {
            chunk: number,
            source,
        })?;

    match outcome {
        SynthesisResult::Completed { bytes_written } => {
            let appended = writer
                .append_from(scratch.path())
                .await
                .map_err(|source| PipelineError::AppendIo {
                    chunk: number,
                    source,
                })?;

            if appended != bytes_written {
                log::warn!(
                    "Chunk {}: provider reported {} bytes, appended {}",
                    number,
                    bytes_written,
                    appended
                );
            }

            if let Err(e) = scratch.remove() {
                log::warn!("Failed to remove scratch file for chunk {}: {}", number, e);
            }

            Ok(appended)
        }
        SynthesisResult::Canceled { detail } => Err(PipelineError::SynthesisCanceled {
            chunk: number,
            detail,
        }),
        SynthesisResult::Unexpected { reason } => {
            log::debug!("Chunk {} unexpected result: {}", number, reason);
            Err(PipelineError::SynthesisUnexpected {
                chunk: number,
                reason,
            })
        }
    }
}
