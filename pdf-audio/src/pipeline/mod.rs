//! Conversion pipeline: document → chunks → synthesis → one growing MP3.
//!
//! A [`Pipeline`] walks through these states:
//!
//! ```text
//! Idle ─select_document─▶ Extracting ─ok + folder─▶ Ready ─convert─▶ Converting{i}
//!   ▲                          │                                      │      │
//!   └──────── error ───────────┘                        all chunks ◀──┘      └─▶ Failed
//!                                                        Succeeded
//! ```
//!
//! `Succeeded` and `Failed` accept another `convert`, which starts again at
//! chunk 0 and appends to the same destination file. Chunks are processed one
//! at a time; a failing chunk stops the run and whatever was already appended
//! stays in the file.

mod converter;
mod error;
pub mod status;

pub use converter::process_chunk;
pub use error::PipelineError;
pub use status::{StatusEvent, StatusSink};

use crate::audio::{AppendWriter, create_destination};
use crate::document::{self, Document, ExtractionError};
use crate::text::{self, TextChunk};
use speech_client::SpeechProvider;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a pipeline is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Extracting,
    Ready,
    Converting { chunk_index: usize, total: usize },
    Succeeded,
    Failed { message: String },
}

impl PipelineState {
    /// Whether a convert request is accepted in this state.
    pub fn accepts_convert(&self) -> bool {
        matches!(self, Self::Ready | Self::Succeeded | Self::Failed { .. })
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Extracting => write!(f, "extracting"),
            Self::Ready => write!(f, "ready"),
            Self::Converting { chunk_index, total } => {
                write!(f, "converting chunk {}/{}", chunk_index + 1, total)
            }
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed { message } => write!(f, "failed ({})", message),
        }
    }
}

/// Settings fixed for the lifetime of a pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Maximum characters per synthesis call
    pub chunk_size: NonZeroUsize,
    /// Directory for per-chunk scratch files
    pub scratch_dir: PathBuf,
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub destination: PathBuf,
    pub chunks: usize,
    /// Bytes appended by this run
    pub bytes: u64,
}

/// Drives one document through extraction and conversion.
pub struct Pipeline {
    config: RunConfig,
    provider: Arc<dyn SpeechProvider>,
    sink: Arc<dyn StatusSink>,
    state: PipelineState,
    document: Option<Document>,
    output_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(
        config: RunConfig,
        provider: Arc<dyn SpeechProvider>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            config,
            provider,
            sink,
            state: PipelineState::Idle,
            document: None,
            output_dir: None,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Select a PDF and extract its text on a blocking thread.
    pub async fn select_document(&mut self, path: &Path) -> Result<&Document, PipelineError> {
        self.state = PipelineState::Extracting;
        self.document = None;

        let owned = path.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || document::extract_text(&owned))
            .await
            .unwrap_or_else(|e| Err(ExtractionError::new(path, e)));

        match extracted {
            Ok(doc) => Ok(self.accept_document(doc)),
            Err(e) => {
                log::debug!("Extraction failed: {}", e);
                self.state = PipelineState::Idle;
                self.sink.report(StatusEvent::Failed {
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Select the folder the MP3 is written to.
    pub fn select_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output_dir = Some(dir.into());
        if self.state == PipelineState::Idle && self.document.is_some() {
            self.state = PipelineState::Ready;
        }
    }

    fn accept_document(&mut self, doc: Document) -> &Document {
        log::debug!(
            "Extracted {} characters from {}",
            doc.char_count(),
            doc.path.display()
        );
        self.sink.report(StatusEvent::Extracted {
            characters: doc.char_count(),
        });
        self.state = if self.output_dir.is_some() {
            PipelineState::Ready
        } else {
            PipelineState::Idle
        };
        self.document.insert(doc)
    }

    /// Convert the selected document, chunk by chunk.
    pub async fn convert(&mut self) -> Result<ConversionReport, PipelineError> {
        if !self.state.accepts_convert() {
            return Err(PipelineError::NotReady(format!(
                "pipeline is {}",
                self.state
            )));
        }

        let (chunks, file_name) = match &self.document {
            Some(doc) if doc.text.is_empty() => return Err(PipelineError::EmptyText),
            Some(doc) => (
                text::split_document(&doc.text, self.config.chunk_size),
                doc.output_file_name(),
            ),
            None => return Err(PipelineError::NotReady("no document selected".into())),
        };
        let output_dir = self
            .output_dir
            .clone()
            .ok_or_else(|| PipelineError::NotReady("no output folder selected".into()))?;

        self.sink.report(StatusEvent::Chunked {
            chunks: chunks.len(),
        });
        self.state = PipelineState::Converting {
            chunk_index: 0,
            total: chunks.len(),
        };

        let result = self.run_chunks(&chunks, &output_dir, &file_name).await;

        match &result {
            Ok(report) => {
                log::info!(
                    "Converted {} chunks into {} ({} bytes)",
                    report.chunks,
                    report.destination.display(),
                    report.bytes
                );
                self.state = PipelineState::Succeeded;
                self.sink.report(StatusEvent::Succeeded {
                    destination: report.destination.clone(),
                    bytes: report.bytes,
                });
            }
            Err(e) => {
                if let Some(chunk) = e.chunk() {
                    log::debug!("Run stopped at chunk {}", chunk);
                }
                let message = e.to_string();
                self.state = PipelineState::Failed {
                    message: message.clone(),
                };
                self.sink.report(StatusEvent::Failed { message });
            }
        }

        result
    }

    async fn run_chunks(
        &mut self,
        chunks: &[TextChunk],
        output_dir: &Path,
        file_name: &str,
    ) -> Result<ConversionReport, PipelineError> {
        let destination = create_destination(output_dir, file_name)
            .await
            .map_err(PipelineError::Destination)?;
        let mut writer = AppendWriter::open(&destination)
            .await
            .map_err(PipelineError::Destination)?;
        log::debug!("Appending to {}", writer.path().display());

        let total = chunks.len();
        for chunk in chunks {
            self.state = PipelineState::Converting {
                chunk_index: chunk.index,
                total,
            };
            self.sink.report(StatusEvent::ChunkStarted {
                index: chunk.index,
                total,
            });

            let appended = process_chunk(
                self.provider.as_ref(),
                &mut writer,
                &self.config.scratch_dir,
                chunk,
            )
            .await?;
            log::debug!(
                "Chunk {}/{}: {} chars, {} bytes ({} total)",
                chunk.index + 1,
                total,
                chunk.char_len(),
                appended,
                writer.bytes_written()
            );

            self.sink.report(StatusEvent::ChunkSaved {
                index: chunk.index,
                total,
                file_name: file_name.to_string(),
            });
        }

        let bytes = writer.close().await.map_err(PipelineError::Finalize)?;

        Ok(ConversionReport {
            destination,
            chunks: total,
            bytes,
        })
    }
}
