//! Status reporting from the conversion task to whoever displays it.

use std::path::PathBuf;
use tokio::sync::mpsc;

/// A pipeline transition worth showing to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Text extraction finished
    Extracted { characters: usize },
    /// The document was split and conversion is starting
    Chunked { chunks: usize },
    /// Chunk `index` (0-based) is being synthesized
    ChunkStarted { index: usize, total: usize },
    /// Chunk `index` (0-based) was appended to the output
    ChunkSaved {
        index: usize,
        total: usize,
        file_name: String,
    },
    /// The whole document was converted
    Succeeded { destination: PathBuf, bytes: u64 },
    /// The run stopped
    Failed { message: String },
}

impl StatusEvent {
    /// Human-readable status line.
    pub fn message(&self) -> String {
        match self {
            Self::Extracted { characters } => format!("Text extracted: {} characters", characters),
            Self::Chunked { chunks } => format!("Processing {} chunks...", chunks),
            Self::ChunkStarted { index, total } => {
                format!("Processing chunk {}/{}...", index + 1, total)
            }
            Self::ChunkSaved {
                index,
                total,
                file_name,
            } => format!("Chunk {}/{} saved to {}", index + 1, total, file_name),
            Self::Succeeded { .. } => "Success! Conversion done!".to_string(),
            Self::Failed { message } => format!("Error: {}", message),
        }
    }
}

/// Receives status events. Implementations must not block.
pub trait StatusSink: Send + Sync {
    fn report(&self, event: StatusEvent);
}

/// Forwards events to a foreground task over an unbounded channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl StatusSink for ChannelSink {
    fn report(&self, event: StatusEvent) {
        // Display is optional; a closed receiver must not affect the run
        let _ = self.tx.send(event);
    }
}

/// Create a sink and the receiver that drains it.
pub fn channel() -> (ChannelSink, mpsc::UnboundedReceiver<StatusEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            StatusEvent::Extracted { characters: 7000 }.message(),
            "Text extracted: 7000 characters"
        );
        assert_eq!(
            StatusEvent::Chunked { chunks: 3 }.message(),
            "Processing 3 chunks..."
        );
        assert_eq!(
            StatusEvent::ChunkStarted { index: 0, total: 3 }.message(),
            "Processing chunk 1/3..."
        );
        assert_eq!(
            StatusEvent::ChunkSaved {
                index: 2,
                total: 3,
                file_name: "book.mp3".to_string()
            }
            .message(),
            "Chunk 3/3 saved to book.mp3"
        );
        assert_eq!(
            StatusEvent::Failed {
                message: "Failed at chunk 2: network error".to_string()
            }
            .message(),
            "Error: Failed at chunk 2: network error"
        );
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = channel();
        sink.report(StatusEvent::Chunked { chunks: 2 });
        sink.report(StatusEvent::ChunkStarted { index: 0, total: 2 });
        drop(sink);

        assert_eq!(rx.recv().await, Some(StatusEvent::Chunked { chunks: 2 }));
        assert_eq!(
            rx.recv().await,
            Some(StatusEvent::ChunkStarted { index: 0, total: 2 })
        );
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (sink, rx) = channel();
        drop(rx);
        sink.report(StatusEvent::Chunked { chunks: 1 });
    }
}
