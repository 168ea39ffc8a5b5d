/// Errors that can occur during line encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An outbound frame already contains a line terminator.
    #[error("outbound frame contains a line terminator: {0:?}")]
    EmbeddedTerminator(String),

    /// An I/O error occurred while reading or writing lines.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
