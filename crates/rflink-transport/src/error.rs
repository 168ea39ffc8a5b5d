use std::path::PathBuf;

/// Kind of a serial port failure.
pub use tokio_serial::ErrorKind as SerialErrorKind;

/// Errors that can occur opening or using the gateway transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial port.
    #[error("failed to open {path} at {baud_rate} baud: {source}")]
    Open {
        path: PathBuf,
        baud_rate: u32,
        source: tokio_serial::Error,
    },

    /// Failed to enumerate serial ports.
    #[error("failed to list serial ports: {0}")]
    Enumerate(tokio_serial::Error),

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// True when the port could not be opened because it does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            TransportError::Open { source, .. } => {
                matches!(source.kind(), SerialErrorKind::NoDevice)
                    || matches!(
                        source.kind(),
                        SerialErrorKind::Io(std::io::ErrorKind::NotFound)
                    )
            }
            TransportError::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
