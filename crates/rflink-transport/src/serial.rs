use std::path::{Path, PathBuf};

use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// RFLink firmware talks at 57600 baud, 8N1.
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Where the gateway usually shows up when plugged in.
#[cfg(target_os = "linux")]
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";
#[cfg(target_os = "macos")]
pub const DEFAULT_PORT: &str = "/dev/cu.usbmodem1";
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM3";
#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
pub const DEFAULT_PORT: &str = "/dev/ttyU0";

/// Serial port settings for a gateway connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path (`/dev/ttyACM0`, `COM3`, ...).
    pub port: PathBuf,
    /// Line speed.
    pub baud_rate: u32,
}

impl SerialConfig {
    /// Settings for `port` at the default baud rate.
    pub fn new(port: impl AsRef<Path>) -> Self {
        Self {
            port: port.as_ref().to_path_buf(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    /// Override the baud rate.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

/// Open the serial port described by `config`.
///
/// Must be called from within a tokio runtime; the returned stream is
/// registered with the runtime's reactor.
pub fn open(config: &SerialConfig) -> Result<SerialStream> {
    let path = config.port.to_string_lossy();
    debug!(port = %path, baud = config.baud_rate, "opening serial port");

    let stream = tokio_serial::new(path.to_string(), config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open_native_async()
        .map_err(|source| TransportError::Open {
            path: config.port.clone(),
            baud_rate: config.baud_rate,
            source,
        })?;

    info!(port = %path, baud = config.baud_rate, "serial port open");
    Ok(stream)
}

/// Names of the serial ports currently present on this host.
pub fn list_ports() -> Result<Vec<String>> {
    let ports = tokio_serial::available_ports().map_err(TransportError::Enumerate)?;
    Ok(ports.into_iter().map(|port| port.port_name).collect())
}
