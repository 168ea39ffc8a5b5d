use rflink_transport::SerialConfig;

use crate::config::GatewayConfig;
use crate::error::Result;
use crate::gateway::Gateway;

/// Open the serial port and start a gateway connection with default timeouts.
pub fn connect(serial: &SerialConfig) -> Result<Gateway> {
    connect_with_config(serial, GatewayConfig::default())
}

/// Open the serial port and start a gateway connection.
///
/// Opening the port resets most RFLink boards, which then print their welcome
/// banner; follow up with [`Gateway::connect_and_identify`].
pub fn connect_with_config(serial: &SerialConfig, config: GatewayConfig) -> Result<Gateway> {
    let stream = rflink_transport::open(serial)?;
    Ok(Gateway::spawn(stream, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    #[tokio::test]
    async fn connect_to_missing_port_is_transport_error() {
        let serial = SerialConfig::new("/definitely/not/a/serial/port");
        let err = connect(&serial).unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
