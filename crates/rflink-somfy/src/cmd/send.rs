use rflink_gateway::{GatewayError, Intent};
use tracing::debug;

use crate::cmd::{open_gateway, ConnectArgs};
use crate::exit::{gateway_error, CliResult, SUCCESS};
use crate::output::{print_reply, OutputFormat};

/// Send one command and exit. The channel table is read first so the
/// rolling code and address match what the gateway has stored.
pub async fn run(
    args: &ConnectArgs,
    channel: u8,
    intent: Intent,
    format: OutputFormat,
) -> CliResult<i32> {
    let (gateway, _) = open_gateway(args).await?;

    let result = async {
        match gateway.enumerate_channels().await {
            Ok(_) => {}
            // Partial listings still allow commands on the slots that did arrive.
            Err(GatewayError::Incomplete { found }) => {
                debug!(found, "partial channel listing");
            }
            Err(err) => return Err(gateway_error("channel listing failed", err)),
        }

        let reply = gateway
            .send_command(channel, intent)
            .await
            .map_err(|err| gateway_error("command failed", err))?;
        print_reply(channel, intent, &reply, format);
        Ok(SUCCESS)
    }
    .await;

    gateway.close().await;
    result
}
