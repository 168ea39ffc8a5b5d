use rflink_gateway::GatewayError;

use crate::cmd::{open_gateway, ConnectArgs};
use crate::exit::{gateway_error, CliError, CliResult, SUCCESS, TIMEOUT};
use crate::output::{print_channels, OutputFormat};

pub async fn run(args: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let (gateway, device) = open_gateway(args).await?;

    let result = match gateway.enumerate_channels().await {
        Ok(registry) => {
            print_channels(&registry, Some(&device), format);
            Ok(SUCCESS)
        }
        Err(GatewayError::Incomplete { found }) => {
            print_channels(&gateway.snapshot(), Some(&device), format);
            Err(CliError::new(
                TIMEOUT,
                format!("gateway reported only {found} of 16 channels"),
            ))
        }
        Err(err) => Err(gateway_error("channel listing failed", err)),
    };

    gateway.close().await;
    result
}
