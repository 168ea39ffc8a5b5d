use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use rflink_gateway::{connect_with_config, DeviceInfo, Gateway, GatewayConfig, Intent};
use rflink_transport::{SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_PORT};
use tracing::info;

use crate::exit::{gateway_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod interactive;
pub mod list;
pub mod ports;
pub mod send;

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Serial port the gateway is attached to.
    #[arg(value_name = "PORT", env = "RFLINK_PORT", default_value = DEFAULT_PORT)]
    pub port: PathBuf,
    /// Serial line speed.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// How long to wait for each gateway reply (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug, Default)]
pub struct ActionArgs {
    /// Print the channel table and exit.
    #[arg(long, conflicts_with_all = ["channel", "list_ports"])]
    pub list: bool,
    /// Channel to send a single command to (requires --command).
    #[arg(long, requires = "command", conflicts_with = "list_ports")]
    pub channel: Option<u8>,
    /// Command to send: UP, DOWN, STOP, MY or PAIR (requires --channel).
    #[arg(long, requires = "channel")]
    pub command: Option<Intent>,
    /// List serial ports present on this host and exit.
    #[arg(long)]
    pub list_ports: bool,
}

pub async fn run(connect: ConnectArgs, action: ActionArgs, format: OutputFormat) -> CliResult<i32> {
    if action.list_ports {
        return ports::run(format);
    }
    if action.list {
        return list::run(&connect, format).await;
    }
    if let (Some(channel), Some(intent)) = (action.channel, action.command) {
        return send::run(&connect, channel, intent, format).await;
    }
    interactive::run(&connect, format).await
}

/// Open the port and wait for the gateway to identify itself.
pub(crate) async fn open_gateway(args: &ConnectArgs) -> CliResult<(Gateway, DeviceInfo)> {
    let timeout = parse_duration(&args.timeout)?;
    let serial = SerialConfig::new(&args.port).with_baud_rate(args.baud);
    let config = GatewayConfig::default().with_timeout(timeout);

    let gateway = connect_with_config(&serial, config).map_err(|err| {
        let hint = match &err {
            rflink_gateway::GatewayError::Transport(err) if err.is_not_found() => {
                " (is the gateway plugged in?)"
            }
            _ => "",
        };
        let mut cli = gateway_error("connect failed", err);
        cli.message.push_str(hint);
        cli
    })?;

    match gateway.connect_and_identify().await {
        Ok(device) => {
            info!(%device, port = %args.port.display(), "gateway identified");
            Ok((gateway, device))
        }
        Err(err) => {
            gateway.close().await;
            Err(gateway_error("gateway did not identify", err))
        }
    }
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
