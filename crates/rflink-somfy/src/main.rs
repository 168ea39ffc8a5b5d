mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{ActionArgs, ConnectArgs};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "rflink-somfy",
    version,
    about = "Drive Somfy RTS blinds through an RFLink serial gateway"
)]
struct Cli {
    #[command(flatten)]
    connect: ConnectArgs,

    #[command(flatten)]
    action: ActionArgs,

    /// Output format.
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr); RUST_LOG adds per-target directives.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    // The interactive session reads like the classic console client.
    let interactive = !cli.action.list && !cli.action.list_ports && cli.action.channel.is_none();
    let format = cli.format.unwrap_or_else(|| {
        if interactive {
            OutputFormat::Pretty
        } else {
            OutputFormat::default_for_stdout()
        }
    });
    let result = cmd::run(cli.connect, cli.action, format).await;

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rflink_gateway::Intent;

    use super::*;

    #[test]
    fn parses_positional_port() {
        let cli = Cli::try_parse_from(["rflink-somfy", "/dev/ttyUSB1", "--list"])
            .expect("list args should parse");

        assert_eq!(cli.connect.port, Path::new("/dev/ttyUSB1"));
        assert_eq!(cli.connect.baud, 57_600);
        assert!(cli.action.list);
    }

    #[test]
    fn parses_one_shot_command() {
        let cli = Cli::try_parse_from(["rflink-somfy", "--channel", "3", "--command", "my"])
            .expect("one-shot args should parse");

        assert_eq!(cli.action.channel, Some(3));
        assert_eq!(cli.action.command, Some(Intent::Stop));
    }

    #[test]
    fn channel_requires_command() {
        let err = Cli::try_parse_from(["rflink-somfy", "--channel", "3"])
            .expect_err("missing command should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn list_conflicts_with_channel() {
        let err = Cli::try_parse_from([
            "rflink-somfy",
            "--list",
            "--channel",
            "3",
            "--command",
            "up",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unknown_command() {
        let err = Cli::try_parse_from(["rflink-somfy", "--channel", "3", "--command", "open"])
            .expect_err("unknown command should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
