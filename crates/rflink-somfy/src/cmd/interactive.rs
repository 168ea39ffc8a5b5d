use std::io::Write;

use rflink_gateway::{Gateway, GatewayError, Intent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::cmd::{open_gateway, ConnectArgs};
use crate::exit::{gateway_error, io_error, CliResult, SUCCESS};
use crate::output::{print_channels, print_reply, OutputFormat};

pub async fn run(args: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    println!("Somfy RFLink Client\n===================\n");

    let (gateway, device) = open_gateway(args).await?;
    println!("Connected to device: {device}");

    let mut prompt = Prompt::new(BufReader::new(tokio::io::stdin()));
    let result = session(&gateway, &mut prompt, format).await;
    gateway.close().await;
    result
}

/// Line-oriented operator input.
pub struct Prompt<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Show `question` and read one trimmed answer; end of input reads as empty.
    async fn ask(&mut self, question: &str) -> CliResult<String> {
        print!("{question}");
        let _ = std::io::stdout().flush();
        let line = self
            .lines
            .next_line()
            .await
            .map_err(|err| io_error("failed reading input", err))?;
        Ok(line.map(|line| line.trim().to_string()).unwrap_or_default())
    }
}

/// Channel selection loop; returns once the operator enters nothing.
pub async fn session<R: AsyncBufRead + Unpin>(
    gateway: &Gateway,
    prompt: &mut Prompt<R>,
    format: OutputFormat,
) -> CliResult<i32> {
    loop {
        match gateway.enumerate_channels().await {
            Ok(registry) => print_channels(&registry, gateway.device().as_ref(), format),
            Err(GatewayError::Incomplete { found }) => {
                println!("Only {found} of 16 channels reported:");
                print_channels(&gateway.snapshot(), gateway.device().as_ref(), format);
            }
            Err(err) => return Err(gateway_error("channel listing failed", err)),
        }

        println!("Please enter the channel you wish to interact with: ");
        let answer = prompt.ask("Channel: ").await?;
        if answer.is_empty() {
            return Ok(SUCCESS);
        }

        match answer.parse::<u8>() {
            Ok(channel) => commands(gateway, prompt, channel, format).await?,
            Err(_) => println!("Non numeric answer ignored :-)\n"),
        }
    }
}

async fn commands<R: AsyncBufRead + Unpin>(
    gateway: &Gateway,
    prompt: &mut Prompt<R>,
    channel: u8,
    format: OutputFormat,
) -> CliResult<()> {
    println!("\nEnter commands to send to the blind on channel {channel}.");

    loop {
        println!(
            "Valid commands are: UP, DOWN, STOP, MY, PAIR, QUIT. [ENTER to finish]. Case is not important."
        );
        let answer = prompt.ask(&format!("Channel {channel} Command: ")).await?;
        if answer.is_empty() || answer.eq_ignore_ascii_case("QUIT") {
            println!("Finished\n");
            return Ok(());
        }

        let Ok(intent) = answer.parse::<Intent>() else {
            println!("Invalid command. Ignored");
            continue;
        };

        match gateway.send_command(channel, intent).await {
            Ok(reply) => print_reply(channel, intent, &reply, format),
            Err(err @ (GatewayError::ConnectionLost | GatewayError::Closed)) => {
                return Err(gateway_error("command failed", err));
            }
            Err(GatewayError::UnknownChannel(_)) => {
                println!("Invalid channel number {channel}.");
                return Ok(());
            }
            Err(GatewayError::InactiveChannel(_)) => {
                println!("Channel {channel} is not active. Do you need to pair a blind?");
            }
            Err(err) => println!("    Failed: {err}"),
        }
        println!();
    }
}
