use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rflink_gateway::{ChannelRecord, DeviceInfo, Intent, Registry, UNINITIALIZED_ROLLING_CODE};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ChannelsOutput<'a> {
    device: Option<&'a DeviceInfo>,
    complete: bool,
    channels: Vec<ChannelOutput<'a>>,
}

#[derive(Serialize)]
struct ChannelOutput<'a> {
    #[serde(flatten)]
    record: &'a ChannelRecord,
    active: bool,
}

#[derive(Serialize)]
struct ReplyOutput<'a> {
    channel: u8,
    command: Intent,
    result: &'a str,
}

pub fn print_channels(registry: &Registry, device: Option<&DeviceInfo>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ChannelsOutput {
                device,
                complete: registry.is_complete(),
                channels: registry
                    .iter()
                    .map(|record| ChannelOutput {
                        record,
                        active: record.is_active(),
                    })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHANNEL", "ADDRESS", "ROLLING CODE", "ACTIVE"]);
            for record in registry {
                table.add_row(vec![
                    record.id().to_string(),
                    record.address().to_string(),
                    rolling_code(record),
                    record.is_active().to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("\nChannel  Address    Rolling Code    Active");
            println!("-------  -------  ----------------  ------");
            for record in registry {
                println!("{}", pretty_row(record));
            }
        }
    }
}

pub fn print_reply(channel: u8, intent: Intent, reply: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReplyOutput {
                channel,
                command: intent,
                result: reply,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("    Result: {reply}"),
    }
}

pub fn print_ports(ports: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(ports).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            if ports.is_empty() {
                println!("no serial ports found");
            }
            for port in ports {
                println!("{port}");
            }
        }
    }
}

fn pretty_row(record: &ChannelRecord) -> String {
    let active = if record.is_active() { "True" } else { "False" };
    format!(
        "  {:2}     {}    {:<14}    {}",
        record.id(),
        record.address(),
        rolling_code(record),
        active
    )
}

/// Rolling code as `<decimal> [0x<hex>]`, blank for a slot that never sent.
pub fn rolling_code(record: &ChannelRecord) -> String {
    if record.rolling_code() == UNINITIALIZED_ROLLING_CODE {
        String::new()
    } else {
        format!(
            "{:>5} [0x{:04X}]",
            record.rolling_code(),
            record.rolling_code()
        )
    }
}
