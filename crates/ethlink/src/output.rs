use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use ethlink_frame::AddressDescriptor;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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
struct FrameOutput<'a> {
    schema_id: &'a str,
    interface: &'a str,
    source: String,
    broadcast: bool,
    payload_size: usize,
    payload: String,
    timestamp: String,
}

/// Print one delivered frame: the sender's descriptor and its payload.
pub fn print_frame(
    interface: &str,
    descriptor: &AddressDescriptor,
    payload: &[u8],
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                schema_id: "https://schemas.3leaps.dev/ethlink/cli/v1/frame-received.schema.json",
                interface,
                source: descriptor.mac.to_string(),
                broadcast: descriptor.broadcast,
                payload_size: payload.len(),
                payload: payload_preview(payload),
                timestamp: now_unix_seconds(),
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
                .set_header(vec!["SOURCE", "CAST", "SIZE", "PAYLOAD"])
                .add_row(vec![
                    descriptor.mac.to_string(),
                    cast_name(descriptor).to_string(),
                    payload.len().to_string(),
                    payload_preview(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "source={} cast={} size={} payload={}",
                descriptor.mac,
                cast_name(descriptor),
                payload.len(),
                payload_preview(payload)
            );
        }
        OutputFormat::Raw => {
            print_raw(payload);
        }
    }
}

#[derive(Serialize)]
struct DevicesOutput<'a> {
    schema_id: &'a str,
    devices: &'a [String],
}

pub fn print_devices(devices: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = DevicesOutput {
                schema_id: "https://schemas.3leaps.dev/ethlink/cli/v1/devices.schema.json",
                devices,
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
                .set_header(vec!["INTERFACE"]);
            for device in devices {
                table.add_row(vec![device.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for device in devices {
                println!("{device}");
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn cast_name(descriptor: &AddressDescriptor) -> &'static str {
    if descriptor.broadcast {
        "broadcast"
    } else {
        "unicast"
    }
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
