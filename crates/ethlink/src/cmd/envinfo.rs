use std::collections::BTreeMap;

use ethlink_frame::{ETHERTYPE, MAX_PAYLOAD};
use ethlink_iface::CAPTURE_FILTER;
use ethlink_transport::{has_capture_backend, list_devices, AcquirePolicy};
use serde::Serialize;

use crate::cmd::EnvinfoArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct PlatformInfo {
    os: String,
    arch: String,
    capture_backend: &'static str,
}

#[derive(Serialize)]
struct LinkInfo {
    ethertype: String,
    max_payload: usize,
    filter_instructions: usize,
    acquire_attempts: u32,
    acquire_devices: u32,
    acquire_retry_delay_ms: u128,
    /// `ETHLINK_INTERFACE` when set, else the first usable interface.
    default_interface: Option<String>,
    interfaces: Vec<String>,
}

#[derive(Serialize)]
struct EnvInfoOutput {
    schema_id: &'static str,
    version: String,
    target: String,
    rust_version: String,
    git_hash: String,
    platform: PlatformInfo,
    link: LinkInfo,
    features: Vec<String>,
    dependencies: BTreeMap<String, String>,
    environment: BTreeMap<String, Option<String>>,
}

pub fn run(_args: EnvinfoArgs, format: OutputFormat) -> CliResult<i32> {
    let mut deps = BTreeMap::new();
    deps.insert("bytes".to_string(), "1".to_string());
    deps.insert("clap".to_string(), "4.5".to_string());
    deps.insert("libc".to_string(), "0.2".to_string());
    deps.insert("tracing".to_string(), "0.1".to_string());

    let mut env = BTreeMap::new();
    for key in ["ETHLINK_INTERFACE", "ETHLINK_LOG_LEVEL", "RUST_LOG"] {
        env.insert(key.to_string(), std::env::var(key).ok());
    }

    let output = EnvInfoOutput {
        schema_id: "https://schemas.3leaps.dev/ethlink/cli/v1/envinfo.schema.json",
        version: env!("CARGO_PKG_VERSION").to_string(),
        target: target_triple(),
        rust_version: option_env!("RUSTC_VERSION")
            .unwrap_or("unknown")
            .to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        platform: PlatformInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            capture_backend: capture_backend(),
        },
        link: link_info(),
        features: active_features(),
        dependencies: deps,
        environment: env,
    };

    print_envinfo(&output, format);
    Ok(SUCCESS)
}

fn link_info() -> LinkInfo {
    let policy = AcquirePolicy::default();
    // Enumeration is best effort here; `doctor` reports its failures.
    let interfaces = list_devices().unwrap_or_default();
    let default_interface = std::env::var("ETHLINK_INTERFACE")
        .ok()
        .or_else(|| interfaces.first().cloned());

    LinkInfo {
        ethertype: format!("{ETHERTYPE:#06x}"),
        max_payload: MAX_PAYLOAD,
        filter_instructions: CAPTURE_FILTER.len(),
        acquire_attempts: policy.attempts,
        acquire_devices: policy.devices,
        acquire_retry_delay_ms: policy.retry_delay.as_millis(),
        default_interface,
        interfaces,
    }
}

fn capture_backend() -> &'static str {
    if has_capture_backend() {
        "bpf"
    } else {
        "none"
    }
}

fn target_triple() -> String {
    if let Some(target) = option_env!("ETHLINK_BUILD_TARGET") {
        return target.to_string();
    }

    match (std::env::consts::ARCH, std::env::consts::OS) {
        ("aarch64", "macos") => "aarch64-apple-darwin".to_string(),
        ("x86_64", "macos") => "x86_64-apple-darwin".to_string(),
        ("aarch64", "linux") => "aarch64-unknown-linux-gnu".to_string(),
        ("x86_64", "linux") => "x86_64-unknown-linux-gnu".to_string(),
        (arch, os) => format!("{arch}-unknown-{os}"),
    }
}

fn print_envinfo(output: &EnvInfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("ethlink environment\n");
            println!("  Version:    {}", output.version);
            println!("  Target:     {}", output.target);
            println!("  Rust:       {}", output.rust_version);
            println!("  Git hash:   {}", output.git_hash);
            println!(
                "  Platform:   {} ({})",
                output.platform.os, output.platform.arch
            );
            println!("  Capture:    {}", output.platform.capture_backend);
            println!("\n  Link:");
            println!("    ethertype            {}", output.link.ethertype);
            println!("    max payload          {} bytes", output.link.max_payload);
            println!(
                "    filter               {} instructions",
                output.link.filter_instructions
            );
            println!(
                "    acquisition          {} passes x {} devices, {}ms apart",
                output.link.acquire_attempts,
                output.link.acquire_devices,
                output.link.acquire_retry_delay_ms
            );
            println!(
                "    default interface    {}",
                output.link.default_interface.as_deref().unwrap_or("(none)")
            );
            println!("    interfaces           {}", output.link.interfaces.join(", "));
            println!("  Features:   {}", output.features.join(", "));
            println!("\n  Dependencies:");
            for (k, v) in &output.dependencies {
                println!("    {:<12} {}", k, v);
            }
            println!("\n  Environment:");
            for (k, v) in &output.environment {
                println!("    {:<20} {}", k, v.as_deref().unwrap_or("(not set)"));
            }
        }
        OutputFormat::Raw => println!("{}", output.version),
    }
}

fn active_features() -> Vec<String> {
    let mut features = Vec::new();
    if cfg!(feature = "async") {
        features.push("async".to_string());
    }
    if cfg!(feature = "cli") {
        features.push("cli".to_string());
    }
    features
}
