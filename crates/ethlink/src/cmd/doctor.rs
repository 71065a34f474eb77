use serde::Serialize;

use ethlink_iface::CAPTURE_FILTER;
use ethlink_transport::{has_capture_backend, list_devices};

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![
        capture_backend_check(),
        bpf_device_node_check(),
        interface_enumeration_check(),
        filter_program_check(),
        compiled_features_check(),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.3leaps.dev/ethlink/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("ethlink doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<22} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

fn capture_backend_check() -> CheckResult {
    if has_capture_backend() {
        CheckResult {
            name: "capture_backend".to_string(),
            status: CheckStatus::Pass,
            detail: "BPF capture devices (/dev/bpfN)".to_string(),
        }
    } else {
        CheckResult {
            name: "capture_backend".to_string(),
            status: CheckStatus::Fail,
            detail: format!("no capture backend for {}", std::env::consts::OS),
        }
    }
}

fn bpf_device_node_check() -> CheckResult {
    if !has_capture_backend() {
        return CheckResult {
            name: "bpf_device_node".to_string(),
            status: CheckStatus::Skip,
            detail: "not applicable on this platform".to_string(),
        };
    }

    let node = std::path::Path::new("/dev/bpf0");
    match std::fs::metadata(node) {
        Ok(_) => CheckResult {
            name: "bpf_device_node".to_string(),
            status: CheckStatus::Pass,
            detail: format!("{} present", node.display()),
        },
        Err(err) => CheckResult {
            name: "bpf_device_node".to_string(),
            status: CheckStatus::Fail,
            detail: format!("{}: {err}", node.display()),
        },
    }
}

fn interface_enumeration_check() -> CheckResult {
    match list_devices() {
        Ok(devices) if devices.is_empty() => CheckResult {
            name: "interface_enumeration".to_string(),
            status: CheckStatus::Warn,
            detail: "no up, non-loopback interface with a hardware address".to_string(),
        },
        Ok(devices) => CheckResult {
            name: "interface_enumeration".to_string(),
            status: CheckStatus::Pass,
            detail: devices.join(", "),
        },
        Err(err) => CheckResult {
            name: "interface_enumeration".to_string(),
            status: CheckStatus::Fail,
            detail: err.to_string(),
        },
    }
}

fn filter_program_check() -> CheckResult {
    CheckResult {
        name: "filter_program".to_string(),
        status: CheckStatus::Info,
        detail: format!(
            "{} instructions, ethertype {:#06x}",
            CAPTURE_FILTER.len(),
            ethlink_frame::ETHERTYPE
        ),
    }
}

fn compiled_features_check() -> CheckResult {
    let mut features = Vec::new();
    if cfg!(feature = "async") {
        features.push("async");
    }
    if cfg!(feature = "cli") {
        features.push("cli");
    }

    CheckResult {
        name: "compiled_features".to_string(),
        status: CheckStatus::Info,
        detail: features.join(", "),
    }
}
