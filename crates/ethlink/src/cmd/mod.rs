use clap::{Args, Subcommand};
use std::path::PathBuf;

use ethlink_frame::MacAddr;
use ethlink_iface::EthInterfaceConfig;
use ethlink_transport::AcquirePolicy;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod devices;
pub mod doctor;
pub mod envinfo;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List interfaces a tunnel can be bound to.
    Devices(DevicesArgs),
    /// Bind to an interface and print received frames.
    Listen(ListenArgs),
    /// Send a single frame.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Devices(args) => devices::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

/// Options shared by every command that opens the adapter.
#[derive(Args, Debug)]
pub struct AdapterArgs {
    /// Interface to bind, e.g. en0.
    #[arg(long, short = 'i', env = "ETHLINK_INTERFACE")]
    pub interface: String,
    /// Passes over the capture device range before giving up.
    #[arg(long, default_value_t = AcquirePolicy::DEFAULT_ATTEMPTS)]
    pub attempts: u32,
}

impl AdapterArgs {
    pub fn config(&self) -> EthInterfaceConfig {
        let policy = AcquirePolicy {
            attempts: self.attempts,
            ..AcquirePolicy::default()
        };
        EthInterfaceConfig::new(self.interface.as_str()).with_acquire_policy(policy)
    }
}

#[derive(Args, Debug, Default)]
pub struct DevicesArgs {}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub adapter: AdapterArgs,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub adapter: AdapterArgs,
    /// Destination hardware address.
    #[arg(long, value_name = "MAC", conflicts_with = "broadcast", required_unless_present = "broadcast")]
    pub to: Option<MacAddr>,
    /// Send to every station on the segment.
    #[arg(long)]
    pub broadcast: bool,
    /// Raw string payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}
