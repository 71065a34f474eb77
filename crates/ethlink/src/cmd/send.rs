use std::fs;

use ethlink_frame::{AddressDescriptor, Message};
use ethlink_iface::EthInterface;
use tracing::info;

use crate::cmd::SendArgs;
use crate::exit::{iface_error, io_error, CliError, CliResult, SUCCESS, TRANSPORT_ERROR, USAGE};
use crate::output::OutputFormat;

pub fn run(args: SendArgs, _format: OutputFormat) -> CliResult<i32> {
    let destination = resolve_destination(&args)?;
    let payload = resolve_payload(&args)?;

    let config = args.adapter.config();
    let mut iface = EthInterface::open(&config).map_err(|err| iface_error("open failed", err))?;

    let mut message = Message::new(&payload);
    message.push_descriptor(&destination);
    iface
        .send(message)
        .map_err(|err| iface_error("send failed", err))?;

    if iface.stats().write_errors > 0 {
        return Err(CliError::new(
            TRANSPORT_ERROR,
            format!("frame to {} was not written in full", destination.destination()),
        ));
    }

    info!(
        interface = iface.interface(),
        destination = %destination.destination(),
        size = payload.len(),
        "frame sent"
    );
    Ok(SUCCESS)
}

fn resolve_destination(args: &SendArgs) -> CliResult<AddressDescriptor> {
    match (args.to, args.broadcast) {
        (_, true) => Ok(AddressDescriptor::broadcast()),
        (Some(mac), false) => Ok(AddressDescriptor::unicast(mac)),
        (None, false) => Err(CliError::new(USAGE, "one of --to or --broadcast is required")),
    }
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
