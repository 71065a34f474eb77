use ethlink_transport::list_devices;

use crate::cmd::DevicesArgs;
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_devices, OutputFormat};

pub fn run(_args: DevicesArgs, format: OutputFormat) -> CliResult<i32> {
    let devices = list_devices().map_err(|err| device_error("interface enumeration failed", err))?;
    print_devices(&devices, format);
    Ok(SUCCESS)
}
