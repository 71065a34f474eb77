use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ethlink_frame::Message;
use ethlink_iface::EthInterface;
use tracing::info;

use crate::cmd::ListenArgs;
use crate::exit::{frame_error, iface_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_frame, OutputFormat};

// Upper bound on how long a Ctrl-C can go unnoticed.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.adapter.config();
    let mut iface = EthInterface::open(&config).map_err(|err| iface_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    let mut pending: Vec<Message> = Vec::new();

    while running.load(Ordering::SeqCst) {
        let ready = iface
            .poll_readable(Some(POLL_INTERVAL))
            .map_err(|err| iface_error("wait failed", err))?;
        if !ready {
            continue;
        }

        iface
            .handle_readable(&mut pending)
            .map_err(|err| iface_error("receive failed", err))?;

        for mut message in pending.drain(..) {
            let descriptor = message
                .pop_descriptor()
                .map_err(|err| frame_error("malformed delivery", err))?;
            print_frame(iface.interface(), &descriptor, message.bytes(), format);
            printed = printed.saturating_add(1);

            if let Some(count) = args.count {
                if printed >= count {
                    return Ok(SUCCESS);
                }
            }
        }
    }

    let stats = iface.stats();
    info!(
        delivered = stats.delivered,
        dropped = stats.dropped,
        read_errors = stats.read_errors,
        "listener stopped"
    );
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
