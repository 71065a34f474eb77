use std::path::PathBuf;

/// Errors raised while acquiring or configuring a capture device.
///
/// All of these are construction-time failures: an adapter that hits one
/// is never handed out.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// A specific capture device node could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Every candidate device was busy or missing for the whole retry budget.
    #[error("no capture device available ({devices} candidates, {attempts} attempts)")]
    NoDeviceAvailable { attempts: u32, devices: u32 },

    /// A configuration ioctl on the capture device failed.
    #[error("ioctl({request}) failed: {source}")]
    Ioctl {
        request: &'static str,
        source: std::io::Error,
    },

    /// The system interface list could not be read.
    #[error("getifaddrs() failed: {0}")]
    InterfaceAddrs(std::io::Error),

    /// The named interface has no link-layer address.
    #[error("could not find mac address for [{interface}]")]
    NoHardwareAddress { interface: String },

    /// The interface name does not fit the kernel's fixed-size name field.
    #[error("interface name too long ({len} bytes, max {max}): {name}")]
    InterfaceNameTooLong { name: String, len: usize, max: usize },

    /// An I/O error occurred on the capture device.
    #[error("capture device I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// This platform has no capture backend.
    #[error("no capture backend for {os}")]
    Unsupported { os: &'static str },
}

pub type Result<T> = std::result::Result<T, DeviceError>;
