//! Capture device plumbing for link-layer tunnelling.
//!
//! This is the lowest layer of ethlink. It owns everything that touches the
//! operating system:
//! - acquiring an exclusive capture device under contention
//! - resolving an interface's hardware address
//! - the fixed kernel filter program that passes only our ethertype
//!
//! On macOS the backend is a BPF device. Other targets get
//! [`UnsupportedDevice`], whose `open` always fails.

pub mod acquire;
pub mod error;
pub mod filter;
pub mod traits;

#[cfg(unix)]
pub mod ifaddrs;

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub mod bpf;

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub mod unsupported;

pub use acquire::{acquire, acquire_with, AcquirePolicy};
pub use error::{DeviceError, Result};
pub use filter::{BpfInsn, FilterProgram};
pub use traits::CaptureDevice;

#[cfg(unix)]
pub use ifaddrs::{list_devices, resolve_hardware_address, HW_ADDR_LEN};

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub use bpf::BpfDevice;

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub use unsupported::UnsupportedDevice;

/// The capture device type for the current target.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub type PlatformDevice = BpfDevice;

/// The capture device type for the current target.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub type PlatformDevice = UnsupportedDevice;

/// Whether this build has a working capture backend.
pub const fn has_capture_backend() -> bool {
    cfg!(any(target_os = "macos", target_os = "ios"))
}
