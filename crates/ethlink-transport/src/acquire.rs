use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{DeviceError, Result};

/// Bounds for the capture device search.
///
/// Capture devices are exclusively lockable, so a busy device is expected
/// under contention and the whole candidate range is retried after a
/// short pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquirePolicy {
    /// Full passes over the candidate range before giving up. Default: 100.
    pub attempts: u32,
    /// Number of candidate device indices tried per pass. Default: 256.
    pub devices: u32,
    /// Pause between passes. Default: 100ms.
    pub retry_delay: Duration,
}

impl AcquirePolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 100;
    pub const DEFAULT_DEVICES: u32 = 256;
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);
}

impl Default for AcquirePolicy {
    fn default() -> Self {
        Self {
            attempts: Self::DEFAULT_ATTEMPTS,
            devices: Self::DEFAULT_DEVICES,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
        }
    }
}

/// Open the first available candidate, retrying with `std::thread::sleep`.
pub fn acquire<T, O>(policy: &AcquirePolicy, open: O) -> Result<T>
where
    O: FnMut(u32) -> Result<T>,
{
    acquire_with(policy, open, std::thread::sleep)
}

/// Open the first available candidate with an explicit sleep function.
///
/// `open` is called with indices `0..policy.devices` in order and the first
/// success is returned immediately. After a pass with no success, `sleep`
/// is called with the retry delay; no sleep follows the final pass.
///
/// A candidate refused with `PermissionDenied` ends the search at once
/// with that error: every other node shares its permissions, so waiting
/// out the retry budget would only hide the cause.
pub fn acquire_with<T, O, S>(policy: &AcquirePolicy, mut open: O, mut sleep: S) -> Result<T>
where
    O: FnMut(u32) -> Result<T>,
    S: FnMut(Duration),
{
    for attempt in 0..policy.attempts {
        for index in 0..policy.devices {
            match open(index) {
                Ok(handle) => {
                    debug!(index, attempt, "acquired capture device");
                    return Ok(handle);
                }
                Err(err) if is_permission_denied(&err) => {
                    debug!(index, error = %err, "capture device refused");
                    return Err(err);
                }
                Err(err) => trace!(index, error = %err, "capture device unavailable"),
            }
        }

        if attempt + 1 < policy.attempts {
            debug!(attempt, delay = ?policy.retry_delay, "no free capture device, retrying");
            sleep(policy.retry_delay);
        }
    }

    Err(DeviceError::NoDeviceAvailable {
        attempts: policy.attempts,
        devices: policy.devices,
    })
}

fn is_permission_denied(err: &DeviceError) -> bool {
    match err {
        DeviceError::Open { source, .. } | DeviceError::Io(source) => {
            source.kind() == std::io::ErrorKind::PermissionDenied
        }
        _ => false,
    }
}
