use std::io::{Read, Write};
use std::os::fd::{AsRawFd, RawFd};

use crate::acquire::AcquirePolicy;
use crate::error::{DeviceError, Result};
use crate::filter::FilterProgram;
use crate::traits::CaptureDevice;

/// Placeholder for targets without a capture backend.
///
/// It has no values: [`UnsupportedDevice::open`] always fails, so code
/// generic over the platform device still type-checks everywhere.
#[derive(Debug)]
pub enum UnsupportedDevice {}

impl UnsupportedDevice {
    pub fn open(
        _interface: &str,
        _policy: &AcquirePolicy,
        _immediate: bool,
        _filter: &FilterProgram,
    ) -> Result<Self> {
        Err(DeviceError::Unsupported {
            os: std::env::consts::OS,
        })
    }

    pub fn path(&self) -> &std::path::Path {
        match *self {}
    }
}

impl Read for UnsupportedDevice {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        match *self {}
    }
}

impl Write for UnsupportedDevice {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        match *self {}
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match *self {}
    }
}

impl AsRawFd for UnsupportedDevice {
    fn as_raw_fd(&self) -> RawFd {
        match *self {}
    }
}

impl CaptureDevice for UnsupportedDevice {
    fn buffer_len(&self) -> usize {
        match *self {}
    }

    fn backend_name(&self) -> &'static str {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_reports_unsupported_platform() {
        let result = UnsupportedDevice::open(
            "en0",
            &AcquirePolicy::default(),
            true,
            &FilterProgram::ethertype(0xfc00),
        );
        assert!(matches!(result, Err(DeviceError::Unsupported { .. })));
    }
}
