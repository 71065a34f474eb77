use std::io::{Read, Write};

/// A raw link-layer device handle.
///
/// A single `read` returns one batch of capture records packed back to
/// back, never more than [`buffer_len`](CaptureDevice::buffer_len) bytes.
/// A single `write` transmits exactly one complete Ethernet frame.
///
/// Implementations are expected to be non-blocking: a read with nothing
/// pending reports `WouldBlock` rather than parking the thread.
pub trait CaptureDevice: Read + Write {
    /// Size of the kernel buffer one read can fill.
    fn buffer_len(&self) -> usize;

    /// Backend name for diagnostics.
    fn backend_name(&self) -> &'static str;
}

impl<T: CaptureDevice + ?Sized> CaptureDevice for Box<T> {
    fn buffer_len(&self) -> usize {
        (**self).buffer_len()
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
