use std::os::fd::AsRawFd;

use ethlink_frame::Message;
use ethlink_transport::CaptureDevice;
use tokio::io::unix::AsyncFd;

use crate::error::Result;
use crate::interface::EthInterface;
use crate::sink::MessageSink;

/// [`EthInterface`] driven by the tokio reactor.
///
/// The device must already be in non-blocking mode. Reads wait for
/// readiness; sends are written directly since a capture device accepts a
/// whole frame or fails.
pub struct AsyncEthInterface<D: CaptureDevice + AsRawFd> {
    inner: AsyncFd<EthInterface<D>>,
}

impl<D: CaptureDevice + AsRawFd> AsyncEthInterface<D> {
    /// Register the adapter's device with the current runtime.
    pub fn new(iface: EthInterface<D>) -> Result<Self> {
        Ok(Self {
            inner: AsyncFd::new(iface)?,
        })
    }

    /// Wait for one read batch and deliver its frames to `sink`.
    pub async fn recv<S>(&mut self, sink: &mut S) -> Result<usize>
    where
        S: MessageSink + ?Sized,
    {
        loop {
            let mut guard = self.inner.readable_mut().await?;

            match guard.try_io(|inner| inner.get_mut().read_batch()) {
                Ok(Ok(bytes)) => return guard.get_inner_mut().dispatch(bytes, sink),
                Ok(Err(err)) => {
                    guard.get_inner_mut().record_read_error(&err);
                    return Ok(0);
                }
                Err(_would_block) => continue,
            }
        }
    }

    /// Deliver frames to `sink` until the dispatcher reports an error.
    pub async fn run<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: MessageSink + ?Sized,
    {
        loop {
            self.recv(sink).await?;
        }
    }

    pub fn send(&mut self, message: Message) -> Result<()> {
        self.inner.get_mut().send(message)
    }

    pub fn get_ref(&self) -> &EthInterface<D> {
        self.inner.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut EthInterface<D> {
        self.inner.get_mut()
    }

    pub fn into_inner(self) -> EthInterface<D> {
        self.inner.into_inner()
    }
}

impl<D: CaptureDevice + AsRawFd> std::fmt::Debug for AsyncEthInterface<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AsyncEthInterface")
            .field(self.inner.get_ref())
            .finish()
    }
}
