use bytes::{Buf, BufMut, BytesMut};

use crate::address::{AddressDescriptor, DESCRIPTOR_SIZE};
use crate::error::Result;

/// A message crossing the adapter boundary.
///
/// Messages exchanged with upper layers carry an [`AddressDescriptor`]
/// prefix ahead of the payload: on receive it names the sender, on send it
/// names the destination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    buf: BytesMut,
}

impl Message {
    /// A message holding raw bytes, with no descriptor.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            buf: BytesMut::from(bytes.as_ref()),
        }
    }

    /// A message of `descriptor` followed by `payload`.
    pub fn with_descriptor(descriptor: &AddressDescriptor, payload: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(DESCRIPTOR_SIZE + payload.len());
        buf.put_slice(&descriptor.to_bytes());
        buf.put_slice(payload);
        Self { buf }
    }

    /// Prepend `descriptor` to the current contents.
    pub fn push_descriptor(&mut self, descriptor: &AddressDescriptor) {
        let mut buf = BytesMut::with_capacity(DESCRIPTOR_SIZE + self.buf.len());
        buf.put_slice(&descriptor.to_bytes());
        buf.put_slice(&self.buf);
        self.buf = buf;
    }

    /// Validate and strip the descriptor prefix.
    ///
    /// On error the message is left untouched.
    pub fn pop_descriptor(&mut self) -> Result<AddressDescriptor> {
        let (descriptor, used) = AddressDescriptor::parse_prefix(&self.buf)?;
        self.buf.advance(used);
        Ok(descriptor)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
