use bytes::{BufMut, BytesMut};

use crate::address::{AddressDescriptor, MacAddr};
use crate::error::{FrameError, Result};

/// Ethertype reserved for tunnelled mesh traffic.
pub const ETHERTYPE: u16 = 0xfc00;

/// Ethernet envelope: destination (6) + source (6) + ethertype (2).
pub const ETHERNET_HEADER_SIZE: usize = 14;

/// Tunnel header: version (1) + zero (1) + length (2 BE) + magic (2 BE).
pub const HEADER_SIZE: usize = 6;

/// Header version this codec speaks.
pub const CURRENT_VERSION: u8 = 0;

/// Fixed framing sanity value carried in every header.
pub const MAGIC: u16 = 0xfc00;

/// Largest payload whose total length still fits the 16-bit length field.
pub const MAX_PAYLOAD: usize = u16::MAX as usize - HEADER_SIZE;

/// The 14-byte Ethernet envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ethertype: u16,
}

impl EthernetHeader {
    /// Read the envelope from the front of `frame`, or `None` if it is too short.
    pub fn parse(frame: &[u8]) -> Option<Self> {
        let raw = frame.get(..ETHERNET_HEADER_SIZE)?;
        let mut destination = [0u8; 6];
        let mut source = [0u8; 6];
        destination.copy_from_slice(&raw[0..6]);
        source.copy_from_slice(&raw[6..12]);
        Some(Self {
            destination: MacAddr(destination),
            source: MacAddr(source),
            ethertype: u16::from_be_bytes([raw[12], raw[13]]),
        })
    }

    pub fn write(&self, dst: &mut BytesMut) {
        dst.put_slice(&self.destination.0);
        dst.put_slice(&self.source.0);
        dst.put_u16(self.ethertype);
    }
}

/// The tunnel header that follows the Ethernet envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,
    /// Total encapsulated size including this header.
    pub length: u16,
    pub magic: u16,
}

impl FrameHeader {
    pub fn parse(src: &[u8]) -> Option<Self> {
        let raw = src.get(..HEADER_SIZE)?;
        Some(Self {
            version: raw[0],
            length: u16::from_be_bytes([raw[2], raw[3]]),
            magic: u16::from_be_bytes([raw[4], raw[5]]),
        })
    }

    pub fn write(&self, dst: &mut BytesMut) {
        dst.put_u8(self.version);
        dst.put_u8(0);
        dst.put_u16(self.length);
        dst.put_u16(self.magic);
    }
}

/// A frame that passed validation, borrowing its payload from the capture buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    pub source: MacAddr,
    pub broadcast: bool,
    pub payload: &'a [u8],
}

impl DecodedFrame<'_> {
    /// Descriptor handed upward alongside the payload.
    pub fn descriptor(&self) -> AddressDescriptor {
        AddressDescriptor {
            mac: self.source,
            broadcast: self.broadcast,
        }
    }
}

/// Encode `payload` for `destination` into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬───────────┬─────────┬──────┬──────────┬──────────┬─────────┐
/// │ dst (6)  │ src (6)  │ type (2)  │ version │ zero │ length   │ magic    │ payload │
/// │          │          │ 0xfc00 BE │ (1)     │ (1)  │ (2 BE)   │ 0xfc00   │         │
/// └──────────┴──────────┴───────────┴─────────┴──────┴──────────┴──────────┴─────────┘
/// ```
/// `length` counts the tunnel header plus payload, not the envelope.
pub fn encode_frame(
    source: MacAddr,
    destination: &AddressDescriptor,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(ETHERNET_HEADER_SIZE + HEADER_SIZE + payload.len());

    EthernetHeader {
        destination: destination.destination(),
        source,
        ethertype: ETHERTYPE,
    }
    .write(dst);

    FrameHeader {
        version: CURRENT_VERSION,
        length: (payload.len() + HEADER_SIZE) as u16,
        magic: MAGIC,
    }
    .write(dst);

    dst.put_slice(payload);
    Ok(())
}

/// Validate the tunnel header in `content` (the bytes after the envelope).
///
/// Checks run in a fixed order: runt, version, declared length, magic.
/// Captured bytes beyond the declared length are trimmed off.
pub fn decode_content<'a>(envelope: &EthernetHeader, content: &'a [u8]) -> Result<DecodedFrame<'a>> {
    let Some(header) = FrameHeader::parse(content) else {
        return Err(FrameError::Runt { len: content.len() });
    };

    if header.version != CURRENT_VERSION {
        return Err(FrameError::UnknownVersion {
            version: header.version,
        });
    }

    let declared = header.length as usize;
    if declared < HEADER_SIZE {
        return Err(FrameError::SizeFieldTooSmall {
            declared: header.length,
        });
    }
    if declared > content.len() {
        return Err(FrameError::SizeFieldLargerThanFrame {
            declared,
            actual: content.len(),
        });
    }

    if header.magic != MAGIC {
        return Err(FrameError::BadMagic {
            magic: header.magic,
        });
    }

    Ok(DecodedFrame {
        source: envelope.source,
        broadcast: envelope.destination.is_broadcast(),
        payload: &content[HEADER_SIZE..declared],
    })
}

/// Decode a complete Ethernet frame (envelope, header, payload).
///
/// The ethertype is not checked here; the kernel filter already did.
pub fn decode_frame(frame: &[u8]) -> Result<DecodedFrame<'_>> {
    let Some(envelope) = EthernetHeader::parse(frame) else {
        return Err(FrameError::Runt { len: frame.len() });
    };
    decode_content(&envelope, &frame[ETHERNET_HEADER_SIZE..])
}
