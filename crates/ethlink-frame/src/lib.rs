//! Wire codec for mesh messages tunnelled in raw Ethernet frames.
//!
//! Every frame on the link is laid out as:
//! - A 14-byte Ethernet envelope with the reserved ethertype 0xfc00
//! - A 6-byte tunnel header: version, zero, big-endian total length, magic 0xfc00
//! - The payload
//!
//! Nothing here does I/O. Decoding borrows from the caller's buffer and
//! rejects malformed input with a [`FrameError`] instead of panicking.

pub mod address;
pub mod codec;
pub mod error;
pub mod message;
pub mod record;

pub use address::{
    AddressDescriptor, MacAddr, ParseMacError, DESCRIPTOR_OVERHEAD, DESCRIPTOR_SIZE,
    FLAG_BROADCAST,
};
pub use codec::{
    decode_content, decode_frame, encode_frame, DecodedFrame, EthernetHeader, FrameHeader,
    CURRENT_VERSION, ETHERNET_HEADER_SIZE, ETHERTYPE, HEADER_SIZE, MAGIC, MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use message::Message;
pub use record::{word_align, write_record, CaptureRecordHeader, RECORD_HEADER_LEN, WORD_ALIGNMENT};
