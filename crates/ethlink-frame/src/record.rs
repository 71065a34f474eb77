//! Capture records as delivered by a BPF device read.
//!
//! One read returns zero or more records packed back to back. Each record
//! is a small header followed by the captured frame, and the next record
//! starts at the following word boundary:
//!
//! ```text
//! ┌────────────────────────────┬───────────────┬─────┬────────────────────
//! │ record header (hdr_len)    │ frame (caplen)│ pad │ next record ...
//! └────────────────────────────┴───────────────┴─────┴────────────────────
//! ```
//!
//! Header fields are in host byte order at fixed offsets:
//! `tstamp_sec:u32 @0, tstamp_usec:u32 @4, caplen:u32 @8, datalen:u32 @12, hdrlen:u16 @16`.

use bytes::{BufMut, BytesMut};

/// Bytes needed to decode a record header.
pub const RECORD_HEADER_LEN: usize = 18;

/// Boundary every record starts on.
pub const WORD_ALIGNMENT: usize = 4;

/// Round `len` up to the next record boundary.
pub const fn word_align(len: usize) -> usize {
    (len + (WORD_ALIGNMENT - 1)) & !(WORD_ALIGNMENT - 1)
}

/// Metadata preceding one captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureRecordHeader {
    pub timestamp_sec: u32,
    pub timestamp_usec: u32,
    /// Bytes of the frame present in the buffer.
    pub captured_len: u32,
    /// Length of the frame on the wire.
    pub data_len: u32,
    /// Length of this header including its padding.
    pub header_len: u16,
}

impl CaptureRecordHeader {
    /// Header for a frame of `frame_len` bytes captured whole.
    pub fn for_frame(frame_len: usize) -> Self {
        Self {
            captured_len: frame_len as u32,
            data_len: frame_len as u32,
            header_len: RECORD_HEADER_LEN as u16,
            ..Self::default()
        }
    }

    /// Decode the header at the front of `src`, or `None` if it is too short.
    pub fn parse(src: &[u8]) -> Option<Self> {
        let raw = src.get(..RECORD_HEADER_LEN)?;
        let word = |at: usize| u32::from_ne_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
        Some(Self {
            timestamp_sec: word(0),
            timestamp_usec: word(4),
            captured_len: word(8),
            data_len: word(12),
            header_len: u16::from_ne_bytes([raw[16], raw[17]]),
        })
    }

    /// Write this header, zero-padded out to `header_len`.
    pub fn write(&self, dst: &mut BytesMut) {
        dst.put_slice(&self.timestamp_sec.to_ne_bytes());
        dst.put_slice(&self.timestamp_usec.to_ne_bytes());
        dst.put_slice(&self.captured_len.to_ne_bytes());
        dst.put_slice(&self.data_len.to_ne_bytes());
        dst.put_slice(&self.header_len.to_ne_bytes());
        let padding = (self.header_len as usize).saturating_sub(RECORD_HEADER_LEN);
        dst.put_bytes(0, padding);
    }

    /// Distance from this record's start to the next record's start.
    pub fn stride(&self) -> usize {
        word_align(self.header_len as usize + self.captured_len as usize)
    }
}

/// Append one whole-frame record plus alignment padding to `dst`.
///
/// Produces the same layout a capture device read would, which lets
/// recorded traffic be replayed through the dispatcher.
pub fn write_record(frame: &[u8], dst: &mut BytesMut) {
    let header = CaptureRecordHeader::for_frame(frame.len());
    let start = dst.len();
    header.write(dst);
    dst.put_slice(frame);
    let written = dst.len() - start;
    dst.put_bytes(0, header.stride() - written);
}
