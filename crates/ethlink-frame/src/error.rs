/// Reasons a frame or message is rejected.
///
/// Every variant drops exactly one frame; none of them is fatal to the
/// adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Fewer bytes than the fixed headers need.
    #[error("runt ({len} bytes)")]
    Runt { len: usize },

    /// The header version is not one this codec speaks.
    #[error("unknown version {version}")]
    UnknownVersion { version: u8 },

    /// The length field claims less than the header itself.
    #[error("size field smaller than header ({declared} bytes)")]
    SizeFieldTooSmall { declared: u16 },

    /// The length field claims more bytes than were captured.
    #[error("size field larger than frame (declared {declared}, captured {actual})")]
    SizeFieldLargerThanFrame { declared: usize, actual: usize },

    /// The header magic is not 0xfc00.
    #[error("bad magic {magic:#06x}")]
    BadMagic { magic: u16 },

    /// The payload does not fit the 16-bit length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The address descriptor prefix of an outbound message is implausible.
    #[error("bad address descriptor (addr_len {addr_len}, {available} bytes available)")]
    BadAddress { addr_len: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
