/// Errors surfaced by the adapter.
///
/// Per-frame problems never show up here; they are logged and counted.
/// What remains is construction failure and buffer-walking defects.
#[derive(Debug, thiserror::Error)]
pub enum IfaceError {
    /// Opening or configuring the capture device failed.
    #[error("device error: {0}")]
    Device(#[from] ethlink_transport::DeviceError),

    /// An outbound message could not be framed.
    #[error("frame error: {0}")]
    Frame(#[from] ethlink_frame::FrameError),

    /// A capture record claims bytes past the end of the read.
    #[error("capture record at offset {offset} overruns read ({end} > {read} bytes)")]
    RecordOverrun {
        offset: usize,
        end: usize,
        read: usize,
    },

    /// A captured frame is too short to hold an Ethernet envelope.
    #[error("capture record at offset {offset} holds a truncated envelope ({len} bytes)")]
    TruncatedEnvelope { offset: usize, len: usize },

    /// A captured frame slipped past the kernel filter.
    #[error("capture record at offset {offset} has ethertype {ethertype:#06x}")]
    UnexpectedEthertype { offset: usize, ethertype: u16 },

    /// Waiting for readiness failed.
    #[error("adapter I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IfaceError>;
