//! Mesh messages tunnelled over raw Ethernet frames.
//!
//! ethlink lets a mesh router exchange its packets with neighbours on the
//! same LAN segment, carried directly in Ethernet frames with a reserved
//! ethertype instead of over IP.
//!
//! # Crate Structure
//!
//! - [`transport`]: capture device acquisition, kernel filter, hardware addresses
//! - [`frame`]: wire codec, address descriptors and capture records
//! - [`iface`]: the adapter that reads, validates, delivers and sends frames

/// Re-export transport types.
pub mod transport {
    pub use ethlink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use ethlink_frame::*;
}

/// Re-export adapter types.
pub mod iface {
    pub use ethlink_iface::*;
}
