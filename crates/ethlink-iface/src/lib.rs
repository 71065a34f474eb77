//! Link-layer tunnel adapter.
//!
//! [`EthInterface`] binds one capture device to one network interface,
//! walks every read batch the device returns and hands each valid frame to
//! a [`MessageSink`]. Outbound messages carry their destination as a
//! leading address descriptor and are written as single frames.
//!
//! The adapter never blocks: callers wait for readability themselves
//! (see [`EthInterface::poll_readable`], or enable the `async` feature for
//! a tokio-driven wrapper) and then call [`EthInterface::handle_readable`].

#[cfg(feature = "async")]
pub mod async_iface;
pub mod config;
pub mod error;
pub mod interface;
pub mod sink;

#[cfg(feature = "async")]
pub use async_iface::AsyncEthInterface;
pub use config::EthInterfaceConfig;
pub use error::{IfaceError, Result};
pub use interface::{EthInterface, IfaceStats, CAPTURE_FILTER};
pub use sink::MessageSink;
