use ethlink_transport::AcquirePolicy;

/// Construction parameters for an [`EthInterface`](crate::EthInterface).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthInterfaceConfig {
    /// Interface to bind, e.g. `en0`.
    pub interface: String,
    /// Capture device search bounds.
    pub acquire: AcquirePolicy,
    /// Deliver frames as soon as they arrive. Default: true.
    pub immediate: bool,
}

impl EthInterfaceConfig {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            acquire: AcquirePolicy::default(),
            immediate: true,
        }
    }

    pub fn with_acquire_policy(mut self, policy: AcquirePolicy) -> Self {
        self.acquire = policy;
        self
    }

    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }
}
