//! Transport layer for the controller protocol
//!
//! Exactly one delivery strategy exists per client instance, fixed at
//! construction: [`LocalTransport`] (UDP, broadcast-capable, carries
//! discovery replies) or [`RemoteTransport`] (TCP through a relay, no
//! replies). The tagged union makes the choice explicit instead of a
//! runtime type check.

pub mod error;
pub mod local;
pub mod remote;

pub use error::{Error, Result};
pub use local::{LocalConfig, LocalTransport};
pub use remote::RemoteTransport;

/// One of the two mutually exclusive delivery strategies
pub enum Transport {
    /// Same-network UDP, unicast or broadcast
    Local(LocalTransport),

    /// Relayed TCP stream, connected by the caller
    Remote(RemoteTransport),
}

impl Transport {
    /// Send one encoded frame, fire-and-forget on either variant
    pub async fn send(&mut self, data: &[u8]) {
        match self {
            Self::Local(t) => t.send(data).await,
            Self::Remote(t) => t.send(data).await,
        }
    }

    /// Whether this is the local (discovery-capable) variant
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Borrow the local transport, if that is what this is
    pub fn as_local(&self) -> Option<&LocalTransport> {
        match self {
            Self::Local(t) => Some(t),
            Self::Remote(_) => None,
        }
    }
}
