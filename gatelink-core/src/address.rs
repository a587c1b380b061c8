//! Shared device address cell
//!
//! The device ip starts out unknown when the board gets its address from
//! DHCP. Discovery resolves it, a network reconfiguration invalidates it,
//! and the local transport reads it on every send to choose between
//! unicast and broadcast.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use crate::DEFAULT_PORT;

/// Where commands for one device go
///
/// Cheaply clonable (Arc internally); the discovery flow writes through one
/// clone while the transport reads through another.
#[derive(Debug, Clone)]
pub struct DeviceAddress {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Known device ip, `None` means broadcast target
    ip: parking_lot::RwLock<Option<Ipv4Addr>>,

    /// Device command port, fixed for the lifetime of the instance
    port: u16,
}

impl DeviceAddress {
    /// Create an address cell; `None` ip means the device must be discovered
    pub fn new(ip: Option<Ipv4Addr>, port: u16) -> Self {
        Self {
            inner: Arc::new(Inner {
                ip: parking_lot::RwLock::new(ip),
                port,
            }),
        }
    }

    /// Address cell for an undiscovered device on the default port
    pub fn unknown() -> Self {
        Self::new(None, DEFAULT_PORT)
    }

    /// Current device ip, if known
    pub fn ip(&self) -> Option<Ipv4Addr> {
        *self.inner.ip.read()
    }

    /// Device command port
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Whether a unicast target exists
    pub fn is_known(&self) -> bool {
        self.inner.ip.read().is_some()
    }

    /// Unicast socket address, if the ip is known
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.ip()
            .map(|ip| SocketAddr::V4(SocketAddrV4::new(ip, self.inner.port)))
    }

    /// Record the ip learned from a discovery reply
    pub fn resolve(&self, ip: Ipv4Addr) {
        *self.inner.ip.write() = Some(ip);
    }

    /// Forget the cached ip; subsequent sends fall back to broadcast
    pub fn invalidate(&self) {
        *self.inner.ip.write() = None;
    }
}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_address() {
        let address = DeviceAddress::unknown();
        assert_eq!(address.ip(), None);
        assert_eq!(address.port(), DEFAULT_PORT);
        assert!(!address.is_known());
        assert_eq!(address.socket_addr(), None);
    }

    #[test]
    fn test_resolve_and_invalidate() {
        let address = DeviceAddress::new(None, 60000);

        address.resolve(Ipv4Addr::new(10, 0, 0, 42));
        assert!(address.is_known());
        assert_eq!(address.ip(), Some(Ipv4Addr::new(10, 0, 0, 42)));
        assert_eq!(
            address.socket_addr(),
            Some("10.0.0.42:60000".parse().unwrap())
        );

        address.invalidate();
        assert_eq!(address.ip(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let writer = DeviceAddress::unknown();
        let reader = writer.clone();

        writer.resolve(Ipv4Addr::new(192, 168, 1, 77));
        assert_eq!(reader.ip(), Some(Ipv4Addr::new(192, 168, 1, 77)));
    }
}
