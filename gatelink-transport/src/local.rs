//! Local (UDP) transport
//!
//! Used when the controller sits on the same broadcast domain. While the
//! device ip is unknown every frame goes to the broadcast address; once
//! discovery resolves it, frames unicast to the device directly.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use bytes::BytesMut;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{trace, warn};

use gatelink_core::DeviceAddress;

use crate::error::{Error, Result};

/// Socket configuration for the local transport
///
/// Bind and broadcast addresses are configurable so the discovery path can
/// be exercised over loopback; production use keeps the defaults.
#[derive(Debug, Clone)]
pub struct LocalConfig {
    /// Local bind address
    pub bind_addr: Ipv4Addr,

    /// Local bind port, 0 lets the OS pick
    pub bind_port: u16,

    /// Where frames go while the device ip is unknown
    pub broadcast_addr: Ipv4Addr,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            bind_addr: Ipv4Addr::UNSPECIFIED,
            bind_port: 0,
            broadcast_addr: Ipv4Addr::BROADCAST,
        }
    }
}

/// Connectionless transport with broadcast fallback
pub struct LocalTransport {
    socket: UdpSocket,
    address: DeviceAddress,
    broadcast_addr: Ipv4Addr,
}

impl LocalTransport {
    /// Bind the local socket
    ///
    /// The address cell is shared with the discovery flow; resolving it
    /// switches subsequent sends from broadcast to unicast.
    pub async fn bind(config: &LocalConfig, address: DeviceAddress) -> Result<Self> {
        let bind = SocketAddrV4::new(config.bind_addr, config.bind_port);
        let socket = UdpSocket::bind(bind).await.map_err(Error::Io)?;

        trace!(local = %socket.local_addr()?, "local transport bound");

        Ok(Self {
            socket,
            address,
            broadcast_addr: config.broadcast_addr,
        })
    }

    /// The shared device address cell
    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    /// Local socket address (useful when bound to port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Destination for the next send: unicast when the device ip is known,
    /// otherwise the broadcast address on the device port
    pub fn target(&self) -> (SocketAddr, bool) {
        match self.address.socket_addr() {
            Some(addr) => (addr, false),
            None => (
                SocketAddr::V4(SocketAddrV4::new(self.broadcast_addr, self.address.port())),
                true,
            ),
        }
    }

    /// Send one frame, fire-and-forget
    ///
    /// Failures are logged and swallowed; the protocol offers no delivery
    /// guarantee for commands, so the caller gets no signal either way.
    /// A failed broadcast send disables broadcast mode again, best-effort.
    pub async fn send(&self, data: &[u8]) {
        let (target, broadcast) = self.target();

        if broadcast {
            if let Err(e) = self.socket.set_broadcast(true) {
                warn!(error = %e, "failed to enable broadcast mode");
                return;
            }
        }

        trace!(
            remote = %target,
            broadcast,
            bytes = data.len(),
            payload = format!("{:02X?}", &data[..data.len().min(16)]),
            "sending frame via UDP"
        );

        if let Err(e) = self.socket.send_to(data, target).await {
            warn!(remote = %target, error = %e, "frame send failed");
            if broadcast {
                let _ = self.socket.set_broadcast(false);
            }
        }
    }

    /// Receive one datagram within the given time
    ///
    /// Only the discovery flow listens; ordinary commands never wait for a
    /// reply. An empty datagram is valid UDP traffic and comes back as an
    /// empty buffer; the caller decides what to do with it.
    pub async fn recv(&self, limit: Duration) -> Result<BytesMut> {
        let mut buf = BytesMut::zeroed(2048);

        let (n, src) = timeout(limit, self.socket.recv_from(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout)?
            .map_err(Error::Io)?;

        buf.truncate(n);

        trace!(
            remote = %src,
            bytes = n,
            payload = format!("{:02X?}", &buf[..n.min(16)]),
            "received datagram"
        );

        Ok(buf)
    }
}
