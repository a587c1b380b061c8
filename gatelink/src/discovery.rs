//! Broadcast discovery of a controller with an unknown ip
//!
//! A board fresh on the network gets its address by DHCP and is only
//! identifiable by serial number. The session broadcasts a search probe,
//! waits for the one reply whose serial matches, caches the reported ip,
//! and registers this client as the device's callback server. Several
//! devices may share the broadcast domain; replies from the wrong serial
//! are ignored and the wait continues.

use std::net::Ipv4Addr;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use gatelink_core::{netcfg, DeviceAddress, Frame, Function, Payload};
use gatelink_transport::LocalTransport;
use gatelink_types::DeviceInfo;

use crate::controller::CallbackTarget;
use crate::error::Result;

/// A device reports this ip while it has not acquired a real one yet
pub const UNASSIGNED_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 0);

/// Discovery progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    /// Nothing sent yet
    Idle,

    /// Probe broadcast, waiting for a matching reply
    Searching,

    /// Matching reply carried a usable ip, now cached
    Resolved,

    /// Matching reply carried the unassigned sentinel; cache cleared
    Invalid,

    /// Callback registration issued; terminal
    ServerConfigured,
}

/// What one incoming datagram did to the wait
enum ReplyDisposition {
    /// Not ours, or undecodable; keep listening
    KeepWaiting,

    /// Matching reply handled; stop listening
    Done,
}

/// One-shot discovery flow for a single device
pub struct DiscoverySession {
    serial: u32,
    address: DeviceAddress,
    state: DiscoveryState,
}

impl DiscoverySession {
    /// Session for the device with the given serial, sharing the address
    /// cell with the transport
    pub fn new(serial: u32, address: DeviceAddress) -> Self {
        Self {
            serial,
            address,
            state: DiscoveryState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    /// Run the full flow: probe, wait (bounded), register the callback
    ///
    /// The wait ends on the first matching reply or at the deadline. The
    /// callback registration is issued either way: a device that answered
    /// with the unassigned sentinel, or not at all, is still told where to
    /// report once it has a usable address.
    pub async fn run(
        &mut self,
        transport: &LocalTransport,
        callback: &CallbackTarget,
        limit: Duration,
    ) -> Result<DiscoveryState> {
        self.state = DiscoveryState::Searching;

        info!(serial = self.serial, "starting broadcast discovery");
        let probe = Frame::new(Function::Search, Some(self.serial)).encode()?;
        transport.send(&probe).await;

        let deadline = Instant::now() + limit;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(serial = self.serial, "discovery timed out, no matching reply");
                break;
            }

            match transport.recv(remaining).await {
                Ok(buf) => {
                    if matches!(self.handle_reply(&buf), ReplyDisposition::Done) {
                        break;
                    }
                }
                Err(e) => {
                    warn!(serial = self.serial, error = %e, "discovery wait ended");
                    break;
                }
            }
        }

        let payload =
            netcfg::server_address_payload(callback.ip, callback.port, callback.interval);
        let frame = Frame::with_payload(
            Function::SetServerAddress,
            Some(self.serial),
            Payload::Bytes(payload),
        )
        .encode()?;
        transport.send(&frame).await;

        info!(
            serial = self.serial,
            server = %callback.ip,
            port = callback.port,
            "callback server registered"
        );
        self.state = DiscoveryState::ServerConfigured;
        Ok(self.state)
    }

    /// Apply one incoming datagram to the wait
    fn handle_reply(&mut self, buf: &[u8]) -> ReplyDisposition {
        let info = match DeviceInfo::parse(buf) {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "undecodable discovery reply, still listening");
                return ReplyDisposition::KeepWaiting;
            }
        };

        if info.serial != self.serial {
            debug!(
                theirs = info.serial,
                ours = self.serial,
                "reply from another device, still listening"
            );
            return ReplyDisposition::KeepWaiting;
        }

        if info.ip == UNASSIGNED_IP {
            warn!(
                serial = self.serial,
                "device has not acquired a real address yet"
            );
            self.address.invalidate();
            self.state = DiscoveryState::Invalid;
        } else {
            info!(serial = self.serial, ip = %info.ip, "device resolved");
            self.address.resolve(info.ip);
            self.state = DiscoveryState::Resolved;
        }

        ReplyDisposition::Done
    }
}
