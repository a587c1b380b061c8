//! High-level controller command interface

use std::net::Ipv4Addr;
use std::time::Duration;

use bytes::Bytes;
use chrono::NaiveDateTime;
use tokio::net::TcpStream;
use tracing::warn;

use gatelink_core::{
    auth::{self, AuthRecord},
    netcfg, DeviceAddress, Frame, Function, Payload, DEFAULT_PORT, MAGIC_TOKEN,
};
use gatelink_transport::{LocalConfig, LocalTransport, RemoteTransport, Transport};
use gatelink_types::encode_datetime;

use crate::discovery::{DiscoverySession, DiscoveryState};
use crate::error::{Error, Result};

/// The server address a device reports back to
///
/// Only meaningful for local-transport instances; the remote configuration
/// has no place to put one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackTarget {
    /// Callback server ip, as seen from the device
    pub ip: Ipv4Addr,

    /// Callback server port
    pub port: u16,

    /// Periodic report interval in seconds, 0 disables
    pub interval: u8,
}

impl CallbackTarget {
    /// Target with reporting disabled
    pub fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            ip,
            port,
            interval: 0,
        }
    }
}

/// Configuration for a local (same-network, UDP) controller instance
#[derive(Debug, Clone)]
pub struct LocalOptions {
    /// Device serial; tags every frame and filters discovery replies
    pub serial: Option<u32>,

    /// Known device ip; `None` triggers discovery when a serial is given
    pub device_ip: Option<Ipv4Addr>,

    /// Device command port
    pub port: u16,

    /// Callback server to register; required when discovery will run
    pub callback: Option<CallbackTarget>,

    /// Socket bind/broadcast settings
    pub socket: LocalConfig,

    /// Upper bound on the discovery wait
    pub discovery_timeout: Duration,
}

impl Default for LocalOptions {
    fn default() -> Self {
        Self {
            serial: None,
            device_ip: None,
            port: DEFAULT_PORT,
            callback: None,
            socket: LocalConfig::default(),
            discovery_timeout: Duration::from_secs(5),
        }
    }
}

/// Door access controller client
///
/// One instance drives one device over exactly one transport, fixed at
/// construction. Commands are fire-and-forget: the protocol offers no
/// acknowledgement, so every method returns as soon as the frame is
/// handed to the transport.
///
/// # Examples
///
/// ```no_run
/// use gatelink::{CallbackTarget, DeviceController, LocalOptions};
///
/// #[tokio::main]
/// async fn main() -> gatelink::Result<()> {
///     let mut controller = DeviceController::local(LocalOptions {
///         serial: Some(423188757),
///         callback: Some(CallbackTarget::new("10.0.0.5".parse().unwrap(), 9000)),
///         ..Default::default()
///     })
///     .await?;
///
///     controller.open_door(1).await?;
///     Ok(())
/// }
/// ```
pub struct DeviceController {
    transport: Transport,
    address: DeviceAddress,
    serial: Option<u32>,
    discovery: Option<DiscoveryState>,
}

impl DeviceController {
    /// Create a local-transport instance
    ///
    /// Binds the UDP socket and, when the device ip is unknown and a
    /// nonzero serial is configured, runs broadcast discovery before
    /// returning. Discovery requires a callback target; that check fails
    /// before any socket is bound.
    ///
    /// # Errors
    ///
    /// [`Error::CallbackRequired`] when discovery would run without a
    /// callback target, or the socket fails to bind.
    pub async fn local(options: LocalOptions) -> Result<Self> {
        let discovery_plan = match (options.device_ip, options.serial) {
            (None, Some(serial)) if serial != 0 => {
                let callback = options.callback.ok_or(Error::CallbackRequired)?;
                Some((serial, callback))
            }
            _ => None,
        };

        let address = DeviceAddress::new(options.device_ip, options.port);
        let local = LocalTransport::bind(&options.socket, address.clone()).await?;

        let mut discovery = None;
        if let Some((serial, callback)) = discovery_plan {
            let mut session = DiscoverySession::new(serial, address.clone());
            let state = session
                .run(&local, &callback, options.discovery_timeout)
                .await?;
            discovery = Some(state);
        }

        Ok(Self {
            transport: Transport::Local(local),
            address,
            serial: options.serial,
            discovery,
        })
    }

    /// Create a remote-transport instance over an already-connected stream
    ///
    /// The remote configuration carries no callback target and never
    /// participates in discovery; there is nothing to misconfigure.
    pub fn remote(stream: TcpStream, serial: Option<u32>) -> Self {
        Self {
            transport: Transport::Remote(RemoteTransport::new(stream)),
            address: DeviceAddress::unknown(),
            serial,
            discovery: None,
        }
    }

    /// Currently cached device ip, if any
    pub fn device_ip(&self) -> Option<Ipv4Addr> {
        self.address.ip()
    }

    /// Configured device serial
    pub fn serial(&self) -> Option<u32> {
        self.serial
    }

    /// Outcome of the automatic discovery run, if one happened
    pub fn discovery_state(&self) -> Option<DiscoveryState> {
        self.discovery
    }

    /// Whether this instance uses the local (broadcast-capable) transport
    pub fn is_local(&self) -> bool {
        self.transport.is_local()
    }

    /// Pulse the relay for one door (1-4)
    pub async fn open_door(&mut self, door: u8) -> Result<()> {
        if !(1..=4).contains(&door) {
            warn!(door, "door number outside 1-4, sent as-is");
        }
        self.send(Function::OpenDoor, Payload::Byte(door)).await
    }

    /// Query the device clock
    pub async fn get_date(&mut self) -> Result<()> {
        self.send(Function::GetDate, Payload::Empty).await
    }

    /// Synchronize the device clock
    pub async fn set_date(&mut self, when: NaiveDateTime) -> Result<()> {
        let payload = encode_datetime(&when);
        self.send(
            Function::SetDate,
            Payload::Bytes(Bytes::copy_from_slice(&payload)),
        )
        .await
    }

    /// Grant a card access to one door (1-4)
    pub async fn set_auth(&mut self, card_no: u32, door: u8) -> Result<()> {
        if !(1..=4).contains(&door) {
            warn!(card_no, door, "door number outside 1-4 grants no doors");
        }
        let record = AuthRecord::single_door(card_no, door);
        self.send(Function::SetAuth, Payload::Bytes(record.payload()))
            .await
    }

    /// Query a card's authorization
    pub async fn get_auth(&mut self, card_no: u32) -> Result<()> {
        self.send(
            Function::GetAuth,
            Payload::Bytes(auth::card_no_payload(card_no)),
        )
        .await
    }

    /// Revoke a card's authorization
    pub async fn remove_auth(&mut self, card_no: u32) -> Result<()> {
        self.send(
            Function::RemoveAuth,
            Payload::Bytes(auth::card_no_payload(card_no)),
        )
        .await
    }

    /// Wipe every stored authorization on the device
    pub async fn clear_auth(&mut self) -> Result<()> {
        self.send(
            Function::ClearAuth,
            Payload::Bytes(Bytes::copy_from_slice(&MAGIC_TOKEN)),
        )
        .await
    }

    /// Register the callback server the device reports events to
    pub async fn set_server_address(&mut self, target: &CallbackTarget) -> Result<()> {
        self.send(
            Function::SetServerAddress,
            Payload::Bytes(netcfg::server_address_payload(
                target.ip,
                target.port,
                target.interval,
            )),
        )
        .await
    }

    /// Query the configured callback server
    pub async fn get_server_address(&mut self) -> Result<()> {
        self.send(Function::GetServerAddress, Payload::Empty).await
    }

    /// Reconfigure the device's own network address
    ///
    /// The frame still targets the current ip, then the cached ip is
    /// dropped: the device re-acquires its address and must be discovered
    /// again before unicast resumes.
    pub async fn set_address(
        &mut self,
        ip: Ipv4Addr,
        subnet: Ipv4Addr,
        gateway: Ipv4Addr,
    ) -> Result<()> {
        let result = self
            .send(
                Function::SetAddress,
                Payload::Bytes(netcfg::device_address_payload(ip, subnet, gateway)),
            )
            .await;
        self.address.invalidate();
        result
    }

    async fn send(&mut self, function: Function, payload: Payload) -> Result<()> {
        let frame = Frame::with_payload(function, self.serial, payload);
        let data = frame.encode()?;
        self.transport.send(&data).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::UdpSocket;
    use tokio::time::timeout;

    async fn recv_frame(socket: &UdpSocket) -> Vec<u8> {
        let mut buf = [0u8; 128];
        let (n, _) = timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
            .await
            .expect("frame should arrive")
            .unwrap();
        buf[..n].to_vec()
    }

    async fn controller_against(receiver: &UdpSocket, serial: Option<u32>) -> DeviceController {
        let port = receiver.local_addr().unwrap().port();
        DeviceController::local(LocalOptions {
            serial,
            device_ip: Some(Ipv4Addr::LOCALHOST),
            port,
            socket: LocalConfig {
                bind_addr: Ipv4Addr::LOCALHOST,
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_discovery_without_callback_is_a_config_error() {
        let result = DeviceController::local(LocalOptions {
            serial: Some(1001),
            device_ip: None,
            callback: None,
            ..Default::default()
        })
        .await;

        assert!(matches!(result, Err(Error::CallbackRequired)));
    }

    #[tokio::test]
    async fn test_zero_serial_skips_discovery() {
        // Serial 0 cannot match any reply, so no discovery runs and no
        // callback target is required.
        let controller = DeviceController::local(LocalOptions {
            serial: Some(0),
            device_ip: None,
            socket: LocalConfig {
                bind_addr: Ipv4Addr::LOCALHOST,
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(controller.discovery_state(), None);
    }

    #[tokio::test]
    async fn test_open_door_frame_bytes() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut controller = controller_against(&receiver, Some(423188757)).await;

        controller.open_door(3).await.unwrap();

        let frame = recv_frame(&receiver).await;
        assert_eq!(frame.len(), 64);
        assert_eq!(frame[0], 0x17);
        assert_eq!(frame[1], 0x40);
        assert_eq!(&frame[4..8], &423188757u32.to_le_bytes());
        assert_eq!(frame[8], 3);
    }

    #[tokio::test]
    async fn test_clear_auth_magic_token() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut controller = controller_against(&receiver, Some(1001)).await;

        controller.clear_auth().await.unwrap();

        let frame = recv_frame(&receiver).await;
        assert_eq!(frame[1], 0x54);
        assert_eq!(&frame[8..12], &[0x55, 0xAA, 0xAA, 0x55]);
    }

    #[tokio::test]
    async fn test_set_auth_frame_layout() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut controller = controller_against(&receiver, Some(1001)).await;

        controller.set_auth(1234567, 2).await.unwrap();

        let frame = recv_frame(&receiver).await;
        assert_eq!(frame[1], 0x50);
        assert_eq!(&frame[8..12], &1234567u32.to_le_bytes());
        assert_eq!(&frame[12..16], &[0x20, 0x19, 0x01, 0x01]);
        assert_eq!(&frame[16..20], &[0x20, 0x29, 0x12, 0x31]);
        assert_eq!(&frame[20..24], &[0, 1, 0, 0]);
    }

    #[tokio::test]
    async fn test_set_address_clears_cached_ip() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut controller = controller_against(&receiver, Some(1001)).await;
        assert_eq!(controller.device_ip(), Some(Ipv4Addr::LOCALHOST));

        controller
            .set_address(
                Ipv4Addr::new(192, 168, 1, 50),
                Ipv4Addr::new(255, 255, 255, 0),
                Ipv4Addr::new(192, 168, 1, 1),
            )
            .await
            .unwrap();

        // The reconfiguration frame itself still went to the old address.
        let frame = recv_frame(&receiver).await;
        assert_eq!(frame[1], 0x96);
        assert_eq!(&frame[8..12], &[192, 168, 1, 50]);
        assert_eq!(&frame[20..24], &[0x55, 0xAA, 0xAA, 0x55]);

        assert_eq!(controller.device_ip(), None);
    }

    #[tokio::test]
    async fn test_remote_instance_sends_over_tcp() {
        use tokio::io::AsyncReadExt;
        use tokio::net::{TcpListener, TcpStream};

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = TcpStream::connect(addr).await.unwrap();
        let (mut server, _) = listener.accept().await.unwrap();

        let mut controller = DeviceController::remote(client, Some(1001));
        assert!(!controller.is_local());
        assert_eq!(controller.discovery_state(), None);

        controller.open_door(1).await.unwrap();

        let mut buf = vec![0u8; 64];
        timeout(Duration::from_secs(2), server.read_exact(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(buf[0], 0x17);
        assert_eq!(buf[1], 0x40);
        assert_eq!(buf[8], 1);
    }
}
