//! Network configuration payload layouts

use bytes::{BufMut, Bytes, BytesMut};
use std::net::Ipv4Addr;

use crate::MAGIC_TOKEN;

/// The 7-byte setServerAddress payload
///
/// Callback server ip at 0, port LE at 4, report interval (seconds) at 6.
/// Interval 0 disables periodic reporting.
pub fn server_address_payload(ip: Ipv4Addr, port: u16, interval: u8) -> Bytes {
    let mut buf = BytesMut::with_capacity(7);
    buf.put_slice(&ip.octets());
    buf.put_u16_le(port);
    buf.put_u8(interval);
    buf.freeze()
}

/// The 16-byte setAddress payload
///
/// New device ip at 0, subnet at 4, gateway at 8, magic token at 12-15.
/// The device drops off the network and re-acquires its address after
/// accepting this, so the sender must treat its cached ip as stale.
pub fn device_address_payload(ip: Ipv4Addr, subnet: Ipv4Addr, gateway: Ipv4Addr) -> Bytes {
    let mut buf = BytesMut::with_capacity(16);
    buf.put_slice(&ip.octets());
    buf.put_slice(&subnet.octets());
    buf.put_slice(&gateway.octets());
    buf.put_slice(&MAGIC_TOKEN);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_server_address_layout() {
        let payload = server_address_payload(Ipv4Addr::new(10, 0, 0, 5), 9000, 0);

        assert_eq!(payload.len(), 7);
        assert_eq!(&payload[0..4], &[10, 0, 0, 5]);
        assert_eq!(&payload[4..6], &9000u16.to_le_bytes());
        assert_eq!(payload[6], 0);
    }

    #[test]
    fn test_server_address_interval() {
        let payload = server_address_payload(Ipv4Addr::new(192, 168, 1, 10), 60000, 15);
        assert_eq!(payload[6], 15);
    }

    #[test]
    fn test_device_address_layout() {
        let payload = device_address_payload(
            Ipv4Addr::new(192, 168, 1, 50),
            Ipv4Addr::new(255, 255, 255, 0),
            Ipv4Addr::new(192, 168, 1, 1),
        );

        assert_eq!(payload.len(), 16);
        assert_eq!(&payload[0..4], &[192, 168, 1, 50]);
        assert_eq!(&payload[4..8], &[255, 255, 255, 0]);
        assert_eq!(&payload[8..12], &[192, 168, 1, 1]);
        assert_eq!(&payload[12..16], &MAGIC_TOKEN);
    }
}
