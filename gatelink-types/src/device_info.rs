//! Discovery reply decoding
//!
//! A controller answers the broadcast search probe with one 64-byte frame
//! describing its network configuration and firmware:
//!
//! ```text
//! offset  0      marker (0x17)
//! offset  1      function code (search reply)
//! offset  4..8   serial number (LE u32)
//! offset  8..12  device ip
//! offset 12..16  subnet mask
//! offset 16..20  gateway
//! offset 20..26  MAC address
//! offset 26..28  firmware version (BCD, e.g. 0x06 0x62 = "6.62")
//! offset 28..32  firmware release date (BCD yyyymmdd)
//! ```

use std::fmt;
use std::net::Ipv4Addr;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Frame marker byte, shared with the command encoder
const MARKER: u8 = 0x17;

/// Everything a reply decodes to; the discovery flow only reads `serial`
/// and `ip`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device serial number
    pub serial: u32,

    /// Current device ip
    pub ip: Ipv4Addr,

    /// Subnet mask
    pub subnet: Ipv4Addr,

    /// Default gateway
    pub gateway: Ipv4Addr,

    /// MAC address, colon-separated lowercase hex
    pub mac: String,

    /// Firmware version, e.g. "6.62"
    pub version: String,

    /// Firmware release date
    pub released: NaiveDate,
}

impl DeviceInfo {
    /// Minimum reply length covering every field
    pub const MIN_LEN: usize = 32;

    /// Decode a raw incoming datagram
    ///
    /// # Errors
    ///
    /// Fails on short buffers, a wrong marker byte, or non-BCD digits in
    /// the firmware fields.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::MIN_LEN {
            return Err(Error::ReplyTooShort {
                expected: Self::MIN_LEN,
                actual: buf.len(),
            });
        }
        if buf[0] != MARKER {
            return Err(Error::BadMarker(buf[0]));
        }

        let serial = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let ip = quad(&buf[8..12]);
        let subnet = quad(&buf[12..16]);
        let gateway = quad(&buf[16..20]);

        let mac = buf[20..26]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":");

        let version = format!("{:x}.{:02x}", buf[26], buf[27]);

        let year = bcd(buf[28])? * 100 + bcd(buf[29])?;
        let month = bcd(buf[30])?;
        let day = bcd(buf[31])?;
        let released = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or(Error::InvalidDate { year, month, day })?;

        Ok(Self {
            serial,
            ip,
            subnet,
            gateway,
            mac,
            version,
            released,
        })
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device[SN: {}, ip: {}, fw: {} ({})]",
            self.serial, self.ip, self.version, self.released
        )
    }
}

fn quad(bytes: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
}

fn bcd(byte: u8) -> Result<u32> {
    let hi = byte >> 4;
    let lo = byte & 0x0F;
    if hi > 9 || lo > 9 {
        return Err(Error::InvalidBcd(byte));
    }
    Ok((hi * 10 + lo) as u32)
}
