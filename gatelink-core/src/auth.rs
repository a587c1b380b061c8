//! Card authorization payload layouts
//!
//! The controller stores authorizations keyed by card number; the client
//! never retains them. Grants carry a fixed validity window, the same one
//! the vendor tooling writes.

use bytes::{BufMut, Bytes, BytesMut};

/// Validity window start, BCD calendar date 2019-01-01
pub const VALID_FROM: [u8; 4] = [0x20, 0x19, 0x01, 0x01];

/// Validity window end, BCD calendar date 2029-12-31
pub const VALID_TO: [u8; 4] = [0x20, 0x29, 0x12, 0x31];

/// Payload length for getAuth/removeAuth (card number, rest zero)
pub const CARD_QUERY_LEN: usize = 56;

/// A single card-to-door grant
///
/// # Examples
///
/// ```
/// use gatelink_core::auth::AuthRecord;
///
/// let record = AuthRecord::single_door(1234567, 2);
/// assert_eq!(record.doors, [false, true, false, false]);
/// assert_eq!(record.payload().len(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRecord {
    /// Card number
    pub card_no: u32,

    /// One flag per door 1-4
    pub doors: [bool; 4],
}

impl AuthRecord {
    /// Grant for exactly one door
    ///
    /// Doors are numbered 1-4. Any other number yields an all-false mask,
    /// matching the wire semantics: no byte in the mask region is set.
    pub fn single_door(card_no: u32, door: u8) -> Self {
        let mut doors = [false; 4];
        if (1..=4).contains(&door) {
            doors[(door - 1) as usize] = true;
        }
        Self { card_no, doors }
    }

    /// The 16-byte setAuth payload
    ///
    /// Card number LE at 0, validity window at 4 and 8, door mask at 12-15.
    pub fn payload(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16);
        buf.put_u32_le(self.card_no);
        buf.put_slice(&VALID_FROM);
        buf.put_slice(&VALID_TO);
        for granted in self.doors {
            buf.put_u8(granted as u8);
        }
        buf.freeze()
    }
}

/// The 56-byte getAuth/removeAuth payload: card number LE at 0, rest zero
pub fn card_no_payload(card_no: u32) -> Bytes {
    let mut buf = BytesMut::zeroed(CARD_QUERY_LEN);
    buf[0..4].copy_from_slice(&card_no.to_le_bytes());
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_door_mask() {
        for door in 1u8..=4 {
            let record = AuthRecord::single_door(100, door);
            let payload = record.payload();
            let mask = &payload[12..16];

            assert_eq!(mask.iter().filter(|b| **b == 1).count(), 1);
            assert_eq!(mask[(door - 1) as usize], 1);
        }
    }

    #[test]
    fn test_out_of_range_door_sets_nothing() {
        for door in [0u8, 5, 9, 255] {
            let payload = AuthRecord::single_door(100, door).payload();
            assert_eq!(&payload[12..16], &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_set_auth_layout() {
        let payload = AuthRecord::single_door(0x04030201, 1).payload();

        assert_eq!(payload.len(), 16);
        assert_eq!(&payload[0..4], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&payload[4..8], &[0x20, 0x19, 0x01, 0x01]);
        assert_eq!(&payload[8..12], &[0x20, 0x29, 0x12, 0x31]);
        assert_eq!(&payload[12..16], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_card_no_payload() {
        let payload = card_no_payload(0x04030201);

        assert_eq!(payload.len(), CARD_QUERY_LEN);
        assert_eq!(&payload[0..4], &[0x01, 0x02, 0x03, 0x04]);
        assert!(payload[4..].iter().all(|b| *b == 0));
    }
}
