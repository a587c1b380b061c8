//! Fixed-layout command frame encoding
//!
//! Every command travels in a 64-byte frame:
//!
//! ```text
//! ┌────────┬──────────┬──────────┬─────────────┬─────────────┬──────────┐
//! │ Marker │ Function │ Reserved │   Serial    │   Payload   │ Zero pad │
//! │ 1 byte │  1 byte  │ 2 bytes  │   4 bytes   │  0-56 bytes │          │
//! │ (0x17) │          │          │  (LE u32)   │             │          │
//! └────────┴──────────┴──────────┴─────────────┴─────────────┴──────────┘
//! offset 0        1          2            4             8
//! ```
//!
//! Frames are value objects: built fresh per send, never mutated after
//! construction. There is no decode here; discovery replies are parsed by
//! the response decoder collaborator.

use bytes::{Bytes, BytesMut};
use std::fmt;
use tracing::debug;

use crate::{
    error::Result,
    function::Function,
    FRAME_SIZE, MARKER, PAYLOAD_OFFSET,
};

/// Function-specific frame payload
///
/// The tag is chosen by the caller; there is no implicit "anything else is
/// hex" fallthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// No payload, offsets 8+ stay zero
    Empty,
    /// Single byte written at offset 8
    Byte(u8),
    /// Raw bytes copied verbatim from offset 8, truncated to the frame
    Bytes(Bytes),
    /// Hex-formatted string, whitespace stripped, decoded from offset 8
    Hex(String),
}

impl Payload {
    /// Resolve to raw bytes
    fn to_bytes(&self) -> Result<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Byte(b) => Ok(Bytes::copy_from_slice(&[*b])),
            Self::Bytes(data) => Ok(data.clone()),
            Self::Hex(s) => {
                let stripped: String = s.split_whitespace().collect();
                Ok(Bytes::from(hex::decode(stripped)?))
            }
        }
    }
}

/// A single outgoing command frame
///
/// # Examples
///
/// ```
/// use gatelink_core::{Frame, Function, Payload};
///
/// let frame = Frame::with_payload(Function::OpenDoor, Some(423188757), Payload::Byte(1));
/// let encoded = frame.encode().unwrap();
/// assert_eq!(encoded.len(), 64);
/// assert_eq!(encoded[0], 0x17);
/// assert_eq!(encoded[1], 0x40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Function code
    pub function: Function,

    /// Device serial, tags the frame; absent writes zero
    pub serial: Option<u32>,

    /// Function-specific payload
    pub payload: Payload,
}

impl Frame {
    /// Create a frame with no payload
    pub fn new(function: Function, serial: Option<u32>) -> Self {
        Self {
            function,
            serial,
            payload: Payload::Empty,
        }
    }

    /// Create a frame with a payload
    pub fn with_payload(function: Function, serial: Option<u32>, payload: Payload) -> Self {
        Self {
            function,
            serial,
            payload,
        }
    }

    /// Encode to the 64-byte wire form
    ///
    /// # Errors
    ///
    /// Only a malformed [`Payload::Hex`] string fails; every other payload
    /// encodes unconditionally.
    pub fn encode(&self) -> Result<BytesMut> {
        let payload = self.payload.to_bytes()?;

        debug!(
            function = Function::name_of(self.function.code()),
            code = format!("0x{:02X}", self.function.code()),
            serial = self.serial.unwrap_or(0),
            payload = format!("{:02X?}", payload.as_ref()),
            "encoding frame"
        );

        let mut buf = BytesMut::zeroed(FRAME_SIZE);
        buf[0] = MARKER;
        buf[1] = self.function.code();

        if let Some(serial) = self.serial {
            buf[4..8].copy_from_slice(&serial.to_le_bytes());
        }

        // Caller sizes the payload; anything past the frame end is dropped.
        let n = payload.len().min(FRAME_SIZE - PAYLOAD_OFFSET);
        buf[PAYLOAD_OFFSET..PAYLOAD_OFFSET + n].copy_from_slice(&payload[..n]);

        Ok(buf)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{}](serial={})",
            self.function,
            self.serial.unwrap_or(0),
        )
    }
}
