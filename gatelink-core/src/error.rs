//! Error types for gatelink-core

/// Result type alias for frame encoding
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown function code
    #[error("unknown function code: 0x{0:02X}")]
    UnknownFunction(u8),

    /// Hex payload string did not decode
    #[error("invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
