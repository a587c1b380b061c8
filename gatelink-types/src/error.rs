pub type Result<T> = std::result::Result<T, Error>;

/// Reply decoding errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reply too short: expected at least {expected} bytes, got {actual}")]
    ReplyTooShort { expected: usize, actual: usize },

    #[error("bad frame marker: 0x{0:02X}")]
    BadMarker(u8),

    #[error("non-BCD byte in firmware field: 0x{0:02X}")]
    InvalidBcd(u8),

    #[error("impossible release date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: u32, month: u32, day: u32 },
}
