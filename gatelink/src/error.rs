//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] gatelink_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] gatelink_transport::Error),

    #[error("Decode error: {0}")]
    Types(#[from] gatelink_types::Error),

    #[error("Discovery requested without a callback target")]
    CallbackRequired,
}
