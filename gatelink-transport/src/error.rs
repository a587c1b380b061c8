//! Transport errors
//!
//! Sends are fire-and-forget and never raise; these cover socket setup and
//! the discovery receive path.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Read timeout")]
    ReadTimeout,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
