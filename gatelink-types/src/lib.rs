//! Shared decoding types for gatelink: the discovery-reply decoder and the
//! BCD clock encoder.

pub mod datetime;
pub mod device_info;
pub mod error;

pub use datetime::encode_datetime;
pub use device_info::DeviceInfo;
pub use error::{Error, Result};
