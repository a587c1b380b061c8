//! # gatelink
//!
//! Client for a family of networked multi-door access controller boards.
//!
//! ## Features
//!
//! - Byte-exact 64-byte command frames
//! - Broadcast discovery of devices that only have a serial number
//! - Local (UDP) and relayed (TCP) transports behind one command API
//! - Fire-and-forget sends, matching the device protocol
//!
//! ## Quick Start
//!
//! ```no_run
//! use gatelink::{CallbackTarget, DeviceController, LocalOptions};
//!
//! #[tokio::main]
//! async fn main() -> gatelink::Result<()> {
//!     // Device ip unknown: discovery resolves it by serial, then
//!     // registers us as the device's callback server.
//!     let mut controller = DeviceController::local(LocalOptions {
//!         serial: Some(423188757),
//!         callback: Some(CallbackTarget::new("10.0.0.5".parse().unwrap(), 9000)),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//!     controller.open_door(1).await?;
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod discovery;
pub mod error;

// Re-exports
pub use controller::{CallbackTarget, DeviceController, LocalOptions};
pub use discovery::{DiscoverySession, DiscoveryState, UNASSIGNED_IP};
pub use error::{Error, Result};

// Re-export types
pub use gatelink_core::{DeviceAddress, Frame, Function, Payload, DEFAULT_PORT};
pub use gatelink_transport::{LocalConfig, Transport};
pub use gatelink_types::DeviceInfo;
