//! # gatelink-core
//!
//! Core protocol implementation for networked door-access controller boards.
//!
//! This crate provides the low-level protocol primitives:
//! - Fixed 64-byte frame encoding
//! - Function code definitions
//! - Card authorization and network configuration payload layouts
//! - The shared device address cell

pub mod address;
pub mod auth;
pub mod error;
pub mod frame;
pub mod function;
pub mod netcfg;

pub use address::DeviceAddress;
pub use error::{Error, Result};
pub use frame::{Frame, Payload};
pub use function::Function;

/// Protocol marker, first byte of every frame
pub const MARKER: u8 = 0x17;

/// Fixed frame size on the wire
pub const FRAME_SIZE: usize = 64;

/// Payload region starts here within the frame
pub const PAYLOAD_OFFSET: usize = 8;

/// Default device command port
pub const DEFAULT_PORT: u16 = 60000;

/// Fixed token guarding destructive commands (clearAuth, setAddress tail)
pub const MAGIC_TOKEN: [u8; 4] = [0x55, 0xAA, 0xAA, 0x55];
