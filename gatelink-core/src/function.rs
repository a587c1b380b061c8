//! Controller protocol function codes

use std::fmt;

use crate::error::{Error, Result};

/// Protocol function codes
///
/// One byte at frame offset 1 selects the command or reply type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Function {
    /// Synchronize the controller clock
    SetDate = 0x30,
    /// Query the controller clock
    GetDate = 0x32,
    /// Pulse the relay for one door
    OpenDoor = 0x40,
    /// Grant a card access to a door
    SetAuth = 0x50,
    /// Revoke a card's authorization
    RemoveAuth = 0x52,
    /// Wipe every stored authorization
    ClearAuth = 0x54,
    /// Query a card's authorization
    GetAuth = 0x5A,
    /// Register the callback server the device reports to
    SetServerAddress = 0x90,
    /// Query the configured callback server
    GetServerAddress = 0x92,
    /// Broadcast discovery probe (devices answer with their config)
    Search = 0x94,
    /// Reconfigure the device's own ip/subnet/gateway
    SetAddress = 0x96,
}

impl Function {
    /// Raw wire code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get function name
    pub fn name(self) -> &'static str {
        match self {
            Self::SetDate => "SET_DATE",
            Self::GetDate => "GET_DATE",
            Self::OpenDoor => "OPEN_DOOR",
            Self::SetAuth => "SET_AUTH",
            Self::RemoveAuth => "REMOVE_AUTH",
            Self::ClearAuth => "CLEAR_AUTH",
            Self::GetAuth => "GET_AUTH",
            Self::SetServerAddress => "SET_SERVER_ADDRESS",
            Self::GetServerAddress => "GET_SERVER_ADDRESS",
            Self::Search => "SEARCH",
            Self::SetAddress => "SET_ADDRESS",
        }
    }

    /// Name lookup for diagnostics on a raw code
    ///
    /// Unmapped codes yield `"UNKNOWN"` rather than an error; a missing
    /// name must never fail a send.
    pub fn name_of(code: u8) -> &'static str {
        match Self::try_from(code) {
            Ok(function) => function.name(),
            Err(_) => "UNKNOWN",
        }
    }
}

impl From<Function> for u8 {
    fn from(function: Function) -> u8 {
        function as u8
    }
}

impl TryFrom<u8> for Function {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x30 => Ok(Self::SetDate),
            0x32 => Ok(Self::GetDate),
            0x40 => Ok(Self::OpenDoor),
            0x50 => Ok(Self::SetAuth),
            0x52 => Ok(Self::RemoveAuth),
            0x54 => Ok(Self::ClearAuth),
            0x5A => Ok(Self::GetAuth),
            0x90 => Ok(Self::SetServerAddress),
            0x92 => Ok(Self::GetServerAddress),
            0x94 => Ok(Self::Search),
            0x96 => Ok(Self::SetAddress),
            _ => Err(Error::UnknownFunction(value)),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
