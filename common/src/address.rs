//! Account addresses.
//!
//! An address is an opaque 32-byte identifier. The all-zero address is the
//! designated null address: it is never a valid recipient or spender, and the
//! token ledger uses it as the conventional "from" of a mint and "to" of a
//! burn in emitted events.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VmError;

/// Opaque 32-byte account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    /// The designated null address.
    pub const ZERO: Address = Address([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Address with every byte set to `byte`. Handy for tests and demos.
    pub const fn repeat(byte: u8) -> Self {
        Self([byte; 32])
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string into an address.
    pub fn from_hex(s: &str) -> Result<Self, VmError> {
        let bytes = hex::decode(s).map_err(|_| VmError::InvalidAddress(s.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| VmError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form for logs: first four bytes are enough to tell accounts apart
        write!(f, "0x{}..", hex::encode(&self.0[..4]))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
