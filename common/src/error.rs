use thiserror::Error;

use crate::address::Address;

/// Error taxonomy shared by the runtime and the built-in contracts.
///
/// Any error returned from a top-level call aborts the whole transaction:
/// no partial effects survive. A contract may handle the failure of a call
/// it made itself, in which case only the failed frame's effects are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("Insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: u64, have: u64 },

    #[error("Insufficient allowance: need {need}, have {have}")]
    InsufficientAllowance { need: u64, have: u64 },

    #[error("Zero address not allowed")]
    ZeroAddress,

    #[error("Caller {0} is not authorized")]
    Unauthorized(Address),

    #[error("No matching function for call")]
    NoSuchFunction,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Insufficient value: need {need}, have {have}")]
    InsufficientValue { need: u64, have: u64 },

    #[error("No contract deployed at {0}")]
    NoSuchContract(Address),

    #[error("Contract already deployed at {0}")]
    AlreadyDeployed(Address),

    #[error("Call depth limit exceeded")]
    CallDepthExceeded,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
