//! The call surface shared by every contract in the sandbox.
//!
//! `Call` plays the role an ABI selector plus decoded arguments would play in
//! a real execution environment. Each contract dispatches on the variants it
//! defines and answers `NoSuchFunction` for everything else, which is what
//! makes "forward an unknown selector" and "call a function the logic does
//! not define" observable behaviors.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A decoded contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    // ===== Fungible token ledger =====
    Transfer { to: Address, amount: u64 },
    Approve { spender: Address, amount: u64 },
    TransferFrom { from: Address, to: Address, amount: u64 },
    Mint { to: Address, amount: u64 },
    Burn { amount: u64 },
    IncreaseAllowance { spender: Address, amount: u64 },
    DecreaseAllowance { spender: Address, amount: u64 },
    TotalSupply,
    BalanceOf(Address),
    AllowanceOf { owner: Address, spender: Address },
    Name,
    Symbol,
    Decimals,

    // ===== Counter logic (proxy demo) =====
    Increment,
    CounterValue,

    // ===== Proxy management =====
    SetLogic(Address),
    LogicAddress,

    // ===== Bank ledger (reentrancy demo) =====
    Deposit,
    Withdraw { amount: u64 },
    RecordedBalance(Address),

    // ===== Attacker =====
    Attack { amount: u64 },

    /// Value-transfer notification hook. Dispatched by the runtime when a
    /// contract receives native value, never sent directly by users.
    Receive,
}

/// Return value of a contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Unit,
    Bool(bool),
    Amount(u64),
    Address(Address),
    Byte(u8),
    Text(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_amount(&self) -> Option<u64> {
        match self {
            Value::Amount(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }
}
