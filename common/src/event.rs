//! Emitted log events.
//!
//! Events buffer inside the overlay frame that emitted them and only become
//! visible through the world's committed log once the whole transaction
//! succeeds. Events from a dropped frame are never observable.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A typed log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Token movement. Mints use `from == ZERO`, burns use `to == ZERO`.
    Transfer {
        from: Address,
        to: Address,
        amount: u64,
    },
    /// Allowance overwrite by `approve` (or additive helpers).
    Approval {
        owner: Address,
        spender: Address,
        amount: u64,
    },
    /// Native value credited to a bank's recorded ledger.
    Deposited { from: Address, amount: u64 },
    /// Native value paid out of a bank's recorded ledger.
    Withdrawn { to: Address, amount: u64 },
    /// Proxy rebound to a new logic contract.
    LogicRebound {
        previous: Address,
        current: Address,
    },
}

/// An event together with the contract that emitted it.
///
/// For delegated execution the emitter is the proxy, not the logic contract:
/// events follow storage origin, like every other effect of a forwarded call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub emitter: Address,
    pub event: Event,
}
