//! Contract storage model and the transactional overlay.
//!
//! Every contract owns a keyed storage area under its own address. Slots are
//! typed: the key says what lives there and the value carries the data. An
//! absent slot always reads as the type's zero value, never as an error.
//!
//! Mutations never land on base state directly. Each call frame accumulates
//! its writes in a [`StateOverlay`]; when the frame succeeds the overlay is
//! merged into its parent (and ultimately committed to the world), when it
//! fails the overlay is dropped wholesale. This is what gives transactions
//! their all-or-nothing semantics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::event::EventRecord;

/// Key types for contract storage
///
/// Each variant represents a unique slot in a contract's storage area. The
/// code bound to an address decides which slots it interprets; the runtime
/// treats them all uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKey {
    // ===== Token / bank ledger slots =====
    /// Recorded balance for an account
    Balance(Address),
    /// Remaining allowance from owner to spender
    Allowance { owner: Address, spender: Address },
    /// Total supply counter
    TotalSupply,
    /// Authorized minter
    Minter,

    // ===== Proxy / counter slots =====
    /// Counter interpreted by the counter logic
    Counter,
    /// Address of the bound logic contract
    Logic,
    /// Proxy owner (may rebind the logic)
    Owner,

    // ===== Attacker slots =====
    /// Bank under attack
    Target,
    /// Amount withdrawn per reentrant call
    AttackAmount,
    /// Number of nested withdrawals that succeeded
    ReentrySuccesses,
}

/// Value types for contract storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotValue {
    Amount(u64),
    Address(Address),
}

impl SlotValue {
    /// Amount stored in the slot; `None` if the slot holds an address.
    pub fn amount(&self) -> Option<u64> {
        match self {
            SlotValue::Amount(a) => Some(*a),
            _ => None,
        }
    }

    pub fn address(&self) -> Option<Address> {
        match self {
            SlotValue::Address(a) => Some(*a),
            _ => None,
        }
    }
}

/// A contract's storage area.
pub type Storage = IndexMap<SlotKey, SlotValue>;

/// Write set of one call frame.
///
/// Accumulates native balance writes, storage slot writes and emitted events
/// while a frame executes. On success the changes are merged into the parent
/// frame; on failure they are dropped.
#[derive(Debug, Clone, Default)]
pub struct StateOverlay {
    /// Native balance writes (address → new balance)
    pub accounts: IndexMap<Address, u64>,
    /// Storage slot writes ((contract, slot) → new value)
    pub slots: IndexMap<(Address, SlotKey), SlotValue>,
    /// Events emitted by this frame and its merged children
    pub events: Vec<EventRecord>,
}

impl StateOverlay {
    /// Create a new empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the overlay carries no changes
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.slots.is_empty() && self.events.is_empty()
    }

    /// Native balance write recorded in this overlay, if any
    pub fn account(&self, address: &Address) -> Option<u64> {
        self.accounts.get(address).copied()
    }

    /// Record a native balance write
    pub fn set_account(&mut self, address: Address, balance: u64) {
        self.accounts.insert(address, balance);
    }

    /// Slot write recorded in this overlay, if any
    pub fn slot(&self, contract: &Address, key: &SlotKey) -> Option<SlotValue> {
        self.slots.get(&(*contract, *key)).copied()
    }

    /// Record a slot write
    pub fn set_slot(&mut self, contract: Address, key: SlotKey, value: SlotValue) {
        self.slots.insert((contract, key), value);
    }

    /// Buffer an emitted event
    pub fn push_event(&mut self, record: EventRecord) {
        self.events.push(record);
    }

    /// View for a nested call frame: carries all writes made so far, but no
    /// events. The child's events reach this overlay only through a
    /// successful [`StateOverlay::merge`].
    pub fn child(&self) -> StateOverlay {
        StateOverlay {
            accounts: self.accounts.clone(),
            slots: self.slots.clone(),
            events: Vec::new(),
        }
    }

    /// Merge a child overlay into this one (the child's writes take
    /// precedence, its events append in order)
    pub fn merge(&mut self, child: StateOverlay) {
        for (address, balance) in child.accounts {
            self.accounts.insert(address, balance);
        }
        for (key, value) in child.slots {
            self.slots.insert(key, value);
        }
        self.events.extend(child.events);
    }
}
