//! Reentrant attacker for the bank demo.
//!
//! `Attack` seeds the target bank with a deposit and triggers the first
//! withdrawal. The `Receive` hook re-enters `Withdraw` for as long as the
//! bank's native holdings still cover the amount — a structural stop
//! condition, not a gas or loop-count artifact. A failed reentrant call is
//! handled, not propagated, so against the safe bank the outer withdrawal
//! still completes exactly once.

use log::debug;
use minivm_common::{Address, Call, SlotKey, SlotValue, Storage, Value, VmError};

use crate::context::CallContext;
use crate::world::ContractCode;

pub struct AttackerCode;

impl AttackerCode {
    /// Storage for a fresh deployment aimed at `target`.
    pub fn initial_storage(target: Address) -> Storage {
        let mut storage = Storage::new();
        storage.insert(SlotKey::Target, SlotValue::Address(target));
        storage
    }

    fn target(ctx: &CallContext<'_>) -> Result<Address, VmError> {
        ctx.slot_address(SlotKey::Target)
            .ok_or(VmError::NoSuchContract(Address::ZERO))
    }

    fn attack(ctx: &mut CallContext<'_>, amount: u64) -> Result<Value, VmError> {
        let bank = Self::target(ctx)?;
        if amount == 0 || ctx.value() < amount {
            return Err(VmError::InsufficientValue {
                need: amount,
                have: ctx.value(),
            });
        }
        ctx.set_slot(SlotKey::AttackAmount, SlotValue::Amount(amount));
        ctx.set_slot(SlotKey::ReentrySuccesses, SlotValue::Amount(0));
        ctx.call(bank, &Call::Deposit, amount)?;
        ctx.call(bank, &Call::Withdraw { amount }, 0)?;
        Ok(Value::Unit)
    }

    fn receive(ctx: &mut CallContext<'_>) -> Result<Value, VmError> {
        let amount = ctx.slot_amount(SlotKey::AttackAmount);
        if amount == 0 {
            // Plain incoming value, no attack armed
            return Ok(Value::Unit);
        }
        let bank = Self::target(ctx)?;
        if ctx.native_balance(&bank) >= amount {
            match ctx.call(bank, &Call::Withdraw { amount }, 0) {
                Ok(_) => {
                    let successes = ctx.slot_amount(SlotKey::ReentrySuccesses) + 1;
                    ctx.set_slot(SlotKey::ReentrySuccesses, SlotValue::Amount(successes));
                }
                Err(err) => {
                    // The reentrant frame was dropped; the outer withdrawal
                    // goes on without us.
                    debug!("reentrant withdraw rejected: {}", err);
                }
            }
        }
        Ok(Value::Unit)
    }
}

impl ContractCode for AttackerCode {
    fn dispatch(&self, ctx: &mut CallContext<'_>, call: &Call) -> Result<Value, VmError> {
        match call {
            Call::Attack { amount } => Self::attack(ctx, *amount),
            Call::Receive => Self::receive(ctx),
            _ => Err(VmError::NoSuchFunction),
        }
    }
}
