//! Deposit/withdraw bank, in both withdrawal orderings.
//!
//! `Deposit` credits the caller's recorded balance by the attached native
//! value. `Withdraw` checks the recorded balance, then performs a value send
//! and a debit — and the order of those two steps is the entire difference
//! between the vulnerable and the safe variant:
//!
//! - [`WithdrawOrder::SendThenDebit`] sends first. The recipient's `Receive`
//!   hook runs while the recorded balance is still undebited, so a reentrant
//!   `Withdraw` passes the same check again.
//! - [`WithdrawOrder::DebitThenSend`] debits first. A reentrant call sees
//!   the committed debit and fails its balance check.

use log::debug;
use minivm_common::{Call, Event, SlotKey, SlotValue, Value, VmError};

use crate::context::CallContext;
use crate::world::ContractCode;

/// Order of the interaction (value send) and effect (debit) steps in
/// `Withdraw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOrder {
    /// Interaction before effect: the classic reentrancy bug.
    SendThenDebit,
    /// Effect before interaction: checks-effects-interactions discipline.
    DebitThenSend,
}

pub struct BankCode {
    order: WithdrawOrder,
}

impl BankCode {
    pub fn new(order: WithdrawOrder) -> Self {
        Self { order }
    }

    /// The naive bank under study.
    pub fn vulnerable() -> Self {
        Self::new(WithdrawOrder::SendThenDebit)
    }

    /// Same ledger with the steps in disciplined order.
    pub fn safe() -> Self {
        Self::new(WithdrawOrder::DebitThenSend)
    }

    fn deposit(ctx: &mut CallContext<'_>) -> Result<Value, VmError> {
        let from = ctx.caller();
        let amount = ctx.value();
        let recorded = ctx
            .slot_amount(SlotKey::Balance(from))
            .checked_add(amount)
            .ok_or(VmError::Overflow)?;
        ctx.set_slot(SlotKey::Balance(from), SlotValue::Amount(recorded));
        ctx.emit(Event::Deposited { from, amount });
        Ok(Value::Unit)
    }

    fn withdraw(&self, ctx: &mut CallContext<'_>, amount: u64) -> Result<Value, VmError> {
        let to = ctx.caller();
        let recorded = ctx.slot_amount(SlotKey::Balance(to));
        if recorded < amount {
            return Err(VmError::InsufficientBalance {
                need: amount,
                have: recorded,
            });
        }
        match self.order {
            WithdrawOrder::SendThenDebit => {
                // Interaction first: control reaches the recipient before
                // the debit below lands.
                ctx.send_value(to, amount)?;
                // Re-read: nested frames may have debited this slot already.
                // The naive ledger clamps at zero instead of failing, which
                // is why repeated extraction leaves only one meaningful
                // debit.
                let current = ctx.slot_amount(SlotKey::Balance(to));
                ctx.set_slot(
                    SlotKey::Balance(to),
                    SlotValue::Amount(current.saturating_sub(amount)),
                );
            }
            WithdrawOrder::DebitThenSend => {
                ctx.set_slot(SlotKey::Balance(to), SlotValue::Amount(recorded - amount));
                ctx.send_value(to, amount)?;
            }
        }
        debug!("bank {} paid {} to {}", ctx.this(), amount, to);
        ctx.emit(Event::Withdrawn { to, amount });
        Ok(Value::Bool(true))
    }
}

impl ContractCode for BankCode {
    fn dispatch(&self, ctx: &mut CallContext<'_>, call: &Call) -> Result<Value, VmError> {
        match call {
            Call::Deposit => Self::deposit(ctx),
            Call::Withdraw { amount } => self.withdraw(ctx, *amount),
            Call::RecordedBalance(account) => {
                Ok(Value::Amount(ctx.slot_amount(SlotKey::Balance(*account))))
            }
            _ => Err(VmError::NoSuchFunction),
        }
    }
}
