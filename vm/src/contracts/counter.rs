//! Counter logic for the delegated-execution demo.
//!
//! Defines how a `Counter` slot is interpreted; *whose* counter slot that is
//! depends on the identity of the frame the code runs in. Called directly it
//! mutates its own storage, called through a proxy it mutates the proxy's.

use minivm_common::{Call, SlotKey, SlotValue, Value, VmError};

use crate::context::CallContext;
use crate::world::ContractCode;

pub struct CounterLogic;

impl ContractCode for CounterLogic {
    fn dispatch(&self, ctx: &mut CallContext<'_>, call: &Call) -> Result<Value, VmError> {
        match call {
            Call::Increment => {
                let next = ctx
                    .slot_amount(SlotKey::Counter)
                    .checked_add(1)
                    .ok_or(VmError::Overflow)?;
                ctx.set_slot(SlotKey::Counter, SlotValue::Amount(next));
                Ok(Value::Amount(next))
            }
            Call::CounterValue => Ok(Value::Amount(ctx.slot_amount(SlotKey::Counter))),
            _ => Err(VmError::NoSuchFunction),
        }
    }
}
