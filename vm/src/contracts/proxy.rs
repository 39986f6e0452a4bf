//! Delegated-execution proxy.
//!
//! The proxy answers its own management calls (`SetLogic`, `LogicAddress`)
//! and forwards everything else to the code of the currently bound logic
//! contract, executed against the proxy's own storage and identity. Return
//! values and errors of the inner execution propagate unchanged. Rebinding
//! the logic address touches only the `Logic` slot, so all other proxy
//! storage survives an upgrade.

use log::debug;
use minivm_common::{Address, Call, Event, SlotKey, SlotValue, Storage, Value, VmError};

use crate::context::CallContext;
use crate::world::ContractCode;

pub struct ProxyCode;

impl ProxyCode {
    /// Storage for a fresh deployment, bound to `logic` and owned by
    /// `owner`.
    pub fn initial_storage(owner: Address, logic: Address) -> Storage {
        let mut storage = Storage::new();
        storage.insert(SlotKey::Owner, SlotValue::Address(owner));
        storage.insert(SlotKey::Logic, SlotValue::Address(logic));
        storage
    }

    fn set_logic(ctx: &mut CallContext<'_>, logic: Address) -> Result<Value, VmError> {
        let owner = ctx.slot_address(SlotKey::Owner);
        if owner != Some(ctx.caller()) {
            return Err(VmError::Unauthorized(ctx.caller()));
        }
        if logic.is_zero() {
            return Err(VmError::ZeroAddress);
        }
        let previous = ctx.slot_address(SlotKey::Logic).unwrap_or(Address::ZERO);
        ctx.set_slot(SlotKey::Logic, SlotValue::Address(logic));
        debug!("proxy {} rebound {} -> {}", ctx.this(), previous, logic);
        ctx.emit(Event::LogicRebound {
            previous,
            current: logic,
        });
        Ok(Value::Unit)
    }
}

impl ContractCode for ProxyCode {
    fn dispatch(&self, ctx: &mut CallContext<'_>, call: &Call) -> Result<Value, VmError> {
        match call {
            Call::SetLogic(logic) => Self::set_logic(ctx, *logic),
            Call::LogicAddress => Ok(Value::Address(
                ctx.slot_address(SlotKey::Logic).unwrap_or(Address::ZERO),
            )),
            forwarded => {
                let logic = ctx
                    .slot_address(SlotKey::Logic)
                    .ok_or(VmError::NoSuchContract(Address::ZERO))?;
                ctx.delegate(logic, forwarded)
            }
        }
    }
}
