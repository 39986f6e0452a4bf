//! Per-frame execution context.
//!
//! A [`CallContext`] is handed to contract code for the duration of one call
//! frame. It carries the caller/callee identities, the attached value, and
//! the frame's overlay; every read goes overlay-first, then base state, and
//! every write goes to the overlay only.

use log::trace;
use minivm_common::{Address, Call, Event, EventRecord, SlotKey, SlotValue, StateOverlay, Value, VmError};

use crate::world::{World, MAX_CALL_DEPTH};

pub struct CallContext<'a> {
    world: &'a World,
    frame: &'a mut StateOverlay,
    depth: usize,
    /// Immediate caller of this frame
    caller: Address,
    /// Identity the frame executes as; storage reads/writes and emitted
    /// events resolve against this address. Under delegated execution this
    /// stays the proxy while the code comes from elsewhere.
    this: Address,
    /// Native value attached to the call
    value: u64,
}

impl<'a> CallContext<'a> {
    /// Root frame of a transaction.
    pub(crate) fn root(
        world: &'a World,
        frame: &'a mut StateOverlay,
        caller: Address,
        target: Address,
        value: u64,
    ) -> Self {
        Self {
            world,
            frame,
            depth: 0,
            caller,
            this: target,
            value,
        }
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Address this frame executes as.
    pub fn this(&self) -> Address {
        self.this
    }

    /// Native value attached to this call.
    pub fn value(&self) -> u64 {
        self.value
    }

    // ===== State reads (overlay first, then base) =====

    /// Native value held by any account, as visible to this frame.
    pub fn native_balance(&self, address: &Address) -> u64 {
        self.frame
            .account(address)
            .unwrap_or_else(|| self.world.balance(address))
    }

    /// Amount stored in one of this contract's slots; absent slots read as
    /// zero.
    pub fn slot_amount(&self, key: SlotKey) -> u64 {
        self.read_slot(&key).and_then(|v| v.amount()).unwrap_or(0)
    }

    /// Address stored in one of this contract's slots, if set.
    pub fn slot_address(&self, key: SlotKey) -> Option<Address> {
        self.read_slot(&key).and_then(|v| v.address())
    }

    fn read_slot(&self, key: &SlotKey) -> Option<SlotValue> {
        self.frame
            .slot(&self.this, key)
            .or_else(|| self.world.slot(&self.this, key))
    }

    // ===== State writes (overlay only) =====

    /// Write one of this contract's slots.
    pub fn set_slot(&mut self, key: SlotKey, value: SlotValue) {
        self.frame.set_slot(self.this, key, value);
    }

    /// Emit an event attributed to this frame's identity.
    pub fn emit(&mut self, event: Event) {
        trace!("emit {}: {:?}", self.this, event);
        self.frame.push_event(EventRecord {
            emitter: self.this,
            event,
        });
    }

    // ===== Calls =====

    /// Synchronously call another contract.
    ///
    /// The callee runs in a child frame: if it returns `Ok` the child's
    /// writes and events merge into this frame, if it returns `Err` they are
    /// dropped and the error is handed back to the caller, which may
    /// propagate or handle it.
    pub fn call(&mut self, target: Address, call: &Call, value: u64) -> Result<Value, VmError> {
        if self.depth + 1 > MAX_CALL_DEPTH {
            return Err(VmError::CallDepthExceeded);
        }
        let code = self
            .world
            .code(&target)
            .ok_or(VmError::NoSuchContract(target))?;
        trace!(
            "call {} -> {} value={} depth={}",
            self.this,
            target,
            value,
            self.depth + 1
        );

        let mut frame = self.frame.child();
        let result = {
            let mut ctx = CallContext {
                world: self.world,
                frame: &mut frame,
                depth: self.depth + 1,
                caller: self.this,
                this: target,
                value,
            };
            let from = ctx.caller;
            ctx.collect_value(from, target, value)
                .and_then(|_| code.dispatch(&mut ctx, call))
        };

        match result {
            Ok(value) => {
                self.frame.merge(frame);
                Ok(value)
            }
            Err(err) => {
                trace!("frame dropped at depth {}: {}", self.depth + 1, err);
                Err(err)
            }
        }
    }

    /// Run another contract's code in this frame, against this frame's
    /// identity and storage. Caller, attached value and overlay are all
    /// preserved; only the code origin changes.
    pub fn delegate(&mut self, logic: Address, call: &Call) -> Result<Value, VmError> {
        if self.depth + 1 > MAX_CALL_DEPTH {
            return Err(VmError::CallDepthExceeded);
        }
        let code = self
            .world
            .code(&logic)
            .ok_or(VmError::NoSuchContract(logic))?;
        trace!("delegate {} running code of {}", self.this, logic);
        self.depth += 1;
        let result = code.dispatch(self, call);
        self.depth -= 1;
        result
    }

    /// Send native value out of this contract.
    ///
    /// If the recipient is a contract its `Receive` hook runs synchronously
    /// before this method returns; whatever that hook does (including
    /// calling back into the sender) happens before the sender's next
    /// statement. Plain accounts are credited directly. A contract that
    /// does not define `Receive` fails the send.
    pub fn send_value(&mut self, to: Address, amount: u64) -> Result<(), VmError> {
        if self.world.is_contract(&to) {
            self.call(to, &Call::Receive, amount).map(|_| ())
        } else {
            let from = self.this;
            self.collect_value(from, to, amount)
        }
    }

    /// Move native value inside this frame; no code runs.
    pub(crate) fn collect_value(
        &mut self,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), VmError> {
        if amount == 0 {
            return Ok(());
        }
        let have = self.native_balance(&from);
        let debited = have
            .checked_sub(amount)
            .ok_or(VmError::InsufficientValue { need: amount, have })?;
        // Debit lands before the credit is read so a self-send nets out
        self.frame.set_account(from, debited);
        let credited = self
            .native_balance(&to)
            .checked_add(amount)
            .ok_or(VmError::Overflow)?;
        self.frame.set_account(to, credited);
        Ok(())
    }
}
