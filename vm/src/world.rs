//! The world: base state and the transaction boundary.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use minivm_common::{Address, Call, EventRecord, SlotKey, SlotValue, StateOverlay, Storage, Value, VmError};

use crate::context::CallContext;

/// Hard bound on nested call depth.
///
/// This is a runtime safety limit, not a behavioral knob: the built-in
/// contracts terminate on structural conditions well before reaching it.
pub const MAX_CALL_DEPTH: usize = 64;

/// Code bound to a contract address.
///
/// Code is stateless: all durable state lives in the storage area of the
/// address the code runs for, reached through the [`CallContext`]. This is
/// what lets delegated execution run one contract's code against another
/// contract's storage.
pub trait ContractCode: Send + Sync {
    fn dispatch(&self, ctx: &mut CallContext<'_>, call: &Call) -> Result<Value, VmError>;
}

/// Base state of the sandbox plus the committed event log.
///
/// All mutation flows through [`World::transact`]: changes accumulate in an
/// overlay while the call tree executes and land here only if the top-level
/// call succeeds.
#[derive(Default)]
pub struct World {
    /// Native value holdings per account
    accounts: IndexMap<Address, u64>,
    /// Deployed code per contract address
    contracts: IndexMap<Address, Arc<dyn ContractCode>>,
    /// Storage area per contract address
    storage: IndexMap<Address, Storage>,
    /// Events from committed transactions, in commit order
    events: Vec<EventRecord>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit native value to an account out of thin air. This is the test
    /// and scenario faucet; inside transactions value only moves, it is
    /// never created.
    pub fn fund(&mut self, address: Address, amount: u64) -> Result<(), VmError> {
        let balance = self.balance(&address);
        let new = balance.checked_add(amount).ok_or(VmError::Overflow)?;
        self.accounts.insert(address, new);
        Ok(())
    }

    /// Native value held by an account (zero for unknown accounts).
    pub fn balance(&self, address: &Address) -> u64 {
        self.accounts.get(address).copied().unwrap_or(0)
    }

    /// Bind code and initial storage to an address.
    pub fn deploy<C>(&mut self, at: Address, code: C, storage: Storage) -> Result<(), VmError>
    where
        C: ContractCode + 'static,
    {
        if at.is_zero() {
            return Err(VmError::ZeroAddress);
        }
        if self.contracts.contains_key(&at) {
            return Err(VmError::AlreadyDeployed(at));
        }
        debug!("deploy contract at {}", at);
        self.contracts.insert(at, Arc::new(code));
        self.storage.insert(at, storage);
        Ok(())
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    /// Code bound to an address, if any.
    pub fn code(&self, address: &Address) -> Option<Arc<dyn ContractCode>> {
        self.contracts.get(address).cloned()
    }

    /// Committed storage slot of a contract, if set.
    pub fn slot(&self, contract: &Address, key: &SlotKey) -> Option<SlotValue> {
        self.storage.get(contract)?.get(key).copied()
    }

    /// Committed event log, oldest first.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Process one top-level call to completion.
    ///
    /// On success every accumulated change (native balances, storage slots,
    /// events) commits to the base state. On any error the overlay is
    /// dropped wholesale and the world is exactly as it was before the call.
    pub fn transact(
        &mut self,
        caller: Address,
        target: Address,
        call: &Call,
        value: u64,
    ) -> Result<Value, VmError> {
        debug!("tx {} -> {} value={} call={:?}", caller, target, value, call);
        let code = self.code(&target).ok_or(VmError::NoSuchContract(target))?;

        let mut frame = StateOverlay::new();
        let result = {
            let mut ctx = CallContext::root(self, &mut frame, caller, target, value);
            ctx.collect_value(caller, target, value)
                .and_then(|_| code.dispatch(&mut ctx, call))
        };

        match result {
            Ok(value) => {
                self.commit(frame);
                Ok(value)
            }
            Err(err) => {
                debug!("tx reverted: {}", err);
                Err(err)
            }
        }
    }

    fn commit(&mut self, frame: StateOverlay) {
        trace!(
            "commit: {} balance writes, {} slot writes, {} events",
            frame.accounts.len(),
            frame.slots.len(),
            frame.events.len()
        );
        for (address, balance) in frame.accounts {
            self.accounts.insert(address, balance);
        }
        for ((contract, key), value) in frame.slots {
            self.storage.entry(contract).or_default().insert(key, value);
        }
        self.events.extend(frame.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl ContractCode for Echo {
        fn dispatch(&self, ctx: &mut CallContext<'_>, call: &Call) -> Result<Value, VmError> {
            match call {
                Call::CounterValue => Ok(Value::Amount(ctx.value())),
                _ => Err(VmError::NoSuchFunction),
            }
        }
    }

    const ALICE: Address = Address::repeat(0x01);
    const CONTRACT: Address = Address::repeat(0xC0);

    #[test]
    fn deploy_rejects_zero_and_duplicates() {
        let mut world = World::new();
        assert_eq!(
            world.deploy(Address::ZERO, Echo, Storage::new()),
            Err(VmError::ZeroAddress)
        );
        world.deploy(CONTRACT, Echo, Storage::new()).unwrap();
        assert_eq!(
            world.deploy(CONTRACT, Echo, Storage::new()),
            Err(VmError::AlreadyDeployed(CONTRACT))
        );
    }

    #[test]
    fn transact_requires_a_contract() {
        let mut world = World::new();
        assert_eq!(
            world.transact(ALICE, CONTRACT, &Call::CounterValue, 0),
            Err(VmError::NoSuchContract(CONTRACT))
        );
    }

    #[test]
    fn value_moves_with_the_call() {
        let mut world = World::new();
        world.deploy(CONTRACT, Echo, Storage::new()).unwrap();
        world.fund(ALICE, 10).unwrap();

        let seen = world
            .transact(ALICE, CONTRACT, &Call::CounterValue, 7)
            .unwrap();
        assert_eq!(seen, Value::Amount(7));
        assert_eq!(world.balance(&ALICE), 3);
        assert_eq!(world.balance(&CONTRACT), 7);
    }

    #[test]
    fn failed_call_moves_nothing() {
        let mut world = World::new();
        world.deploy(CONTRACT, Echo, Storage::new()).unwrap();
        world.fund(ALICE, 10).unwrap();

        assert_eq!(
            world.transact(ALICE, CONTRACT, &Call::Increment, 7),
            Err(VmError::NoSuchFunction)
        );
        assert_eq!(world.balance(&ALICE), 10);
        assert_eq!(world.balance(&CONTRACT), 0);
    }

    #[test]
    fn value_exceeding_holdings_is_rejected() {
        let mut world = World::new();
        world.deploy(CONTRACT, Echo, Storage::new()).unwrap();
        world.fund(ALICE, 5).unwrap();

        assert_eq!(
            world.transact(ALICE, CONTRACT, &Call::CounterValue, 6),
            Err(VmError::InsufficientValue { need: 6, have: 5 })
        );
    }
}
