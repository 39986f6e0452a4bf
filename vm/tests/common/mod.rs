//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use minivm::contracts::TokenCode;
use minivm::World;
use minivm_common::{Address, Call, SlotKey};

pub const ALICE: Address = Address::repeat(0x01);
pub const BOB: Address = Address::repeat(0x02);
pub const CHARLIE: Address = Address::repeat(0x03);

pub const TOKEN: Address = Address::repeat(0xA0);
pub const LOGIC: Address = Address::repeat(0xB0);
pub const PROXY: Address = Address::repeat(0xB1);
pub const BANK: Address = Address::repeat(0xC0);
pub const ATTACKER: Address = Address::repeat(0xC1);

pub const TEST_NAME: &str = "TestToken";
pub const TEST_SYMBOL: &str = "TEST";
pub const TEST_DECIMALS: u8 = 18;

/// World with a token deployed and ALICE holding the mint privilege.
pub fn token_world() -> World {
    let mut world = World::new();
    world
        .deploy(
            TOKEN,
            TokenCode::new(TEST_NAME, TEST_SYMBOL, TEST_DECIMALS),
            TokenCode::initial_storage(ALICE),
        )
        .unwrap();
    world
}

pub fn mint(world: &mut World, to: Address, amount: u64) {
    world
        .transact(ALICE, TOKEN, &Call::Mint { to, amount }, 0)
        .unwrap();
}

/// Committed token balance, read straight from storage.
pub fn balance_of(world: &World, account: Address) -> u64 {
    world
        .slot(&TOKEN, &SlotKey::Balance(account))
        .and_then(|v| v.amount())
        .unwrap_or(0)
}

pub fn allowance_of(world: &World, owner: Address, spender: Address) -> u64 {
    world
        .slot(&TOKEN, &SlotKey::Allowance { owner, spender })
        .and_then(|v| v.amount())
        .unwrap_or(0)
}

pub fn total_supply(world: &World) -> u64 {
    world
        .slot(&TOKEN, &SlotKey::TotalSupply)
        .and_then(|v| v.amount())
        .unwrap_or(0)
}

/// Committed counter of a contract (proxy demo).
pub fn counter_of(world: &World, contract: Address) -> u64 {
    world
        .slot(&contract, &SlotKey::Counter)
        .and_then(|v| v.amount())
        .unwrap_or(0)
}

/// Recorded bank balance of an account (reentrancy demo).
pub fn recorded_balance(world: &World, account: Address) -> u64 {
    world
        .slot(&BANK, &SlotKey::Balance(account))
        .and_then(|v| v.amount())
        .unwrap_or(0)
}
