// Property tests for the fungible ledger invariants:
// conservation (sum of balances == total supply after every operation) and
// allowance monotonicity (allowances only shrink by exactly what was spent,
// and never replenish on their own).

mod common;

use common::*;
use minivm::World;
use minivm_common::{Address, Call};
use proptest::prelude::*;

const ACCOUNTS: [Address; 3] = [ALICE, BOB, CHARLIE];

#[derive(Debug, Clone)]
enum Op {
    Transfer { from: usize, to: usize, amount: u64 },
    Approve { owner: usize, spender: usize, amount: u64 },
    TransferFrom { spender: usize, from: usize, to: usize, amount: u64 },
    Mint { to: usize, amount: u64 },
    Burn { from: usize, amount: u64 },
}

fn account() -> impl Strategy<Value = usize> {
    0..ACCOUNTS.len()
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (account(), account(), 0..500u64)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (account(), account(), 0..500u64)
            .prop_map(|(owner, spender, amount)| Op::Approve { owner, spender, amount }),
        (account(), account(), account(), 0..500u64).prop_map(
            |(spender, from, to, amount)| Op::TransferFrom { spender, from, to, amount }
        ),
        (account(), 0..500u64).prop_map(|(to, amount)| Op::Mint { to, amount }),
        (account(), 0..500u64).prop_map(|(from, amount)| Op::Burn { from, amount }),
    ]
}

fn apply(world: &mut World, op: &Op) {
    // Individual operations may legitimately fail (insufficient balance or
    // allowance, transfers to self, ...); the invariant must hold either way.
    let _ = match *op {
        Op::Transfer { from, to, amount } => world.transact(
            ACCOUNTS[from],
            TOKEN,
            &Call::Transfer { to: ACCOUNTS[to], amount },
            0,
        ),
        Op::Approve { owner, spender, amount } => world.transact(
            ACCOUNTS[owner],
            TOKEN,
            &Call::Approve { spender: ACCOUNTS[spender], amount },
            0,
        ),
        Op::TransferFrom { spender, from, to, amount } => world.transact(
            ACCOUNTS[spender],
            TOKEN,
            &Call::TransferFrom { from: ACCOUNTS[from], to: ACCOUNTS[to], amount },
            0,
        ),
        Op::Mint { to, amount } => world.transact(
            ALICE,
            TOKEN,
            &Call::Mint { to: ACCOUNTS[to], amount },
            0,
        ),
        Op::Burn { from, amount } => {
            world.transact(ACCOUNTS[from], TOKEN, &Call::Burn { amount }, 0)
        }
    };
}

fn balance_sum(world: &World) -> u64 {
    ACCOUNTS
        .iter()
        .map(|account| balance_of(world, *account))
        .sum()
}

proptest! {
    #[test]
    fn conservation_holds_across_any_operation_sequence(ops in proptest::collection::vec(op(), 1..60)) {
        let mut world = token_world();
        mint(&mut world, ALICE, 1_000);

        for op in &ops {
            apply(&mut world, op);
            prop_assert_eq!(balance_sum(&world), total_supply(&world));
        }
    }

    #[test]
    fn allowance_shrinks_by_exactly_what_is_spent(
        approved in 0..1_000u64,
        spends in proptest::collection::vec(0..400u64, 1..20),
    ) {
        let mut world = token_world();
        mint(&mut world, ALICE, 1_000);
        world
            .transact(ALICE, TOKEN, &Call::Approve { spender: BOB, amount: approved }, 0)
            .unwrap();

        let mut expected = approved;
        for amount in spends {
            let result = world.transact(
                BOB,
                TOKEN,
                &Call::TransferFrom { from: ALICE, to: CHARLIE, amount },
                0,
            );
            if result.is_ok() {
                // A successful spend is covered by the remaining allowance
                // and decrements it by exactly the amount moved
                prop_assert!(amount <= expected);
                expected -= amount;
            }
            prop_assert_eq!(allowance_of(&world, ALICE, BOB), expected);
        }
    }
}
