//! minivm: a deterministic, strictly sequential contract sandbox.
//!
//! One top-level call is processed to completion (including every nested call
//! it makes) before the next begins. There is no parallelism and no
//! cancellation: a transaction either commits all of its effects or none.
//!
//! The sandbox ships three built-in contract families exercising classic
//! ledger patterns: an ERC20-like fungible token, a delegated-execution
//! proxy, and a deposit/withdraw bank in both the reentrancy-vulnerable and
//! the safe checks-effects-interactions orderings, together with the
//! attacker that tells them apart.

pub mod context;
pub mod contracts;
pub mod world;

pub use context::CallContext;
pub use world::{ContractCode, World, MAX_CALL_DEPTH};
