//! Built-in contracts.

pub mod attacker;
pub mod bank;
pub mod counter;
pub mod proxy;
pub mod token;

pub use attacker::AttackerCode;
pub use bank::{BankCode, WithdrawOrder};
pub use counter::CounterLogic;
pub use proxy::ProxyCode;
pub use token::TokenCode;
