//! Fungible token ledger.
//!
//! A mapping-based balance/allowance ledger with absolute-overwrite
//! `approve`, additive increase/decrease helpers, and a minter-gated `mint`.
//! Metadata (name, symbol, decimals) is fixed at deploy time; decimals are a
//! display convention and never touch the integer arithmetic.
//!
//! Invariant: the sum of all balances equals the total supply after every
//! committed operation. Only `Mint` and `Burn` change the supply.

use log::debug;
use minivm_common::{Address, Call, Event, SlotKey, SlotValue, Storage, Value, VmError};

use crate::context::CallContext;
use crate::world::ContractCode;

pub struct TokenCode {
    name: String,
    symbol: String,
    decimals: u8,
}

impl TokenCode {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Storage for a fresh deployment: `minter` holds the mint privilege,
    /// supply and all balances start at zero.
    pub fn initial_storage(minter: Address) -> Storage {
        let mut storage = Storage::new();
        storage.insert(SlotKey::Minter, SlotValue::Address(minter));
        storage
    }

    fn balance_of(ctx: &CallContext<'_>, account: &Address) -> u64 {
        ctx.slot_amount(SlotKey::Balance(*account))
    }

    fn allowance_of(ctx: &CallContext<'_>, owner: &Address, spender: &Address) -> u64 {
        ctx.slot_amount(SlotKey::Allowance {
            owner: *owner,
            spender: *spender,
        })
    }

    /// Move `amount` from `from` to `to` and emit `Transfer`. Both balance
    /// writes happen in the caller's frame: either the whole move commits or
    /// none of it does.
    fn move_balance(
        ctx: &mut CallContext<'_>,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), VmError> {
        if to.is_zero() {
            return Err(VmError::ZeroAddress);
        }
        let have = Self::balance_of(ctx, &from);
        let debited = have.checked_sub(amount).ok_or(VmError::InsufficientBalance {
            need: amount,
            have,
        })?;
        // Debit lands before the credit is read so a self-transfer nets out
        ctx.set_slot(SlotKey::Balance(from), SlotValue::Amount(debited));
        let credited = Self::balance_of(ctx, &to)
            .checked_add(amount)
            .ok_or(VmError::Overflow)?;
        ctx.set_slot(SlotKey::Balance(to), SlotValue::Amount(credited));
        ctx.emit(Event::Transfer { from, to, amount });
        Ok(())
    }

    fn write_allowance(
        ctx: &mut CallContext<'_>,
        owner: Address,
        spender: Address,
        amount: u64,
    ) {
        ctx.set_slot(
            SlotKey::Allowance { owner, spender },
            SlotValue::Amount(amount),
        );
        ctx.emit(Event::Approval {
            owner,
            spender,
            amount,
        });
    }

    fn approve(
        ctx: &mut CallContext<'_>,
        spender: Address,
        amount: u64,
    ) -> Result<Value, VmError> {
        if spender.is_zero() {
            return Err(VmError::ZeroAddress);
        }
        let owner = ctx.caller();
        // Absolute overwrite, never additive
        Self::write_allowance(ctx, owner, spender, amount);
        Ok(Value::Bool(true))
    }

    fn transfer_from(
        ctx: &mut CallContext<'_>,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<Value, VmError> {
        if to.is_zero() {
            return Err(VmError::ZeroAddress);
        }
        let spender = ctx.caller();
        let allowed = Self::allowance_of(ctx, &from, &spender);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or(VmError::InsufficientAllowance {
                need: amount,
                have: allowed,
            })?;
        Self::move_balance(ctx, from, to, amount)?;
        // The decrement is exact: the at-most-once-spend guarantee
        ctx.set_slot(
            SlotKey::Allowance {
                owner: from,
                spender,
            },
            SlotValue::Amount(remaining),
        );
        Ok(Value::Bool(true))
    }

    fn mint(ctx: &mut CallContext<'_>, to: Address, amount: u64) -> Result<Value, VmError> {
        let minter = ctx.slot_address(SlotKey::Minter);
        if minter != Some(ctx.caller()) {
            return Err(VmError::Unauthorized(ctx.caller()));
        }
        if to.is_zero() {
            return Err(VmError::ZeroAddress);
        }
        let supply = ctx
            .slot_amount(SlotKey::TotalSupply)
            .checked_add(amount)
            .ok_or(VmError::Overflow)?;
        let credited = Self::balance_of(ctx, &to)
            .checked_add(amount)
            .ok_or(VmError::Overflow)?;
        ctx.set_slot(SlotKey::TotalSupply, SlotValue::Amount(supply));
        ctx.set_slot(SlotKey::Balance(to), SlotValue::Amount(credited));
        debug!("mint {} to {}, supply now {}", amount, to, supply);
        ctx.emit(Event::Transfer {
            from: Address::ZERO,
            to,
            amount,
        });
        Ok(Value::Unit)
    }

    fn burn(ctx: &mut CallContext<'_>, amount: u64) -> Result<Value, VmError> {
        let from = ctx.caller();
        let have = Self::balance_of(ctx, &from);
        let debited = have.checked_sub(amount).ok_or(VmError::InsufficientBalance {
            need: amount,
            have,
        })?;
        let supply = ctx
            .slot_amount(SlotKey::TotalSupply)
            .checked_sub(amount)
            .ok_or(VmError::Overflow)?;
        ctx.set_slot(SlotKey::Balance(from), SlotValue::Amount(debited));
        ctx.set_slot(SlotKey::TotalSupply, SlotValue::Amount(supply));
        ctx.emit(Event::Transfer {
            from,
            to: Address::ZERO,
            amount,
        });
        Ok(Value::Unit)
    }

    fn change_allowance(
        ctx: &mut CallContext<'_>,
        spender: Address,
        delta: u64,
        increase: bool,
    ) -> Result<Value, VmError> {
        if spender.is_zero() {
            return Err(VmError::ZeroAddress);
        }
        let owner = ctx.caller();
        let current = Self::allowance_of(ctx, &owner, &spender);
        let updated = if increase {
            current.checked_add(delta).ok_or(VmError::Overflow)?
        } else {
            current
                .checked_sub(delta)
                .ok_or(VmError::InsufficientAllowance {
                    need: delta,
                    have: current,
                })?
        };
        Self::write_allowance(ctx, owner, spender, updated);
        Ok(Value::Bool(true))
    }
}

impl ContractCode for TokenCode {
    fn dispatch(&self, ctx: &mut CallContext<'_>, call: &Call) -> Result<Value, VmError> {
        match call {
            Call::Transfer { to, amount } => {
                let from = ctx.caller();
                Self::move_balance(ctx, from, *to, *amount)?;
                Ok(Value::Bool(true))
            }
            Call::Approve { spender, amount } => Self::approve(ctx, *spender, *amount),
            Call::TransferFrom { from, to, amount } => {
                Self::transfer_from(ctx, *from, *to, *amount)
            }
            Call::Mint { to, amount } => Self::mint(ctx, *to, *amount),
            Call::Burn { amount } => Self::burn(ctx, *amount),
            Call::IncreaseAllowance { spender, amount } => {
                Self::change_allowance(ctx, *spender, *amount, true)
            }
            Call::DecreaseAllowance { spender, amount } => {
                Self::change_allowance(ctx, *spender, *amount, false)
            }
            Call::TotalSupply => Ok(Value::Amount(ctx.slot_amount(SlotKey::TotalSupply))),
            Call::BalanceOf(account) => Ok(Value::Amount(Self::balance_of(ctx, account))),
            Call::AllowanceOf { owner, spender } => {
                Ok(Value::Amount(Self::allowance_of(ctx, owner, spender)))
            }
            Call::Name => Ok(Value::Text(self.name.clone())),
            Call::Symbol => Ok(Value::Text(self.symbol.clone())),
            Call::Decimals => Ok(Value::Byte(self.decimals)),
            _ => Err(VmError::NoSuchFunction),
        }
    }
}
