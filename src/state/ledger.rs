use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::EngineError;

use super::{AccountId, AssetId};

/// Per-user, per-asset deposited collateral, in native asset units. Mutated
/// only by deposits and redemptions routed through the engine.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CollateralLedger {
    positions: BTreeMap<(AccountId, AssetId), u128>,
}

impl CollateralLedger {
    pub fn balance_of(&self, user: &AccountId, asset: &AssetId) -> u128 {
        self.positions.get(&(*user, *asset)).copied().unwrap_or(0)
    }

    /// Credit a deposit to `user`'s position.
    pub fn deposit(
        &mut self,
        user: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), EngineError> {
        let position = self.positions.entry((*user, *asset)).or_insert(0);
        *position = position
            .checked_add(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Debit `amount` from `from`'s position. A decrement below zero is a
    /// fatal underflow, never a wrap.
    pub fn redeem(
        &mut self,
        from: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), EngineError> {
        let position = self
            .positions
            .get_mut(&(*from, *asset))
            .ok_or(EngineError::ArithmeticUnderflow)?;
        *position = position
            .checked_sub(amount)
            .ok_or(EngineError::ArithmeticUnderflow)?;
        Ok(())
    }
}

/// Per-user minted liability, in canonical 18-decimal units.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DebtLedger {
    minted: BTreeMap<AccountId, u128>,
}

impl DebtLedger {
    pub fn debt_of(&self, user: &AccountId) -> u128 {
        self.minted.get(user).copied().unwrap_or(0)
    }

    /// Record newly minted liability against `on_behalf_of`.
    pub fn mint(&mut self, on_behalf_of: &AccountId, amount: u128) -> Result<(), EngineError> {
        let debt = self.minted.entry(*on_behalf_of).or_insert(0);
        *debt = debt
            .checked_add(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Clear `amount` of `on_behalf_of`'s recorded debt.
    pub fn burn(&mut self, on_behalf_of: &AccountId, amount: u128) -> Result<(), EngineError> {
        let debt = self
            .minted
            .get_mut(on_behalf_of)
            .ok_or(EngineError::ArithmeticUnderflow)?;
        *debt = debt
            .checked_sub(amount)
            .ok_or(EngineError::ArithmeticUnderflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(tag: u8) -> AccountId {
        AccountId([tag; 32])
    }

    fn asset(tag: u8) -> AssetId {
        AssetId([tag; 32])
    }

    #[test]
    fn test_collateral_deposit_accumulates() {
        let mut ledger = CollateralLedger::default();
        ledger.deposit(&user(1), &asset(9), 100).unwrap();
        ledger.deposit(&user(1), &asset(9), 50).unwrap();
        assert_eq!(ledger.balance_of(&user(1), &asset(9)), 150);
        // Other keys are untouched.
        assert_eq!(ledger.balance_of(&user(2), &asset(9)), 0);
        assert_eq!(ledger.balance_of(&user(1), &asset(8)), 0);
    }

    #[test]
    fn test_collateral_redeem_underflow_is_fatal() {
        let mut ledger = CollateralLedger::default();
        ledger.deposit(&user(1), &asset(9), 100).unwrap();
        assert_eq!(
            ledger.redeem(&user(1), &asset(9), 101),
            Err(EngineError::ArithmeticUnderflow)
        );
        // An absent position cannot be debited either.
        assert_eq!(
            ledger.redeem(&user(2), &asset(9), 1),
            Err(EngineError::ArithmeticUnderflow)
        );
        ledger.redeem(&user(1), &asset(9), 100).unwrap();
        assert_eq!(ledger.balance_of(&user(1), &asset(9)), 0);
    }

    #[test]
    fn test_debt_mint_and_burn() {
        let mut ledger = DebtLedger::default();
        ledger.mint(&user(1), 500).unwrap();
        ledger.burn(&user(1), 200).unwrap();
        assert_eq!(ledger.debt_of(&user(1)), 300);
        assert_eq!(
            ledger.burn(&user(1), 301),
            Err(EngineError::ArithmeticUnderflow)
        );
        assert_eq!(
            ledger.burn(&user(2), 1),
            Err(EngineError::ArithmeticUnderflow)
        );
    }

    #[test]
    fn test_deposit_overflow_is_fatal() {
        let mut ledger = CollateralLedger::default();
        ledger.deposit(&user(1), &asset(9), u128::MAX).unwrap();
        assert_eq!(
            ledger.deposit(&user(1), &asset(9), 1),
            Err(EngineError::ArithmeticOverflow)
        );
    }
}
