use crate::state::AccountId;

/// Transfer capability of an accepted collateral asset. The engine moves
/// collateral through this surface and never tracks the token's own supply.
pub trait CollateralToken {
    /// Pull `amount` from `from` into `to`. Returns false on failure.
    fn transfer_from(&self, from: &AccountId, to: &AccountId, amount: u128) -> bool;

    /// Push `amount` out of the engine's holdings to `to`. Returns false on
    /// failure.
    fn transfer(&self, to: &AccountId, amount: u128) -> bool;
}

/// Capability surface of the pegged liability token.
pub trait LiabilityToken {
    /// Create `amount` units for `to`. Returns false on failure.
    fn mint(&self, to: &AccountId, amount: u128) -> bool;

    /// Destroy `amount` units held by the engine itself.
    fn burn(&self, amount: u128);

    /// Pull `amount` from `from` into `to`. Returns false on failure.
    fn transfer_from(&self, from: &AccountId, to: &AccountId, amount: u128) -> bool;
}
