use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::constants::MIN_HEALTH_FACTOR;
use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::health;
use crate::math;
use crate::oracle::{PriceFeed, PriceOracleAdapter};
use crate::state::{AccountId, AssetId, AssetRegistry, CollateralLedger, DebtLedger};
use crate::token::{CollateralToken, LiabilityToken};
use crate::LOG_TARGET;

/// Construction-time configuration. The three asset lists are parallel and
/// must be the same length.
pub struct EngineConfig {
    /// The engine's own identity: the `to` of every inbound pull.
    pub engine_account: AccountId,
    pub asset_ids: Vec<AssetId>,
    pub collateral_tokens: Vec<Rc<dyn CollateralToken>>,
    pub price_feeds: Vec<Rc<dyn PriceFeed>>,
    pub liability_token: Rc<dyn LiabilityToken>,
    pub oracle: PriceOracleAdapter,
}

#[derive(Clone, Default)]
struct Ledgers {
    collateral: CollateralLedger,
    debt: DebtLedger,
}

/// Composition root. Owns both ledgers and the asset registry; every
/// mutation is funneled through the gated entry points below, which hold a
/// non-reentrant critical section and commit atomically or not at all.
pub struct Engine {
    registry: AssetRegistry,
    liability: Rc<dyn LiabilityToken>,
    oracle: PriceOracleAdapter,
    engine_account: AccountId,
    ledgers: RefCell<Ledgers>,
    events: RefCell<Vec<EngineEvent>>,
    entered: Cell<bool>,
}

/// Scoped mutual exclusion around a mutating entry point. Dropping the
/// guard releases the flag on every exit path.
struct ReentryGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ReentryGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Result<Self, EngineError> {
        if flag.replace(true) {
            return Err(EngineError::Reentrancy);
        }
        Ok(Self { flag })
    }
}

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let EngineConfig {
            engine_account,
            asset_ids,
            collateral_tokens,
            price_feeds,
            liability_token,
            oracle,
        } = config;
        let registry = AssetRegistry::new(asset_ids, collateral_tokens, price_feeds)?;
        Ok(Self {
            registry,
            liability: liability_token,
            oracle,
            engine_account,
            ledgers: RefCell::new(Ledgers::default()),
            events: RefCell::new(Vec::new()),
            entered: Cell::new(false),
        })
    }

    // ---- public mutating operations ----

    /// Deposit collateral. No solvency check: depositing only improves
    /// health.
    pub fn deposit_collateral(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), EngineError> {
        self.guarded(|engine| engine.do_deposit(caller, asset, amount))
    }

    /// Mint liability against the caller's collateral. The caller's health
    /// factor is asserted after the ledger increment and before the external
    /// mint.
    pub fn mint_dsc(&self, caller: &AccountId, amount: u128) -> Result<(), EngineError> {
        self.guarded(|engine| engine.do_mint(caller, amount))
    }

    /// Deposit and mint as one atomic unit.
    pub fn deposit_collateral_and_mint_dsc(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        collateral_amount: u128,
        mint_amount: u128,
    ) -> Result<(), EngineError> {
        self.guarded(|engine| {
            engine.do_deposit(caller, asset, collateral_amount)?;
            engine.do_mint(caller, mint_amount)
        })
    }

    /// Withdraw collateral. The caller's health factor is asserted after the
    /// decrement and outbound transfer; a broken factor unwinds the whole
    /// redemption.
    pub fn redeem_collateral(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), EngineError> {
        self.guarded(|engine| {
            engine.do_redeem(caller, caller, asset, amount)?;
            engine.assert_healthy(caller)
        })
    }

    /// Repay the caller's own debt.
    pub fn burn_dsc(&self, caller: &AccountId, amount: u128) -> Result<(), EngineError> {
        self.guarded(|engine| {
            engine.do_burn(caller, caller, amount)?;
            // Burning debt can only raise the ratio; asserted regardless.
            engine.assert_healthy(caller)
        })
    }

    /// Burn then redeem as one atomic unit, so the debt reduction is already
    /// reflected when the redemption's solvency check runs.
    pub fn redeem_collateral_for_dsc(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        collateral_amount: u128,
        burn_amount: u128,
    ) -> Result<(), EngineError> {
        self.guarded(|engine| {
            engine.do_burn(caller, caller, burn_amount)?;
            engine.do_redeem(caller, caller, asset, collateral_amount)?;
            engine.assert_healthy(caller)
        })
    }

    /// Repay `debt_to_cover` of `user`'s debt and seize the equivalent
    /// collateral plus the liquidation bonus. Only broken positions are
    /// liquidatable, the target's ratio must strictly improve, and the
    /// liquidator must end solvent themselves.
    pub fn liquidate(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        user: &AccountId,
        debt_to_cover: u128,
    ) -> Result<(), EngineError> {
        self.guarded(|engine| engine.do_liquidate(caller, asset, user, debt_to_cover))
    }

    // ---- public read surface ----

    /// USD value of `amount` native units of `asset`.
    pub fn usd_value(&self, asset: &AssetId, amount: u128) -> Result<u128, EngineError> {
        let entry = self.registry.get(asset)?;
        self.oracle.usd_value(entry.feed.as_ref(), amount)
    }

    /// Native amount of `asset` worth `usd_amount`.
    pub fn token_amount_from_usd(
        &self,
        asset: &AssetId,
        usd_amount: u128,
    ) -> Result<u128, EngineError> {
        let entry = self.registry.get(asset)?;
        self.oracle.native_amount_for_usd(entry.feed.as_ref(), usd_amount)
    }

    /// Total USD value of `user`'s collateral across all registered assets.
    pub fn account_collateral_value_in_usd(&self, user: &AccountId) -> Result<u128, EngineError> {
        let mut total: u128 = 0;
        for entry in self.registry.entries() {
            let balance = self.ledgers.borrow().collateral.balance_of(user, &entry.asset_id);
            if balance == 0 {
                continue;
            }
            let value = self.oracle.usd_value(entry.feed.as_ref(), balance)?;
            total = math::checked_add(total, value)?;
        }
        Ok(total)
    }

    /// Current solvency ratio of `user`, `u128::MAX` when debt-free.
    pub fn health_factor(&self, user: &AccountId) -> Result<u128, EngineError> {
        let debt = self.ledgers.borrow().debt.debt_of(user);
        let collateral_value = self.account_collateral_value_in_usd(user)?;
        health::health_factor(collateral_value, debt)
    }

    /// Total debt and total collateral value of `user`.
    pub fn account_information(&self, user: &AccountId) -> Result<(u128, u128), EngineError> {
        let debt = self.ledgers.borrow().debt.debt_of(user);
        let collateral_value = self.account_collateral_value_in_usd(user)?;
        Ok((debt, collateral_value))
    }

    pub fn collateral_balance_of(&self, user: &AccountId, asset: &AssetId) -> u128 {
        self.ledgers.borrow().collateral.balance_of(user, asset)
    }

    pub fn debt_of(&self, user: &AccountId) -> u128 {
        self.ledgers.borrow().debt.debt_of(user)
    }

    /// Registered collateral asset ids.
    pub fn collateral_assets(&self) -> Vec<AssetId> {
        self.registry.asset_ids()
    }

    /// Drain the buffered events of all committed operations.
    pub fn take_events(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    // ---- gating ----

    /// Run `op` inside the non-reentrant critical section. Ledger state and
    /// the event buffer are snapshotted on entry; any error restores both,
    /// so a failed operation has no effect.
    fn guarded<T>(
        &self,
        op: impl FnOnce(&Self) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let _guard = ReentryGuard::acquire(&self.entered)?;
        let snapshot = self.ledgers.borrow().clone();
        let events_mark = self.events.borrow().len();
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                *self.ledgers.borrow_mut() = snapshot;
                self.events.borrow_mut().truncate(events_mark);
                log::debug!(target: LOG_TARGET, "operation rolled back: {err}");
                Err(err)
            }
        }
    }

    fn assert_healthy(&self, user: &AccountId) -> Result<(), EngineError> {
        let health_factor = self.health_factor(user)?;
        if !health::is_healthy(health_factor) {
            return Err(EngineError::HealthFactorBroken { health_factor });
        }
        Ok(())
    }

    // ---- operation bodies (composable under one guard) ----

    fn do_deposit(
        &self,
        caller: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), EngineError> {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let entry = self.registry.get(asset)?;
        self.ledgers.borrow_mut().collateral.deposit(caller, asset, amount)?;
        if !entry.token.transfer_from(caller, &self.engine_account, amount) {
            return Err(EngineError::TransferFailed);
        }
        self.events.borrow_mut().push(EngineEvent::CollateralDeposited {
            user: *caller,
            asset: *asset,
            amount,
        });
        log::debug!(target: LOG_TARGET, "collateral deposited: {amount}");
        Ok(())
    }

    fn do_mint(&self, caller: &AccountId, amount: u128) -> Result<(), EngineError> {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        self.ledgers.borrow_mut().debt.mint(caller, amount)?;
        self.assert_healthy(caller)?;
        if !self.liability.mint(caller, amount) {
            return Err(EngineError::MintFailed);
        }
        self.events.borrow_mut().push(EngineEvent::DscMinted {
            user: *caller,
            amount,
        });
        log::debug!(target: LOG_TARGET, "liability minted: {amount}");
        Ok(())
    }

    /// Ledger decrement then outbound transfer. `from` and `to` differ when
    /// a liquidator seizes collateral.
    fn do_redeem(
        &self,
        from: &AccountId,
        to: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), EngineError> {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let entry = self.registry.get(asset)?;
        self.ledgers.borrow_mut().collateral.redeem(from, asset, amount)?;
        if !entry.token.transfer(to, amount) {
            return Err(EngineError::TransferFailed);
        }
        self.events.borrow_mut().push(EngineEvent::CollateralRedeemed {
            from: *from,
            to: *to,
            asset: *asset,
            amount,
        });
        log::debug!(target: LOG_TARGET, "collateral redeemed: {amount}");
        Ok(())
    }

    /// Clear `on_behalf_of`'s recorded debt by pulling liability tokens from
    /// `payer` and destroying them.
    fn do_burn(
        &self,
        on_behalf_of: &AccountId,
        payer: &AccountId,
        amount: u128,
    ) -> Result<(), EngineError> {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        self.ledgers.borrow_mut().debt.burn(on_behalf_of, amount)?;
        if !self.liability.transfer_from(payer, &self.engine_account, amount) {
            return Err(EngineError::TransferFailed);
        }
        self.liability.burn(amount);
        self.events.borrow_mut().push(EngineEvent::DscBurned {
            on_behalf_of: *on_behalf_of,
            payer: *payer,
            amount,
        });
        log::debug!(target: LOG_TARGET, "liability burned: {amount}");
        Ok(())
    }

    fn do_liquidate(
        &self,
        liquidator: &AccountId,
        asset: &AssetId,
        user: &AccountId,
        debt_to_cover: u128,
    ) -> Result<(), EngineError> {
        if debt_to_cover == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let starting_health_factor = self.health_factor(user)?;
        if health::is_healthy(starting_health_factor) {
            return Err(EngineError::HealthFactorIntact);
        }

        // Size the seizure: the covered debt converted to native units,
        // plus the liquidator's bonus. If the position cannot fund the
        // seizure the redemption underflows and the call unwinds; the
        // uncovered remainder of the debt stays unbacked.
        let entry = self.registry.get(asset)?;
        let seized_base = self
            .oracle
            .native_amount_for_usd(entry.feed.as_ref(), debt_to_cover)?;
        let bonus = health::liquidation_bonus(seized_base)?;
        let total_seized = math::checked_add(seized_base, bonus)?;

        self.do_redeem(user, liquidator, asset, total_seized)?;
        self.do_burn(user, liquidator, debt_to_cover)?;

        let ending_health_factor = self.health_factor(user)?;
        if ending_health_factor <= starting_health_factor {
            return Err(EngineError::HealthFactorNotImproved);
        }
        self.assert_healthy(liquidator)?;

        self.events.borrow_mut().push(EngineEvent::Liquidated {
            user: *user,
            liquidator: *liquidator,
            asset: *asset,
            debt_covered: debt_to_cover,
            collateral_seized: total_seized,
        });
        log::debug!(
            target: LOG_TARGET,
            "liquidated: covered {debt_to_cover}, seized {total_seized}"
        );
        Ok(())
    }
}
