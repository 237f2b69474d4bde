//! Pure solvency arithmetic. Stateless over ledger snapshots so the gating
//! logic in the engine stays a thin orchestration layer.

use crate::constants::{
    LIQUIDATION_BONUS, LIQUIDATION_PRECISION, LIQUIDATION_THRESHOLD, MIN_HEALTH_FACTOR, PRECISION,
};
use crate::error::EngineError;
use crate::math;

/// Solvency ratio of a position in 18-decimal fixed point: risk-adjusted
/// collateral value over total debt. Only half the collateral value counts
/// (2x over-collateralization).
///
/// Zero debt is unconditionally healthy; the division is never executed.
pub fn health_factor(total_collateral_usd: u128, total_debt: u128) -> Result<u128, EngineError> {
    if total_debt == 0 {
        return Ok(u128::MAX);
    }
    let adjusted = math::mul_div(
        total_collateral_usd,
        LIQUIDATION_THRESHOLD,
        LIQUIDATION_PRECISION,
    )?;
    match math::mul_div(adjusted, PRECISION, total_debt) {
        // A ratio past the representable range is simply healthy.
        Err(EngineError::ArithmeticOverflow) => Ok(u128::MAX),
        other => other,
    }
}

pub fn is_healthy(health_factor: u128) -> bool {
    health_factor >= MIN_HEALTH_FACTOR
}

/// Collateral awarded on top of the seized base amount, per the liquidation
/// bonus percentage.
pub fn liquidation_bonus(seized_base: u128) -> Result<u128, EngineError> {
    math::mul_div(seized_base, LIQUIDATION_BONUS, LIQUIDATION_PRECISION)
}
