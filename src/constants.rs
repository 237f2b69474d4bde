// Protocol-wide constants

/// Canonical 18-decimal fixed point base. All USD-denominated values and
/// liability amounts are integers at this scale.
pub const PRECISION: u128 = 1_000_000_000_000_000_000; // 1e18

/// Decimals of the canonical scale.
pub const CANONICAL_DECIMALS: u8 = 18;

/// Share of collateral value that counts toward solvency (50 / 100 = 50%,
/// i.e. positions must be at least 2x over-collateralized).
pub const LIQUIDATION_THRESHOLD: u128 = 50;

/// Denominator for threshold and bonus percentages.
pub const LIQUIDATION_PRECISION: u128 = 100;

/// Extra collateral awarded to a liquidator, as a percentage of the seized
/// base amount (10 / 100 = 10%).
pub const LIQUIDATION_BONUS: u128 = 10;

/// A position is solvent iff its health factor is at least this ratio (1.0).
pub const MIN_HEALTH_FACTOR: u128 = PRECISION;
