use num_derive::{FromPrimitive, ToPrimitive};
use thiserror::Error;

/// Failures surfaced by the engine. Every variant is fatal: the operation
/// that raised it commits nothing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Asset is not an accepted collateral")]
    AssetNotAllowed,

    #[error("Asset, token and price feed lists must be the same length")]
    ConfigurationMismatch,

    #[error("External token transfer failed")]
    TransferFailed,

    #[error("Liability token mint failed")]
    MintFailed,

    #[error("Health factor broken: {health_factor}")]
    HealthFactorBroken { health_factor: u128 },

    #[error("Health factor is not below minimum")]
    HealthFactorIntact,

    #[error("Health factor not improved")]
    HealthFactorNotImproved,

    #[error("Arithmetic underflow")]
    ArithmeticUnderflow,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Reentrant call into a guarded entry point")]
    Reentrancy,

    #[error("Oracle returned a zero or negative price")]
    InvalidPrice,

    #[error("Oracle price is stale")]
    StalePrice,
}

/// Stable numeric code per error, for off-process consumers matching engine
/// failures without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum ErrorCode {
    InvalidAmount = 0,
    AssetNotAllowed = 1,
    ConfigurationMismatch = 2,
    TransferFailed = 3,
    MintFailed = 4,
    HealthFactorBroken = 5,
    HealthFactorIntact = 6,
    HealthFactorNotImproved = 7,
    ArithmeticUnderflow = 8,
    ArithmeticOverflow = 9,
    DivisionByZero = 10,
    Reentrancy = 11,
    InvalidPrice = 12,
    StalePrice = 13,
}

impl EngineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::InvalidAmount => ErrorCode::InvalidAmount,
            EngineError::AssetNotAllowed => ErrorCode::AssetNotAllowed,
            EngineError::ConfigurationMismatch => ErrorCode::ConfigurationMismatch,
            EngineError::TransferFailed => ErrorCode::TransferFailed,
            EngineError::MintFailed => ErrorCode::MintFailed,
            EngineError::HealthFactorBroken { .. } => ErrorCode::HealthFactorBroken,
            EngineError::HealthFactorIntact => ErrorCode::HealthFactorIntact,
            EngineError::HealthFactorNotImproved => ErrorCode::HealthFactorNotImproved,
            EngineError::ArithmeticUnderflow => ErrorCode::ArithmeticUnderflow,
            EngineError::ArithmeticOverflow => ErrorCode::ArithmeticOverflow,
            EngineError::DivisionByZero => ErrorCode::DivisionByZero,
            EngineError::Reentrancy => ErrorCode::Reentrancy,
            EngineError::InvalidPrice => ErrorCode::InvalidPrice,
            EngineError::StalePrice => ErrorCode::StalePrice,
        }
    }
}
