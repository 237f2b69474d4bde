// Over-collateralized stable-value accounting engine.
//
// Users deposit volatile collateral assets, mint a unit-pegged liability
// against them, and third parties liquidate under-collateralized positions
// for a bonus. The liability token, the collateral tokens and the price
// feeds are external collaborators reached through capability traits; this
// crate owns only the ledgers, the health-factor gating and the liquidation
// protocol.

pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod health;
pub mod math;
pub mod oracle;
pub mod state;
pub mod token;

pub use engine::{Engine, EngineConfig};
pub use error::EngineError;

/// Target for all operation logs emitted by the engine.
pub const LOG_TARGET: &str = "dsc-engine";
