mod ledger;
mod registry;

pub use ledger::{CollateralLedger, DebtLedger};
pub use registry::{AssetEntry, AssetRegistry};

use borsh::{BorshDeserialize, BorshSerialize};

/// Opaque 32-byte identity of a user or of the engine itself.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub [u8; 32]);

/// Opaque 32-byte identity of a collateral asset.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(pub [u8; 32]);
