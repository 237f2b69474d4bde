use std::rc::Rc;

use crate::error::EngineError;
use crate::oracle::PriceFeed;
use crate::token::CollateralToken;

use super::AssetId;

/// One accepted collateral asset together with its external capabilities.
#[derive(Clone)]
pub struct AssetEntry {
    pub asset_id: AssetId,
    pub token: Rc<dyn CollateralToken>,
    pub feed: Rc<dyn PriceFeed>,
}

/// The set of accepted collateral assets. Built once at construction from
/// parallel configuration lists, immutable afterward.
pub struct AssetRegistry {
    entries: Vec<AssetEntry>,
}

impl AssetRegistry {
    pub fn new(
        asset_ids: Vec<AssetId>,
        tokens: Vec<Rc<dyn CollateralToken>>,
        feeds: Vec<Rc<dyn PriceFeed>>,
    ) -> Result<Self, EngineError> {
        if asset_ids.len() != tokens.len() || asset_ids.len() != feeds.len() {
            return Err(EngineError::ConfigurationMismatch);
        }
        let entries = asset_ids
            .into_iter()
            .zip(tokens)
            .zip(feeds)
            .map(|((asset_id, token), feed)| AssetEntry { asset_id, token, feed })
            .collect();
        Ok(Self { entries })
    }

    /// Look up a registered asset; unregistered ids are not allowed anywhere
    /// in the engine.
    pub fn get(&self, asset: &AssetId) -> Result<&AssetEntry, EngineError> {
        self.entries
            .iter()
            .find(|entry| entry.asset_id == *asset)
            .ok_or(EngineError::AssetNotAllowed)
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    pub fn asset_ids(&self) -> Vec<AssetId> {
        self.entries.iter().map(|entry| entry.asset_id).collect()
    }
}
