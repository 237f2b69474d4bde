use borsh::{BorshDeserialize, BorshSerialize};

use crate::state::{AccountId, AssetId};

/// Structured facts recorded by successful mutating operations, drained by
/// the host through `Engine::take_events`. Events emitted inside an
/// operation that later fails are discarded with the rest of its effects.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CollateralDeposited {
        user: AccountId,
        asset: AssetId,
        amount: u128,
    },
    CollateralRedeemed {
        from: AccountId,
        to: AccountId,
        asset: AssetId,
        amount: u128,
    },
    DscMinted {
        user: AccountId,
        amount: u128,
    },
    DscBurned {
        on_behalf_of: AccountId,
        payer: AccountId,
        amount: u128,
    },
    Liquidated {
        user: AccountId,
        liquidator: AccountId,
        asset: AssetId,
        debt_covered: u128,
        collateral_seized: u128,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_round_trip_through_borsh() {
        let event = EngineEvent::Liquidated {
            user: AccountId([1; 32]),
            liquidator: AccountId([2; 32]),
            asset: AssetId([3; 32]),
            debt_covered: 100,
            collateral_seized: 11,
        };
        let bytes = borsh::to_vec(&event).unwrap();
        let decoded = EngineEvent::try_from_slice(&bytes).unwrap();
        assert_eq!(decoded, event);
    }
}
