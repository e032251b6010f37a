//! Event records for the OpenSale audit trail.
//!
//! Every state-changing operation emits exactly one event per logical
//! action, carrying the full set of parties, amounts, and currency so an
//! external indexer can reconstruct engine state without re-reading
//! storage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetKey, Currency};

/// One logical state-changing action observed on the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// A new listing was created (custody pulled from the seller).
    ListingCreated {
        asset: AssetKey,
        seller: AccountId,
        currency: Currency,
        price: Decimal,
        expiry: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
    /// An existing listing's terms were rewritten by its seller.
    ListingUpdated {
        asset: AssetKey,
        seller: AccountId,
        currency: Currency,
        price: Decimal,
        expiry: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
    /// A fixed-price sale completed: funds split, asset released.
    SaleExecuted {
        asset: AssetKey,
        seller: AccountId,
        buyer: AccountId,
        currency: Currency,
        price: Decimal,
        fee: Decimal,
        royalty: Decimal,
        seller_proceeds: Decimal,
        at: DateTime<Utc>,
    },
    /// An auction was opened (custody pulled or converted from a listing).
    AuctionCreated {
        asset: AssetKey,
        seller: AccountId,
        currency: Currency,
        start_price: Decimal,
        reserve_price: Decimal,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A bid was accepted; the previous highest bidder, if any, was
    /// refunded in full.
    BidPlaced {
        asset: AssetKey,
        bidder: AccountId,
        amount: Decimal,
        refunded_bidder: Option<AccountId>,
        refunded_amount: Decimal,
        at: DateTime<Utc>,
    },
    /// An ended auction settled successfully: funds split, asset released
    /// to the winner.
    AuctionSettled {
        asset: AssetKey,
        seller: AccountId,
        winner: AccountId,
        currency: Currency,
        price: Decimal,
        fee: Decimal,
        royalty: Decimal,
        seller_proceeds: Decimal,
        at: DateTime<Utc>,
    },
    /// An ended auction failed its reserve (or drew no bids) and was
    /// recovered: asset returned to the seller.
    AuctionWithdrawn {
        asset: AssetKey,
        seller: AccountId,
        refunded_bidder: Option<AccountId>,
        refunded_amount: Decimal,
        at: DateTime<Utc>,
    },
}

impl MarketEvent {
    /// The asset this event concerns.
    #[must_use]
    pub fn asset(&self) -> AssetKey {
        match self {
            Self::ListingCreated { asset, .. }
            | Self::ListingUpdated { asset, .. }
            | Self::SaleExecuted { asset, .. }
            | Self::AuctionCreated { asset, .. }
            | Self::BidPlaced { asset, .. }
            | Self::AuctionSettled { asset, .. }
            | Self::AuctionWithdrawn { asset, .. } => *asset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CollectionId, TokenId};

    #[test]
    fn event_asset_accessor() {
        let key = AssetKey::new(CollectionId::new(), TokenId(9));
        let ev = MarketEvent::BidPlaced {
            asset: key,
            bidder: AccountId::new(),
            amount: Decimal::ONE,
            refunded_bidder: None,
            refunded_amount: Decimal::ZERO,
            at: Utc::now(),
        };
        assert_eq!(ev.asset(), key);
    }

    #[test]
    fn serde_roundtrip() {
        let ev = MarketEvent::SaleExecuted {
            asset: AssetKey::new(CollectionId::new(), TokenId(1)),
            seller: AccountId::new(),
            buyer: AccountId::new(),
            currency: Currency::Native,
            price: Decimal::ONE,
            fee: Decimal::new(25, 3),
            royalty: Decimal::new(5, 2),
            seller_proceeds: Decimal::new(925, 3),
            at: Utc::now(),
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: MarketEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }
}
