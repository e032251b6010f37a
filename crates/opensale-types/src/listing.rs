//! The fixed-price listing record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Currency};

/// A standing offer to sell one specific asset at a fixed price.
///
/// `active` is true only while the engine custodies the asset on the
/// seller's behalf and no sale or conversion to an auction has occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub seller: AccountId,
    pub currency: Currency,
    pub price: Decimal,
    /// Optional expiry; the listing is purchasable strictly before it.
    pub expiry: Option<DateTime<Utc>>,
    pub active: bool,
}

impl Listing {
    /// Whether the listing's expiry has elapsed. A listing without an
    /// expiry never expires.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|e| now >= e)
    }
}
