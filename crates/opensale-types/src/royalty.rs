//! Royalty types: a per-collection policy and its per-sale resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Per-collection royalty policy: a fixed beneficiary and a rate in basis
/// points. Collections without a policy simply do not implement the royalty
/// capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyPolicy {
    pub recipient: AccountId,
    pub bps: u32,
}

/// A royalty resolved for one concrete sale: who gets paid, and how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyInfo {
    pub recipient: AccountId,
    pub amount: Decimal,
}

impl RoyaltyInfo {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount == Decimal::ZERO
    }
}
