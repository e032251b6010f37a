//! Fund distribution: the three-way split of sale proceeds.
//!
//! The split is computed as a pure [`SalePlan`] first, then executed as a
//! sequence of payment legs out of engine escrow. Fixed-price purchases
//! and auction settlement use the identical plan.
//!
//! Ordering matters for the royalty bound: the protocol fee is carved out
//! first, and the royalty is checked against the *post-fee* remainder --
//! a large royalty can validly drive the seller's remainder to zero, but
//! never negative.

use opensale_types::{constants, AccountId, OpensaleError, Result, RoyaltyInfo};
use rust_decimal::{Decimal, RoundingStrategy};

/// The computed split of one sale: `fee + royalty + seller_take == price`,
/// exactly, for every combination of zero/nonzero fee and royalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePlan {
    pub price: Decimal,
    /// Protocol fee, floored at amount precision.
    pub fee: Decimal,
    /// Royalty leg, absent when the collection has none (or resolves to
    /// zero).
    pub royalty: Option<RoyaltyInfo>,
    /// Remainder owed to the seller.
    pub seller_take: Decimal,
}

impl SalePlan {
    /// Compute the split of `price` under `fee_bps` and an optional
    /// resolved royalty.
    pub fn build(price: Decimal, fee_bps: u32, royalty: Option<RoyaltyInfo>) -> Result<Self> {
        let fee = (price * Decimal::from(fee_bps) / Decimal::from(constants::BPS_DENOMINATOR))
            .round_dp_with_strategy(constants::AMOUNT_PRECISION, RoundingStrategy::ToZero);
        let mut remaining = price - fee;

        let royalty = royalty.filter(|r| !r.is_zero());
        if let Some(r) = &royalty {
            if r.amount > remaining {
                return Err(OpensaleError::RoyaltyExceedsPrice);
            }
            remaining -= r.amount;
        }

        Ok(Self {
            price,
            fee,
            royalty,
            seller_take: remaining,
        })
    }

    /// The royalty amount, zero when absent.
    #[must_use]
    pub fn royalty_amount(&self) -> Decimal {
        self.royalty.map_or(Decimal::ZERO, |r| r.amount)
    }

    /// The outbound transfers realizing this plan, in execution order:
    /// royalty, fee to the treasury, remainder to the seller. All legs are
    /// paid out of engine escrow in the sale currency; zero legs are
    /// skipped by the router.
    #[must_use]
    pub fn legs(&self, treasury: AccountId, seller: AccountId) -> Vec<(AccountId, Decimal)> {
        let mut legs = Vec::with_capacity(3);
        if let Some(r) = &self.royalty {
            legs.push((r.recipient, r.amount));
        }
        legs.push((treasury, self.fee));
        legs.push((seller, self.seller_take));
        legs
    }
}
