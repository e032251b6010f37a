//! The English-auction record and its state helpers.
//!
//! States: `NonExistent → Active → {Settled-Sold, Settled-Withdrawn}`.
//! `Active` spans `[start_time, end_time]` inclusive at both bounds; the
//! `settled` flag transitions exactly once and is terminal.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, Currency};

/// A time-boxed competitive-bidding sale of one specific asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub seller: AccountId,
    pub currency: Currency,
    pub start_price: Decimal,
    /// Minimum winning bid; zero means no reserve.
    pub reserve_price: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Party currently owed the return of `highest_bid` if outbid or if
    /// the auction fails its reserve.
    pub highest_bidder: Option<AccountId>,
    /// Monotonically non-decreasing over the auction's life.
    pub highest_bid: Decimal,
    /// Terminal flag, set by exactly one of settlement or recovery
    /// withdrawal.
    pub settled: bool,
}

impl Auction {
    /// Whether bids are currently accepted: inside `[start, end]`
    /// (inclusive at both bounds) and not yet settled.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        !self.settled && now >= self.start_time && now <= self.end_time
    }

    /// Whether the bidding window has closed. A bid exactly at `end_time`
    /// is still accepted; settlement requires strictly-after.
    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time
    }

    /// The minimum acceptable next bid: the start price for the first bid,
    /// otherwise a strict 5% increment over the running high, rounded up.
    #[must_use]
    pub fn min_next_bid(&self) -> Decimal {
        if self.highest_bid == Decimal::ZERO {
            return self.start_price;
        }
        let increment = (self.highest_bid * Decimal::from(constants::MIN_BID_INCREMENT_BPS)
            / Decimal::from(constants::BPS_DENOMINATOR))
        .round_dp_with_strategy(
            constants::AMOUNT_PRECISION,
            RoundingStrategy::ToPositiveInfinity,
        );
        self.highest_bid + increment
    }

    /// Whether the auction succeeded: a bid exists and either there is no
    /// reserve or the running high meets it.
    #[must_use]
    pub fn reserve_met(&self) -> bool {
        self.highest_bidder.is_some()
            && (self.reserve_price == Decimal::ZERO || self.highest_bid >= self.reserve_price)
    }
}
