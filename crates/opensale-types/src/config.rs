//! Configuration for an OpenSale engine instance.

use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, OpensaleError, Result};

/// Configuration for one engine instance.
///
/// Validated once at construction; the administrative surface re-validates
/// on every later mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Protocol fee in basis points, capped at [`constants::FEE_CAP_BPS`].
    pub fee_bps: u32,
    /// Recipient of the protocol fee. Never the nil account.
    pub treasury: AccountId,
    /// Minimum accepted auction duration, seconds (inclusive).
    pub min_auction_duration_secs: i64,
    /// Maximum accepted auction duration, seconds (inclusive).
    pub max_auction_duration_secs: i64,
}

impl MarketConfig {
    /// A config with default bounds, a 2.5% fee, and the given treasury.
    #[must_use]
    pub fn with_treasury(treasury: AccountId) -> Self {
        Self {
            fee_bps: 250,
            treasury,
            min_auction_duration_secs: constants::DEFAULT_MIN_AUCTION_SECS,
            max_auction_duration_secs: constants::DEFAULT_MAX_AUCTION_SECS,
        }
    }

    /// Validate fee cap, treasury, and duration window.
    pub fn validate(&self) -> Result<()> {
        if self.fee_bps > constants::FEE_CAP_BPS {
            return Err(OpensaleError::FeeAboveCap {
                bps: self.fee_bps,
                cap: constants::FEE_CAP_BPS,
            });
        }
        if self.treasury.is_nil() {
            return Err(OpensaleError::InvalidTreasury);
        }
        if self.min_auction_duration_secs <= 0
            || self.max_auction_duration_secs < self.min_auction_duration_secs
        {
            return Err(OpensaleError::InvalidDuration);
        }
        Ok(())
    }
}
