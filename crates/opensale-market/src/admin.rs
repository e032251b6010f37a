//! Administrative surface: fee rate, treasury, accepted-currency set,
//! auction duration bounds.
//!
//! The settlement core consumes this surface; only administrative callers
//! mutate it. Currency membership is enforced when a listing or auction is
//! created -- removing a currency afterwards does not invalidate sales
//! already in flight.

use std::collections::HashSet;

use chrono::Duration;
use opensale_types::{constants, AccountId, Currency, MarketConfig, OpensaleError, Result};

/// Fee, treasury, and accepted-currency configuration for one engine
/// instance.
#[derive(Debug, Clone)]
pub struct AdminPanel {
    fee_bps: u32,
    treasury: AccountId,
    accepted: HashSet<Currency>,
    min_duration: Duration,
    max_duration: Duration,
}

impl AdminPanel {
    /// Build from a validated [`MarketConfig`]. The native medium is
    /// always in the accepted set.
    pub fn new(config: &MarketConfig) -> Result<Self> {
        config.validate()?;
        let mut accepted = HashSet::new();
        accepted.insert(Currency::Native);
        Ok(Self {
            fee_bps: config.fee_bps,
            treasury: config.treasury,
            accepted,
            min_duration: Duration::seconds(config.min_auction_duration_secs),
            max_duration: Duration::seconds(config.max_auction_duration_secs),
        })
    }

    #[must_use]
    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    #[must_use]
    pub fn treasury(&self) -> AccountId {
        self.treasury
    }

    #[must_use]
    pub fn is_accepted(&self, currency: Currency) -> bool {
        self.accepted.contains(&currency)
    }

    /// Whether a requested auction duration lies within the configured
    /// [min, max] window, inclusive at both ends.
    #[must_use]
    pub fn duration_ok(&self, duration: Duration) -> bool {
        duration >= self.min_duration && duration <= self.max_duration
    }

    /// Add a currency to the accepted set.
    pub fn add_currency(&mut self, currency: Currency) -> Result<()> {
        if !self.accepted.insert(currency) {
            return Err(OpensaleError::DuplicateCurrency);
        }
        Ok(())
    }

    /// Remove a currency from the accepted set. The native medium cannot
    /// be removed.
    pub fn remove_currency(&mut self, currency: Currency) -> Result<()> {
        if currency.is_native() {
            return Err(OpensaleError::CannotRemoveNative);
        }
        if !self.accepted.remove(&currency) {
            return Err(OpensaleError::CurrencyNotAccepted);
        }
        Ok(())
    }

    /// Adjust the protocol fee, bounded by the cap.
    pub fn set_fee_bps(&mut self, bps: u32) -> Result<()> {
        if bps > constants::FEE_CAP_BPS {
            return Err(OpensaleError::FeeAboveCap {
                bps,
                cap: constants::FEE_CAP_BPS,
            });
        }
        self.fee_bps = bps;
        Ok(())
    }

    /// Point the fee at a new treasury account.
    pub fn set_treasury(&mut self, treasury: AccountId) -> Result<()> {
        if treasury.is_nil() {
            return Err(OpensaleError::InvalidTreasury);
        }
        self.treasury = treasury;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensale_types::LedgerId;

    fn panel() -> AdminPanel {
        AdminPanel::new(&MarketConfig::with_treasury(AccountId::new())).unwrap()
    }

    #[test]
    fn native_always_accepted() {
        let panel = panel();
        assert!(panel.is_accepted(Currency::Native));
    }

    #[test]
    fn add_and_remove_currency() {
        let mut panel = panel();
        let token = Currency::Token(LedgerId::new());
        assert!(!panel.is_accepted(token));

        panel.add_currency(token).unwrap();
        assert!(panel.is_accepted(token));

        let err = panel.add_currency(token).unwrap_err();
        assert!(matches!(err, OpensaleError::DuplicateCurrency));

        panel.remove_currency(token).unwrap();
        assert!(!panel.is_accepted(token));

        let err = panel.remove_currency(token).unwrap_err();
        assert!(matches!(err, OpensaleError::CurrencyNotAccepted));
    }

    #[test]
    fn native_cannot_be_removed() {
        let mut panel = panel();
        let err = panel.remove_currency(Currency::Native).unwrap_err();
        assert!(matches!(err, OpensaleError::CannotRemoveNative));
        assert!(panel.is_accepted(Currency::Native));
    }

    #[test]
    fn fee_cap_enforced_on_adjustment() {
        let mut panel = panel();
        panel.set_fee_bps(1000).unwrap();
        let err = panel.set_fee_bps(1001).unwrap_err();
        assert!(matches!(err, OpensaleError::FeeAboveCap { .. }));
        assert_eq!(panel.fee_bps(), 1000);
    }

    #[test]
    fn nil_treasury_rejected() {
        let mut panel = panel();
        let err = panel.set_treasury(AccountId::nil()).unwrap_err();
        assert!(matches!(err, OpensaleError::InvalidTreasury));
    }

    #[test]
    fn duration_window_inclusive() {
        let panel = panel();
        assert!(panel.duration_ok(Duration::seconds(
            constants::DEFAULT_MIN_AUCTION_SECS
        )));
        assert!(panel.duration_ok(Duration::seconds(
            constants::DEFAULT_MAX_AUCTION_SECS
        )));
        assert!(!panel.duration_ok(Duration::seconds(
            constants::DEFAULT_MIN_AUCTION_SECS - 1
        )));
        assert!(!panel.duration_ok(Duration::seconds(
            constants::DEFAULT_MAX_AUCTION_SECS + 1
        )));
    }
}
