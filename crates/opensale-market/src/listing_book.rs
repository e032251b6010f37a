//! Fixed-price listing store, keyed by asset.
//!
//! State machine per asset: created (custody pulled) → updated in place by
//! the same seller → deactivated by sale, by conversion to an auction, or
//! superseded by a later listing. Purchases follow the
//! validate → mutate → transfer discipline: the listing goes inactive
//! before any outbound transfer runs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use opensale_ledger::{AssetRegistry, PaymentRouter};
use opensale_types::{
    AccountId, AssetKey, Currency, Listing, MarketEvent, OpensaleError, Result,
};
use rust_decimal::Decimal;

use crate::admin::AdminPanel;
use crate::journal::Journal;
use crate::proceeds::SalePlan;

/// Keyed store of fixed-price listings.
#[derive(Debug, Default, Clone)]
pub struct ListingBook {
    items: HashMap<AssetKey, Listing>,
}

impl ListingBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The listing record for an asset, active or not.
    #[must_use]
    pub fn get(&self, asset: AssetKey) -> Option<&Listing> {
        self.items.get(&asset)
    }

    /// Create a new listing (pulling custody from `caller`) or, when the
    /// engine already custodies the asset, rewrite the existing listing's
    /// terms without a custody transfer.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create_or_update(
        &mut self,
        registry: &mut dyn AssetRegistry,
        admin: &AdminPanel,
        escrow: AccountId,
        journal: &mut Journal,
        events: &mut Vec<MarketEvent>,
        asset: AssetKey,
        caller: AccountId,
        currency: Currency,
        price: Decimal,
        expiry: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if price <= Decimal::ZERO {
            return Err(OpensaleError::PriceMustBeGreaterThanZero);
        }
        if !admin.is_accepted(currency) {
            return Err(OpensaleError::UnsupportedPaymentToken);
        }
        if expiry.is_some_and(|e| e <= now) {
            return Err(OpensaleError::InvalidExpiry);
        }

        let holder = registry.owner_of(asset)?;
        let record = Listing {
            seller: caller,
            currency,
            price,
            expiry,
            active: true,
        };

        if holder == escrow {
            // Update path: the engine already custodies the asset on the
            // seller's behalf. No custody transfer.
            let existing = self
                .items
                .get_mut(&asset)
                .ok_or(OpensaleError::NotListingOwner)?;
            if existing.seller != caller {
                return Err(OpensaleError::NotListingOwner);
            }
            *existing = record;
            events.push(MarketEvent::ListingUpdated {
                asset,
                seller: caller,
                currency,
                price,
                expiry,
                at: now,
            });
        } else {
            if holder != caller {
                return Err(OpensaleError::NotOwnerOrNotApproved);
            }
            journal.move_asset(registry, escrow, caller, escrow, asset)?;
            self.items.insert(asset, record);
            events.push(MarketEvent::ListingCreated {
                asset,
                seller: caller,
                currency,
                price,
                expiry,
                at: now,
            });
        }
        Ok(())
    }

    /// Execute a fixed-price sale: collect the price, deactivate the
    /// listing, run the three-way split, release the asset.
    ///
    /// `attached` is the declared native payment; only the owed price is
    /// ever drawn from the buyer, so any surplus never leaves them.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn purchase(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        admin: &AdminPanel,
        escrow: AccountId,
        journal: &mut Journal,
        events: &mut Vec<MarketEvent>,
        asset: AssetKey,
        buyer: AccountId,
        attached: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let listing = self
            .items
            .get(&asset)
            .filter(|l| l.active)
            .ok_or(OpensaleError::ItemNotForSale(asset))?;
        if listing.is_expired(now) {
            return Err(OpensaleError::ListingExpired(asset));
        }
        let (seller, currency, price) = (listing.seller, listing.currency, listing.price);

        match currency {
            Currency::Native => {
                let declared = attached.unwrap_or(Decimal::ZERO);
                if declared < price {
                    return Err(OpensaleError::InsufficientPayment {
                        needed: price,
                        attached: declared,
                    });
                }
            }
            Currency::Token(_) => {
                if attached.is_some() {
                    return Err(OpensaleError::CurrencyNotRequired);
                }
            }
        }

        // Royalty resolution and the split are pure; both run before any
        // value moves.
        let royalty = registry.royalty_info(asset, price);
        let plan = SalePlan::build(price, admin.fee_bps(), royalty)?;

        // Collect the price into escrow, then deactivate before the
        // outbound transfers.
        journal.pay(router, currency, buyer, escrow, price)?;
        if let Some(l) = self.items.get_mut(&asset) {
            l.active = false;
        }

        for (to, amount) in plan.legs(admin.treasury(), seller) {
            journal.pay(router, currency, escrow, to, amount)?;
        }
        journal.move_asset(registry, escrow, escrow, buyer, asset)?;

        events.push(MarketEvent::SaleExecuted {
            asset,
            seller,
            buyer,
            currency,
            price,
            fee: plan.fee,
            royalty: plan.royalty_amount(),
            seller_proceeds: plan.seller_take,
            at: now,
        });
        Ok(())
    }

    /// Deactivate `caller`'s listing when converting it into an auction.
    pub(crate) fn deactivate_for(&mut self, asset: AssetKey, caller: AccountId) -> Result<()> {
        let listing = self
            .items
            .get_mut(&asset)
            .ok_or(OpensaleError::NotListingOwner)?;
        if listing.seller != caller {
            return Err(OpensaleError::NotListingOwner);
        }
        listing.active = false;
        Ok(())
    }
}
