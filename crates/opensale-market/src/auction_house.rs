//! English-auction store, keyed by asset.
//!
//! Lifecycle: `create` escrows the asset (or converts an existing
//! listing), `place_bid` enforces the 5% minimum increment and refunds the
//! outbid party in full, and exactly one of `settle` /
//! `withdraw_unsuccessful` finalizes the auction -- the terminal `settled`
//! flag is set before any outbound transfer runs.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use opensale_ledger::{AssetRegistry, PaymentRouter};
use opensale_types::{
    AccountId, AssetKey, Auction, Currency, MarketEvent, OpensaleError, Result,
};
use rust_decimal::Decimal;

use crate::admin::AdminPanel;
use crate::journal::Journal;
use crate::listing_book::ListingBook;
use crate::proceeds::SalePlan;

/// Keyed store of auctions, plus the auxiliary per-bidder bid ledger.
#[derive(Debug, Default, Clone)]
pub struct AuctionHouse {
    items: HashMap<AssetKey, Auction>,
    /// Most recent accepted bid per (auction, bidder). Retained for
    /// indexing flows; the auction's own highest fields are the single
    /// source of truth for outcome.
    bids: HashMap<(AssetKey, AccountId), Decimal>,
}

impl AuctionHouse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The auction record for an asset, settled or not.
    #[must_use]
    pub fn get(&self, asset: AssetKey) -> Option<&Auction> {
        self.items.get(&asset)
    }

    /// Whether an unsettled auction holds the asset.
    #[must_use]
    pub fn unsettled_exists(&self, asset: AssetKey) -> bool {
        self.items.get(&asset).is_some_and(|a| !a.settled)
    }

    /// The most recent bid `bidder` placed on `asset`, if any.
    #[must_use]
    pub fn last_bid(&self, asset: AssetKey, bidder: AccountId) -> Option<Decimal> {
        self.bids.get(&(asset, bidder)).copied()
    }

    /// Open an auction, pulling custody from `caller` or converting the
    /// caller's existing listing (which is deactivated as a side effect).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create(
        &mut self,
        registry: &mut dyn AssetRegistry,
        admin: &AdminPanel,
        escrow: AccountId,
        listings: &mut ListingBook,
        journal: &mut Journal,
        events: &mut Vec<MarketEvent>,
        asset: AssetKey,
        caller: AccountId,
        currency: Currency,
        start_price: Decimal,
        reserve_price: Decimal,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if start_price <= Decimal::ZERO {
            return Err(OpensaleError::StartPriceMustBeGreaterThanZero);
        }
        if !admin.duration_ok(duration) {
            return Err(OpensaleError::InvalidDuration);
        }
        if !admin.is_accepted(currency) {
            return Err(OpensaleError::UnsupportedPaymentToken);
        }
        if self.unsettled_exists(asset) {
            return Err(OpensaleError::AuctionAlreadyExists(asset));
        }

        let holder = registry.owner_of(asset)?;
        if holder == escrow {
            // Converting a listing the engine already custodies.
            listings.deactivate_for(asset, caller)?;
        } else {
            if holder != caller {
                return Err(OpensaleError::NotOwnerOrNotApproved);
            }
            journal.move_asset(registry, escrow, caller, escrow, asset)?;
        }

        let end_time = now + duration;
        self.items.insert(
            asset,
            Auction {
                seller: caller,
                currency,
                start_price,
                reserve_price,
                start_time: now,
                end_time,
                highest_bidder: None,
                highest_bid: Decimal::ZERO,
                settled: false,
            },
        );
        events.push(MarketEvent::AuctionCreated {
            asset,
            seller: caller,
            currency,
            start_price,
            reserve_price,
            start_time: now,
            end_time,
            at: now,
        });
        Ok(())
    }

    /// Accept a bid: collect the new amount into escrow, refund the
    /// outbid party in full, then record the new running high.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn place_bid(
        &mut self,
        router: &mut PaymentRouter,
        escrow: AccountId,
        journal: &mut Journal,
        events: &mut Vec<MarketEvent>,
        asset: AssetKey,
        bidder: AccountId,
        amount: Decimal,
        attached: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let auction = self
            .items
            .get(&asset)
            .ok_or(OpensaleError::AuctionNotActive(asset))?;
        if !auction.is_open(now) {
            return Err(OpensaleError::AuctionNotActive(asset));
        }
        let minimum = auction.min_next_bid();
        if amount < minimum {
            return Err(OpensaleError::BidTooLow { minimum });
        }
        match auction.currency {
            Currency::Native => {
                if attached != Some(amount) {
                    return Err(OpensaleError::IncorrectAmount);
                }
            }
            Currency::Token(_) => {
                if attached.is_some() {
                    return Err(OpensaleError::CurrencyNotRequired);
                }
            }
        }
        let currency = auction.currency;
        let previous = auction.highest_bidder;
        let previous_bid = auction.highest_bid;

        journal.pay(router, currency, bidder, escrow, amount)?;
        if let Some(outbid) = previous {
            journal.pay(router, currency, escrow, outbid, previous_bid)?;
        }

        if let Some(a) = self.items.get_mut(&asset) {
            a.highest_bidder = Some(bidder);
            a.highest_bid = amount;
        }
        self.bids.insert((asset, bidder), amount);

        events.push(MarketEvent::BidPlaced {
            asset,
            bidder,
            amount,
            refunded_bidder: previous,
            refunded_amount: if previous.is_some() {
                previous_bid
            } else {
                Decimal::ZERO
            },
            at: now,
        });
        Ok(())
    }

    /// Finalize a successful auction: split the winning bid, release the
    /// asset to the winner.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn settle(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        admin: &AdminPanel,
        escrow: AccountId,
        journal: &mut Journal,
        events: &mut Vec<MarketEvent>,
        asset: AssetKey,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let auction = self
            .items
            .get(&asset)
            .ok_or(OpensaleError::AuctionNotActive(asset))?;
        if auction.settled {
            return Err(OpensaleError::AuctionAlreadySettled(asset));
        }
        if !auction.has_ended(now) {
            return Err(OpensaleError::AuctionNotEnded(asset));
        }
        if !auction.reserve_met() {
            return Err(OpensaleError::ReserveNotMet);
        }
        let Some(winner) = auction.highest_bidder else {
            return Err(OpensaleError::ReserveNotMet);
        };
        let (seller, currency, price) = (auction.seller, auction.currency, auction.highest_bid);

        // Terminal flag goes first; the escrowed winning bid then flows
        // out through the standard split.
        if let Some(a) = self.items.get_mut(&asset) {
            a.settled = true;
        }

        let royalty = registry.royalty_info(asset, price);
        let plan = SalePlan::build(price, admin.fee_bps(), royalty)?;
        for (to, amount) in plan.legs(admin.treasury(), seller) {
            journal.pay(router, currency, escrow, to, amount)?;
        }
        journal.move_asset(registry, escrow, escrow, winner, asset)?;

        tracing::info!(%asset, %price, "auction settled");
        events.push(MarketEvent::AuctionSettled {
            asset,
            seller,
            winner,
            currency,
            price,
            fee: plan.fee,
            royalty: plan.royalty_amount(),
            seller_proceeds: plan.seller_take,
            at: now,
        });
        Ok(())
    }

    /// Recovery path for an ended auction that failed its reserve or drew
    /// no bids: refund the running highest bidder (if any) and return the
    /// asset to the seller. Without this, the asset would be stranded in
    /// escrow.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn withdraw_unsuccessful(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        escrow: AccountId,
        journal: &mut Journal,
        events: &mut Vec<MarketEvent>,
        asset: AssetKey,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let auction = self
            .items
            .get(&asset)
            .ok_or(OpensaleError::AuctionNotActive(asset))?;
        if auction.settled {
            return Err(OpensaleError::AuctionAlreadySettled(asset));
        }
        if !auction.has_ended(now) {
            return Err(OpensaleError::AuctionNotEnded(asset));
        }
        if auction.reserve_met() {
            return Err(OpensaleError::ReserveMet);
        }
        let (seller, currency) = (auction.seller, auction.currency);
        let refunded_bidder = auction.highest_bidder;
        let refunded_amount = auction.highest_bid;

        if let Some(a) = self.items.get_mut(&asset) {
            a.settled = true;
        }

        if let Some(bidder) = refunded_bidder {
            journal.pay(router, currency, escrow, bidder, refunded_amount)?;
        }
        journal.move_asset(registry, escrow, escrow, seller, asset)?;

        events.push(MarketEvent::AuctionWithdrawn {
            asset,
            seller,
            refunded_bidder,
            refunded_amount: if refunded_bidder.is_some() {
                refunded_amount
            } else {
                Decimal::ZERO
            },
            at: now,
        });
        Ok(())
    }
}
