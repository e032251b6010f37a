//! The engine facade: one instance per market.
//!
//! `MarketEngine` owns the listing and auction stores, the administrative
//! surface, the event log, and the re-entrancy guard. Collaborators (the
//! asset registry and the payment router) are handed in per call -- the
//! engine never owns them.
//!
//! Every entry point runs under the guard and under an atomic-abort
//! envelope: store state is snapshotted, transfers are journaled, and any
//! failure restores the snapshot, truncates events appended by the failed
//! operation, and unwinds the journal. Callers observe either the whole
//! operation or none of it.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use opensale_ledger::{AssetRegistry, PaymentRouter};
use opensale_types::{
    constants, AccountId, AssetKey, Auction, Currency, Listing, MarketConfig, MarketEvent,
    OpensaleError, Result,
};
use rust_decimal::Decimal;

use crate::admin::AdminPanel;
use crate::auction_house::AuctionHouse;
use crate::guard::EntryGuard;
use crate::journal::Journal;
use crate::listing_book::ListingBook;

/// A settlement engine instance: fixed-price listings, English auctions,
/// and atomic batches over one shared escrow account.
#[derive(Debug)]
pub struct MarketEngine {
    /// The engine's escrow account: custody holder for listed/auctioned
    /// assets and intermediate holder for funds in flight.
    account: AccountId,
    admin: AdminPanel,
    listings: ListingBook,
    auctions: AuctionHouse,
    guard: EntryGuard,
    events: Vec<MarketEvent>,
}

impl MarketEngine {
    /// Create an engine whose escrow is `account`. The payment router and
    /// asset-registry approvals must reference the same account.
    pub fn new(account: AccountId, config: &MarketConfig) -> Result<Self> {
        Ok(Self {
            account,
            admin: AdminPanel::new(config)?,
            listings: ListingBook::new(),
            auctions: AuctionHouse::new(),
            guard: EntryGuard::new(),
            events: Vec::new(),
        })
    }

    // =====================================================================
    // Read surface
    // =====================================================================

    #[must_use]
    pub fn account(&self) -> AccountId {
        self.account
    }

    #[must_use]
    pub fn admin(&self) -> &AdminPanel {
        &self.admin
    }

    /// Mutable administrative surface (fee, treasury, currency set).
    pub fn admin_mut(&mut self) -> &mut AdminPanel {
        &mut self.admin
    }

    #[must_use]
    pub fn listing(&self, asset: AssetKey) -> Option<&Listing> {
        self.listings.get(asset)
    }

    #[must_use]
    pub fn auction(&self, asset: AssetKey) -> Option<&Auction> {
        self.auctions.get(asset)
    }

    #[must_use]
    pub fn last_bid(&self, asset: AssetKey, bidder: AccountId) -> Option<Decimal> {
        self.auctions.last_bid(asset, bidder)
    }

    /// The append-only event log.
    #[must_use]
    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    /// Drain the event log (indexer hand-off).
    pub fn drain_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    // =====================================================================
    // Atomic-abort envelopes
    // =====================================================================

    /// Envelope for custody-only operations (listing creation, auction
    /// creation): guard, store snapshots, custody journal.
    fn run_custody<T>(
        &mut self,
        registry: &mut dyn AssetRegistry,
        f: impl FnOnce(&mut Self, &mut dyn AssetRegistry, &mut Journal) -> Result<T>,
    ) -> Result<T> {
        self.guard.enter()?;
        let listings = self.listings.clone();
        let auctions = self.auctions.clone();
        let mark = self.events.len();
        let mut journal = Journal::new();

        let out = f(&mut *self, &mut *registry, &mut journal);
        if out.is_err() {
            journal.unwind_moves(registry, self.account);
            self.listings = listings;
            self.auctions = auctions;
            self.events.truncate(mark);
        }
        self.guard.exit();
        out
    }

    /// Envelope for operations that move value: guard, store snapshots,
    /// full payment + custody journal.
    fn run_settlement<T>(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        f: impl FnOnce(&mut Self, &mut dyn AssetRegistry, &mut PaymentRouter, &mut Journal) -> Result<T>,
    ) -> Result<T> {
        self.guard.enter()?;
        let listings = self.listings.clone();
        let auctions = self.auctions.clone();
        let mark = self.events.len();
        let mut journal = Journal::new();

        let out = f(&mut *self, &mut *registry, &mut *router, &mut journal);
        if out.is_err() {
            journal.unwind(registry, router, self.account);
            self.listings = listings;
            self.auctions = auctions;
            self.events.truncate(mark);
        }
        self.guard.exit();
        out
    }

    // =====================================================================
    // Listing operations
    // =====================================================================

    /// List an asset at a fixed price, or rewrite the caller's existing
    /// listing's terms.
    #[allow(clippy::too_many_arguments)]
    pub fn list_item(
        &mut self,
        registry: &mut dyn AssetRegistry,
        asset: AssetKey,
        caller: AccountId,
        currency: Currency,
        price: Decimal,
        expiry: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.run_custody(registry, |eng, registry, journal| {
            if eng.auctions.unsettled_exists(asset) {
                return Err(OpensaleError::AuctionInProgress(asset));
            }
            eng.listings.create_or_update(
                registry,
                &eng.admin,
                eng.account,
                journal,
                &mut eng.events,
                asset,
                caller,
                currency,
                price,
                expiry,
                now,
            )
        })
    }

    /// Buy an actively listed asset. `attached` declares the native
    /// payment; token-denominated listings are paid by allowance and take
    /// no attached payment.
    pub fn purchase(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        asset: AssetKey,
        buyer: AccountId,
        attached: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.run_settlement(registry, router, |eng, registry, router, journal| {
            eng.listings.purchase(
                registry,
                router,
                &eng.admin,
                eng.account,
                journal,
                &mut eng.events,
                asset,
                buyer,
                attached,
                now,
            )
        })
    }

    // =====================================================================
    // Auction operations
    // =====================================================================

    /// Open an English auction. Converting an existing listing
    /// deactivates that listing.
    #[allow(clippy::too_many_arguments)]
    pub fn create_auction(
        &mut self,
        registry: &mut dyn AssetRegistry,
        asset: AssetKey,
        caller: AccountId,
        currency: Currency,
        start_price: Decimal,
        reserve_price: Decimal,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.run_custody(registry, |eng, registry, journal| {
            eng.auctions.create(
                registry,
                &eng.admin,
                eng.account,
                &mut eng.listings,
                journal,
                &mut eng.events,
                asset,
                caller,
                currency,
                start_price,
                reserve_price,
                duration,
                now,
            )
        })
    }

    /// Place a bid. Native auctions require `attached` to equal `amount`
    /// exactly; token auctions take no attached payment.
    #[allow(clippy::too_many_arguments)]
    pub fn place_bid(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        asset: AssetKey,
        bidder: AccountId,
        amount: Decimal,
        attached: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.run_settlement(registry, router, |eng, _registry, router, journal| {
            eng.auctions.place_bid(
                router,
                eng.account,
                journal,
                &mut eng.events,
                asset,
                bidder,
                amount,
                attached,
                now,
            )
        })
    }

    /// Settle an ended auction whose reserve was met. Permissionless --
    /// the outcome is fixed regardless of who calls.
    pub fn settle_auction(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        asset: AssetKey,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.run_settlement(registry, router, |eng, registry, router, journal| {
            eng.auctions.settle(
                registry,
                router,
                &eng.admin,
                eng.account,
                journal,
                &mut eng.events,
                asset,
                now,
            )
        })
    }

    /// Recover an ended auction that failed its reserve or drew no bids:
    /// asset back to the seller, running bid refunded. Permissionless.
    pub fn withdraw_unsuccessful(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        asset: AssetKey,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.run_settlement(registry, router, |eng, registry, router, journal| {
            eng.auctions.withdraw_unsuccessful(
                registry,
                router,
                eng.account,
                journal,
                &mut eng.events,
                asset,
                now,
            )
        })
    }

    // =====================================================================
    // Batch operations
    // =====================================================================

    /// List up to [`constants::MAX_BULK_LIST`] assets in one atomic
    /// operation. Parallel slices must agree in length. Any item failure
    /// aborts the whole batch with no state change.
    #[allow(clippy::too_many_arguments)]
    pub fn bulk_list(
        &mut self,
        registry: &mut dyn AssetRegistry,
        assets: &[AssetKey],
        currencies: &[Currency],
        prices: &[Decimal],
        expiries: &[Option<DateTime<Utc>>],
        caller: AccountId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if assets.len() > constants::MAX_BULK_LIST {
            return Err(OpensaleError::TooManyItems {
                max: constants::MAX_BULK_LIST,
                got: assets.len(),
            });
        }
        if currencies.len() != assets.len()
            || prices.len() != assets.len()
            || expiries.len() != assets.len()
        {
            return Err(OpensaleError::ArrayLengthMismatch);
        }
        if assets.is_empty() {
            return Ok(());
        }
        self.run_custody(registry, |eng, registry, journal| {
            for (i, &asset) in assets.iter().enumerate() {
                if eng.auctions.unsettled_exists(asset) {
                    return Err(OpensaleError::AuctionInProgress(asset));
                }
                eng.listings.create_or_update(
                    registry,
                    &eng.admin,
                    eng.account,
                    journal,
                    &mut eng.events,
                    asset,
                    caller,
                    currencies[i],
                    prices[i],
                    expiries[i],
                    now,
                )?;
            }
            Ok(())
        })
    }

    /// Buy up to [`constants::MAX_BULK_BUY`] listed assets in one atomic
    /// operation. A single `attached` payment covers the sum of all
    /// native-currency prices; only the owed total is ever drawn.
    pub fn bulk_buy(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        assets: &[AssetKey],
        buyer: AccountId,
        attached: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if assets.len() > constants::MAX_BULK_BUY {
            return Err(OpensaleError::TooManyItems {
                max: constants::MAX_BULK_BUY,
                got: assets.len(),
            });
        }
        if assets.is_empty() {
            return Ok(());
        }
        self.run_settlement(registry, router, |eng, registry, router, journal| {
            // Validation pass: every item must be purchasable and the
            // aggregate payment must cover the native total before any
            // item executes.
            let mut native_total = Decimal::ZERO;
            let mut token_totals: HashMap<Currency, Decimal> = HashMap::new();
            for &asset in assets {
                let listing = eng
                    .listings
                    .get(asset)
                    .filter(|l| l.active)
                    .ok_or(OpensaleError::ItemNotForSale(asset))?;
                if listing.is_expired(now) {
                    return Err(OpensaleError::ListingExpired(asset));
                }
                match listing.currency {
                    Currency::Native => native_total += listing.price,
                    token => *token_totals.entry(token).or_insert(Decimal::ZERO) += listing.price,
                }
            }
            let declared = attached.unwrap_or(Decimal::ZERO);
            if declared < native_total {
                return Err(OpensaleError::InsufficientPayment {
                    needed: native_total,
                    attached: declared,
                });
            }
            if native_total == Decimal::ZERO && attached.is_some() {
                return Err(OpensaleError::CurrencyNotRequired);
            }
            for (&currency, &total) in &token_totals {
                router.ensure_cover(currency, buyer, total)?;
            }

            // Execution pass, in input order. A duplicate asset shows up
            // as inactive on its second visit and aborts the batch.
            for &asset in assets {
                let per_item = match eng.listings.get(asset) {
                    Some(l) if l.active && l.currency.is_native() => Some(l.price),
                    _ => None,
                };
                eng.listings.purchase(
                    registry,
                    router,
                    &eng.admin,
                    eng.account,
                    journal,
                    &mut eng.events,
                    asset,
                    buyer,
                    per_item,
                    now,
                )?;
            }
            Ok(())
        })
    }
}
