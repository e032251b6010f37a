//! # opensale-market
//!
//! **Settlement core for OpenSale.**
//!
//! The market crate hosts the engine itself: fixed-price listings, English
//! auctions, the fund-split pipeline, and the atomic batch envelopes. It
//! owns no assets and no money -- custody and payment live behind the
//! collaborator traits in `opensale-ledger`, handed in per call.
//!
//! - **Atomic operations**: any failure restores state, unwinds transfers,
//!   and drops events appended by the failed operation
//! - **Re-entrancy protection**: a per-engine guard rejects nested calls
//! - **Deterministic time**: every time-sensitive operation takes an
//!   explicit `now`

pub mod admin;
pub mod auction_house;
pub mod engine;
pub mod guard;
mod journal;
pub mod listing_book;
pub mod proceeds;

pub use admin::AdminPanel;
pub use auction_house::AuctionHouse;
pub use engine::MarketEngine;
pub use guard::EntryGuard;
pub use listing_book::ListingBook;
pub use proceeds::SalePlan;
