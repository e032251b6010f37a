//! # opensale-types
//!
//! Shared types, errors, and configuration for the **OpenSale** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace -- every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`CollectionId`], [`TokenId`], [`AssetKey`], [`LedgerId`]
//! - **Payment media**: [`Currency`]
//! - **Sale records**: [`Listing`], [`Auction`]
//! - **Royalties**: [`RoyaltyPolicy`], [`RoyaltyInfo`]
//! - **Events**: [`MarketEvent`]
//! - **Configuration**: [`MarketConfig`]
//! - **Errors**: [`OpensaleError`] with `OS_ERR_` prefix codes
//! - **Constants**: system-wide caps and defaults

pub mod auction;
pub mod config;
pub mod constants;
pub mod currency;
pub mod error;
pub mod event;
pub mod ids;
pub mod listing;
pub mod royalty;

// Re-export all primary types at crate root for ergonomic imports:
//   use opensale_types::{AssetKey, Listing, Auction, Currency, ...};

pub use auction::*;
pub use config::*;
pub use currency::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use listing::*;
pub use royalty::*;

// Constants are accessed via `opensale_types::constants::FOO`
// (not re-exported to avoid name collisions).
