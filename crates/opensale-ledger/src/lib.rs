//! # opensale-ledger
//!
//! The external-collaborator boundary of the OpenSale engine.
//!
//! The settlement core treats the asset registry and every fungible-token
//! ledger as untrusted outside parties, reached only through the traits
//! defined here:
//!
//! 1. **[`AssetRegistry`]**: ownership, custody transfer, and the optional
//!    royalty capability (absence is `None`, never an error)
//! 2. **[`FungibleLedger`]**: token balances, direct and allowance-mediated
//!    transfers
//! 3. **[`PaymentRouter`]**: the single chokepoint every payment flows
//!    through, uniting the native balance-transfer primitive with
//!    registered token ledgers
//!
//! [`AssetVault`] and [`TokenBook`] are the in-memory reference
//! implementations used by tests, demos, and single-process deployments.

pub mod asset_vault;
pub mod router;
pub mod token_book;
pub mod traits;

pub use asset_vault::AssetVault;
pub use router::PaymentRouter;
pub use token_book::TokenBook;
pub use traits::{AssetRegistry, FungibleLedger};
