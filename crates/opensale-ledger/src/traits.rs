//! Collaborator contracts the settlement core calls into.
//!
//! The engine never owns these ledgers; it is handed mutable access for the
//! duration of one operation. Any transfer failure aborts the calling
//! operation -- the one tolerated soft outcome is royalty-capability
//! *absence*, which is a `None`, not an error.

use opensale_types::{AccountId, AssetKey, Result, RoyaltyInfo};
use rust_decimal::Decimal;

/// Ownership / transfer / approval oracle for unique assets, plus the
/// optional royalty capability.
pub trait AssetRegistry {
    /// Current holder of the asset.
    fn owner_of(&self, asset: AssetKey) -> Result<AccountId>;

    /// Move the asset from `from` to `to` on behalf of `operator`.
    ///
    /// Fails with `NotOwnerOrNotApproved` when `from` does not hold the
    /// asset or has not authorized `operator`.
    fn transfer(
        &mut self,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        asset: AssetKey,
    ) -> Result<()>;

    /// Resolve the royalty owed on a sale of `asset` at `sale_price`.
    ///
    /// Returns `None` when the collection does not implement the royalty
    /// capability at all. Callers must treat `None` as "no royalty",
    /// never as an error.
    fn royalty_info(&self, asset: AssetKey, sale_price: Decimal) -> Option<RoyaltyInfo>;
}

/// A fungible-token ledger used as a payment medium.
pub trait FungibleLedger {
    /// Spendable balance of `account`.
    fn balance_of(&self, account: AccountId) -> Decimal;

    /// Remaining amount `spender` may pull from `owner`.
    fn allowance(&self, owner: AccountId, spender: AccountId) -> Decimal;

    /// Direct transfer out of `from`'s own balance.
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()>;

    /// Allowance-mediated transfer: `spender` moves `amount` of `from`'s
    /// balance to `to`.
    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()>;
}
