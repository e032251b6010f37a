//! In-memory reference implementation of [`AssetRegistry`].
//!
//! Tracks per-asset ownership, owner → operator approvals, and an optional
//! per-collection royalty policy. Collections created without a policy do
//! not implement the royalty capability -- `royalty_info` returns `None`
//! for them.

use std::collections::{HashMap, HashSet};

use opensale_types::{
    constants, AccountId, AssetKey, CollectionId, OpensaleError, Result, RoyaltyInfo,
    RoyaltyPolicy, TokenId,
};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::traits::AssetRegistry;

/// In-memory asset registry for tests, demos, and single-process
/// deployments.
#[derive(Debug, Default, Clone)]
pub struct AssetVault {
    /// Royalty policy per collection; `None` value = capability absent.
    collections: HashMap<CollectionId, Option<RoyaltyPolicy>>,
    /// Current holder per asset.
    owners: HashMap<AssetKey, AccountId>,
    /// (owner, operator) approval-for-all pairs.
    approvals: HashSet<(AccountId, AccountId)>,
}

impl AssetVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection, optionally with a royalty policy.
    pub fn create_collection(&mut self, royalty: Option<RoyaltyPolicy>) -> CollectionId {
        let id = CollectionId::new();
        self.collections.insert(id, royalty);
        id
    }

    /// Mint an asset into a registered collection.
    pub fn mint(&mut self, collection: CollectionId, token: TokenId, owner: AccountId) -> Result<AssetKey> {
        if !self.collections.contains_key(&collection) {
            return Err(OpensaleError::Internal(format!(
                "unknown collection {collection}"
            )));
        }
        let key = AssetKey::new(collection, token);
        self.owners.insert(key, owner);
        Ok(key)
    }

    /// Grant `operator` transfer rights over all of `owner`'s assets.
    pub fn approve(&mut self, owner: AccountId, operator: AccountId) {
        self.approvals.insert((owner, operator));
    }

    /// Revoke a previously granted approval.
    pub fn revoke(&mut self, owner: AccountId, operator: AccountId) {
        self.approvals.remove(&(owner, operator));
    }

    #[must_use]
    pub fn is_approved(&self, owner: AccountId, operator: AccountId) -> bool {
        self.approvals.contains(&(owner, operator))
    }
}

impl AssetRegistry for AssetVault {
    fn owner_of(&self, asset: AssetKey) -> Result<AccountId> {
        self.owners
            .get(&asset)
            .copied()
            .ok_or(OpensaleError::AssetNotFound(asset))
    }

    fn transfer(
        &mut self,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        asset: AssetKey,
    ) -> Result<()> {
        let holder = self.owner_of(asset)?;
        if holder != from {
            return Err(OpensaleError::NotOwnerOrNotApproved);
        }
        if operator != from && !self.is_approved(from, operator) {
            return Err(OpensaleError::NotOwnerOrNotApproved);
        }
        self.owners.insert(asset, to);
        Ok(())
    }

    fn royalty_info(&self, asset: AssetKey, sale_price: Decimal) -> Option<RoyaltyInfo> {
        let policy = self.collections.get(&asset.collection).copied().flatten()?;
        let amount = (sale_price * Decimal::from(policy.bps)
            / Decimal::from(constants::BPS_DENOMINATOR))
        .round_dp_with_strategy(constants::AMOUNT_PRECISION, RoundingStrategy::ToZero);
        Some(RoyaltyInfo {
            recipient: policy.recipient,
            amount,
        })
    }
}
