//! Transfer journal for atomic aborts.
//!
//! Every payment leg and custody move performed during one engine
//! operation (or one batch) is recorded here. If the operation fails
//! part-way, the journal is unwound in reverse order: funds flow back to
//! their sources and custody returns to prior holders. Reversals of
//! transfers into escrow always succeed against conforming collaborators;
//! a collaborator that rejects its own compensation is logged and skipped.

use opensale_ledger::{AssetRegistry, PaymentRouter};
use opensale_types::{AccountId, AssetKey, Currency};
use rust_decimal::Decimal;

/// Record of transfers executed so far in the current operation.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    legs: Vec<(Currency, AccountId, AccountId, Decimal)>,
    moves: Vec<(AssetKey, AccountId, AccountId)>,
}

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Execute a payment through the router and record it.
    pub(crate) fn pay(
        &mut self,
        router: &mut PaymentRouter,
        currency: Currency,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> opensale_types::Result<()> {
        router.transfer(currency, from, to, amount)?;
        self.legs.push((currency, from, to, amount));
        Ok(())
    }

    /// Execute a custody move through the registry and record it.
    pub(crate) fn move_asset(
        &mut self,
        registry: &mut dyn AssetRegistry,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        asset: AssetKey,
    ) -> opensale_types::Result<()> {
        registry.transfer(operator, from, to, asset)?;
        self.moves.push((asset, from, to));
        Ok(())
    }

    /// Reverse every recorded custody move, newest first.
    pub(crate) fn unwind_moves(&mut self, registry: &mut dyn AssetRegistry, operator: AccountId) {
        while let Some((asset, from, to)) = self.moves.pop() {
            if let Err(err) = registry.transfer(operator, to, from, asset) {
                tracing::warn!(%asset, %err, "custody reversal rejected during unwind");
            }
        }
    }

    /// Reverse every recorded transfer, newest first: custody moves, then
    /// payment legs.
    pub(crate) fn unwind(
        &mut self,
        registry: &mut dyn AssetRegistry,
        router: &mut PaymentRouter,
        operator: AccountId,
    ) {
        self.unwind_moves(registry, operator);
        while let Some((currency, from, to, amount)) = self.legs.pop() {
            if let Err(err) = router.transfer(currency, to, from, amount) {
                tracing::warn!(%currency, %amount, %err, "payment reversal rejected during unwind");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensale_ledger::AssetVault;
    use opensale_types::TokenId;

    #[test]
    fn unwind_refunds_payments_in_reverse() {
        let escrow = AccountId::new();
        let mut router = PaymentRouter::new(escrow);
        let mut vault = AssetVault::new();
        let payer = AccountId::new();
        router.deposit_native(payer, Decimal::new(10, 0));

        let mut journal = Journal::new();
        journal
            .pay(&mut router, Currency::Native, payer, escrow, Decimal::new(7, 0))
            .unwrap();
        assert_eq!(router.native_balance(escrow), Decimal::new(7, 0));

        journal.unwind(&mut vault, &mut router, escrow);
        assert_eq!(router.native_balance(payer), Decimal::new(10, 0));
        assert_eq!(router.native_balance(escrow), Decimal::ZERO);
    }

    #[test]
    fn unwind_returns_custody() {
        let escrow = AccountId::new();
        let mut router = PaymentRouter::new(escrow);
        let mut vault = AssetVault::new();
        let seller = AccountId::new();
        let col = vault.create_collection(None);
        let key = vault.mint(col, TokenId(1), seller).unwrap();
        vault.approve(seller, escrow);

        let mut journal = Journal::new();
        journal
            .move_asset(&mut vault, escrow, seller, escrow, key)
            .unwrap();
        assert_eq!(vault.owner_of(key).unwrap(), escrow);

        journal.unwind(&mut vault, &mut router, escrow);
        assert_eq!(vault.owner_of(key).unwrap(), seller);
    }
}
