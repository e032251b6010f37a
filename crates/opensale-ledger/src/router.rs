//! Payment router -- the single chokepoint for value movement.
//!
//! Every "pay amount X to party Y in currency C" in the engine goes through
//! [`PaymentRouter::transfer`], covering both the native balance-transfer
//! primitive and delegated fungible-token transfers. Pulling a third
//! party's token funds uses the allowance form with the engine's escrow
//! account as spender; payouts from escrow use the direct form.

use std::collections::HashMap;

use opensale_types::{AccountId, Currency, LedgerId, OpensaleError, Result};
use rust_decimal::Decimal;

use crate::traits::FungibleLedger;

/// Routes payments to the native balance map or a registered token ledger.
pub struct PaymentRouter {
    /// The engine's escrow account: spender for pulls, source for payouts.
    escrow: AccountId,
    /// Native-medium balances.
    native: HashMap<AccountId, Decimal>,
    /// Registered fungible-token ledgers.
    ledgers: HashMap<LedgerId, Box<dyn FungibleLedger>>,
}

impl PaymentRouter {
    /// Create a router whose pulls are authorized against `escrow`.
    #[must_use]
    pub fn new(escrow: AccountId) -> Self {
        Self {
            escrow,
            native: HashMap::new(),
            ledgers: HashMap::new(),
        }
    }

    /// The escrow account this router operates on behalf of.
    #[must_use]
    pub fn escrow(&self) -> AccountId {
        self.escrow
    }

    /// Credit native funds to an account (deposit / test funding).
    pub fn deposit_native(&mut self, account: AccountId, amount: Decimal) {
        *self.native.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// Native balance of an account.
    #[must_use]
    pub fn native_balance(&self, account: AccountId) -> Decimal {
        self.native.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Register the ledger backing a token currency.
    pub fn register_ledger(&mut self, id: LedgerId, ledger: Box<dyn FungibleLedger>) {
        self.ledgers.insert(id, ledger);
    }

    #[must_use]
    pub fn has_ledger(&self, id: LedgerId) -> bool {
        self.ledgers.contains_key(&id)
    }

    /// Token balance of an account on a registered ledger.
    pub fn token_balance(&self, id: LedgerId, account: AccountId) -> Result<Decimal> {
        let ledger = self.ledgers.get(&id).ok_or(OpensaleError::UnknownLedger)?;
        Ok(ledger.balance_of(account))
    }

    /// Check that `from` could fund a pull of `amount` in `currency`
    /// right now, without moving anything. Batch validation uses this to
    /// reject a shortfall before any item executes.
    pub fn ensure_cover(&self, currency: Currency, from: AccountId, amount: Decimal) -> Result<()> {
        match currency {
            Currency::Native => {
                let available = self.native_balance(from);
                if available < amount {
                    return Err(OpensaleError::InsufficientFunds {
                        needed: amount,
                        available,
                    });
                }
            }
            Currency::Token(id) => {
                let ledger = self.ledgers.get(&id).ok_or(OpensaleError::UnknownLedger)?;
                let available = ledger.balance_of(from);
                if available < amount {
                    return Err(OpensaleError::InsufficientFunds {
                        needed: amount,
                        available,
                    });
                }
                let allowed = ledger.allowance(from, self.escrow);
                if allowed < amount {
                    return Err(OpensaleError::InsufficientAllowance {
                        needed: amount,
                        available: allowed,
                    });
                }
            }
        }
        Ok(())
    }

    /// Pay `amount` from `from` to `to` in `currency`. Zero amounts are a
    /// no-op (zero fee legs are skipped, never transferred).
    pub fn transfer(
        &mut self,
        currency: Currency,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        if amount == Decimal::ZERO {
            return Ok(());
        }
        match currency {
            Currency::Native => {
                let balance = self.native.entry(from).or_insert(Decimal::ZERO);
                if *balance < amount {
                    return Err(OpensaleError::InsufficientFunds {
                        needed: amount,
                        available: *balance,
                    });
                }
                *balance -= amount;
                *self.native.entry(to).or_insert(Decimal::ZERO) += amount;
                Ok(())
            }
            Currency::Token(id) => {
                let escrow = self.escrow;
                let ledger = self
                    .ledgers
                    .get_mut(&id)
                    .ok_or(OpensaleError::UnknownLedger)?;
                if from == escrow {
                    ledger.transfer(from, to, amount)
                } else {
                    ledger.transfer_from(escrow, from, to, amount)
                }
            }
        }
    }
}

impl std::fmt::Debug for PaymentRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentRouter")
            .field("escrow", &self.escrow)
            .field("native_accounts", &self.native.len())
            .field("ledgers", &self.ledgers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_book::TokenBook;

    #[test]
    fn native_transfer_moves_balance() {
        let escrow = AccountId::new();
        let mut router = PaymentRouter::new(escrow);
        let (a, b) = (AccountId::new(), AccountId::new());
        router.deposit_native(a, Decimal::new(10, 0));

        router
            .transfer(Currency::Native, a, b, Decimal::new(4, 0))
            .unwrap();
        assert_eq!(router.native_balance(a), Decimal::new(6, 0));
        assert_eq!(router.native_balance(b), Decimal::new(4, 0));
    }

    #[test]
    fn native_transfer_insufficient_funds() {
        let mut router = PaymentRouter::new(AccountId::new());
        let (a, b) = (AccountId::new(), AccountId::new());

        let err = router
            .transfer(Currency::Native, a, b, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, OpensaleError::InsufficientFunds { .. }));
    }

    #[test]
    fn zero_amount_is_noop() {
        let mut router = PaymentRouter::new(AccountId::new());
        let (a, b) = (AccountId::new(), AccountId::new());
        router
            .transfer(Currency::Native, a, b, Decimal::ZERO)
            .unwrap();
        assert_eq!(router.native_balance(b), Decimal::ZERO);
    }

    #[test]
    fn unknown_ledger_rejected() {
        let mut router = PaymentRouter::new(AccountId::new());
        let err = router
            .transfer(
                Currency::Token(LedgerId::new()),
                AccountId::new(),
                AccountId::new(),
                Decimal::ONE,
            )
            .unwrap_err();
        assert!(matches!(err, OpensaleError::UnknownLedger));
    }

    #[test]
    fn token_pull_uses_allowance_payout_does_not() {
        let escrow = AccountId::new();
        let mut router = PaymentRouter::new(escrow);
        let buyer = AccountId::new();
        let seller = AccountId::new();

        let mut book = TokenBook::new();
        book.mint(buyer, Decimal::new(100, 0));
        book.approve(buyer, escrow, Decimal::new(100, 0));
        let id = LedgerId::new();
        router.register_ledger(id, Box::new(book));
        assert!(router.has_ledger(id));
        assert!(!router.has_ledger(LedgerId::new()));
        let currency = Currency::Token(id);

        // Pull into escrow (allowance form).
        router
            .transfer(currency, buyer, escrow, Decimal::new(25, 0))
            .unwrap();
        assert_eq!(
            router.token_balance(id, escrow).unwrap(),
            Decimal::new(25, 0)
        );

        // Pay out of escrow (direct form, no allowance needed).
        router
            .transfer(currency, escrow, seller, Decimal::new(25, 0))
            .unwrap();
        assert_eq!(
            router.token_balance(id, seller).unwrap(),
            Decimal::new(25, 0)
        );
        assert_eq!(router.token_balance(id, escrow).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn token_pull_without_allowance_fails() {
        let escrow = AccountId::new();
        let mut router = PaymentRouter::new(escrow);
        let buyer = AccountId::new();

        let mut book = TokenBook::new();
        book.mint(buyer, Decimal::new(100, 0));
        let id = LedgerId::new();
        router.register_ledger(id, Box::new(book));

        let err = router
            .transfer(Currency::Token(id), buyer, escrow, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, OpensaleError::InsufficientAllowance { .. }));
    }
}
