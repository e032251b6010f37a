//! In-memory reference implementation of [`FungibleLedger`].

use std::collections::HashMap;

use opensale_types::{AccountId, OpensaleError, Result};
use rust_decimal::Decimal;

use crate::traits::FungibleLedger;

/// In-memory fungible-token ledger with ERC-20-style balances and
/// (owner, spender) allowances.
#[derive(Debug, Default, Clone)]
pub struct TokenBook {
    balances: HashMap<AccountId, Decimal>,
    allowances: HashMap<(AccountId, AccountId), Decimal>,
}

impl TokenBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air (test funding).
    pub fn mint(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// Set the allowance `spender` may pull from `owner`.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Decimal) {
        self.allowances.insert((owner, spender), amount);
    }

    fn debit(&mut self, from: AccountId, amount: Decimal) -> Result<()> {
        let balance = self.balances.entry(from).or_insert(Decimal::ZERO);
        if *balance < amount {
            return Err(OpensaleError::InsufficientFunds {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }
}

impl FungibleLedger for TokenBook {
    fn balance_of(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    fn allowance(&self, owner: AccountId, spender: AccountId) -> Decimal {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        self.debit(from, amount)?;
        *self.balances.entry(to).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(OpensaleError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        self.debit(from, amount)?;
        self.allowances.insert((from, spender), allowed - amount);
        *self.balances.entry(to).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_and_transfer() {
        let mut book = TokenBook::new();
        let (a, b) = (AccountId::new(), AccountId::new());
        book.mint(a, Decimal::new(100, 0));

        book.transfer(a, b, Decimal::new(40, 0)).unwrap();
        assert_eq!(book.balance_of(a), Decimal::new(60, 0));
        assert_eq!(book.balance_of(b), Decimal::new(40, 0));
    }

    #[test]
    fn transfer_insufficient_funds() {
        let mut book = TokenBook::new();
        let (a, b) = (AccountId::new(), AccountId::new());
        book.mint(a, Decimal::new(10, 0));

        let err = book.transfer(a, b, Decimal::new(20, 0)).unwrap_err();
        assert!(matches!(err, OpensaleError::InsufficientFunds { .. }));
        assert_eq!(book.balance_of(a), Decimal::new(10, 0));
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut book = TokenBook::new();
        let (owner, spender, to) = (AccountId::new(), AccountId::new(), AccountId::new());
        book.mint(owner, Decimal::new(100, 0));
        book.approve(owner, spender, Decimal::new(50, 0));

        book.transfer_from(spender, owner, to, Decimal::new(30, 0))
            .unwrap();
        assert_eq!(book.balance_of(to), Decimal::new(30, 0));
        assert_eq!(book.allowance(owner, spender), Decimal::new(20, 0));
    }

    #[test]
    fn transfer_from_without_allowance_fails() {
        let mut book = TokenBook::new();
        let (owner, spender, to) = (AccountId::new(), AccountId::new(), AccountId::new());
        book.mint(owner, Decimal::new(100, 0));

        let err = book
            .transfer_from(spender, owner, to, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, OpensaleError::InsufficientAllowance { .. }));
        assert_eq!(book.balance_of(owner), Decimal::new(100, 0));
    }
}
