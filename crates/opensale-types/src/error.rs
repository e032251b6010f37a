//! Error types for the OpenSale settlement engine.
//!
//! All errors use the `OS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Admin / currency-set errors
//! - 2xx: Listing errors
//! - 3xx: Auction errors
//! - 4xx: Payment errors
//! - 5xx: Batch errors
//! - 6xx: Custody / asset-registry errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::AssetKey;

/// Central error enum for all OpenSale operations.
///
/// Every failure is synchronous and aborts the whole operation (and, for
/// batches, the whole batch) with no partial effects.
#[derive(Debug, Error)]
pub enum OpensaleError {
    // =================================================================
    // Admin / currency-set Errors (1xx)
    // =================================================================
    /// The protocol fee may not exceed the 10% cap.
    #[error("OS_ERR_100: Fee of {bps} bps exceeds the cap of {cap} bps")]
    FeeAboveCap { bps: u32, cap: u32 },

    /// The treasury account must not be the nil account.
    #[error("OS_ERR_101: Treasury account must not be nil")]
    InvalidTreasury,

    /// The currency is already in the accepted set.
    #[error("OS_ERR_102: Currency already accepted")]
    DuplicateCurrency,

    /// The currency is not in the accepted set (admin removal).
    #[error("OS_ERR_103: Currency not in the accepted set")]
    CurrencyNotAccepted,

    /// The native medium is always accepted and cannot be removed.
    #[error("OS_ERR_104: The native medium cannot be removed")]
    CannotRemoveNative,

    /// The currency is not accepted for new listings or auctions.
    #[error("OS_ERR_110: Unsupported payment token")]
    UnsupportedPaymentToken,

    /// A token currency has no ledger registered with the payment router.
    #[error("OS_ERR_111: No ledger registered for currency")]
    UnknownLedger,

    // =================================================================
    // Listing Errors (2xx)
    // =================================================================
    /// Listing price must be strictly positive.
    #[error("OS_ERR_200: Price must be greater than zero")]
    PriceMustBeGreaterThanZero,

    /// Listing expiry must lie strictly in the future at creation time.
    #[error("OS_ERR_201: Expiry must lie in the future")]
    InvalidExpiry,

    /// Caller is not the seller of the existing listing.
    #[error("OS_ERR_202: Caller is not the listing owner")]
    NotListingOwner,

    /// No active listing exists for the asset.
    #[error("OS_ERR_203: Item not for sale: {0}")]
    ItemNotForSale(AssetKey),

    /// The listing's expiry has elapsed.
    #[error("OS_ERR_204: Listing expired: {0}")]
    ListingExpired(AssetKey),

    /// The asset is held by an unsettled auction; it cannot be (re)listed.
    #[error("OS_ERR_205: Asset is held by an auction in progress: {0}")]
    AuctionInProgress(AssetKey),

    // =================================================================
    // Auction Errors (3xx)
    // =================================================================
    /// Auction start price must be strictly positive.
    #[error("OS_ERR_300: Start price must be greater than zero")]
    StartPriceMustBeGreaterThanZero,

    /// Auction duration lies outside the configured [min, max] window.
    #[error("OS_ERR_301: Auction duration outside the allowed window")]
    InvalidDuration,

    /// An unsettled auction already exists for the asset.
    #[error("OS_ERR_302: Auction already exists: {0}")]
    AuctionAlreadyExists(AssetKey),

    /// The auction does not exist, is settled, or is outside its
    /// [start, end] window.
    #[error("OS_ERR_303: Auction not active: {0}")]
    AuctionNotActive(AssetKey),

    /// The bid is below the minimum acceptable amount.
    #[error("OS_ERR_304: Bid too low: minimum acceptable bid is {minimum}")]
    BidTooLow { minimum: Decimal },

    /// The auction has not ended yet; settlement and recovery must wait.
    #[error("OS_ERR_305: Auction not ended: {0}")]
    AuctionNotEnded(AssetKey),

    /// The auction already reached its terminal state.
    #[error("OS_ERR_306: Auction already settled: {0}")]
    AuctionAlreadySettled(AssetKey),

    /// No bid, or the highest bid is below the reserve price.
    #[error("OS_ERR_307: Reserve not met")]
    ReserveNotMet,

    /// The auction succeeded; the recovery withdrawal does not apply.
    #[error("OS_ERR_308: Reserve was met; settle the auction instead")]
    ReserveMet,

    // =================================================================
    // Payment Errors (4xx)
    // =================================================================
    /// Attached native payment does not cover what is owed.
    #[error("OS_ERR_400: Insufficient payment: need {needed}, attached {attached}")]
    InsufficientPayment { needed: Decimal, attached: Decimal },

    /// Attached native payment must equal the bid amount exactly.
    #[error("OS_ERR_401: Attached payment must equal the bid amount")]
    IncorrectAmount,

    /// Native payment attached to a token-denominated operation.
    #[error("OS_ERR_402: Native payment not required for this currency")]
    CurrencyNotRequired,

    /// Not enough balance to perform the transfer.
    #[error("OS_ERR_403: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    /// Not enough allowance for the engine to pull token funds.
    #[error("OS_ERR_404: Insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: Decimal, available: Decimal },

    /// The resolved royalty exceeds the proceeds remaining after the fee.
    #[error("OS_ERR_405: Royalty exceeds sale proceeds")]
    RoyaltyExceedsPrice,

    // =================================================================
    // Batch Errors (5xx)
    // =================================================================
    /// The batch exceeds the hard item cap.
    #[error("OS_ERR_500: Too many items in batch: {got} exceeds cap of {max}")]
    TooManyItems { max: usize, got: usize },

    /// Parallel input collections have differing lengths.
    #[error("OS_ERR_501: Batch input arrays differ in length")]
    ArrayLengthMismatch,

    // =================================================================
    // Custody / asset-registry Errors (6xx)
    // =================================================================
    /// Caller does not hold the asset or has not authorized the engine.
    #[error("OS_ERR_600: Caller does not own the asset or has not approved the engine")]
    NotOwnerOrNotApproved,

    /// The asset does not exist in the registry.
    #[error("OS_ERR_601: Asset not found: {0}")]
    AssetNotFound(AssetKey),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// A state-mutating entry point was re-entered before completion.
    #[error("OS_ERR_900: Re-entrant call rejected")]
    ReentrantCall,

    /// Unrecoverable internal error.
    #[error("OS_ERR_901: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpensaleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CollectionId, TokenId};

    fn key() -> AssetKey {
        AssetKey::new(CollectionId::new(), TokenId(1))
    }

    #[test]
    fn error_display_contains_prefix() {
        let err = OpensaleError::ItemNotForSale(key());
        let msg = format!("{err}");
        assert!(msg.starts_with("OS_ERR_203"), "Got: {msg}");
    }

    #[test]
    fn bid_too_low_display_includes_minimum() {
        let err = OpensaleError::BidTooLow {
            minimum: Decimal::new(1155, 3),
        };
        let msg = format!("{err}");
        assert!(msg.contains("OS_ERR_304"));
        assert!(msg.contains("1.155"));
    }

    #[test]
    fn insufficient_payment_display() {
        let err = OpensaleError::InsufficientPayment {
            needed: Decimal::new(100, 0),
            attached: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("OS_ERR_400"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn all_errors_have_os_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(OpensaleError::FeeAboveCap { bps: 1200, cap: 1000 }),
            Box::new(OpensaleError::UnsupportedPaymentToken),
            Box::new(OpensaleError::NotListingOwner),
            Box::new(OpensaleError::AuctionNotActive(key())),
            Box::new(OpensaleError::ReserveNotMet),
            Box::new(OpensaleError::TooManyItems { max: 20, got: 21 }),
            Box::new(OpensaleError::NotOwnerOrNotApproved),
            Box::new(OpensaleError::ReentrantCall),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("OS_ERR_"),
                "Error missing OS_ERR_ prefix: {msg}"
            );
        }
    }
}
