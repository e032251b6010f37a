//! System-wide constants for the OpenSale settlement engine.

/// Denominator for basis-point arithmetic (fee rate, royalty rate,
/// bid increment).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Hard cap on the protocol fee: 10%.
pub const FEE_CAP_BPS: u32 = 1_000;

/// Minimum increment over the running highest bid: 5%.
pub const MIN_BID_INCREMENT_BPS: u32 = 500;

/// Maximum items in a single bulk-list batch.
pub const MAX_BULK_LIST: usize = 50;

/// Maximum items in a single bulk-buy batch.
pub const MAX_BULK_BUY: usize = 20;

/// Default minimum auction duration in seconds (10 minutes).
pub const DEFAULT_MIN_AUCTION_SECS: i64 = 600;

/// Default maximum auction duration in seconds (30 days).
pub const DEFAULT_MAX_AUCTION_SECS: i64 = 2_592_000;

/// Decimal places used when rounding derived amounts (fee floor,
/// bid-increment ceiling, royalty floor).
pub const AMOUNT_PRECISION: u32 = 8;
