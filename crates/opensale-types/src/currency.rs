//! Payment media accepted by the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LedgerId;

/// A payment medium: either the native transfer medium or a reference to a
/// registered fungible-token ledger.
///
/// Membership in the accepted set is checked when a listing or auction is
/// **created**; a currency removed afterwards keeps honoring sales already
/// in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// The native balance-transfer medium. Always accepted.
    Native,
    /// A fungible-token ledger.
    Token(LedgerId),
}

impl Currency {
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_sentinel() {
        assert!(Currency::Native.is_native());
        assert!(!Currency::Token(LedgerId::new()).is_native());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Currency::Native.to_string(), "native");
        let id = LedgerId::new();
        assert!(Currency::Token(id).to_string().starts_with("ledger:"));
    }

    #[test]
    fn serde_roundtrip() {
        let c = Currency::Token(LedgerId::new());
        let json = serde_json::to_string(&c).unwrap();
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
