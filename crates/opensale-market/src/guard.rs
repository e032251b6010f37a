//! Re-entrancy guard for state-mutating entry points.
//!
//! An adversarial payment recipient may try to call back into the engine
//! from within one of its own outbound transfers, before state is
//! finalized. Every state-mutating entry point sets this flag on entry and
//! clears it on exit, success or failure; a call arriving while the flag
//! is set fails with [`OpensaleError::ReentrantCall`].

use opensale_types::{OpensaleError, Result};

/// Explicit per-operation mutual-exclusion flag.
#[derive(Debug, Default, Clone)]
pub struct EntryGuard {
    engaged: bool,
}

impl EntryGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engage the guard. Fails if an operation is already in progress.
    pub fn enter(&mut self) -> Result<()> {
        if self.engaged {
            return Err(OpensaleError::ReentrantCall);
        }
        self.engaged = true;
        Ok(())
    }

    /// Clear the guard. Called on every exit path, including failures.
    pub fn exit(&mut self) {
        self.engaged = false;
    }

    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentry_rejected_while_engaged() {
        let mut guard = EntryGuard::new();
        guard.enter().unwrap();
        assert!(guard.is_engaged());

        let err = guard.enter().unwrap_err();
        assert!(matches!(err, OpensaleError::ReentrantCall));
    }

    #[test]
    fn exit_allows_next_entry() {
        let mut guard = EntryGuard::new();
        guard.enter().unwrap();
        guard.exit();
        assert!(!guard.is_engaged());
        guard.enter().unwrap();
    }
}
