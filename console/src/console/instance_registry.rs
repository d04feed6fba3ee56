// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::ConsoleError;

static GLOBAL_CONSOLE_INSTANCE: ConsoleInstanceRegistry = ConsoleInstanceRegistry::new();

/// At most one console can own the terminal at a time. Claim the slot with
/// [`ConsoleInstanceRegistry::try_claim()`], it is released when the returned guard is
/// dropped.
#[derive(Debug)]
pub struct ConsoleInstanceRegistry {
    is_claimed: AtomicBool,
}

impl Default for ConsoleInstanceRegistry {
    fn default() -> Self { Self::new() }
}

impl ConsoleInstanceRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            is_claimed: AtomicBool::new(false),
        }
    }

    /// The process wide registry.
    #[must_use]
    pub fn global() -> &'static Self { &GLOBAL_CONSOLE_INSTANCE }

    /// # Errors
    ///
    /// [`ConsoleError::MultipleConsoles`] if another guard is alive.
    pub fn try_claim(&self) -> Result<ConsoleInstanceGuard<'_>, ConsoleError> {
        self.is_claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ConsoleInstanceGuard { registry: self })
            .map_err(|_| ConsoleError::MultipleConsoles)
    }

    #[must_use]
    pub fn is_claimed(&self) -> bool { self.is_claimed.load(Ordering::SeqCst) }
}

/// Proof that the holder is the only console.
#[derive(Debug)]
pub struct ConsoleInstanceGuard<'a> {
    registry: &'a ConsoleInstanceRegistry,
}

impl Drop for ConsoleInstanceGuard<'_> {
    fn drop(&mut self) { self.registry.is_claimed.store(false, Ordering::SeqCst); }
}
