// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use crate::StdMutex;

pub type SafePromptState = Arc<StdMutex<PromptState>>;

/// Whether the prompt (and whatever the user typed after it) is on screen right now.
///
/// The reader thread sets this just before it starts a read and clears it once the read
/// returns. Anyone that wants to write to the terminal while a read is in progress has to
/// erase the prompt first with [`crate::LineEditorControl::clear_current_line()`] and put
/// it back afterwards, see [`crate::ConsoleMessageOutput`].
///
/// Only touch this while holding the [`crate::OutputDevice`] lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PromptState {
    pub visible: bool,
}

impl PromptState {
    #[must_use]
    pub fn new_safe() -> SafePromptState { Arc::new(StdMutex::new(Self::default())) }
}
