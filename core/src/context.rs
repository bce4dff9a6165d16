//! Editor context for host communication.
//!
//! `EditorContext` is a plain data snapshot. After feeding an event to an
//! [`EditorSession`](crate::session::EditorSession), the host calls
//! `sync_to_context` and redraws from these fields.

use crate::interaction::VariantPopover;

/// Short status message shown after an action (copy, save, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Copied,
    CopyFailed,
    Saved,
    AlreadySaved,
    Loaded,
    Cleared,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Copied => "Text copied to clipboard",
            Notice::CopyFailed => "Failed to copy text",
            Notice::Saved => "Saved to history",
            Notice::AlreadySaved => "Already in history",
            Notice::Loaded => "Loaded from history",
            Notice::Cleared => "Text cleared",
        }
    }
}

/// Snapshot of everything the host displays.
#[derive(Debug, Clone, Default)]
pub struct EditorContext {
    /// Buffer contents
    pub text: String,

    /// Selection as character offsets
    pub selection: (usize, usize),

    /// Open variant picker, if any
    pub popover: Option<VariantPopover>,

    /// Latin-to-Arabic conversion of typed text
    pub auto_convert: bool,

    pub char_count: usize,
    pub word_count: usize,

    /// An autosave is scheduled
    pub autosave_pending: bool,

    /// Set by the session, consumed by the host
    pub notice: Option<Notice>,
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending notice, leaving none.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn has_popover(&self) -> bool {
        self.popover.is_some()
    }
}
