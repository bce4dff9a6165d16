//! Host collaborators: clipboard, file export and external search.
//!
//! The editor never talks to the platform directly. Hosts implement the
//! small traits here (a browser bridge, a terminal, a test double) and the
//! session calls them for the outward-facing actions.

use crate::history::HistoryEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, warn};

/// Base name for exported files.
pub const EXPORT_BASENAME: &str = "arabic-text";

/// Clipboard write failure reported by the host.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable")]
    Unavailable,
    #[error("clipboard permission denied")]
    Denied,
    #[error("clipboard write failed: {0}")]
    Other(String),
}

/// System clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Fallback copy through the host text field: select the text and ask the
/// widget to copy its selection.
pub trait SelectionCopy {
    /// Returns true if the widget reported success.
    fn copy_selection(&mut self, selected: &str) -> bool;
}

/// How a copy request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Clipboard,
    SelectionFallback,
    Failed,
}

/// Copy `text`, falling back to the selection mechanism when the clipboard
/// rejects the write. Never fails loudly; a total failure is only logged.
pub fn copy_text(
    text: &str,
    clipboard: &mut dyn Clipboard,
    fallback: &mut dyn SelectionCopy,
) -> CopyOutcome {
    match clipboard.write_text(text) {
        Ok(()) => CopyOutcome::Clipboard,
        Err(e) => {
            warn!(error = %e, "clipboard write failed; trying selection copy");
            if fallback.copy_selection(text) {
                CopyOutcome::SelectionFallback
            } else {
                error!("copy failed through clipboard and selection fallback");
                CopyOutcome::Failed
            }
        }
    }
}

/// A plain-text file ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub contents: String,
}

impl ExportArtifact {
    /// Export of the live buffer: `arabic-text.txt`.
    pub fn from_buffer(text: &str) -> Self {
        Self {
            filename: format!("{}.txt", EXPORT_BASENAME),
            contents: text.to_string(),
        }
    }

    /// Export of a history entry, named after its save date:
    /// `arabic-text-YYYY-MM-DD.txt`.
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        let filename = match entry.saved_at() {
            Some(at) => format!("{}-{}.txt", EXPORT_BASENAME, at.format("%Y-%m-%d")),
            None => format!("{}.txt", EXPORT_BASENAME),
        };
        Self {
            filename,
            contents: entry.text.clone(),
        }
    }

    /// Write the artifact into `dir`, returning the full path.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// External search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// General web search
    Web,
    /// Video search
    Video,
}

impl SearchKind {
    fn endpoint(self) -> &'static str {
        match self {
            SearchKind::Web => "https://www.google.com/search?q=",
            SearchKind::Video => "https://www.youtube.com/results?search_query=",
        }
    }
}

/// Search URL for `text`, or `None` when the text is blank.
///
/// # Examples
/// ```
/// use libarabic_core::host::{search_url, SearchKind};
///
/// assert_eq!(
///     search_url(SearchKind::Web, " a b ").as_deref(),
///     Some("https://www.google.com/search?q=a%20b")
/// );
/// assert_eq!(search_url(SearchKind::Video, "   "), None);
/// ```
pub fn search_url(kind: SearchKind, text: &str) -> Option<String> {
    let query = text.trim();
    if query.is_empty() {
        return None;
    }
    Some(format!("{}{}", kind.endpoint(), urlencoding::encode(query)))
}

/// Opens a URL in a new browsing context. Fire-and-forget.
pub trait UrlOpener {
    fn open(&mut self, url: &str);
}
