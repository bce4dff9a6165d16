//! libarabic crate root
//!
//! Terminal front end for the virtual Arabic keyboard. Adds file-based
//! configuration with a choice of history backend, text rendering for the
//! keyboard, variants and history, and terminal implementations of the host
//! interfaces.
//!
//! Public API exported here:
//! - `KeyboardConfig` and `StorageKind` from `config`
//! - rendering helpers from `display`
//! - `StdoutOpener` for search actions

pub mod config;
pub mod display;

pub use config::{default_db_path, KeyboardConfig, StorageKind};

// Re-export the core types callers need alongside the config.
pub use libarabic_core::{
    search_url, transliterate, Config, EditorContext, EditorSession, HistoryEntry, HistoryStore,
    Interaction, Key, SaveOutcome, SearchKind, Storage, UrlOpener, VariantTable,
};

/// Opener for terminals: prints the URL instead of launching a browser.
#[derive(Debug, Default)]
pub struct StdoutOpener;

impl UrlOpener for StdoutOpener {
    fn open(&mut self, url: &str) {
        println!("{}", url);
    }
}
