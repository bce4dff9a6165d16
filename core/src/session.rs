//! Editor session.
//!
//! `EditorSession` combines the edit buffer, the key interaction machine,
//! the autosave debouncer and the history store into one event-driven
//! session. Hosts feed it pointer, typing and timer events with an explicit
//! `Instant` and read its state back through an [`EditorContext`].
//!
//! Every change to the buffer restarts the autosave quiet period. Loading a
//! history entry and clearing the buffer drop any pending autosave instead.

use crate::context::{EditorContext, Notice};
use crate::debounce::Debouncer;
use crate::edit_buffer::EditBuffer;
use crate::history::{HistoryEntry, HistoryStore, SaveOutcome};
use crate::host::{self, Clipboard, CopyOutcome, ExportArtifact, SearchKind, SelectionCopy, UrlOpener};
use crate::interaction::{Anchor, Interaction, InteractionMachine, Key, VariantPopover};
use crate::storage::KeyValueStore;
use crate::translit::Transliterator;
use crate::Config;
use std::time::{Duration, Instant};
use tracing::debug;

/// What happened during a [`EditorSession::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Result of a due long-press timer
    pub interaction: Interaction,
    /// Result of a due autosave
    pub autosave: Option<SaveOutcome>,
}

/// One editing session over a history backend `S`.
#[derive(Debug)]
pub struct EditorSession<S> {
    buffer: EditBuffer,
    machine: InteractionMachine,
    autosave: Debouncer,
    history: HistoryStore<S>,
    transliterator: Transliterator,
    auto_convert: bool,
    notice: Option<Notice>,
}

impl<S: KeyValueStore> EditorSession<S> {
    /// Session with default timings and history limits.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &Config::default())
    }

    pub fn with_config(store: S, config: &Config) -> Self {
        Self {
            buffer: EditBuffer::new(),
            machine: InteractionMachine::with_threshold(config.long_press_threshold()),
            autosave: Debouncer::new(config.autosave_delay()),
            history: HistoryStore::with_config(store, config.history.clone()),
            transliterator: Transliterator::new(),
            auto_convert: config.auto_convert,
            notice: None,
        }
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn auto_convert(&self) -> bool {
        self.auto_convert
    }

    pub fn popover(&self) -> Option<&VariantPopover> {
        self.machine.popover()
    }

    pub fn long_press_threshold(&self) -> Duration {
        self.machine.threshold()
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Earliest pending deadline (long-press or autosave), for hosts that
    /// sleep between events.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.machine.next_deadline(), self.autosave.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --- Keyboard ---

    /// Pointer down on an on-screen key.
    pub fn press_key(&mut self, key: Key, anchor: Anchor, now: Instant) -> Interaction {
        let result = self.machine.press(key, anchor, now);
        self.apply(&result, now);
        result
    }

    /// Pointer up on the pressed key.
    pub fn release_key(&mut self, now: Instant) -> Interaction {
        let result = self.machine.release(now);
        self.apply(&result, now);
        result
    }

    pub fn pointer_leave(&mut self, now: Instant) -> Interaction {
        self.machine.pointer_leave(now)
    }

    /// Pick a glyph from the open variant picker.
    pub fn select_variant(&mut self, variant: &str, now: Instant) -> Interaction {
        let result = self.machine.select_variant(variant);
        self.apply(&result, now);
        result
    }

    /// Pick the glyph at `index` in the open variant picker.
    pub fn select_variant_index(&mut self, index: usize, now: Instant) -> Interaction {
        let result = self.machine.select_index(index);
        self.apply(&result, now);
        result
    }

    pub fn dismiss_variants(&mut self) -> Interaction {
        self.machine.dismiss()
    }

    fn apply(&mut self, interaction: &Interaction, now: Instant) {
        match interaction {
            Interaction::Commit(text) => {
                self.buffer.insert(text);
                self.changed(now);
            }
            Interaction::Backspace => {
                if self.buffer.backspace() {
                    self.changed(now);
                }
            }
            _ => {}
        }
    }

    // --- Text field ---

    /// Physical typing at the caret. Transliterated first when auto-convert
    /// is on.
    pub fn type_text(&mut self, text: &str, now: Instant) {
        if text.is_empty() {
            return;
        }
        if self.auto_convert {
            let converted = self.transliterator.transliterate(text);
            self.buffer.insert(&converted);
        } else {
            self.buffer.insert(text);
        }
        self.changed(now);
    }

    /// Delete backwards from the text field.
    pub fn backspace(&mut self, now: Instant) -> bool {
        let deleted = self.buffer.backspace();
        if deleted {
            self.changed(now);
        }
        deleted
    }

    /// The host field was edited directly; adopt its text and caret.
    pub fn edit_text(&mut self, text: &str, cursor: usize, now: Instant) {
        if text == self.buffer.text() {
            self.buffer.set_cursor(cursor);
            return;
        }
        self.buffer.set_text(text, cursor);
        self.changed(now);
    }

    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.buffer.set_selection(start, end);
    }

    /// Transliterate the whole buffer in place.
    pub fn convert_all(&mut self, now: Instant) {
        let converted = self.transliterator.transliterate(self.buffer.text());
        if converted != self.buffer.text() {
            self.buffer.replace_all(converted);
            self.changed(now);
        }
    }

    pub fn toggle_auto_convert(&mut self) -> bool {
        self.auto_convert = !self.auto_convert;
        debug!(enabled = self.auto_convert, "auto-convert toggled");
        self.auto_convert
    }

    /// Empty the buffer. Any pending autosave is dropped.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.autosave.cancel();
        self.machine.reset();
        self.notice = Some(Notice::Cleared);
    }

    fn changed(&mut self, now: Instant) {
        self.autosave.schedule(now);
    }

    // --- Timers ---

    /// Advance time: fire a due long-press timer and a due autosave.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let interaction = self.machine.tick(now);
        let autosave = if self.autosave.poll(now) {
            let outcome = self.history.save(self.buffer.text());
            debug!(?outcome, "autosave fired");
            Some(outcome)
        } else {
            None
        };
        TickOutcome {
            interaction,
            autosave,
        }
    }

    // --- History ---

    /// Save the buffer now.
    pub fn manual_save(&mut self) -> SaveOutcome {
        let outcome = self.history.save(self.buffer.text());
        match &outcome {
            SaveOutcome::Saved(_) => self.notice = Some(Notice::Saved),
            SaveOutcome::Duplicate => self.notice = Some(Notice::AlreadySaved),
            SaveOutcome::Blank | SaveOutcome::StorageFailed => {}
        }
        outcome
    }

    /// Replace the buffer with a history entry's text, caret at the end.
    /// Returns false for unknown ids.
    pub fn load_entry(&mut self, id: &str) -> bool {
        match self.history.load(id) {
            Some(text) => {
                self.buffer.replace_all(text);
                self.autosave.cancel();
                self.notice = Some(Notice::Loaded);
                true
            }
            None => false,
        }
    }

    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.history.list()
    }

    pub fn delete_entry(&self, id: &str) -> bool {
        self.history.delete(id)
    }

    pub fn clear_history(&self) {
        self.history.clear_all();
    }

    // --- Host actions ---

    /// Copy the buffer. On the selection fallback the whole buffer is left
    /// selected, as the host field would show it.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard, fallback: &mut dyn SelectionCopy) -> CopyOutcome {
        let outcome = host::copy_text(self.buffer.text(), clipboard, fallback);
        match outcome {
            CopyOutcome::Clipboard => self.notice = Some(Notice::Copied),
            CopyOutcome::SelectionFallback => {
                self.buffer.select_all();
                self.notice = Some(Notice::Copied);
            }
            CopyOutcome::Failed => self.notice = Some(Notice::CopyFailed),
        }
        outcome
    }

    /// The buffer as a download.
    pub fn export(&self) -> ExportArtifact {
        ExportArtifact::from_buffer(self.buffer.text())
    }

    /// Open an external search for the buffer. Returns false (and opens
    /// nothing) when the buffer is blank.
    pub fn search(&self, kind: SearchKind, opener: &mut dyn UrlOpener) -> bool {
        match host::search_url(kind, self.buffer.text()) {
            Some(url) => {
                opener.open(&url);
                true
            }
            None => false,
        }
    }

    /// Copy session state into `context` for display.
    pub fn sync_to_context(&mut self, context: &mut EditorContext) {
        context.text.clear();
        context.text.push_str(self.buffer.text());
        context.selection = self.buffer.selection();
        context.popover = self.machine.popover().cloned();
        context.auto_convert = self.auto_convert;
        context.char_count = self.buffer.char_count();
        context.word_count = self.buffer.word_count();
        context.autosave_pending = self.autosave.is_pending();
        if let Some(notice) = self.notice.take() {
            context.notice = Some(notice);
        }
    }
}
