//! Tap / long-press state machine for on-screen keys.
//!
//! A press either ends as a tap (release before the long-press threshold,
//! commits the base key) or, on keys with variants, opens a variant picker
//! whose selection commits the chosen glyph. Time is passed in explicitly so
//! the machine can be driven by a host event loop or by tests alike.

use crate::variants::VariantTable;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default hold time before the variant picker opens.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

/// A key on the virtual keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A glyph key; may be several code points (e.g. lam-alif)
    Char(String),
    Space,
    Enter,
    Backspace,
}

impl Key {
    pub fn char(glyph: impl Into<String>) -> Self {
        Key::Char(glyph.into())
    }

    /// Special keys never take part in long-press handling.
    pub fn is_special(&self) -> bool {
        !matches!(self, Key::Char(_))
    }
}

/// Screen position of a key, used to place the picker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pending long-press deadline owned by a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPressTimer {
    due: Instant,
}

impl LongPressTimer {
    fn start(now: Instant, threshold: Duration) -> Self {
        Self {
            due: now + threshold,
        }
    }

    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

/// An open variant picker.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPopover {
    pub key: String,
    pub variants: Vec<String>,
    pub anchor: Anchor,
}

/// Machine state.
#[derive(Debug, Clone, PartialEq)]
pub enum PressState {
    Idle,
    Pressed {
        key: String,
        started_at: Instant,
        anchor: Anchor,
        /// `None` once the timer has fired without opening a picker
        timer: Option<LongPressTimer>,
    },
    VariantsShown(VariantPopover),
}

/// Observable result of feeding an event to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Nothing to do
    None,
    /// A press started; waiting for release or the long-press timer
    Pending,
    /// Insert this text into the buffer
    Commit(String),
    /// Delete backwards in the buffer
    Backspace,
    /// The variant picker opened
    ShowVariants(VariantPopover),
    /// A press was abandoned or the picker closed without a choice
    Closed,
}

/// Press/hold/release state machine over a [`VariantTable`].
#[derive(Debug, Clone)]
pub struct InteractionMachine {
    state: PressState,
    threshold: Duration,
    table: &'static VariantTable,
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionMachine {
    /// Machine over the standard variant table with the 500ms threshold.
    pub fn new() -> Self {
        Self::with_threshold(LONG_PRESS_THRESHOLD)
    }

    pub fn with_threshold(threshold: Duration) -> Self {
        Self {
            state: PressState::Idle,
            threshold,
            table: VariantTable::standard(),
        }
    }

    pub fn state(&self) -> &PressState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == PressState::Idle
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// The open picker, if any.
    pub fn popover(&self) -> Option<&VariantPopover> {
        match &self.state {
            PressState::VariantsShown(p) => Some(p),
            _ => None,
        }
    }

    /// When the pending long-press timer fires, if one is running.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.state {
            PressState::Pressed { timer: Some(t), .. } => Some(t.due()),
            _ => None,
        }
    }

    /// Pointer down on `key`.
    pub fn press(&mut self, key: Key, anchor: Anchor, now: Instant) -> Interaction {
        // One picker at a time; a stale press is abandoned
        match &self.state {
            PressState::VariantsShown(p) => debug!(key = %p.key, "closing picker for new press"),
            PressState::Pressed { key, .. } => debug!(key = %key, "abandoning unreleased press"),
            PressState::Idle => {}
        }
        self.state = PressState::Idle;

        match key {
            Key::Space => Interaction::Commit(" ".to_string()),
            Key::Enter => Interaction::Commit("\n".to_string()),
            Key::Backspace => Interaction::Backspace,
            Key::Char(glyph) => {
                self.state = PressState::Pressed {
                    key: glyph,
                    started_at: now,
                    anchor,
                    timer: Some(LongPressTimer::start(now, self.threshold)),
                };
                Interaction::Pending
            }
        }
    }

    /// Advance time. Fires the long-press timer if it is due.
    pub fn tick(&mut self, now: Instant) -> Interaction {
        let (key, anchor) = match &mut self.state {
            PressState::Pressed {
                key, anchor, timer, ..
            } if timer.as_ref().map_or(false, |t| t.is_due(now)) => {
                *timer = None;
                (key.clone(), *anchor)
            }
            _ => return Interaction::None,
        };

        if !self.table.has_alternatives(&key) {
            // No picker for single-glyph keys; release still commits
            return Interaction::None;
        }

        let popover = VariantPopover {
            variants: self.table.variants_or_self(&key),
            key,
            anchor,
        };
        debug!(key = %popover.key, count = popover.variants.len(), "opening variant picker");
        self.state = PressState::VariantsShown(popover.clone());
        Interaction::ShowVariants(popover)
    }

    /// Pointer up. A release before the threshold is a tap.
    pub fn release(&mut self, now: Instant) -> Interaction {
        // A timer that should already have fired takes precedence
        if let Interaction::ShowVariants(popover) = self.tick(now) {
            return Interaction::ShowVariants(popover);
        }

        match std::mem::replace(&mut self.state, PressState::Idle) {
            PressState::Pressed { key, .. } => Interaction::Commit(key),
            other => {
                self.state = other;
                Interaction::None
            }
        }
    }

    /// Pointer left the key before release: the press is abandoned.
    pub fn pointer_leave(&mut self, now: Instant) -> Interaction {
        if let Interaction::ShowVariants(popover) = self.tick(now) {
            return Interaction::ShowVariants(popover);
        }

        if matches!(self.state, PressState::Pressed { .. }) {
            self.state = PressState::Idle;
            return Interaction::Closed;
        }
        Interaction::None
    }

    /// Choose a variant from the open picker.
    pub fn select_variant(&mut self, variant: &str) -> Interaction {
        let chosen = match &self.state {
            PressState::VariantsShown(p) if p.variants.iter().any(|v| v == variant) => {
                variant.to_string()
            }
            _ => return Interaction::None,
        };
        self.state = PressState::Idle;
        Interaction::Commit(chosen)
    }

    /// Choose the variant at `index` in the open picker.
    pub fn select_index(&mut self, index: usize) -> Interaction {
        let chosen = match self.popover().and_then(|p| p.variants.get(index)) {
            Some(v) => v.clone(),
            None => return Interaction::None,
        };
        self.select_variant(&chosen)
    }

    /// Close the picker without choosing (outside click or explicit close).
    pub fn dismiss(&mut self) -> Interaction {
        if matches!(self.state, PressState::VariantsShown(_)) {
            self.state = PressState::Idle;
            return Interaction::Closed;
        }
        Interaction::None
    }

    /// Drop any press or picker and its pending timer.
    pub fn reset(&mut self) {
        if !self.is_idle() {
            debug!("resetting interaction state");
        }
        self.state = PressState::Idle;
    }
}
