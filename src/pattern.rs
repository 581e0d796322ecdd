//! Pattern filtering and per-light pattern storage.

use crate::types::{ConfigError, Phase, Symbol};
use heapless::String;

/// A validated light style pattern: an ordered run of [`Symbol`]s.
///
/// Built only through [`Pattern::filter`], so every byte is in `'a'..='z'`.
///
/// # Type Parameters
/// * `N` - Maximum number of symbols
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern<const N: usize> {
    symbols: String<N>,
}

impl<const N: usize> Pattern<N> {
    /// Creates an empty pattern.
    pub const fn new() -> Self {
        Self {
            symbols: String::new(),
        }
    }

    /// Normalizes raw pattern text.
    ///
    /// Keeps the characters in `'a'..='z'` in their original order and drops
    /// everything else. Never fails: text with no valid characters yields an
    /// empty pattern. At most `N` symbols are kept.
    pub fn filter(raw: &str) -> Self {
        let mut symbols = String::new();
        for symbol in raw.chars().filter_map(Symbol::new) {
            if symbols.push(symbol.as_char()).is_err() {
                break;
            }
        }
        Self { symbols }
    }

    /// Number of symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if there are no symbols.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol at `index`.
    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.symbols
            .as_bytes()
            .get(index)
            .and_then(|&b| Symbol::new(b as char))
    }

    /// Returns the symbol at `index` as a one-character style value.
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.symbols.get(index..=index)
    }

    /// Returns the pattern as a style string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.symbols
    }
}

/// The three pattern slots a light can animate through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternSlot {
    /// Played once when switched on.
    Start,
    /// Looped while on. Also the static pattern of non-animated lights.
    On,
    /// Played once when switched off.
    Stop,
}

impl PatternSlot {
    /// Returns the slot animated during `phase`, if any.
    pub fn for_phase(phase: Phase) -> Option<Self> {
        match phase {
            Phase::Start => Some(PatternSlot::Start),
            Phase::On => Some(PatternSlot::On),
            Phase::Stop => Some(PatternSlot::Stop),
            Phase::None | Phase::Stopped => None,
        }
    }

    fn index(self) -> usize {
        match self {
            PatternSlot::Start => 0,
            PatternSlot::On => 1,
            PatternSlot::Stop => 2,
        }
    }
}

/// Raw and filtered patterns for one light.
///
/// The raw text is kept verbatim so it can be saved and the filtered
/// patterns derived again after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternStore<const N: usize> {
    raw: [String<N>; 3],
    filtered: [Pattern<N>; 3],
}

impl<const N: usize> PatternStore<N> {
    /// Creates a store with every slot unconfigured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from saved raw text, deriving the filtered patterns.
    pub fn from_raw(start: String<N>, on: String<N>, stop: String<N>) -> Self {
        let mut store = Self {
            raw: [start, on, stop],
            filtered: Default::default(),
        };
        store.refilter();
        store
    }

    /// Stores `raw` in `slot` and derives its filtered pattern.
    ///
    /// # Errors
    /// * `ValueTooLong` - `raw` is longer than `N` bytes
    pub fn set(&mut self, slot: PatternSlot, raw: &str) -> Result<(), ConfigError> {
        let mut text = String::new();
        text.push_str(raw).map_err(|_| ConfigError::ValueTooLong {
            len: raw.len(),
            capacity: N,
        })?;

        self.filtered[slot.index()] = Pattern::filter(&text);
        self.raw[slot.index()] = text;
        Ok(())
    }

    /// Returns the filtered pattern animated during `phase`.
    ///
    /// `None` for the non-ticking phases, which have no pattern.
    pub fn get(&self, phase: Phase) -> Option<&Pattern<N>> {
        PatternSlot::for_phase(phase).map(|slot| &self.filtered[slot.index()])
    }

    /// Returns the filtered pattern in `slot`.
    pub fn pattern(&self, slot: PatternSlot) -> &Pattern<N> {
        &self.filtered[slot.index()]
    }

    /// Returns the raw text stored in `slot`, exactly as configured.
    pub fn raw(&self, slot: PatternSlot) -> &str {
        &self.raw[slot.index()]
    }

    /// Returns true if `slot` was given non-empty raw text.
    pub fn is_configured(&self, slot: PatternSlot) -> bool {
        !self.raw[slot.index()].is_empty()
    }

    /// Derives every filtered pattern again from the raw text.
    pub fn refilter(&mut self) {
        for (raw, filtered) in self.raw.iter().zip(self.filtered.iter_mut()) {
            *filtered = if raw.is_empty() {
                Pattern::new()
            } else {
                Pattern::filter(raw)
            };
        }
    }
}
