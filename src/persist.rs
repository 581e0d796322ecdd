//! Save/restore of a light across host restarts.
//!
//! Only the raw pattern text is saved. The filtered patterns are derived
//! again on restore, while phase and cursor are carried over as-is.

use crate::controller::PhaseController;
use crate::pattern::{PatternSlot, PatternStore};
use crate::types::{Phase, RestoreError};
use heapless::String;
use serde::{Deserialize, Serialize};

/// Persisted fields of one light.
///
/// # Type Parameters
/// * `N` - Maximum pattern length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState<const N: usize> {
    /// Style channel.
    pub style: i32,
    /// Raw on (static) pattern text.
    pub pattern: String<N>,
    /// Raw start pattern text.
    pub pattern_start: String<N>,
    /// Raw stop pattern text.
    pub pattern_stop: String<N>,
    /// Phase in its integer encoding.
    pub phase: u8,
    /// Index of the next symbol to emit.
    pub cursor: u32,
    /// The light is currently switched off.
    pub start_off: bool,
    /// Extended pattern mode.
    pub extended: bool,
}

impl<const N: usize> SavedState<N> {
    pub(crate) fn capture(controller: &PhaseController<N>, start_off: bool, extended: bool) -> Self {
        let patterns = controller.patterns();
        Self {
            style: controller.style(),
            pattern: raw_copy(patterns, PatternSlot::On),
            pattern_start: raw_copy(patterns, PatternSlot::Start),
            pattern_stop: raw_copy(patterns, PatternSlot::Stop),
            phase: controller.phase().into(),
            cursor: u32::try_from(controller.cursor()).unwrap_or(u32::MAX),
            start_off,
            extended,
        }
    }

    /// Rebuilds the phase controller, filtering the raw patterns again.
    ///
    /// The cursor is not clamped to the re-filtered pattern.
    ///
    /// # Errors
    /// * `InvalidPhase` - `phase` does not name a phase
    pub fn controller(&self) -> Result<PhaseController<N>, RestoreError> {
        let phase = Phase::try_from(self.phase)?;
        let patterns = PatternStore::from_raw(
            self.pattern_start.clone(),
            self.pattern.clone(),
            self.pattern_stop.clone(),
        );
        let cursor = usize::try_from(self.cursor).unwrap_or(usize::MAX);

        Ok(PhaseController::from_parts(
            self.style, patterns, phase, cursor,
        ))
    }
}

fn raw_copy<const N: usize>(patterns: &PatternStore<N>, slot: PatternSlot) -> String<N> {
    let mut text = String::new();
    // Raw text in the store never exceeds N bytes
    let _ = text.push_str(patterns.raw(slot));
    text
}
