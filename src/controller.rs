//! Phase state machine driving one style channel through its patterns.
//!
//! Provides [`PhaseController`], which owns a light's patterns, current
//! [`Phase`] and cursor, and decides on every tick which symbol to emit and
//! whether to move to the next phase.

use crate::pattern::{PatternSlot, PatternStore};
use crate::sink::StyleSink;
use crate::time::TimeDuration;
use crate::types::{ConfigError, Phase, ServiceTiming};
use crate::{STYLE_NORMAL, STYLE_OFF, TICK_INTERVAL_MILLIS};

/// Finite-state machine animating a style channel.
///
/// The controller never schedules anything itself. Every operation that can
/// change the tick registration returns a [`ServiceTiming`]: `Delay` means
/// "tick me again after this long", `Idle` means the registration lapses.
///
/// # Type Parameters
/// * `N` - Maximum pattern length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseController<const N: usize> {
    style: i32,
    patterns: PatternStore<N>,
    phase: Phase,
    cursor: usize,
}

impl<const N: usize> PhaseController<N> {
    /// Creates an inert controller for `style` with no patterns.
    pub fn new(style: i32) -> Self {
        Self::with_patterns(style, PatternStore::new())
    }

    /// Creates an inert controller for `style` using `patterns`.
    pub fn with_patterns(style: i32, patterns: PatternStore<N>) -> Self {
        Self {
            style,
            patterns,
            phase: Phase::None,
            cursor: 0,
        }
    }

    /// Rebuilds a controller with phase and cursor taken verbatim.
    ///
    /// The cursor is not checked against the pattern length; a cursor past
    /// the end finishes the phase on the next tick.
    pub(crate) fn from_parts(
        style: i32,
        patterns: PatternStore<N>,
        phase: Phase,
        cursor: usize,
    ) -> Self {
        Self {
            style,
            patterns,
            phase,
            cursor,
        }
    }

    /// Stores the raw text for one pattern slot.
    ///
    /// # Errors
    /// * `ValueTooLong` - `raw` is longer than `N` bytes
    pub fn set_pattern(&mut self, slot: PatternSlot, raw: &str) -> Result<(), ConfigError> {
        self.patterns.set(slot, raw)
    }

    /// Moves to `phase` and rewinds the cursor.
    ///
    /// Entering `Stopped` writes the off value once. Entering `None` or
    /// `Stopped` ends the tick registration; entering any other phase
    /// (re)arms it.
    pub fn enter_phase<D: TimeDuration>(
        &mut self,
        phase: Phase,
        sink: &mut impl StyleSink,
    ) -> ServiceTiming<D> {
        #[cfg(feature = "defmt")]
        defmt::debug!("style {=i32}: {} -> {}", self.style, self.phase, phase);

        self.phase = phase;
        self.cursor = 0;

        match phase {
            Phase::None => ServiceTiming::Idle,
            Phase::Stopped => {
                sink.write(self.style, STYLE_OFF);
                ServiceTiming::Idle
            }
            Phase::Start | Phase::On | Phase::Stop => {
                ServiceTiming::Delay(D::from_millis(TICK_INTERVAL_MILLIS))
            }
        }
    }

    /// Advances the animation by one tick.
    ///
    /// Emits the symbol under the cursor and steps forward, or, once the
    /// phase's pattern is exhausted, enters the successor phase without
    /// emitting. An empty pattern is exhausted on its first tick.
    ///
    /// A tick delivered while in `None` or `Stopped` does nothing.
    pub fn tick<D: TimeDuration>(&mut self, sink: &mut impl StyleSink) -> ServiceTiming<D> {
        if !self.phase.is_ticking() {
            return ServiceTiming::Idle;
        }

        let value = self
            .patterns
            .get(self.phase)
            .and_then(|pattern| pattern.value_at(self.cursor));

        match value {
            Some(value) => {
                sink.write(self.style, value);
                self.cursor += 1;
                ServiceTiming::Delay(D::from_millis(TICK_INTERVAL_MILLIS))
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("style {=i32}: {} exhausted", self.style, self.phase);

                self.enter_phase(self.phase.successor(), sink)
            }
        }
    }

    /// Switches the light on.
    ///
    /// Plays the start pattern if one is configured, otherwise loops the on
    /// pattern. With neither, writes normal brightness and stays inert.
    pub fn on_activate<D: TimeDuration>(&mut self, sink: &mut impl StyleSink) -> ServiceTiming<D> {
        if self.patterns.is_configured(PatternSlot::Start) {
            self.enter_phase(Phase::Start, sink)
        } else if self.patterns.is_configured(PatternSlot::On) {
            self.enter_phase(Phase::On, sink)
        } else {
            sink.write(self.style, STYLE_NORMAL);
            self.enter_phase(Phase::None, sink)
        }
    }

    /// Switches the light off.
    ///
    /// Plays the stop pattern if one is configured, otherwise writes the off
    /// value and goes inert.
    pub fn on_deactivate<D: TimeDuration>(
        &mut self,
        sink: &mut impl StyleSink,
    ) -> ServiceTiming<D> {
        if self.patterns.is_configured(PatternSlot::Stop) {
            self.enter_phase(Phase::Stop, sink)
        } else {
            sink.write(self.style, STYLE_OFF);
            self.enter_phase(Phase::None, sink)
        }
    }

    /// Returns the style channel this controller writes to.
    pub fn style(&self) -> i32 {
        self.style
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the index of the next symbol to emit.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the patterns.
    pub fn patterns(&self) -> &PatternStore<N> {
        &self.patterns
    }

    /// Returns true if a tick registration should be active.
    pub fn is_ticking(&self) -> bool {
        self.phase.is_ticking()
    }
}
