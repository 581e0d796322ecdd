//! Switchable light entity.
//!
//! Provides [`LightStyle`], which ties a [`PhaseController`] to its output
//! sink and implements the spawn and use behaviour of a map light. Legacy
//! lights write a static value; extended-pattern lights loop their on
//! pattern. Start and stop patterns play on use in either mode.

use crate::command::LightAction;
use crate::config::LightConfig;
use crate::controller::PhaseController;
use crate::pattern::PatternSlot;
use crate::persist::SavedState;
use crate::sink::StyleSink;
use crate::time::TimeDuration;
use crate::types::{Phase, RestoreError, ServiceTiming, UseType};
use crate::{MIN_SWITCHABLE_STYLE, STYLE_NORMAL, STYLE_OFF, TICK_INTERVAL_MILLIS};
use core::marker::PhantomData;

/// A light driving one style channel.
///
/// Each light owns its sink handle and tracks its own on/off state. Ticks are
/// requested through the returned [`ServiceTiming`]; the host (or a
/// [`LightCollection`](crate::collection::LightCollection)) calls
/// [`tick`](Self::tick) when the delay has passed.
///
/// Lights on styles below [`MIN_SWITCHABLE_STYLE`] are baked into the map
/// and ignore spawn and use.
///
/// # Type Parameters
/// * `S` - Style sink
/// * `D` - Duration type used for tick delays
/// * `N` - Maximum pattern length
pub struct LightStyle<S: StyleSink, D: TimeDuration, const N: usize> {
    sink: S,
    controller: PhaseController<N>,
    extended: bool,
    start_off: bool,
    _duration: PhantomData<fn() -> D>,
}

impl<S: StyleSink, D: TimeDuration, const N: usize> LightStyle<S, D, N> {
    /// Creates a light from its configuration. Nothing is written until [`spawn`](Self::spawn).
    pub fn new(config: LightConfig<N>, sink: S) -> Self {
        Self {
            sink,
            controller: PhaseController::with_patterns(config.style, config.patterns),
            extended: config.extended,
            start_off: config.start_off,
            _duration: PhantomData,
        }
    }

    /// Rebuilds a saved light.
    ///
    /// Patterns are filtered again from the saved raw text; phase and cursor
    /// resume exactly where they were. Nothing is written to the sink. If
    /// [`service_timing`](Self::service_timing) is `Delay`, the host must
    /// re-arm the tick.
    ///
    /// # Errors
    /// * `InvalidPhase` - the saved phase does not name a phase
    pub fn restore(saved: &SavedState<N>, sink: S) -> Result<Self, RestoreError> {
        Ok(Self {
            sink,
            controller: saved.controller()?,
            extended: saved.extended,
            start_off: saved.start_off,
            _duration: PhantomData,
        })
    }

    /// Captures the persisted fields.
    pub fn save(&self) -> SavedState<N> {
        SavedState::capture(&self.controller, self.start_off, self.extended)
    }

    /// Dispatches a light action.
    ///
    /// Returns `None` when a use event is ignored, in which case any existing
    /// tick registration is left untouched.
    pub fn handle_action(&mut self, action: LightAction) -> Option<ServiceTiming<D>> {
        match action {
            LightAction::Spawn => Some(self.spawn()),
            LightAction::Use(use_type) => self.use_light(use_type),
        }
    }

    /// Writes the initial style value, or starts the pattern animation.
    pub fn spawn(&mut self) -> ServiceTiming<D> {
        if !self.is_switchable() {
            return ServiceTiming::Idle;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "style {=i32}: spawn (off: {=bool}, extended: {=bool})",
            self.style(),
            self.start_off,
            self.extended
        );

        let style = self.controller.style();
        let patterns = self.controller.patterns();

        if self.start_off {
            self.sink.write(style, STYLE_OFF);
            ServiceTiming::Idle
        } else if self.uses_extended_pattern() {
            if patterns.is_configured(PatternSlot::Start) {
                self.controller.enter_phase(Phase::Start, &mut self.sink)
            } else {
                self.controller.enter_phase(Phase::On, &mut self.sink)
            }
        } else if patterns.is_configured(PatternSlot::On) {
            self.sink.write(style, patterns.raw(PatternSlot::On));
            ServiceTiming::Idle
        } else {
            self.sink.write(style, STYLE_NORMAL);
            ServiceTiming::Idle
        }
    }

    /// Handles a use event from the host.
    ///
    /// `On`/`Off` events that match the current state are ignored and return
    /// `None`, as are all events on non-switchable styles.
    ///
    /// Switching on plays the start pattern whenever one is configured. The
    /// on pattern is only looped in extended mode; otherwise its raw text is
    /// written once. Switching off plays the stop pattern whenever one is
    /// configured.
    pub fn use_light(&mut self, use_type: UseType) -> Option<ServiceTiming<D>> {
        if !self.is_switchable() || !use_type.should_toggle(self.is_on()) {
            return None;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("style {=i32}: use {}", self.style(), use_type);

        let timing = if self.start_off {
            self.activate()
        } else {
            self.deactivate()
        };
        Some(timing)
    }

    fn activate(&mut self) -> ServiceTiming<D> {
        self.start_off = false;

        let patterns = self.controller.patterns();
        if self.extended || patterns.is_configured(PatternSlot::Start) {
            return self.controller.on_activate(&mut self.sink);
        }

        let style = self.controller.style();
        if patterns.is_configured(PatternSlot::On) {
            self.sink.write(style, patterns.raw(PatternSlot::On));
        } else {
            self.sink.write(style, STYLE_NORMAL);
        }
        self.controller.enter_phase(Phase::None, &mut self.sink)
    }

    // A configured stop pattern always plays, with or without extended mode.
    fn deactivate(&mut self) -> ServiceTiming<D> {
        self.start_off = true;
        self.controller.on_deactivate(&mut self.sink)
    }

    /// Advances the pattern animation by one tick.
    pub fn tick(&mut self) -> ServiceTiming<D> {
        self.controller.tick(&mut self.sink)
    }

    /// Returns the tick registration the light currently expects.
    pub fn service_timing(&self) -> ServiceTiming<D> {
        if self.controller.is_ticking() {
            ServiceTiming::Delay(D::from_millis(TICK_INTERVAL_MILLIS))
        } else {
            ServiceTiming::Idle
        }
    }

    /// Returns true if extended mode is enabled and there is something to animate.
    pub fn uses_extended_pattern(&self) -> bool {
        let patterns = self.controller.patterns();
        self.extended
            && (patterns.is_configured(PatternSlot::On)
                || patterns.is_configured(PatternSlot::Start))
    }

    /// Returns true if the style can be switched at runtime.
    pub fn is_switchable(&self) -> bool {
        self.controller.style() >= MIN_SWITCHABLE_STYLE
    }

    /// Returns true if the light is switched on.
    pub fn is_on(&self) -> bool {
        !self.start_off
    }

    /// Returns the style channel.
    pub fn style(&self) -> i32 {
        self.controller.style()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Returns the current cursor.
    pub fn cursor(&self) -> usize {
        self.controller.cursor()
    }

    /// Returns the phase controller.
    pub fn controller(&self) -> &PhaseController<N> {
        &self.controller
    }

    /// Returns the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
