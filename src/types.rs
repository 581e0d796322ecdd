//! Core types shared by patterns, the phase controller and the light entity.

/// One brightness level of a light style, `'a'` (dark) through `'z'` (brightest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Symbol(u8);

impl Symbol {
    /// Fully dark.
    pub const OFF: Symbol = Symbol(b'a');

    /// Normal, unmodulated brightness.
    pub const NORMAL: Symbol = Symbol(b'm');

    /// Level of `NORMAL`, used as the unit for [`Symbol::intensity`].
    const NORMAL_LEVEL: f32 = 12.0;

    /// Creates a symbol from a character, or `None` if it is not `'a'..='z'`.
    #[inline]
    pub fn new(c: char) -> Option<Self> {
        if c.is_ascii_lowercase() {
            Some(Symbol(c as u8))
        } else {
            None
        }
    }

    /// Returns the symbol as a character.
    #[inline]
    pub fn as_char(self) -> char {
        self.0 as char
    }

    /// Returns the zero-based level, 0 for `'a'` up to 25 for `'z'`.
    #[inline]
    pub fn level(self) -> u8 {
        self.0 - b'a'
    }

    /// Brightness relative to normal: `'a'` is 0.0, `'m'` is 1.0, `'z'` is about 2.08.
    #[inline]
    pub fn intensity(self) -> f32 {
        f32::from(self.level()) / Self::NORMAL_LEVEL
    }
}

/// The leg of the pattern animation a light is currently in.
///
/// The discriminants are the persisted integer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// Not pattern driven. No tick is scheduled.
    #[default]
    None = 0,
    /// Playing the start pattern once.
    Start = 1,
    /// Looping the on pattern.
    On = 2,
    /// Playing the stop pattern once.
    Stop = 3,
    /// The stop pattern just finished; the style has been switched off.
    Stopped = 4,
}

impl Phase {
    /// Returns true for the phases that advance on every tick.
    #[inline]
    pub fn is_ticking(self) -> bool {
        matches!(self, Phase::Start | Phase::On | Phase::Stop)
    }

    /// Phase entered when the current phase's pattern is exhausted.
    ///
    /// Non-ticking phases have no successor and map to themselves.
    pub fn successor(self) -> Phase {
        match self {
            Phase::Start | Phase::On => Phase::On,
            Phase::Stop => Phase::Stopped,
            other => other,
        }
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase as u8
    }
}

impl TryFrom<u8> for Phase {
    type Error = RestoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Phase::None),
            1 => Ok(Phase::Start),
            2 => Ok(Phase::On),
            3 => Ok(Phase::Stop),
            4 => Ok(Phase::Stopped),
            other => Err(RestoreError::InvalidPhase(other)),
        }
    }
}

/// How a host "use" event asks the light to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UseType {
    /// Switch off; ignored when already off.
    Off,
    /// Switch on; ignored when already on.
    On,
    /// Always flips the current state.
    Set,
    /// Always flips the current state.
    Toggle,
}

impl UseType {
    /// Returns true if this event should flip a light whose current state is `is_on`.
    pub fn should_toggle(self, is_on: bool) -> bool {
        match self {
            UseType::On => !is_on,
            UseType::Off => is_on,
            UseType::Set | UseType::Toggle => true,
        }
    }
}

/// Scheduling request returned by every operation that may (re)arm the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Tick again after this delay.
    Delay(D),

    /// No tick registration. Nothing to do until the next use event.
    Idle,
}

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A text value exceeds its fixed capacity.
    ValueTooLong {
        /// Length of the rejected text in bytes.
        len: usize,
        /// Capacity in bytes.
        capacity: usize,
    },

    /// The `style` value is not an integer.
    InvalidStyle,

    /// The `spawnflags` value is not an unsigned integer.
    InvalidSpawnFlags,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ValueTooLong { len, capacity } => {
                write!(
                    f,
                    "value of {} bytes exceeds capacity of {}",
                    len, capacity
                )
            }
            ConfigError::InvalidStyle => write!(f, "style must be an integer"),
            ConfigError::InvalidSpawnFlags => {
                write!(f, "spawnflags must be an unsigned integer")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Errors raised while restoring a saved light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RestoreError {
    /// The saved phase integer does not name a phase.
    InvalidPhase(u8),
}

impl core::fmt::Display for RestoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RestoreError::InvalidPhase(value) => {
                write!(f, "saved phase {} is not a valid phase", value)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RestoreError {}
