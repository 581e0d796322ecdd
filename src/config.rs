//! Light configuration: builder and key/value ingestion.

use crate::pattern::{PatternSlot, PatternStore};
use crate::types::ConfigError;
use heapless::String;

/// Spawn flag: the light begins switched off.
pub const SF_START_OFF: u32 = 1 << 0;

/// Spawn flag: animate through the start/on/stop patterns.
pub const SF_EXTENDED_PATTERN: u32 = 1 << 1;

/// Which flavour of light entity is being configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightKind {
    /// A point light.
    #[default]
    Plain,
    /// The map's environment light. Its `_light` key is captured verbatim
    /// for the host's sky color derivation.
    Environment,
}

/// Setup-time configuration for one light.
///
/// # Type Parameters
/// * `N` - Maximum pattern length
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LightConfig<const N: usize> {
    pub(crate) style: i32,
    pub(crate) patterns: PatternStore<N>,
    pub(crate) extended: bool,
    pub(crate) start_off: bool,
    pub(crate) kind: LightKind,
    sky_light: String<N>,
}

impl<const N: usize> LightConfig<N> {
    /// Creates a configuration builder.
    pub fn builder() -> LightConfigBuilder<N> {
        LightConfigBuilder::new()
    }

    /// Applies one key/value pair from a map entity definition.
    ///
    /// Returns `Ok(true)` if the key was consumed and `Ok(false)` if it
    /// belongs to someone else.
    ///
    /// # Errors
    /// * `InvalidStyle` - `style` is not an integer
    /// * `InvalidSpawnFlags` - `spawnflags` is not an unsigned integer
    /// * `ValueTooLong` - a pattern or `_light` value is longer than `N` bytes
    pub fn apply_key_value(&mut self, key: &str, value: &str) -> Result<bool, ConfigError> {
        match key {
            "style" => {
                self.style = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidStyle)?;
            }
            "pattern" => self.patterns.set(PatternSlot::On, value)?,
            "pattern_start" => self.patterns.set(PatternSlot::Start, value)?,
            "pattern_stop" => self.patterns.set(PatternSlot::Stop, value)?,
            "spawnflags" => {
                let flags: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidSpawnFlags)?;
                self.set_spawn_flags(flags);
            }
            "_light" if self.kind == LightKind::Environment => {
                self.sky_light.clear();
                self.sky_light
                    .push_str(value)
                    .map_err(|_| ConfigError::ValueTooLong {
                        len: value.len(),
                        capacity: N,
                    })?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn set_spawn_flags(&mut self, flags: u32) {
        self.start_off = flags & SF_START_OFF != 0;
        self.extended = flags & SF_EXTENDED_PATTERN != 0;
    }

    /// Returns the style channel.
    pub fn style(&self) -> i32 {
        self.style
    }

    /// Returns the configured patterns.
    pub fn patterns(&self) -> &PatternStore<N> {
        &self.patterns
    }

    /// Returns true if extended pattern mode was requested.
    pub fn extended(&self) -> bool {
        self.extended
    }

    /// Returns true if the light begins switched off.
    pub fn start_off(&self) -> bool {
        self.start_off
    }

    /// Returns the light flavour.
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// Returns the raw `_light` value of an environment light.
    ///
    /// `None` for plain lights or when the key was never given.
    pub fn sky_light(&self) -> Option<&str> {
        match self.kind {
            LightKind::Environment if !self.sky_light.is_empty() => Some(self.sky_light.as_str()),
            _ => None,
        }
    }
}

/// Builder for [`LightConfig`].
#[derive(Debug)]
pub struct LightConfigBuilder<const N: usize> {
    config: LightConfig<N>,
}

impl<const N: usize> LightConfigBuilder<N> {
    /// Creates a builder for an unconfigured style 0 light.
    pub fn new() -> Self {
        Self {
            config: LightConfig::default(),
        }
    }

    /// Sets the style channel.
    pub fn style(mut self, style: i32) -> Self {
        self.config.style = style;
        self
    }

    /// Sets the on pattern, also used as the static pattern.
    ///
    /// # Errors
    /// * `ValueTooLong` - `raw` is longer than `N` bytes
    pub fn pattern(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.config.patterns.set(PatternSlot::On, raw)?;
        Ok(self)
    }

    /// Sets the start pattern.
    ///
    /// # Errors
    /// * `ValueTooLong` - `raw` is longer than `N` bytes
    pub fn pattern_start(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.config.patterns.set(PatternSlot::Start, raw)?;
        Ok(self)
    }

    /// Sets the stop pattern.
    ///
    /// # Errors
    /// * `ValueTooLong` - `raw` is longer than `N` bytes
    pub fn pattern_stop(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.config.patterns.set(PatternSlot::Stop, raw)?;
        Ok(self)
    }

    /// Enables or disables extended pattern mode.
    pub fn extended(mut self, extended: bool) -> Self {
        self.config.extended = extended;
        self
    }

    /// Sets whether the light begins switched off.
    pub fn start_off(mut self, start_off: bool) -> Self {
        self.config.start_off = start_off;
        self
    }

    /// Sets both flags from a spawn flag bitfield.
    pub fn spawn_flags(mut self, flags: u32) -> Self {
        self.config.set_spawn_flags(flags);
        self
    }

    /// Sets the light flavour.
    pub fn kind(mut self, kind: LightKind) -> Self {
        self.config.kind = kind;
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> LightConfig<N> {
        self.config
    }
}

impl<const N: usize> Default for LightConfigBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
