#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Pattern`**: A validated run of style symbols (`'a'`..`'z'`), built by `Pattern::filter`
//! - **`PatternStore`**: Raw and filtered start, on and stop patterns of one light
//! - **`PhaseController`**: The state machine stepping a cursor through the active pattern
//! - **`LightStyle`**: A switchable light entity: spawn, use, tick, save and restore
//! - **`LightConfig`**: Builder and key/value ingestion for a light's setup fields
//! - **`StyleSink`**: Trait to implement for whatever consumes style values
//! - **`SavedState`**: The persisted fields of a light (serde)
//! - **`LightCollection`**: A deadline scheduler ticking many lights from one `TimeSource`
//!
//! A light never schedules itself. Operations return a `ServiceTiming`:
//! `Delay(d)` asks for a tick after `d` (always [`TICK_INTERVAL_MILLIS`]),
//! `Idle` lets the registration lapse.

pub use palette::Srgb;

pub mod time;
pub mod types;
pub mod pattern;
pub mod sink;
pub mod controller;
pub mod config;
pub mod persist;
pub mod light;
pub mod command;
pub mod collection;

pub use pattern::{Pattern, PatternSlot, PatternStore};
pub use types::{ConfigError, Phase, RestoreError, ServiceTiming, Symbol, UseType};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use sink::{LedStyleSink, RgbLed, StyleSink, StyleTable};
pub use controller::PhaseController;
pub use config::{LightConfig, LightConfigBuilder, LightKind, SF_EXTENDED_PATTERN, SF_START_OFF};
pub use persist::SavedState;
pub use light::LightStyle;
pub use command::{LightAction, LightCommand};
pub use collection::{CollectionError, LightCollection, LightId};

/// Delay between pattern ticks (10 ticks per second).
pub const TICK_INTERVAL_MILLIS: u64 = 100;

/// Style value of a light that is off.
pub const STYLE_OFF: &str = "a";

/// Style value of a light at normal brightness.
pub const STYLE_NORMAL: &str = "m";

/// Lowest style channel that can be switched at runtime.
pub const MIN_SWITCHABLE_STYLE: i32 = 32;
