//! Shared test infrastructure for light-style integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use light_style::{
    LightConfig, LightStyle, StyleSink, TimeDuration, TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Sink
// ============================================================================

/// Mock sink that records every style write for testing
#[derive(Debug, Default)]
pub struct MockSink {
    writes: Vec<(i32, String)>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values written, in order
    pub fn values(&self) -> Vec<&str> {
        self.writes.iter().map(|(_, v)| v.as_str()).collect()
    }

    /// Last value written to `style`
    pub fn last(&self, style: i32) -> Option<&str> {
        self.writes
            .iter()
            .rev()
            .find(|(s, _)| *s == style)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl StyleSink for MockSink {
    fn write(&mut self, style: i32, value: &str) {
        self.writes.push((style, value.to_string()));
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub const STYLE: i32 = 32;

pub type TestLight = LightStyle<MockSink, TestDuration, 32>;

/// Extended-mode light on `STYLE` with the given raw patterns (empty = unset)
pub fn extended_light(start: &str, on: &str, stop: &str) -> TestLight {
    styled_light(STYLE, start, on, stop)
}

/// Extended-mode light on `style` with the given raw patterns (empty = unset)
pub fn styled_light(style: i32, start: &str, on: &str, stop: &str) -> TestLight {
    let mut config = LightConfig::<32>::builder().style(style).extended(true);
    if !start.is_empty() {
        config = config.pattern_start(start).unwrap();
    }
    if !on.is_empty() {
        config = config.pattern(on).unwrap();
    }
    if !stop.is_empty() {
        config = config.pattern_stop(stop).unwrap();
    }
    LightStyle::new(config.build(), MockSink::new())
}

/// Tick `light` `count` times
pub fn tick_n(light: &mut TestLight, count: usize) {
    for _ in 0..count {
        light.tick();
    }
}
