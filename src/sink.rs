//! Style output sinks.
//!
//! A light never writes to a global style table directly. It owns a
//! [`StyleSink`] handle and every style change goes through it.

use crate::types::Symbol;
use core::cell::RefCell;
use heapless::String;
use palette::Srgb;

/// Receives light style values.
///
/// `style` is the style channel number. `value` is a string of symbols; the
/// phase controller always writes a single symbol, but static patterns from
/// legacy lights are written whole.
pub trait StyleSink {
    /// Sets the current value of the style channel.
    fn write(&mut self, style: i32, value: &str);
}

impl<T: StyleSink + ?Sized> StyleSink for &mut T {
    fn write(&mut self, style: i32, value: &str) {
        (**self).write(style, value);
    }
}

/// Lets several lights share one sink on a single thread.
impl<T: StyleSink> StyleSink for &RefCell<T> {
    fn write(&mut self, style: i32, value: &str) {
        self.borrow_mut().write(style, value);
    }
}

/// Fixed-size table of style channel values.
///
/// Writes to channels outside `0..CHANNELS` are dropped, and values longer
/// than `LEN` are truncated to `LEN` bytes.
///
/// # Type Parameters
/// * `CHANNELS` - Number of style channels
/// * `LEN` - Maximum length of one channel value
#[derive(Debug, Clone)]
pub struct StyleTable<const CHANNELS: usize, const LEN: usize> {
    values: [String<LEN>; CHANNELS],
}

impl<const CHANNELS: usize, const LEN: usize> StyleTable<CHANNELS, LEN> {
    /// Creates a table with every channel empty.
    pub fn new() -> Self {
        Self {
            values: core::array::from_fn(|_| String::new()),
        }
    }

    /// Returns the current value of `style`, or `None` if it is out of range.
    pub fn get(&self, style: i32) -> Option<&str> {
        let idx = usize::try_from(style).ok()?;
        self.values.get(idx).map(|value| value.as_str())
    }
}

impl<const CHANNELS: usize, const LEN: usize> Default for StyleTable<CHANNELS, LEN> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CHANNELS: usize, const LEN: usize> StyleSink for StyleTable<CHANNELS, LEN> {
    fn write(&mut self, style: i32, value: &str) {
        let Some(slot) = usize::try_from(style)
            .ok()
            .and_then(|idx| self.values.get_mut(idx))
        else {
            return;
        };

        slot.clear();
        for c in value.chars() {
            if slot.push(c).is_err() {
                break;
            }
        }
    }
}

/// Trait for abstracting RGB LED hardware.
///
/// Implement this for your LED hardware (GPIO, PWM, SPI, etc.) to let a
/// [`LedStyleSink`] render a light style on it.
pub trait RgbLed {
    /// Sets the LED to the specified RGB color.
    ///
    /// Color components are in the range 0.0-1.0. Handle any hardware errors
    /// internally - this method cannot fail.
    fn set_color(&mut self, color: Srgb);
}

/// Renders one style channel onto an RGB LED.
///
/// The base color is scaled by the intensity of the first symbol written to
/// the channel and clamped to 1.0. Writes to other channels are ignored.
pub struct LedStyleSink<L: RgbLed> {
    led: L,
    style: i32,
    base: Srgb,
    current_color: Srgb,
}

impl<L: RgbLed> LedStyleSink<L> {
    /// Creates a sink for `style` and turns the LED off.
    pub fn new(mut led: L, style: i32, base: Srgb) -> Self {
        let off = Srgb::new(0.0, 0.0, 0.0);
        led.set_color(off);

        Self {
            led,
            style,
            base,
            current_color: off,
        }
    }

    /// Returns the color currently shown on the LED.
    pub fn current_color(&self) -> Srgb {
        self.current_color
    }

    /// Returns the LED.
    pub fn led(&self) -> &L {
        &self.led
    }

    fn scaled(&self, symbol: Symbol) -> Srgb {
        let k = symbol.intensity();
        Srgb::new(
            (self.base.red * k).min(1.0),
            (self.base.green * k).min(1.0),
            (self.base.blue * k).min(1.0),
        )
    }
}

impl<L: RgbLed> StyleSink for LedStyleSink<L> {
    fn write(&mut self, style: i32, value: &str) {
        if style != self.style {
            return;
        }

        let Some(symbol) = value.chars().find_map(Symbol::new) else {
            return;
        };

        let color = self.scaled(symbol);
        // Skip redundant hardware writes
        if color != self.current_color {
            self.led.set_color(color);
            self.current_color = color;
        }
    }
}
