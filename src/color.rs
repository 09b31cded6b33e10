use std::fmt;

use palette::{named, Srgb, Srgba};
use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, Result};

// ---------------------------------------------------------------------------
// Color – 8-bit RGBA
// ---------------------------------------------------------------------------

/// An 8-bit RGBA colour. Alpha is interpolated like the other channels and
/// otherwise passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channel-wise linear interpolation, `t` in [0, 1], rounded to nearest.
    fn lerp(self, other: Color, t: f64) -> Color {
        let channel = |a: u8, b: u8| -> u8 {
            let (a, b) = (a as f64, b as f64);
            (a + t * (b - a)).round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Color::rgb(c.red, c.green, c.blue)
    }
}

impl From<Srgba<u8>> for Color {
    fn from(c: Srgba<u8>) -> Self {
        Color::rgba(c.red, c.green, c.blue, c.alpha)
    }
}

impl From<Color> for Srgba<u8> {
    fn from(c: Color) -> Self {
        Srgba::new(c.r, c.g, c.b, c.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Presets offered for the gradient endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorPreset {
    Red,
    Green,
    Blue,
}

impl ColorPreset {
    pub const ALL: [ColorPreset; 3] = [ColorPreset::Red, ColorPreset::Green, ColorPreset::Blue];

    pub fn color(self) -> Color {
        match self {
            ColorPreset::Red => named::RED.into(),
            // CSS "green" is only half intensity; lime is pure green.
            ColorPreset::Green => named::LIME.into(),
            ColorPreset::Blue => named::BLUE.into(),
        }
    }
}

impl fmt::Display for ColorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorPreset::Red => "Red",
            ColorPreset::Green => "Green",
            ColorPreset::Blue => "Blue",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// ColorChoices – user-editable colour list behind the Low / Mid / High pickers
// ---------------------------------------------------------------------------

/// Fewest colours a [`ColorChoices`] list may hold.
pub const MIN_CHOICES: usize = 2;

/// The colours offered for the gradient, with the current low, optional mid
/// and high picks. Every pick is always a member of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorChoices {
    colors: Vec<Color>,
    low: Color,
    mid: Option<Color>,
    high: Color,
}

impl Default for ColorChoices {
    fn default() -> Self {
        let colors = ColorPreset::ALL.iter().map(|p| p.color()).collect();
        Self {
            colors,
            low: ColorPreset::Green.color(),
            mid: None,
            high: ColorPreset::Red.color(),
        }
    }
}

impl ColorChoices {
    /// Offer `colors`, appending `low` and `high` when they are missing.
    pub fn new(colors: Vec<Color>, low: Color, high: Color) -> Result<Self> {
        let mut colors = dedup(colors);
        for c in [low, high] {
            if !colors.contains(&c) {
                colors.push(c);
            }
        }
        if colors.len() < MIN_CHOICES {
            return Err(too_few(colors.len()));
        }
        Ok(Self {
            colors,
            low,
            mid: None,
            high,
        })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn low(&self) -> Color {
        self.low
    }

    pub fn mid(&self) -> Option<Color> {
        self.mid
    }

    pub fn high(&self) -> Color {
        self.high
    }

    pub fn select_low(&mut self, color: Color) -> Result<()> {
        self.low = self.member(color)?;
        Ok(())
    }

    /// `None` switches back to a two-colour gradient.
    pub fn select_mid(&mut self, color: Option<Color>) -> Result<()> {
        self.mid = color.map(|c| self.member(c)).transpose()?;
        Ok(())
    }

    pub fn select_high(&mut self, color: Color) -> Result<()> {
        self.high = self.member(color)?;
        Ok(())
    }

    /// Replace the list. Picks that survive the edit are kept; a low or high
    /// pick that was removed falls back to the first colour, a removed mid
    /// pick is cleared. Returns `true` when any pick changed.
    pub fn set_colors(&mut self, colors: Vec<Color>) -> Result<bool> {
        let colors = dedup(colors);
        if colors.len() < MIN_CHOICES {
            return Err(too_few(colors.len()));
        }
        let first = colors[0];
        let before = (self.low, self.mid, self.high);

        if !colors.contains(&self.low) {
            self.low = first;
        }
        if !colors.contains(&self.high) {
            self.high = first;
        }
        if self.mid.is_some_and(|m| !colors.contains(&m)) {
            self.mid = None;
        }
        self.colors = colors;
        Ok((self.low, self.mid, self.high) != before)
    }

    fn member(&self, color: Color) -> Result<Color> {
        if self.colors.contains(&color) {
            Ok(color)
        } else {
            Err(HeatmapError::invalid_input(format!("colour {color} is not in the list")))
        }
    }
}

fn dedup(colors: Vec<Color>) -> Vec<Color> {
    let mut out: Vec<Color> = Vec::with_capacity(colors.len());
    for c in colors {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

fn too_few(n: usize) -> HeatmapError {
    HeatmapError::invalid_input(format!("at least {MIN_CHOICES} distinct colours needed, got {n}"))
}

// ---------------------------------------------------------------------------
// ColorRange – value range mapped onto a 2- or 3-colour gradient
// ---------------------------------------------------------------------------

/// A numeric `[low, high]` range with the colours at its ends and an optional
/// colour at its midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    low: f64,
    high: f64,
    low_color: Color,
    mid_color: Option<Color>,
    high_color: Color,
}

impl ColorRange {
    /// Two-colour range. Fails if `low > high` or either bound is not finite.
    pub fn new(low: f64, high: f64, low_color: Color, high_color: Color) -> Result<Self> {
        if !(low.is_finite() && high.is_finite()) || low > high {
            return Err(HeatmapError::InvalidRange { low, high });
        }
        Ok(Self {
            low,
            high,
            low_color,
            mid_color: None,
            high_color,
        })
    }

    /// Three-colour range with `mid_color` at `(low + high) / 2`.
    pub fn three_color(
        low: f64,
        high: f64,
        low_color: Color,
        mid_color: Color,
        high_color: Color,
    ) -> Result<Self> {
        Ok(Self::new(low, high, low_color, high_color)?.with_mid_color(Some(mid_color)))
    }

    pub fn with_mid_color(mut self, mid_color: Option<Color>) -> Self {
        self.mid_color = mid_color;
        self
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn midpoint(&self) -> f64 {
        self.low / 2.0 + self.high / 2.0
    }

    pub fn low_color(&self) -> Color {
        self.low_color
    }

    pub fn mid_color(&self) -> Option<Color> {
        self.mid_color
    }

    pub fn high_color(&self) -> Color {
        self.high_color
    }

    /// Colour of `value`. Values outside the range take the nearest end
    /// colour; NaN takes the low colour; a zero-width range always yields
    /// the high colour.
    pub fn color_for(&self, value: f64) -> Color {
        if self.low == self.high {
            return self.high_color;
        }
        if value.is_nan() {
            return self.low_color;
        }

        match self.mid_color {
            None => {
                let t = fraction(value, self.low, self.high);
                self.low_color.lerp(self.high_color, t)
            }
            Some(mid_color) => {
                let mid = self.midpoint();
                if value < mid {
                    self.low_color.lerp(mid_color, fraction(value, self.low, mid))
                } else {
                    mid_color.lerp(self.high_color, fraction(value, mid, self.high))
                }
            }
        }
    }
}

/// Free-function form of [`ColorRange::color_for`].
pub fn color_for(value: f64, range: &ColorRange) -> Color {
    range.color_for(value)
}

/// Position of `value` within `[from, to]`, clamped to [0, 1].
///
/// Works on halves so that ranges as wide as `[-f64::MAX, f64::MAX]` do not
/// overflow.
fn fraction(value: f64, from: f64, to: f64) -> f64 {
    if to <= from {
        return 1.0;
    }
    let t = (value / 2.0 - from / 2.0) / (to / 2.0 - from / 2.0);
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, 1.0)
}
