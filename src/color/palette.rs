//! Indexed color table
//!
//! A palette is built independently of any grid and can then be shared
//! with one or more grids, which look colors up by index.

use super::{Channel, Rgb, rgb_from_u32};
use crate::error::{Error, Result};

/// Number of entries in a palette
pub const PALETTE_SIZE: usize = 256;

/// 256-entry RGB lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// Create a palette with every entry black
    pub const fn new() -> Self {
        Self {
            colors: [Rgb { r: 0, g: 0, b: 0 }; PALETTE_SIZE],
        }
    }

    /// Color at `position`
    pub fn get(&self, position: usize) -> Result<Rgb> {
        self.colors
            .get(position)
            .copied()
            .ok_or_else(|| out_of_range(position))
    }

    /// Overwrite the color at `position`
    pub fn set_color(&mut self, position: usize, color: Rgb) -> Result<()> {
        let slot = self
            .colors
            .get_mut(position)
            .ok_or_else(|| out_of_range(position))?;
        *slot = color;
        Ok(())
    }

    /// Set one channel of an entry
    pub fn set_channel(&mut self, position: usize, channel: Channel, value: u8) -> Result<()> {
        let slot = self
            .colors
            .get_mut(position)
            .ok_or_else(|| out_of_range(position))?;
        match channel {
            Channel::Red => slot.r = value,
            Channel::Green => slot.g = value,
            Channel::Blue => slot.b = value,
        }
        Ok(())
    }

    /// Set an entry from a packed 0xRRGGBB value
    pub fn set_color_int(&mut self, position: usize, value: u32) -> Result<()> {
        self.set_color(position, rgb_from_u32(value))
    }

    /// Fill the entries strictly between `from` and `to` with a linear ramp
    ///
    /// Both anchors keep their colors. Intermediate channel values are
    /// truncated towards zero.
    pub fn interpolate(&mut self, from: usize, to: usize) -> Result<()> {
        if to >= PALETTE_SIZE {
            return Err(out_of_range(to));
        }
        if from >= to {
            #[allow(clippy::cast_precision_loss)]
            return Err(Error::OutOfDomain {
                name: "palette interpolation start",
                value: from as f64,
            });
        }

        let start = self.colors[from];
        let end = self.colors[to];
        let steps = to - from;
        for step in 1..steps {
            self.colors[from + step] = Rgb {
                r: ramp(start.r, end.r, step, steps),
                g: ramp(start.g, end.g, step, steps),
                b: ramp(start.b, end.b, step, steps),
            };
        }
        Ok(())
    }

    /// All palette entries
    pub fn colors(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.colors
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn ramp(start: u8, end: u8, step: usize, steps: usize) -> u8 {
    let delta = (f64::from(end) - f64::from(start)) / steps as f64;
    (f64::from(start) + step as f64 * delta) as u8
}

#[allow(clippy::cast_precision_loss)]
fn out_of_range(position: usize) -> Error {
    Error::OutOfDomain {
        name: "palette index",
        value: position as f64,
    }
}
