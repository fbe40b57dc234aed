//! Gamma correction lookup tables
//!
//! Channel values are corrected through a 256-entry table right before
//! transmission. The table is either built from a power-law exponent or
//! read from a plain text color map.

use std::io::BufRead;

use log::debug;

use crate::error::{Error, Result};

/// Smallest accepted gamma exponent
pub const MIN_GAMMA: f32 = 1.0;
/// Largest accepted gamma exponent
pub const MAX_GAMMA: f32 = 3.0;

/// Per-channel correction table
#[derive(Debug, Clone, PartialEq)]
pub struct GammaLut {
    table: [u8; 256],
    exponent: Option<f32>,
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::identity()
    }
}

impl GammaLut {
    /// Table mapping every value to itself (gamma 1.0)
    pub fn identity() -> Self {
        let mut table = [0u8; 256];
        for (value, slot) in (0..=255u8).zip(table.iter_mut()) {
            *slot = value;
        }
        Self {
            table,
            exponent: Some(MIN_GAMMA),
        }
    }

    /// Build a power-law table for `exponent`
    pub fn new(exponent: f32) -> Result<Self> {
        let mut lut = Self::identity();
        lut.rebuild(exponent)?;
        Ok(lut)
    }

    /// Rebuild the table as `round(255 * (i / 255) ^ exponent)`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rebuild(&mut self, exponent: f32) -> Result<()> {
        if !(MIN_GAMMA..=MAX_GAMMA).contains(&exponent) {
            return Err(Error::OutOfDomain {
                name: "gamma exponent",
                value: f64::from(exponent),
            });
        }

        let exp = f64::from(exponent);
        for (i, slot) in self.table.iter_mut().enumerate() {
            let x = f64::from(i as u8) / 255.0;
            *slot = libm::round(255.0 * libm::pow(x, exp)).clamp(0.0, 255.0) as u8;
        }
        self.exponent = Some(exponent);
        debug!("gamma table rebuilt for exponent {exponent}");
        Ok(())
    }

    /// Read a table from `input output` pairs, one or more per line
    ///
    /// Inputs that never appear map to zero.
    pub fn from_map<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = [0u8; 256];
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            while let Some(input) = tokens.next() {
                let Some(output) = tokens.next() else {
                    return Err(map_error(number, "unpaired value"));
                };
                let input = parse_entry(input).ok_or_else(|| map_error(number, input))?;
                let output = parse_entry(output).ok_or_else(|| map_error(number, output))?;
                table[usize::from(input)] = output;
            }
        }
        Ok(Self {
            table,
            exponent: None,
        })
    }

    /// Exponent the table was built from, `None` for color maps
    pub const fn exponent(&self) -> Option<f32> {
        self.exponent
    }

    #[inline]
    pub const fn apply(&self, value: u8) -> u8 {
        self.table[value as usize]
    }

    /// Correct every byte of a rendered frame in place
    pub fn apply_in_place(&self, frame: &mut [u8]) {
        for value in frame {
            *value = self.apply(*value);
        }
    }

    /// Raw lookup table
    pub const fn table(&self) -> &[u8; 256] {
        &self.table
    }
}

fn parse_entry(token: &str) -> Option<u8> {
    token.parse().ok()
}

fn map_error(line: usize, token: &str) -> Error {
    Error::Format {
        line: line + 1,
        message: format!("invalid color map entry '{token}'"),
    }
}
