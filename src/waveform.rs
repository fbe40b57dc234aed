//! Periodic waveform tables ("color matrices")
//!
//! Each channel owns one period of a mirror-symmetric ramp of length
//! `2 * (size - 1) * fade_steps`. Color functions sample the tables with
//! arbitrary integer steps; sampling is always reduced into one period.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::color::{CHANNELS, Channel};
use crate::error::{Error, Result};

/// Smallest grid dimension a waveform can span
pub const MIN_WAVEFORM_SIZE: usize = 2;

/// Parameters a channel table was last built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub max_value: f64,
    pub exponent: f64,
}

/// Per-channel waveform tables
#[derive(Debug, Clone)]
pub struct WaveformTable {
    size: usize,
    fade_steps: usize,
    tables: [Vec<u8>; CHANNELS],
    params: [Option<WaveParams>; CHANNELS],
}

impl WaveformTable {
    /// Allocate all-zero tables for a grid of `size` cells per axis
    pub fn new(size: usize, fade_steps: usize) -> Result<Self> {
        if size < MIN_WAVEFORM_SIZE {
            #[allow(clippy::cast_precision_loss)]
            return Err(Error::OutOfDomain {
                name: "waveform size",
                value: size as f64,
            });
        }
        if fade_steps == 0 {
            return Err(Error::OutOfDomain {
                name: "fade steps",
                value: 0.0,
            });
        }
        let period = 2 * (size - 1) * fade_steps;
        Ok(Self {
            size,
            fade_steps,
            tables: core::array::from_fn(|_| vec![0; period]),
            params: [None; CHANNELS],
        })
    }

    /// Grid dimension the tables span
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Table entries per grid cell
    pub const fn fade_steps(&self) -> usize {
        self.fade_steps
    }

    /// Length of one full up-and-down cycle
    pub const fn period(&self) -> usize {
        2 * self.half_period()
    }

    /// Length of the rising half
    pub const fn half_period(&self) -> usize {
        (self.size - 1) * self.fade_steps
    }

    /// Parameters `channel` was last built from, if it was built
    pub const fn params(&self, channel: Channel) -> Option<WaveParams> {
        self.params[channel.index()]
    }

    /// Table of `channel`
    pub fn table(&self, channel: Channel) -> &[u8] {
        &self.tables[channel.index()]
    }

    /// Rebuild the table of `channel`
    ///
    /// The rising half holds `floor(256 / exponent^8 * 2^(x * (size - 1) - 1))`
    /// clamped to `[0, 255]`, with `x` the fraction of the half travelled.
    /// The falling half walks the same curve back down from its peak.
    /// `max_value` is recorded but does not shape the curve.
    #[allow(clippy::cast_precision_loss)]
    pub fn recalc(&mut self, channel: Channel, max_value: f64, exponent: f64) -> Result<()> {
        if !max_value.is_finite() || max_value <= 0.0 {
            return Err(Error::OutOfDomain {
                name: "waveform maximum",
                value: max_value,
            });
        }
        if !exponent.is_finite() || exponent < 1.0 {
            return Err(Error::OutOfDomain {
                name: "waveform exponent",
                value: exponent,
            });
        }

        let half = self.half_period();
        let span = (self.size - 1) as f64;
        let scale = 256.0 / libm::pow(exponent, 8.0);
        let ramp = |j: usize| {
            let x = j as f64 / half as f64;
            let value = libm::floor(scale * libm::pow(2.0, x * span - 1.0));
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                value.clamp(0.0, 255.0) as u8
            }
        };

        let table = &mut self.tables[channel.index()];
        for (i, slot) in table.iter_mut().enumerate() {
            let j = if i < half { i } else { 2 * half - i };
            *slot = ramp(j);
        }
        self.params[channel.index()] = Some(WaveParams { max_value, exponent });
        debug!(
            "{} waveform rebuilt (max {max_value}, exponent {exponent})",
            channel.as_str()
        );
        Ok(())
    }

    /// Reduce any step into `[0, period)`
    #[inline]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn wrap(&self, step: i64) -> usize {
        step.rem_euclid(self.period() as i64) as usize
    }

    /// Table value at `step`, for any step sign or magnitude
    #[inline]
    pub fn sample(&self, channel: Channel, step: i64) -> u8 {
        self.tables[channel.index()][self.wrap(step)]
    }

    /// Write the diagnostic dump: `size fade_steps`, then per channel a
    /// blank line and the values, `fade_steps` per line
    pub fn write_dump<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{} {}", self.size, self.fade_steps)?;
        for table in &self.tables {
            writeln!(writer)?;
            for (j, value) in table.iter().enumerate() {
                write!(writer, "{value:3} ")?;
                if (j + 1) % self.fade_steps == 0 {
                    writeln!(writer)?;
                }
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the diagnostic dump to a file
    pub fn write_dump_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_dump(BufWriter::new(file))
    }
}
