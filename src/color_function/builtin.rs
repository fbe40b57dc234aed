//! Shipped color functions
//!
//! Most variants offset the waveform step by a distance measured in cells,
//! one cell being worth `fade_steps` steps. The symmetric variants fold the
//! coordinates about the grid midpoint first.

use super::{ColorFunction, PatternContext};
use crate::color::Channel;

const NAME_OFF: &str = "off";
const NAME_SWEEP_X: &str = "sweep_x";
const NAME_SWEEP_Y: &str = "sweep_y";
const NAME_DIAGONAL_RISING: &str = "diagonal_rising";
const NAME_DIAGONAL_FALLING: &str = "diagonal_falling";
const NAME_DIAMOND: &str = "diamond";
const NAME_SQUARE: &str = "square";
const NAME_CIRCLE: &str = "circle";
const NAME_UNIFORM: &str = "uniform";
const NAME_LINE_Y: &str = "line_y";
const NAME_LINE_X: &str = "line_x";

/// Color functions shipped with the engine, in registration order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BuiltinFunction {
    /// Constant zero
    Off = 0,
    /// Wave travelling along the x axis
    SweepX = 1,
    /// Wave travelling along the y axis
    SweepY = 2,
    /// Wave along the bottom-left to top-right diagonal
    DiagonalRising = 3,
    /// Wave along the top-left to bottom-right diagonal
    DiagonalFalling = 4,
    /// Concentric diamonds around the center
    Diamond = 5,
    /// Concentric squares around the center
    Square = 6,
    /// Concentric rings around the center
    Circle = 7,
    /// Whole grid fades in unison
    Uniform = 8,
    /// Full-brightness bar moving along the x axis
    LineY = 9,
    /// Full-brightness bar moving along the y axis
    LineX = 10,
}

impl BuiltinFunction {
    pub const ALL: [Self; 11] = [
        Self::Off,
        Self::SweepX,
        Self::SweepY,
        Self::DiagonalRising,
        Self::DiagonalFalling,
        Self::Diamond,
        Self::Square,
        Self::Circle,
        Self::Uniform,
        Self::LineY,
        Self::LineX,
    ];

    /// Function with the raw id `value`
    pub fn from_raw(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Display name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => NAME_OFF,
            Self::SweepX => NAME_SWEEP_X,
            Self::SweepY => NAME_SWEEP_Y,
            Self::DiagonalRising => NAME_DIAGONAL_RISING,
            Self::DiagonalFalling => NAME_DIAGONAL_FALLING,
            Self::Diamond => NAME_DIAMOND,
            Self::Square => NAME_SQUARE,
            Self::Circle => NAME_CIRCLE,
            Self::Uniform => NAME_UNIFORM,
            Self::LineY => NAME_LINE_Y,
            Self::LineX => NAME_LINE_X,
        }
    }

    /// Function by display name
    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.as_str() == s)
    }

    /// Human readable name used in the registry
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::SweepX => "Fade along x axis",
            Self::SweepY => "Fade along y axis",
            Self::DiagonalRising => "Diagonal (bottom left - top right)",
            Self::DiagonalFalling => "Diagonal (top left - bottom right)",
            Self::Diamond => "Diamond",
            Self::Square => "Square",
            Self::Circle => "Circle",
            Self::Uniform => "Fade whole area",
            Self::LineY => "Line on y axis",
            Self::LineX => "Line on x axis",
        }
    }
}

/// Distance from the nearest edge, mirrored about the midpoint
const fn fold(coord: i64, extent: i64) -> i64 {
    if coord < extent / 2 { coord } else { extent - coord - 1 }
}

/// Distance from the center line, 0 for the two middle cells
const fn center_offset(coord: i64, extent: i64) -> i64 {
    let half = extent / 2;
    if coord < half { half - coord - 1 } else { coord - half }
}

/// Lit while the step sits in the first cell of either half of the period
fn line(ctx: &PatternContext<'_>, offset: i64, step: i64) -> u8 {
    let cell = ctx.cell_steps();
    #[allow(clippy::cast_possible_wrap)]
    let half = ctx.waveform.half_period() as i64;
    #[allow(clippy::cast_possible_wrap)]
    let v = ctx.waveform.wrap(offset * cell + step) as i64;
    if v < cell || (half..half + cell).contains(&v) { 255 } else { 0 }
}

impl ColorFunction for BuiltinFunction {
    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss
    )]
    fn compute(&self, ctx: &PatternContext<'_>, channel: Channel, x: usize, y: usize, step: i64) -> u8 {
        let (x, y) = (x as i64, y as i64);
        let (width, height) = (ctx.width as i64, ctx.height as i64);
        let cell = ctx.cell_steps();
        let sample = |offset: i64| ctx.waveform.sample(channel, offset * cell + step);

        match self {
            Self::Off => 0,
            Self::SweepX => sample(x),
            Self::SweepY => sample(y),
            Self::DiagonalRising => sample(x + y),
            Self::DiagonalFalling => sample(height + x - 1 - y),
            Self::Diamond => sample(fold(x, width) + fold(y, height)),
            Self::Square => sample(2 * fold(x, width).min(fold(y, height))),
            Self::Circle => {
                let dx = center_offset(x, width) as f64;
                let dy = center_offset(y, height) as f64;
                let radius = libm::round(libm::sqrt(dx * dx + dy * dy)) as i64;
                sample(2 * radius)
            }
            Self::Uniform => sample(0),
            Self::LineY => line(ctx, x, step),
            Self::LineX => line(ctx, y, step),
        }
    }
}
