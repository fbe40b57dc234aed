//! Crate error type
//!
//! Contract violations (bad coordinates, channels, out-of-domain parameters)
//! are kept apart from recoverable resource failures so callers can tell a
//! bug from a missing file.

use core::fmt;
use std::io;

use crate::output::TransmitError;

/// Errors produced by the grid engine
#[derive(Debug)]
pub enum Error {
    /// Coordinate outside the grid
    InvalidCoordinate { x: usize, y: usize },
    /// Channel index other than 0 (red), 1 (green) or 2 (blue)
    InvalidChannel(usize),
    /// Numeric parameter outside its allowed range
    OutOfDomain { name: &'static str, value: f64 },
    /// Image index that was never allocated
    InvalidImage(usize),
    /// Color function index not present in the registry
    InvalidColorFunction(usize),
    /// Palette lookup without an attached palette
    MissingPalette,
    /// File could not be opened, read or written
    Io(io::Error),
    /// Malformed image or color map text
    Format { line: usize, message: String },
    /// Image file dimensions differ from the grid
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Output sink refused the frame
    Transmit(TransmitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate { x, y } => write!(f, "coordinate ({x}, {y}) is outside the grid"),
            Self::InvalidChannel(channel) => write!(f, "invalid color channel {channel}"),
            Self::OutOfDomain { name, value } => write!(f, "{name} out of domain: {value}"),
            Self::InvalidImage(index) => write!(f, "image {index} does not exist"),
            Self::InvalidColorFunction(index) => write!(f, "color function {index} is not registered"),
            Self::MissingPalette => write!(f, "no palette attached"),
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Format { line, message } => write!(f, "format error on line {line}: {message}"),
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "image is {}x{}, grid is {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::Transmit(err) => write!(f, "transmission failed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Transmit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<TransmitError> for Error {
    fn from(err: TransmitError) -> Self {
        Self::Transmit(err)
    }
}

impl Error {
    /// Returns true for errors caused by invalid caller input
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate { .. }
                | Self::InvalidChannel(_)
                | Self::OutOfDomain { .. }
                | Self::InvalidImage(_)
                | Self::InvalidColorFunction(_)
                | Self::MissingPalette
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, Error>;
