//! Output sinks
//!
//! Ready-made [`OutputSink`] implementations for byte-oriented devices (an
//! SPI device node, a file, a socket) and for `smart-leds` drivers.

use core::fmt;
use std::io::Write;

use smart_leds::SmartLedsWrite;

use crate::OutputSink;
use crate::color::{CHANNELS, Rgb};

/// Failure reported by an output sink
#[derive(Debug)]
pub enum TransmitError {
    /// The underlying writer failed
    Io(std::io::Error),
    /// The driver rejected the frame
    Driver(String),
}

impl fmt::Display for TransmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Driver(msg) => write!(f, "driver error: {msg}"),
        }
    }
}

impl std::error::Error for TransmitError {}

impl From<std::io::Error> for TransmitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Sink writing raw frame bytes to any [`Write`] implementation
///
/// Each frame is written in full and flushed.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a byte writer such as an SPI device node
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give the writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn transmit(&mut self, frame: &[u8]) -> Result<(), TransmitError> {
        self.writer.write_all(frame)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink forwarding frames to a `smart-leds` driver
pub struct SmartLedsSink<D> {
    driver: D,
}

impl<D> SmartLedsSink<D>
where
    D: SmartLedsWrite<Color = Rgb>,
    D::Error: fmt::Debug,
{
    /// Wrap a `smart-leds` driver
    pub const fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Direct access to the wrapped driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<D> OutputSink for SmartLedsSink<D>
where
    D: SmartLedsWrite<Color = Rgb>,
    D::Error: fmt::Debug,
{
    fn transmit(&mut self, frame: &[u8]) -> Result<(), TransmitError> {
        let pixels = frame.chunks_exact(CHANNELS).map(|c| Rgb::new(c[0], c[1], c[2]));
        self.driver
            .write(pixels)
            .map_err(|err| TransmitError::Driver(format!("{err:?}")))
    }
}
