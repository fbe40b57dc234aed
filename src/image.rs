//! Single RGB image buffer
//!
//! Pixels are stored contiguously in row-major order, three bytes per pixel,
//! addressed as `(y * width + x) * 3 + channel`.

use std::io::{BufRead, Write};

use crate::color::{CHANNELS, Channel, Rgb, rgb_from_u32};
use crate::error::{Error, Result};

/// Direction of a one-cell image shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Rectangular RGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Image {
    /// Create a black image; both dimensions must be at least 1
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            #[allow(clippy::cast_precision_loss)]
            return Err(Error::OutOfDomain {
                name: "image dimension",
                value: width.min(height) as f64,
            });
        }
        Ok(Self::blank(width, height))
    }

    /// Black image with dimensions already validated by the caller
    pub(crate) fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * CHANNELS],
        }
    }

    /// Columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Raw channel bytes in row-major order
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw channel bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::InvalidCoordinate { x, y });
        }
        Ok((y * self.width + x) * CHANNELS)
    }

    /// One channel of the pixel at `(x, y)`
    pub fn channel(&self, x: usize, y: usize, channel: Channel) -> Result<u8> {
        let offset = self.offset(x, y)?;
        Ok(self.data[offset + channel.index()])
    }

    /// Overwrite one channel of the pixel at `(x, y)`
    pub fn set_channel(&mut self, x: usize, y: usize, channel: Channel, value: u8) -> Result<()> {
        let offset = self.offset(x, y)?;
        self.data[offset + channel.index()] = value;
        Ok(())
    }

    /// Color of the pixel at `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> Result<Rgb> {
        let offset = self.offset(x, y)?;
        Ok(Rgb {
            r: self.data[offset],
            g: self.data[offset + 1],
            b: self.data[offset + 2],
        })
    }

    /// Overwrite the pixel at `(x, y)`
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) -> Result<()> {
        let offset = self.offset(x, y)?;
        self.data[offset..offset + CHANNELS].copy_from_slice(&[color.r, color.g, color.b]);
        Ok(())
    }

    /// Paint every pixel with one color
    pub fn fill(&mut self, color: Rgb) {
        for pixel in self.data.chunks_exact_mut(CHANNELS) {
            pixel.copy_from_slice(&[color.r, color.g, color.b]);
        }
    }

    /// Set one channel of every pixel
    pub fn fill_channel(&mut self, channel: Channel, value: u8) {
        for pixel in self.data.chunks_exact_mut(CHANNELS) {
            pixel[channel.index()] = value;
        }
    }

    /// Turn every pixel black
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Move every pixel one cell towards `direction`
    ///
    /// The row or column opening up on the trailing edge receives what fell
    /// off the leading edge when `wrap` is set, black otherwise.
    pub fn shift(&mut self, direction: ShiftDirection, wrap: bool) {
        if self.data.is_empty() {
            return;
        }
        let stride = self.width * CHANNELS;
        match direction {
            ShiftDirection::Up => {
                self.data.rotate_left(stride);
                if !wrap {
                    let len = self.data.len();
                    self.data[len - stride..].fill(0);
                }
            }
            ShiftDirection::Down => {
                self.data.rotate_right(stride);
                if !wrap {
                    self.data[..stride].fill(0);
                }
            }
            ShiftDirection::Left => {
                for row in self.data.chunks_exact_mut(stride) {
                    row.rotate_left(CHANNELS);
                    if !wrap {
                        row[stride - CHANNELS..].fill(0);
                    }
                }
            }
            ShiftDirection::Right => {
                for row in self.data.chunks_exact_mut(stride) {
                    row.rotate_right(CHANNELS);
                    if !wrap {
                        row[..CHANNELS].fill(0);
                    }
                }
            }
        }
    }

    /// Write a softened copy of this image into `target`
    ///
    /// Each channel becomes `(neighbors / 8 + value) / 2`, where `neighbors`
    /// sums the up to eight surrounding cells that lie inside the grid.
    pub(crate) fn blur_into(&self, target: &mut Self) {
        debug_assert_eq!((self.width, self.height), (target.width, target.height));
        for y in 0..self.height {
            for x in 0..self.width {
                let base = (y * self.width + x) * CHANNELS;
                for channel in 0..CHANNELS {
                    let mut sum = 0u32;
                    for ny in y.saturating_sub(1)..=(y + 1).min(self.height - 1) {
                        for nx in x.saturating_sub(1)..=(x + 1).min(self.width - 1) {
                            if nx == x && ny == y {
                                continue;
                            }
                            sum += u32::from(self.data[(ny * self.width + nx) * CHANNELS + channel]);
                        }
                    }
                    let value = (sum / 8 + u32::from(self.data[base + channel])) / 2;
                    #[allow(clippy::cast_possible_truncation)]
                    {
                        target.data[base + channel] = value as u8;
                    }
                }
            }
        }
    }

    /// Blend with `other`: `v1 + fade * (v2 - v1) / 100` per channel
    #[inline]
    pub(crate) fn blend_channel(&self, other: &Self, offset: usize, fade: u8) -> u8 {
        let v1 = i32::from(self.data[offset]);
        let v2 = i32::from(other.data[offset]);
        let value = v1 + i32::from(fade) * (v2 - v1) / 100;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            value.clamp(0, 255) as u8
        }
    }

    /// Serialize as text: `width height`, a blank line, then one line per
    /// row of lowercase `rrggbb` triples
    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer)?;
        for row in self.data.chunks_exact(self.width * CHANNELS) {
            for pixel in row.chunks_exact(CHANNELS) {
                write!(writer, "{:02x}{:02x}{:02x} ", pixel[0], pixel[1], pixel[2])?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse the text format produced by [`Image::write_text`]
    ///
    /// The header must match `width` and `height`. Pixel tokens may be
    /// spread over lines arbitrarily; anything after the last pixel is
    /// ignored.
    pub fn read_text<R: BufRead>(reader: R, width: usize, height: usize) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let (header_line, header) = loop {
            match lines.next() {
                Some((number, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break (number + 1, line);
                    }
                }
                None => return Err(format_error(1, "missing header")),
            }
        };
        let found = parse_header(&header).ok_or_else(|| format_error(header_line, "invalid header"))?;
        if found != (width, height) {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                found,
            });
        }

        let mut image = Self::new(width, height)?;
        let total = width * height;
        let mut filled = 0;
        let mut last_line = header_line;
        for (number, line) in lines {
            if filled == total {
                break;
            }
            let line = line?;
            last_line = number + 1;
            for token in line.split_whitespace() {
                if filled == total {
                    break;
                }
                let color = parse_triple(token)
                    .ok_or_else(|| format_error(last_line, &format!("invalid color '{token}'")))?;
                let offset = filled * CHANNELS;
                image.data[offset..offset + CHANNELS].copy_from_slice(&[color.r, color.g, color.b]);
                filled += 1;
            }
        }
        if filled < total {
            return Err(format_error(
                last_line,
                &format!("expected {total} pixels, found {filled}"),
            ));
        }
        Ok(image)
    }
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut tokens = line.split_whitespace();
    let width = tokens.next()?.parse().ok()?;
    let height = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((width, height))
}

fn parse_triple(token: &str) -> Option<Rgb> {
    if token.len() != 6 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(token, 16).ok().map(rgb_from_u32)
}

fn format_error(line: usize, message: &str) -> Error {
    Error::Format {
        line,
        message: message.to_owned(),
    }
}
