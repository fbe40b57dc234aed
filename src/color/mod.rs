mod palette;

pub use palette::{PALETTE_SIZE, Palette};
use smart_leds::RGB8;

use crate::error::{Error, Result};

pub type Rgb = RGB8;

/// Number of color channels per pixel
pub const CHANNELS: usize = 3;

/// Color channel of a pixel, in wire order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    /// All channels in wire order
    pub const ALL: [Self; CHANNELS] = [Self::Red, Self::Green, Self::Blue];

    /// Channel at `index`: 0 red, 1 green, 2 blue
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Self::Red),
            1 => Ok(Self::Green),
            2 => Ok(Self::Blue),
            _ => Err(Error::InvalidChannel(index)),
        }
    }

    /// Byte offset of the channel inside a pixel
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase channel name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }

    /// Read this channel from a color
    pub const fn of(self, color: Rgb) -> u8 {
        match self {
            Self::Red => color.r,
            Self::Green => color.g,
            Self::Blue => color.b,
        }
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack an RGB color into a u32 value (0xRRGGBB format)
pub const fn rgb_to_u32(color: Rgb) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}
