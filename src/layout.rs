use crate::error::{Error, Result};

/// Serpentine (boustrophedon) wiring of a grid onto a single strand
///
/// Even rows run left to right, odd rows run right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerpentineLayout {
    width: usize,
    height: usize,
}

impl SerpentineLayout {
    /// Layout of a `width` x `height` grid
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Columns
    pub const fn width(self) -> usize {
        self.width
    }

    /// Rows
    pub const fn height(self) -> usize {
        self.height
    }

    /// Number of pixels covered by the layout
    pub const fn len(self) -> usize {
        self.width * self.height
    }

    /// Whether the grid has no cells
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Strand position of the pixel at (`col`, `row`)
    pub fn map(self, col: usize, row: usize) -> Result<usize> {
        if col >= self.width || row >= self.height {
            return Err(Error::InvalidCoordinate { x: col, y: row });
        }
        Ok(self.map_unchecked(col, row))
    }

    /// Strand position without the bounds check
    ///
    /// The caller guarantees `col < width` and `row < height`.
    #[inline]
    pub(crate) const fn map_unchecked(self, col: usize, row: usize) -> usize {
        if row % 2 == 0 {
            row * self.width + col
        } else {
            (row + 1) * self.width - 1 - col
        }
    }
}
