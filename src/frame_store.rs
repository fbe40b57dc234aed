//! Multi-image frame store
//!
//! Holds every image of a grid together with the current-image pointer and
//! the crossfade step, and turns them into strand-ordered output bytes.
//! The store itself is not synchronized; [`crate::LedGrid`] wraps it for use
//! across threads.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use crate::color::{CHANNELS, Channel, Palette, Rgb, rgb_from_u32, rgb_to_u32};
use crate::error::{Error, Result};
use crate::image::{Image, ShiftDirection};
use crate::layout::SerpentineLayout;

/// Largest crossfade step (render the next image verbatim)
pub const MAX_FADE_STEP: u8 = 100;

/// Set of equally sized images plus the crossfade state
#[derive(Debug, Clone)]
pub struct FrameStore {
    layout: SerpentineLayout,
    images: Vec<Image>,
    current: usize,
    fade_step: u8,
    palette: Option<Arc<Palette>>,
}

impl FrameStore {
    /// Create a store holding one black image
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            #[allow(clippy::cast_precision_loss)]
            return Err(Error::OutOfDomain {
                name: "grid dimension",
                value: width.min(height) as f64,
            });
        }
        Ok(Self {
            layout: SerpentineLayout::new(width, height),
            images: vec![Image::blank(width, height)],
            current: 0,
            fade_step: 0,
            palette: None,
        })
    }

    /// Columns
    pub const fn width(&self) -> usize {
        self.layout.width()
    }

    /// Rows
    pub const fn height(&self) -> usize {
        self.layout.height()
    }

    /// Serpentine layout used by render
    pub const fn layout(&self) -> SerpentineLayout {
        self.layout
    }

    /// Number of allocated images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Index of the image being shown
    pub const fn current_image(&self) -> usize {
        self.current
    }

    /// Crossfade step towards the next image, `0..=100`
    pub const fn fade_step(&self) -> u8 {
        self.fade_step
    }

    /// Index of the crossfade partner of the current image
    pub fn next_image(&self) -> usize {
        (self.current + 1) % self.images.len()
    }

    /// Image at `index`
    pub fn image(&self, index: usize) -> Result<&Image> {
        self.images.get(index).ok_or(Error::InvalidImage(index))
    }

    /// Mutable image at `index`
    pub fn image_mut(&mut self, index: usize) -> Result<&mut Image> {
        self.images.get_mut(index).ok_or(Error::InvalidImage(index))
    }

    /// Image being shown
    pub fn current(&self) -> &Image {
        &self.images[self.current]
    }

    /// Mutable image being shown
    pub fn current_mut(&mut self) -> &mut Image {
        &mut self.images[self.current]
    }

    /// Append a black image and return its index
    pub fn new_image(&mut self) -> usize {
        self.images.push(Image::blank(self.width(), self.height()));
        let index = self.images.len() - 1;
        debug!("allocated image {index}");
        index
    }

    /// Make `index` the current image and set the crossfade step
    ///
    /// Unknown indices are ignored. Fade steps above 100 are clamped.
    pub fn select_image(&mut self, index: usize, fade_step: u8) {
        if index >= self.images.len() {
            warn!("ignoring selection of missing image {index}");
            return;
        }
        self.current = index;
        self.fade_step = fade_step.min(MAX_FADE_STEP);
    }

    /// Share a palette with this store for indexed color writes
    pub fn set_palette(&mut self, palette: Arc<Palette>) {
        self.palette = Some(palette);
    }

    /// Palette used by palette color writes, if any
    pub fn palette(&self) -> Option<&Arc<Palette>> {
        self.palette.as_ref()
    }

    fn target_mut(&mut self, image: Option<usize>) -> Result<&mut Image> {
        match image {
            Some(index) => self.image_mut(index),
            None => Ok(self.current_mut()),
        }
    }

    fn target(&self, image: Option<usize>) -> Result<&Image> {
        match image {
            Some(index) => self.image(index),
            None => Ok(self.current()),
        }
    }

    /// Set one channel of a pixel in `image`, or in the current image
    pub fn set_pixel(
        &mut self,
        image: Option<usize>,
        x: usize,
        y: usize,
        channel: Channel,
        value: u8,
    ) -> Result<()> {
        self.target_mut(image)?.set_channel(x, y, channel, value)
    }

    /// Set a pixel of the current image
    pub fn set_color(&mut self, x: usize, y: usize, color: Rgb) -> Result<()> {
        self.current_mut().set_pixel(x, y, color)
    }

    /// Set a pixel of the current image from a packed 0xRRGGBB value
    pub fn set_color_int(&mut self, x: usize, y: usize, value: u32) -> Result<()> {
        self.set_color(x, y, rgb_from_u32(value))
    }

    /// Set a pixel of the current image from the attached palette
    pub fn set_palette_color(&mut self, x: usize, y: usize, position: usize) -> Result<()> {
        let color = self
            .palette
            .as_ref()
            .ok_or(Error::MissingPalette)?
            .get(position)?;
        self.set_color(x, y, color)
    }

    /// Paint the whole current image
    pub fn set_all(&mut self, color: Rgb) {
        self.current_mut().fill(color);
    }

    /// Set one channel of every pixel in the current image
    pub fn set_all_channel(&mut self, channel: Channel, value: u8) {
        self.current_mut().fill_channel(channel, value);
    }

    /// Pixel of `image`, or of the current image
    pub fn pixel(&self, image: Option<usize>, x: usize, y: usize) -> Result<Rgb> {
        self.target(image)?.pixel(x, y)
    }

    /// One channel of a pixel in `image`, or in the current image
    pub fn channel(&self, image: Option<usize>, x: usize, y: usize, channel: Channel) -> Result<u8> {
        self.target(image)?.channel(x, y, channel)
    }

    /// Packed 0xRRGGBB value of a pixel in the current image
    pub fn color_int(&self, x: usize, y: usize) -> Result<u32> {
        self.current().pixel(x, y).map(rgb_to_u32)
    }

    /// Zero the current image
    pub fn clear(&mut self) {
        self.current_mut().clear();
    }

    /// Shift the current image one cell
    pub fn shift(&mut self, direction: ShiftDirection, wrap: bool) {
        self.current_mut().shift(direction, wrap);
    }

    /// Blur the current image into the image after it
    ///
    /// A new image is appended when the current one is the last. Returns the
    /// index written to.
    pub fn blur(&mut self) -> usize {
        let target = self.current + 1;
        if target == self.images.len() {
            self.new_image();
        }
        let (head, tail) = self.images.split_at_mut(target);
        head[self.current].blur_into(&mut tail[0]);
        target
    }

    /// Length in bytes of a rendered frame
    pub const fn frame_len(&self) -> usize {
        self.layout.len() * CHANNELS
    }

    /// Render the crossfaded current image in strand order
    pub fn render(&self) -> Vec<u8> {
        let mut frame = vec![0; self.frame_len()];
        self.render_into(&mut frame);
        frame
    }

    /// Render into `frame`, which must hold [`FrameStore::frame_len`] bytes
    pub fn render_into(&self, frame: &mut [u8]) {
        debug_assert_eq!(frame.len(), self.frame_len());
        let current = self.current();
        let next = &self.images[self.next_image()];
        let width = self.width();
        for y in 0..self.height() {
            for x in 0..width {
                let source = (y * width + x) * CHANNELS;
                let target = self.layout.map_unchecked(x, y) * CHANNELS;
                for channel in 0..CHANNELS {
                    frame[target + channel] = if self.fade_step == 0 {
                        current.as_bytes()[source + channel]
                    } else {
                        current.blend_channel(next, source + channel, self.fade_step)
                    };
                }
            }
        }
    }

    /// Parse an image from `reader` into `target`, or into a new image
    ///
    /// Nothing is allocated or overwritten when parsing fails.
    pub fn load_image<R: Read>(&mut self, reader: R, target: Option<usize>) -> Result<usize> {
        if let Some(index) = target {
            self.image(index)?;
        }
        let image = Image::read_text(BufReader::new(reader), self.width(), self.height())
            .inspect_err(|err| warn!("image load failed: {err}"))?;
        let index = match target {
            Some(index) => index,
            None => self.new_image(),
        };
        self.images[index] = image;
        Ok(index)
    }

    /// Write `index`, or the current image, to `writer`
    pub fn save_image<W: Write>(&self, writer: W, index: Option<usize>) -> Result<usize> {
        let index = index.unwrap_or(self.current);
        self.image(index)?.write_text(writer)?;
        Ok(index)
    }

    /// Load an image file into `target`, or a new image
    pub fn load_image_file<P: AsRef<Path>>(&mut self, path: P, target: Option<usize>) -> Result<usize> {
        let file = File::open(path)?;
        self.load_image(file, target)
    }

    /// Save image `index`, or the current one, to a file; returns the index saved
    pub fn save_image_file<P: AsRef<Path>>(&self, path: P, index: Option<usize>) -> Result<usize> {
        self.image(index.unwrap_or(self.current))?;
        let file = File::create(path)?;
        self.save_image(BufWriter::new(file), index)
    }
}
