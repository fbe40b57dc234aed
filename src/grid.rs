//! Thread-safe LED grid
//!
//! [`LedGrid`] owns a [`FrameStore`], the gamma table and the output sink.
//! A single-permit [`Semaphore`] serializes image selection against the
//! render-and-transmit sequence, so a frame never mixes the image index of
//! one selection with the fade step of another.
//!
//! Lock order is guard, then store, then output. Closures passed to
//! [`LedGrid::with_store`] and [`LedGrid::with_store_guarded`] must not call
//! back into the grid.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::OutputSink;
use crate::color::{CHANNELS, Channel, Palette, Rgb};
use crate::error::{Error, Result};
use crate::frame_store::FrameStore;
use crate::gamma::GammaLut;
use crate::guard::Semaphore;
use crate::image::ShiftDirection;

/// Grid geometry and output settings
#[derive(Debug, Clone, Copy)]
pub struct GridConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Gamma exponent in `[1.0, 3.0]`
    pub gamma: f32,
    /// Physical strand length in pixels; the grid occupies its tail.
    /// `None` means exactly `width * height`.
    pub strand_length: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            gamma: 1.0,
            strand_length: None,
        }
    }
}

struct Output<S> {
    sink: S,
    gamma: GammaLut,
}

/// Frame store, gamma table and sink behind the render guard
pub struct LedGrid<S: OutputSink> {
    guard: Semaphore,
    store: Mutex<FrameStore>,
    output: Mutex<Output<S>>,
    strand_length: usize,
}

impl<S: OutputSink> LedGrid<S> {
    /// Create a grid with one black image; fails on empty dimensions or a short strand
    pub fn new(config: &GridConfig, sink: S) -> Result<Self> {
        let store = FrameStore::new(config.width, config.height)?;
        let pixels = config.width * config.height;
        let strand_length = config.strand_length.unwrap_or(pixels);
        if strand_length < pixels {
            #[allow(clippy::cast_precision_loss)]
            return Err(Error::OutOfDomain {
                name: "strand length",
                value: strand_length as f64,
            });
        }
        Ok(Self {
            guard: Semaphore::new(1),
            store: Mutex::new(store),
            output: Mutex::new(Output {
                sink,
                gamma: GammaLut::new(config.gamma)?,
            }),
            strand_length,
        })
    }

    fn store(&self) -> MutexGuard<'_, FrameStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn output(&self) -> MutexGuard<'_, Output<S>> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on the frame store without taking the render guard
    ///
    /// Individual calls are atomic, but a render may run between two calls.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut FrameStore) -> R) -> R {
        f(&mut self.store())
    }

    /// Run `f` on the frame store while holding the render guard
    ///
    /// No frame is rendered or transmitted until `f` returns.
    pub fn with_store_guarded<R>(&self, f: impl FnOnce(&mut FrameStore) -> R) -> R {
        let _permit = self.guard.lock();
        f(&mut self.store())
    }

    /// Columns
    pub fn width(&self) -> usize {
        self.store().width()
    }

    /// Rows
    pub fn height(&self) -> usize {
        self.store().height()
    }

    /// LEDs on the physical strand, including the ones before the grid
    pub const fn strand_length(&self) -> usize {
        self.strand_length
    }

    /// Number of allocated images
    pub fn image_count(&self) -> usize {
        self.store().image_count()
    }

    /// Index of the image being shown
    pub fn current_image(&self) -> usize {
        self.store().current_image()
    }

    /// Crossfade step towards the next image, `0..=100`
    pub fn fade_step(&self) -> u8 {
        self.store().fade_step()
    }

    /// Append a black image and return its index
    pub fn new_image(&self) -> usize {
        self.store().new_image()
    }

    /// Select the current image and crossfade step under the render guard
    ///
    /// Unknown indices are ignored.
    pub fn select_image(&self, index: usize, fade_step: u8) {
        let _permit = self.guard.lock();
        self.store().select_image(index, fade_step);
    }

    /// Set one channel of a pixel in the current image
    pub fn set_pixel(&self, x: usize, y: usize, channel: Channel, value: u8) -> Result<()> {
        self.store().set_pixel(None, x, y, channel, value)
    }

    /// Set one channel of a pixel in `image`
    pub fn set_pixel_in(&self, image: usize, x: usize, y: usize, channel: Channel, value: u8) -> Result<()> {
        self.store().set_pixel(Some(image), x, y, channel, value)
    }

    /// Set a pixel of the current image
    pub fn set_color(&self, x: usize, y: usize, color: Rgb) -> Result<()> {
        self.store().set_color(x, y, color)
    }

    /// Pixel of the current image
    pub fn pixel(&self, x: usize, y: usize) -> Result<Rgb> {
        self.store().pixel(None, x, y)
    }

    /// Install the palette used by palette color writes
    pub fn set_palette(&self, palette: Arc<Palette>) {
        self.store().set_palette(palette);
    }

    /// Turn the current image black
    pub fn clear(&self) {
        self.store().clear();
    }

    /// Shift the current image one cell
    pub fn shift(&self, direction: ShiftDirection, wrap: bool) {
        self.store().shift(direction, wrap);
    }

    /// Blur the current image into the next one and return its index
    pub fn blur(&self) -> usize {
        self.store().blur()
    }

    /// Load an image file into `target`, or a new image
    pub fn load_image_file<P: AsRef<Path>>(&self, path: P, target: Option<usize>) -> Result<usize> {
        self.store().load_image_file(path, target)
    }

    /// Save image `index`, or the current one, to a file
    pub fn save_image_file<P: AsRef<Path>>(&self, path: P, index: Option<usize>) -> Result<usize> {
        self.store().save_image_file(path, index)
    }

    /// Rebuild the gamma table
    pub fn set_gamma(&self, exponent: f32) -> Result<()> {
        let lut = GammaLut::new(exponent)?;
        self.set_gamma_lut(lut);
        Ok(())
    }

    /// Replace the gamma table, e.g. with one read from a color map
    pub fn set_gamma_lut(&self, lut: GammaLut) {
        let _permit = self.guard.lock();
        self.output().gamma = lut;
        debug!("gamma table replaced");
    }

    /// Snapshot of the output gamma table
    pub fn gamma(&self) -> GammaLut {
        self.output().gamma.clone()
    }

    /// Render the gamma-corrected strand buffer without transmitting it
    pub fn frame(&self) -> Vec<u8> {
        let _permit = self.guard.lock();
        let mut frame = self.render_locked();
        self.output().gamma.apply_in_place(&mut frame);
        frame
    }

    /// Render the current image and hand it to the sink
    ///
    /// Sink failures are returned unchanged; nothing is retried.
    pub fn show(&self) -> Result<()> {
        let _permit = self.guard.lock();
        let mut frame = self.render_locked();
        let mut output = self.output();
        output.gamma.apply_in_place(&mut frame);
        output.sink.transmit(&frame)?;
        Ok(())
    }

    /// Caller must hold the render guard
    fn render_locked(&self) -> Vec<u8> {
        let store = self.store();
        let mut frame = vec![0; self.strand_length * CHANNELS];
        let offset = frame.len() - store.frame_len();
        store.render_into(&mut frame[offset..]);
        frame
    }
}
