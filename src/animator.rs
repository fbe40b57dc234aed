//! Animation state
//!
//! [`Animator`] owns the per-channel phase (step and increment) and the
//! selected color function of every channel. [`ColorEngine`] bundles it with
//! the waveform tables and the function registry, which is everything needed
//! to paint one animation frame into an image.

use embassy_time::Duration;
use log::debug;

use crate::color::{CHANNELS, Channel};
use crate::color_function::{ColorFunction, ColorFunctionRegistry, PatternContext};
use crate::error::Result;
use crate::image::Image;
use crate::waveform::WaveformTable;

/// Animation settings
#[derive(Debug, Clone, Copy)]
pub struct AnimationConfig {
    /// Waveform steps per grid cell
    pub fade_steps: usize,
    /// Time between two rendered frames
    pub frame_duration: Duration,
    /// Waveform exponent of each channel, at least 1.0
    pub exponents: [f64; CHANNELS],
    /// Recorded waveform maximum
    pub max_value: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fade_steps: 10,
            frame_duration: Duration::from_millis(50),
            exponents: [1.0; CHANNELS],
            max_value: 255.0,
        }
    }
}

/// Position of one channel in its waveform and how fast it moves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Phase {
    pub step: i64,
    pub increment: i64,
}

/// Per-channel phases and color function selection
#[derive(Debug, Clone)]
pub struct Animator {
    phases: [Phase; CHANNELS],
    functions: [usize; CHANNELS],
    period: i64,
}

impl Animator {
    /// Idle animator for waveforms of `period` steps, every channel "Off"
    #[allow(clippy::cast_possible_wrap)]
    pub fn new(period: usize) -> Self {
        Self {
            phases: [Phase::default(); CHANNELS],
            functions: [0; CHANNELS],
            period: period.max(1) as i64,
        }
    }

    #[allow(clippy::cast_sign_loss)]
    pub const fn period(&self) -> usize {
        self.period as usize
    }

    /// Current phase of `channel`
    pub const fn phase(&self, channel: Channel) -> Phase {
        self.phases[channel.index()]
    }

    /// Registry index of the color function driving `channel`
    pub const fn function(&self, channel: Channel) -> usize {
        self.functions[channel.index()]
    }

    /// Display name of the color function driving `channel`
    pub fn function_name<'r>(&self, registry: &'r ColorFunctionRegistry, channel: Channel) -> Result<&'r str> {
        registry.name(self.function(channel))
    }

    /// Select the color function of `channel` by registry index
    pub fn set_function(&mut self, registry: &ColorFunctionRegistry, channel: Channel, index: usize) -> Result<()> {
        registry.get(index)?;
        self.functions[channel.index()] = index;
        Ok(())
    }

    /// Select the color function of `channel` by registered name
    ///
    /// Returns the resolved index, or `None` with the selection unchanged.
    pub fn set_function_by_name(
        &mut self,
        registry: &ColorFunctionRegistry,
        channel: Channel,
        name: &str,
    ) -> Option<usize> {
        let index = registry.index_of(name)?;
        self.functions[channel.index()] = index;
        Some(index)
    }

    /// Replace the per-frame step increment of `channel`
    pub fn set_increment(&mut self, channel: Channel, increment: i64) {
        self.phases[channel.index()].increment = increment;
    }

    /// Add `delta` to the increment of `channel`
    pub fn adjust_increment(&mut self, channel: Channel, delta: i64) {
        let phase = &mut self.phases[channel.index()];
        phase.increment = phase.increment.saturating_add(delta);
    }

    /// Jump `channel` to `step`, wrapped into one period
    pub fn set_step(&mut self, channel: Channel, step: i64) {
        self.phases[channel.index()].step = step.rem_euclid(self.period);
    }

    /// Move `channel` by `delta` steps, wrapped into one period
    pub fn adjust_step(&mut self, channel: Channel, delta: i64) {
        let phase = &mut self.phases[channel.index()];
        phase.step = (phase.step.rem_euclid(self.period) + delta.rem_euclid(self.period)).rem_euclid(self.period);
    }

    /// Move `channel` forward by its increment, wrapping into one period
    pub fn advance(&mut self, channel: Channel) {
        let increment = self.phases[channel.index()].increment;
        self.adjust_step(channel, increment);
    }

    /// Advance every channel by its increment
    pub fn advance_all(&mut self) {
        for channel in Channel::ALL {
            self.advance(channel);
        }
    }

    /// Zero every step and increment, keeping the function selection
    pub fn reset(&mut self) {
        self.phases = [Phase::default(); CHANNELS];
    }

    /// Paint the current phases into `image`
    pub fn fill(&self, registry: &ColorFunctionRegistry, waveform: &WaveformTable, image: &mut Image) -> Result<()> {
        let functions: [&dyn ColorFunction; CHANNELS] = [
            registry.get(self.functions[0])?,
            registry.get(self.functions[1])?,
            registry.get(self.functions[2])?,
        ];
        let ctx = PatternContext {
            waveform,
            width: image.width(),
            height: image.height(),
        };
        let width = ctx.width;
        for (i, pixel) in image.as_bytes_mut().chunks_exact_mut(CHANNELS).enumerate() {
            let (x, y) = (i % width, i / width);
            for channel in Channel::ALL {
                let step = self.phases[channel.index()].step;
                pixel[channel.index()] = functions[channel.index()].compute(&ctx, channel, x, y, step);
            }
        }
        Ok(())
    }
}

/// Animator, waveforms and color functions driven together
#[derive(Debug)]
pub struct ColorEngine {
    animator: Animator,
    waveform: WaveformTable,
    registry: ColorFunctionRegistry,
    max_value: f64,
}

impl ColorEngine {
    /// Build waveforms for a grid of `size` cells per axis and compute every
    /// channel with its configured exponent
    pub fn new(size: usize, config: &AnimationConfig, registry: ColorFunctionRegistry) -> Result<Self> {
        let mut waveform = WaveformTable::new(size, config.fade_steps)?;
        for channel in Channel::ALL {
            waveform.recalc(channel, config.max_value, config.exponents[channel.index()])?;
        }
        debug!("color engine ready: {} functions, period {}", registry.len(), waveform.period());
        Ok(Self {
            animator: Animator::new(waveform.period()),
            waveform,
            registry,
            max_value: config.max_value,
        })
    }

    /// Channel phases and function selection
    pub const fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Mutable channel phases and function selection
    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    /// Waveform tables sampled by the color functions
    pub const fn waveform(&self) -> &WaveformTable {
        &self.waveform
    }

    /// Color functions available to the channels
    pub const fn registry(&self) -> &ColorFunctionRegistry {
        &self.registry
    }

    /// Drive `channel` with the registered function at `index`
    pub fn set_function(&mut self, channel: Channel, index: usize) -> Result<()> {
        self.animator.set_function(&self.registry, channel, index)
    }

    /// Display name of the function driving `channel`
    pub fn function_name(&self, channel: Channel) -> Result<&str> {
        self.animator.function_name(&self.registry, channel)
    }

    /// Rebuild the waveform of `channel` with a new exponent
    pub fn recalc(&mut self, channel: Channel, exponent: f64) -> Result<()> {
        self.waveform.recalc(channel, self.max_value, exponent)
    }

    /// Paint the next animation frame into `image`
    pub fn fill(&self, image: &mut Image) -> Result<()> {
        self.animator.fill(&self.registry, &self.waveform, image)
    }
}
