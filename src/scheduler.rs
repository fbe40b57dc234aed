//! Frame scheduling
//!
//! The scheduler is the animation driver: every tick it drains the command
//! queue, paints the next animation frame into the current image, shows it
//! and advances the channel phases. The caller decides how to wait between
//! ticks, or hands the loop over to [`FrameScheduler::run`].

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_time::{Duration, Instant};
use log::{error, info, warn};

use crate::OutputSink;
use crate::animator::{AnimationConfig, ColorEngine};
use crate::color_function::ColorFunctionRegistry;
use crate::command::{CommandEffects, CommandProcessor, CommandReceiver};
use crate::error::Result;
use crate::grid::LedGrid;
use crate::transition::FadeTransition;
use crate::waveform::MIN_WAVEFORM_SIZE;

/// Result of a frame tick
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// Deadline of the next frame
    pub next_deadline: Instant,
    /// How long to wait until the next frame (zero when behind schedule)
    pub sleep_duration: Duration,
    /// Whether a frame was rendered and transmitted
    pub rendered: bool,
}

/// Drives a [`LedGrid`] from a [`ColorEngine`]
///
/// # Usage
///
/// ```ignore
/// static COMMANDS: CommandChannel<16> = CommandChannel::new();
///
/// let mut scheduler = FrameScheduler::new(&grid, COMMANDS.receiver(), engine, &config);
/// COMMANDS.sender().try_send(AnimationCommand::SetFunction { channel: Channel::Red, index: 1 })?;
/// scheduler.run(&stop);
/// ```
pub struct FrameScheduler<'a, S: OutputSink, const SIZE: usize> {
    grid: &'a LedGrid<S>,
    commands: CommandProcessor<'a, SIZE>,
    engine: ColorEngine,
    crossfade: Option<FadeTransition>,
    paused: bool,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, S: OutputSink, const SIZE: usize> FrameScheduler<'a, S, SIZE> {
    /// Scheduler driving `grid` from `engine`
    pub fn new(
        grid: &'a LedGrid<S>,
        commands: CommandReceiver<'a, SIZE>,
        engine: ColorEngine,
        config: &AnimationConfig,
    ) -> Self {
        Self {
            grid,
            commands: CommandProcessor::new(commands),
            engine,
            crossfade: None,
            paused: false,
            next_frame: Instant::from_millis(0),
            frame_duration: config.frame_duration,
        }
    }

    /// Scheduler with every builtin color function and waveforms sized to
    /// the larger grid dimension (at least 2, the shortest waveform)
    pub fn with_builtins(
        grid: &'a LedGrid<S>,
        commands: CommandReceiver<'a, SIZE>,
        config: &AnimationConfig,
    ) -> Result<Self> {
        let size = grid.width().max(grid.height()).max(MIN_WAVEFORM_SIZE);
        let engine = ColorEngine::new(size, config, ColorFunctionRegistry::with_builtins())?;
        Ok(Self::new(grid, commands, engine, config))
    }

    /// Color engine painting the frames
    pub const fn engine(&self) -> &ColorEngine {
        &self.engine
    }

    /// Mutable color engine
    pub fn engine_mut(&mut self) -> &mut ColorEngine {
        &mut self.engine
    }

    /// Whether a pause command is in effect
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Time between frames
    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Process one frame and return timing information
    ///
    /// A paused scheduler only processes commands. Transmission failures are
    /// logged and returned after the next deadline has been scheduled.
    pub fn tick(&mut self, now: Instant) -> Result<FrameResult> {
        // Skip the backlog after a stall instead of bursting to catch up
        if now > self.next_frame + self.frame_duration * 2 {
            self.next_frame = now;
        }
        self.next_frame += self.frame_duration;
        let sleep_duration = self
            .next_frame
            .checked_duration_since(now)
            .unwrap_or(Duration::from_millis(0));
        let mut result = FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            rendered: false,
        };

        let effects = self.commands.process_pending(&mut self.engine, now);
        let single_step = effects.single_step;
        if effects.has_effects() {
            self.apply_effects(effects);
        }

        if self.paused && !single_step {
            return Ok(result);
        }

        self.apply_crossfade(now);
        self.render_frame()?;
        result.rendered = true;
        Ok(result)
    }

    /// Paint, show and advance once, ignoring pacing and commands
    pub fn render_once(&mut self) -> Result<()> {
        self.render_frame()
    }

    /// Tick until `stop` is raised, sleeping the current thread between frames
    pub fn run(&mut self, stop: &AtomicBool) {
        info!("animation started");
        while !stop.load(Ordering::Relaxed) {
            let sleep = match self.tick(Instant::now()) {
                Ok(result) => result.sleep_duration,
                Err(_) => self.frame_duration,
            };
            std::thread::sleep(std::time::Duration::from_micros(sleep.as_micros()));
        }
        info!("animation stopped");
    }

    fn apply_effects(&mut self, effects: CommandEffects) {
        if let Some(exponent) = effects.gamma {
            if let Err(err) = self.grid.set_gamma(exponent) {
                warn!("ignoring gamma change: {err}");
            }
        }
        if let Some(paused) = effects.paused {
            if paused != self.paused {
                info!("animation {}", if paused { "paused" } else { "resumed" });
            }
            self.paused = paused;
        }
        if let Some(crossfade) = effects.crossfade {
            self.crossfade = Some(crossfade);
        }
    }

    fn apply_crossfade(&mut self, now: Instant) {
        let Some(crossfade) = self.crossfade else {
            return;
        };
        self.grid.select_image(crossfade.image(), crossfade.step_at(now));
        if crossfade.is_finished(now) {
            self.crossfade = None;
        }
    }

    fn render_frame(&mut self) -> Result<()> {
        self.grid.with_store(|store| self.engine.fill(store.current_mut()))?;
        let shown = self.grid.show();
        self.engine.animator_mut().advance_all();
        if let Err(err) = &shown {
            error!("frame transmission failed: {err}");
        }
        shown
    }
}
