//! Animation commands
//!
//! Control threads push [`AnimationCommand`]s into a [`CommandQueue`]; the
//! frame scheduler drains them once per tick through a [`CommandProcessor`].
//! Commands touching only the color engine are applied right away, the rest
//! are returned as [`CommandEffects`] for the scheduler to apply.

use embassy_time::{Duration, Instant};
use log::warn;

use crate::animator::ColorEngine;
use crate::color::Channel;
use crate::queue::{CommandQueue, Receiver, Sender};
use crate::transition::FadeTransition;

/// Control request for the running animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationCommand {
    /// Select a color function by registry index
    SetFunction { channel: Channel, index: usize },
    SetIncrement { channel: Channel, increment: i64 },
    AdjustIncrement { channel: Channel, delta: i64 },
    SetStep { channel: Channel, step: i64 },
    AdjustStep { channel: Channel, delta: i64 },
    /// Rebuild the waveform of a channel
    Recalc { channel: Channel, exponent: f64 },
    /// Rebuild the output gamma table
    SetGamma(f32),
    /// Zero every step and increment
    Reset,
    /// Render exactly one frame while paused
    Step,
    Pause,
    Resume,
    /// Crossfade `image` into its successor over `duration`
    Crossfade {
        image: usize,
        from: u8,
        to: u8,
        duration: Duration,
    },
}

/// Producer handle for control threads
pub type CommandSender<'a, const SIZE: usize> = Sender<'a, AnimationCommand, SIZE>;

/// Consumer handle owned by the scheduler
pub type CommandReceiver<'a, const SIZE: usize> = Receiver<'a, AnimationCommand, SIZE>;

/// Bounded queue of animation commands
pub type CommandChannel<const SIZE: usize> = CommandQueue<AnimationCommand, SIZE>;

/// Changes the scheduler applies after draining the queue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandEffects {
    /// New gamma exponent
    pub gamma: Option<f32>,
    /// `Some(true)` to pause, `Some(false)` to resume; the last one wins
    pub paused: Option<bool>,
    /// Render one frame regardless of the pause state
    pub single_step: bool,
    /// Crossfade to start
    pub crossfade: Option<FadeTransition>,
}

impl CommandEffects {
    /// Whether any command left work for the scheduler
    pub const fn has_effects(&self) -> bool {
        self.gamma.is_some() || self.paused.is_some() || self.single_step || self.crossfade.is_some()
    }
}

/// Applies queued commands to a [`ColorEngine`]
pub struct CommandProcessor<'a, const SIZE: usize> {
    commands: CommandReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> CommandProcessor<'a, SIZE> {
    /// Processor draining `commands`
    pub const fn new(commands: CommandReceiver<'a, SIZE>) -> Self {
        Self { commands }
    }

    /// Drain every queued command (non-blocking)
    ///
    /// Invalid commands are logged and skipped.
    pub fn process_pending(&mut self, engine: &mut ColorEngine, now: Instant) -> CommandEffects {
        let mut effects = CommandEffects::default();
        for command in self.commands.drain() {
            Self::process(command, engine, now, &mut effects);
        }
        effects
    }

    fn process(command: AnimationCommand, engine: &mut ColorEngine, now: Instant, effects: &mut CommandEffects) {
        match command {
            AnimationCommand::SetFunction { channel, index } => {
                if let Err(err) = engine.set_function(channel, index) {
                    warn!("ignoring {} function change: {err}", channel.as_str());
                }
            }
            AnimationCommand::SetIncrement { channel, increment } => engine.animator_mut().set_increment(channel, increment),
            AnimationCommand::AdjustIncrement { channel, delta } => engine.animator_mut().adjust_increment(channel, delta),
            AnimationCommand::SetStep { channel, step } => engine.animator_mut().set_step(channel, step),
            AnimationCommand::AdjustStep { channel, delta } => engine.animator_mut().adjust_step(channel, delta),
            AnimationCommand::Recalc { channel, exponent } => {
                if let Err(err) = engine.recalc(channel, exponent) {
                    warn!("ignoring {} recalc: {err}", channel.as_str());
                }
            }
            AnimationCommand::SetGamma(exponent) => effects.gamma = Some(exponent),
            AnimationCommand::Reset => engine.animator_mut().reset(),
            AnimationCommand::Step => effects.single_step = true,
            AnimationCommand::Pause => effects.paused = Some(true),
            AnimationCommand::Resume => effects.paused = Some(false),
            AnimationCommand::Crossfade {
                image,
                from,
                to,
                duration,
            } => {
                effects.crossfade = Some(FadeTransition::new(image, from, to, duration, now));
            }
        }
    }
}
