pub mod animator;
pub mod color;
pub mod color_function;
pub mod command;
pub mod error;
pub mod frame_store;
pub mod gamma;
pub mod grid;
pub mod guard;
pub mod image;
pub mod layout;
pub mod output;
pub mod queue;
pub mod scheduler;
pub mod transition;
pub mod waveform;

pub use animator::{AnimationConfig, Animator, ColorEngine, Phase};
pub use color::{Channel, Palette, Rgb};
pub use color_function::{BuiltinFunction, ColorFunction, ColorFunctionRegistry, PatternContext};
pub use command::{AnimationCommand, CommandChannel, CommandProcessor, CommandReceiver, CommandSender};
pub use error::{Error, Result};
pub use frame_store::FrameStore;
pub use gamma::GammaLut;
pub use grid::{GridConfig, LedGrid};
pub use guard::Semaphore;
pub use image::{Image, ShiftDirection};
pub use layout::SerpentineLayout;
pub use output::{SmartLedsSink, TransmitError, WriterSink};
pub use scheduler::{FrameResult, FrameScheduler};
pub use transition::FadeTransition;
pub use waveform::WaveformTable;

pub use embassy_time::{Duration, Instant};

/// Transport for rendered frames
///
/// Implement this trait to support different hardware platforms. Frames are
/// `3 * strand_length` bytes in strand order, already gamma corrected.
pub trait OutputSink {
    /// Transmit one frame
    fn transmit(&mut self, frame: &[u8]) -> core::result::Result<(), TransmitError>;
}
