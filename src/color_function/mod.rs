//! Color functions and their registry
//!
//! A color function computes one channel of one grid cell for a given
//! animation step, usually by sampling the channel's waveform at a step
//! offset derived from the cell position. Functions are registered once,
//! in order, and selected per channel by their position in the registry.

mod builtin;

pub use builtin::BuiltinFunction;

use crate::color::Channel;
use crate::error::{Error, Result};
use crate::waveform::WaveformTable;

/// Grid geometry and waveforms a color function may consult
#[derive(Debug, Clone, Copy)]
pub struct PatternContext<'a> {
    pub waveform: &'a WaveformTable,
    pub width: usize,
    pub height: usize,
}

impl PatternContext<'_> {
    /// Fade steps per grid cell, as a signed step offset
    #[allow(clippy::cast_possible_wrap)]
    pub const fn cell_steps(&self) -> i64 {
        self.waveform.fade_steps() as i64
    }
}

/// Pattern mapping a cell and animation step to one channel value
pub trait ColorFunction: Send + Sync {
    /// Channel value of cell (`x`, `y`) at animation step `step`
    fn compute(&self, ctx: &PatternContext<'_>, channel: Channel, x: usize, y: usize, step: i64) -> u8;
}

impl<F> ColorFunction for F
where
    F: Fn(&PatternContext<'_>, Channel, usize, usize, i64) -> u8 + Send + Sync,
{
    fn compute(&self, ctx: &PatternContext<'_>, channel: Channel, x: usize, y: usize, step: i64) -> u8 {
        self(ctx, channel, x, y, step)
    }
}

struct Entry {
    name: String,
    function: Box<dyn ColorFunction>,
}

/// Append-only list of named color functions
#[derive(Default)]
pub struct ColorFunctionRegistry {
    entries: Vec<Entry>,
}

impl core::fmt::Debug for ColorFunctionRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl ColorFunctionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every [`BuiltinFunction`], "Off" first
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for builtin in BuiltinFunction::ALL {
            registry.register(builtin.display_name(), builtin);
        }
        registry
    }

    /// Append a function and return its index
    pub fn register(&mut self, name: impl Into<String>, function: impl ColorFunction + 'static) -> usize {
        self.entries.push(Entry {
            name: name.into(),
            function: Box::new(function),
        });
        self.entries.len() - 1
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no function is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name of the function at `index`
    pub fn name(&self, index: usize) -> Result<&str> {
        self.entries
            .get(index)
            .map(|entry| entry.name.as_str())
            .ok_or(Error::InvalidColorFunction(index))
    }

    /// Index of the first function registered under `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Display names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Function at `index`
    pub fn get(&self, index: usize) -> Result<&dyn ColorFunction> {
        self.entries
            .get(index)
            .map(|entry| entry.function.as_ref())
            .ok_or(Error::InvalidColorFunction(index))
    }
}
