use embassy_time::{Duration, Instant};

use crate::frame_store::MAX_FADE_STEP;

/// Linear progress of `elapsed` through `duration`, scaled to `0..=100`
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn progress100(elapsed: Duration, duration: Duration) -> u8 {
    if duration.as_millis() == 0 || elapsed.as_millis() >= duration.as_millis() {
        return MAX_FADE_STEP;
    }
    ((elapsed.as_millis() * MAX_FADE_STEP as u64) / duration.as_millis()) as u8
}

/// Timed crossfade of one image pair
///
/// Moves the fade step of `image` from `from` to `to` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTransition {
    image: usize,
    from: u8,
    to: u8,
    duration: Duration,
    start_time: Instant,
}

impl FadeTransition {
    /// Steps above 100 are clamped
    pub fn new(image: usize, from: u8, to: u8, duration: Duration, start_time: Instant) -> Self {
        Self {
            image,
            from: from.min(MAX_FADE_STEP),
            to: to.min(MAX_FADE_STEP),
            duration,
            start_time,
        }
    }

    /// Image fading into its successor
    pub const fn image(&self) -> usize {
        self.image
    }

    /// Fade step at `now`
    pub fn step_at(&self, now: Instant) -> u8 {
        let elapsed = now
            .checked_duration_since(self.start_time)
            .unwrap_or(Duration::from_millis(0));
        let progress = i32::from(progress100(elapsed, self.duration));
        let (from, to) = (i32::from(self.from), i32::from(self.to));
        let step = from + (to - from) * progress / i32::from(MAX_FADE_STEP);
        u8::try_from(step).unwrap_or(self.to)
    }

    /// Whether `duration` has elapsed at `now`
    pub fn is_finished(&self, now: Instant) -> bool {
        now.checked_duration_since(self.start_time)
            .is_some_and(|elapsed| elapsed >= self.duration)
    }
}
