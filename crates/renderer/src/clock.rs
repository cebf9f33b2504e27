use std::time::{Duration, Instant};

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Animation time in seconds, excluding time spent paused.
    pub seconds: f32,
    pub paused: bool,
}

/// Pausable animation clock backed by the monotonic system clock.
///
/// Pausing freezes the reported elapsed time; resuming shifts the origin
/// forward by the paused duration so the animation continues where it stopped
/// instead of jumping ahead.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    origin: Instant,
    paused_at: Option<Instant>,
}

impl AnimationClock {
    /// Creates a running clock starting at `Instant::now()`.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            paused_at: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Elapsed animation time as of `now`.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let end = self.paused_at.unwrap_or(now);
        end.saturating_duration_since(self.origin)
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume_at(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.origin += now.saturating_duration_since(paused_at);
        }
    }

    /// Flips between running and paused, returning the new paused state.
    pub fn toggle_at(&mut self, now: Instant) -> bool {
        if self.is_paused() {
            self.resume_at(now);
        } else {
            self.pause_at(now);
        }
        self.is_paused()
    }

    pub fn toggle(&mut self) -> bool {
        self.toggle_at(Instant::now())
    }

    /// Produces the time sample for the next frame.
    pub fn sample_at(&self, now: Instant) -> TimeSample {
        TimeSample {
            seconds: self.elapsed_at(now).as_secs_f32(),
            paused: self.is_paused(),
        }
    }

    pub fn sample(&self) -> TimeSample {
        self.sample_at(Instant::now())
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}
