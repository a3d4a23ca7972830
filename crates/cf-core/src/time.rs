//! Frame time model.
//!
//! # Design
//!
//! The game loop advances in fixed frames.  `FrameClock` holds an integer
//! frame counter and derives the current time from it:
//!
//!   now = frame * frame_dt
//!
//! Deriving `now` from the counter instead of accumulating `+= frame_dt`
//! keeps long runs free of floating-point drift, which matters for the
//! tier cadence (a 10 Hz mover must tick ten times per simulated second).

use std::fmt;

/// Fixed-step clock for the crowd frame loop.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameClock {
    /// Seconds per frame.
    pub frame_dt: f64,
    /// Frames completed since the clock started.
    pub frame: u64,
}

impl FrameClock {
    /// Create a clock ticking at `frame_hz` frames per second.
    pub fn with_rate(frame_hz: f64) -> Self {
        Self { frame_dt: 1.0 / frame_hz, frame: 0 }
    }

    /// Current time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.frame as f64 * self.frame_dt
    }

    /// Frame duration as `f32` for per-frame integration.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.frame_dt as f32
    }

    /// Advance by one frame.
    #[inline]
    pub fn advance(&mut self) {
        self.frame += 1;
    }

    /// How many frames cover `secs` seconds (rounds up).
    #[inline]
    pub fn frames_for_secs(&self, secs: f64) -> u64 {
        (secs / self.frame_dt).ceil() as u64
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{} ({:.3}s)", self.frame, self.now())
    }
}
