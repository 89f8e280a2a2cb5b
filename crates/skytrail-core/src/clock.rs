//! Time sources for the animation loop.
//!
//! The loop needs two clocks: a monotonic millisecond counter for progress
//! (the display-refresh timestamp) and the UTC wall clock for lighting.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

pub trait Clock {
    /// Milliseconds on a monotonic timeline with an arbitrary origin.
    fn monotonic_ms(&self) -> f64;
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Real time, optionally fast-forwarded. `time_scale` only affects the
/// monotonic side; lighting always follows the real wall clock.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
    time_scale: f64,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::scaled(1.0)
    }

    /// Non-positive or non-finite scales fall back to real time.
    pub fn scaled(time_scale: f64) -> Self {
        let time_scale = if time_scale.is_finite() && time_scale > 0.0 {
            time_scale
        } else {
            1.0
        };
        Self {
            origin: Instant::now(),
            time_scale,
        }
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

impl Clock for SystemClock {
    fn monotonic_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0 * self.time_scale
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for tests and replays. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
    utc: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(utc: DateTime<Utc>) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(0.0)),
            utc: Rc::new(Cell::new(utc)),
        }
    }

    pub fn set_ms(&self, ms: f64) {
        self.now_ms.set(ms);
    }

    /// Moves both timelines forward by `ms`.
    pub fn advance_ms(&self, ms: f64) {
        self.now_ms.set(self.now_ms.get() + ms);
        let step = chrono::Duration::milliseconds(ms.round() as i64);
        self.utc.set(self.utc.get() + step);
    }

    pub fn set_utc(&self, utc: DateTime<Utc>) {
        self.utc.set(utc);
    }
}

impl Clock for ManualClock {
    fn monotonic_ms(&self) -> f64 {
        self.now_ms.get()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        self.utc.get()
    }
}
