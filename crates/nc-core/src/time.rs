//! Experiment time model.
//!
//! # Design
//!
//! Every suspension point in a run (probe pacing, waiting out a busy
//! endpoint, the link-cut countdown, traffic pacing, the post-start settle
//! period) goes through a [`Clock`].  Durations handed to a clock are
//! *experiment* durations ("30 seconds between pings") and the clock decides
//! how much real time that costs:
//!
//! | Clock           | 1 experiment second costs |
//! |-----------------|---------------------------|
//! | `WallClock`     | 1 s                       |
//! | `ScaledClock`   | 1 s / factor              |
//!
//! `elapsed` is reported back in experiment time, so pacing arithmetic such as
//! "sleep for whatever is left of the probe interval" is identical under both.

use std::time::{Duration, Instant};

/// Source of time and sleeps for the measurement engine.
///
/// Implementations must be `Send + Sync`: one clock is shared by all sampler
/// threads, the link-cut coordinator and the traffic loop of a run.
pub trait Clock: Send + Sync {
    /// Opaque start marker for a later [`elapsed`][Self::elapsed] call.
    fn now(&self) -> Instant;

    /// Experiment time elapsed since `since`.
    fn elapsed(&self, since: Instant) -> Duration;

    /// Suspend the calling thread for `duration` of experiment time.
    fn sleep(&self, duration: Duration);

    /// Sleep for whatever remains of `interval` measured from `start`.
    ///
    /// Returns immediately when the interval is already used up, so slow
    /// iterations do not push later ones back.
    fn pace(&self, start: Instant, interval: Duration) {
        let spent = self.elapsed(start);
        if let Some(rest) = interval.checked_sub(spent) {
            if !rest.is_zero() {
                self.sleep(rest);
            }
        }
    }
}

// ── WallClock ─────────────────────────────────────────────────────────────────

/// Real time: one experiment second is one wall-clock second.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl Clock for WallClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn elapsed(&self, since: Instant) -> Duration {
        since.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// ── ScaledClock ───────────────────────────────────────────────────────────────

/// Compressed time: every experiment duration is divided by `factor`.
///
/// With `factor = 1000.0` a 5-window run at 30 s × 4 pings finishes in well
/// under a second of real time while keeping the same relative ordering
/// between samplers and the link-cut coordinator.
#[derive(Clone, Copy, Debug)]
pub struct ScaledClock {
    factor: f64,
}

impl ScaledClock {
    /// `factor` values ≤ 0 (or NaN) fall back to 1.0 (real time).
    pub fn new(factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 { factor } else { 1.0 };
        Self { factor }
    }

    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Clock for ScaledClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn elapsed(&self, since: Instant) -> Duration {
        since.elapsed().mul_f64(self.factor)
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration.div_f64(self.factor));
    }
}
