use std::time::Duration;

use super::source::{MonotonicTime, TimeSource};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time since the previous tick (or since `start`), in seconds.
    pub dt: f32,

    /// Seconds accumulated since the last `start`.
    pub elapsed: f64,

    /// Frames ticked since the last `start`.
    pub frame_index: u64,
}

/// Start/stop stopwatch producing `FrameTime` snapshots.
///
/// `start` rebases the clock: elapsed time returns to zero and the next delta
/// is measured from the restart, never across the stopped interval.
///
/// Deltas are reported as measured, so they sum to the elapsed time. An
/// optional `max_delta` caps the reported step after a stall (debugger,
/// minimized window); elapsed time still accumulates the unclamped duration.
pub struct FrameClock {
    source: Box<dyn TimeSource>,
    running: bool,
    last: Duration,
    elapsed: f64,
    frame_index: u64,
    max_delta: Option<Duration>,
}

impl FrameClock {
    /// Creates a stopped clock reading wall-clock time.
    pub fn new() -> Self {
        Self::with_source(MonotonicTime::new())
    }

    /// Creates a stopped clock reading `source`.
    pub fn with_source(source: impl TimeSource + 'static) -> Self {
        Self {
            last: source.now(),
            source: Box::new(source),
            running: false,
            elapsed: 0.0,
            frame_index: 0,
            max_delta: None,
        }
    }

    /// Caps the reported delta at `max_delta`.
    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = Some(max_delta);
        self
    }

    pub fn start(&mut self) {
        self.last = self.source.now();
        self.elapsed = 0.0;
        self.frame_index = 0;
        self.running = true;
    }

    /// Stops the clock, folding the time since the last tick into `elapsed`.
    pub fn stop(&mut self) {
        if self.running {
            self.delta();
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds accumulated since the last `start`.
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    /// Seconds since the previous call, advancing the baseline.
    ///
    /// Returns 0 while stopped.
    pub fn delta(&mut self) -> f32 {
        if !self.running {
            return 0.0;
        }

        let now = self.source.now();
        let raw = now.saturating_sub(self.last);
        self.last = now;
        self.elapsed += raw.as_secs_f64();

        match self.max_delta {
            Some(max) => raw.min(max).as_secs_f32(),
            None => raw.as_secs_f32(),
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let dt = self.delta();

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("running", &self.running)
            .field("elapsed", &self.elapsed)
            .field("frame_index", &self.frame_index)
            .field("max_delta", &self.max_delta)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualTime;

    fn manual_clock() -> (ManualTime, FrameClock) {
        let time = ManualTime::new();
        let clock = FrameClock::with_source(time.clone());
        (time, clock)
    }

    // ── running / stopped ─────────────────────────────────────────────────

    #[test]
    fn stopped_clock_reports_zero_delta() {
        let (time, mut clock) = manual_clock();
        time.advance_secs(1.0);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.elapsed_time(), 0.0);
    }

    #[test]
    fn tick_measures_since_start() {
        let (time, mut clock) = manual_clock();
        time.advance_secs(5.0);
        clock.start();
        time.advance_secs(0.016);

        let ft = clock.tick();
        assert!((ft.dt - 0.016).abs() < 1e-6);
        assert!((ft.elapsed - 0.016).abs() < 1e-9);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
    }

    #[test]
    fn stop_folds_pending_time_into_elapsed() {
        let (time, mut clock) = manual_clock();
        clock.start();
        time.advance_secs(0.5);
        clock.stop();
        time.advance_secs(10.0);
        assert!((clock.elapsed_time() - 0.5).abs() < 1e-9);
    }

    // ── restart ───────────────────────────────────────────────────────────

    #[test]
    fn restart_resets_elapsed_and_baseline() {
        let (time, mut clock) = manual_clock();
        clock.start();
        time.advance_secs(0.1);
        clock.tick();
        clock.stop();

        time.advance_secs(60.0);
        clock.start();
        assert_eq!(clock.elapsed_time(), 0.0);

        time.advance_secs(0.01);
        let ft = clock.tick();
        assert!((ft.dt - 0.01).abs() < 1e-6);
        assert!((ft.elapsed - 0.01).abs() < 1e-9);
    }

    // ── clamping ──────────────────────────────────────────────────────────

    #[test]
    fn deltas_sum_to_elapsed_by_default() {
        let (time, mut clock) = manual_clock();
        clock.start();

        let mut sum = 0.0;
        for step in [0.016, 1.0, 3.5] {
            time.advance_secs(step);
            sum += clock.tick().dt as f64;
        }

        assert!((sum - 4.516).abs() < 1e-5);
        assert!((clock.elapsed_time() - 4.516).abs() < 1e-9);
    }

    #[test]
    fn delta_is_clamped_but_elapsed_is_not() {
        let (time, clock) = manual_clock();
        let mut clock = clock.with_max_delta(Duration::from_millis(100));
        clock.start();
        time.advance_secs(2.0);

        let ft = clock.tick();
        assert!((ft.dt - 0.1).abs() < 1e-6);
        assert!((ft.elapsed - 2.0).abs() < 1e-9);
    }
}
