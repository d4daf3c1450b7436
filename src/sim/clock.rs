/// Simulation clock: fixed-step tick scheduling and spawn timing.
///
/// `FixedStep` converts wall time into a whole number of logical ticks,
/// so slow frames catch up instead of slowing the simulation down.
/// `SpawnTimer` decides, tick by tick, when the next spawn is due; the
/// interval is re-drawn at random after every spawn for an uneven cadence.

use std::time::Duration;

use rand::Rng;

// ── Fixed step ──

pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
    max_catch_up: u32,
}

impl FixedStep {
    pub fn new(step: Duration, max_catch_up: u32) -> Self {
        FixedStep {
            step: step.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
            max_catch_up: max_catch_up.max(1),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add `elapsed` wall time; return how many ticks are due.
    ///
    /// At most `max_catch_up` ticks are returned; any backlog beyond that is
    /// dropped so a stalled terminal cannot trigger a burst of catch-up work.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_catch_up {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Wall time left until the next tick is due.
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }
}

// ── Spawn timing ──

/// A spawn window in seconds, as configured.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SpawnWindow {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl SpawnWindow {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        SpawnWindow { min_secs, max_secs }
    }

    /// Same window expressed in ticks of `tick_secs`.
    pub fn in_ticks(&self, tick_secs: f64) -> (f64, f64) {
        let tick = tick_secs.max(1e-6);
        let min = (self.min_secs / tick).max(0.0);
        let max = (self.max_secs / tick).max(min);
        (min, max)
    }
}

pub struct SpawnTimer {
    min_ticks: f64,
    max_ticks: f64,
    since_last: u32,
    next_interval: f64,
}

impl SpawnTimer {
    pub fn new<R: Rng>(min_ticks: f64, max_ticks: f64, rng: &mut R) -> Self {
        let mut timer = SpawnTimer {
            min_ticks,
            max_ticks: max_ticks.max(min_ticks),
            since_last: 0,
            next_interval: 0.0,
        };
        timer.next_interval = timer.draw(rng);
        timer
    }

    pub fn from_window<R: Rng>(window: SpawnWindow, tick_secs: f64, rng: &mut R) -> Self {
        let (min, max) = window.in_ticks(tick_secs);
        SpawnTimer::new(min, max, rng)
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max_ticks > self.min_ticks {
            rng.gen_range(self.min_ticks..self.max_ticks)
        } else {
            self.min_ticks
        }
    }

    /// Count one tick. True when a spawn is due; the timer then restarts
    /// with a freshly drawn interval.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> bool {
        self.since_last = self.since_last.saturating_add(1);
        if f64::from(self.since_last) > self.next_interval {
            self.since_last = 0;
            self.next_interval = self.draw(rng);
            true
        } else {
            false
        }
    }

    pub fn next_interval(&self) -> f64 {
        self.next_interval
    }
}
