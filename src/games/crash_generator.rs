//! Crash point generation
//!
//! A uniform draw `e` in `[0, 1)` is mapped through `floor(100 / (1 - e)) / 100`
//! and clamped to `[1.0, max]`. Most rounds crash low; the tail is long.

use rand::{rngs::StdRng, Rng, SeedableRng};

pub const MIN_CRASH_POINT: f64 = 1.0;
pub const DEFAULT_MAX_CRASH_POINT: f64 = 100.0;

/// Anything that can hand the engine its next crash point
pub trait CrashPointSource: Send {
    fn next_crash_point(&mut self) -> f64;
}

/// Map a uniform draw to a crash multiplier truncated to two decimals
pub fn crash_point_from_draw(e: f64, max_crash_point: f64) -> f64 {
    let raw = (100.0 / (1.0 - e)).floor() / 100.0;
    raw.clamp(MIN_CRASH_POINT, max_crash_point)
}

/// Crash points from a uniform random source
pub struct RandomCrashGenerator<R: Rng + Send = StdRng> {
    rng: R,
    max_crash_point: f64,
}

impl RandomCrashGenerator<StdRng> {
    pub fn from_entropy(max_crash_point: f64) -> Self {
        Self::new(StdRng::from_entropy(), max_crash_point)
    }

    /// Reproducible sequence of crash points
    pub fn seeded(seed: u64, max_crash_point: f64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), max_crash_point)
    }
}

impl<R: Rng + Send> RandomCrashGenerator<R> {
    pub fn new(rng: R, max_crash_point: f64) -> Self {
        Self {
            rng,
            max_crash_point: max_crash_point.max(MIN_CRASH_POINT),
        }
    }

    pub fn generate(&mut self) -> f64 {
        let e: f64 = self.rng.gen();
        crash_point_from_draw(e, self.max_crash_point)
    }
}

impl<R: Rng + Send> CrashPointSource for RandomCrashGenerator<R> {
    fn next_crash_point(&mut self) -> f64 {
        self.generate()
    }
}

/// Fixed crash points, cycled in order
#[derive(Debug, Clone)]
pub struct ScriptedCrashPoints {
    points: Vec<f64>,
    next: usize,
}

impl ScriptedCrashPoints {
    pub fn new(points: Vec<f64>) -> Self {
        Self { points, next: 0 }
    }
}

impl CrashPointSource for ScriptedCrashPoints {
    fn next_crash_point(&mut self) -> f64 {
        if self.points.is_empty() {
            return MIN_CRASH_POINT;
        }
        let point = self.points[self.next % self.points.len()];
        self.next = (self.next + 1) % self.points.len();
        point
    }
}
