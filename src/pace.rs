use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Where a diner gets its think and eat durations from.
pub trait Pace {
    fn think(&mut self) -> Duration;
    fn eat(&mut self) -> Duration;
}

/// `low..=high` whole steps of `unit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Steps {
    pub low: u32,
    pub high: u32,
    pub unit: Duration,
}

impl Steps {
    pub const fn new(low: u32, high: u32, unit: Duration) -> Self {
        Self { low, high, unit }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        self.unit * rng.gen_range(self.low..=self.high)
    }

    pub fn max(&self) -> Duration {
        self.unit * self.high
    }
}

pub struct UniformPace<R> {
    rng: R,
    think: Steps,
    eat: Steps,
}

impl<R: Rng> UniformPace<R> {
    pub fn new(rng: R, think: Steps, eat: Steps) -> Self {
        Self { rng, think, eat }
    }
}

impl UniformPace<StdRng> {
    pub fn from_entropy(think: Steps, eat: Steps) -> Self {
        Self::new(StdRng::from_entropy(), think, eat)
    }

    pub fn seeded(seed: u64, think: Steps, eat: Steps) -> Self {
        Self::new(StdRng::seed_from_u64(seed), think, eat)
    }
}

impl<R: Rng> Pace for UniformPace<R> {
    fn think(&mut self) -> Duration {
        self.think.sample(&mut self.rng)
    }

    fn eat(&mut self) -> Duration {
        self.eat.sample(&mut self.rng)
    }
}
