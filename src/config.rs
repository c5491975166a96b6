use std::time::Duration;

use rand::rngs::StdRng;

use crate::{
    error::SessionError,
    pace::{Steps, UniformPace},
};

pub const AGENT_COUNT: usize = 5;
pub const SESSION_DURATION: Duration = Duration::from_secs(5);
pub const THINK_STEPS: Steps = Steps::new(1, 6, Duration::from_millis(50));
pub const EAT_STEPS: Steps = Steps::new(1, 4, Duration::from_millis(150));
pub const NAMES: [&str; 5] = ["Aristotle", "Platon", "Descartes", "Kant", "Nietzsche"];

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub agent_count: usize,
    pub session: Duration,
    pub think: Steps,
    pub eat: Steps,
    /// Empty means [`NAMES`] then `Diner-{i}`.
    pub names: Vec<String>,
    /// Seat `i` is seeded with `seed + i`; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            agent_count: AGENT_COUNT,
            session: SESSION_DURATION,
            think: THINK_STEPS,
            eat: EAT_STEPS,
            names: Vec::new(),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn new(agent_count: usize, session: Duration) -> Self {
        Self {
            agent_count,
            session,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.agent_count < 2 {
            return Err(SessionError::TooFewAgents(self.agent_count));
        }
        for (which, steps) in [("think", &self.think), ("eat", &self.eat)] {
            if steps.low > steps.high {
                return Err(SessionError::EmptyStepRange {
                    which,
                    low: steps.low,
                    high: steps.high,
                });
            }
            if steps.unit.is_zero() {
                return Err(SessionError::ZeroUnit(which));
            }
        }
        if !self.names.is_empty() && self.names.len() != self.agent_count {
            return Err(SessionError::NameCountMismatch {
                expected: self.agent_count,
                actual: self.names.len(),
            });
        }
        Ok(())
    }

    pub fn name(&self, i: usize) -> String {
        match (self.names.get(i), NAMES.get(i)) {
            (Some(name), _) => name.clone(),
            (None, Some(name)) => (*name).to_owned(),
            (None, None) => format!("Diner-{i}"),
        }
    }

    pub fn pace(&self, i: usize) -> UniformPace<StdRng> {
        match self.seed {
            Some(seed) => UniformPace::seeded(seed.wrapping_add(i as u64), self.think, self.eat),
            None => UniformPace::from_entropy(self.think, self.eat),
        }
    }

    /// Longest single think+eat cycle, ignoring time spent waiting for forks.
    pub fn max_cycle(&self) -> Duration {
        self.think.max() + self.eat.max()
    }
}
