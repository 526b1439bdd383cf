//! Exploration strategy of DQN.
use anyhow::Result;
use arcade_core::error::ArcadeError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer with exponential decay.
///
/// The exploration rate after `t` action selections is
///
/// `eps_end + (eps_start - eps_end) * exp(-t / eps_decay)`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// The number of action selections so far.
    pub n_steps: usize,

    /// Epsilon at step 0.
    pub eps_start: f64,

    /// The asymptotic value of epsilon.
    pub eps_end: f64,

    /// Time constant of the decay in steps.
    pub eps_decay: f64,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            n_steps: 0,
            eps_start: 0.9,
            eps_end: 0.05,
            eps_decay: 100_000.0,
        }
    }
}

impl EpsilonGreedy {
    /// Checks that the schedule yields a probability at every step.
    pub fn validate(&self) -> Result<(), ArcadeError> {
        if !(self.eps_decay > 0.0 && self.eps_decay.is_finite()) {
            return Err(ArcadeError::InvalidConfig(format!(
                "eps_decay must be positive and finite, got {}",
                self.eps_decay
            )));
        }
        for (name, v) in [("eps_start", self.eps_start), ("eps_end", self.eps_end)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ArcadeError::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }

    /// Epsilon after `step` action selections.
    pub fn epsilon_at(&self, step: usize) -> f64 {
        self.eps_end + (self.eps_start - self.eps_end) * (-(step as f64) / self.eps_decay).exp()
    }

    /// Current epsilon.
    pub fn epsilon(&self) -> f64 {
        self.epsilon_at(self.n_steps)
    }

    /// Selects an action in `0..n_actions` and advances the step counter.
    ///
    /// With probability `1 - epsilon` the action is given by `greedy`, which is not
    /// evaluated otherwise. The other actions are drawn uniformly.
    pub fn action<F>(&mut self, n_actions: usize, rng: &mut impl Rng, greedy: F) -> Result<usize>
    where
        F: FnOnce() -> Result<usize>,
    {
        let eps = self.epsilon();
        self.n_steps += 1;

        if rng.gen::<f64>() > eps {
            greedy()
        } else {
            Ok(rng.gen_range(0..n_actions))
        }
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Set the asymptotic epsilon value.
    pub fn eps_end(mut self, v: f64) -> Self {
        self.eps_end = v;
        self
    }

    /// Set the time constant of the decay.
    pub fn eps_decay(mut self, v: f64) -> Self {
        self.eps_decay = v;
        self
    }
}
