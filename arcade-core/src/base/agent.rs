//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step.
    ///
    /// `buffer` is a replay buffer from which transitions will be taken
    /// for updating model parameters. The agent may skip the step, for example
    /// while the buffer holds fewer transitions than a batch. In that case
    /// no parameter is touched and `Ok(None)` is returned.
    fn opt(&mut self, buffer: &mut R) -> Result<Option<Record>>;

    /// Moves the parameters of a target network toward the trained network.
    ///
    /// Called by [`Trainer`](crate::Trainer) once per environment step, right after
    /// [`Agent::opt`]. Agents without a target network keep the default.
    fn update_target(&mut self) -> Result<()> {
        Ok(())
    }

    /// The number of discrete actions the agent selects from, `None` if not fixed.
    ///
    /// [`Trainer`](crate::Trainer) checks it against [`Env::n_actions`] before training.
    fn n_actions(&self) -> Option<usize> {
        None
    }

    /// Returns the current internal state of the agent, like the exploration rate.
    fn info(&self) -> Record {
        Record::empty()
    }

    /// Save the parameters of the agent in the given directory.
    /// This method commonly creates a number of files consisting the agent
    /// in the directory. For example, the DQN agent saves two Q-networks
    /// corresponding to the original and target networks.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;

    /// Persists a checkpoint of the agent in `dir` with file names starting with `stem`.
    ///
    /// Returns the paths of the created files.
    fn save_checkpoint(&self, dir: &Path, stem: &str) -> Result<Vec<PathBuf>>;
}
