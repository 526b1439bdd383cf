//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [self::Step] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Performes an environment step.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    ///
    /// If `seed` is given, the environment is reseeded before the reset,
    /// which makes the episode reproducible.
    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs>;

    /// The number of discrete actions.
    fn n_actions(&self) -> usize;

    /// Samples an action uniformly from the action space.
    fn sample_act(&mut self) -> Self::Act;
}
