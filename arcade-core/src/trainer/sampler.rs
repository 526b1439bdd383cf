//! Experience sampling.
//!
//! [`Sampler`] owns the environment and the step processor. At every call of
//! [`Sampler::sample_and_push`], the policy picks an action for the latest
//! observation, the environment is stepped, and the resulting transition is
//! pushed into the replay buffer.
use crate::{
    error::ArcadeError, record::Record, Env, ExperienceBufferBase, Policy, StepProcessor,
};
use anyhow::Result;

/// Result of a single environment step.
pub struct StepOutcome {
    /// Record emitted by the environment.
    pub record: Record,

    /// Reward of the step.
    pub reward: f32,

    /// The episode reached a terminal state.
    pub is_terminated: bool,

    /// The episode was cut off.
    pub is_truncated: bool,
}

impl StepOutcome {
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}

/// Manages the sampling of experiences from the environment.
///
/// # Type Parameters
///
/// * `E` - The environment type
/// * `P` - The step processor type
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,

    /// Previous observation from the environment, `None` outside of an episode.
    prev_obs: Option<E::Obs>,

    step_processor: P,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a new sampler with the given environment and step processor.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
        }
    }

    /// The environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Starts an episode by resetting the environment with `seed`.
    pub fn reset(&mut self, seed: u64) -> Result<()> {
        let obs = self.env.reset(Some(seed))?;
        self.step_processor.reset(obs.clone());
        self.prev_obs = Some(obs);
        Ok(())
    }

    /// Samples an experience and pushes it to the replay buffer.
    ///
    /// After a terminal or truncated step, [`Sampler::reset`] must be called
    /// before the next call of this method.
    pub fn sample_and_push<A, R>(&mut self, policy: &mut A, buffer: &mut R) -> Result<StepOutcome>
    where
        A: Policy<E> + ?Sized,
        R: ExperienceBufferBase<Item = P::Output>,
    {
        let prev_obs = self.prev_obs.take().ok_or(ArcadeError::SamplerNotReset)?;

        let act = policy.sample(&prev_obs)?;
        let (step, record) = self.env.step(&act)?;
        let (reward, is_terminated, is_truncated) =
            (step.reward, step.is_terminated, step.is_truncated);

        if !step.is_done() {
            self.prev_obs = Some(step.obs.clone());
        }

        let transition = self.step_processor.process(step)?;
        buffer.push(transition)?;

        Ok(StepOutcome {
            record,
            reward,
            is_terminated,
            is_truncated,
        })
    }
}
