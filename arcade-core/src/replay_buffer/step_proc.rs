//! A generic implementation of [StepProcessor](crate::StepProcessor).
use super::{NextObs, Transition};
use crate::{error::ArcadeError, Env, Step, StepProcessor};
use anyhow::Result;
use std::default::Default;

/// Configuration of [SimpleStepProcessor].
#[derive(Clone, Debug, Default)]
pub struct SimpleStepProcessorConfig {}

/// Produces 1-step transitions from [`Step`] objects.
///
/// The observation of the previous step is kept in the processor. The next
/// observation is [`NextObs::Terminal`] only if the episode was terminated.
pub struct SimpleStepProcessor<E: Env> {
    prev_obs: Option<E::Obs>,
}

impl<E: Env> StepProcessor<E> for SimpleStepProcessor<E> {
    type Config = SimpleStepProcessorConfig;
    type Output = Transition<E::Obs, E::Act>;

    fn build(_config: &Self::Config) -> Self {
        Self { prev_obs: None }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs);
    }

    fn process(&mut self, step: Step<E>) -> Result<Self::Output> {
        let obs = self
            .prev_obs
            .take()
            .ok_or(ArcadeError::StepProcessorNotReset)?;
        let next_obs = match step.is_terminated {
            true => NextObs::Terminal,
            false => NextObs::Continuing(step.obs.clone()),
        };

        if !step.is_done() {
            self.prev_obs = Some(step.obs);
        }

        Ok(Transition::new(obs, step.act, next_obs, step.reward))
    }
}
