//! Train [`Agent`].
mod checkpoint;
mod config;
mod sampler;
mod state;
use crate::{
    error::ArcadeError,
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
pub use checkpoint::{
    checkpoint_stem, CheckpointConfig, CheckpointPolicy, EveryNEpisodes, NeverSave,
};
pub use config::TrainerConfig;
use log::{debug, info};
pub use sampler::{Sampler, StepOutcome};
pub use state::{EpisodeStats, EpisodeSummary, TrainerState};
use std::{
    path::PathBuf,
    time::{Duration, SystemTime},
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop and related objects.
///
/// # Training loop
///
/// Training runs episode by episode, `max_episodes` times:
///
/// 1. EpisodeStart: the environment is reset with seed `seed + episode`, where
///    `episode` starts from 1.
/// 2. StepLoop, until the episode is terminated or truncated:
///     1. The agent samples an action and the environment is stepped.
///        The transition is pushed into the replay buffer. A terminated step
///        produces [`NextObs::Terminal`] as the next observation.
///     2. [`Agent::opt`] is called. The agent skips the optimization step while the
///        buffer holds fewer transitions than a batch.
///     3. [`Agent::update_target`] blends the target network toward the trained one.
/// 3. EpisodeEnd: the duration and the cumulative reward are recorded together with
///    the latest values of the records emitted by the environment. If the
///    [`CheckpointPolicy`] says so, the agent is saved in `checkpoint_dir` with the
///    file stem `DQN_{task}_{episode}_{avg}`, where `avg` is the trailing average
///    reward over `reward_window` episodes, truncated toward zero.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|Transition|D[ReplayBuffer]
///     D -->|TransitionBatch|A
/// ```
///
/// [`NextObs::Terminal`]: crate::replay_buffer::NextObs::Terminal
pub struct Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Configuration of the transition producer.
    step_proc_config: P::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: R::Config,

    max_episodes: usize,

    seed: u64,

    task: String,

    checkpoint_dir: PathBuf,

    reward_window: usize,

    checkpoint_policy: Box<dyn CheckpointPolicy>,
}

impl<E, P, R> Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Constructs a trainer.
    ///
    /// Checkpoints are written every `config.checkpoint.interval` episodes unless
    /// another policy is given with [`Trainer::checkpoint_policy`].
    pub fn build(
        config: TrainerConfig,
        env_config: E::Config,
        step_proc_config: P::Config,
        replay_buffer_config: R::Config,
    ) -> Self {
        Self {
            env_config,
            step_proc_config,
            replay_buffer_config,
            max_episodes: config.max_episodes,
            seed: config.seed,
            task: config.task,
            checkpoint_dir: config.checkpoint_dir,
            reward_window: config.checkpoint.reward_window,
            checkpoint_policy: Box::new(config.checkpoint.policy()),
        }
    }

    /// Replaces the checkpoint policy.
    pub fn checkpoint_policy(mut self, policy: impl CheckpointPolicy + 'static) -> Self {
        self.checkpoint_policy = Box::new(policy);
        self
    }

    fn save_checkpoint<A: Agent<E, R>>(
        &self,
        agent: &A,
        episode: usize,
        stats: &EpisodeStats,
    ) -> Result<()> {
        let avg = stats.trailing_mean_reward(self.reward_window);
        let stem = checkpoint_stem(&self.task, episode, avg);
        std::fs::create_dir_all(&self.checkpoint_dir)?;
        let paths = agent.save_checkpoint(&self.checkpoint_dir, &stem)?;
        info!("{}, save model, reward:{}", episode, avg as i64);
        debug!("Checkpoint files: {:?}", paths);
        Ok(())
    }

    /// Runs the episode following `state.episode` and returns the updated state.
    pub fn run_episode<A>(
        &mut self,
        mut state: TrainerState,
        agent: &mut A,
        sampler: &mut Sampler<E, P>,
        buffer: &mut R,
        recorder: &mut dyn Recorder,
    ) -> Result<TrainerState>
    where
        A: Agent<E, R>,
    {
        let episode = state.episode + 1;
        sampler.reset(self.seed + episode as u64)?;

        let mut total_reward = 0f32;
        let mut duration = 0;
        let mut losses = Vec::new();
        let mut env_record = Record::empty();
        let mut env_time = Duration::new(0, 0);
        let mut model_time = Duration::new(0, 0);

        loop {
            let timer = SystemTime::now();
            let outcome = sampler.sample_and_push(agent, buffer)?;
            env_time += timer.elapsed()?;
            state.env_steps += 1;
            duration += 1;
            total_reward += outcome.reward;
            let is_done = outcome.is_done();
            env_record.merge_inplace(outcome.record);

            let timer = SystemTime::now();
            if let Some(record) = agent.opt(buffer)? {
                state.opt_steps += 1;
                if let Ok(loss) = record.get_scalar("loss") {
                    losses.push(loss);
                }
            }
            agent.update_target()?;
            model_time += timer.elapsed()?;

            if is_done {
                break;
            }
        }

        state.episode = episode;
        state.stats.push(EpisodeSummary {
            episode,
            reward: total_reward,
            duration,
        });

        let mut record = env_record;
        record.merge_inplace(Record::from_slice(&[
            ("episode", Scalar(episode as f32)),
            ("reward", Scalar(total_reward)),
            ("duration", Scalar(duration as f32)),
            ("env_secs", Scalar(env_time.as_secs_f32())),
            ("model_secs", Scalar(model_time.as_secs_f32())),
            ("env_steps", Scalar(state.env_steps as f32)),
            ("opt_steps", Scalar(state.opt_steps as f32)),
        ]));
        if !losses.is_empty() {
            let loss = losses.iter().sum::<f32>() / losses.len() as f32;
            record.insert("loss", Scalar(loss));
        }
        record.merge_inplace(agent.info());

        info!(
            "episode: {} \tdurations: {}\trewards: {} \ttimes: {:.2}",
            episode,
            duration,
            total_reward,
            (env_time + model_time).as_secs_f32()
        );
        recorder.write(record);

        if self.checkpoint_policy.should_save(episode, &state.stats) {
            self.save_checkpoint(agent, episode, &state.stats)?;
        }

        Ok(state)
    }

    /// Trains the agent for `max_episodes` episodes.
    ///
    /// Fails before the first step if the agent and the environment disagree on the
    /// number of actions.
    pub fn train<A>(&mut self, agent: &mut A, recorder: &mut dyn Recorder) -> Result<TrainerState>
    where
        A: Agent<E, R>,
    {
        let env = E::build(&self.env_config, self.seed as i64)?;
        let producer = P::build(&self.step_proc_config);
        let mut sampler = Sampler::new(env, producer);
        if let Some(n) = agent.n_actions() {
            let n_env = sampler.env().n_actions();
            if n != n_env {
                return Err(ArcadeError::ActionSpaceMismatch {
                    env: n_env,
                    agent: n,
                }
                .into());
            }
        }
        let mut buffer = R::build(&self.replay_buffer_config)?;
        let mut state = TrainerState::default();
        agent.train();

        while state.episode < self.max_episodes {
            state = self.run_episode(state, agent, &mut sampler, &mut buffer, recorder)?;
        }
        recorder.flush();

        Ok(state)
    }
}
