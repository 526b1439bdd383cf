#![warn(missing_docs)]
//! Core components of the arcade DQN trainer.
//!
//! This crate defines the interfaces between an environment ([`Env`]), an agent
//! ([`Agent`]) and a replay buffer ([`ReplayBufferBase`]), together with the
//! backend-independent pieces of the training process:
//!
//! * [`replay_buffer`] - a fixed-capacity ring buffer of transitions with uniform
//!   sampling without replacement.
//! * [`Trainer`] - the episode/step training loop.
//! * [`CheckpointPolicy`] - decides at which episodes the target network is persisted.
//! * [`record`] - key-value records used for logging metrics.
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step,
    StepProcessor,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{
    checkpoint_stem, CheckpointConfig, CheckpointPolicy, EpisodeStats, EpisodeSummary,
    EveryNEpisodes, NeverSave, Sampler, StepOutcome, Trainer, TrainerConfig, TrainerState,
};
