//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum ArcadeError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// A batch larger than the number of stored transitions was requested.
    #[error("Cannot sample {batch_size} transitions from a buffer holding {len}")]
    InsufficientTransitions {
        /// Requested batch size.
        batch_size: usize,
        /// Number of transitions in the buffer.
        len: usize,
    },

    /// The capacity of a replay buffer must be positive.
    #[error("Replay buffer capacity must be at least 1")]
    ZeroCapacity,

    /// A step processor was used before being reset with an initial observation.
    #[error("Step processor has not been reset")]
    StepProcessorNotReset,

    /// An environment step was requested before the episode was started.
    #[error("Sampler has not been reset at the start of an episode")]
    SamplerNotReset,

    /// The given environment name is not known.
    #[error("Unknown environment: {0}")]
    UnknownEnv(String),

    /// The agent and the environment disagree on the number of actions.
    #[error("Agent selects from {agent} actions, environment has {env}")]
    ActionSpaceMismatch {
        /// The number of actions of the environment.
        env: usize,
        /// The number of actions of the agent.
        agent: usize,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
