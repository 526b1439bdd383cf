//! A generic implementation of replay buffer.
//!
//! [`SimpleReplayBuffer`] is a ring buffer: once it is full, pushing a transition
//! evicts the oldest one. Batches are sampled uniformly without replacement.
mod base;
mod batch;
mod config;
mod step_proc;
mod transition;
pub use base::SimpleReplayBuffer;
pub use batch::TransitionBatch;
pub use config::SimpleReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
pub use transition::{NextObs, Transition};
