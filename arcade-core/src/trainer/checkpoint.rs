//! Decides at which episodes [`Trainer`](super::Trainer) persists the agent.
use super::EpisodeStats;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// A predicate evaluated at the end of every episode.
pub trait CheckpointPolicy {
    /// Returns `true` if a checkpoint should be written after `episode`.
    fn should_save(&self, episode: usize, stats: &EpisodeStats) -> bool;
}

/// Saves a checkpoint every `n` episodes. `n == 0` disables checkpointing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EveryNEpisodes(pub usize);

impl CheckpointPolicy for EveryNEpisodes {
    fn should_save(&self, episode: usize, _stats: &EpisodeStats) -> bool {
        self.0 > 0 && episode % self.0 == 0
    }
}

/// Never saves a checkpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSave;

impl CheckpointPolicy for NeverSave {
    fn should_save(&self, _episode: usize, _stats: &EpisodeStats) -> bool {
        false
    }
}

/// Configuration of checkpointing.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CheckpointConfig {
    /// Interval of checkpoints in episodes.
    pub interval: usize,

    /// The number of recent episodes averaged into the reward tag of a checkpoint.
    pub reward_window: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            interval: 50,
            reward_window: 10,
        }
    }
}

impl CheckpointConfig {
    /// Sets the interval of checkpoints in episodes.
    pub fn interval(mut self, v: usize) -> Self {
        self.interval = v;
        self
    }

    /// Sets the window of the trailing average reward.
    pub fn reward_window(mut self, v: usize) -> Self {
        self.reward_window = v;
        self
    }

    /// The policy saving every [`interval`](Self::interval) episodes.
    pub fn policy(&self) -> EveryNEpisodes {
        EveryNEpisodes(self.interval)
    }

    /// Constructs [`CheckpointConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CheckpointConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// File stem of a checkpoint, `DQN_{task}_{episode}_{avg}`.
///
/// `avg` is truncated toward zero.
pub fn checkpoint_stem(task: &str, episode: usize, avg_reward: f32) -> String {
    format!("DQN_{}_{}_{}", task, episode, avg_reward as i64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_every_n_episodes() {
        let stats = EpisodeStats::default();
        let policy = CheckpointConfig::default().policy();
        assert!(!policy.should_save(1, &stats));
        assert!(!policy.should_save(49, &stats));
        assert!(policy.should_save(50, &stats));
        assert!(policy.should_save(100, &stats));
        assert!(!EveryNEpisodes(0).should_save(50, &stats));
        assert!(!NeverSave.should_save(50, &stats));
    }

    #[test]
    fn test_checkpoint_stem() {
        assert_eq!(checkpoint_stem("pong", 50, -20.7), "DQN_pong_50_-20");
        assert_eq!(checkpoint_stem("pong", 100, 3.9), "DQN_pong_100_3");
    }
}
