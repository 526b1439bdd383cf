//! Configuration of [`Trainer`](super::Trainer).
use super::CheckpointConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of episodes to run.
    pub max_episodes: usize,

    /// Base seed. Episode `i` resets the environment with `seed + i`.
    pub seed: u64,

    /// Task name used in checkpoint file names.
    pub task: String,

    /// Directory of checkpoints.
    pub checkpoint_dir: PathBuf,

    /// Checkpoint cadence.
    pub checkpoint: CheckpointConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_episodes: 600,
            seed: 525,
            task: "pong".to_string(),
            checkpoint_dir: PathBuf::from("./checkpoint"),
            checkpoint: CheckpointConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Sets the number of episodes.
    pub fn max_episodes(mut self, v: usize) -> Self {
        self.max_episodes = v;
        self
    }

    /// Sets the base seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the task name.
    pub fn task(mut self, v: impl Into<String>) -> Self {
        self.task = v.into();
        self
    }

    /// Sets the directory of checkpoints.
    pub fn checkpoint_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.checkpoint_dir = v.into();
        self
    }

    /// Sets the configuration of checkpointing.
    pub fn checkpoint(mut self, v: CheckpointConfig) -> Self {
        self.checkpoint = v;
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .max_episodes(100)
            .seed(42)
            .task("breakout")
            .checkpoint_dir("some/directory")
            .checkpoint(CheckpointConfig::default().interval(25));

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");

        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
