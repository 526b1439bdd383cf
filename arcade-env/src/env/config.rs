//! Configuration of [`ArcadeEnv`](super::ArcadeEnv).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// Configurations of [`ArcadeEnv`](super::ArcadeEnv).
pub struct ArcadeEnvConfig {
    /// Name of the game. Only `pong` is available.
    pub name: String,

    /// The episode terminates when a side reaches this number of points.
    pub points_to_win: u32,

    /// The episode is truncated after this number of steps.
    pub max_steps: usize,

    /// The number of frames advanced by an action. Rewards of the frames are summed.
    pub frame_skip: usize,
}

impl Default for ArcadeEnvConfig {
    fn default() -> Self {
        Self {
            name: "pong".to_string(),
            points_to_win: 21,
            max_steps: 27_000,
            frame_skip: 4,
        }
    }
}

impl ArcadeEnvConfig {
    /// Sets the name of the game.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the number of points to win.
    pub fn points_to_win(mut self, v: u32) -> Self {
        self.points_to_win = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the number of frames per action.
    pub fn frame_skip(mut self, v: usize) -> Self {
        self.frame_skip = v;
        self
    }

    /// Constructs [`ArcadeEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ArcadeEnvConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_env_config() -> Result<()> {
        let config = ArcadeEnvConfig::default().points_to_win(5).max_steps(1000);
        let dir = TempDir::new("arcade_env_config")?;
        let path = dir.path().join("env.yaml");
        config.save(&path)?;
        assert_eq!(ArcadeEnvConfig::load(&path)?, config);
        Ok(())
    }
}
