//! Configurations of the environment, the agent, the replay buffer and the trainer.
//!
//! Each configuration is read from a YAML file in the configuration directory if the
//! file exists. Defaults are used otherwise.
use crate::args::{Args, DeviceArg, Mode};
use anyhow::Result;
use arcade_candle_agent::{
    cnn::{Cnn, CnnConfig},
    dqn::{DqnConfig, DqnModelConfig},
    opt::OptimizerConfig,
    Device,
};
use arcade_core::{replay_buffer::SimpleReplayBufferConfig, TrainerConfig};
use arcade_env::{ArcadeAct, ArcadeEnvConfig};
use log::info;
use std::path::{Path, PathBuf};

const ENV_FILE: &str = "env.yaml";
const AGENT_FILE: &str = "agent.yaml";
const REPLAY_BUFFER_FILE: &str = "replay_buffer.yaml";
const TRAINER_FILE: &str = "trainer.yaml";

/// All configurations of a run.
pub struct ArcadeConfig {
    pub env: ArcadeEnvConfig,
    pub agent: DqnConfig<Cnn>,
    pub replay_buffer: SimpleReplayBufferConfig,
    pub trainer: TrainerConfig,
}

fn load_or<T>(
    dir: Option<&Path>,
    file: &str,
    load: impl Fn(PathBuf) -> Result<T>,
    default: T,
) -> Result<T> {
    match dir.map(|d| d.join(file)) {
        Some(path) if path.is_file() => load(path),
        _ => Ok(default),
    }
}

/// DQN with the Q-network of the DQN paper.
pub fn default_agent_config() -> DqnConfig<Cnn> {
    let model_config = DqnModelConfig::default()
        .q_config(CnnConfig::new(4, ArcadeAct::N as i64))
        .opt_config(OptimizerConfig::default());
    DqnConfig::default().model_config(model_config)
}

impl ArcadeConfig {
    /// Loads configurations from `dir`.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = dir {
            info!("Load configurations from {:?}", dir);
        }
        Ok(Self {
            env: load_or(dir, ENV_FILE, |p| ArcadeEnvConfig::load(p), Default::default())?,
            agent: load_or(dir, AGENT_FILE, |p| DqnConfig::load(p), default_agent_config())?,
            replay_buffer: load_or(
                dir,
                REPLAY_BUFFER_FILE,
                |p| SimpleReplayBufferConfig::load(p),
                Default::default(),
            )?,
            trainer: load_or(dir, TRAINER_FILE, |p| TrainerConfig::load(p), Default::default())?,
        })
    }

    /// Loads configurations and applies command line arguments.
    ///
    /// In evaluation mode without a configuration directory, the configurations
    /// saved in the model directory at training are used.
    pub fn from_args(args: &Args) -> Result<Self> {
        let dir = match (&args.config_dir, args.mode) {
            (Some(dir), _) => Some(dir.as_path()),
            (None, Mode::Eval) => Some(args.model_dir.as_path()),
            (None, _) => None,
        };
        let mut config = Self::load(dir)?;
        let device = match args.device {
            DeviceArg::Cpu => Device::Cpu,
            DeviceArg::Cuda => Device::Cuda(args.cuda_ordinal),
        };

        config.env = config.env.name(&args.task);
        config.agent = config.agent.out_dim(ArcadeAct::N as i64).device(device);
        config.trainer = config
            .trainer
            .task(&args.task)
            .checkpoint_dir(args.model_dir.join("checkpoint"));
        if let Some(episodes) = args.episodes {
            config.trainer = config.trainer.max_episodes(episodes);
        }

        Ok(config)
    }

    /// Saves configurations into `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        self.env.save(dir.join(ENV_FILE))?;
        self.agent.save(dir.join(AGENT_FILE))?;
        self.replay_buffer.save(dir.join(REPLAY_BUFFER_FILE))?;
        self.trainer.save(dir.join(TRAINER_FILE))?;
        Ok(())
    }

    /// Configurations in YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok([
            format!("# {}\n{}", ENV_FILE, serde_yaml::to_string(&self.env)?),
            format!("# {}\n{}", AGENT_FILE, serde_yaml::to_string(&self.agent)?),
            format!(
                "# {}\n{}",
                REPLAY_BUFFER_FILE,
                serde_yaml::to_string(&self.replay_buffer)?
            ),
            format!("# {}\n{}", TRAINER_FILE, serde_yaml::to_string(&self.trainer)?),
        ]
        .join("\n"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;
    use tempdir::TempDir;

    #[test]
    fn test_defaults() -> Result<()> {
        let config = ArcadeConfig::load(None)?;
        assert_eq!(config.env, ArcadeEnvConfig::default());
        assert_eq!(config.trainer, TrainerConfig::default());
        assert_eq!(config.replay_buffer.capacity, 50000);
        assert_eq!(config.agent, default_agent_config());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new("arcade_config")?;
        let args = Args::parse_from([
            "arcade",
            "--episodes",
            "7",
            "--model-dir",
            dir.path().to_str().unwrap(),
        ]);
        let config = ArcadeConfig::from_args(&args)?;
        assert_eq!(config.trainer.max_episodes, 7);
        assert_eq!(config.trainer.checkpoint_dir, dir.path().join("checkpoint"));
        config.save(dir.path())?;

        let config_ = ArcadeConfig::load(Some(dir.path()))?;
        assert_eq!(config_.env, config.env);
        assert_eq!(config_.agent, config.agent);
        assert_eq!(config_.trainer, config.trainer);
        assert!(config_.to_yaml()?.contains("# agent.yaml"));

        Ok(())
    }
}
