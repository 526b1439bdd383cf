//! Configuration of DQN agent.
use super::{explorer::EpsilonGreedy, DqnModelConfig};
use crate::{
    model::SubModel1,
    util::{CriticLoss, OutDim},
    Device,
};
use anyhow::Result;
use candle_core::Tensor;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};

/// Configuration of [`Dqn`](super::Dqn) agent.
///
/// `Q` is the type of the Q-network and need not implement `Debug`, `PartialEq` or `Clone`.
#[derive(Deserialize, Serialize)]
pub struct DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    pub(super) model_config: DqnModelConfig<Q::Config>,
    pub(super) batch_size: usize,
    pub(super) discount_factor: f64,
    pub(super) tau: f64,
    pub(super) train: bool,
    pub(super) explorer: EpsilonGreedy,
    #[serde(default)]
    pub(super) grad_clip: Option<f64>,
    pub(super) critic_loss: CriticLoss,
    pub(super) seed: u64,
    pub device: Option<Device>,
    #[serde(skip)]
    phantom: PhantomData<Q>,
}

impl<Q> Clone for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn clone(&self) -> Self {
        Self {
            model_config: self.model_config.clone(),
            batch_size: self.batch_size,
            discount_factor: self.discount_factor,
            tau: self.tau,
            train: self.train,
            explorer: self.explorer.clone(),
            grad_clip: self.grad_clip,
            critic_loss: self.critic_loss.clone(),
            seed: self.seed,
            device: self.device,
            phantom: PhantomData,
        }
    }
}

impl<Q> PartialEq for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.model_config == other.model_config
            && self.batch_size == other.batch_size
            && self.discount_factor == other.discount_factor
            && self.tau == other.tau
            && self.train == other.train
            && self.explorer == other.explorer
            && self.grad_clip == other.grad_clip
            && self.critic_loss == other.critic_loss
            && self.seed == other.seed
            && self.device == other.device
    }
}

impl<Q> std::fmt::Debug for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DqnConfig")
            .field("model_config", &self.model_config)
            .field("batch_size", &self.batch_size)
            .field("discount_factor", &self.discount_factor)
            .field("tau", &self.tau)
            .field("train", &self.train)
            .field("explorer", &self.explorer)
            .field("grad_clip", &self.grad_clip)
            .field("critic_loss", &self.critic_loss)
            .field("seed", &self.seed)
            .field("device", &self.device)
            .finish()
    }
}

impl<Q> Default for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// Constructs DQN config with default parameters.
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            batch_size: 256,
            discount_factor: 0.99,
            tau: 0.005,
            train: false,
            explorer: EpsilonGreedy::default(),
            grad_clip: Some(100.0),
            critic_loss: CriticLoss::SmoothL1,
            seed: 525,
            device: None,
            phantom: PhantomData,
        }
    }
}

impl<Q> DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// Batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Soft update coefficient.
    pub fn tau(mut self, v: f64) -> Self {
        self.tau = v;
        self
    }

    /// Explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, model_config: DqnModelConfig<Q::Config>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets the output dimention of the dqn model of the DQN agent.
    pub fn out_dim(mut self, out_dim: i64) -> Self {
        let model_config = self.model_config.clone();
        self.model_config = model_config.out_dim(out_dim);
        self
    }

    /// Elementwise gradient clipping, `None` disables clipping.
    pub fn grad_clip(mut self, v: Option<f64>) -> Self {
        self.grad_clip = v;
        self
    }

    /// Critic loss.
    pub fn critic_loss(mut self, v: CriticLoss) -> Self {
        self.critic_loss = v;
        self
    }

    /// Seed of the random number generator used in exploration.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Loads [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of DQN agent from {:?}", path_);
        Ok(b)
    }

    /// Saves [`DqnConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of DQN agent into {:?}", path_);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        cnn::{Cnn, CnnConfig},
        opt::OptimizerConfig,
    };
    use tempdir::TempDir;

    #[test]
    fn test_serde_dqn_config() -> Result<()> {
        let model_config = DqnModelConfig::default()
            .q_config(CnnConfig::new(4, 3))
            .out_dim(6)
            .opt_config(OptimizerConfig::default().learning_rate(1e-4));
        let config = DqnConfig::<Cnn>::default()
            .model_config(model_config)
            .batch_size(32)
            .tau(0.01)
            .explorer(EpsilonGreedy::default().eps_decay(1000.0))
            .device(Device::Cpu);

        let dir = TempDir::new("dqn_config")?;
        let path = dir.path().join("dqn_config.yaml");
        config.save(&path)?;
        let config_ = DqnConfig::<Cnn>::load(&path)?;
        assert_eq!(config, config_);
        assert_eq!(config_.model_config.q_config.map(|c| c.out_dim), Some(6));

        Ok(())
    }
}
