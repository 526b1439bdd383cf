//! DQN agent implemented with candle.
use super::{config::DqnConfig, explorer::EpsilonGreedy, model::DqnModel};
use crate::{
    model::SubModel1,
    util::{argmax, smooth_l1_loss, track, CriticLoss, OutDim},
};
use anyhow::Result;
use arcade_core::{
    error::ArcadeError,
    record::Record,
    replay_buffer::{NextObs, TransitionBatch},
    Agent, Env, ExperienceBufferBase, Policy, ReplayBufferBase,
};
use candle_core::{shape::D, DType, Device, Tensor};
use candle_nn::loss::mse;
use log::trace;
use rand::{rngs::SmallRng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};

#[allow(clippy::upper_case_acronyms)]
/// DQN agent implemented with candle.
///
/// The agent holds a Q-network trained by [`Agent::opt`] and a target network
/// following it by soft updates in [`Agent::update_target`]. The target network
/// starts as an exact copy of the Q-network.
///
/// Observations are converted to tensors of shape `[1, ...]` and concatenated along
/// the first axis to make a batch. Actions are indices of the output of the Q-network.
pub struct Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    Tensor: TryFrom<E::Obs, Error = candle_core::Error>,
    E::Act: From<i64>,
    i64: From<E::Act>,
{
    batch_size: usize,
    qnet: DqnModel<Q>,
    qnet_tgt: DqnModel<Q>,
    n_actions: usize,
    train: bool,
    phantom: PhantomData<(E, R)>,
    discount_factor: f64,
    tau: f64,
    grad_clip: Option<f64>,
    explorer: EpsilonGreedy,
    device: Device,
    n_opts: usize,
    critic_loss: CriticLoss,
    rng: SmallRng,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    Tensor: TryFrom<E::Obs, Error = candle_core::Error>,
    E::Act: From<i64>,
    i64: From<E::Act>,
{
    /// Constructs DQN agent.
    ///
    /// Fails if the Q-network has no output or the explorer schedule is invalid.
    pub fn build(config: DqnConfig<Q>) -> Result<Self> {
        config.explorer.validate()?;
        if let Some(q_config) = &config.model_config.q_config {
            let out_dim = q_config.get_out_dim();
            if out_dim < 1 {
                return Err(ArcadeError::InvalidConfig(format!(
                    "the number of actions must be positive, got {}",
                    out_dim
                ))
                .into());
            }
        }
        let device: Device = config.device.unwrap_or_default().try_into()?;
        let qnet = DqnModel::build(config.model_config.clone(), device.clone())?;
        let mut qnet_tgt = DqnModel::build(config.model_config, device.clone())?;
        qnet_tgt.copy_from(&qnet)?;
        let n_actions = qnet.out_dim as usize;

        Ok(Dqn {
            qnet,
            qnet_tgt,
            n_actions,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            tau: config.tau,
            grad_clip: config.grad_clip,
            train: config.train,
            explorer: config.explorer,
            device,
            n_opts: 0,
            critic_loss: config.critic_loss,
            phantom: PhantomData,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// The Q-network.
    pub fn qnet(&self) -> &DqnModel<Q> {
        &self.qnet
    }

    /// The target network.
    pub fn qnet_tgt(&self) -> &DqnModel<Q> {
        &self.qnet_tgt
    }

    /// The explorer in training mode.
    pub fn explorer(&self) -> &EpsilonGreedy {
        &self.explorer
    }

    fn obs_to_tensor(obs: Vec<E::Obs>, device: &Device) -> Result<Tensor> {
        let xs = obs
            .into_iter()
            .map(|o| Tensor::try_from(o))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Tensor::cat(&xs, 0)?.to_device(device)?)
    }

    /// Greedy action for a single observation.
    fn best_action(qnet: &DqnModel<Q>, device: &Device, obs: &E::Obs) -> Result<usize> {
        let x = Tensor::try_from(obs.clone())?.to_device(device)?;
        let q = qnet.forward(&x)?.squeeze(0)?.to_dtype(DType::F32)?;
        Ok(argmax(&q.to_vec1::<f32>()?))
    }

    /// `max_a Q_tgt(o_t+1, a)` for continuing transitions, 0 for terminal ones.
    fn next_state_values(&self, next_obs: Vec<NextObs<E::Obs>>, mask: &[bool]) -> Result<Vec<f32>> {
        let mut values = vec![0f32; next_obs.len()];
        let non_terminal = next_obs
            .into_iter()
            .filter_map(|o| match o {
                NextObs::Continuing(o) => Some(o),
                NextObs::Terminal => None,
            })
            .collect::<Vec<_>>();

        if !non_terminal.is_empty() {
            let x = Self::obs_to_tensor(non_terminal, &self.device)?;
            let q = self
                .qnet_tgt
                .forward(&x)?
                .max(D::Minus1)?
                .to_dtype(DType::F32)?
                .to_vec1::<f32>()?;
            let ixs = mask.iter().enumerate().filter(|(_, m)| **m).map(|(i, _)| i);
            for (i, v) in ixs.zip(q) {
                values[i] = v;
            }
        }

        Ok(values)
    }

    fn update_critic(&mut self, buffer: &mut R) -> Result<f32> {
        let batch = buffer.batch(self.batch_size)?;
        let mask = batch.non_terminal_mask();
        let (obs, act, next_obs, reward) = batch.unpack();
        let batch_size = reward.len();
        trace!(
            "Batch of {} transitions, {} non-terminal",
            batch_size,
            mask.iter().filter(|m| **m).count()
        );

        let pred = {
            let obs = Self::obs_to_tensor(obs, &self.device)?;
            let act = act
                .into_iter()
                .map(|a| i64::from(a) as u32)
                .collect::<Vec<_>>();
            let act = Tensor::from_vec(act, (batch_size, 1), &self.device)?;
            let x = self.qnet.forward(&obs)?;
            x.gather(&act, D::Minus1)?.squeeze(D::Minus1)?
        };

        // Computed outside of the graph, so no gradient flows into the target.
        let tgt = {
            let next_values = self.next_state_values(next_obs, &mask)?;
            let gamma = self.discount_factor as f32;
            let tgt = reward
                .iter()
                .zip(next_values.iter())
                .map(|(r, v)| r + gamma * v)
                .collect::<Vec<_>>();
            Tensor::from_vec(tgt, (batch_size,), &self.device)?
        };

        let loss = match self.critic_loss {
            CriticLoss::Mse => mse(&pred, &tgt)?,
            CriticLoss::SmoothL1 => smooth_l1_loss(&pred, &tgt)?,
        };

        self.qnet.backward_step(&loss, self.grad_clip)?;

        Ok(loss.to_dtype(DType::F32)?.to_scalar::<f32>()?)
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    Tensor: TryFrom<E::Obs, Error = candle_core::Error>,
    E::Act: From<i64>,
    i64: From<E::Act>,
{
    /// Epsilon-greedy in training mode, greedy in evaluation mode.
    ///
    /// The step counter of the explorer advances only in training mode.
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let (qnet, device) = (&self.qnet, &self.device);
        let a = if self.train {
            self.explorer.action(self.n_actions, &mut self.rng, || {
                Self::best_action(qnet, device, obs)
            })?
        } else {
            Self::best_action(qnet, device, obs)?
        };
        Ok((a as i64).into())
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    Tensor: TryFrom<E::Obs, Error = candle_core::Error>,
    E::Act: From<i64>,
    i64: From<E::Act>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut R) -> Result<Option<Record>> {
        if buffer.len() < self.batch_size {
            return Ok(None);
        }

        let loss = self.update_critic(buffer)?;
        self.n_opts += 1;

        Ok(Some(Record::from_scalar("loss", loss)))
    }

    fn update_target(&mut self) -> Result<()> {
        track(self.qnet_tgt.get_varmap(), self.qnet.get_varmap(), self.tau)
    }

    fn n_actions(&self) -> Option<usize> {
        Some(self.n_actions)
    }

    fn info(&self) -> Record {
        Record::from_scalar("epsilon", self.explorer.epsilon() as f32)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save(path.join("qnet.safetensors"))?;
        self.qnet_tgt.save(path.join("qnet_tgt.safetensors"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path.join("qnet.safetensors"))?;
        self.qnet_tgt.load(path.join("qnet_tgt.safetensors"))?;
        Ok(())
    }

    /// Saves the target network in two forms, `{stem}.bin` with the configuration
    /// and `{stem}_state_dict.safetensors` with the parameters only.
    fn save_checkpoint(&self, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
        let full = dir.join(format!("{}.bin", stem));
        let state_dict = dir.join(format!("{}_state_dict.safetensors", stem));
        self.qnet_tgt.save_full(&full)?;
        self.qnet_tgt.save(&state_dict)?;
        Ok(vec![full, state_dict])
    }
}
