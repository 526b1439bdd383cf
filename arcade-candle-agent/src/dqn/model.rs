use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
    util::{clip_grad_value, copy, NamedTensors, OutDim, TensorData},
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`DqnModel`].
pub struct DqnModelConfig<Q>
where
    Q: OutDim,
{
    pub(super) q_config: Option<Q>,
    pub(super) opt_config: OptimizerConfig,
}

impl<Q> Default for DqnModelConfig<Q>
where
    Q: OutDim,
{
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<Q> DqnModelConfig<Q>
where
    Q: DeserializeOwned + Serialize + OutDim,
{
    /// Sets configurations for action-value function.
    pub fn q_config(mut self, v: Q) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets output dimension of the model.
    pub fn out_dim(mut self, v: i64) -> Self {
        if let Some(q_config) = &mut self.q_config {
            q_config.set_out_dim(v);
        }
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`DqnModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnModelConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// A model with its configuration and parameters, written into a single file.
#[derive(Deserialize, Serialize)]
struct FullModel<C> {
    config: C,
    params: BTreeMap<String, TensorData>,
}

/// Action-value function with its optimizer.
pub struct DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    varmap: VarMap,

    // Dimension of the output vector (equal to the number of actions).
    pub(super) out_dim: i64,

    // Action-value function
    q: Q,

    config: DqnModelConfig<Q::Config>,
    opt: Optimizer,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Constructs [`DqnModel`].
    pub fn build(config: DqnModelConfig<Q::Config>, device: Device) -> Result<Self> {
        let q_config = config.q_config.clone().context("q_config is not set.")?;
        let out_dim = q_config.get_out_dim();
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            varmap,
            out_dim,
            q,
            config,
            opt,
        })
    }

    /// Outputs the action-value given observation(s).
    pub fn forward(&self, obs: &Tensor) -> Result<Tensor> {
        self.q.forward(obs)
    }

    /// Backpropagates `loss` and applies an optimizer step.
    ///
    /// If `grad_clip` is given, gradients are clipped elementwise into `[-clip, clip]`
    /// before the update.
    pub fn backward_step(&mut self, loss: &Tensor, grad_clip: Option<f64>) -> Result<()> {
        match grad_clip {
            None => self.opt.backward_step(loss),
            Some(clip) => {
                let mut grads = loss.backward()?;
                clip_grad_value(&mut grads, &self.varmap.all_vars(), clip)?;
                self.opt.step(&grads)
            }
        }
    }

    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Overwrites the parameters with those of `src`.
    pub fn copy_from(&mut self, src: &Self) -> Result<()> {
        copy(&self.varmap, &src.varmap)
    }

    /// Snapshot of the parameters on CPU.
    pub fn params(&self) -> Result<NamedTensors> {
        NamedTensors::copy_from(&self.varmap)
    }

    /// Saves the parameters in safetensors format.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save dqnmodel to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters in safetensors format.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load dqnmodel from {:?}", path.as_ref());
        Ok(())
    }

    /// Saves the configuration and the parameters in a single bincode file.
    pub fn save_full<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let model = FullModel {
            config: &self.config,
            params: self.params()?.to_data()?,
        };
        let mut wtr = BufWriter::new(File::create(&path)?);
        bincode::serialize_into(&mut wtr, &model)?;
        wtr.flush()?;
        info!("Save full dqnmodel to {:?}", path.as_ref());
        Ok(())
    }

    /// Restores a model saved with [`DqnModel::save_full`].
    pub fn load_full<T: AsRef<Path>>(path: T, device: Device) -> Result<Self> {
        let rdr = BufReader::new(File::open(&path)?);
        let model: FullModel<DqnModelConfig<Q::Config>> = bincode::deserialize_from(rdr)?;
        let dqn_model = Self::build(model.config, device)?;
        NamedTensors::from_data(&model.params)?.copy_to(&dqn_model.varmap)?;
        info!("Load full dqnmodel from {:?}", path.as_ref());
        Ok(dqn_model)
    }
}
