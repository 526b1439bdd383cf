use super::lock_vars;
use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable content of a tensor, stored as `f32`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TensorData {
    /// Shape of the tensor.
    pub shape: Vec<usize>,

    /// Elements in row-major order.
    pub data: Vec<f32>,
}

/// Model parameters as an ordered map from names to tensors.
///
/// Tensors taken with [`NamedTensors::copy_from`] are copies on CPU, independent of
/// the [`VarMap`] they were taken from.
#[derive(Debug, Clone, Default)]
pub struct NamedTensors {
    /// Tensors keyed by parameter names.
    pub named_tensors: BTreeMap<String, Tensor>,
}

impl NamedTensors {
    /// Copy data of [`VarMap`] to CPU.
    pub fn copy_from(vs: &VarMap) -> Result<Self> {
        let src = lock_vars(vs)?;
        let named_tensors = src
            .iter()
            .map(|(k, v)| -> Result<(String, Tensor)> {
                Ok((k.clone(), v.as_tensor().copy()?.to_device(&Device::Cpu)?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { named_tensors })
    }

    /// Takes the current tensors of [`VarMap`] on their device without copying.
    ///
    /// The tensors share storage with the variables, so they must not be read after
    /// the variables are overwritten.
    pub fn share_from(vs: &VarMap) -> Result<Self> {
        let src = lock_vars(vs)?;
        let named_tensors = src
            .iter()
            .map(|(k, v)| (k.clone(), v.as_tensor().clone()))
            .collect();
        Ok(Self { named_tensors })
    }

    /// Copy named tensors to [`VarMap`].
    ///
    /// Fails if a variable of `vs` has no counterpart.
    pub fn copy_to(&self, vs: &VarMap) -> Result<()> {
        let dest = lock_vars(vs)?;
        for (name, v_dest) in dest.iter() {
            let src = self.get(name)?;
            v_dest.set(&src.to_device(v_dest.device())?)?;
        }
        Ok(())
    }

    /// Returns the tensor of the given name.
    pub fn get(&self, name: &str) -> Result<&Tensor> {
        self.named_tensors
            .get(name)
            .ok_or_else(|| anyhow!("Tensor {} is not found", name))
    }

    /// Blends every tensor toward the tensor of the same name in `src`.
    ///
    /// self = tau * src + (1.0 - tau) * self
    ///
    /// Fails if a tensor of `self` has no counterpart in `src`.
    pub fn blend(&mut self, src: &NamedTensors, tau: f64) -> Result<()> {
        for (name, t) in self.named_tensors.iter_mut() {
            let t_src = src.get(name)?;
            *t = ((tau * t_src)? + ((1.0 - tau) * &*t)?)?;
        }
        Ok(())
    }

    /// Converts the tensors into a serializable form.
    pub fn to_data(&self) -> Result<BTreeMap<String, TensorData>> {
        self.named_tensors
            .iter()
            .map(|(k, t)| -> Result<(String, TensorData)> {
                let data = TensorData {
                    shape: t.dims().to_vec(),
                    data: t.flatten_all()?.to_dtype(DType::F32)?.to_vec1()?,
                };
                Ok((k.clone(), data))
            })
            .collect()
    }

    /// Constructs tensors on CPU from the serializable form.
    pub fn from_data(data: &BTreeMap<String, TensorData>) -> Result<Self> {
        let named_tensors = data
            .iter()
            .map(|(k, d)| -> Result<(String, Tensor)> {
                let t = Tensor::from_slice(&d.data[..], &d.shape[..], &Device::Cpu)?;
                Ok((k.clone(), t))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { named_tensors })
    }
}
