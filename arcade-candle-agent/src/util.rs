//! Utilities.
use anyhow::{anyhow, Result};
use candle_core::{backprop::GradStore, DType, Tensor, Var};
use candle_nn::VarMap;
use log::trace;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::MutexGuard};
mod named_tensors;
pub use named_tensors::{NamedTensors, TensorData};

/// Critic loss type.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum CriticLoss {
    /// Mean squared error.
    Mse,

    /// Smooth L1 loss.
    SmoothL1,
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: i64);
}

pub(crate) fn lock_vars(vs: &VarMap) -> Result<MutexGuard<'_, HashMap<String, Var>>> {
    vs.data()
        .lock()
        .map_err(|_| anyhow!("Variables of a VarMap are poisoned"))
}

/// Apply soft update on variables.
///
/// Variables are identified by their names and blended with [`NamedTensors::blend`].
///
/// dest = tau * src + (1.0 - tau) * dest
///
/// Fails if a variable of `dest` is missing in `src`.
pub fn track(dest: &VarMap, src: &VarMap, tau: f64) -> Result<()> {
    trace!("track, tau = {}", tau);
    let mut params = NamedTensors::share_from(dest)?;
    params.blend(&NamedTensors::share_from(src)?, tau)?;
    params.copy_to(dest)
}

/// Copies the values of variables in `src` to `dest`.
///
/// Fails if a variable of `dest` is missing in `src`.
pub fn copy(dest: &VarMap, src: &VarMap) -> Result<()> {
    let dest = lock_vars(dest)?;
    let src = lock_vars(src)?;

    for (k, v_dest) in dest.iter() {
        let v_src = src
            .get(k)
            .ok_or_else(|| anyhow!("Variable {} is missing in the source", k))?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}

/// Clips gradients of `vars` elementwise into `[-clip, clip]`.
pub fn clip_grad_value(grads: &mut GradStore, vars: &[Var], clip: f64) -> Result<()> {
    for var in vars {
        if let Some(g) = grads.get(var) {
            let lo = Tensor::new(-clip, g.device())?.to_dtype(g.dtype())?;
            let hi = Tensor::new(clip, g.device())?.to_dtype(g.dtype())?;
            let g = g.broadcast_maximum(&lo)?.broadcast_minimum(&hi)?;
            grads.insert(var, g);
        }
    }
    Ok(())
}

/// See <https://pytorch.org/docs/stable/generated/torch.nn.SmoothL1Loss.html>.
///
/// `beta` is 1 and the loss is averaged over elements.
pub fn smooth_l1_loss(x: &Tensor, y: &Tensor) -> Result<Tensor, candle_core::Error> {
    let device = x.device();
    let d = (x - y)?.abs()?;
    let m1 = d.lt(1.0)?.to_dtype(DType::F32)?.to_device(device)?;
    let m2 = Tensor::try_from(1f32)?
        .to_device(device)?
        .broadcast_sub(&m1)?;
    (((0.5 * m1)? * d.powf(2.0))? + m2 * (d - 0.5))?.mean_all()
}

/// Index of the maximum value, the first one on ties.
///
/// Returns 0 for an empty slice.
pub fn argmax(xs: &[f32]) -> usize {
    let mut best = 0;
    for (i, x) in xs.iter().enumerate() {
        if *x > xs[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::Device;
    use candle_nn::Init;

    fn varmap(values: &[(&str, &[f32])]) -> Result<VarMap> {
        let vm = VarMap::new();
        for (name, v) in values {
            vm.get((v.len(),), name, Init::Const(0.0), DType::F32, &Device::Cpu)?;
            let t = Tensor::from_slice(v, (v.len(),), &Device::Cpu)?;
            vm.data().lock().unwrap().get(*name).unwrap().set(&t)?;
        }
        Ok(vm)
    }

    fn values(vm: &VarMap, name: &str) -> Vec<f32> {
        vm.data().lock().unwrap()[name]
            .as_tensor()
            .to_vec1::<f32>()
            .unwrap()
    }

    #[test]
    fn test_track() -> Result<()> {
        let tau = 0.7;
        let src = varmap(&[("var1", &[1.0, 2.0, 3.0])])?;
        let dest = varmap(&[("var1", &[4.0, 5.0, 6.0])])?;

        track(&dest, &src, tau)?;

        let expected = [1.9f32, 2.9, 3.9];
        for (v, e) in values(&dest, "var1").iter().zip(expected.iter()) {
            assert!((v - e).abs() < 1e-5);
        }
        // the source is untouched
        assert_eq!(values(&src, "var1"), vec![1.0, 2.0, 3.0]);

        Ok(())
    }

    #[test]
    fn test_track_fixed_point() -> Result<()> {
        let src = varmap(&[("w", &[0.25, -1.5]), ("b", &[3.0])])?;
        let dest = varmap(&[("w", &[0.25, -1.5]), ("b", &[3.0])])?;

        track(&dest, &src, 0.005)?;

        assert_eq!(values(&dest, "w"), vec![0.25, -1.5]);
        assert_eq!(values(&dest, "b"), vec![3.0]);

        Ok(())
    }

    #[test]
    fn test_track_convergence() -> Result<()> {
        let tau = 0.1f64;
        let src = varmap(&[("w", &[1.0])])?;
        let dest = varmap(&[("w", &[0.0])])?;

        for n in 1..=20 {
            track(&dest, &src, tau)?;
            let gap = 1.0 - values(&dest, "w")[0] as f64;
            assert!((gap - (1.0 - tau).powi(n)).abs() < 1e-5);
        }

        Ok(())
    }

    #[test]
    fn test_track_missing_variable() -> Result<()> {
        let src = varmap(&[("w", &[1.0])])?;
        let dest = varmap(&[("w", &[0.0]), ("b", &[0.0])])?;

        assert!(track(&dest, &src, 0.5).is_err());
        assert!(copy(&dest, &src).is_err());

        Ok(())
    }

    #[test]
    fn test_copy() -> Result<()> {
        let src = varmap(&[("w", &[1.0, 2.0]), ("b", &[3.0])])?;
        let dest = varmap(&[("w", &[0.0, 0.0]), ("b", &[0.0])])?;

        copy(&dest, &src)?;

        assert_eq!(values(&dest, "w"), vec![1.0, 2.0]);
        assert_eq!(values(&dest, "b"), vec![3.0]);

        // values are copied, not shared
        src.data().lock().unwrap()["b"].set(&Tensor::new(&[5f32], &Device::Cpu)?)?;
        assert_eq!(values(&dest, "b"), vec![3.0]);

        Ok(())
    }

    #[test]
    fn test_clip_grad_value() -> Result<()> {
        let x = Var::new(&[1f32, -2.0, 0.5], &Device::Cpu)?;
        let loss = (x.as_tensor() * 1000.0)?.sum_all()?;
        let mut grads = loss.backward()?;

        clip_grad_value(&mut grads, &[x.clone()], 100.0)?;

        let g = grads.get(&x).unwrap().to_vec1::<f32>()?;
        assert_eq!(g, vec![100.0, 100.0, 100.0]);

        Ok(())
    }

    #[test]
    fn test_smooth_l1_loss() -> Result<()> {
        let x = Tensor::new(&[0.0f32, 0.0, 0.0], &Device::Cpu)?;
        let y = Tensor::new(&[0.5f32, -2.0, 3.0], &Device::Cpu)?;

        // (0.125 + 1.5 + 2.5) / 3
        let loss = smooth_l1_loss(&x, &y)?.to_scalar::<f32>()?;
        assert!((loss - 4.125 / 3.0).abs() < 1e-6);

        Ok(())
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.5, 0.2]), 1);
        assert_eq!(argmax(&[0.7, 0.2, 0.7]), 0);
        assert_eq!(argmax(&[-1.0, 2.0, 2.0]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
