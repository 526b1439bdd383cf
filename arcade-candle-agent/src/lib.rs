//! DQN agent implemented with [candle](https://crates.io/crates/candle-core).
//!
//! * [`dqn::Dqn`] - the agent, holding a Q-network and its target network.
//! * [`cnn::Cnn`] - the convolutional Q-network of the DQN paper for stacked 84x84 frames.
//! * [`util::NamedTensors`] - model parameters as an ordered map from names to tensors.
pub mod cnn;
pub mod dqn;
pub mod model;
pub mod opt;
pub mod util;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Default, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    #[default]
    Cpu,

    /// The GPU device with the given ordinal.
    Cuda(usize),
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}
