//! Observation of [`ArcadeEnv`](crate::ArcadeEnv).
use crate::preprocess::{FRAME_SIZE, N_STACK};
use arcade_core::Obs;
use std::sync::Arc;

/// Four stacked 84x84 grayscale frames, the oldest first.
///
/// The pixels are shared between clones, as a transition holds both an observation
/// and the next one and consecutive transitions share observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcadeObs {
    frames: Arc<[u8]>,
}

impl ArcadeObs {
    /// Shape of the observation, `[n_stack, height, width]`.
    pub const SHAPE: [usize; 3] = [N_STACK, FRAME_SIZE, FRAME_SIZE];

    /// Pixels in row-major order of [`ArcadeObs::SHAPE`].
    pub fn frames(&self) -> &[u8] {
        &self.frames
    }

    /// The `i`-th frame in the stack.
    pub fn frame(&self, i: usize) -> &[u8] {
        let n = FRAME_SIZE * FRAME_SIZE;
        &self.frames[i * n..(i + 1) * n]
    }
}

impl Obs for ArcadeObs {}

impl From<Vec<u8>> for ArcadeObs {
    fn from(frames: Vec<u8>) -> Self {
        debug_assert_eq!(frames.len(), N_STACK * FRAME_SIZE * FRAME_SIZE);
        Self {
            frames: frames.into(),
        }
    }
}

#[cfg(feature = "candle")]
impl TryFrom<ArcadeObs> for candle_core::Tensor {
    type Error = candle_core::Error;

    /// A `u8` tensor of shape `[1, 4, 84, 84]` on CPU.
    fn try_from(obs: ArcadeObs) -> Result<Self, Self::Error> {
        candle_core::Tensor::from_slice(
            obs.frames(),
            (1, N_STACK, FRAME_SIZE, FRAME_SIZE),
            &candle_core::Device::Cpu,
        )
    }
}
