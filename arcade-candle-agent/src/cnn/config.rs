use crate::util::OutDim;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Cnn`](super::Cnn).
pub struct CnnConfig {
    /// The number of stacked frames, the input channels of the first layer.
    pub n_stack: i64,

    /// The number of actions.
    pub out_dim: i64,
}

impl CnnConfig {
    /// Constructs [`CnnConfig`].
    pub fn new(n_stack: i64, out_dim: i64) -> Self {
        Self { n_stack, out_dim }
    }
}

impl Default for CnnConfig {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

impl OutDim for CnnConfig {
    /// Gets output dimension.
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    /// Sets output dimension.
    fn set_out_dim(&mut self, v: i64) {
        self.out_dim = v;
    }
}
