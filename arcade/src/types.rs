//! Concrete types of the trainer.
use arcade_candle_agent::{cnn::Cnn, dqn::Dqn as Dqn_};
use arcade_core::{
    replay_buffer::{SimpleReplayBuffer, SimpleStepProcessor},
    DefaultEvaluator,
};
use arcade_env::{ArcadeAct, ArcadeEnv, ArcadeObs};

pub type Env = ArcadeEnv;
pub type StepProc = SimpleStepProcessor<Env>;
pub type ReplayBuffer = SimpleReplayBuffer<ArcadeObs, ArcadeAct>;
pub type Dqn = Dqn_<Env, Cnn, ReplayBuffer>;
pub type Evaluator = DefaultEvaluator<Env>;
