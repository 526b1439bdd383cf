//! A Pong-like arcade game for the arcade DQN trainer.
//!
//! The game renders 210x160 RGB frames like the Atari 2600. Observations are
//! preprocessed as in the standard Atari pipeline:
//!
//! 1. the frame is converted to grayscale,
//! 2. resized to 84x84,
//! 3. and stacked with the three previous frames.
//!
//! On reset the first frame fills all four slots of the stack.
//!
//! The agent controls the right paddle with [`ArcadeAct::Noop`], [`ArcadeAct::Up`]
//! and [`ArcadeAct::Down`]. A point won gives reward `+1`, a point lost `-1`.
//! The episode terminates when a side reaches
//! [`points_to_win`](ArcadeEnvConfig::points_to_win) and is truncated after
//! [`max_steps`](ArcadeEnvConfig::max_steps) steps.
//!
//! ```no_run
//! use anyhow::Result;
//! use arcade_core::{Env as _, Policy, DefaultEvaluator, Evaluator as _};
//! use arcade_env::{ArcadeAct, ArcadeEnv, ArcadeEnvConfig, ArcadeObs};
//!
//! struct AlwaysUp;
//!
//! impl Policy<ArcadeEnv> for AlwaysUp {
//!     fn sample(&mut self, _: &ArcadeObs) -> Result<ArcadeAct> {
//!         Ok(ArcadeAct::Up)
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let env_config = ArcadeEnvConfig::default().points_to_win(5);
//!     let mut evaluator = DefaultEvaluator::<ArcadeEnv>::new(&env_config, 0, 3)?;
//!     let record = evaluator.evaluate(&mut AlwaysUp)?;
//!     println!("{:?}", record.get_scalar("eval_reward")?);
//!     Ok(())
//! }
//! ```
mod act;
mod env;
mod obs;
mod preprocess;
pub use act::ArcadeAct;
pub use env::{ArcadeEnv, ArcadeEnvConfig, Score};
pub use obs::ArcadeObs;
pub use preprocess::{warp_and_grayscale, FrameStack, FRAME_SIZE, N_STACK};
