mod config;
mod game;
use crate::{
    preprocess::{warp_and_grayscale, FrameStack},
    ArcadeAct, ArcadeObs,
};
use anyhow::Result;
use arcade_core::{
    error::ArcadeError,
    record::{Record, RecordValue::Scalar},
    Env, Step,
};
pub use config::ArcadeEnvConfig;
use game::Game;
pub use game::Score;
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Pong against a built-in opponent, observed through stacked grayscale frames.
///
/// The episode is terminated when a side reaches
/// [`ArcadeEnvConfig::points_to_win`]. It is truncated, not terminated, after
/// [`ArcadeEnvConfig::max_steps`] steps.
///
/// The record of every step holds the points of both sides as `agent_points` and
/// `opponent_points`.
pub struct ArcadeEnv {
    config: ArcadeEnvConfig,

    // Game state, including the random number generator of serves
    game: Game,

    // Buffer for stacking frames
    frames: FrameStack,

    // Steps in the current episode
    n_steps: usize,

    // For sampling random actions
    rng: StdRng,
}

impl ArcadeEnv {
    /// Points in the current episode.
    pub fn score(&self) -> Score {
        self.game.score
    }

    fn observe(&self) -> Vec<u8> {
        warp_and_grayscale(&self.game.render())
    }
}

impl Env for ArcadeEnv {
    type Config = ArcadeEnvConfig;
    type Obs = ArcadeObs;
    type Act = ArcadeAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.name != "pong" {
            return Err(ArcadeError::UnknownEnv(config.name.clone()).into());
        }
        info!("Build {} environment with seed {}", config.name, seed);

        let seed = seed as u64;
        let mut env = Self {
            config: config.clone(),
            game: Game::new(seed),
            frames: FrameStack::default(),
            n_steps: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        let frame = env.observe();
        env.frames.reset(&frame);

        Ok(env)
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        if let Some(seed) = seed {
            self.game.reseed(seed);
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.game.reset();
        self.n_steps = 0;

        let frame = self.observe();
        self.frames.reset(&frame);

        Ok(self.frames.as_slice().to_vec().into())
    }

    fn step(&mut self, act: &Self::Act) -> Result<(Step<Self>, Record)> {
        let mut reward = 0f32;
        let mut is_terminated = false;

        for _ in 0..self.config.frame_skip.max(1) {
            let r = self.game.step(*act);
            if r != 0.0 {
                let score = self.game.score;
                debug!("Point: {}-{}", score.agent, score.opponent);
            }
            reward += r;
            if self.game.score.max() >= self.config.points_to_win {
                is_terminated = true;
                break;
            }
        }
        self.n_steps += 1;
        let is_truncated = !is_terminated && self.n_steps >= self.config.max_steps;

        let frame = self.observe();
        self.frames.push(&frame);

        let step = Step::new(
            self.frames.as_slice().to_vec().into(),
            *act,
            reward,
            is_terminated,
            is_truncated,
            (),
        );

        let score = self.game.score;
        let record = Record::from_slice(&[
            ("agent_points", Scalar(score.agent as f32)),
            ("opponent_points", Scalar(score.opponent as f32)),
        ]);

        Ok((step, record))
    }

    fn n_actions(&self) -> usize {
        ArcadeAct::N
    }

    fn sample_act(&mut self) -> Self::Act {
        ArcadeAct::from(self.rng.gen_range(0..ArcadeAct::N as i64))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run(env: &mut ArcadeEnv, seed: u64, n: usize) -> Result<Vec<(ArcadeObs, f32)>> {
        env.reset(Some(seed))?;
        (0..n)
            .map(|i| {
                let (step, _) = env.step(&ArcadeAct::from(i as i64 % 3))?;
                Ok((step.obs, step.reward))
            })
            .collect()
    }

    #[test]
    fn test_unknown_env() {
        let config = ArcadeEnvConfig::default().name("breakout");
        assert!(ArcadeEnv::build(&config, 0).is_err());
    }

    #[test]
    fn test_reset_stacks_first_frame() -> Result<()> {
        let mut env = ArcadeEnv::build(&ArcadeEnvConfig::default(), 0)?;
        let obs = env.reset(Some(1))?;
        assert_eq!(obs.frames().len(), 4 * 84 * 84);
        for i in 1..4 {
            assert_eq!(obs.frame(i), obs.frame(0));
        }

        // the newest frame goes to the last slot
        let (step, _) = env.step(&ArcadeAct::Up)?;
        assert_eq!(step.obs.frame(2), obs.frame(0));
        assert_ne!(step.obs.frame(3), obs.frame(0));

        Ok(())
    }

    #[test]
    fn test_reset_seed_reproduces_episode() -> Result<()> {
        let config = ArcadeEnvConfig::default();
        let mut env1 = ArcadeEnv::build(&config, 0)?;
        let mut env2 = ArcadeEnv::build(&config, 99)?;

        let r1 = run(&mut env1, 5, 200)?;
        let r2 = run(&mut env2, 5, 200)?;
        assert_eq!(r1, r2);
        assert_eq!(env1.reset(Some(5))?, env2.reset(Some(5))?);

        Ok(())
    }

    #[test]
    fn test_truncation() -> Result<()> {
        let config = ArcadeEnvConfig::default().max_steps(3);
        let mut env = ArcadeEnv::build(&config, 0)?;
        env.reset(Some(0))?;

        for i in 1..=3 {
            let (step, _) = env.step(&ArcadeAct::Noop)?;
            assert!(!step.is_terminated);
            assert_eq!(step.is_truncated, i == 3);
        }

        Ok(())
    }

    #[test]
    fn test_termination() -> Result<()> {
        let config = ArcadeEnvConfig::default().points_to_win(1);
        let mut env = ArcadeEnv::build(&config, 0)?;
        env.reset(Some(0))?;

        // the agent stays at the top and misses a ball coming low
        env.game.agent_y = 34;
        env.game.ball.y = 170;
        env.game.ball.vx = 2;
        env.game.ball.vy = 0;

        let mut total = 0f32;
        for _ in 0..100 {
            let (step, record) = env.step(&ArcadeAct::Up)?;
            total += step.reward;
            if step.is_done() {
                assert!(step.is_terminated);
                assert!(!step.is_truncated);
                assert_eq!(total, -1.0);
                assert_eq!(env.score(), Score { agent: 0, opponent: 1 });
                assert_eq!(record.get_scalar("agent_points")?, 0.0);
                assert_eq!(record.get_scalar("opponent_points")?, 1.0);
                return Ok(());
            }
        }

        panic!("the episode did not terminate");
    }

    #[test]
    fn test_sample_act() -> Result<()> {
        let mut env = ArcadeEnv::build(&ArcadeEnvConfig::default(), 0)?;
        let acts = (0..100).map(|_| i64::from(env.sample_act())).collect::<Vec<_>>();
        assert!((0..3).all(|a| acts.contains(&a)));
        Ok(())
    }
}
