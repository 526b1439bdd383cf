//! Trains a DQN agent on a pixel-based arcade game.
//!
//! ```bash
//! # Train with default configurations, 600 episodes
//! arcade --mode train pong
//!
//! # Evaluate the agent saved in the model directory
//! arcade --mode eval --model-dir ./model pong
//!
//! # Print configurations, overridden by YAML files in the given directory
//! arcade --mode show_config --config-dir ./config pong
//! ```
mod args;
mod config;
mod types;
use anyhow::Result;
use arcade_core::{Agent, Evaluator as _, Trainer};
use arcade_tensorboard::TensorboardRecorder;
use args::{Args, Mode};
use clap::Parser;
use config::ArcadeConfig;
use log::info;
use std::path::Path;
use types::*;

fn show_config(config: &ArcadeConfig) -> Result<()> {
    println!("CUDA available: {:?}", candle_core::utils::cuda_is_available());
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn train(config: ArcadeConfig, model_dir: &Path) -> Result<()> {
    config.save(model_dir)?;

    let mut agent = Dqn::build(config.agent)?;
    let mut recorder = TensorboardRecorder::new(model_dir);
    let mut trainer = Trainer::<Env, StepProc, ReplayBuffer>::build(
        config.trainer,
        config.env,
        Default::default(),
        config.replay_buffer,
    );

    let state = trainer.train(&mut agent, &mut recorder)?;
    info!(
        "Finished {} episodes, {} steps, {} optimization steps",
        state.episode, state.env_steps, state.opt_steps
    );

    let path = model_dir.join("final");
    agent.save_params(&path)?;
    info!("Save the trained agent in {:?}", path);

    Ok(())
}

fn eval(config: ArcadeConfig, model_dir: &Path, n_episodes: usize) -> Result<()> {
    let mut agent = Dqn::build(config.agent)?;
    agent.load_params(&model_dir.join("final"))?;
    agent.eval();

    let mut evaluator = Evaluator::new(&config.env, config.trainer.seed, n_episodes)?;
    let record = evaluator.evaluate(&mut agent)?;
    info!("Mean return: {}", record.get_scalar("eval_reward")?);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = ArcadeConfig::from_args(&args)?;

    match args.mode {
        Mode::Train => train(config, &args.model_dir),
        Mode::Eval => eval(config, &args.model_dir, args.eval_episodes),
        Mode::ShowConfig => show_config(&config),
    }
}
