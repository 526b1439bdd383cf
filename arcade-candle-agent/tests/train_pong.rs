use anyhow::Result;
use arcade_candle_agent::{
    cnn::{Cnn, CnnConfig},
    dqn::{Dqn, DqnConfig, DqnModel, DqnModelConfig, EpsilonGreedy},
    opt::OptimizerConfig,
    Device,
};
use arcade_core::{
    record::BufferedRecorder,
    replay_buffer::{
        SimpleReplayBuffer, SimpleReplayBufferConfig, SimpleStepProcessor,
        SimpleStepProcessorConfig,
    },
    Agent, CheckpointConfig, DefaultEvaluator, Evaluator as _, Trainer, TrainerConfig,
};
use arcade_env::{ArcadeAct, ArcadeEnv, ArcadeEnvConfig, ArcadeObs};
use tempdir::TempDir;

type Env = ArcadeEnv;
type StepProc = SimpleStepProcessor<Env>;
type ReplayBuffer = SimpleReplayBuffer<ArcadeObs, ArcadeAct>;
type DqnAgent = Dqn<Env, Cnn, ReplayBuffer>;

const BATCH_SIZE: usize = 8;

fn agent_config() -> DqnConfig<Cnn> {
    let model_config = DqnModelConfig::default()
        .q_config(CnnConfig::new(4, ArcadeAct::N as i64))
        .opt_config(OptimizerConfig::default().learning_rate(1e-4));
    DqnConfig::default()
        .model_config(model_config)
        .batch_size(BATCH_SIZE)
        .explorer(EpsilonGreedy::default().eps_decay(100.0))
        .device(Device::Cpu)
}

fn env_config() -> ArcadeEnvConfig {
    ArcadeEnvConfig::default().points_to_win(1).max_steps(20)
}

#[test]
fn test_train_pong() -> Result<()> {
    let dir = TempDir::new("train_pong")?;
    let trainer_config = TrainerConfig::default()
        .max_episodes(2)
        .task("pong")
        .checkpoint_dir(dir.path().join("checkpoint"))
        .checkpoint(CheckpointConfig::default().interval(1).reward_window(1));
    let mut trainer = Trainer::<Env, StepProc, ReplayBuffer>::build(
        trainer_config,
        env_config(),
        SimpleStepProcessorConfig::default(),
        SimpleReplayBufferConfig::default().capacity(100),
    );
    let mut agent = DqnAgent::build(agent_config())?;
    let mut recorder = BufferedRecorder::new();

    let state = trainer.train(&mut agent, &mut recorder)?;

    assert_eq!(state.episode, 2);
    let total_duration: usize = state.stats.iter().map(|s| s.duration).sum();
    assert_eq!(state.env_steps, total_duration);
    assert!(state.env_steps >= BATCH_SIZE);
    assert_eq!(state.opt_steps, state.env_steps - BATCH_SIZE + 1);
    assert_eq!(agent.explorer().n_steps, state.env_steps);

    assert_eq!(recorder.len(), 2);
    for record in recorder.iter() {
        assert!(record.get_scalar("epsilon")? < 0.9);
        assert!(record.get_scalar("reward")?.abs() <= 1.0);
    }
    let last = recorder.iter().last().expect("two records");
    assert!(last.get_scalar("loss")?.is_finite());

    // a full and a parameter-only checkpoint per episode
    let mut files = std::fs::read_dir(dir.path().join("checkpoint"))?
        .map(|e| -> Result<String> { Ok(e?.file_name().to_string_lossy().to_string()) })
        .collect::<Result<Vec<_>>>()?;
    files.sort();
    assert_eq!(files.len(), 4);
    assert!(files.iter().all(|f| f.starts_with("DQN_pong_")));

    let full = files
        .iter()
        .find(|f| f.starts_with("DQN_pong_2_") && f.ends_with(".bin"))
        .expect("checkpoint of episode 2");
    let path = dir.path().join("checkpoint").join(full);
    let restored = DqnModel::<Cnn>::load_full(path, candle_core::Device::Cpu)?;
    assert_eq!(
        restored.params()?.to_data()?,
        agent.qnet_tgt().params()?.to_data()?
    );

    Ok(())
}

#[test]
fn test_save_and_evaluate() -> Result<()> {
    let dir = TempDir::new("evaluate_pong")?;
    let agent = DqnAgent::build(agent_config())?;
    agent.save_params(dir.path())?;

    let mut agent_ = DqnAgent::build(agent_config())?;
    agent_.load_params(dir.path())?;
    agent_.eval();

    let mut evaluator = DefaultEvaluator::<Env>::new(&env_config(), 0, 2)?;
    let reward = evaluator.evaluate(&mut agent_)?.get_scalar("eval_reward")?;
    assert!((-1.0..=1.0).contains(&reward));

    // the greedy agent is deterministic
    let reward_ = evaluator.evaluate(&mut agent_)?.get_scalar("eval_reward")?;
    assert_eq!(reward, reward_);
    assert_eq!(agent_.explorer().n_steps, 0);

    Ok(())
}
