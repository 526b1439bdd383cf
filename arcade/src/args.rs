use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What to run.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Train an agent and save it into the model directory
    Train,

    /// Evaluate the agent saved in the model directory
    Eval,

    /// Print configurations in YAML
    #[value(name = "show_config")]
    ShowConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceArg {
    Cpu,
    Cuda,
}

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Name of the game
    #[arg(default_value = "pong")]
    pub task: String,

    /// What to run
    #[arg(long, value_enum, default_value_t = Mode::Train)]
    pub mode: Mode,

    /// Device on which networks are placed
    #[arg(long, value_enum, ignore_case = true, default_value_t = DeviceArg::Cpu)]
    pub device: DeviceArg,

    /// Ordinal of the CUDA device
    #[arg(long, default_value_t = 0)]
    pub cuda_ordinal: usize,

    /// Directory of YAML files overriding the default configurations
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Directory where logs, checkpoints and the trained agent are saved
    #[arg(long, default_value = "./model")]
    pub model_dir: PathBuf,

    /// The number of training episodes
    #[arg(long)]
    pub episodes: Option<usize>,

    /// The number of evaluation episodes
    #[arg(long, default_value_t = 5)]
    pub eval_episodes: usize,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "arcade",
            "--mode",
            "show_config",
            "--device",
            "Cuda",
            "--episodes",
            "3",
            "pong",
        ]);
        assert_eq!(args.mode, Mode::ShowConfig);
        assert_eq!(args.device, DeviceArg::Cuda);
        assert_eq!(args.episodes, Some(3));
        assert_eq!(args.task, "pong");

        let args = Args::parse_from(["arcade"]);
        assert_eq!(args.mode, Mode::Train);
        assert_eq!(args.device, DeviceArg::Cpu);
        assert_eq!(args.model_dir, PathBuf::from("./model"));
    }
}
