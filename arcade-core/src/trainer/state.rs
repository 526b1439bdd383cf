//! State of the training loop carried across episodes.

/// Outcome of a single finished episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    /// Episode index, starting from 1.
    pub episode: usize,

    /// Cumulative reward of the episode.
    pub reward: f32,

    /// The number of environment steps in the episode.
    pub duration: usize,
}

/// History of finished episodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeStats {
    history: Vec<EpisodeSummary>,
}

impl EpisodeStats {
    /// Appends the summary of a finished episode.
    pub fn push(&mut self, summary: EpisodeSummary) {
        self.history.push(summary);
    }

    /// The number of finished episodes.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns `true` if no episode has finished yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Summary of the latest episode.
    pub fn last(&self) -> Option<&EpisodeSummary> {
        self.history.last()
    }

    /// Iterates over the summaries of finished episodes in order.
    pub fn iter(&self) -> impl Iterator<Item = &EpisodeSummary> {
        self.history.iter()
    }

    /// Sum of the rewards of the last `window` episodes divided by `window`.
    ///
    /// While fewer than `window` episodes have finished, missing episodes count
    /// as zero reward. Returns 0 if `window` is 0.
    pub fn trailing_mean_reward(&self, window: usize) -> f32 {
        if window == 0 {
            return 0.0;
        }
        let start = self.history.len().saturating_sub(window);
        let sum: f32 = self.history[start..].iter().map(|s| s.reward).sum();
        sum / window as f32
    }
}

/// Counters and statistics threaded through [`Trainer::run_episode`].
///
/// [`Trainer::run_episode`]: super::Trainer::run_episode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainerState {
    /// Index of the last finished episode, 0 before the first one.
    pub episode: usize,

    /// Total number of environment steps.
    pub env_steps: usize,

    /// Total number of optimization steps actually performed.
    pub opt_steps: usize,

    /// Finished episodes.
    pub stats: EpisodeStats,
}

#[cfg(test)]
mod test {
    use super::*;

    fn stats(rewards: &[f32]) -> EpisodeStats {
        let mut stats = EpisodeStats::default();
        for (i, &reward) in rewards.iter().enumerate() {
            stats.push(EpisodeSummary {
                episode: i + 1,
                reward,
                duration: 10,
            });
        }
        stats
    }

    #[test]
    fn test_trailing_mean_reward() {
        let rewards = (1..=12).map(|r| r as f32).collect::<Vec<_>>();
        let stats = stats(&rewards);
        // mean of 3..=12
        assert_eq!(stats.trailing_mean_reward(10), 7.5);
        assert_eq!(stats.trailing_mean_reward(1), 12.0);
    }

    #[test]
    fn test_trailing_mean_reward_short_history() {
        let stats = stats(&[-21.0, -19.0]);
        assert_eq!(stats.trailing_mean_reward(10), -4.0);
        assert_eq!(EpisodeStats::default().trailing_mean_reward(10), 0.0);
        assert_eq!(stats.trailing_mean_reward(0), 0.0);
    }
}
