//! Transition `(o_t, a_t, o_t+1, r_t)`.

/// The observation following an action.
///
/// A transition that ends an episode by termination has no next observation,
/// so its continuation value is zero. Truncated episodes keep
/// [`NextObs::Continuing`], as the state after truncation is still a valid state.
#[derive(Debug, Clone, PartialEq)]
pub enum NextObs<O> {
    /// The episode continues from the given observation.
    Continuing(O),

    /// The episode terminated.
    Terminal,
}

impl<O> NextObs<O> {
    /// Returns `true` for [`NextObs::Terminal`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }

    /// Returns the observation if the episode continues.
    pub fn as_obs(&self) -> Option<&O> {
        match self {
            Self::Continuing(obs) => Some(obs),
            Self::Terminal => None,
        }
    }
}

/// A transition stored in a replay buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O, A> {
    /// Observation `o_t`.
    pub obs: O,

    /// Action `a_t`.
    pub act: A,

    /// Next observation `o_t+1`.
    pub next_obs: NextObs<O>,

    /// Reward `r_t`.
    pub reward: f32,
}

impl<O, A> Transition<O, A> {
    /// Constructs a transition.
    pub fn new(obs: O, act: A, next_obs: NextObs<O>, reward: f32) -> Self {
        Self {
            obs,
            act,
            next_obs,
            reward,
        }
    }
}
