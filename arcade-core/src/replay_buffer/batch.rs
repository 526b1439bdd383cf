//! Batch of transitions.
use super::{NextObs, Transition};

/// A batch of transitions, stored column-wise.
pub struct TransitionBatch<O, A> {
    /// Observations.
    pub obs: Vec<O>,

    /// Actions.
    pub act: Vec<A>,

    /// Next observations.
    pub next_obs: Vec<NextObs<O>>,

    /// Rewards.
    pub reward: Vec<f32>,
}

impl<O, A> TransitionBatch<O, A> {
    /// The number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    /// `true` for transitions whose episode continues.
    pub fn non_terminal_mask(&self) -> Vec<bool> {
        self.next_obs.iter().map(|o| !o.is_terminal()).collect()
    }

    /// Unpacks the batch into `(o_t, a_t, o_t+1, r_t)`.
    pub fn unpack(self) -> (Vec<O>, Vec<A>, Vec<NextObs<O>>, Vec<f32>) {
        (self.obs, self.act, self.next_obs, self.reward)
    }
}

impl<O, A> FromIterator<Transition<O, A>> for TransitionBatch<O, A> {
    fn from_iter<I: IntoIterator<Item = Transition<O, A>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let n = iter.size_hint().0;
        let mut batch = Self {
            obs: Vec::with_capacity(n),
            act: Vec::with_capacity(n),
            next_obs: Vec::with_capacity(n),
            reward: Vec::with_capacity(n),
        };
        for tr in iter {
            batch.obs.push(tr.obs);
            batch.act.push(tr.act);
            batch.next_obs.push(tr.next_obs);
            batch.reward.push(tr.reward);
        }
        batch
    }
}
