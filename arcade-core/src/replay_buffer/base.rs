//! Simple generic replay buffer.
use super::{SimpleReplayBufferConfig, Transition, TransitionBatch};
use crate::{error::ArcadeError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A fixed-capacity ring buffer of transitions.
///
/// While the buffer is not full, transitions are appended. After that, a pushed
/// transition overwrites the oldest one. Batches are drawn uniformly at random
/// without replacement, so a batch never contains the same stored transition twice.
pub struct SimpleReplayBuffer<O, A> {
    capacity: usize,

    /// Index at which the next transition is written.
    i: usize,

    data: Vec<Transition<O, A>>,
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A> {
    /// The maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns an iterator over the stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<O, A>> {
        let (newer, older) = match self.data.len() == self.capacity {
            true => self.data.split_at(self.i),
            false => self.data.split_at(0),
        };
        older.iter().chain(newer.iter())
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A> {
    type Item = Transition<O, A>;

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.data.len() < self.capacity {
            self.data.push(tr);
        } else {
            self.data[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;

        Ok(())
    }
}

impl<O: Clone, A: Clone> ReplayBufferBase for SimpleReplayBuffer<O, A> {
    type Config = SimpleReplayBufferConfig;
    type Batch = TransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Result<Self> {
        if config.capacity == 0 {
            return Err(ArcadeError::ZeroCapacity.into());
        }

        Ok(Self {
            capacity: config.capacity,
            i: 0,
            data: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        let len = self.data.len();
        if size > len {
            return Err(ArcadeError::InsufficientTransitions {
                batch_size: size,
                len,
            }
            .into());
        }

        let ixs = index::sample(&mut self.rng, len, size);
        Ok(ixs.into_iter().map(|ix| self.data[ix].clone()).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::replay_buffer::NextObs;
    use std::collections::HashSet;

    type Buffer = SimpleReplayBuffer<usize, usize>;

    fn tr(id: usize) -> Transition<usize, usize> {
        Transition::new(id, id % 3, NextObs::Continuing(id + 1), id as f32)
    }

    fn buffer(capacity: usize) -> Buffer {
        let config = SimpleReplayBufferConfig::default().capacity(capacity).seed(42);
        Buffer::build(&config).unwrap()
    }

    #[test]
    fn test_zero_capacity() {
        let config = SimpleReplayBufferConfig::default().capacity(0);
        assert!(Buffer::build(&config).is_err());
    }

    #[test]
    fn test_fifo_eviction() -> Result<()> {
        let mut buf = buffer(3);
        for id in 1..=5 {
            buf.push(tr(id))?;
        }

        assert_eq!(buf.len(), 3);
        let ids = buf.iter().map(|t| t.obs).collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 4, 5]);

        Ok(())
    }

    #[test]
    fn test_oldest_retained() -> Result<()> {
        let (c, n) = (7, 30);
        let mut buf = buffer(c);
        for id in 1..=n {
            buf.push(tr(id))?;
            assert!(buf.len() <= c);
        }

        assert_eq!(buf.len(), c);
        assert_eq!(buf.iter().next().unwrap().obs, n - c + 1);
        assert_eq!(buf.iter().last().unwrap().obs, n);

        Ok(())
    }

    #[test]
    fn test_not_full_keeps_order() -> Result<()> {
        let mut buf = buffer(10);
        for id in 0..4 {
            buf.push(tr(id))?;
        }
        let ids = buf.iter().map(|t| t.obs).collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        Ok(())
    }

    #[test]
    fn test_batch_without_replacement() -> Result<()> {
        let mut buf = buffer(20);
        for id in 0..20 {
            buf.push(tr(id))?;
        }

        for size in [1, 5, 20] {
            let batch = buf.batch(size)?;
            assert_eq!(batch.len(), size);
            let ids = batch.obs.iter().collect::<HashSet<_>>();
            assert_eq!(ids.len(), size);
            for (o, r) in batch.obs.iter().zip(batch.reward.iter()) {
                assert_eq!(*o as f32, *r);
            }
        }

        Ok(())
    }

    #[test]
    fn test_batch_from_underfilled_buffer() -> Result<()> {
        let mut buf = buffer(10);
        buf.push(tr(0))?;
        buf.push(tr(1))?;

        assert!(buf.batch(3).is_err());
        assert_eq!(buf.batch(2)?.len(), 2);

        Ok(())
    }
}
