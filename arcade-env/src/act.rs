//! Action for [`ArcadeEnv`](crate::ArcadeEnv).
use arcade_core::Act;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Action for [`ArcadeEnv`](crate::ArcadeEnv), moving the paddle of the agent.
pub enum ArcadeAct {
    /// The paddle stays.
    Noop,

    /// The paddle moves up.
    Up,

    /// The paddle moves down.
    Down,
}

impl ArcadeAct {
    /// The number of actions.
    pub const N: usize = 3;

    /// Vertical velocity of the paddle in pixels per frame.
    pub(crate) fn dy(&self) -> i32 {
        match self {
            Self::Noop => 0,
            Self::Up => -4,
            Self::Down => 4,
        }
    }
}

impl Act for ArcadeAct {}

/// Indices out of `0..3` are mapped to [`ArcadeAct::Noop`].
impl From<i64> for ArcadeAct {
    fn from(ix: i64) -> Self {
        match ix {
            1 => Self::Up,
            2 => Self::Down,
            _ => Self::Noop,
        }
    }
}

impl From<ArcadeAct> for i64 {
    fn from(act: ArcadeAct) -> Self {
        match act {
            ArcadeAct::Noop => 0,
            ArcadeAct::Up => 1,
            ArcadeAct::Down => 2,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_index_conversion() {
        for ix in 0..ArcadeAct::N as i64 {
            assert_eq!(i64::from(ArcadeAct::from(ix)), ix);
        }
        assert_eq!(ArcadeAct::from(7), ArcadeAct::Noop);
        assert_eq!(ArcadeAct::from(-1), ArcadeAct::Noop);
    }
}
