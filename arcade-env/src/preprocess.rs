//! Preprocessing of raw frames.
use image::{
    imageops::{grayscale, resize, FilterType::Triangle},
    RgbImage,
};

/// Height and width of a preprocessed frame.
pub const FRAME_SIZE: usize = 84;

/// The number of stacked frames in an observation.
pub const N_STACK: usize = 4;

const FRAME_LEN: usize = FRAME_SIZE * FRAME_SIZE;

/// Converts an RGB frame into an 84x84 grayscale frame.
pub fn warp_and_grayscale(img: &RgbImage) -> Vec<u8> {
    let img = grayscale(img);
    let img = resize(&img, FRAME_SIZE as u32, FRAME_SIZE as u32, Triangle);
    img.into_raw()
}

/// The last [`N_STACK`] preprocessed frames, the oldest first.
#[derive(Debug, Clone)]
pub struct FrameStack {
    frames: Vec<u8>,
}

impl Default for FrameStack {
    fn default() -> Self {
        Self {
            frames: vec![0; N_STACK * FRAME_LEN],
        }
    }
}

impl FrameStack {
    /// Fills all slots with the first frame of an episode.
    pub fn reset(&mut self, frame: &[u8]) {
        for slot in self.frames.chunks_exact_mut(FRAME_LEN) {
            slot.copy_from_slice(frame);
        }
    }

    /// Drops the oldest frame and appends `frame`.
    pub fn push(&mut self, frame: &[u8]) {
        self.frames.copy_within(FRAME_LEN.., 0);
        self.frames[(N_STACK - 1) * FRAME_LEN..].copy_from_slice(frame);
    }

    /// Stacked frames.
    pub fn as_slice(&self) -> &[u8] {
        &self.frames
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use image::Rgb;

    fn frame(v: u8) -> Vec<u8> {
        vec![v; FRAME_LEN]
    }

    #[test]
    fn test_warp_and_grayscale() {
        let img = RgbImage::from_pixel(160, 210, Rgb([100, 100, 100]));
        let frame = warp_and_grayscale(&img);
        assert_eq!(frame.len(), FRAME_LEN);
        assert!(frame.iter().all(|&p| p == frame[0]));
        assert!((99..=100).contains(&frame[0]));

        // a bright upper half stays in the upper half
        let img = RgbImage::from_fn(160, 210, |_, y| match y < 105 {
            true => Rgb([255, 255, 255]),
            false => Rgb([0, 0, 0]),
        });
        let frame = warp_and_grayscale(&img);
        assert!(frame[0] >= 254);
        assert_eq!(frame[FRAME_LEN - 1], 0);
    }

    #[test]
    fn test_reset_fills_all_slots() {
        let mut stack = FrameStack::default();
        stack.push(&frame(9));
        stack.reset(&frame(3));
        assert_eq!(stack.as_slice().len(), N_STACK * FRAME_LEN);
        assert!(stack.as_slice().iter().all(|&p| p == 3));
    }

    #[test]
    fn test_push_drops_oldest() {
        let mut stack = FrameStack::default();
        stack.reset(&frame(0));
        for v in 1..=5 {
            stack.push(&frame(v));
        }
        let firsts = stack
            .as_slice()
            .chunks_exact(FRAME_LEN)
            .map(|f| f[0])
            .collect::<Vec<_>>();
        assert_eq!(firsts, vec![2, 3, 4, 5]);
    }
}
