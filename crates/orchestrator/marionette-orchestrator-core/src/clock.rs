//! Fixed-rate frame clock for offline rendering.

/// Hands out frames at a fixed `1 / fps` step. Frame times are computed from
/// the index, so they do not drift over long sequences.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameClock {
    fps: u32,
    frame: u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            frame: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Index of the next frame.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Time of frame `index`, in seconds.
    pub fn time_of(&self, index: u64) -> f64 {
        index as f64 / self.fps as f64
    }

    /// Advance one frame, returning its index and start time.
    pub fn tick(&mut self) -> (u64, f64) {
        let index = self.frame;
        self.frame += 1;
        (index, self.time_of(index))
    }

    /// Frames needed to cover `seconds`, rounded up.
    pub fn frames_for(&self, seconds: f32) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        (seconds as f64 * self.fps as f64 - 1e-9).ceil() as u64
    }
}
