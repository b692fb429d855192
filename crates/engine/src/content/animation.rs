use std::sync::Arc;

use super::images::Image;

pub const WALK_FRAME_MS: u64 = 100;
pub const DEATH_FRAME_MS: u64 = 70;

#[derive(Debug, Clone)]
pub struct AnimFrame {
    pub image: Image,
    pub duration_ms: u64,
    end_ms: u64,
}

/// Looping frame sequence. Frame data is shared between clones; the playback
/// cursor is not.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Arc<[AnimFrame]>,
    total_ms: u64,
    elapsed_ms: u64,
    frame_index: usize,
}

impl Animation {
    pub fn new(frames: impl IntoIterator<Item = (Image, u64)>) -> Self {
        let mut total_ms = 0u64;
        let frames = frames
            .into_iter()
            .map(|(image, duration_ms)| {
                total_ms = total_ms.saturating_add(duration_ms);
                AnimFrame {
                    image,
                    duration_ms,
                    end_ms: total_ms,
                }
            })
            .collect::<Vec<_>>();
        Self {
            frames: frames.into(),
            total_ms,
            elapsed_ms: 0,
            frame_index: 0,
        }
    }

    pub fn walking(frames: impl IntoIterator<Item = Image>) -> Self {
        Self::new(frames.into_iter().map(|image| (image, WALK_FRAME_MS)))
    }

    pub fn dying(frames: impl IntoIterator<Item = Image>) -> Self {
        Self::new(frames.into_iter().map(|image| (image, DEATH_FRAME_MS)))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn start(&mut self) {
        self.elapsed_ms = 0;
        self.frame_index = 0;
    }

    pub fn update(&mut self, elapsed_ms: u64) {
        if self.frames.len() <= 1 || self.total_ms == 0 {
            return;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms >= self.total_ms {
            self.elapsed_ms %= self.total_ms;
            self.frame_index = 0;
        }
        while self.elapsed_ms >= self.frames[self.frame_index].end_ms {
            self.frame_index += 1;
        }
    }

    pub fn image(&self) -> Option<&Image> {
        self.frames.get(self.frame_index).map(|frame| &frame.image)
    }

    /// Same frame data, fresh cursor.
    pub fn restarted(&self) -> Self {
        Self {
            frames: Arc::clone(&self.frames),
            total_ms: self.total_ms,
            elapsed_ms: 0,
            frame_index: 0,
        }
    }

    pub fn shares_frames_with(&self, other: &Animation) -> bool {
        Arc::ptr_eq(&self.frames, &other.frames)
    }
}
