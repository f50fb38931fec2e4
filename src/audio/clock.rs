//! Elapsed-time source driven by the number of frames actually rendered.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Audio-clock time shared from the audio callback to the display thread
#[derive(Debug, Default)]
pub struct AudioClock {
    frames: AtomicU64,
    sample_rate_hz: AtomicU32,
}

impl AudioClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero and start counting at the given rate.
    pub fn start(&self, sample_rate_hz: u32) {
        self.frames.store(0, Ordering::Relaxed);
        self.sample_rate_hz.store(sample_rate_hz, Ordering::Relaxed);
    }

    #[inline]
    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Seconds of audio rendered so far, or `None` before the clock has a
    /// positive sample rate.
    pub fn current_time(&self) -> Option<f64> {
        let rate = self.sample_rate_hz.load(Ordering::Relaxed);
        if rate == 0 {
            return None;
        }
        Some(self.frames.load(Ordering::Relaxed) as f64 / rate as f64)
    }
}
