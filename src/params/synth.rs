//! Global synthesis and view parameters.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::atomic::AtomicF64;
use crate::error::EditError;

/// Point-in-time copy of the global parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Fundamental frequency (Hz), multiplied by each circle's relative speed.
    /// Zero or negative is allowed.
    pub fundamental_hz: f64,

    /// Pixels per unit of radius
    pub zoom_px: f64,

    /// Output gain (linear)
    pub volume: f64,

    /// Anchor the trail at the viewport center instead of the live endpoint
    pub lock_view: bool,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            fundamental_hz: 110.0,
            zoom_px: 100.0,
            volume: 0.5,
            lock_view: true,
        }
    }
}

/// Live parameters shared by reference between the audio engine, the render
/// loop and the editors. Last write wins; every write is visible to the next
/// tick of each reader.
#[derive(Debug)]
pub struct SharedParams {
    fundamental_hz: AtomicF64,
    zoom_px: AtomicF64,
    volume: AtomicF64,
    lock_view: AtomicBool,
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(SynthParams::default())
    }
}

impl From<SynthParams> for SharedParams {
    fn from(params: SynthParams) -> Self {
        Self::new(params)
    }
}

impl SharedParams {
    pub fn new(initial: SynthParams) -> Self {
        Self {
            fundamental_hz: AtomicF64::new(initial.fundamental_hz),
            zoom_px: AtomicF64::new(initial.zoom_px),
            volume: AtomicF64::new(initial.volume),
            lock_view: AtomicBool::new(initial.lock_view),
        }
    }

    pub fn snapshot(&self) -> SynthParams {
        SynthParams {
            fundamental_hz: self.fundamental_hz(),
            zoom_px: self.zoom_px(),
            volume: self.volume(),
            lock_view: self.lock_view(),
        }
    }

    #[inline]
    pub fn fundamental_hz(&self) -> f64 {
        self.fundamental_hz.load()
    }

    #[inline]
    pub fn zoom_px(&self) -> f64 {
        self.zoom_px.load()
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume.load()
    }

    #[inline]
    pub fn lock_view(&self) -> bool {
        self.lock_view.load(Ordering::Relaxed)
    }

    pub fn set_fundamental_hz(&self, hz: f64) -> Result<(), EditError> {
        self.fundamental_hz.store(finite(hz)?);
        Ok(())
    }

    pub fn set_zoom_px(&self, zoom: f64) -> Result<(), EditError> {
        self.zoom_px.store(finite(zoom)?);
        Ok(())
    }

    pub fn set_volume(&self, volume: f64) -> Result<(), EditError> {
        self.volume.store(finite(volume)?);
        Ok(())
    }

    pub fn set_lock_view(&self, locked: bool) {
        self.lock_view.store(locked, Ordering::Relaxed);
    }

    /// Flip lock-view, returning the new state.
    pub fn toggle_lock_view(&self) -> bool {
        !self.lock_view.fetch_xor(true, Ordering::Relaxed)
    }
}

fn finite(value: f64) -> Result<f64, EditError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditError::NonFinite(value))
    }
}
