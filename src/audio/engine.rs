//! Per-sample additive synthesis: each circle contributes
//! `cos(phase * fundamental * relative_speed) * radius`.

use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use super::clock::AudioClock;
use crate::circles::{Circle, CircleSet};
use crate::params::SharedParams;

/// Sample generator reading the shared circle set and parameters.
///
/// Runs on the real-time audio thread: no locks, no allocation, and no
/// failure path. Non-finite numbers are dropped from the mix or wrapped away.
pub struct SynthesisEngine {
    circles: CircleSet,
    params: Arc<SharedParams>,
    clock: Option<Arc<AudioClock>>,
    sample_rate_hz: u32,
    /// Phase advance per sample (radians), `π / sample_rate`
    step: f64,
}

impl SynthesisEngine {
    /// Create an engine for the given output rate. A zero rate produces a
    /// zero step, so phases hold still instead of dividing by zero.
    pub fn new(circles: CircleSet, params: Arc<SharedParams>, sample_rate_hz: u32) -> Self {
        let step = if sample_rate_hz > 0 {
            PI / sample_rate_hz as f64
        } else {
            0.0
        };

        Self {
            circles,
            params,
            clock: None,
            sample_rate_hz,
            step,
        }
    }

    /// Publish rendered frame counts to `clock`, restarting it at this
    /// engine's rate.
    pub fn with_clock(mut self, clock: Arc<AudioClock>) -> Self {
        clock.start(self.sample_rate_hz);
        self.clock = Some(clock);
        self
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Fill `out` with consecutive samples.
    ///
    /// Circle membership is snapshotted once per call. Circle fields and the
    /// fundamental and volume are read again for every sample, so edits made
    /// mid-buffer are heard from the next sample on.
    pub fn fill(&mut self, out: &mut [f32]) {
        let circles = self.circles.snapshot();

        for sample in out.iter_mut() {
            let sum = tick(&circles, self.params.fundamental_hz(), self.step);
            let scaled = (sum * self.params.volume()) as f32;
            *sample = if scaled.is_finite() { scaled } else { 0.0 };
        }

        if let Some(ref clock) = self.clock {
            clock.advance(out.len());
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let mut sample = [0.0];
        self.fill(&mut sample);
        sample[0]
    }
}

/// Sum every circle's contribution at its current phase, then advance and
/// wrap each phase.
fn tick(circles: &[Arc<Circle>], fundamental: f64, step: f64) -> f64 {
    let mut sum = 0.0;
    for circle in circles {
        let absolute_speed = fundamental * circle.relative_speed();
        let phase = circle.phase();

        let contribution = (phase * absolute_speed).cos() * circle.radius();
        if contribution.is_finite() {
            sum += contribution;
        }

        circle.set_phase(advance_phase(phase, step, absolute_speed));
    }
    sum
}

/// Period of a circle's phase: `2π / absolute_speed`, or `2π` when that is
/// zero or non-finite (zero fundamental, zero relative speed, NaN).
#[inline]
pub fn phase_modulus(absolute_speed: f64) -> f64 {
    let modulus = TAU / absolute_speed;
    if modulus == 0.0 || !modulus.is_finite() {
        TAU
    } else {
        modulus
    }
}

/// Advance a phase by one step and wrap it into `[0, |modulus|)`.
#[inline]
pub fn advance_phase(phase: f64, step: f64, absolute_speed: f64) -> f64 {
    let next = phase + step;
    let next = if next.is_finite() { next } else { 0.0 };
    next % phase_modulus(absolute_speed)
}
