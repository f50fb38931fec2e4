//! Chained 2D projection of the circle set (the epicycle drawing).

use glam::Vec2;
use std::sync::Arc;

use crate::circles::Circle;
use crate::params::SynthParams;

/// One circle as placed on screen for a single frame (pixels, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arm {
    /// Center of the reference circle (the previous arm's tip)
    pub origin: Vec2,

    /// Signed radius in pixels; the reference circle is drawn at its magnitude
    pub radius_px: f32,

    pub tip: Vec2,
}

/// Walks the circle set tip-to-tail from a common origin.
#[derive(Debug, Default)]
pub struct TrajectoryProjector {
    arms: Vec<Arm>,
}

impl TrajectoryProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project `circles` at `time_s` starting from `origin`, returning the
    /// final tip.
    ///
    /// Returns `None` (and clears the arms) when there is no clock yet or the
    /// set is empty.
    ///
    /// The visual angle is `time * fundamental * relative_speed` read as
    /// degrees, far slower than the audio rotation so the motion stays
    /// visible. It is independent of the circles' audio phase.
    pub fn project(
        &mut self,
        circles: &[Arc<Circle>],
        params: &SynthParams,
        time_s: Option<f64>,
        origin: Vec2,
    ) -> Option<Vec2> {
        self.arms.clear();
        let time_s = time_s?;
        if circles.is_empty() {
            return None;
        }

        let mut position = origin;
        for circle in circles {
            let angle = (time_s * params.fundamental_hz * circle.relative_speed()).to_radians();
            let radius_px = circle.radius() * params.zoom_px;

            // Screen y grows downward, hence the subtraction
            let offset = Vec2::new(
                finite_or_zero(angle.sin() * radius_px),
                finite_or_zero(-angle.cos() * radius_px),
            );
            let tip = position + offset;

            self.arms.push(Arm {
                origin: position,
                radius_px: finite_or_zero(radius_px),
                tip,
            });
            position = tip;
        }

        Some(position)
    }

    /// Arms from the last successful projection, in chain order
    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }
}

fn finite_or_zero(value: f64) -> f32 {
    let value = value as f32;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
