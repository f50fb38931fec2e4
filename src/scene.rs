//! Per-frame render loop glue: projects the circles, feeds the trail and
//! emits draw commands for the host surface.

use glam::Vec2;
use std::sync::Arc;

use crate::circles::CircleSet;
use crate::params::{Color, DrawStyle, SharedParams};
use crate::projection::TrajectoryProjector;
use crate::trail::TrailBuffer;

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Drawing primitive in pixel coordinates (origin top-left, y down)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    CircleOutline {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    Line {
        start: Vec2,
        end: Vec2,
        width: f32,
        color: Color,
    },
    Polyline {
        points: Vec<Vec2>,
        width: f32,
        color: Color,
    },
}

/// Display-side task: one [`frame`](Self::frame) per display refresh.
pub struct RenderLoop {
    circles: CircleSet,
    params: Arc<SharedParams>,
    projector: TrajectoryProjector,
    trail: TrailBuffer,
    style: DrawStyle,
}

impl RenderLoop {
    pub fn new(
        circles: CircleSet,
        params: Arc<SharedParams>,
        style: DrawStyle,
        viewport: Viewport,
    ) -> Self {
        Self {
            circles,
            params,
            projector: TrajectoryProjector::new(),
            trail: TrailBuffer::new(viewport.width as usize),
            style,
        }
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// Build this frame's draw list into `commands`: a clear, then a circle
    /// outline and arm per circle, then the trail polyline.
    ///
    /// With no clock yet or no circles only the clear is emitted and the
    /// trail is left untouched. Returns the trajectory endpoint.
    pub fn frame(
        &mut self,
        time_s: Option<f64>,
        viewport: Viewport,
        commands: &mut Vec<DrawCommand>,
    ) -> Option<Vec2> {
        commands.clear();
        commands.push(DrawCommand::Clear(self.style.background));

        self.trail.set_width(viewport.width as usize);

        let circles = self.circles.snapshot();
        let params = self.params.snapshot();
        let center = viewport.center();
        let endpoint = self.projector.project(&circles, &params, time_s, center)?;

        for arm in self.projector.arms() {
            commands.push(DrawCommand::CircleOutline {
                center: arm.origin,
                radius: arm.radius_px.abs(),
                width: self.style.circle_width_px,
                color: self.style.circle_color,
            });
            commands.push(DrawCommand::Line {
                start: arm.origin,
                end: arm.tip,
                width: self.style.arm_width_px,
                color: self.style.arm_color,
            });
        }

        self.trail.push(endpoint.y);

        let anchor_x = if params.lock_view { center.x } else { endpoint.x };
        commands.push(DrawCommand::Polyline {
            points: self.trail.points(anchor_x).collect(),
            width: self.style.trail_width_px,
            color: self.style.trail_color,
        });

        Some(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SynthParams;

    const VIEWPORT: Viewport = Viewport {
        width: 200,
        height: 100,
    };

    fn render_loop(lock_view: bool) -> (RenderLoop, CircleSet) {
        let circles = CircleSet::new();
        let params = Arc::new(SharedParams::new(SynthParams {
            lock_view,
            ..SynthParams::default()
        }));
        let render_loop =
            RenderLoop::new(circles.clone(), params, DrawStyle::default(), VIEWPORT);
        (render_loop, circles)
    }

    fn polyline(commands: &[DrawCommand]) -> &[Vec2] {
        match commands.last() {
            Some(DrawCommand::Polyline { points, .. }) => points.as_slice(),
            other => panic!("expected trail polyline, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_set_only_clears() {
        let (mut render_loop, _circles) = render_loop(true);
        let mut commands = Vec::new();

        let endpoint = render_loop.frame(Some(1.0), VIEWPORT, &mut commands);
        assert_eq!(endpoint, None);
        assert_eq!(commands, vec![DrawCommand::Clear(DrawStyle::default().background)]);
        assert!(render_loop.trail().is_empty());
    }

    #[test]
    fn test_no_clock_only_clears() {
        let (mut render_loop, circles) = render_loop(true);
        circles.add_harmonic_pair();
        let mut commands = Vec::new();

        assert_eq!(render_loop.frame(None, VIEWPORT, &mut commands), None);
        assert_eq!(commands.len(), 1);
        assert!(render_loop.trail().is_empty());
    }

    #[test]
    fn test_command_order() {
        let (mut render_loop, circles) = render_loop(true);
        circles.add_harmonic_pair();
        let mut commands = Vec::new();

        let endpoint = render_loop.frame(Some(0.5), VIEWPORT, &mut commands).unwrap();

        assert_eq!(commands.len(), 6);
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
        for pair in commands[1..5].chunks(2) {
            assert!(matches!(pair[0], DrawCommand::CircleOutline { .. }));
            assert!(matches!(pair[1], DrawCommand::Line { .. }));
        }
        assert_eq!(polyline(&commands), &[Vec2::new(99.0, endpoint.y)]);
    }

    #[test]
    fn test_circle_outline_uses_radius_magnitude() {
        let (mut render_loop, circles) = render_loop(true);
        circles.add(-0.2);
        let mut commands = Vec::new();
        render_loop.frame(Some(0.0), VIEWPORT, &mut commands);

        match &commands[1] {
            DrawCommand::CircleOutline { radius, center, .. } => {
                assert_eq!(*radius, 20.0);
                assert_eq!(*center, VIEWPORT.center());
            }
            other => panic!("expected circle outline, got {:?}", other),
        }
    }

    #[test]
    fn test_trail_bounded_by_viewport_width() {
        let (mut render_loop, circles) = render_loop(true);
        circles.add(1.0);
        let mut commands = Vec::new();

        let narrow = Viewport::new(8, 100);
        for frame in 0..50 {
            render_loop.frame(Some(frame as f64 / 60.0), narrow, &mut commands);
        }
        assert_eq!(render_loop.trail().len(), 8);
        assert_eq!(polyline(&commands).len(), 8);
    }

    #[test]
    fn test_lock_view_changes_only_horizontal_anchor() {
        let (mut locked, locked_circles) = render_loop(true);
        let (mut free, free_circles) = render_loop(false);
        for circles in [&locked_circles, &free_circles] {
            circles.add_with_speed(0.3, 1.0);
            circles.add_with_speed(0.2, 3.0);
        }

        let mut locked_commands = Vec::new();
        let mut free_commands = Vec::new();
        let mut last_endpoint = Vec2::ZERO;
        for frame in 0..20 {
            let time = Some(frame as f64 * 0.1);
            locked.frame(time, VIEWPORT, &mut locked_commands);
            last_endpoint = free.frame(time, VIEWPORT, &mut free_commands).unwrap();
        }

        let locked_points = polyline(&locked_commands);
        let free_points = polyline(&free_commands);
        assert_eq!(locked_points.len(), free_points.len());
        assert_eq!(
            locked.trail().values().collect::<Vec<_>>(),
            free.trail().values().collect::<Vec<_>>()
        );

        let len = locked_points.len() as f32;
        assert_eq!(locked_points[0].x, VIEWPORT.center().x - len);
        assert_eq!(free_points[0].x, last_endpoint.x - len);
        for (l, f) in locked_points.iter().zip(free_points) {
            assert_eq!(l.y, f.y);
        }
    }
}
