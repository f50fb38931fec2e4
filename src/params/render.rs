//! Window and drawing configuration.

/// Linear RGBA color
pub type Color = [f32; 4];

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Colors and stroke widths of the epicycle drawing
#[derive(Debug, Clone)]
pub struct DrawStyle {
    pub background: Color,

    /// Reference circle outline around each arm's origin
    pub circle_color: Color,
    pub circle_width_px: f32,

    /// Arm from each origin to its tip
    pub arm_color: Color,
    pub arm_width_px: f32,

    /// Scrolling trace of the endpoint's height
    pub trail_color: Color,
    pub trail_width_px: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            circle_color: [0.5, 0.5, 0.5, 1.0],
            circle_width_px: 2.0,
            arm_color: [1.0, 1.0, 1.0, 1.0],
            arm_width_px: 4.0,
            trail_color: [1.0, 0.0, 0.0, 1.0],
            trail_width_px: 4.0,
        }
    }
}
