//! Bounded history of the trajectory endpoint's height.

use glam::Vec2;
use std::collections::VecDeque;

/// Sliding window of endpoint y-coordinates, oldest first, holding at most
/// one entry per horizontal pixel of the viewport.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    values: VecDeque<f32>,
    width: usize,
}

impl TrailBuffer {
    pub fn new(viewport_width: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(viewport_width + 1),
            width: viewport_width,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Follow a viewport resize, evicting the oldest entries if it shrank.
    pub fn set_width(&mut self, viewport_width: usize) {
        self.width = viewport_width;
        self.evict();
    }

    /// Append the latest endpoint height and drop anything beyond the width.
    pub fn push(&mut self, y: f32) {
        self.values.push_back(y);
        self.evict();
    }

    fn evict(&mut self) {
        while self.values.len() > self.width {
            self.values.pop_front();
        }
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.values.iter().copied()
    }

    /// Polyline points for drawing: entry `j` sits at `anchor_x - (len - j)`,
    /// so the newest entry is one pixel left of the anchor.
    pub fn points(&self, anchor_x: f32) -> impl Iterator<Item = Vec2> + '_ {
        let len = self.values.len();
        self.values
            .iter()
            .enumerate()
            .map(move |(j, &y)| Vec2::new(anchor_x - (len - j) as f32, y))
    }
}
