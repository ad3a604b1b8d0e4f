//! 2D follow camera clamped to the world bounds.
//!
//! The camera position is the top-left corner of the visible area in world
//! pixels. Following a point centers the view on it, except near the world
//! edges where the camera stops so the point can approach the edge.

use glam::Vec2;

use crate::grid::Grid;

/// Scrolling camera over a bounded world.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec2,
    viewport: Vec2,
    max: Vec2,
}

impl Camera {
    /// Creates a camera at the origin for a world and viewport, both in pixels.
    #[must_use]
    pub fn new(world_size: Vec2, viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
            max: (world_size - viewport).max(Vec2::ZERO),
        }
    }

    /// Creates a camera whose viewport spans `viewport_tiles` tiles of `grid`.
    #[must_use]
    pub fn for_grid(grid: &Grid, viewport_tiles: (u32, u32)) -> Self {
        let tile = grid.tile_size() as f32;
        let viewport = Vec2::new(
            viewport_tiles.0 as f32 * tile,
            viewport_tiles.1 as f32 * tile,
        );
        Self::new(grid.pixel_size(), viewport)
    }

    /// Top-left of the visible area.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Viewport size in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Centers the view on `target`, clamped to the world bounds.
    pub fn follow(&mut self, target: Vec2) {
        let ideal = target - self.viewport / 2.0;
        self.position = ideal.clamp(Vec2::ZERO, self.max);
    }

    /// Moves the camera by `delta` pixels, clamped to the world bounds.
    pub fn translate(&mut self, delta: Vec2) {
        self.position = (self.position + delta).clamp(Vec2::ZERO, self.max);
    }

    /// Converts a world point to viewport coordinates.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point - self.position
    }

    /// Check if a world point is inside the visible area.
    #[must_use]
    pub fn is_visible(&self, point: Vec2) -> bool {
        let local = self.world_to_screen(point);
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.viewport.x && local.y < self.viewport.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        // 20x10 tiles of 128px, 10x6 tile viewport.
        Camera::new(Vec2::new(2560.0, 1280.0), Vec2::new(1280.0, 768.0))
    }

    #[test]
    fn test_follow_centers_in_open_space() {
        let mut cam = camera();
        cam.follow(Vec2::new(1280.0, 640.0));
        assert_eq!(cam.position(), Vec2::new(640.0, 256.0));
    }

    #[test]
    fn test_follow_clamps_at_edges() {
        let mut cam = camera();
        cam.follow(Vec2::new(10.0, 10.0));
        assert_eq!(cam.position(), Vec2::ZERO);

        cam.follow(Vec2::new(5000.0, 5000.0));
        assert_eq!(cam.position(), Vec2::new(1280.0, 512.0));
    }

    #[test]
    fn test_small_world_never_scrolls() {
        let mut cam = Camera::new(Vec2::new(512.0, 512.0), Vec2::new(1280.0, 768.0));
        cam.follow(Vec2::new(400.0, 400.0));
        assert_eq!(cam.position(), Vec2::ZERO);
        cam.translate(Vec2::new(50.0, 50.0));
        assert_eq!(cam.position(), Vec2::ZERO);
    }

    #[test]
    fn test_visibility() {
        let mut cam = camera();
        cam.follow(Vec2::new(1280.0, 640.0));
        assert!(cam.is_visible(Vec2::new(1280.0, 640.0)));
        assert!(!cam.is_visible(Vec2::new(100.0, 100.0)));
        assert_eq!(
            cam.world_to_screen(Vec2::new(700.0, 300.0)),
            Vec2::new(60.0, 44.0)
        );
    }
}
