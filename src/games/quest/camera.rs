//! Viewport that follows the player across the world.

use super::stage::{WORLD_HEIGHT, WORLD_WIDTH};

pub const VIEW_WIDTH: f64 = 960.0;
pub const VIEW_HEIGHT: f64 = 540.0;

const FOLLOW_X: f64 = 0.1;
const DEAD_ZONE: f64 = 100.0;
const FOLLOW_UP: f64 = 0.03;
const FOLLOW_DOWN: f64 = 0.05;

/// Top-left corner of the view in world pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
}

impl Camera {
    /// Ease toward the point (cx, cy). Vertical movement waits until the
    /// point leaves a band around the view centre.
    pub fn follow(&mut self, cx: f64, cy: f64) {
        let target_x = cx - VIEW_WIDTH / 2.0;
        let target_y = cy - VIEW_HEIGHT / 2.0;

        self.x += (target_x - self.x) * FOLLOW_X;

        let view_cy = self.y + VIEW_HEIGHT / 2.0;
        if cy < view_cy - DEAD_ZONE {
            self.y += (target_y - self.y) * FOLLOW_UP;
        } else if cy > view_cy + DEAD_ZONE {
            self.y += (target_y - self.y) * FOLLOW_DOWN;
        }
        self.clamp();
    }

    /// Jump straight to (cx, cy), e.g. on stage load.
    pub fn snap(&mut self, cx: f64, cy: f64) {
        self.x = cx - VIEW_WIDTH / 2.0;
        self.y = cy - VIEW_HEIGHT / 2.0;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.x = self.x.clamp(0.0, WORLD_WIDTH - VIEW_WIDTH);
        self.y = self.y.clamp(0.0, WORLD_HEIGHT - VIEW_HEIGHT);
    }

    /// World point to view-relative fractions in 0.0..1.0, if visible.
    pub fn project(&self, wx: f64, wy: f64) -> Option<(f64, f64)> {
        let fx = (wx - self.x) / VIEW_WIDTH;
        let fy = (wy - self.y) / VIEW_HEIGHT;
        ((0.0..1.0).contains(&fx) && (0.0..1.0).contains(&fy)).then_some((fx, fy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_clamps_to_world() {
        let mut c = Camera::default();
        c.snap(0.0, 0.0);
        assert_eq!((c.x, c.y), (0.0, 0.0));
        c.snap(WORLD_WIDTH, WORLD_HEIGHT);
        assert_eq!((c.x, c.y), (WORLD_WIDTH - VIEW_WIDTH, WORLD_HEIGHT - VIEW_HEIGHT));
    }

    #[test]
    fn horizontal_follow_eases() {
        let mut c = Camera::default();
        c.snap(480.0, 270.0);
        c.follow(580.0, 270.0);
        assert!((c.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_dead_zone() {
        let mut c = Camera::default();
        c.snap(480.0, 400.0);
        let y = c.y;
        c.follow(480.0, 400.0 + DEAD_ZONE);
        assert_eq!(c.y, y);
        c.follow(480.0, 400.0 + DEAD_ZONE + 50.0);
        assert!(c.y > y);
    }

    #[test]
    fn project_outside_is_none() {
        let c = Camera::default();
        assert_eq!(c.project(480.0, 270.0), Some((0.5, 0.5)));
        assert_eq!(c.project(-1.0, 10.0), None);
        assert_eq!(c.project(VIEW_WIDTH, 10.0), None);
    }
}
