//! Collision geometry shared by the mini-games
//!
//! Fighters use axis-aligned rectangles for bodies and hitboxes. Precision Cut
//! measures how far the clippers are from a target path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// True if the interiors overlap. Touching edges don't count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Closest point to `p` on the segment `a`-`b`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `p` to the nearest point of an open polyline.
///
/// Returns `f32::INFINITY` for an empty path.
pub fn distance_to_polyline(p: Vec2, points: &[Vec2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => p.distance(*only),
        _ => points
            .windows(2)
            .map(|w| p.distance(closest_point_on_segment(p, w[0], w[1])))
            .fold(f32::INFINITY, f32::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 0.0, 5.0, 5.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_rect_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_rect_center_and_edges() {
        let r = Rect::new(10.0, 20.0, 60.0, 40.0);
        assert_eq!(r.center(), Vec2::new(40.0, 40.0));
        assert_eq!((r.left(), r.right()), (10.0, 70.0));
        assert_eq!((r.top(), r.bottom()), (20.0, 60.0));
    }

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Vec2::new(-5.0, 3.0), a, b), a);
        assert_eq!(closest_point_on_segment(Vec2::new(15.0, 3.0), a, b), b);
        assert_eq!(closest_point_on_segment(Vec2::new(4.0, 3.0), a, b), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_distance_to_polyline() {
        let path = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        assert!((distance_to_polyline(Vec2::new(5.0, 2.0), &path) - 2.0).abs() < 1e-5);
        assert!((distance_to_polyline(Vec2::new(13.0, 5.0), &path) - 3.0).abs() < 1e-5);
        assert_eq!(distance_to_polyline(Vec2::ZERO, &[]), f32::INFINITY);
        assert!((distance_to_polyline(Vec2::new(3.0, 4.0), &[Vec2::ZERO]) - 5.0).abs() < 1e-5);
    }
}
