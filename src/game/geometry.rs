//! Axis-aligned boxes and overlap tests

use serde::Serialize;

/// Axis-aligned box, `(x, y)` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Open-interval intersection; shared edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Overlap test over optional boxes, false when either side is absent
pub fn overlap(a: Option<&Aabb>, b: Option<&Aabb>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.intersects(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Aabb::new(x, y, w, h))
    }

    #[test]
    fn test_overlapping_boxes() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlap(Some(&a), Some(&b)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
        assert!(!overlap(Some(&a), Some(&right)));
        assert!(!overlap(Some(&a), Some(&below)));
    }

    #[test]
    fn test_contained_box_overlaps() {
        let outer = Aabb::new(0.0, 0.0, 100.0, 100.0);
        let inner = Aabb::new(40.0, 40.0, 5.0, 5.0);
        assert!(overlap(Some(&outer), Some(&inner)));
    }

    #[test]
    fn test_absent_box_never_overlaps() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlap(None, Some(&a)));
        assert!(!overlap(Some(&a), None));
        assert!(!overlap(None, None));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(overlap(Some(&a), Some(&b)), overlap(Some(&b), Some(&a)));
        }

        #[test]
        fn prop_absent_is_false(a in arb_box()) {
            prop_assert!(!overlap(Some(&a), None));
            prop_assert!(!overlap(None, Some(&a)));
        }
    }
}
