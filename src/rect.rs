//! Rectangles.

use cgmath::{EuclideanSpace, Point2, Vector2, Zero};

/// A rectangle in a control's parent coordinate system (y points down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top left corner.
    pub location: Point2<f64>,

    pub size: Vector2<f64>,
}

impl Rect {
    pub fn new(location: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { location, size }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub fn zero() -> Rect {
        Rect {
            location: Point2::origin(),
            size: Vector2::zero(),
        }
    }

    pub fn with_location(&self, location: Point2<f64>) -> Rect {
        Rect {
            location,
            size: self.size,
        }
    }

    pub fn with_size(&self, size: Vector2<f64>) -> Rect {
        Rect {
            location: self.location,
            size,
        }
    }
}

impl Default for Rect {
    fn default() -> Rect {
        Rect::zero()
    }
}

#[test]
fn test_rect() {
    let a = Rect::new((10., 10.).into(), (20., 10.).into());
    let moved = a.with_location((0., 5.).into());
    assert_eq!(moved, Rect::new((0., 5.).into(), (20., 10.).into()));
    assert_eq!(moved.with_size((1., 2.).into()).location, Point2::new(0., 5.));
    assert_eq!(Rect::default(), Rect::zero());
}
