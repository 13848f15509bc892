use cuspid_inference::utils::graph::Point;
use log::debug;
use num::Float;
use serde::{Deserialize, Serialize};

/// A segment between two anatomical points, used both as an axis and as a
/// sector boundary.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line<T: Float> {
    pub start: Point<T>,
    pub end: Point<T>,
}

/// `a·x + b·y + c = 0`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImplicitLine<T: Float> {
    pub a: T,
    pub b: T,
    pub c: T,
}

impl<T: Float> ImplicitLine<T> {
    /// Signed evaluation of the line equation; the sign tells the half-plane.
    pub fn signed_side(&self, point: &Point<T>) -> T {
        self.a * point.x + self.b * point.y + self.c
    }
}

impl<T: Float> Line<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }

    /// Line joining the midpoints of two root points and of two crown points.
    pub fn between_pairs(
        root_a: &Point<T>,
        root_b: &Point<T>,
        crown_a: &Point<T>,
        crown_b: &Point<T>,
    ) -> Self {
        Self::new(root_a.midpoint(root_b), crown_a.midpoint(crown_b))
    }

    pub fn implicit(&self) -> ImplicitLine<T> {
        let (p1, p2) = (&self.start, &self.end);
        ImplicitLine {
            a: p2.y - p1.y,
            b: p1.x - p2.x,
            c: p2.x * p1.y - p1.x * p2.y,
        }
    }

    pub fn direction(&self) -> (T, T) {
        (self.end.x - self.start.x, self.end.y - self.start.y)
    }

    pub fn length(&self) -> T {
        self.start.distance(&self.end)
    }

    /// Unsigned angle between the two directions in degrees, within `[0, 180]`.
    ///
    /// Returns `None` when either line has zero length.
    pub fn angle_between(&self, other: &Line<T>) -> Option<T> {
        let (x1, y1) = self.direction();
        let (x2, y2) = other.direction();

        let magnitude = x1.hypot(y1) * x2.hypot(y2);
        if magnitude == T::zero() || !magnitude.is_finite() {
            debug!("Angle requested for a degenerate line");
            return None;
        }

        let cos = ((x1 * x2 + y1 * y2) / magnitude)
            .max(-T::one())
            .min(T::one());

        Some(cos.acos().to_degrees())
    }

    /// Perpendicular distance from `point` to the infinite line.
    ///
    /// A zero-length line degenerates to the distance between the two points.
    pub fn distance_to(&self, point: &Point<T>) -> T {
        let length = self.length();
        if length == T::zero() {
            debug!("Distance requested to a zero-length line");
            return point.distance(&self.start);
        }

        let (x1, y1) = (self.start.x, self.start.y);
        let (x2, y2) = (self.end.x, self.end.y);

        ((y2 - y1) * point.x - (x2 - x1) * point.y + x2 * y1 - y2 * x1).abs() / length
    }
}
