use num::{Float, Num};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point<T: Num> {
    pub x: T,
    pub y: T,
}

impl<T: Num> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Float> Point<T> {
    pub fn midpoint(&self, other: &Point<T>) -> Point<T> {
        let two = T::one() + T::one();
        Point {
            x: (self.x + other.x) / two,
            y: (self.y + other.y) / two,
        }
    }

    pub fn distance(&self, other: &Point<T>) -> T {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned box in corner form, serialized as `[x_min, y_min, x_max, y_max]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x_min, y_min, x_max, y_max]: [f32; 4]) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
    }
}

impl BoundingBox {
    pub fn center_x(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }

    pub fn area(&self) -> f32 {
        (self.x_max - self.x_min).max(0.0) * (self.y_max - self.y_min).max(0.0)
    }

    /// Area shared by both boxes, zero when they do not touch.
    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let x_overlap = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let y_overlap = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);

        x_overlap * y_overlap
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn intersection_of_overlapping_boxes() {
        let a = BoundingBox::from([0.0, 0.0, 10.0, 10.0]);
        let b = BoundingBox::from([5.0, 5.0, 15.0, 15.0]);
        assert_relative_eq!(a.intersection_area(&b), 25.0);
        assert_relative_eq!(b.intersection_area(&a), 25.0);
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = BoundingBox::from([0.0, 0.0, 10.0, 10.0]);
        let b = BoundingBox::from([20.0, 20.0, 30.0, 30.0]);
        assert_eq!(a.intersection_area(&b), 0.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn touching_edges_have_no_area() {
        let a = BoundingBox::from([0.0, 0.0, 10.0, 10.0]);
        let b = BoundingBox::from([10.0, 0.0, 20.0, 10.0]);
        assert_eq!(a.intersection_area(&b), 0.0);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = BoundingBox::from([2.0, 3.0, 12.0, 8.0]);
        assert_relative_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn bbox_serializes_as_corner_array() -> anyhow::Result<()> {
        let bbox: BoundingBox = serde_json::from_str("[1.0, 2.0, 3.0, 4.0]")?;
        assert_eq!(bbox.x_min, 1.0);
        assert_eq!(bbox.y_max, 4.0);
        assert_eq!(serde_json::to_string(&bbox)?, "[1.0,2.0,3.0,4.0]");
        Ok(())
    }

    #[test]
    fn midpoint_and_distance() {
        let a = Point::new(0.0_f32, 0.0);
        let b = Point::new(6.0_f32, 8.0);
        assert_eq!(a.midpoint(&b), Point::new(3.0, 4.0));
        assert_relative_eq!(a.distance(&b), 10.0);
    }
}
