use serde::{Deserialize, Serialize};

/// Axis-aligned face rectangle in natural-image pixel coordinates.
///
/// Serialized on the wire as `[x1, y1, x2, y2]`, the order the recognition
/// service reports detections in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// A box only renders if it has strictly positive extent on both axes.
    /// Degenerate boxes are skipped upstream, never divided by.
    pub fn is_renderable(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}

// The wire format is a bare 4-element array, not an object.
impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_extents() {
        let b = BoundingBox::new(10.0, 20.0, 110.0, 170.0);
        assert_relative_eq!(b.width(), 100.0);
        assert_relative_eq!(b.height(), 150.0);
    }

    #[test]
    fn test_center() {
        let b = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let (cx, cy) = b.center();
        assert_relative_eq!(cx, 50.0);
        assert_relative_eq!(cy, 25.0);
    }

    #[rstest]
    #[case::zero_width(BoundingBox::new(10.0, 10.0, 10.0, 60.0), false)]
    #[case::zero_height(BoundingBox::new(10.0, 10.0, 60.0, 10.0), false)]
    #[case::inverted(BoundingBox::new(60.0, 10.0, 10.0, 60.0), false)]
    #[case::positive(BoundingBox::new(10.0, 10.0, 60.0, 60.0), true)]
    fn test_renderable(#[case] b: BoundingBox, #[case] expected: bool) {
        assert_eq!(b.is_renderable(), expected);
    }

    #[test]
    fn test_deserializes_from_array() {
        let b: BoundingBox = serde_json::from_str("[1.0, 2.0, 3.0, 4.0]").unwrap();
        assert_eq!(b, BoundingBox::new(1.0, 2.0, 3.0, 4.0));
    }
}
