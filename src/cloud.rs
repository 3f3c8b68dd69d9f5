//! The decoded point cloud and the per-row accumulator that builds it.

use cgmath::Point3;


/// A decoded point cloud: positions and RGBA colors, index aligned and in file
/// row order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    pub positions: Vec<Point3<f32>>,
    pub colors: Vec<[u8; 4]>,
}

impl PointCloud {
    /// Creates an empty point cloud.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Appends one point to both sequences.
    pub fn push(&mut self, point: &Point) {
        self.positions.push(point.position);
        self.colors.push(point.color);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates over `(position, color)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point3<f32>, [u8; 4])> + '_ {
        self.positions.iter().copied().zip(self.colors.iter().copied())
    }
}

/// One point, used as accumulator while decoding rows.
///
/// The decoders create a single `Point` via `Point::default()` before the
/// first row and overwrite the attributes present in the file for every row.
/// Attributes that are never declared thus keep their default for all points:
/// the origin for positions and opaque white for colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Point3<f32>,
    pub color: [u8; 4],
}

impl Default for Point {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 0.0),
            color: [255; 4],
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_point_is_white_origin() {
        let p = Point::default();
        assert_eq!(p.position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(p.color, [255, 255, 255, 255]);
    }

    #[test]
    fn push_keeps_sequences_aligned() {
        let mut cloud = PointCloud::with_capacity(2);
        assert!(cloud.is_empty());

        let mut p = Point::default();
        cloud.push(&p);
        p.position.y = 2.5;
        p.color[0] = 7;
        cloud.push(&p);

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions.len(), cloud.colors.len());

        let points: Vec<_> = cloud.iter().collect();
        assert_eq!(points[0], (Point3::new(0.0, 0.0, 0.0), [255; 4]));
        assert_eq!(points[1], (Point3::new(0.0, 2.5, 0.0), [7, 255, 255, 255]));
    }
}
