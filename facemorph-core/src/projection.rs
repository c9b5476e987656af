/// Projection of 3D triangles onto the 2D screen plane
use std::fmt::Debug;

use nalgebra::{Matrix3x4, Point2};

use crate::error::{MorphError, Result};
use crate::polygon::Triangle;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A closed 2D outline; the last vertex connects back to the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub vertices: Vec<Point2<f64>>,
}

impl Outline {
    /// Fewer than three vertices cover no area.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }
}

/// Turns a triangle in space into a fillable screen outline.
pub trait Projector: Debug {
    fn project(&self, triangle: &Triangle) -> Outline;

    fn mode(&self) -> ProjectionMode;
}

/// Drops z and divides by the homogeneous w.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrthographicProjector;

impl OrthographicProjector {
    fn matrix() -> Matrix3x4<f64> {
        Matrix3x4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

impl Projector for OrthographicProjector {
    fn project(&self, triangle: &Triangle) -> Outline {
        let m = Self::matrix();
        let vertices = triangle
            .vertices()
            .iter()
            .map(|v| {
                let p = m * v.homogeneous();
                Point2::new(p.x / p.z, p.y / p.z)
            })
            .collect();
        Outline { vertices }
    }

    fn mode(&self) -> ProjectionMode {
        ProjectionMode::Orthographic
    }
}

/// Divides x and y by `z / f` for a focal distance `f`.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveProjector {
    matrix: Matrix3x4<f64>,
}

impl PerspectiveProjector {
    /// Fails unless `focal` is finite and non-zero.
    pub fn new(focal: f64) -> Result<Self> {
        if focal == 0.0 || !focal.is_finite() {
            return Err(MorphError::InvalidFocal(focal));
        }
        Ok(Self {
            matrix: Matrix3x4::new(
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0 / focal, 0.0,
            ),
        })
    }

    pub fn focal(&self) -> f64 {
        1.0 / self.matrix[(2, 2)]
    }
}

impl Projector for PerspectiveProjector {
    /// Vertices with a zero denominator lie at infinity and are left out, so
    /// the outline can have fewer than three vertices.
    fn project(&self, triangle: &Triangle) -> Outline {
        let vertices = triangle
            .vertices()
            .iter()
            .filter_map(|v| {
                let p = self.matrix * v.homogeneous();
                if p.z == 0.0 {
                    return None;
                }
                Some(Point2::new(p.x / p.z, p.y / p.z))
            })
            .collect();
        Outline { vertices }
    }

    fn mode(&self) -> ProjectionMode {
        ProjectionMode::Perspective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn test_orthographic_drops_z() {
        let points = [
            Point::at(0.0, 0.0, 5.0),
            Point::at(10.0, 0.0, 5.0),
            Point::at(0.0, 10.0, 5.0),
        ];
        let outline = OrthographicProjector.project(&Triangle::new([&points[0], &points[1], &points[2]]));
        assert_eq!(
            outline.vertices,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(0.0, 10.0)
            ]
        );
    }

    #[test]
    fn test_orthographic_respects_w() {
        let mut p = Point::at(3.0, 4.0, 0.0);
        p.normalize().unwrap();
        let q = Point::at(0.0, 0.0, 0.0);
        let outline = OrthographicProjector.project(&Triangle::new([&p, &q, &q]));
        assert!((outline.vertices[0].x - 0.6).abs() < 1e-12);
        assert!((outline.vertices[0].y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_perspective_divides_by_depth() {
        let projector = PerspectiveProjector::new(100.0).unwrap();
        assert!((projector.focal() - 100.0).abs() < 1e-9);
        let points = [
            Point::at(10.0, 20.0, 200.0),
            Point::at(10.0, 20.0, 50.0),
            Point::at(-4.0, 8.0, 100.0),
        ];
        let outline = projector.project(&Triangle::new([&points[0], &points[1], &points[2]]));
        assert_eq!(outline.vertices.len(), 3);
        assert!((outline.vertices[0].x - 5.0).abs() < 1e-9);
        assert!((outline.vertices[1].y - 40.0).abs() < 1e-9);
        assert!((outline.vertices[2].x + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_perspective_skips_points_at_infinity() {
        let projector = PerspectiveProjector::new(-400.0).unwrap();
        let points = [
            Point::at(1.0, 1.0, 0.0),
            Point::at(2.0, 1.0, 400.0),
            Point::at(1.0, 2.0, 0.0),
        ];
        let outline = projector.project(&Triangle::new([&points[0], &points[1], &points[2]]));
        assert_eq!(outline.vertices, vec![Point2::new(-2.0, -1.0)]);
        assert!(outline.is_degenerate());
    }

    #[test]
    fn test_perspective_rejects_bad_focal() {
        for focal in [0.0, -0.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                PerspectiveProjector::new(focal),
                Err(MorphError::InvalidFocal(_))
            ));
        }
    }
}
