/// Homogeneous 4x4 transformation matrices
use nalgebra::{Matrix4, Vector3};

use crate::point::Point;

/// One incremental rotation of the viewed face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Up,
    Down,
    Left,
    Right,
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// The rotation matrix for a step of `angle` radians in this direction.
    pub fn matrix(self, angle: f64) -> Matrix4<f64> {
        match self {
            Rotation::Down => Transform::rotation_x(angle),
            Rotation::Up => Transform::rotation_x(-angle),
            Rotation::Left => Transform::rotation_y(angle),
            Rotation::Right => Transform::rotation_y(-angle),
            Rotation::Clockwise => Transform::rotation_z(angle),
            Rotation::CounterClockwise => Transform::rotation_z(-angle),
        }
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn rotation_x(angle: f64) -> Matrix4<f64> {
        Matrix4::new_rotation(Vector3::new(angle, 0.0, 0.0))
    }

    pub fn rotation_y(angle: f64) -> Matrix4<f64> {
        Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
    }

    pub fn rotation_z(angle: f64) -> Matrix4<f64> {
        Matrix4::new_rotation(Vector3::new(0.0, 0.0, angle))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Uniform scale, `diag(s, s, s, 1)`
    pub fn scale_matrix(scalar: f64) -> Matrix4<f64> {
        Matrix4::new_scaling(scalar)
    }

    /// Conjugate `transformation` so it acts about `center` instead of the origin.
    pub fn about(center: &Point, transformation: &Matrix4<f64>) -> Matrix4<f64> {
        let to_origin = Self::translation_matrix(-center.x(), -center.y(), -center.z());
        let to_center = Self::translation_matrix(center.x(), center.y(), center.z());
        to_center * transformation * to_origin
    }
}
