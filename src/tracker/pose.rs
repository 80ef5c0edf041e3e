//! World poses and the geometry collaborator that produces them.

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::decoder::NormalizedBox;

const DEGENERATE_EPS: f32 = 1e-12;

/// World-space pose of a detected object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Pose {
    pub fn new(position: Point3<f32>, rotation: UnitQuaternion<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Pose at `position` with identity rotation and unit scale.
    pub fn at(position: Point3<f32>) -> Self {
        Self::new(position, UnitQuaternion::identity(), Vector3::repeat(1.0))
    }
}

/// Viewer used to orient displayed markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    /// Camera at `position` with +Y up.
    pub fn at(position: Point3<f32>) -> Self {
        Self {
            position,
            up: Vector3::y(),
        }
    }

    /// Rotation for a marker at `position` that faces this camera.
    ///
    /// The marker's +Z axis points along the negated view direction, away
    /// from the camera. Returns `None` when the marker sits on the camera or
    /// straight along the up axis.
    pub fn billboard(&self, position: &Point3<f32>) -> Option<UnitQuaternion<f32>> {
        let dir = position - self.position;
        if dir.norm_squared() < DEGENERATE_EPS || dir.cross(&self.up).norm_squared() < DEGENERATE_EPS {
            return None;
        }
        Some(UnitQuaternion::face_towards(&dir, &self.up))
    }
}

/// Converts a normalized detection box into a world pose, typically by ray
/// casting into sensed geometry.
///
/// Returning `None` drops the detection for the current cycle only.
pub trait GeometryResolver {
    fn resolve(&mut self, bbox: &NormalizedBox) -> Option<Pose>;
}

impl<F> GeometryResolver for F
where
    F: FnMut(&NormalizedBox) -> Option<Pose>,
{
    fn resolve(&mut self, bbox: &NormalizedBox) -> Option<Pose> {
        self(bbox)
    }
}
