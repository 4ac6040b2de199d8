use glam::{DMat4, DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

pub mod matrix;

/// Translation, rotation and scale of a scene node.
///
/// Rotation is stored as euler angles in degrees, applied X first, then Y, then Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    translation: DVec3,
    rotation: DVec3,
    scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl From<DMat4> for Transform {
    fn from(value: DMat4) -> Self {
        let mut transform = Self::default();
        transform.set_matrix(value);
        transform
    }
}

impl Transform {
    pub fn new(translation: DVec3, rotation: DVec3, scale: DVec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn from_rotation(rotation: DVec3) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    pub fn from_scale(scale: DVec3) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    pub fn get_translation(&self) -> DVec3 {
        self.translation
    }

    pub fn get_rotation(&self) -> DVec3 {
        self.rotation
    }

    pub fn get_scale(&self) -> DVec3 {
        self.scale
    }

    pub fn set_translation(&mut self, translation: DVec3) {
        self.translation = translation;
    }

    pub fn set_rotation(&mut self, rotation: DVec3) {
        self.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: DVec3) {
        self.scale = scale;
    }

    pub fn is_identity(&self) -> bool {
        self.translation == DVec3::ZERO && self.rotation == DVec3::ZERO && self.scale == DVec3::ONE
    }

    pub fn get_quat(&self) -> DQuat {
        euler_degrees_to_quat(self.rotation)
    }

    /// `T * R * S`, the matrix maps a point from node space into parent space.
    pub fn get_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.get_quat(), self.translation)
    }

    pub fn set_matrix(&mut self, matrix: DMat4) {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        let (z, y, x) = rotation.to_euler(EulerRot::ZYX);

        self.translation = translation;
        self.rotation = DVec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees());
        self.scale = scale;
    }
}

pub fn euler_degrees_to_quat(rotation: DVec3) -> DQuat {
    DQuat::from_euler(
        EulerRot::ZYX,
        rotation.z.to_radians(),
        rotation.y.to_radians(),
        rotation.x.to_radians(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_is_identity() {
        let transform = Transform::default();
        assert!(transform.is_identity());
        assert_eq!(transform.get_matrix(), DMat4::IDENTITY);
    }

    #[test]
    fn rotation_applies_x_before_z() {
        let transform = Transform::from_rotation(DVec3::new(90.0, 0.0, 90.0));
        let p = transform.get_matrix().transform_point3(DVec3::Y);

        // X rotates +Y onto +Z, the Z rotation then leaves it in place.
        assert!(p.abs_diff_eq(DVec3::Z, 1e-12));
    }

    #[test]
    fn matrix_round_trips_through_set_matrix() {
        let transform = Transform::new(
            DVec3::new(1.0, -2.0, 3.0),
            DVec3::new(10.0, 20.0, 30.0),
            DVec3::new(2.0, 2.0, 2.0),
        );

        let restored = Transform::from(transform.get_matrix());
        assert!(restored.get_translation().abs_diff_eq(transform.get_translation(), 1e-9));
        assert!(restored.get_rotation().abs_diff_eq(transform.get_rotation(), 1e-9));
        assert!(restored.get_scale().abs_diff_eq(transform.get_scale(), 1e-9));
    }

    #[test]
    fn trs_order_scales_before_translating() {
        let transform = Transform::new(DVec3::new(10.0, 0.0, 0.0), DVec3::ZERO, DVec3::splat(2.0));
        let p = transform.get_matrix().transform_point3(DVec3::new(1.0, 0.0, 0.0));
        assert!(p.abs_diff_eq(DVec3::new(12.0, 0.0, 0.0), 1e-12));
    }
}
