use glam::{Mat4, Vec3, Vec4};

use crate::ecs::Component;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians: x is pitch, y is yaw, z is roll.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Translate * Ry * Rx * Rz * Scale, written out column by column.
    pub fn matrix(&self) -> Mat4 {
        let (s1, c1) = self.rotation.y.sin_cos();
        let (s2, c2) = self.rotation.x.sin_cos();
        let (s3, c3) = self.rotation.z.sin_cos();
        let scale = self.scale;
        Mat4::from_cols(
            Vec4::new(
                scale.x * (c1 * c3 + s1 * s2 * s3),
                scale.x * (c2 * s3),
                scale.x * (c1 * s2 * s3 - c3 * s1),
                0.0,
            ),
            Vec4::new(
                scale.y * (c3 * s1 * s2 - c1 * s3),
                scale.y * (c2 * c3),
                scale.y * (c1 * c3 * s2 + s1 * s3),
                0.0,
            ),
            Vec4::new(
                scale.z * (c2 * s1),
                scale.z * (-s2),
                scale.z * (c1 * c2),
                0.0,
            ),
            self.position.extend(1.0),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Component for Transform {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    /// World units per second.
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self { linear }
    }
}

impl Component for Velocity {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spin {
    /// Radians per second around each axis.
    pub rate: Vec3,
}

impl Spin {
    pub fn new(rate: Vec3) -> Self {
        Self { rate }
    }
}

impl Component for Spin {}
