//! Structure-of-arrays math types.
//!
//! Each type stores four logical values, one per `Vec4` lane. Layouts are
//! `#[repr(C)]` and padding free, so slices cast to plain `f32` slices.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3, Vec4};

use super::Transform;

/// Four 3D vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SoaFloat3 {
    pub x: Vec4,
    pub y: Vec4,
    pub z: Vec4,
}

impl SoaFloat3 {
    pub const ZERO: Self = Self::splat(Vec3::ZERO);
    pub const ONE: Self = Self::splat(Vec3::ONE);

    /// Same vector in every lane.
    #[inline]
    pub const fn splat(v: Vec3) -> Self {
        Self {
            x: Vec4::splat(v.x),
            y: Vec4::splat(v.y),
            z: Vec4::splat(v.z),
        }
    }

    /// Transposes four AoS vectors into lanes.
    pub fn from_vectors(v: [Vec3; 4]) -> Self {
        Self {
            x: Vec4::new(v[0].x, v[1].x, v[2].x, v[3].x),
            y: Vec4::new(v[0].y, v[1].y, v[2].y, v[3].y),
            z: Vec4::new(v[0].z, v[1].z, v[2].z, v[3].z),
        }
    }

    /// Vector stored in `lane`.
    #[inline]
    pub fn lane(&self, lane: usize) -> Vec3 {
        Vec3::new(self.x[lane], self.y[lane], self.z[lane])
    }
}

/// Four 4D vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SoaFloat4 {
    pub x: Vec4,
    pub y: Vec4,
    pub z: Vec4,
    pub w: Vec4,
}

impl SoaFloat4 {
    pub const ZERO: Self = Self {
        x: Vec4::ZERO,
        y: Vec4::ZERO,
        z: Vec4::ZERO,
        w: Vec4::ZERO,
    };

    #[inline]
    pub fn splat(v: Vec4) -> Self {
        Self {
            x: Vec4::splat(v.x),
            y: Vec4::splat(v.y),
            z: Vec4::splat(v.z),
            w: Vec4::splat(v.w),
        }
    }

    pub fn from_vectors(v: [Vec4; 4]) -> Self {
        Self {
            x: Vec4::new(v[0].x, v[1].x, v[2].x, v[3].x),
            y: Vec4::new(v[0].y, v[1].y, v[2].y, v[3].y),
            z: Vec4::new(v[0].z, v[1].z, v[2].z, v[3].z),
            w: Vec4::new(v[0].w, v[1].w, v[2].w, v[3].w),
        }
    }

    #[inline]
    pub fn lane(&self, lane: usize) -> Vec4 {
        Vec4::new(self.x[lane], self.y[lane], self.z[lane], self.w[lane])
    }
}

/// Four quaternions.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SoaQuaternion {
    pub x: Vec4,
    pub y: Vec4,
    pub z: Vec4,
    pub w: Vec4,
}

impl SoaQuaternion {
    pub const IDENTITY: Self = Self {
        x: Vec4::ZERO,
        y: Vec4::ZERO,
        z: Vec4::ZERO,
        w: Vec4::ONE,
    };

    pub fn from_quats(q: [Quat; 4]) -> Self {
        Self {
            x: Vec4::new(q[0].x, q[1].x, q[2].x, q[3].x),
            y: Vec4::new(q[0].y, q[1].y, q[2].y, q[3].y),
            z: Vec4::new(q[0].z, q[1].z, q[2].z, q[3].z),
            w: Vec4::new(q[0].w, q[1].w, q[2].w, q[3].w),
        }
    }

    #[inline]
    pub fn lane(&self, lane: usize) -> Quat {
        Quat::from_xyzw(self.x[lane], self.y[lane], self.z[lane], self.w[lane])
    }
}

impl Default for SoaQuaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Four 4x4 matrices, stored as four columns of [`SoaFloat4`].
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SoaFloat4x4 {
    pub cols: [SoaFloat4; 4],
}

impl SoaFloat4x4 {
    pub const IDENTITY: Self = Self {
        cols: [
            SoaFloat4 { x: Vec4::ONE, ..SoaFloat4::ZERO },
            SoaFloat4 { y: Vec4::ONE, ..SoaFloat4::ZERO },
            SoaFloat4 { z: Vec4::ONE, ..SoaFloat4::ZERO },
            SoaFloat4 { w: Vec4::ONE, ..SoaFloat4::ZERO },
        ],
    };

    pub fn from_matrices(m: [Mat4; 4]) -> Self {
        let col = |c: usize| SoaFloat4::from_vectors([m[0].col(c), m[1].col(c), m[2].col(c), m[3].col(c)]);
        Self { cols: [col(0), col(1), col(2), col(3)] }
    }

    pub fn lane(&self, lane: usize) -> Mat4 {
        Mat4::from_cols(
            self.cols[0].lane(lane),
            self.cols[1].lane(lane),
            self.cols[2].lane(lane),
            self.cols[3].lane(lane),
        )
    }
}

impl Default for SoaFloat4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Four affine transforms.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SoaTransform {
    pub translation: SoaFloat3,
    pub rotation: SoaQuaternion,
    pub scale: SoaFloat3,
}

impl SoaTransform {
    pub const IDENTITY: Self = Self {
        translation: SoaFloat3::ZERO,
        rotation: SoaQuaternion::IDENTITY,
        scale: SoaFloat3::ONE,
    };

    pub fn from_transforms(t: [Transform; 4]) -> Self {
        Self {
            translation: SoaFloat3::from_vectors(t.map(|t| t.translation)),
            rotation: SoaQuaternion::from_quats(t.map(|t| t.rotation)),
            scale: SoaFloat3::from_vectors(t.map(|t| t.scale)),
        }
    }

    #[inline]
    pub fn lane(&self, lane: usize) -> Transform {
        Transform {
            translation: self.translation.lane(lane),
            rotation: self.rotation.lane(lane),
            scale: self.scale.lane(lane),
        }
    }
}

impl Default for SoaTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(std::mem::size_of::<SoaFloat3>(), 12 * 4);
        assert_eq!(std::mem::size_of::<SoaFloat4>(), 16 * 4);
        assert_eq!(std::mem::size_of::<SoaQuaternion>(), 16 * 4);
        assert_eq!(std::mem::size_of::<SoaFloat4x4>(), 64 * 4);
        assert_eq!(std::mem::size_of::<SoaTransform>(), 40 * 4);
    }

    #[test]
    fn test_transform_lanes() {
        let transforms = [
            Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            Transform::new(Vec3::ZERO, Quat::from_rotation_y(0.5), Vec3::splat(2.0)),
            Transform::IDENTITY,
            Transform::new(Vec3::NEG_ONE, Quat::from_rotation_x(-1.0), Vec3::ONE),
        ];
        let soa = SoaTransform::from_transforms(transforms);
        for (i, t) in transforms.iter().enumerate() {
            assert_eq!(soa.lane(i), *t);
        }
        assert_eq!(soa.translation.x, Vec4::new(1.0, 0.0, 0.0, -1.0));
    }

    #[test]
    fn test_identity() {
        let soa = SoaTransform::default();
        for i in 0..4 {
            assert_eq!(soa.lane(i), Transform::IDENTITY);
        }
        let m = SoaFloat4x4::default();
        for i in 0..4 {
            assert_eq!(m.lane(i), Mat4::IDENTITY);
        }
    }

    #[test]
    fn test_splat_constants() {
        let v = Vec4::new(1.0, -2.0, 3.5, 0.25);
        let soa = SoaFloat4::splat(v);
        for i in 0..4 {
            assert_eq!(soa.lane(i), v);
            assert_eq!(SoaFloat4::ZERO.lane(i), Vec4::ZERO);
        }
        assert_eq!(SoaFloat4::splat(Vec4::ZERO), SoaFloat4::ZERO);
        assert_eq!(SoaFloat4x4::IDENTITY.cols[0], SoaFloat4::splat(Vec4::X));
        assert_eq!(SoaFloat4x4::IDENTITY.cols[3], SoaFloat4::splat(Vec4::W));
    }

    #[test]
    fn test_matrix_lanes() {
        let m = [
            Mat4::from_translation(Vec3::X),
            Mat4::from_scale(Vec3::splat(3.0)),
            Mat4::IDENTITY,
            Mat4::from_quat(Quat::from_rotation_z(1.0)),
        ];
        let soa = SoaFloat4x4::from_matrices(m);
        for (i, expected) in m.iter().enumerate() {
            assert_eq!(soa.lane(i), *expected);
        }
    }
}
