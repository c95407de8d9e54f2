//! Math payload types.
//!
//! Vector, quaternion and matrix types come from `glam`. This module adds the
//! affine [`Transform`], the [`BBox`] and the structure-of-arrays types used by
//! runtime skeletons.

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

mod archive;
mod soa;

pub use soa::{SoaFloat3, SoaFloat4, SoaFloat4x4, SoaQuaternion, SoaTransform};

use bytemuck::{Pod, Zeroable};

/// Affine transformation: translation, rotation, then scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { translation, rotation, scale }
    }

    /// Transform with only a translation.
    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Axis aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox {
    /// Empty box, inverted so that it grows on the first point.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all `points`.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bbox = Self::EMPTY;
        for &p in points {
            bbox.expand_by_point(p);
        }
        bbox
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    #[inline]
    pub fn expand_by_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Normalized `q`, or identity if `q` has no usable length.
pub fn normalize_safe(q: Quat) -> Quat {
    let length_squared = q.length_squared();
    if length_squared.is_finite() && length_squared > f32::MIN_POSITIVE {
        q * length_squared.sqrt().recip()
    } else {
        Quat::IDENTITY
    }
}
