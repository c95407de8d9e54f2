//! Archive support for math types.
//!
//! All math types are non-versionable. Padding free types are streamed as
//! runs of `f32` through the primitive bulk path.

use super::{BBox, Mat4, Quat, SoaFloat3, SoaFloat4, SoaFloat4x4, SoaQuaternion, SoaTransform, Transform, Vec2, Vec3, Vec4};
use crate::io::{Archivable, IArchive, OArchive};

macro_rules! impl_float_archivable {
    ($($ty:ty),* $(,)?) => {$(
        impl Archivable for $ty {
            const VERSION: u32 = 0;

            #[inline]
            fn save(archive: &mut OArchive<'_>, values: &[Self]) {
                archive.write_primitives::<f32>(bytemuck::cast_slice(values));
            }

            #[inline]
            fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
                archive.read_primitives::<f32>(bytemuck::cast_slice_mut(values));
            }
        }
    )*};
}

impl_float_archivable!(
    Vec2,
    Vec3,
    Vec4,
    Quat,
    Mat4,
    BBox,
    SoaFloat3,
    SoaFloat4,
    SoaQuaternion,
    SoaFloat4x4,
    SoaTransform,
);

/// Written as translation (3 floats), rotation (4 floats), scale (3 floats).
impl Archivable for Transform {
    const VERSION: u32 = 0;

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for t in values {
            archive.write_primitives(&t.translation.to_array());
            archive.write_primitives(&t.rotation.to_array());
            archive.write_primitives(&t.scale.to_array());
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for t in values {
            let mut translation = [0f32; 3];
            let mut rotation = [0f32; 4];
            let mut scale = [0f32; 3];
            archive.read_primitives(&mut translation);
            archive.read_primitives(&mut rotation);
            archive.read_primitives(&mut scale);
            *t = Transform {
                translation: Vec3::from_array(translation),
                rotation: Quat::from_array(rotation),
                scale: Vec3::from_array(scale),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Endianness, MemoryStream, Origin, Stream};

    fn round_trip<T: Archivable + Default>(value: &T, endianness: Endianness) -> (T, usize) {
        let mut stream = MemoryStream::new();
        {
            let mut archive = OArchive::new(&mut stream, endianness);
            archive.write(value);
        }
        let size = stream.len() - 1;
        stream.seek(0, Origin::Set).unwrap();
        let mut archive = IArchive::new(&mut stream);
        (archive.read(), size)
    }

    #[test]
    fn test_payload_sizes() {
        let e = Endianness::Big;
        assert_eq!(round_trip(&Vec2::ONE, e).1, 2 * 4);
        assert_eq!(round_trip(&Vec3::ONE, e).1, 3 * 4);
        assert_eq!(round_trip(&Vec4::ONE, e).1, 4 * 4);
        assert_eq!(round_trip(&Quat::IDENTITY, e).1, 4 * 4);
        assert_eq!(round_trip(&Mat4::IDENTITY, e).1, 16 * 4);
        assert_eq!(round_trip(&Transform::IDENTITY, e).1, 10 * 4);
        assert_eq!(round_trip(&BBox::default(), e).1, 6 * 4);
        assert_eq!(round_trip(&SoaFloat3::ONE, e).1, 12 * 4);
        assert_eq!(round_trip(&SoaFloat4::ZERO, e).1, 16 * 4);
        assert_eq!(round_trip(&SoaQuaternion::IDENTITY, e).1, 16 * 4);
        assert_eq!(round_trip(&SoaFloat4x4::IDENTITY, e).1, 64 * 4);
        assert_eq!(round_trip(&SoaTransform::IDENTITY, e).1, 40 * 4);
    }

    #[test]
    fn test_round_trips() {
        for e in [Endianness::Big, Endianness::Little] {
            let v = Vec3::new(1.0, -2.5, f32::MAX);
            assert_eq!(round_trip(&v, e).0, v);

            let q = Quat::from_rotation_y(0.75);
            assert_eq!(round_trip(&q, e).0, q);

            let m = Mat4::from_scale_rotation_translation(Vec3::splat(2.0), q, v);
            assert_eq!(round_trip(&m, e).0, m);

            let t = Transform::new(Vec3::X, q, Vec3::new(1.0, 2.0, 3.0));
            assert_eq!(round_trip(&t, e).0, t);

            let bbox = BBox::new(Vec3::NEG_ONE, Vec3::ONE);
            assert_eq!(round_trip(&bbox, e).0, bbox);

            let soa = SoaTransform::from_transforms([t, Transform::IDENTITY, t, Transform::from_translation(v)]);
            assert_eq!(round_trip(&soa, e).0, soa);
        }
    }

    #[test]
    fn test_transform_layout() {
        let mut stream = MemoryStream::new();
        {
            let mut archive = OArchive::new(&mut stream, Endianness::Little);
            archive.write(&Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        }
        let floats: Vec<f32> = stream.as_bytes()[1..]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(floats, vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
    }
}
