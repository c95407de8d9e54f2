//! Integration tests for animation archives, runtime and raw.

use ozz_archive::animation::Animation;
use ozz_archive::io::{Endianness, IArchive, MemoryStream, OArchive, Origin, Stream};
use ozz_archive::math::{Quat, Vec3};
use ozz_archive::offline::raw_animation::{RotationKey, ScaleKey, TranslationKey};
use ozz_archive::offline::{AnimationBuilder, JointTrack, RawAnimation};
use ozz_archive::Archivable;

fn round_trip<T: Archivable + Default>(value: &T, endianness: Endianness) -> T {
    let mut stream = MemoryStream::new();
    OArchive::new(&mut stream, endianness).write(value);
    stream.seek(0, Origin::Set).unwrap();
    IArchive::new(&mut stream).read()
}

fn raw_animation() -> RawAnimation {
    RawAnimation {
        duration: 2.0,
        tracks: vec![
            JointTrack {
                translations: vec![
                    TranslationKey { time: 0.5, value: Vec3::new(1.0, 2.0, 3.0) },
                    TranslationKey { time: 1.5, value: Vec3::ZERO },
                ],
                rotations: vec![RotationKey { time: 1.0, value: Quat::from_rotation_x(1.0) }],
                scales: vec![],
            },
            JointTrack {
                translations: vec![],
                rotations: vec![
                    RotationKey { time: 0.0, value: Quat::IDENTITY },
                    RotationKey { time: 2.0, value: Quat::from_rotation_y(-2.0) },
                ],
                scales: vec![ScaleKey { time: 2.0, value: Vec3::splat(3.0) }],
            },
        ],
    }
}

#[test]
fn test_empty_raw_animation_round_trip() {
    let raw = RawAnimation::default();
    for endianness in [Endianness::Big, Endianness::Little] {
        let loaded = round_trip(&raw, endianness);
        assert_eq!(loaded.num_tracks(), 0);
        assert_eq!(loaded.duration, RawAnimation::default().duration);
    }
}

#[test]
fn test_raw_animation_round_trip() {
    let raw = raw_animation();
    assert!(raw.validate().is_ok());
    for endianness in [Endianness::Big, Endianness::Little] {
        let loaded = round_trip(&raw, endianness);
        assert_eq!(loaded, raw);
        assert!(loaded.validate().is_ok());
    }
}

#[test]
fn test_raw_animation_layout() {
    let mut stream = MemoryStream::new();
    OArchive::new(&mut stream, Endianness::Little).write(&RawAnimation::default());

    let mut expected = vec![1u8];
    expected.extend_from_slice(b"ozz-raw_animation\0");
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(&1.0f32.to_le_bytes());
    // Empty track vector: count only.
    expected.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(stream.as_bytes(), expected.as_slice());
}

#[test]
fn test_animation_round_trip() {
    let animation = AnimationBuilder.build(&raw_animation()).unwrap();
    assert_eq!(animation.num_tracks(), 2);
    assert_eq!(animation.duration(), 2.0);

    for endianness in [Endianness::Big, Endianness::Little] {
        let loaded = round_trip(&animation, endianness);
        assert_eq!(loaded, animation);
        assert_eq!(loaded.num_soa_tracks(), 1);
    }
}

#[test]
fn test_built_animation_keys() {
    let animation = AnimationBuilder.build(&raw_animation()).unwrap();

    // Every track starts at 0 and ends at duration.
    for track in 0..2u16 {
        let times: Vec<f32> = animation
            .translations()
            .iter()
            .filter(|k| k.track == track)
            .map(|k| k.time)
            .collect();
        assert_eq!(times.first(), Some(&0.0));
        assert_eq!(times.last(), Some(&2.0));
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
    // Track 1 has 2 identity translation keys, track 0 has 2 keys plus 2 patched ones.
    assert_eq!(animation.translations().len(), 6);
    // Single scale key of track 1 is duplicated at 0.
    let scales: Vec<_> = animation.scales().iter().filter(|k| k.track == 1).collect();
    assert_eq!(scales.len(), 2);
    assert!(scales.iter().all(|k| k.value == Vec3::splat(3.0)));
    assert!(animation.rotations().iter().all(|k| k.value.is_normalized()));
}

#[test]
fn test_animation_and_raw_tags_differ() {
    let animation = AnimationBuilder.build(&raw_animation()).unwrap();
    let mut stream = MemoryStream::new();
    {
        let mut archive = OArchive::native(&mut stream);
        archive.write(&raw_animation());
        archive.write(&animation);
    }
    stream.seek(0, Origin::Set).unwrap();
    let mut archive = IArchive::new(&mut stream);
    assert!(!archive.test_tag::<Animation>());
    assert!(archive.test_tag::<RawAnimation>());
    let raw: RawAnimation = archive.read();
    assert_eq!(raw, raw_animation());
    assert!(archive.test_tag::<Animation>());
    assert_eq!(archive.read::<Animation>(), animation);
}
