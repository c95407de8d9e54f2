//! Offline animation.
//!
//! Keys are stored per track and per transform component, with times in
//! seconds. See [`RawAnimation::validate`] for the constraints the
//! [`AnimationBuilder`](super::AnimationBuilder) relies on.

use crate::animation::MAX_JOINTS;
use crate::io::{Archivable, IArchive, OArchive};
use crate::math::{Quat, Vec3};
use crate::util::{Error, Result};

/// Translation key.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TranslationKey {
    pub time: f32,
    pub value: Vec3,
}

/// Rotation key. Values do not need to be normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationKey {
    pub time: f32,
    pub value: Quat,
}

/// Scale key.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScaleKey {
    pub time: f32,
    pub value: Vec3,
}

/// Key of a raw animation track.
pub trait RawKey: Copy {
    type Value: Copy;

    /// Value used for tracks without any key.
    const IDENTITY: Self::Value;

    fn new(time: f32, value: Self::Value) -> Self;
    fn time(&self) -> f32;
    fn value(&self) -> Self::Value;
}

macro_rules! impl_raw_key {
    ($($key:ty => $value:ty, $identity:expr);* $(;)?) => {$(
        impl RawKey for $key {
            type Value = $value;
            const IDENTITY: $value = $identity;

            #[inline]
            fn new(time: f32, value: $value) -> Self {
                Self { time, value }
            }

            #[inline]
            fn time(&self) -> f32 {
                self.time
            }

            #[inline]
            fn value(&self) -> $value {
                self.value
            }
        }

        impl Archivable for $key {
            const VERSION: u32 = 1;

            fn save(archive: &mut OArchive<'_>, values: &[Self]) {
                for key in values {
                    archive.write(&key.time);
                    archive.write(&key.value);
                }
            }

            fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
                for key in values {
                    key.time = archive.read();
                    key.value = archive.read();
                }
            }
        }
    )*};
}

impl_raw_key! {
    TranslationKey => Vec3, Vec3::ZERO;
    RotationKey => Quat, Quat::IDENTITY;
    ScaleKey => Vec3, Vec3::ONE;
}

/// Keys of one joint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JointTrack {
    pub translations: Vec<TranslationKey>,
    pub rotations: Vec<RotationKey>,
    pub scales: Vec<ScaleKey>,
}

impl JointTrack {
    /// Key times must be strictly ascending and within [0, duration].
    fn validate(&self, duration: f32) -> bool {
        fn sorted<K: RawKey>(keys: &[K], duration: f32) -> bool {
            let mut previous = -1.0;
            keys.iter().all(|key| {
                let time = key.time();
                let valid = (0.0..=duration).contains(&time) && time > previous;
                previous = time;
                valid
            })
        }
        sorted(&self.translations, duration)
            && sorted(&self.rotations, duration)
            && sorted(&self.scales, duration)
    }
}

impl Archivable for JointTrack {
    const VERSION: u32 = 1;

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for track in values {
            archive.write(&track.translations);
            archive.write(&track.rotations);
            archive.write(&track.scales);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for track in values {
            archive.read_into(&mut track.translations);
            archive.read_into(&mut track.rotations);
            archive.read_into(&mut track.scales);
        }
    }
}

/// Offline animation, one [`JointTrack`] per skeleton joint.
#[derive(Clone, Debug, PartialEq)]
pub struct RawAnimation {
    /// Duration in seconds.
    pub duration: f32,
    pub tracks: Vec<JointTrack>,
}

impl Default for RawAnimation {
    fn default() -> Self {
        Self {
            duration: 1.0,
            tracks: Vec::new(),
        }
    }
}

impl RawAnimation {
    #[inline]
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Checks the animation can be built.
    pub fn validate(&self) -> Result<()> {
        if self.duration.is_nan() || self.duration <= 0.0 {
            return Err(Error::invalid_raw(format!(
                "animation duration must be positive, got {}",
                self.duration
            )));
        }
        if self.tracks.len() > MAX_JOINTS {
            return Err(Error::invalid_raw(format!(
                "animation has {} tracks, maximum is {MAX_JOINTS}",
                self.tracks.len()
            )));
        }
        if let Some(index) = self.tracks.iter().position(|t| !t.validate(self.duration)) {
            return Err(Error::invalid_raw(format!(
                "track {index} keys are not sorted within [0, {}]",
                self.duration
            )));
        }
        Ok(())
    }
}

impl Archivable for RawAnimation {
    const VERSION: u32 = 1;
    const TAG: Option<&'static [u8]> = Some(b"ozz-raw_animation\0");

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for animation in values {
            archive.write(&animation.duration);
            archive.write(&animation.tracks);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for animation in values {
            animation.duration = archive.read();
            archive.read_into(&mut animation.tracks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(times: &[f32]) -> JointTrack {
        JointTrack {
            translations: times.iter().map(|&t| TranslationKey::new(t, Vec3::ZERO)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default() {
        let animation = RawAnimation::default();
        assert_eq!(animation.duration, 1.0);
        assert_eq!(animation.num_tracks(), 0);
        assert!(animation.validate().is_ok());
    }

    #[test]
    fn test_validate_duration() {
        for duration in [0.0, -1.0, f32::NAN] {
            let animation = RawAnimation { duration, tracks: Vec::new() };
            assert!(animation.validate().is_err());
        }
    }

    #[test]
    fn test_validate_tracks() {
        let too_many = RawAnimation {
            duration: 1.0,
            tracks: vec![JointTrack::default(); MAX_JOINTS + 1],
        };
        assert!(too_many.validate().is_err());

        let valid = RawAnimation { duration: 2.0, tracks: vec![track(&[0.0, 1.0, 2.0]), track(&[])] };
        assert!(valid.validate().is_ok());

        for times in [&[0.0, 0.0][..], &[1.0, 0.5][..], &[-0.1][..], &[2.5][..]] {
            let invalid = RawAnimation { duration: 2.0, tracks: vec![track(times)] };
            assert!(invalid.validate().is_err(), "{times:?}");
        }
    }
}
