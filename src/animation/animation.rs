//! Runtime animation.
//!
//! Keys of every track are stored in three flat arrays, one per transform
//! component, sorted by the time of the previous key of the same track and
//! then by track index.

use tracing::error;

use crate::io::{Archivable, IArchive, OArchive};
use crate::math::{Quat, Vec3};

/// Translation key.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TranslationKey {
    pub track: u16,
    pub time: f32,
    pub value: Vec3,
}

/// Rotation key. Values are normalized quaternions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationKey {
    pub track: u16,
    pub time: f32,
    pub value: Quat,
}

/// Scale key.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScaleKey {
    pub track: u16,
    pub time: f32,
    pub value: Vec3,
}

// Keys are written as track (i32), time (f32) then the value floats.
macro_rules! impl_key_archivable {
    ($($key:ty => $value:ty),* $(,)?) => {$(
        impl Archivable for $key {
            const VERSION: u32 = 0;

            fn save(archive: &mut OArchive<'_>, values: &[Self]) {
                for key in values {
                    archive.write_primitive(key.track as i32);
                    archive.write_primitive(key.time);
                    archive.write(&key.value);
                }
            }

            fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
                for key in values {
                    key.track = archive.read_primitive::<i32>() as u16;
                    key.time = archive.read_primitive();
                    key.value = archive.read::<$value>();
                }
            }
        }
    )*};
}

impl_key_archivable!(
    TranslationKey => Vec3,
    RotationKey => Quat,
    ScaleKey => Vec3,
);

/// Runtime animation, built from a `RawAnimation` or loaded from an archive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    duration: f32,
    num_tracks: usize,
    translations: Vec<TranslationKey>,
    rotations: Vec<RotationKey>,
    scales: Vec<ScaleKey>,
}

impl Animation {
    pub(crate) fn from_parts(
        duration: f32,
        num_tracks: usize,
        translations: Vec<TranslationKey>,
        rotations: Vec<RotationKey>,
        scales: Vec<ScaleKey>,
    ) -> Self {
        Self {
            duration,
            num_tracks,
            translations,
            rotations,
            scales,
        }
    }

    /// Duration in seconds.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn num_tracks(&self) -> usize {
        self.num_tracks
    }

    #[inline]
    pub fn num_soa_tracks(&self) -> usize {
        self.num_tracks.div_ceil(4)
    }

    #[inline]
    pub fn translations(&self) -> &[TranslationKey] {
        &self.translations
    }

    #[inline]
    pub fn rotations(&self) -> &[RotationKey] {
        &self.rotations
    }

    #[inline]
    pub fn scales(&self) -> &[ScaleKey] {
        &self.scales
    }

    /// Total number of keys.
    pub fn num_keys(&self) -> usize {
        self.translations.len() + self.rotations.len() + self.scales.len()
    }
}

fn save_keys<K: Archivable>(archive: &mut OArchive<'_>, keys: &[K]) {
    archive.write_primitive(keys.len() as i32);
    archive.write_array(keys);
}

/// `None` if the stream ends before all keys are read.
fn load_keys<K: Archivable + Default>(archive: &mut IArchive<'_>) -> Option<Vec<K>> {
    let count = archive.read_primitive::<i32>().max(0) as usize;
    let keys = archive.read_vec(count);
    (keys.len() == count).then_some(keys)
}

impl Archivable for Animation {
    const VERSION: u32 = 1;
    const TAG: Option<&'static [u8]> = Some(b"ozz-animation\0");

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for animation in values {
            archive.write_primitive(animation.duration);
            archive.write_primitive(animation.num_tracks as i32);
            save_keys(archive, &animation.translations);
            save_keys(archive, &animation.rotations);
            save_keys(archive, &animation.scales);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], version: u32) {
        values.fill_with(Self::default);
        if version != Self::VERSION {
            error!("Unsupported Animation version {version}.");
            return;
        }

        for animation in values {
            let duration = archive.read_primitive::<f32>();
            let num_tracks = archive.read_primitive::<i32>().max(0) as usize;
            let (Some(translations), Some(rotations), Some(scales)) =
                (load_keys(archive), load_keys(archive), load_keys(archive))
            else {
                error!("Animation archive ends before its keys.");
                return;
            };
            *animation = Self {
                duration,
                num_tracks,
                translations,
                rotations,
                scales,
            };
        }
    }
}
