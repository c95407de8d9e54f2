//! Offline float track.

use crate::io::{Archivable, IArchive, OArchive};
use crate::util::{Error, Result};

/// Interpolation mode between a keyframe and the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Interpolation {
    /// Holds the value until the next keyframe.
    Step = 0,
    #[default]
    Linear = 1,
}

impl Interpolation {
    /// Decodes the wire value, anything but 0 reads as linear.
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Step,
            _ => Self::Linear,
        }
    }
}

/// Keyframe at normalized `time` in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keyframe {
    pub interpolation: Interpolation,
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    #[inline]
    pub const fn new(interpolation: Interpolation, time: f32, value: f32) -> Self {
        Self { interpolation, time, value }
    }

    #[inline]
    pub const fn linear(time: f32, value: f32) -> Self {
        Self::new(Interpolation::Linear, time, value)
    }

    #[inline]
    pub const fn step(time: f32, value: f32) -> Self {
        Self::new(Interpolation::Step, time, value)
    }
}

impl Archivable for Keyframe {
    const VERSION: u32 = 1;

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for key in values {
            archive.write_primitive(key.interpolation as u8);
            archive.write_primitive(key.time);
            archive.write_primitive(key.value);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for key in values {
            key.interpolation = Interpolation::from_u8(archive.read_primitive());
            key.time = archive.read_primitive();
            key.value = archive.read_primitive();
        }
    }
}

/// Offline float track, keyframes sorted by time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFloatTrack {
    pub keyframes: Vec<Keyframe>,
}

impl RawFloatTrack {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self { keyframes }
    }

    /// Checks keyframe times are within [0, 1] and strictly ascending, at
    /// least `f32::EPSILON` apart.
    pub fn validate(&self) -> Result<()> {
        let mut previous = -1.0f32;
        for (index, key) in self.keyframes.iter().enumerate() {
            if !(0.0..=1.0).contains(&key.time) {
                return Err(Error::invalid_raw(format!(
                    "keyframe {index} time {} is outside [0, 1]",
                    key.time
                )));
            }
            if key.time - previous <= f32::EPSILON {
                return Err(Error::invalid_raw(format!(
                    "keyframe {index} time {} is not sorted",
                    key.time
                )));
            }
            previous = key.time;
        }
        Ok(())
    }
}

impl Archivable for RawFloatTrack {
    const VERSION: u32 = 1;
    const TAG: Option<&'static [u8]> = Some(b"ozz-raw_float_track\0");

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for track in values {
            archive.write(&track.keyframes);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for track in values {
            archive.read_into(&mut track.keyframes);
        }
    }
}
