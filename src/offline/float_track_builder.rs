//! Builds runtime float tracks from offline tracks.

use tracing::debug;

use super::raw_float_track::{Interpolation, Keyframe, RawFloatTrack};
use crate::animation::FloatTrack;
use crate::util::Result;

/// Converts a [`RawFloatTrack`] to a runtime [`FloatTrack`].
///
/// The output has keys at times 0 and 1. Step keys are emulated with an
/// extra linear key just before the next keyframe.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatTrackBuilder;

impl FloatTrackBuilder {
    pub fn build(&self, raw: &RawFloatTrack) -> Result<FloatTrack> {
        raw.validate()?;

        // Worst case: every key is a step, plus begin and end keys.
        let mut keyframes = Vec::with_capacity(raw.keyframes.len() * 2 + 2);
        patch_begin_end_keys(&raw.keyframes, &mut keyframes);
        linearize(&mut keyframes);

        let times = keyframes.iter().map(|k| k.time).collect();
        let values = keyframes.iter().map(|k| k.value).collect();
        debug!("Built float track with {} keys.", keyframes.len());
        Ok(FloatTrack::from_parts(times, values))
    }
}

fn patch_begin_end_keys(src: &[Keyframe], dest: &mut Vec<Keyframe>) {
    match src {
        [] => {
            dest.push(Keyframe::linear(0.0, 0.0));
            dest.push(Keyframe::linear(1.0, 0.0));
        }
        [key] => {
            dest.push(Keyframe::linear(0.0, key.value));
            dest.push(Keyframe::linear(1.0, key.value));
        }
        [first, .., last] => {
            if first.time != 0.0 {
                dest.push(Keyframe::linear(0.0, first.value));
            }
            dest.extend_from_slice(src);
            if last.time != 1.0 {
                dest.push(Keyframe::linear(1.0, last.value));
            }
        }
    }
}

/// Inserts a linear key right before the key following each step key.
fn linearize(keyframes: &mut Vec<Keyframe>) {
    debug_assert!(keyframes.len() >= 2);

    let mut i = 0;
    while i + 1 < keyframes.len() {
        let key = keyframes[i];
        if key.interpolation == Interpolation::Step {
            // Times are in [0, 1], so EPSILON is representable below the next key.
            let time = keyframes[i + 1].time - f32::EPSILON;
            keyframes.insert(i + 1, Keyframe::linear(time, key.value));
            i += 1;
        }
        i += 1;
    }

    // Interpolation of the last key has no effect.
    if let Some(last) = keyframes.last_mut() {
        last.interpolation = Interpolation::Linear;
    }
}
