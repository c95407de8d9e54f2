//! Builds runtime animations from offline animations.

use std::cmp::Ordering;

use tracing::debug;

use super::raw_animation::{RawAnimation, RawKey};
use crate::animation::{Animation, RotationKey, ScaleKey, TranslationKey};
use crate::math::{normalize_safe, Quat};
use crate::util::Result;

/// Key being prepared for sorting.
#[derive(Clone, Copy, Debug)]
struct SortingKey<V> {
    track: u16,
    /// Time of the previous key of the same track, -1 for the first one.
    prev_time: f32,
    time: f32,
    value: V,
}

impl<V> SortingKey<V> {
    fn order(&self, other: &Self) -> Ordering {
        self.prev_time
            .total_cmp(&other.prev_time)
            .then(self.track.cmp(&other.track))
    }
}

/// Converts a [`RawAnimation`] to a runtime [`Animation`].
///
/// Every track of the output has a key at time 0 and a key at `duration`.
/// Missing keys are created from the first/last keys, or from identity for
/// empty tracks.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationBuilder;

impl AnimationBuilder {
    pub fn build(&self, raw: &RawAnimation) -> Result<Animation> {
        raw.validate()?;

        let duration = raw.duration;
        let mut translations = Vec::new();
        let mut rotations = Vec::new();
        let mut scales = Vec::new();
        for (track, joint) in raw.tracks.iter().enumerate() {
            // Validation bounds the track count.
            let track = track as u16;
            copy_raw(&joint.translations, track, duration, &mut translations);
            copy_raw(&joint.rotations, track, duration, &mut rotations);
            copy_raw(&joint.scales, track, duration, &mut scales);
        }

        fix_up_rotations(&mut rotations);

        translations.sort_by(SortingKey::order);
        rotations.sort_by(SortingKey::order);
        scales.sort_by(SortingKey::order);

        let animation = Animation::from_parts(
            duration,
            raw.num_tracks(),
            translations
                .iter()
                .map(|k| TranslationKey { track: k.track, time: k.time, value: k.value })
                .collect(),
            rotations
                .iter()
                .map(|k| RotationKey { track: k.track, time: k.time, value: k.value })
                .collect(),
            scales
                .iter()
                .map(|k| ScaleKey { track: k.track, time: k.time, value: k.value })
                .collect(),
        );
        debug!(
            "Built animation with {} tracks and {} keys.",
            animation.num_tracks(),
            animation.num_keys()
        );
        Ok(animation)
    }
}

fn push_identity_key<K: RawKey>(track: u16, time: f32, dest: &mut Vec<SortingKey<K::Value>>) {
    let prev_time = match dest.last() {
        Some(last) if last.track == track => last.time,
        _ => -1.0,
    };
    dest.push(SortingKey {
        track,
        prev_time,
        time,
        value: K::IDENTITY,
    });
}

/// Copies a track, adding keys at 0 and `duration` if missing.
fn copy_raw<K: RawKey>(src: &[K], track: u16, duration: f32, dest: &mut Vec<SortingKey<K::Value>>) {
    match src {
        [] => {
            push_identity_key::<K>(track, 0.0, dest);
            push_identity_key::<K>(track, duration, dest);
        }
        [key] => {
            let value = key.value();
            dest.push(SortingKey { track, prev_time: -1.0, time: 0.0, value });
            dest.push(SortingKey { track, prev_time: 0.0, time: duration, value });
        }
        [first, .., last] => {
            let mut prev_time = -1.0;
            if first.time() != 0.0 {
                dest.push(SortingKey { track, prev_time, time: 0.0, value: first.value() });
                prev_time = 0.0;
            }
            for key in src {
                dest.push(SortingKey { track, prev_time, time: key.time(), value: key.value() });
                prev_time = key.time();
            }
            if last.time() != duration {
                dest.push(SortingKey { track, prev_time, time: duration, value: last.value() });
            }
        }
    }
}

/// Normalizes rotations and flips consecutive opposite quaternions of a
/// track, so that interpolation takes the shortest path.
///
/// Keys must still be grouped per track.
fn fix_up_rotations(keys: &mut [SortingKey<Quat>]) {
    let mut previous: Option<(u16, Quat)> = None;
    for key in keys.iter_mut() {
        let mut normalized = normalize_safe(key.value);
        let reference = match previous {
            Some((track, prev)) if track == key.track => prev,
            // First key of the track: w is the dot product with identity.
            _ => Quat::IDENTITY,
        };
        if normalized.dot(reference) < 0.0 {
            normalized = -normalized;
        }
        key.value = normalized;
        previous = Some((key.track, normalized));
    }
}
