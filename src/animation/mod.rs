//! Runtime animation data: skeletons, animations and float tracks.
//!
//! Runtime objects are immutable once built. They are produced by the
//! [`offline`](crate::offline) builders or loaded from archives.

mod animation;
mod float_track;
mod skeleton;

pub use animation::{Animation, RotationKey, ScaleKey, TranslationKey};
pub use float_track::FloatTrack;
pub use skeleton::{JointProperties, Skeleton, MAX_JOINTS, MAX_JOINTS_NUM_BITS, MAX_SOA_JOINTS, NO_PARENT};
