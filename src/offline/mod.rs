//! Offline data structures and the builders converting them to runtime objects.
//!
//! Offline ("raw") structures are easy to edit and fully archivable. They are
//! validated and optimized for runtime use by the builders.
//!
//! ```
//! use ozz_archive::math::Transform;
//! use ozz_archive::offline::{Joint, RawSkeleton, SkeletonBuilder};
//!
//! let raw = RawSkeleton::new(vec![
//!     Joint::new("root", Transform::IDENTITY).with_child(Joint::new("head", Transform::IDENTITY)),
//! ]);
//! let skeleton = SkeletonBuilder.build(&raw).unwrap();
//! assert_eq!(skeleton.num_joints(), 2);
//! ```

mod animation_builder;
mod float_track_builder;
pub mod raw_animation;
mod raw_float_track;
mod raw_skeleton;
mod skeleton_builder;

pub use animation_builder::AnimationBuilder;
pub use float_track_builder::FloatTrackBuilder;
pub use raw_animation::{JointTrack, RawAnimation, RawKey};
pub use raw_float_track::{Interpolation, Keyframe, RawFloatTrack};
pub use raw_skeleton::{BreadthFirst, DepthFirst, Joint, RawSkeleton};
pub use skeleton_builder::SkeletonBuilder;
