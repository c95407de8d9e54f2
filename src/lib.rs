//! # ozz-archive
//!
//! Versioned, endianness-aware binary archives for skeletal animation data.
//!
//! Archives are written in a compact, schema-less format: a one byte
//! endianness header followed by typed objects, each optionally prefixed by a
//! type tag and a version number. Any machine can read an archive written by
//! any other, values are byte swapped on the fly when needed.
//!
//! ## Modules
//!
//! - [`util`] - Error and result types
//! - [`io`] - Streams, endianness and the archive engine
//! - [`math`] - Vector, quaternion, transform and SoA payload types
//! - [`animation`] - Runtime skeletons, animations and float tracks
//! - [`offline`] - Raw (editable) structures and their builders
//!
//! ## Example
//!
//! ```
//! use ozz_archive::prelude::*;
//!
//! let raw = RawSkeleton::new(vec![Joint::new("root", Transform::IDENTITY)]);
//! let skeleton = SkeletonBuilder.build(&raw)?;
//!
//! let mut stream = MemoryStream::new();
//! OArchive::new(&mut stream, Endianness::Big).write(&skeleton);
//!
//! stream.seek(0, Origin::Set)?;
//! let mut archive = IArchive::new(&mut stream);
//! assert!(archive.test_tag::<Skeleton>());
//! let loaded: Skeleton = archive.read();
//! assert_eq!(loaded, skeleton);
//! # Ok::<(), ozz_archive::Error>(())
//! ```

pub mod util;
pub mod io;
pub mod math;
pub mod animation;
pub mod offline;

// Re-export commonly used types
pub use util::{Error, Result};
pub use io::{Archivable, IArchive, OArchive};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::io::{Archivable, Endianness, FileStream, IArchive, MemoryStream, OArchive, Origin, Stream};
    pub use crate::math::{Quat, SoaTransform, Transform, Vec3};
    pub use crate::animation::{Animation, FloatTrack, Skeleton};
    pub use crate::offline::{
        AnimationBuilder, FloatTrackBuilder, Joint, RawAnimation, RawFloatTrack, RawSkeleton, SkeletonBuilder,
    };
}
