//! Per-type serialization capability.
//!
//! Every archivable type declares a version and optionally a tag, and maps
//! itself onto archive primitive operations. Dispatch is resolved at compile
//! time through monomorphization.

use super::archive::{IArchive, OArchive};
use super::endian::EndianSwap;

/// Serialization capability of a type.
///
/// `save` and `load` work on slices so that contiguous runs of values can be
/// streamed in one call. The generic object path (`OArchive::write`) calls
/// them with a single element.
///
/// Versioning rules:
/// - `VERSION == 0` means "not versionable": no version number is written.
/// - A positive `VERSION` is written once per object (or once per array) and
///   handed back to `load`, which may branch on it to read older layouts.
/// - A type declared non-versionable must never become versionable later,
///   as previously written archives would no longer line up.
///
/// ```
/// use ozz_archive::io::{Archivable, IArchive, OArchive};
///
/// #[derive(Default)]
/// struct Marker {
///     id: u32,
/// }
///
/// impl Archivable for Marker {
///     const VERSION: u32 = 1;
///     const TAG: Option<&'static [u8]> = Some(b"marker\0");
///
///     fn save(archive: &mut OArchive<'_>, values: &[Self]) {
///         for marker in values {
///             archive.write(&marker.id);
///         }
///     }
///
///     fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
///         for marker in values {
///             marker.id = archive.read();
///         }
///     }
/// }
/// ```
pub trait Archivable: Sized {
    /// Format version, 0 for non-versionable types.
    const VERSION: u32;

    /// Optional type tag, including its trailing NUL byte.
    ///
    /// Tags are written before each object and only used for validation.
    const TAG: Option<&'static [u8]> = None;

    /// Writes `values` to `archive`.
    fn save(archive: &mut OArchive<'_>, values: &[Self]);

    /// Reads `values.len()` values from `archive`, written with format `version`.
    fn load(archive: &mut IArchive<'_>, values: &mut [Self], version: u32);
}

/// Fixed-width scalar with a native binary layout.
///
/// Primitive runs are written as one contiguous block when no byte swap is
/// needed, and read back in one block followed by an in-place swap.
pub trait Primitive: Archivable + EndianSwap + bytemuck::Pod + Default {}

macro_rules! impl_primitive {
    ($($ty:ty),*) => {$(
        impl Archivable for $ty {
            const VERSION: u32 = 0;

            #[inline]
            fn save(archive: &mut OArchive<'_>, values: &[Self]) {
                archive.write_primitives(values);
            }

            #[inline]
            fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
                archive.read_primitives(values);
            }
        }

        impl Primitive for $ty {}
    )*};
}

impl_primitive!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Booleans are stored as one byte, 0 or 1.
impl Archivable for bool {
    const VERSION: u32 = 0;

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for chunk in values.chunks(64) {
            let bytes: smallvec::SmallVec<[u8; 64]> = chunk.iter().map(|&b| b as u8).collect();
            archive.write_primitives(&bytes);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for chunk in values.chunks_mut(64) {
            let mut bytes = [0u8; 64];
            let bytes = &mut bytes[..chunk.len()];
            archive.read_primitives(bytes);
            for (value, &byte) in chunk.iter_mut().zip(bytes.iter()) {
                *value = byte != 0;
            }
        }
    }
}
