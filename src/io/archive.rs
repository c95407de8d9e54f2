//! Output and input archives.
//!
//! An archive session starts with one byte holding the writer's
//! [`Endianness`]. Every object that follows is laid out as:
//!
//! ```text
//! +--------------------+
//! | Tag (optional)     |  TAG bytes, NUL included
//! +--------------------+
//! | Version (optional) |  u32, session byte order
//! +--------------------+
//! | Payload            |  type specific
//! +--------------------+
//! ```
//!
//! The format carries no schema. Readers must consume exactly the sequence
//! of types the writer produced, in the same order, starting at the same
//! stream offset. Tags give partial protection against mismatches.

use std::io::ErrorKind;

use smallvec::{smallvec, SmallVec};
use tracing::warn;

use super::endian::{endian_swap_slice, Endianness};
use super::stream::{Origin, Stream};
use super::traits::{Archivable, Primitive};
use crate::util::{Error, Result};

/// Storage growth step of [`IArchive::read_vec`], in bytes.
const READ_STEP_BYTES: usize = 64 << 10;

// ============================================================================
// Output archive
// ============================================================================

/// Writing session over a borrowed stream.
pub struct OArchive<'a> {
    stream: &'a mut (dyn Stream + 'a),
    /// True if values must be byte swapped before writing.
    endian_swap: bool,
    /// Set once the stream accepted fewer bytes than requested.
    truncated: bool,
}

impl<'a> OArchive<'a> {
    /// Start a session writing in `endianness` byte order.
    ///
    /// # Panics
    ///
    /// Panics if `stream` is not opened.
    pub fn new(stream: &'a mut (dyn Stream + 'a), endianness: Endianness) -> Self {
        assert!(
            stream.opened(),
            "stream argument must point a valid opened stream."
        );
        let mut archive = Self {
            stream,
            endian_swap: endianness != Endianness::native(),
            truncated: false,
        };
        // Single byte, never swapped.
        archive.write_primitive(endianness.as_u8());
        archive
    }

    /// Start a session in native byte order.
    pub fn native(stream: &'a mut (dyn Stream + 'a)) -> Self {
        Self::new(stream, Endianness::native())
    }

    /// True if an endian swap is applied while writing.
    #[inline]
    pub fn endian_swap(&self) -> bool {
        self.endian_swap
    }

    /// True if any write of this session came up short.
    #[inline]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Writes raw bytes, no conversion. Returns the number of bytes written.
    #[inline]
    pub fn save_binary(&mut self, data: &[u8]) -> usize {
        self.write_bytes(data)
    }

    /// Writes one object: tag, version, then payload.
    pub fn write<T: Archivable>(&mut self, value: &T) {
        if let Some(tag) = T::TAG {
            self.write_primitives(tag);
        }
        self.save_version::<T>();
        T::save(self, std::slice::from_ref(value));
    }

    /// Writes a contiguous run of objects.
    ///
    /// The element version is written once for the whole run, tags are not written.
    pub fn write_array<T: Archivable>(&mut self, values: &[T]) {
        self.save_version::<T>();
        T::save(self, values);
    }

    /// Writes one scalar in session byte order.
    #[inline]
    pub fn write_primitive<T: Primitive>(&mut self, value: T) {
        let value = if self.endian_swap { value.endian_swap() } else { value };
        self.write_bytes(bytemuck::bytes_of(&value));
    }

    /// Writes scalars in session byte order.
    ///
    /// Produces the same bytes as calling [`OArchive::write_primitive`] on
    /// each element.
    pub fn write_primitives<T: Primitive>(&mut self, values: &[T]) {
        if self.endian_swap {
            // The source cannot be swapped in place.
            for &value in values {
                self.write_primitive(value);
            }
        } else {
            self.write_bytes(bytemuck::cast_slice(values));
        }
    }

    /// Underlying stream.
    pub fn stream(&mut self) -> &mut (dyn Stream + 'a) {
        &mut *self.stream
    }

    fn write_bytes(&mut self, data: &[u8]) -> usize {
        let written = self.stream.write(data);
        self.truncated |= written < data.len();
        written
    }

    fn save_version<T: Archivable>(&mut self) {
        if T::VERSION != 0 {
            self.write_primitive(T::VERSION);
        }
    }
}

// ============================================================================
// Input archive
// ============================================================================

/// Reading session over a borrowed stream.
///
/// The stream must be positioned where the matching [`OArchive`] started.
pub struct IArchive<'a> {
    stream: &'a mut (dyn Stream + 'a),
    /// True if values must be byte swapped after reading.
    endian_swap: bool,
    /// Set once the stream delivered fewer bytes than requested.
    truncated: bool,
}

impl<'a> IArchive<'a> {
    /// Start a session, reading the endianness header byte.
    ///
    /// # Panics
    ///
    /// Panics if `stream` is not opened.
    pub fn new(stream: &'a mut (dyn Stream + 'a)) -> Self {
        assert!(
            stream.opened(),
            "stream argument must point a valid opened stream."
        );
        let mut archive = Self {
            stream,
            endian_swap: false,
            truncated: false,
        };
        let endianness = Endianness::from_u8(archive.read_primitive::<u8>());
        archive.endian_swap = endianness != Endianness::native();
        archive
    }

    /// True if an endian swap is applied while reading.
    #[inline]
    pub fn endian_swap(&self) -> bool {
        self.endian_swap
    }

    /// True if any read of this session came up short.
    ///
    /// Tag tests never set it.
    #[inline]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Byte order the archive was written with.
    pub fn endianness(&self) -> Endianness {
        let native = Endianness::native();
        match (self.endian_swap, native) {
            (false, e) => e,
            (true, Endianness::Little) => Endianness::Big,
            (true, Endianness::Big) => Endianness::Little,
        }
    }

    /// Reads raw bytes, no conversion. Returns the number of bytes read.
    #[inline]
    pub fn load_binary(&mut self, data: &mut [u8]) -> usize {
        self.read_bytes(data)
    }

    /// Reads one object.
    ///
    /// # Panics
    ///
    /// Panics if `T` is tagged and the stream does not hold its tag.
    pub fn read<T: Archivable + Default>(&mut self) -> T {
        let mut value = T::default();
        self.read_into(&mut value);
        value
    }

    /// Reads one object into `value`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is tagged and the stream does not hold its tag.
    pub fn read_into<T: Archivable>(&mut self, value: &mut T) {
        let valid = self.validate_tag::<T>();
        assert!(valid, "Type tag does not match archive content.");

        let version = self.load_version::<T>();
        T::load(self, std::slice::from_mut(value), version);
    }

    /// Reads one object, reporting archive inconsistencies as errors.
    ///
    /// A tag mismatch or a version newer than `T::VERSION` rewinds the stream
    /// to where the object started. A stream ending before the object is
    /// complete yields [`ErrorKind::UnexpectedEof`].
    pub fn try_read<T: Archivable + Default>(&mut self) -> Result<T> {
        let tell = self.stream.tell()?;
        if !self.validate_tag::<T>() {
            self.stream.seek(tell, Origin::Set)?;
            return Err(Error::tag_mismatch(T::TAG.unwrap_or_default()));
        }

        let before = std::mem::take(&mut self.truncated);
        let version = self.load_version::<T>();
        if version > T::VERSION {
            self.truncated |= before;
            self.stream.seek(tell, Origin::Set)?;
            return Err(Error::UnsupportedVersion {
                type_name: short_type_name::<T>(),
                version,
            });
        }
        let mut value = T::default();
        T::load(self, std::slice::from_mut(&mut value), version);

        let ended = self.truncated;
        self.truncated |= before;
        if ended {
            return Err(Error::Io(ErrorKind::UnexpectedEof.into()));
        }
        Ok(value)
    }

    /// Reads a contiguous run of objects written by [`OArchive::write_array`].
    pub fn read_array<T: Archivable>(&mut self, values: &mut [T]) {
        let version = self.load_version::<T>();
        T::load(self, values, version);
    }

    /// Reads a run of `count` objects written by [`OArchive::write_array`].
    ///
    /// Storage grows in bounded steps, so a corrupted count cannot cause a
    /// huge allocation. If the stream ends first, the incomplete step is
    /// dropped and fewer than `count` values are returned.
    pub fn read_vec<T: Archivable + Default>(&mut self, count: usize) -> Vec<T> {
        let version = self.load_version::<T>();
        let step = (READ_STEP_BYTES / std::mem::size_of::<T>().max(1)).max(1);

        let before = std::mem::take(&mut self.truncated);
        let mut values = Vec::new();
        while values.len() < count {
            let start = values.len();
            values.resize_with((start + step).min(count), T::default);
            T::load(self, &mut values[start..], version);
            if self.truncated {
                warn!("Stream ended within elements {} to {} of {}.", start, values.len(), count);
                values.truncate(start);
                break;
            }
        }
        self.truncated |= before;
        values
    }

    /// Reads one scalar. A short read yields zero bytes for the missing part.
    #[inline]
    pub fn read_primitive<T: Primitive>(&mut self) -> T {
        let mut value = T::default();
        self.read_bytes(bytemuck::bytes_of_mut(&mut value));
        if self.endian_swap {
            value.endian_swap()
        } else {
            value
        }
    }

    /// Reads scalars in one block, then swaps them in place if needed.
    pub fn read_primitives<T: Primitive>(&mut self, values: &mut [T]) {
        self.read_bytes(bytemuck::cast_slice_mut(values));
        if self.endian_swap {
            endian_swap_slice(values);
        }
    }

    /// Tests whether the next bytes hold `T`'s tag, without consuming them.
    ///
    /// Only tagged types can be tested, untagged types fail to compile.
    pub fn test_tag<T: Archivable>(&mut self) -> bool {
        const { assert!(T::TAG.is_some(), "Only tagged types can be tested.") };

        let Ok(tell) = self.stream.tell() else {
            return false;
        };
        let valid = self.validate_tag::<T>();
        // Rewinds before the tag test.
        let _ = self.stream.seek(tell, Origin::Set);
        valid
    }

    /// Underlying stream.
    pub fn stream(&mut self) -> &mut (dyn Stream + 'a) {
        &mut *self.stream
    }

    fn read_bytes(&mut self, data: &mut [u8]) -> usize {
        let read = self.stream.read(data);
        self.truncated |= read < data.len();
        read
    }

    fn validate_tag<T: Archivable>(&mut self) -> bool {
        let Some(tag) = T::TAG else {
            return true;
        };
        let mut buf: SmallVec<[u8; 32]> = smallvec![0; tag.len()];
        let read = self.stream.read(&mut buf);
        read == tag.len() && buf.as_slice() == tag
    }

    fn load_version<T: Archivable>(&mut self) -> u32 {
        if T::VERSION != 0 {
            self.read_primitive::<u32>()
        } else {
            0
        }
    }
}

/// Type name without its module path.
fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}
