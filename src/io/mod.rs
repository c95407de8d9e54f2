//! Binary archive I/O.
//!
//! Streams provide raw byte access, archives layer endianness, type tags and
//! versions on top of them.
//!
//! ## Example
//!
//! ```
//! use ozz_archive::io::{Endianness, IArchive, MemoryStream, OArchive, Origin, Stream};
//!
//! let mut stream = MemoryStream::new();
//! {
//!     let mut archive = OArchive::new(&mut stream, Endianness::Big);
//!     archive.write(&46u32);
//!     archive.write(&String::from("ozz"));
//! }
//!
//! stream.seek(0, Origin::Set).unwrap();
//! let mut archive = IArchive::new(&mut stream);
//! assert_eq!(archive.read::<u32>(), 46);
//! assert_eq!(archive.read::<String>(), "ozz");
//! ```

mod archive;
mod containers;
mod endian;
mod stream;
mod traits;

pub use archive::{IArchive, OArchive};
pub use endian::{endian_swap, endian_swap_slice, EndianSwap, Endianness};
pub use stream::{FileStream, MemoryStream, Origin, Stream};
pub use traits::{Archivable, Primitive};
