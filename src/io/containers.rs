//! Archive support for standard library containers.
//!
//! Both containers are non-versionable and prefix their content with a u32
//! element count.

use super::archive::{IArchive, OArchive};
use super::traits::Archivable;
use tracing::warn;

/// Temporary buffer size used to read strings.
const STRING_CHUNK_SIZE: usize = 128;

impl<T: Archivable + Default> Archivable for Vec<T> {
    const VERSION: u32 = 0;

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for vec in values {
            archive.write_primitive(vec.len() as u32);
            if !vec.is_empty() {
                archive.write_array(vec.as_slice());
            }
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for vec in values {
            let count = archive.read_primitive::<u32>() as usize;
            vec.clear();
            if count > 0 {
                *vec = archive.read_vec(count);
            }
        }
    }
}

impl Archivable for String {
    const VERSION: u32 = 0;

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for string in values {
            let bytes = string.as_bytes();
            archive.write_primitive(bytes.len() as u32);
            archive.write_primitives(bytes);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for string in values {
            let size = archive.read_primitive::<u32>() as usize;
            let mut bytes = Vec::new();
            let mut chunk = [0u8; STRING_CHUNK_SIZE];
            let mut remaining = size;
            while remaining > 0 {
                let to_read = remaining.min(STRING_CHUNK_SIZE);
                let read = archive.load_binary(&mut chunk[..to_read]);
                bytes.extend_from_slice(&chunk[..read]);
                if read < to_read {
                    warn!("Stream ended after {} of {} string bytes.", bytes.len(), size);
                    break;
                }
                remaining -= to_read;
            }
            *string = match String::from_utf8(bytes) {
                Ok(s) => s,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            };
        }
    }
}
