//! Runtime float track.

use tracing::error;

use crate::io::{Archivable, IArchive, OArchive};

/// Linearly interpolated float keys, times normalized to [0, 1].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatTrack {
    times: Vec<f32>,
    values: Vec<f32>,
}

impl FloatTrack {
    pub(crate) fn from_parts(times: Vec<f32>, values: Vec<f32>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self { times, values }
    }

    #[inline]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn num_keys(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl Archivable for FloatTrack {
    const VERSION: u32 = 1;
    const TAG: Option<&'static [u8]> = Some(b"ozz-float_track\0");

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for track in values {
            archive.write_primitive(track.times.len() as u32);
            archive.write_primitives(&track.times);
            archive.write_primitives(&track.values);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], version: u32) {
        values.fill_with(Self::default);
        if version > Self::VERSION {
            error!("Unsupported FloatTrack version {version}.");
            return;
        }

        for track in values {
            let count = archive.read_primitive::<u32>() as usize;
            let times: Vec<f32> = archive.read_vec(count);
            let keys: Vec<f32> = archive.read_vec(count);
            if times.len() < count || keys.len() < count {
                error!("FloatTrack archive ends before its {count} keys.");
                return;
            }
            *track = Self::from_parts(times, keys);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Endianness, MemoryStream, Origin, Stream};

    #[test]
    fn test_round_trip() {
        let track = FloatTrack::from_parts(vec![0.0, 0.25, 1.0], vec![3.0, -1.0, 46.0]);
        for endianness in [Endianness::Big, Endianness::Little] {
            let mut stream = MemoryStream::new();
            {
                let mut archive = OArchive::new(&mut stream, endianness);
                archive.write(&track);
            }
            let header = 1 + b"ozz-float_track\0".len() + 4;
            assert_eq!(stream.len(), header + 4 + 3 * 4 * 2);

            stream.seek(0, Origin::Set).unwrap();
            let mut archive = IArchive::new(&mut stream);
            assert_eq!(archive.read::<FloatTrack>(), track);
        }
    }

    #[test]
    fn test_newer_version_leaves_empty() {
        let mut stream = MemoryStream::new();
        {
            let mut archive = OArchive::native(&mut stream);
            archive.save_binary(b"ozz-float_track\0");
            archive.write_primitive(2u32);
            archive.write_primitive(1u32);
        }
        stream.seek(0, Origin::Set).unwrap();
        let mut archive = IArchive::new(&mut stream);
        let track: FloatTrack = archive.read();
        assert!(track.is_empty());
    }

    #[test]
    fn test_corrupted_key_count_leaves_empty() {
        let mut stream = MemoryStream::new();
        {
            let mut archive = OArchive::native(&mut stream);
            archive.save_binary(b"ozz-float_track\0");
            archive.write_primitive(1u32);
            archive.write_primitive(u32::MAX);
            archive.write_primitives(&[0.0f32, 1.0]);
        }
        stream.seek(0, Origin::Set).unwrap();
        let mut archive = IArchive::new(&mut stream);
        let track: FloatTrack = archive.read();
        assert!(track.is_empty());
        assert!(archive.truncated());
    }
}
