//! Byte streams underlying archives.
//!
//! Streams follow POSIX-like semantics: `read` and `write` never fail, they
//! return the number of bytes actually transferred. Seeking past the end is
//! allowed; a later write fills the gap with zeros.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::util::{Error, Result};

/// Reference position for [`Stream::seek`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Current position of the cursor.
    Current,
    /// End of stream.
    End,
    /// Beginning of stream.
    Set,
}

/// Random access byte source/sink.
pub trait Stream {
    /// Tests whether the stream is opened.
    fn opened(&self) -> bool;

    /// Reads up to `buffer.len()` bytes and advances the cursor.
    /// Returns the number of bytes read, less than requested only at end of stream.
    fn read(&mut self, buffer: &mut [u8]) -> usize;

    /// Writes `buffer` and advances the cursor.
    /// Returns the number of bytes written.
    fn write(&mut self, buffer: &[u8]) -> usize;

    /// Moves the cursor to `offset` relative to `origin`.
    fn seek(&mut self, offset: i32, origin: Origin) -> Result<()>;

    /// Current cursor position.
    fn tell(&self) -> Result<i32>;
}

// ============================================================================
// File stream
// ============================================================================

/// Stream over an OS file. Owns the file handle and closes it on drop.
#[derive(Debug, Default)]
pub struct FileStream {
    file: Option<File>,
}

impl FileStream {
    /// Open an existing file for reading.
    ///
    /// Use [`Stream::opened`] to test the result.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with(path, OpenOptions::new().read(true))
    }

    /// Create (or truncate) a file for writing and reading back.
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self::open_with(
            path,
            OpenOptions::new().read(true).write(true).create(true).truncate(true),
        )
    }

    /// Open a file with explicit options. Failure yields a closed stream.
    pub fn open_with(path: impl AsRef<Path>, options: &OpenOptions) -> Self {
        let path = path.as_ref();
        match options.open(path) {
            Ok(file) => Self { file: Some(file) },
            Err(e) => {
                debug!("Failed to open {}: {}", path.display(), e);
                Self { file: None }
            }
        }
    }

    /// Open an existing file for reading, reporting why it failed.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        Ok(Self { file: Some(file) })
    }

    /// Create a file for writing, reporting why it failed.
    pub fn try_create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file: Some(file) })
    }

    /// Take ownership of an already opened file.
    pub fn from_file(file: File) -> Self {
        Self { file: Some(file) }
    }

    /// Close the file, reporting a failed flush. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

impl Stream for FileStream {
    fn opened(&self) -> bool {
        self.file.is_some()
    }

    fn read(&mut self, buffer: &mut [u8]) -> usize {
        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        let mut done = 0;
        while done < buffer.len() {
            match file.read(&mut buffer[done..]) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    trace!("File read stopped after {} bytes: {}", done, e);
                    break;
                }
            }
        }
        done
    }

    fn write(&mut self, buffer: &[u8]) -> usize {
        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        let mut done = 0;
        while done < buffer.len() {
            match file.write(&buffer[done..]) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    trace!("File write stopped after {} bytes: {}", done, e);
                    break;
                }
            }
        }
        done
    }

    fn seek(&mut self, offset: i32, origin: Origin) -> Result<()> {
        let file = self.file.as_mut().ok_or(Error::StreamNotOpened)?;
        let target = match origin {
            Origin::Current => SeekFrom::Current(offset as i64),
            Origin::End => SeekFrom::End(offset as i64),
            Origin::Set => {
                if offset < 0 {
                    return Err(Error::InvalidSeek { offset, origin });
                }
                SeekFrom::Start(offset as u64)
            }
        };
        match file.seek(target) {
            Ok(pos) if pos <= i32::MAX as u64 => Ok(()),
            Ok(_) => Err(Error::InvalidSeek { offset, origin }),
            Err(e) if e.kind() == ErrorKind::InvalidInput => {
                Err(Error::InvalidSeek { offset, origin })
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn tell(&self) -> Result<i32> {
        let mut file = self.file.as_ref().ok_or(Error::StreamNotOpened)?;
        let pos = file.stream_position()?;
        i32::try_from(pos).map_err(|_| Error::other(format!("File position {} exceeds stream range", pos)))
    }
}

// ============================================================================
// Memory stream
// ============================================================================

/// Growable in-memory stream, always opened.
///
/// Capacity grows in [`MemoryStream::BUFFER_SIZE_INCREMENT`] steps and never
/// shrinks. Size is bounded by [`MemoryStream::MAX_SIZE`] so positions fit in `i32`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStream {
    /// Allocated storage, `buffer.len()` is the allocated size.
    buffer: Vec<u8>,
    /// Logical size (high-water mark of written data).
    end: usize,
    /// Cursor position, may exceed `end`.
    tell: usize,
}

impl MemoryStream {
    /// Capacity growth step, must be a power of two.
    pub const BUFFER_SIZE_INCREMENT: usize = 16 << 10;

    /// Maximum stream size.
    pub const MAX_SIZE: usize = i32::MAX as usize;

    /// Empty stream with no allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical content written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.end]
    }

    /// Logical size in bytes.
    pub fn len(&self) -> usize {
        self.end
    }

    /// True if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// Allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Grow storage so it can hold `size` bytes. Returns false on allocation failure.
    fn resize(&mut self, size: usize) -> bool {
        const _: () = assert!(MemoryStream::BUFFER_SIZE_INCREMENT.is_power_of_two());

        if size > self.buffer.len() {
            let mask = Self::BUFFER_SIZE_INCREMENT - 1;
            let alloc_size = (size + mask) & !mask;
            let additional = alloc_size - self.buffer.len();
            if self.buffer.try_reserve_exact(additional).is_err() {
                return false;
            }
            self.buffer.resize(alloc_size, 0);
        }
        true
    }
}

impl Stream for MemoryStream {
    fn opened(&self) -> bool {
        true
    }

    fn read(&mut self, buffer: &mut [u8]) -> usize {
        // A read cannot move past the end nor exceed the maximum size.
        if self.tell > self.end || buffer.len() > Self::MAX_SIZE {
            return 0;
        }
        let size = buffer.len().min(self.end - self.tell);
        buffer[..size].copy_from_slice(&self.buffer[self.tell..self.tell + size]);
        self.tell += size;
        size
    }

    fn write(&mut self, buffer: &[u8]) -> usize {
        let size = buffer.len();
        if size > Self::MAX_SIZE || self.tell > Self::MAX_SIZE - size {
            return 0;
        }
        if self.tell > self.end {
            // Bytes in the gap read back as zeros until written.
            if !self.resize(self.tell) {
                return 0;
            }
            self.buffer[self.end..self.tell].fill(0);
            self.end = self.tell;
        }
        let tell_end = self.tell + size;
        if !self.resize(tell_end) {
            return 0;
        }
        self.buffer[self.tell..tell_end].copy_from_slice(buffer);
        self.end = self.end.max(tell_end);
        self.tell = tell_end;
        size
    }

    fn seek(&mut self, offset: i32, origin: Origin) -> Result<()> {
        let base = match origin {
            Origin::Current => self.tell,
            Origin::End => self.end,
            Origin::Set => 0,
        } as i64;
        let target = base + offset as i64;
        if target < 0 || target > Self::MAX_SIZE as i64 {
            return Err(Error::InvalidSeek { offset, origin });
        }
        // Only the cursor moves; `end` follows on the next write.
        self.tell = target as usize;
        Ok(())
    }

    fn tell(&self) -> Result<i32> {
        Ok(self.tell as i32)
    }
}
