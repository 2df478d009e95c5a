//! Zero-copy byte views over memory-mapped input files.

use std::borrow::Cow;
use std::fs::File;
use std::io;

use bytes::Bytes;
use memmap2::MmapOptions;

use crate::error::{Error, Result};

/// Immutable, randomly addressable view of an entire input file.
///
/// The mapping is owned by the underlying [`Bytes`] handle and is unmapped
/// once the last clone of the view is dropped, whichever path drops it.
#[derive(Clone, Debug)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Maps the whole of `file` read-only and copy-on-write private.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be inspected or is not a
    /// regular file, [`Error::Format`] when it is empty and
    /// [`Error::Mapping`] when the mapping request is denied.
    pub fn map(file: &File) -> Result<Self> {
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "descriptor does not reference a regular file",
            )));
        }
        let len = usize::try_from(metadata.len()).map_err(|_| Error::Mapping {
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "file size exceeds platform pointer width",
            ),
        })?;
        if len == 0 {
            return Err(Error::Format {
                details: Cow::from("file is empty"),
            });
        }

        // SAFETY: the mapping is private and read-only; callers are expected
        // not to truncate the file while a reader is alive.
        let mmap = unsafe { MmapOptions::new().len(len).map_copy_read_only(file) }
            .map_err(|source| Error::Mapping { source })?;
        Ok(Self {
            bytes: Bytes::from_owner(mmap),
        })
    }

    /// Maps the file referenced by an already-open descriptor.
    ///
    /// The descriptor is duplicated for the duration of the call only; the
    /// caller keeps ownership of `fd`.
    ///
    /// # Errors
    ///
    /// See [`ByteView::map`].
    #[cfg(unix)]
    pub fn map_fd(fd: std::os::fd::BorrowedFd<'_>) -> Result<Self> {
        let file = File::from(fd.try_clone_to_owned()?);
        Self::map(&file)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Hands the underlying shared buffer to the format reader.
    pub(crate) fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
