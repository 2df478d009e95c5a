use std::fs::File;

use crate::error::Result;
use crate::parser::{Int96Format, ScanOptions, resolve_encoding};
use crate::reader::{RowIterator, RowWindow};
use crate::source::ByteView;

/// Configures rendering and windowing for row readers.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    width: usize,
    batch_size: Option<usize>,
    int96: Int96Format,
    encoding: Option<String>,
    skip_rows: Option<u64>,
    max_rows: Option<u64>,
}

impl ReadOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: 0,
            batch_size: None,
            int96: Int96Format::Words,
            encoding: None,
            skip_rows: None,
            max_rows: None,
        }
    }

    /// Pads rendered values to at least `width` characters, left-aligned.
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Number of values each column scanner decodes per refill.
    #[must_use]
    pub const fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(if size == 0 { 1 } else { size });
        self
    }

    #[must_use]
    pub const fn with_int96_format(mut self, format: Int96Format) -> Self {
        self.int96 = format;
        self
    }

    /// Character encoding used to decode variable-length byte sequences.
    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.encoding = if label.trim().is_empty() {
            None
        } else {
            Some(label)
        };
        self
    }

    #[must_use]
    pub const fn with_skip_rows(mut self, count: u64) -> Self {
        self.skip_rows = Some(count);
        self
    }

    #[must_use]
    pub const fn with_max_rows(mut self, count: u64) -> Self {
        self.max_rows = Some(count);
        self
    }

    fn skip_rows(&self) -> u64 {
        self.skip_rows.unwrap_or(0)
    }

    const fn max_rows(&self) -> Option<u64> {
        self.max_rows
    }

    /// Resolves the options shared by every column scanner.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured encoding label is unknown.
    pub fn scan_options(&self) -> Result<ScanOptions> {
        let defaults = ScanOptions::default();
        Ok(ScanOptions {
            width: self.width,
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            int96: self.int96,
            encoding: resolve_encoding(self.encoding.as_deref())?,
        })
    }

    fn window(&self, view: ByteView, scan: ScanOptions) -> Result<RowWindow> {
        let rows = RowIterator::from_view(view, scan)?;
        Ok(RowWindow::new(rows, self.skip_rows(), self.max_rows()))
    }
}

/// Opens a row iterator over an already-open file, with default rendering.
///
/// # Errors
///
/// Returns an error if the file cannot be mapped or is not a Parquet file.
pub fn open_file(file: &File) -> Result<RowIterator> {
    RowIterator::from_view(ByteView::map(file)?, ScanOptions::default())
}

/// Opens a windowed row iterator over an already-open file.
///
/// # Errors
///
/// Returns an error if the options are invalid, the file cannot be mapped,
/// or it is not a Parquet file.
pub fn open_file_with_options(file: &File, options: &ReadOptions) -> Result<RowWindow> {
    let scan = options.scan_options()?;
    options.window(ByteView::map(file)?, scan)
}

#[cfg(unix)]
mod fd {
    use std::os::fd::{AsFd, BorrowedFd, RawFd};

    use super::{ReadOptions, Result, RowIterator, RowWindow, ScanOptions};
    use crate::source::ByteView;

    /// Opens a row iterator over the file behind `fd`.
    ///
    /// The descriptor must reference a regular, readable file. It stays owned
    /// by the caller; the iterator keeps only the mapping.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] for descriptor failures,
    /// [`crate::Error::Mapping`] if the mapping is denied and
    /// [`crate::Error::Format`] if the content is not a Parquet file.
    pub fn open<F: AsFd>(fd: F) -> Result<RowIterator> {
        RowIterator::from_view(ByteView::map_fd(fd.as_fd())?, ScanOptions::default())
    }

    /// Opens a windowed row iterator over the file behind `fd`.
    ///
    /// # Errors
    ///
    /// See [`open`]; additionally fails if the options are invalid.
    pub fn open_with_options<F: AsFd>(fd: F, options: &ReadOptions) -> Result<RowWindow> {
        let scan = options.scan_options()?;
        options.window(ByteView::map_fd(fd.as_fd())?, scan)
    }

    /// Opens a row iterator from a raw descriptor number.
    ///
    /// # Errors
    ///
    /// See [`open`].
    ///
    /// # Safety
    ///
    /// `fd` must be an open descriptor that stays open for the duration of
    /// the call.
    pub unsafe fn open_raw_fd(fd: RawFd) -> Result<RowIterator> {
        // SAFETY: upheld by the caller.
        let fd = unsafe { BorrowedFd::borrow_raw(fd) };
        open(fd)
    }
}

#[cfg(unix)]
pub use fd::{open, open_raw_fd, open_with_options};
