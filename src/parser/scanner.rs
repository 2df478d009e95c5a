use std::borrow::Cow;
use std::sync::Arc;

use parquet::column::reader::{ColumnReader, ColumnReaderImpl};
use parquet::data_type::{
    BoolType, ByteArrayType, DataType, DoubleType, FixedLenByteArrayType, FloatType, Int32Type,
    Int64Type, Int96Type,
};

use crate::error::{Error, Result, Section};

use super::format::{RenderValue, Renderer, ScanOptions};
use super::layout::{ColumnInfo, PhysicalKind};

/// Buffered cursor over one column chunk, yielding rendered values.
pub struct TypedScanner<T: DataType> {
    reader: ColumnReaderImpl<T>,
    path: Arc<str>,
    row_group: usize,
    max_def_level: i16,
    max_rep_level: i16,
    batch_size: usize,
    renderer: Renderer,
    def_levels: Vec<i16>,
    rep_levels: Vec<i16>,
    values: Vec<T::T>,
    levels_buffered: usize,
    level_offset: usize,
    value_offset: usize,
    exhausted: bool,
}

impl<T> TypedScanner<T>
where
    T: DataType,
    T::T: RenderValue,
{
    fn new(
        reader: ColumnReaderImpl<T>,
        column: &ColumnInfo,
        row_group: usize,
        options: &ScanOptions,
    ) -> Self {
        let batch_size = options.batch_size.max(1);
        Self {
            reader,
            path: Arc::clone(&column.path),
            row_group,
            max_def_level: column.max_def_level,
            max_rep_level: column.max_rep_level,
            batch_size,
            renderer: Renderer::new(options),
            def_levels: Vec::with_capacity(batch_size),
            rep_levels: Vec::new(),
            values: Vec::with_capacity(batch_size),
            levels_buffered: 0,
            level_offset: 0,
            value_offset: 0,
            exhausted: false,
        }
    }

    fn section(&self) -> Section {
        Section::column(self.row_group, self.path.as_ref())
    }

    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    fn refill(&mut self) -> Result<()> {
        self.def_levels.clear();
        self.rep_levels.clear();
        self.values.clear();
        self.level_offset = 0;
        self.value_offset = 0;

        let def_levels = (self.max_def_level > 0).then_some(&mut self.def_levels);
        let rep_levels = (self.max_rep_level > 0).then_some(&mut self.rep_levels);
        let read = self
            .reader
            .read_records(self.batch_size, def_levels, rep_levels, &mut self.values);
        let (_, values_read, levels_read) = match read {
            Ok(counts) => counts,
            Err(err) => {
                self.exhausted = true;
                self.levels_buffered = 0;
                return Err(Error::from_parquet(self.section(), err));
            }
        };

        self.levels_buffered = if self.max_def_level > 0 {
            levels_read
        } else {
            values_read
        };
        if self.levels_buffered == 0 {
            self.exhausted = true;
        }
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool> {
        if self.level_offset < self.levels_buffered {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        self.refill()?;
        Ok(self.level_offset < self.levels_buffered)
    }

    fn next_value(&mut self) -> Result<Option<String>> {
        if !self.has_next()? {
            return Err(Error::NoMoreValues {
                column: self.path.to_string(),
            });
        }

        let level = self.level_offset;
        self.level_offset += 1;
        if self.max_def_level > 0 && self.def_levels[level] < self.max_def_level {
            return Ok(None);
        }

        let Some(value) = self.values.get(self.value_offset) else {
            self.exhausted = true;
            self.levels_buffered = 0;
            return Err(Error::Corrupted {
                section: self.section(),
                details: Cow::from("definition levels reference more values than were decoded"),
            });
        };
        self.value_offset += 1;
        Ok(Some(self.renderer.render(value)))
    }
}

/// Value scanner for one column of one row group, specialised once at
/// construction for the column's physical type.
pub enum ColumnScanner {
    Boolean(TypedScanner<BoolType>),
    Int32(TypedScanner<Int32Type>),
    Int64(TypedScanner<Int64Type>),
    Int96(TypedScanner<Int96Type>),
    Float(TypedScanner<FloatType>),
    Double(TypedScanner<DoubleType>),
    ByteArray(TypedScanner<ByteArrayType>),
    FixedLenByteArray(TypedScanner<FixedLenByteArrayType>),
}

macro_rules! with_scanner {
    ($self:expr, $scanner:ident => $body:expr) => {
        match $self {
            ColumnScanner::Boolean($scanner) => $body,
            ColumnScanner::Int32($scanner) => $body,
            ColumnScanner::Int64($scanner) => $body,
            ColumnScanner::Int96($scanner) => $body,
            ColumnScanner::Float($scanner) => $body,
            ColumnScanner::Double($scanner) => $body,
            ColumnScanner::ByteArray($scanner) => $body,
            ColumnScanner::FixedLenByteArray($scanner) => $body,
        }
    };
}

impl ColumnScanner {
    /// Wraps a raw column cursor in the scanner matching `column`'s type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] when the cursor decodes a different
    /// physical type than the schema declares for the column.
    pub fn new(
        reader: ColumnReader,
        column: &ColumnInfo,
        row_group: usize,
        options: &ScanOptions,
    ) -> Result<Self> {
        let scanner = match (column.kind, reader) {
            (PhysicalKind::Boolean, ColumnReader::BoolColumnReader(reader)) => {
                Self::Boolean(TypedScanner::new(reader, column, row_group, options))
            }
            (PhysicalKind::Int32, ColumnReader::Int32ColumnReader(reader)) => {
                Self::Int32(TypedScanner::new(reader, column, row_group, options))
            }
            (PhysicalKind::Int64, ColumnReader::Int64ColumnReader(reader)) => {
                Self::Int64(TypedScanner::new(reader, column, row_group, options))
            }
            (PhysicalKind::Int96, ColumnReader::Int96ColumnReader(reader)) => {
                Self::Int96(TypedScanner::new(reader, column, row_group, options))
            }
            (PhysicalKind::Float, ColumnReader::FloatColumnReader(reader)) => {
                Self::Float(TypedScanner::new(reader, column, row_group, options))
            }
            (PhysicalKind::Double, ColumnReader::DoubleColumnReader(reader)) => {
                Self::Double(TypedScanner::new(reader, column, row_group, options))
            }
            (PhysicalKind::ByteArray, ColumnReader::ByteArrayColumnReader(reader)) => {
                Self::ByteArray(TypedScanner::new(reader, column, row_group, options))
            }
            (
                PhysicalKind::FixedLenByteArray,
                ColumnReader::FixedLenByteArrayColumnReader(reader),
            ) => Self::FixedLenByteArray(TypedScanner::new(reader, column, row_group, options)),
            (kind, _) => {
                return Err(Error::Corrupted {
                    section: Section::column(row_group, column.path.as_ref()),
                    details: Cow::Owned(format!(
                        "column reader does not decode the declared {kind} type"
                    )),
                });
            }
        };
        Ok(scanner)
    }

    #[must_use]
    pub const fn kind(&self) -> PhysicalKind {
        match self {
            Self::Boolean(_) => PhysicalKind::Boolean,
            Self::Int32(_) => PhysicalKind::Int32,
            Self::Int64(_) => PhysicalKind::Int64,
            Self::Int96(_) => PhysicalKind::Int96,
            Self::Float(_) => PhysicalKind::Float,
            Self::Double(_) => PhysicalKind::Double,
            Self::ByteArray(_) => PhysicalKind::ByteArray,
            Self::FixedLenByteArray(_) => PhysicalKind::FixedLenByteArray,
        }
    }

    /// Reports whether another value (possibly null) remains in the chunk.
    ///
    /// Once this returns `false` it keeps returning `false`.
    ///
    /// # Errors
    ///
    /// Returns an error when refilling the buffer fails to decode a page.
    pub fn has_next(&mut self) -> Result<bool> {
        with_scanner!(self, scanner => scanner.has_next())
    }

    /// Decodes the next value, returning `None` for nulls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMoreValues`] when called on an exhausted scanner,
    /// or a decoding error when a page cannot be read.
    pub fn next_value(&mut self) -> Result<Option<String>> {
        with_scanner!(self, scanner => scanner.next_value())
    }
}
