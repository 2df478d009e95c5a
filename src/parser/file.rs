use std::borrow::Cow;

use bytes::Bytes;
use parquet::column::reader::ColumnReader;
use parquet::file::reader::{FileReader, RowGroupReader};
use parquet::file::serialized_reader::SerializedFileReader;

use crate::error::{Error, Result, Section};
use crate::source::ByteView;

use super::layout::{ColumnInfo, FileLayout, PhysicalKind};

/// Parquet file opened over a memory-mapped byte view.
///
/// The reader shares the mapping with every column reader it hands out; the
/// mapping goes away once the file and all of its column readers are dropped.
pub struct ColumnarFile {
    reader: SerializedFileReader<Bytes>,
    layout: FileLayout,
}

impl ColumnarFile {
    /// Parses the footer of the file held by `view`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] when the footer or magic marker is missing
    /// or unreadable, [`Error::Corrupted`] when the decoded metadata is
    /// inconsistent and [`Error::Unsupported`] for unknown physical types.
    pub fn open(view: ByteView) -> Result<Self> {
        let reader = SerializedFileReader::new(view.into_bytes()).map_err(Error::from_footer)?;
        let layout = FileLayout::from_metadata(reader.metadata())?;
        Ok(Self { reader, layout })
    }

    #[must_use]
    pub const fn layout(&self) -> &FileLayout {
        &self.layout
    }

    #[must_use]
    pub fn row_group_count(&self) -> usize {
        self.layout.row_group_count()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.layout.column_count()
    }

    #[must_use]
    pub fn column_path(&self, index: usize) -> Option<&str> {
        self.layout.column(index).map(|column| column.path.as_ref())
    }

    #[must_use]
    pub fn column_physical_type(&self, index: usize) -> Option<PhysicalKind> {
        self.layout.column(index).map(|column| column.kind)
    }

    /// Opens one raw value cursor per column of row group `index`, in
    /// schema order, each positioned at the start of its column chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] when the row group cannot be read or its
    /// column count disagrees with the schema.
    pub fn open_row_group(&self, index: usize) -> Result<Vec<(&ColumnInfo, ColumnReader)>> {
        if index >= self.layout.row_group_count() {
            return Err(Error::Corrupted {
                section: Section::RowGroup { index },
                details: Cow::Owned(format!(
                    "file declares only {} row groups",
                    self.layout.row_group_count()
                )),
            });
        }
        let group = self
            .reader
            .get_row_group(index)
            .map_err(|err| Error::from_parquet(Section::RowGroup { index }, err))?;

        let found = group.num_columns();
        if found != self.layout.column_count() {
            return Err(Error::Corrupted {
                section: Section::RowGroup { index },
                details: Cow::Owned(format!(
                    "row group holds {found} columns but the schema declares {}",
                    self.layout.column_count()
                )),
            });
        }

        self.layout
            .columns
            .iter()
            .map(|column| {
                let reader = group.get_column_reader(column.index).map_err(|err| {
                    Error::from_parquet(Section::column(index, column.path.as_ref()), err)
                })?;
                Ok((column, reader))
            })
            .collect()
    }
}
