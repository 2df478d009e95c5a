use std::iter::FusedIterator;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::logger::{log_error, log_warn};
use crate::parser::{ColumnScanner, ColumnarFile, FileLayout, ScanOptions};
use crate::source::ByteView;

use super::row::Row;

struct ActiveColumn {
    path: Arc<str>,
    scanner: ColumnScanner,
}

/// Scanners of the row group currently being materialized.
struct RowGroupCursor {
    index: usize,
    columns: Vec<ActiveColumn>,
    emitted: u64,
}

impl RowGroupCursor {
    /// Pulls one value from every scanner that still has one.
    ///
    /// A record exists as long as any column yielded something, null or not.
    /// This only lines up columns correctly when every column of the group
    /// holds the same number of values (flat schemas); repeated columns
    /// produce extra, partially filled records.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    fn pull_row(&mut self) -> Result<Option<Row>> {
        let mut row = Row::with_capacity(self.columns.len());
        let mut contributed = false;

        for column in &mut self.columns {
            if !column.scanner.has_next()? {
                continue;
            }
            contributed = true;
            let value = column.scanner.next_value();
            debug_assert!(
                !matches!(value, Err(Error::NoMoreValues { .. })),
                "scanner for '{}' ran dry after reporting a value",
                column.path
            );
            if let Some(value) = value? {
                row.push(Arc::clone(&column.path), value);
            }
        }

        if contributed {
            self.emitted += 1;
            Ok(Some(row))
        } else {
            Ok(None)
        }
    }
}

enum IterState {
    NeedRowGroupInit,
    Pulling(RowGroupCursor),
    Exhausted,
}

/// Forward-only, single-pass sequence of rows over a Parquet file.
///
/// The iterator owns the file and its memory mapping; both are released when
/// it is dropped. After the last row, or after any error, it only reports
/// end of sequence.
pub struct RowIterator {
    file: ColumnarFile,
    options: ScanOptions,
    row_group: usize,
    state: IterState,
}

impl RowIterator {
    #[must_use]
    pub const fn new(file: ColumnarFile, options: ScanOptions) -> Self {
        Self {
            file,
            options,
            row_group: 0,
            state: IterState::NeedRowGroupInit,
        }
    }

    /// Opens the Parquet file held by `view`.
    ///
    /// # Errors
    ///
    /// Returns an error if the footer cannot be decoded.
    pub fn from_view(view: ByteView, options: ScanOptions) -> Result<Self> {
        let file = ColumnarFile::open(view)?;
        Ok(Self::new(file, options))
    }

    #[must_use]
    pub const fn layout(&self) -> &FileLayout {
        self.file.layout()
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.state, IterState::Exhausted)
    }

    /// Produces the next row, or `Ok(None)` once every row group is drained.
    ///
    /// # Errors
    ///
    /// Returns an error if a row group cannot be opened or a page fails to
    /// decode. The iterator is exhausted afterwards.
    pub fn try_next(&mut self) -> Result<Option<Row>> {
        match self.advance() {
            Ok(row) => Ok(row),
            Err(err) => {
                self.state = IterState::Exhausted;
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<Row>> {
        loop {
            match self.state {
                IterState::Exhausted => return Ok(None),
                IterState::NeedRowGroupInit => {
                    if self.row_group >= self.file.row_group_count() {
                        self.state = IterState::Exhausted;
                        return Ok(None);
                    }
                    let cursor = self.open_cursor(self.row_group)?;
                    self.state = IterState::Pulling(cursor);
                }
                IterState::Pulling(ref mut cursor) => {
                    if let Some(row) = cursor.pull_row()? {
                        return Ok(Some(row));
                    }
                    let (index, emitted) = (cursor.index, cursor.emitted);
                    self.state = IterState::NeedRowGroupInit;
                    self.finish_row_group(index, emitted);
                    self.row_group += 1;
                }
            }
        }
    }

    fn open_cursor(&self, index: usize) -> Result<RowGroupCursor> {
        let readers = self.file.open_row_group(index).inspect_err(|err| {
            log_error(&format!("failed to open row group {index}: {err}"));
        })?;
        let columns = readers
            .into_iter()
            .map(|(column, reader)| {
                let scanner = ColumnScanner::new(reader, column, index, &self.options)?;
                Ok(ActiveColumn {
                    path: Arc::clone(&column.path),
                    scanner,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RowGroupCursor {
            index,
            columns,
            emitted: 0,
        })
    }

    fn finish_row_group(&self, index: usize, emitted: u64) {
        let Some(declared) = self.file.layout().row_groups.get(index).map(|g| g.num_rows) else {
            return;
        };
        if declared != emitted {
            log_warn(&format!(
                "row group {index} declares {declared} rows but its columns yielded {emitted}; \
                 repeated or ragged columns are not aligned"
            ));
        }
    }
}

impl Iterator for RowIterator {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().transpose()
    }
}

impl FusedIterator for RowIterator {}
