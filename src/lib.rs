//! Lazily materializes dictionary-shaped rows from memory-mapped Parquet files.
//!
//! Each row maps column paths to rendered values; nulls are omitted.

pub mod api;
pub mod error;
pub mod logger;
pub mod parser;
pub mod reader;
pub mod source;

pub use crate::error::{Error, Result};
pub use api::{ReadOptions, open_file, open_file_with_options};
#[cfg(unix)]
pub use api::{open, open_raw_fd, open_with_options};
pub use parser::{ColumnInfo, FileLayout, Int96Format, PhysicalKind, RowGroupInfo};
pub use reader::{Row, RowIterator, RowSource, RowWindow};
pub use source::ByteView;
