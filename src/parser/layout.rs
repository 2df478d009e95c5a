use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use parquet::basic::Type as PhysicalType;
use parquet::file::metadata::ParquetMetaData;
use parquet::schema::types::ColumnDescriptor;
use serde::Serialize;

use crate::error::{Error, Result, Section};

/// On-disk primitive encoding of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalKind {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray,
}

impl PhysicalKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Int96 => "int96",
            Self::Float => "float",
            Self::Double => "double",
            Self::ByteArray => "byte_array",
            Self::FixedLenByteArray => "fixed_len_byte_array",
        }
    }
}

impl fmt::Display for PhysicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<PhysicalType> for PhysicalKind {
    type Error = Error;

    #[allow(unreachable_patterns)]
    fn try_from(value: PhysicalType) -> Result<Self> {
        Ok(match value {
            PhysicalType::BOOLEAN => Self::Boolean,
            PhysicalType::INT32 => Self::Int32,
            PhysicalType::INT64 => Self::Int64,
            PhysicalType::INT96 => Self::Int96,
            PhysicalType::FLOAT => Self::Float,
            PhysicalType::DOUBLE => Self::Double,
            PhysicalType::BYTE_ARRAY => Self::ByteArray,
            PhysicalType::FIXED_LEN_BYTE_ARRAY => Self::FixedLenByteArray,
            other => {
                return Err(Error::Unsupported {
                    feature: Cow::Owned(format!("physical type {other:?}")),
                });
            }
        })
    }
}

/// Leaf column of the file schema.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub index: usize,
    /// Dot-separated path of the column within the schema.
    pub path: Arc<str>,
    pub kind: PhysicalKind,
    pub max_def_level: i16,
    pub max_rep_level: i16,
    /// Byte width of fixed-length values; zero for other kinds.
    pub type_length: usize,
}

impl ColumnInfo {
    fn from_descriptor(index: usize, descr: &ColumnDescriptor) -> Result<Self> {
        let kind = PhysicalKind::try_from(descr.physical_type())?;
        let type_length = if kind == PhysicalKind::FixedLenByteArray {
            usize::try_from(descr.type_length()).map_err(|_| Error::Corrupted {
                section: Section::Footer,
                details: Cow::Owned(format!(
                    "negative type length {} for column {}",
                    descr.type_length(),
                    descr.path().string()
                )),
            })?
        } else {
            0
        };
        Ok(Self {
            index,
            path: Arc::from(descr.path().string()),
            kind,
            max_def_level: descr.max_def_level(),
            max_rep_level: descr.max_rep_level(),
            type_length,
        })
    }

    /// Whether values may be null or repeated, i.e. carry definition levels.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.max_def_level > 0
    }
}

/// Declared shape of a single row group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowGroupInfo {
    pub index: usize,
    pub num_rows: u64,
}

/// Schema and partitioning information decoded from the file footer.
#[derive(Debug, Clone, Serialize)]
pub struct FileLayout {
    pub columns: Vec<ColumnInfo>,
    pub row_groups: Vec<RowGroupInfo>,
    pub created_by: Option<String>,
}

impl FileLayout {
    pub(crate) fn from_metadata(metadata: &ParquetMetaData) -> Result<Self> {
        let schema = metadata.file_metadata().schema_descr();
        let columns = (0..schema.num_columns())
            .map(|index| ColumnInfo::from_descriptor(index, schema.column(index).as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let row_groups = metadata
            .row_groups()
            .iter()
            .enumerate()
            .map(|(index, group)| {
                let num_rows = u64::try_from(group.num_rows()).map_err(|_| Error::Corrupted {
                    section: Section::RowGroup { index },
                    details: Cow::Owned(format!("negative row count {}", group.num_rows())),
                })?;
                Ok(RowGroupInfo { index, num_rows })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            columns,
            row_groups,
            created_by: metadata.file_metadata().created_by().map(str::to_owned),
        })
    }

    #[must_use]
    pub fn row_group_count(&self) -> usize {
        self.row_groups.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Sum of the row counts declared by every row group.
    #[must_use]
    pub fn declared_rows(&self) -> u64 {
        self.row_groups
            .iter()
            .map(|group| group.num_rows)
            .fold(0, u64::saturating_add)
    }

    #[must_use]
    pub fn column(&self, index: usize) -> Option<&ColumnInfo> {
        self.columns.get(index)
    }
}
