use std::borrow::Cow;
use std::fmt;
use std::io;

use parquet::errors::ParquetError;

/// Result type used across the row materialization engine.
pub type Result<T> = std::result::Result<T, Error>;

/// High-level error type surfaced by the row reader.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure while inspecting or duplicating the input descriptor.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The operating system refused to map the file into memory.
    #[error("memory mapping failed: {source}")]
    Mapping {
        #[source]
        source: io::Error,
    },

    /// The byte view does not hold a readable Parquet file.
    #[error("invalid Parquet file: {details}")]
    Format { details: Cow<'static, str> },

    /// Internal structural references of the file are inconsistent.
    #[error("corrupted Parquet file while processing {section}: {details}")]
    Corrupted {
        section: Section,
        details: Cow<'static, str>,
    },

    /// Features the reader or the decoding library do not implement.
    #[error("not implemented: {feature}")]
    Unsupported { feature: Cow<'static, str> },

    /// A scanner was asked for a value after reporting exhaustion.
    #[error("no more values buffered for column '{column}'")]
    NoMoreValues { column: String },
}

/// Logical part of the file used for diagnostic reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Footer,
    RowGroup { index: usize },
    Column { row_group: usize, path: String },
}

impl Section {
    /// Helper constructor for column sections.
    #[must_use]
    pub fn column(row_group: usize, path: impl Into<String>) -> Self {
        Self::Column {
            row_group,
            path: path.into(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Footer => write!(f, "file footer"),
            Self::RowGroup { index } => write!(f, "row group {index}"),
            Self::Column { row_group, path } => {
                write!(f, "column '{path}' in row group {row_group}")
            }
        }
    }
}

impl Error {
    /// Classifies a decoding-library failure raised while reading `section`.
    ///
    /// Not-implemented reports keep their own category; everything else is
    /// treated as structural corruption since the footer already parsed.
    pub(crate) fn from_parquet(section: Section, err: ParquetError) -> Self {
        match err {
            ParquetError::NYI(feature) => Self::Unsupported {
                feature: Cow::Owned(feature),
            },
            other => Self::Corrupted {
                section,
                details: Cow::Owned(other.to_string()),
            },
        }
    }

    /// Classifies a failure raised while opening the footer.
    pub(crate) fn from_footer(err: ParquetError) -> Self {
        match err {
            ParquetError::NYI(feature) => Self::Unsupported {
                feature: Cow::Owned(feature),
            },
            other => Self::Format {
                details: Cow::Owned(other.to_string()),
            },
        }
    }
}
