#![allow(dead_code)]

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::sync::Arc;

use parquet::data_type::{
    BoolType, ByteArray, ByteArrayType, DoubleType, FixedLenByteArray, FixedLenByteArrayType,
    FloatType, Int32Type, Int64Type, Int96, Int96Type,
};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::{SerializedColumnWriter, SerializedFileWriter};
use parquet::schema::parser::parse_message_type;
use parquet_rows::Row;

pub enum Values {
    Bool(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Int96(Vec<Int96>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Bytes(Vec<ByteArray>),
    Fixed(Vec<FixedLenByteArray>),
}

/// Values plus levels for one column chunk.
pub struct Column {
    values: Values,
    def_levels: Option<Vec<i16>>,
    rep_levels: Option<Vec<i16>>,
}

impl Column {
    pub const fn required(values: Values) -> Self {
        Self {
            values,
            def_levels: None,
            rep_levels: None,
        }
    }

    pub fn with_levels(values: Values, def_levels: &[i16], rep_levels: Option<&[i16]>) -> Self {
        Self {
            values,
            def_levels: Some(def_levels.to_vec()),
            rep_levels: rep_levels.map(<[i16]>::to_vec),
        }
    }

    pub fn int32(values: &[i32]) -> Self {
        Self::required(Values::Int32(values.to_vec()))
    }

    pub fn optional_int32(values: &[Option<i32>]) -> Self {
        let (present, defs) = split_optional(values);
        Self::with_levels(Values::Int32(present), &defs, None)
    }

    pub fn optional_str(values: &[Option<&str>]) -> Self {
        let (present, defs) = split_optional(values);
        let present = present.into_iter().map(ByteArray::from).collect();
        Self::with_levels(Values::Bytes(present), &defs, None)
    }

    pub fn str(values: &[&str]) -> Self {
        Self::required(Values::Bytes(
            values.iter().copied().map(ByteArray::from).collect(),
        ))
    }

    fn write(&self, column: &mut SerializedColumnWriter<'_>) {
        let defs = self.def_levels.as_deref();
        let reps = self.rep_levels.as_deref();
        let written = match &self.values {
            Values::Bool(v) => column.typed::<BoolType>().write_batch(v, defs, reps),
            Values::Int32(v) => column.typed::<Int32Type>().write_batch(v, defs, reps),
            Values::Int64(v) => column.typed::<Int64Type>().write_batch(v, defs, reps),
            Values::Int96(v) => column.typed::<Int96Type>().write_batch(v, defs, reps),
            Values::Float(v) => column.typed::<FloatType>().write_batch(v, defs, reps),
            Values::Double(v) => column.typed::<DoubleType>().write_batch(v, defs, reps),
            Values::Bytes(v) => column.typed::<ByteArrayType>().write_batch(v, defs, reps),
            Values::Fixed(v) => column
                .typed::<FixedLenByteArrayType>()
                .write_batch(v, defs, reps),
        };
        written.expect("write column batch");
    }
}

fn split_optional<T: Copy>(values: &[Option<T>]) -> (Vec<T>, Vec<i16>) {
    let present = values.iter().filter_map(|value| *value).collect();
    let defs = values
        .iter()
        .map(|value| i16::from(value.is_some()))
        .collect();
    (present, defs)
}

/// Writes a Parquet file with one entry of `row_groups` per row group and
/// returns a handle positioned at the start.
pub fn write_parquet(schema: &str, row_groups: Vec<Vec<Column>>) -> File {
    write_parquet_with(schema, row_groups, WriterProperties::builder().build())
}

pub fn write_parquet_with(
    schema: &str,
    row_groups: Vec<Vec<Column>>,
    props: WriterProperties,
) -> File {
    let schema = Arc::new(parse_message_type(schema).expect("parse schema"));
    let mut file = tempfile::tempfile().expect("create temp file");
    let sink = file.try_clone().expect("clone temp file handle");
    let mut writer =
        SerializedFileWriter::new(sink, schema, Arc::new(props)).expect("create writer");

    for group in row_groups {
        let mut row_group = writer.next_row_group().expect("start row group");
        for column in group {
            let mut column_writer = row_group
                .next_column()
                .expect("next column")
                .expect("schema has another column");
            column.write(&mut column_writer);
            column_writer.close().expect("close column");
        }
        row_group.close().expect("close row group");
    }
    writer.close().expect("close writer");
    file.seek(SeekFrom::Start(0)).expect("rewind");
    file
}

/// Writes raw bytes into a temporary file.
pub fn write_bytes(bytes: &[u8]) -> File {
    let mut file = tempfile::tempfile().expect("create temp file");
    file.write_all(bytes).expect("write bytes");
    file.flush().expect("flush bytes");
    file
}

pub fn int96(low: u32, mid: u32, high: u32) -> Int96 {
    let mut value = Int96::new();
    value.set_data(low, mid, high);
    value
}

/// Owned `(path, value)` pairs for compact assertions.
pub fn pairs(row: &Row) -> Vec<(String, String)> {
    row.clone().into_pairs()
}

pub fn pair(path: &str, value: &str) -> (String, String) {
    (path.to_owned(), value.to_owned())
}
