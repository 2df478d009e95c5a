mod encoding;
mod file;
mod format;
mod layout;
mod scanner;


pub use encoding::resolve_encoding;
pub use file::ColumnarFile;
pub use format::{Int96Format, ScanOptions};
pub use layout::{ColumnInfo, FileLayout, PhysicalKind, RowGroupInfo};
pub use scanner::ColumnScanner;
