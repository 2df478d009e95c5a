mod iterator;
mod row;
mod window;

pub use iterator::RowIterator;
pub use row::Row;
pub use window::{RowSource, RowWindow};
