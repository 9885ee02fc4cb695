//! Table and index façades combining schema, conditionals and pagination
//! into the operations application code calls.

mod index;
mod operations;
mod requests;

pub use index::MappedIndex;
pub use operations::MappedTable;
pub use requests::{GetItemRequest, QueryRequest, ScanRequest};
