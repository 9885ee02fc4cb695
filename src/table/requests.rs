use crate::attribute::AttributeMap;
use crate::key::{Key, QueryConditional};

/// Recognized options of a query, enumerated explicitly.
///
/// Only the conditional is mandatory; [`QueryRequest::new`] (or the
/// `From<QueryConditional>` shortcut accepted by the query operations)
/// fills in the defaults listed per field.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Key-condition predicate resolved against the queried index.
    pub conditional: QueryConditional,
    /// Per-page item cap; default `None` (store-sized pages). Bounds each
    /// page, never the total result count.
    pub limit: Option<u32>,
    /// Resume point from a previous page's `last_evaluated_key`; default
    /// `None` (start from the beginning).
    pub exclusive_start_key: Option<AttributeMap>,
    /// Ascending sort-key order when `true`; default `true`.
    pub scan_index_forward: bool,
    /// Strongly consistent reads where supported; default `false`.
    pub consistent_read: bool,
}

impl QueryRequest {
    /// A request with the given conditional and default options.
    pub fn new(conditional: QueryConditional) -> Self {
        Self {
            conditional,
            limit: None,
            exclusive_start_key: None,
            scan_index_forward: true,
            consistent_read: false,
        }
    }
}

impl From<QueryConditional> for QueryRequest {
    fn from(conditional: QueryConditional) -> Self {
        Self::new(conditional)
    }
}

/// Recognized options of a full-table scan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanRequest {
    /// Per-page item cap; default `None`.
    pub limit: Option<u32>,
    /// Resume point; default `None`.
    pub exclusive_start_key: Option<AttributeMap>,
    /// Strongly consistent reads where supported; default `false`.
    pub consistent_read: bool,
}

/// Recognized options of a single-item read.
#[derive(Debug, Clone, PartialEq)]
pub struct GetItemRequest {
    /// Primary key of the wanted item.
    pub key: Key,
    /// Strongly consistent read; default `false`.
    pub consistent_read: bool,
}

impl GetItemRequest {
    /// A request for the given key with default options.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            consistent_read: false,
        }
    }
}

impl From<Key> for GetItemRequest {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}
