use std::error::Error as StdError;
use std::fmt;
use std::future::Future;

use crate::attribute::AttributeMap;
use crate::key::KeyCondition;

/// Opaque transport-layer failure reported by a store client.
///
/// The engine never classifies or retries these; they propagate unchanged to
/// the caller, with the client's own error retained as the source.
#[derive(Debug)]
pub struct StoreError {
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl StoreError {
    /// A store error from a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A store error wrapping an underlying transport error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self.source.as_deref() {
            Some(err) => Some(err),
            None => None,
        }
    }
}

/// One query round-trip against a table or one of its indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryInput {
    /// Table to query.
    pub table_name: String,
    /// Secondary index to query, or `None` for the table's own keys.
    pub index_name: Option<String>,
    /// Resolved key condition.
    pub key_condition: KeyCondition,
    /// Resume point: the previous page's `last_evaluated_key`.
    pub exclusive_start_key: Option<AttributeMap>,
    /// Per-page item cap. Bounds the page, never the full result set.
    pub limit: Option<u32>,
    /// `true` for ascending sort-key order (the default), `false` for
    /// descending.
    pub scan_index_forward: bool,
    /// Request strongly consistent reads where the store supports them.
    pub consistent_read: bool,
}

/// Items plus continuation key returned by one query round-trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryOutput {
    /// Raw items in store return order.
    pub items: Vec<AttributeMap>,
    /// Continuation key; absent when the store has nothing further.
    pub last_evaluated_key: Option<AttributeMap>,
}

/// One scan round-trip over a whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanInput {
    /// Table to scan.
    pub table_name: String,
    /// Resume point: the previous page's `last_evaluated_key`.
    pub exclusive_start_key: Option<AttributeMap>,
    /// Per-page item cap.
    pub limit: Option<u32>,
    /// Request strongly consistent reads where the store supports them.
    pub consistent_read: bool,
}

/// Items plus continuation key returned by one scan round-trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanOutput {
    /// Raw items in store return order.
    pub items: Vec<AttributeMap>,
    /// Continuation key; absent when the store has nothing further.
    pub last_evaluated_key: Option<AttributeMap>,
}

/// An unconditional item write.
#[derive(Debug, Clone, PartialEq)]
pub struct PutItemInput {
    /// Target table.
    pub table_name: String,
    /// Full raw item; replaces any existing item with the same primary key.
    pub item: AttributeMap,
}

/// A single-item point read.
#[derive(Debug, Clone, PartialEq)]
pub struct GetItemInput {
    /// Target table.
    pub table_name: String,
    /// Raw primary key map.
    pub key: AttributeMap,
    /// Request a strongly consistent read.
    pub consistent_read: bool,
}

/// A single-item deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteItemInput {
    /// Target table.
    pub table_name: String,
    /// Raw primary key map.
    pub key: AttributeMap,
}

/// The external store collaborator executing raw requests.
///
/// Implementations own transport, timeouts and retries entirely; this crate
/// issues at most one outstanding round-trip per paginator and consumes
/// responses as raw attribute maps plus an optional continuation key. The
/// bundled [`MemoryStore`](crate::memory::MemoryStore) is the reference
/// implementation.
pub trait StoreClient: Send + Sync {
    /// Execute one query round-trip.
    fn query(&self, input: QueryInput) -> impl Future<Output = Result<QueryOutput, StoreError>> + Send;

    /// Execute one scan round-trip.
    fn scan(&self, input: ScanInput) -> impl Future<Output = Result<ScanOutput, StoreError>> + Send;

    /// Write one item unconditionally.
    fn put_item(&self, input: PutItemInput) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Read one item by primary key; `None` when the store has no such item.
    fn get_item(
        &self,
        input: GetItemInput,
    ) -> impl Future<Output = Result<Option<AttributeMap>, StoreError>> + Send;

    /// Delete one item by primary key, returning the previous item if any.
    fn delete_item(
        &self,
        input: DeleteItemInput,
    ) -> impl Future<Output = Result<Option<AttributeMap>, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_exposes_its_source() {
        let err = StoreError::with_source("query failed", std::io::Error::other("reset"));
        assert_eq!(err.to_string(), "query failed");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "reset");

        assert!(StoreError::new("plain").source().is_none());
    }
}
