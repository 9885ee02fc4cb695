use std::fmt;

use tracing::debug;

use crate::client::{DeleteItemInput, GetItemInput, PutItemInput, QueryInput, ScanInput, StoreClient};
use crate::error::Error;
use crate::key::Key;
use crate::pagination::PageIterator;
use crate::schema::{PRIMARY_INDEX, TableSchema};
use crate::table::index::MappedIndex;
use crate::table::requests::{GetItemRequest, QueryRequest, ScanRequest};

/// A table façade binding one store client, one table name and one schema.
///
/// The schema is read-only after construction and shared with every
/// [`MappedIndex`] built from this table. All operations are a single store
/// round-trip except the query/scan paginators, which run one round-trip per
/// page.
pub struct MappedTable<T, C> {
    client: C,
    table_name: String,
    schema: TableSchema<T>,
}

impl<T, C: StoreClient> MappedTable<T, C> {
    /// Bind a client and schema to a named table.
    pub fn new(client: C, table_name: impl Into<String>, schema: TableSchema<T>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            schema,
        }
    }

    /// The bound table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The bound schema.
    pub fn schema(&self) -> &TableSchema<T> {
        &self.schema
    }

    /// A façade over one of this table's secondary indexes.
    ///
    /// Index names are checked here, so a query against an undeclared index
    /// fails at construction rather than at first page fetch.
    pub fn index(&self, index_name: &str) -> Result<MappedIndex<'_, T, C>, Error> {
        let _ = self.schema.key_attribute_names(index_name)?;
        Ok(MappedIndex::new(self, index_name))
    }

    /// Write an item, replacing any existing item with the same primary key.
    pub async fn put_item(&self, item: &T) -> Result<(), Error> {
        let item = self.schema.item_to_map(item, None)?;
        debug!(table = %self.table_name, "put item");
        self.client
            .put_item(PutItemInput {
                table_name: self.table_name.clone(),
                item,
            })
            .await?;
        Ok(())
    }

    /// Read a single item by primary key. `Ok(None)` when the store reports
    /// no item for that key.
    pub async fn get_item(&self, key: &Key) -> Result<Option<T>, Error> {
        self.get_item_with(GetItemRequest::new(key.clone())).await
    }

    /// [`get_item`](Self::get_item) with explicit options.
    pub async fn get_item_with(&self, request: GetItemRequest) -> Result<Option<T>, Error> {
        let (partition, sort) = self.schema.key_attribute_names(PRIMARY_INDEX)?;
        let key = request.key.to_attribute_map(partition, sort)?;
        debug!(table = %self.table_name, "get item");
        let raw = self
            .client
            .get_item(GetItemInput {
                table_name: self.table_name.clone(),
                key,
                consistent_read: request.consistent_read,
            })
            .await?;
        raw.map(|map| self.schema.map_to_item(&map)).transpose()
    }

    /// Delete a single item by primary key, returning the previous item if
    /// one existed.
    pub async fn delete_item(&self, key: &Key) -> Result<Option<T>, Error> {
        let (partition, sort) = self.schema.key_attribute_names(PRIMARY_INDEX)?;
        let key = key.to_attribute_map(partition, sort)?;
        debug!(table = %self.table_name, "delete item");
        let raw = self
            .client
            .delete_item(DeleteItemInput {
                table_name: self.table_name.clone(),
                key,
            })
            .await?;
        raw.map(|map| self.schema.map_to_item(&map)).transpose()
    }

    /// Query the table's own keys.
    ///
    /// Accepts a [`QueryRequest`] or, via `From`, a bare
    /// [`QueryConditional`](crate::QueryConditional). The returned iterator
    /// is lazy and non-restartable: once exhausted, issue a fresh query to
    /// iterate again.
    pub fn query(
        &self,
        request: impl Into<QueryRequest>,
    ) -> Result<PageIterator<'_, T, C>, Error> {
        self.query_on_index(None, request.into())
    }

    /// Scan the whole table page by page.
    pub fn scan(&self, request: ScanRequest) -> PageIterator<'_, T, C> {
        let input = ScanInput {
            table_name: self.table_name.clone(),
            exclusive_start_key: request.exclusive_start_key,
            limit: request.limit,
            consistent_read: request.consistent_read,
        };
        PageIterator::for_scan(&self.client, &self.schema, input)
    }

    pub(crate) fn query_on_index<'s>(
        &'s self,
        index_name: Option<&str>,
        request: QueryRequest,
    ) -> Result<PageIterator<'s, T, C>, Error> {
        let key_condition = request
            .conditional
            .resolve(&self.schema, index_name.unwrap_or(PRIMARY_INDEX))?;
        let input = QueryInput {
            table_name: self.table_name.clone(),
            index_name: index_name.map(str::to_string),
            key_condition,
            exclusive_start_key: request.exclusive_start_key,
            limit: request.limit,
            scan_index_forward: request.scan_index_forward,
            consistent_read: request.consistent_read,
        };
        Ok(PageIterator::for_query(&self.client, &self.schema, input))
    }
}

impl<T, C> fmt::Debug for MappedTable<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedTable")
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}
