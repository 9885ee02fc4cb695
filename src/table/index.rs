use std::fmt;

use crate::client::StoreClient;
use crate::error::Error;
use crate::pagination::PageIterator;
use crate::table::operations::MappedTable;
use crate::table::requests::QueryRequest;

/// A query façade over one secondary index of a [`MappedTable`].
///
/// Shares the table's schema and client; only the key resolution differs.
/// Constructed through [`MappedTable::index`], which validates the index
/// name.
pub struct MappedIndex<'t, T, C> {
    table: &'t MappedTable<T, C>,
    index_name: String,
}

impl<'t, T, C: StoreClient> MappedIndex<'t, T, C> {
    pub(crate) fn new(table: &'t MappedTable<T, C>, index_name: &str) -> Self {
        Self {
            table,
            index_name: index_name.to_string(),
        }
    }

    /// The index name this façade queries.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Query this index. Same contract as [`MappedTable::query`], with the
    /// conditional resolved against the index's own partition/sort keys.
    pub fn query(
        &self,
        request: impl Into<QueryRequest>,
    ) -> Result<PageIterator<'t, T, C>, Error> {
        self.table
            .query_on_index(Some(&self.index_name), request.into())
    }
}

impl<T, C> fmt::Debug for MappedIndex<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedIndex")
            .field("index_name", &self.index_name)
            .finish_non_exhaustive()
    }
}
