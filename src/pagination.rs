use std::fmt;

use futures_util::Stream;
use tracing::debug;

use crate::attribute::AttributeMap;
use crate::client::{QueryInput, ScanInput, StoreClient};
use crate::error::Error;
use crate::schema::TableSchema;

/// One store round-trip's worth of results.
///
/// Immutable after construction. `last_evaluated_key` is the store's raw
/// continuation key, kept unconverted so it round-trips exactly into the
/// next request's `exclusive_start_key`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "query results should be used or you'll lose the fetched data"]
pub struct Page<T> {
    items: Vec<T>,
    last_evaluated_key: Option<AttributeMap>,
}

impl<T> Page<T> {
    /// Materialized items in store return order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, keeping only the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Raw continuation key; `None` on the final page.
    pub fn last_evaluated_key(&self) -> Option<&AttributeMap> {
        self.last_evaluated_key.as_ref()
    }
}

enum PageSource {
    Query(QueryInput),
    Scan(ScanInput),
}

enum PaginatorState {
    HasMore(Option<AttributeMap>),
    Exhausted,
}

/// Lazy, finite, non-restartable sequence of [`Page`]s.
///
/// Two states: `HasMore` (initial, holding the next `exclusive_start_key`)
/// and `Exhausted`. Each [`next_page`](Self::next_page) call in `HasMore`
/// performs exactly one store round-trip; the caller drives iteration, so
/// there is no prefetch and page order always matches request order. While
/// `HasMore`, at least one more page is guaranteed: a query matching nothing
/// yields a single empty page before exhaustion.
///
/// A failed round-trip or page materialization leaves the state unchanged,
/// so the same page can be fetched again. Dropping the iterator issues no
/// further store calls. Once exhausted it stays exhausted; issue a fresh
/// query to iterate again.
#[must_use = "pages are fetched lazily; nothing happens until the iterator is driven"]
pub struct PageIterator<'a, T, C: StoreClient> {
    client: &'a C,
    schema: &'a TableSchema<T>,
    source: PageSource,
    state: PaginatorState,
}

impl<'a, T, C: StoreClient> PageIterator<'a, T, C> {
    pub(crate) fn for_query(
        client: &'a C,
        schema: &'a TableSchema<T>,
        mut input: QueryInput,
    ) -> Self {
        let start = input.exclusive_start_key.take();
        Self {
            client,
            schema,
            source: PageSource::Query(input),
            state: PaginatorState::HasMore(start),
        }
    }

    pub(crate) fn for_scan(
        client: &'a C,
        schema: &'a TableSchema<T>,
        mut input: ScanInput,
    ) -> Self {
        let start = input.exclusive_start_key.take();
        Self {
            client,
            schema,
            source: PageSource::Scan(input),
            state: PaginatorState::HasMore(start),
        }
    }

    /// `true` while at least one more page will be produced.
    pub fn has_more(&self) -> bool {
        matches!(self.state, PaginatorState::HasMore(_))
    }

    /// Fetch the next page, or `None` once exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>, Error> {
        let start_key = match &self.state {
            PaginatorState::Exhausted => return Ok(None),
            PaginatorState::HasMore(key) => key.clone(),
        };

        let (raw_items, last_evaluated_key) = match &self.source {
            PageSource::Query(input) => {
                let mut input = input.clone();
                input.exclusive_start_key = start_key;
                let output = self.client.query(input).await?;
                (output.items, output.last_evaluated_key)
            }
            PageSource::Scan(input) => {
                let mut input = input.clone();
                input.exclusive_start_key = start_key;
                let output = self.client.scan(input).await?;
                (output.items, output.last_evaluated_key)
            }
        };

        let items = raw_items
            .iter()
            .map(|raw| self.schema.map_to_item(raw))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            items = items.len(),
            has_more = last_evaluated_key.is_some(),
            "fetched result page"
        );

        self.state = match &last_evaluated_key {
            Some(key) => PaginatorState::HasMore(Some(key.clone())),
            None => PaginatorState::Exhausted,
        };
        Ok(Some(Page {
            items,
            last_evaluated_key,
        }))
    }

    /// Drain every remaining page and collect the items in order.
    pub async fn items(mut self) -> Result<Vec<T>, Error> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page.into_items());
        }
        Ok(all)
    }

    /// Adapt the iterator into a [`Stream`] of pages for `StreamExt`
    /// combinators. The pull semantics are unchanged: each poll performs at
    /// most one round-trip.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page<T>, Error>> + 'a {
        futures_util::stream::unfold(self, |mut iterator| async move {
            match iterator.next_page().await {
                Ok(Some(page)) => Some((Ok(page), iterator)),
                Ok(None) => None,
                Err(err) => Some((Err(err), iterator)),
            }
        })
    }
}

impl<T, C: StoreClient> fmt::Debug for PageIterator<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            PageSource::Query(input) => ("query", &input.table_name),
            PageSource::Scan(input) => ("scan", &input.table_name),
        };
        f.debug_struct("PageIterator")
            .field("operation", &source.0)
            .field("table_name", source.1)
            .field("has_more", &self.has_more())
            .finish_non_exhaustive()
    }
}
