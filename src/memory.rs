use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::attribute::{AttributeMap, AttributeValue};
use crate::client::{
    DeleteItemInput, GetItemInput, PutItemInput, QueryInput, QueryOutput, ScanInput, ScanOutput,
    StoreClient, StoreError,
};
use crate::key::SortCondition;

/// Attribute subset a secondary index materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Every attribute of the base item.
    #[default]
    All,
    /// Only the primary-table and index key attributes.
    KeysOnly,
}

/// Key schema and projection of one global secondary index.
#[derive(Debug, Clone)]
pub struct SecondaryIndexDefinition {
    /// Index name, as addressed by queries.
    pub index_name: String,
    /// Index partition key attribute.
    pub partition_key: String,
    /// Optional index sort key attribute.
    pub sort_key: Option<String>,
    /// Projected attribute subset.
    pub projection: Projection,
}

/// Key schema of one table plus its secondary indexes.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    /// Table name.
    pub table_name: String,
    /// Primary partition key attribute.
    pub partition_key: String,
    /// Optional primary sort key attribute.
    pub sort_key: Option<String>,
    /// Global secondary indexes.
    pub secondary_indexes: Vec<SecondaryIndexDefinition>,
}

#[derive(Debug)]
struct MemoryTable {
    definition: TableDefinition,
    items: Vec<AttributeMap>,
}

/// In-memory [`StoreClient`] implementing the store contract for tests and
/// local development.
///
/// Cheap to clone; clones share the same tables. Items within a partition
/// are ordered by the natural sort-key ordering, continuation keys carry the
/// primary plus queried-index key attributes, and a page filled exactly to
/// its limit always carries a continuation key, because the store cannot
/// know whether more items follow without evaluating further.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, MemoryTable>>>,
}

impl MemoryStore {
    /// An empty store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table. Fails if the name is already taken.
    pub async fn create_table(&self, definition: TableDefinition) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(&definition.table_name) {
            return Err(StoreError::new(format!(
                "table '{}' already exists",
                definition.table_name
            )));
        }
        let _ = tables.insert(
            definition.table_name.clone(),
            MemoryTable {
                definition,
                items: Vec::new(),
            },
        );
        Ok(())
    }
}

impl StoreClient for MemoryStore {
    async fn query(&self, input: QueryInput) -> Result<QueryOutput, StoreError> {
        let tables = self.tables.read().await;
        let table = lookup(&tables, &input.table_name)?;
        let definition = &table.definition;

        let index = match &input.index_name {
            Some(name) => Some(
                definition
                    .secondary_indexes
                    .iter()
                    .find(|i| i.index_name == *name)
                    .ok_or_else(|| {
                        StoreError::new(format!(
                            "index '{name}' not found on table '{}'",
                            input.table_name
                        ))
                    })?,
            ),
            None => None,
        };
        let (partition_name, sort_name) = match index {
            Some(i) => (i.partition_key.as_str(), i.sort_key.as_deref()),
            None => (
                definition.partition_key.as_str(),
                definition.sort_key.as_deref(),
            ),
        };
        if input.key_condition.partition_name != partition_name {
            return Err(StoreError::new(format!(
                "key condition targets '{}' but the index partition key is '{partition_name}'",
                input.key_condition.partition_name
            )));
        }

        let mut matches: Vec<&AttributeMap> = table
            .items
            .iter()
            .filter(|item| {
                item.get(partition_name)
                    .is_some_and(|v| key_eq(v, &input.key_condition.partition_value))
            })
            .collect();
        // Items lacking the index sort key are not materialized into a
        // sparse index.
        if index.is_some() {
            if let Some(sort) = sort_name {
                matches.retain(|item| item.contains_key(sort));
            }
        }
        match sort_name {
            Some(sort) => matches.sort_by(|a, b| cmp_optional(a.get(sort), b.get(sort))),
            // No sort key on this index: order by primary key so pagination
            // has a stable position to resume from.
            None => matches.sort_by(|a, b| cmp_primary_key(definition, a, b)),
        }
        if let Some((sort, condition)) = &input.key_condition.sort {
            matches.retain(|item| matches_sort(condition, item.get(sort.as_str())));
        }
        if !input.scan_index_forward {
            matches.reverse();
        }
        if let Some(start_key) = &input.exclusive_start_key {
            position_after_start_key(
                &mut matches,
                definition,
                sort_name,
                start_key,
                input.scan_index_forward,
            );
        }

        let (page, last_item) = truncate(matches, input.limit)?;
        let last_evaluated_key =
            last_item.map(|item| continuation_key(definition, index, item));
        let items = page
            .into_iter()
            .map(|item| project(definition, index, item))
            .collect();
        Ok(QueryOutput {
            items,
            last_evaluated_key,
        })
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, StoreError> {
        let tables = self.tables.read().await;
        let table = lookup(&tables, &input.table_name)?;
        let definition = &table.definition;

        let mut matches: Vec<&AttributeMap> = table.items.iter().collect();
        matches.sort_by(|a, b| cmp_primary_key(definition, a, b));
        if let Some(start_key) = &input.exclusive_start_key {
            matches.retain(|item| {
                cmp_primary_key(definition, item, start_key) == Ordering::Greater
            });
        }

        let (page, last_item) = truncate(matches, input.limit)?;
        let last_evaluated_key = last_item.map(|item| continuation_key(definition, None, item));
        Ok(ScanOutput {
            items: page.into_iter().cloned().collect(),
            last_evaluated_key,
        })
    }

    async fn put_item(&self, input: PutItemInput) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = lookup_mut(&mut tables, &input.table_name)?;
        validate_key_attributes(&table.definition, &input.item)?;

        let definition = table.definition.clone();
        if let Some(existing) = table
            .items
            .iter_mut()
            .find(|item| same_primary_key(&definition, item, &input.item))
        {
            *existing = input.item;
        } else {
            table.items.push(input.item);
        }
        Ok(())
    }

    async fn get_item(&self, input: GetItemInput) -> Result<Option<AttributeMap>, StoreError> {
        let tables = self.tables.read().await;
        let table = lookup(&tables, &input.table_name)?;
        Ok(table
            .items
            .iter()
            .find(|item| same_primary_key(&table.definition, item, &input.key))
            .cloned())
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<Option<AttributeMap>, StoreError> {
        let mut tables = self.tables.write().await;
        let table = lookup_mut(&mut tables, &input.table_name)?;
        let definition = table.definition.clone();
        let position = table
            .items
            .iter()
            .position(|item| same_primary_key(&definition, item, &input.key));
        Ok(position.map(|i| table.items.remove(i)))
    }
}

fn lookup<'a>(
    tables: &'a HashMap<String, MemoryTable>,
    name: &str,
) -> Result<&'a MemoryTable, StoreError> {
    tables
        .get(name)
        .ok_or_else(|| StoreError::new(format!("table '{name}' not found")))
}

fn lookup_mut<'a>(
    tables: &'a mut HashMap<String, MemoryTable>,
    name: &str,
) -> Result<&'a mut MemoryTable, StoreError> {
    tables
        .get_mut(name)
        .ok_or_else(|| StoreError::new(format!("table '{name}' not found")))
}

fn validate_key_attributes(
    definition: &TableDefinition,
    item: &AttributeMap,
) -> Result<(), StoreError> {
    let mut required = vec![definition.partition_key.as_str()];
    if let Some(sort) = &definition.sort_key {
        required.push(sort);
    }
    for name in required {
        match item.get(name) {
            Some(value) if value.is_key_scalar() => {}
            Some(value) => {
                return Err(StoreError::new(format!(
                    "key attribute '{name}' must be a scalar, got {}",
                    value.type_name()
                )));
            }
            None => {
                return Err(StoreError::new(format!(
                    "item is missing key attribute '{name}'"
                )));
            }
        }
    }
    Ok(())
}

/// Scalar equality with numeric normalization, so `N("05")` matches `N("5")`.
fn key_eq(a: &AttributeValue, b: &AttributeValue) -> bool {
    match a.key_cmp(b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

/// Total order over key values: natural order within a variant, stable
/// tag order between variants (only reached by heterogeneous test data).
fn cmp_values(a: &AttributeValue, b: &AttributeValue) -> Ordering {
    a.key_cmp(b)
        .unwrap_or_else(|| a.type_name().cmp(b.type_name()))
}

fn cmp_optional(a: Option<&AttributeValue>, b: Option<&AttributeValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp_values(a, b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_primary_key(definition: &TableDefinition, a: &AttributeMap, b: &AttributeMap) -> Ordering {
    let partition = cmp_optional(
        a.get(&definition.partition_key),
        b.get(&definition.partition_key),
    );
    partition.then_with(|| match &definition.sort_key {
        Some(sort) => cmp_optional(a.get(sort), b.get(sort)),
        None => Ordering::Equal,
    })
}

fn same_primary_key(definition: &TableDefinition, a: &AttributeMap, b: &AttributeMap) -> bool {
    cmp_primary_key(definition, a, b) == Ordering::Equal
}

fn matches_sort(condition: &SortCondition, value: Option<&AttributeValue>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let ordered = |bound: &AttributeValue, accept: &[Ordering]| {
        value
            .key_cmp(bound)
            .is_some_and(|o| accept.contains(&o))
    };
    match condition {
        SortCondition::EqualTo(v) => key_eq(value, v),
        SortCondition::LessThan(v) => ordered(v, &[Ordering::Less]),
        SortCondition::LessThanOrEqualTo(v) => ordered(v, &[Ordering::Less, Ordering::Equal]),
        SortCondition::GreaterThan(v) => ordered(v, &[Ordering::Greater]),
        SortCondition::GreaterThanOrEqualTo(v) => {
            ordered(v, &[Ordering::Greater, Ordering::Equal])
        }
        SortCondition::Between(lo, hi) => {
            ordered(lo, &[Ordering::Greater, Ordering::Equal])
                && ordered(hi, &[Ordering::Less, Ordering::Equal])
        }
        SortCondition::BeginsWith(prefix) => {
            value.as_s().is_some_and(|s| s.starts_with(prefix.as_str()))
        }
    }
}

/// Drop everything at or before the start key's position. Works for start
/// keys that no longer (or never) identify an item: position is determined
/// by key order, not by lookup.
fn position_after_start_key(
    matches: &mut Vec<&AttributeMap>,
    definition: &TableDefinition,
    sort_name: Option<&str>,
    start_key: &AttributeMap,
    forward: bool,
) {
    let wanted = if forward {
        Ordering::Greater
    } else {
        Ordering::Less
    };
    if let Some(start) = sort_name.and_then(|sort| start_key.get(sort)) {
        matches.retain(|item| {
            sort_name
                .and_then(|sort| item.get(sort))
                .is_some_and(|value| cmp_values(value, start) == wanted)
        });
    } else {
        // No sort component to position by. A sortless index still holds
        // many items per partition value, so fall back to the primary-table
        // key that every continuation map carries.
        matches.retain(|item| cmp_primary_key(definition, item, start_key) == wanted);
    }
}

fn truncate<'a>(
    matches: Vec<&'a AttributeMap>,
    limit: Option<u32>,
) -> Result<(Vec<&'a AttributeMap>, Option<&'a AttributeMap>), StoreError> {
    match limit {
        Some(0) => Err(StoreError::new("limit must be at least 1")),
        Some(limit) if matches.len() >= limit as usize => {
            let mut page = matches;
            page.truncate(limit as usize);
            let last = page.last().copied();
            Ok((page, last))
        }
        _ => Ok((matches, None)),
    }
}

/// Continuation key: the primary-table key attributes plus the queried
/// index's key attributes, taken verbatim from the boundary item. This is
/// exactly what the store needs to resume, even under a keys-only
/// projection.
fn continuation_key(
    definition: &TableDefinition,
    index: Option<&SecondaryIndexDefinition>,
    item: &AttributeMap,
) -> AttributeMap {
    let mut key = AttributeMap::new();
    for name in key_attribute_names(definition, index) {
        if let Some(value) = item.get(name) {
            let _ = key.insert(name.to_string(), value.clone());
        }
    }
    key
}

fn key_attribute_names<'a>(
    definition: &'a TableDefinition,
    index: Option<&'a SecondaryIndexDefinition>,
) -> Vec<&'a str> {
    let mut candidates = vec![definition.partition_key.as_str()];
    if let Some(sort) = &definition.sort_key {
        candidates.push(sort);
    }
    if let Some(index) = index {
        candidates.push(&index.partition_key);
        if let Some(sort) = &index.sort_key {
            candidates.push(sort);
        }
    }
    // An index may reuse a primary key attribute; keep the first occurrence.
    let mut names = Vec::with_capacity(candidates.len());
    for name in candidates {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn project(
    definition: &TableDefinition,
    index: Option<&SecondaryIndexDefinition>,
    item: &AttributeMap,
) -> AttributeMap {
    match index {
        Some(i) if i.projection == Projection::KeysOnly => {
            let keys = key_attribute_names(definition, Some(i));
            item.iter()
                .filter(|(name, _)| keys.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        }
        _ => item.clone(),
    }
}
