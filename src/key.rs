use std::cmp::Ordering;

use crate::attribute::{AttributeMap, AttributeValue};
use crate::error::Error;
use crate::schema::TableSchema;

/// Concrete partition value plus optional sort value for one index.
///
/// A key is built without reference to a schema; it is resolved against a
/// specific index's attribute names when rendered into a raw key map or a
/// key condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    partition_value: AttributeValue,
    sort_value: Option<AttributeValue>,
}

impl Key {
    /// Start building a key.
    pub fn builder() -> KeyBuilder {
        KeyBuilder {
            partition_value: None,
            sort_value: None,
        }
    }

    /// The partition value.
    pub fn partition_value(&self) -> &AttributeValue {
        &self.partition_value
    }

    /// The sort value, when one was supplied.
    pub fn sort_value(&self) -> Option<&AttributeValue> {
        self.sort_value.as_ref()
    }

    /// Render into a raw key map under the given attribute names.
    ///
    /// The result is directly usable as a `get_item`/`delete_item` key or as
    /// an `exclusive_start_key`. Supplying a sort value for an index that
    /// has no sort attribute is an [`Error::InvalidKey`].
    pub fn to_attribute_map(
        &self,
        partition_name: &str,
        sort_name: Option<&str>,
    ) -> Result<AttributeMap, Error> {
        let mut map = AttributeMap::new();
        let _ = map.insert(partition_name.to_string(), self.partition_value.clone());
        match (&self.sort_value, sort_name) {
            (Some(value), Some(name)) => {
                let _ = map.insert(name.to_string(), value.clone());
            }
            (Some(_), None) => {
                return Err(Error::InvalidKey(
                    "sort value supplied for an index with no sort key".to_string(),
                ));
            }
            (None, _) => {}
        }
        Ok(map)
    }
}

/// Builder for [`Key`]. The partition value is mandatory and must be a
/// string, number or binary scalar.
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    partition_value: Option<AttributeValue>,
    sort_value: Option<AttributeValue>,
}

impl KeyBuilder {
    /// Set the partition value.
    pub fn partition_value(mut self, value: impl Into<AttributeValue>) -> Self {
        self.partition_value = Some(value.into());
        self
    }

    /// Set the sort value.
    pub fn sort_value(mut self, value: impl Into<AttributeValue>) -> Self {
        self.sort_value = Some(value.into());
        self
    }

    /// Validate and build the key.
    pub fn build(self) -> Result<Key, Error> {
        let partition_value = self
            .partition_value
            .ok_or_else(|| Error::InvalidKey("partition value is required".to_string()))?;
        if !partition_value.is_key_scalar() {
            return Err(Error::InvalidKey(format!(
                "partition value must be a scalar, got {}",
                partition_value.type_name()
            )));
        }
        if let Some(sort) = &self.sort_value {
            if !sort.is_key_scalar() {
                return Err(Error::InvalidKey(format!(
                    "sort value must be a scalar, got {}",
                    sort.type_name()
                )));
            }
        }
        Ok(Key {
            partition_value,
            sort_value: self.sort_value,
        })
    }
}

/// Comparator applied to the sort key within a partition.
///
/// Bounds are inclusive where the store's contract says so: `Between`
/// includes both endpoints, `BeginsWith` matches string prefixes. Ordering
/// follows the sort attribute's natural ordering (lexicographic for strings,
/// exact decimal for numbers, byte-wise for binary).
#[derive(Debug, Clone, PartialEq)]
pub enum SortCondition {
    /// Sort key equals the value.
    EqualTo(AttributeValue),
    /// Sort key strictly below the value.
    LessThan(AttributeValue),
    /// Sort key at or below the value.
    LessThanOrEqualTo(AttributeValue),
    /// Sort key strictly above the value.
    GreaterThan(AttributeValue),
    /// Sort key at or above the value.
    GreaterThanOrEqualTo(AttributeValue),
    /// Sort key within the inclusive range.
    Between(AttributeValue, AttributeValue),
    /// String sort key starting with the prefix.
    BeginsWith(String),
}

/// Canonical key-condition predicate: partition equality plus an optional
/// sort comparator, not yet bound to attribute names.
///
/// Built through the factory functions ([`QueryConditional::key_equal_to`]
/// and friends) and resolved against a schema and index by the table or
/// index façade the query is issued to.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConditional {
    partition_value: AttributeValue,
    sort: Option<SortCondition>,
}

impl QueryConditional {
    /// Partition equality, plus sort equality when the key carries a sort
    /// value.
    pub fn key_equal_to(key: Key) -> Self {
        Self {
            sort: key.sort_value.map(SortCondition::EqualTo),
            partition_value: key.partition_value,
        }
    }

    /// Sort key strictly below the key's sort value.
    pub fn sort_less_than(key: Key) -> Result<Self, Error> {
        Self::with_sort(key, SortCondition::LessThan)
    }

    /// Sort key at or below the key's sort value.
    pub fn sort_less_than_or_equal_to(key: Key) -> Result<Self, Error> {
        Self::with_sort(key, SortCondition::LessThanOrEqualTo)
    }

    /// Sort key strictly above the key's sort value.
    pub fn sort_greater_than(key: Key) -> Result<Self, Error> {
        Self::with_sort(key, SortCondition::GreaterThan)
    }

    /// Sort key at or above the key's sort value.
    pub fn sort_greater_than_or_equal_to(key: Key) -> Result<Self, Error> {
        Self::with_sort(key, SortCondition::GreaterThanOrEqualTo)
    }

    /// Sort key within the inclusive range spanned by the two keys' sort
    /// values. Both keys must carry the same partition value and the bounds
    /// must satisfy `from ≤ to` in the sort attribute's natural ordering.
    pub fn sort_between(from: Key, to: Key) -> Result<Self, Error> {
        let lo = require_sort(&from)?.clone();
        let hi = require_sort(&to)?.clone();
        if from.partition_value != to.partition_value {
            return Err(Error::InvalidKey(
                "between bounds must share one partition value".to_string(),
            ));
        }
        match lo.key_cmp(&hi) {
            Some(Ordering::Greater) => {
                return Err(Error::InvalidKey(
                    "between lower bound is greater than upper bound".to_string(),
                ));
            }
            Some(_) => {}
            None => {
                return Err(Error::InvalidKey(format!(
                    "between bounds have incomparable types {} and {}",
                    lo.type_name(),
                    hi.type_name()
                )));
            }
        }
        Ok(Self {
            partition_value: from.partition_value,
            sort: Some(SortCondition::Between(lo, hi)),
        })
    }

    /// String sort key beginning with the key's sort value.
    pub fn sort_begins_with(key: Key) -> Result<Self, Error> {
        let prefix = match require_sort(&key)? {
            AttributeValue::S(s) => s.clone(),
            other => {
                return Err(Error::InvalidKey(format!(
                    "begins_with requires a string sort value, got {}",
                    other.type_name()
                )));
            }
        };
        Ok(Self {
            partition_value: key.partition_value,
            sort: Some(SortCondition::BeginsWith(prefix)),
        })
    }

    /// The partition value this conditional matches.
    pub fn partition_value(&self) -> &AttributeValue {
        &self.partition_value
    }

    /// The sort comparator, if any.
    pub fn sort_condition(&self) -> Option<&SortCondition> {
        self.sort.as_ref()
    }

    /// Bind this conditional to a schema and index, producing the canonical
    /// key condition handed to the store client.
    ///
    /// Fails with [`Error::UnknownIndex`] for an undeclared index and with
    /// [`Error::InvalidKey`] when a sort comparator is used against an index
    /// that has no sort key.
    pub fn resolve<T>(
        &self,
        schema: &TableSchema<T>,
        index_name: &str,
    ) -> Result<KeyCondition, Error> {
        let (partition_name, sort_name) = schema.key_attribute_names(index_name)?;
        let sort = match (&self.sort, sort_name) {
            (Some(condition), Some(name)) => Some((name.to_string(), condition.clone())),
            (Some(_), None) => {
                return Err(Error::InvalidKey(format!(
                    "sort condition issued against index '{index_name}' which has no sort key"
                )));
            }
            (None, _) => None,
        };
        Ok(KeyCondition {
            partition_name: partition_name.to_string(),
            partition_value: self.partition_value.clone(),
            sort,
        })
    }

    fn with_sort(
        key: Key,
        build: impl FnOnce(AttributeValue) -> SortCondition,
    ) -> Result<Self, Error> {
        let sort = require_sort(&key)?.clone();
        Ok(Self {
            partition_value: key.partition_value,
            sort: Some(build(sort)),
        })
    }
}

fn require_sort(key: &Key) -> Result<&AttributeValue, Error> {
    key.sort_value
        .as_ref()
        .ok_or_else(|| Error::InvalidKey("key has no sort value".to_string()))
}

/// A [`QueryConditional`] resolved against one index's attribute names.
///
/// This is the representation the store client consumes; rendering it into a
/// store-level expression string is the client's concern, the semantics
/// (inclusive bounds, per-type natural ordering) are fixed here.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    /// Partition attribute name.
    pub partition_name: String,
    /// Value the partition attribute must equal.
    pub partition_value: AttributeValue,
    /// Sort attribute name and comparator, when the query constrains it.
    pub sort: Option<(String, SortCondition)>,
}
