use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::attribute::{AttributeMap, AttributeValue};
use crate::convert::AttributeConverter;
use crate::error::Error;

/// Reserved index name addressing the table's own partition/sort key pair.
pub const PRIMARY_INDEX: &str = "$PRIMARY_INDEX";

/// Role an attribute plays within one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Partition key: selects the logical item group.
    Partition,
    /// Sort key: orders and range-filters items within a partition.
    Sort,
}

/// A key role attached to an attribute, scoped to one index name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTag {
    index: String,
    role: KeyRole,
}

/// Tags an attribute as the table's partition key.
pub fn primary_partition_key() -> AttributeTag {
    AttributeTag {
        index: PRIMARY_INDEX.to_string(),
        role: KeyRole::Partition,
    }
}

/// Tags an attribute as the table's sort key.
pub fn primary_sort_key() -> AttributeTag {
    AttributeTag {
        index: PRIMARY_INDEX.to_string(),
        role: KeyRole::Sort,
    }
}

/// Tags an attribute as the partition key of a named secondary index.
pub fn secondary_partition_key(index_name: impl Into<String>) -> AttributeTag {
    AttributeTag {
        index: index_name.into(),
        role: KeyRole::Partition,
    }
}

/// Tags an attribute as the sort key of a named secondary index.
pub fn secondary_sort_key(index_name: impl Into<String>) -> AttributeTag {
    AttributeTag {
        index: index_name.into(),
        role: KeyRole::Sort,
    }
}

type GetFn<T> = Box<dyn Fn(&T) -> Result<Option<AttributeValue>, Error> + Send + Sync>;
type SetFn<T> = Box<dyn Fn(&mut T, AttributeValue) -> Result<(), Error> + Send + Sync>;

/// One named attribute of a [`TableSchema`]: a converter fused with typed
/// getter/setter accessors, plus zero or more key-role tags.
///
/// The getter returns `Option` so a field can opt out of the map entirely;
/// the accessors and converter are erased into closures here, so the schema
/// itself carries no per-field generics.
pub struct StaticAttribute<T> {
    name: String,
    get: GetFn<T>,
    set: SetFn<T>,
    tags: Vec<AttributeTag>,
}

impl<T> StaticAttribute<T> {
    /// Bind a converter and accessor pair under an attribute name.
    pub fn new<C, G, S>(name: impl Into<String>, converter: C, getter: G, setter: S) -> Self
    where
        C: AttributeConverter + 'static,
        G: Fn(&T) -> Option<C::Value> + Send + Sync + 'static,
        S: Fn(&mut T, C::Value) + Send + Sync + 'static,
    {
        let converter = Arc::new(converter);
        let to_wire = Arc::clone(&converter);
        let get: GetFn<T> = Box::new(move |item| match getter(item) {
            Some(value) => to_wire.transform_to(&value).map(Some),
            None => Ok(None),
        });
        let set: SetFn<T> = Box::new(move |item, value| {
            setter(item, converter.transform_from(value)?);
            Ok(())
        });
        Self {
            name: name.into(),
            get,
            set,
            tags: Vec::new(),
        }
    }

    /// Attach a key-role tag. May be called once per role and index.
    pub fn tag(mut self, tag: AttributeTag) -> Self {
        self.tags.push(tag);
        self
    }

    /// The attribute name as written to the store.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Secondary-index roles are excluded: an item may omit those values to
    /// stay out of a sparse index.
    fn is_primary_key(&self) -> bool {
        self.tags.iter().any(|tag| tag.index == PRIMARY_INDEX)
    }
}

impl<T> fmt::Debug for StaticAttribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAttribute")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
struct IndexKeys {
    partition: String,
    sort: Option<String>,
}

/// Declarative mapping between a domain type `T` and its flat attribute-map
/// representation, including the key layout of the primary and secondary
/// indexes.
///
/// Built once via [`TableSchema::builder`], validated eagerly, then shared
/// read-only by every table and index façade constructed from it.
pub struct TableSchema<T> {
    new_item: Box<dyn Fn() -> T + Send + Sync>,
    attributes: Vec<StaticAttribute<T>>,
    indexes: HashMap<String, IndexKeys>,
}

impl<T> TableSchema<T> {
    /// Start building a schema around a zero-argument item supplier.
    pub fn builder(new_item: impl Fn() -> T + Send + Sync + 'static) -> TableSchemaBuilder<T> {
        TableSchemaBuilder {
            new_item: Box::new(new_item),
            attributes: Vec::new(),
        }
    }

    /// Render an item into its raw attribute map.
    ///
    /// Applies each attribute's getter and converter in declaration order.
    /// When `attributes_only` is given, output is restricted to that subset
    /// (keys-only projections). A getter returning `None` skips the
    /// attribute, unless the attribute carries a primary-index key role, in
    /// which case the missing value is an [`Error::InvalidKey`]. Secondary
    /// index keys may be omitted; such items simply stay out of that index.
    pub fn item_to_map(
        &self,
        item: &T,
        attributes_only: Option<&[&str]>,
    ) -> Result<AttributeMap, Error> {
        let mut map = AttributeMap::new();
        for attribute in &self.attributes {
            if let Some(only) = attributes_only {
                if !only.contains(&attribute.name.as_str()) {
                    continue;
                }
            }
            match (attribute.get)(item)? {
                Some(value) => {
                    let _ = map.insert(attribute.name.clone(), value);
                }
                None if attribute.is_primary_key() => {
                    return Err(Error::InvalidKey(format!(
                        "primary key attribute '{}' resolved to no value",
                        attribute.name
                    )));
                }
                None => {}
            }
        }
        Ok(map)
    }

    /// Materialize an item from a raw attribute map.
    ///
    /// Constructs via the supplier, then invokes the setter for every
    /// attribute present in the map. Attributes absent from the map keep the
    /// supplier's defaults; absence and explicit null are never conflated.
    pub fn map_to_item(&self, map: &AttributeMap) -> Result<T, Error> {
        let mut item = (self.new_item)();
        for attribute in &self.attributes {
            if let Some(value) = map.get(&attribute.name) {
                (attribute.set)(&mut item, value.clone())?;
            }
        }
        Ok(item)
    }

    /// Partition and optional sort attribute names for an index.
    ///
    /// Use [`PRIMARY_INDEX`] for the table's own keys. Fails with
    /// [`Error::UnknownIndex`] when no attribute declares a partition role
    /// under that name.
    pub fn key_attribute_names(&self, index_name: &str) -> Result<(&str, Option<&str>), Error> {
        let keys = self
            .indexes
            .get(index_name)
            .ok_or_else(|| Error::UnknownIndex(index_name.to_string()))?;
        Ok((&keys.partition, keys.sort.as_deref()))
    }

    /// All index names this schema declares, the primary index included.
    pub fn index_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indexes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<T> fmt::Debug for TableSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSchema")
            .field("attributes", &self.attributes)
            .field("indexes", &self.indexes)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TableSchema`]; validation happens in [`build`](Self::build).
pub struct TableSchemaBuilder<T> {
    new_item: Box<dyn Fn() -> T + Send + Sync>,
    attributes: Vec<StaticAttribute<T>>,
}

impl<T> TableSchemaBuilder<T> {
    /// Append an attribute. Declaration order is preserved in rendered maps.
    pub fn add_attribute(mut self, attribute: StaticAttribute<T>) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Validate the declared attributes and key layout.
    ///
    /// Rejected here, never at first use: duplicate attribute names, a
    /// second partition or sort role for the same index, a sort role with no
    /// partition role on the same index, and the absence of a primary
    /// partition key.
    pub fn build(self) -> Result<TableSchema<T>, Error> {
        let mut seen: HashSet<&str> = HashSet::new();
        for attribute in &self.attributes {
            if !seen.insert(&attribute.name) {
                return Err(Error::SchemaValidation(format!(
                    "duplicate attribute name '{}'",
                    attribute.name
                )));
            }
        }

        let mut partial: HashMap<String, (Option<String>, Option<String>)> = HashMap::new();
        for attribute in &self.attributes {
            for tag in &attribute.tags {
                let entry = partial.entry(tag.index.clone()).or_default();
                let slot = match tag.role {
                    KeyRole::Partition => &mut entry.0,
                    KeyRole::Sort => &mut entry.1,
                };
                if let Some(existing) = slot {
                    return Err(Error::SchemaValidation(format!(
                        "index '{}' declares {} key on both '{}' and '{}'",
                        display_index(&tag.index),
                        match tag.role {
                            KeyRole::Partition => "a partition",
                            KeyRole::Sort => "a sort",
                        },
                        existing,
                        attribute.name
                    )));
                }
                *slot = Some(attribute.name.clone());
            }
        }

        let mut indexes = HashMap::new();
        for (index, (partition, sort)) in partial {
            let Some(partition) = partition else {
                return Err(Error::SchemaValidation(format!(
                    "index '{}' declares a sort key but no partition key",
                    display_index(&index)
                )));
            };
            let _ = indexes.insert(index, IndexKeys { partition, sort });
        }
        if !indexes.contains_key(PRIMARY_INDEX) {
            return Err(Error::SchemaValidation(
                "no attribute is tagged as the primary partition key".to_string(),
            ));
        }

        Ok(TableSchema {
            new_item: self.new_item,
            attributes: self.attributes,
            indexes,
        })
    }
}

impl<T> fmt::Debug for TableSchemaBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSchemaBuilder")
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

fn display_index(index: &str) -> &str {
    if index == PRIMARY_INDEX { "primary" } else { index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{number_value, string_value};
    use crate::convert::{I32Converter, ItemConverter, NullableConverter, StringConverter};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Widget {
        id: Option<String>,
        count: Option<i32>,
        label: Option<String>,
    }

    fn widget_schema() -> TableSchema<Widget> {
        TableSchema::builder(Widget::default)
            .add_attribute(
                StaticAttribute::new(
                    "id",
                    StringConverter,
                    |w: &Widget| w.id.clone(),
                    |w, v| w.id = Some(v),
                )
                .tag(primary_partition_key()),
            )
            .add_attribute(StaticAttribute::new(
                "count",
                I32Converter,
                |w: &Widget| w.count,
                |w, v| w.count = Some(v),
            ))
            .add_attribute(StaticAttribute::new(
                "label",
                StringConverter,
                |w: &Widget| w.label.clone(),
                |w, v| w.label = Some(v),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn item_round_trips_through_the_map_form() {
        let schema = widget_schema();
        let widget = Widget {
            id: Some("w-1".to_string()),
            count: Some(4),
            label: Some("spanner".to_string()),
        };
        let map = schema.item_to_map(&widget, None).unwrap();
        assert_eq!(map.get("id"), Some(&string_value("w-1")));
        assert_eq!(map.get("count"), Some(&number_value(4)));
        assert_eq!(schema.map_to_item(&map).unwrap(), widget);
    }

    #[test]
    fn missing_non_key_values_are_skipped_not_nulled() {
        let schema = widget_schema();
        let widget = Widget {
            id: Some("w-2".to_string()),
            count: None,
            label: None,
        };
        let map = schema.item_to_map(&widget, None).unwrap();
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key("count"));

        // And absent attributes keep the supplier defaults when reading back.
        let restored = schema.map_to_item(&map).unwrap();
        assert_eq!(restored.count, None);
        assert_eq!(restored.label, None);
    }

    #[test]
    fn missing_key_value_is_an_invalid_key_error() {
        let schema = widget_schema();
        let widget = Widget::default();
        let err = schema.item_to_map(&widget, None).unwrap_err();
        assert!(err.is_invalid_key());
    }

    #[test]
    fn attributes_only_restricts_the_output() {
        let schema = widget_schema();
        let widget = Widget {
            id: Some("w-3".to_string()),
            count: Some(1),
            label: Some("x".to_string()),
        };
        let map = schema.item_to_map(&widget, Some(&["id", "count"])).unwrap();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("label"));
    }

    #[test]
    fn explicit_null_and_absence_stay_distinct() {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Form {
            id: Option<String>,
            note: Option<Option<String>>,
        }
        let schema = TableSchema::builder(Form::default)
            .add_attribute(
                StaticAttribute::new(
                    "id",
                    StringConverter,
                    |f: &Form| f.id.clone(),
                    |f, v| f.id = Some(v),
                )
                .tag(primary_partition_key()),
            )
            .add_attribute(StaticAttribute::new(
                "note",
                NullableConverter(StringConverter),
                |f: &Form| f.note.clone(),
                |f, v| f.note = Some(v),
            ))
            .build()
            .unwrap();

        let explicit_null = Form {
            id: Some("f-1".to_string()),
            note: Some(None),
        };
        let map = schema.item_to_map(&explicit_null, None).unwrap();
        assert!(map.get("note").unwrap().is_null());
        assert_eq!(schema.map_to_item(&map).unwrap().note, Some(None));

        let absent = Form {
            id: Some("f-1".to_string()),
            note: None,
        };
        let map = schema.item_to_map(&absent, None).unwrap();
        assert!(!map.contains_key("note"));
        assert_eq!(schema.map_to_item(&map).unwrap().note, None);
    }

    #[test]
    fn nested_items_round_trip_as_maps() {
        let inner = Arc::new(
            TableSchema::builder(Widget::default)
                .add_attribute(
                    StaticAttribute::new(
                        "id",
                        StringConverter,
                        |w: &Widget| w.id.clone(),
                        |w, v| w.id = Some(v),
                    )
                    .tag(primary_partition_key()),
                )
                .add_attribute(StaticAttribute::new(
                    "count",
                    I32Converter,
                    |w: &Widget| w.count,
                    |w, v| w.count = Some(v),
                ))
                .build()
                .unwrap(),
        );

        #[derive(Debug, Default, Clone, PartialEq)]
        struct Parcel {
            id: Option<String>,
            widget: Option<Widget>,
        }
        let schema = TableSchema::builder(Parcel::default)
            .add_attribute(
                StaticAttribute::new(
                    "id",
                    StringConverter,
                    |c: &Parcel| c.id.clone(),
                    |c, v| c.id = Some(v),
                )
                .tag(primary_partition_key()),
            )
            .add_attribute(StaticAttribute::new(
                "widget",
                ItemConverter::new(Arc::clone(&inner)),
                |c: &Parcel| c.widget.clone(),
                |c, v| c.widget = Some(v),
            ))
            .build()
            .unwrap();

        let value = Parcel {
            id: Some("c-1".to_string()),
            widget: Some(Widget {
                id: Some("w-9".to_string()),
                count: Some(2),
                label: None,
            }),
        };
        let map = schema.item_to_map(&value, None).unwrap();
        assert!(matches!(map.get("widget"), Some(AttributeValue::M(_))));
        assert_eq!(schema.map_to_item(&map).unwrap(), value);
    }

    #[test]
    fn duplicate_attribute_names_are_rejected() {
        let err = TableSchema::builder(Widget::default)
            .add_attribute(
                StaticAttribute::new(
                    "id",
                    StringConverter,
                    |w: &Widget| w.id.clone(),
                    |w, v| w.id = Some(v),
                )
                .tag(primary_partition_key()),
            )
            .add_attribute(StaticAttribute::new(
                "id",
                StringConverter,
                |w: &Widget| w.label.clone(),
                |w, v| w.label = Some(v),
            ))
            .build()
            .unwrap_err();
        assert!(err.is_schema_validation());
    }

    #[test]
    fn two_partition_keys_for_one_index_are_rejected() {
        let err = TableSchema::builder(Widget::default)
            .add_attribute(
                StaticAttribute::new(
                    "id",
                    StringConverter,
                    |w: &Widget| w.id.clone(),
                    |w, v| w.id = Some(v),
                )
                .tag(primary_partition_key()),
            )
            .add_attribute(
                StaticAttribute::new(
                    "label",
                    StringConverter,
                    |w: &Widget| w.label.clone(),
                    |w, v| w.label = Some(v),
                )
                .tag(primary_partition_key()),
            )
            .build()
            .unwrap_err();
        assert!(err.is_schema_validation());
    }

    #[test]
    fn sort_key_without_partition_key_is_rejected() {
        let err = TableSchema::builder(Widget::default)
            .add_attribute(
                StaticAttribute::new(
                    "id",
                    StringConverter,
                    |w: &Widget| w.id.clone(),
                    |w, v| w.id = Some(v),
                )
                .tag(primary_partition_key()),
            )
            .add_attribute(
                StaticAttribute::new(
                    "count",
                    I32Converter,
                    |w: &Widget| w.count,
                    |w, v| w.count = Some(v),
                )
                .tag(secondary_sort_key("gsi_dangling")),
            )
            .build()
            .unwrap_err();
        assert!(err.is_schema_validation());
    }

    #[test]
    fn missing_primary_partition_key_is_rejected() {
        let err = TableSchema::builder(Widget::default)
            .add_attribute(StaticAttribute::new(
                "id",
                StringConverter,
                |w: &Widget| w.id.clone(),
                |w, v| w.id = Some(v),
            ))
            .build()
            .unwrap_err();
        assert!(err.is_schema_validation());
    }

    #[test]
    fn unknown_index_lookup_fails() {
        let schema = widget_schema();
        let err = schema.key_attribute_names("gsi_missing").unwrap_err();
        assert!(err.is_unknown_index());
        let (partition, sort) = schema.key_attribute_names(PRIMARY_INDEX).unwrap();
        assert_eq!(partition, "id");
        assert_eq!(sort, None);
    }
}
