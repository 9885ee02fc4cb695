//! Shared fixtures for the integration tests: the `Record` item type, its
//! schema with a keys-only secondary index, and an in-memory store with the
//! matching table already created.

#[allow(unused)]
pub use rusty_ulid::Ulid;

use mapped_table::{
    I32Converter, Key, MappedTable, MemoryStore, Projection, SecondaryIndexDefinition,
    StaticAttribute, StringConverter, TableDefinition, TableSchema, primary_partition_key,
    primary_sort_key, secondary_partition_key, secondary_sort_key,
};

#[allow(unused)]
pub const TABLE_NAME: &str = "records";
#[allow(unused)]
pub const GSI_NAME: &str = "gsi_keys_only";

/// Item type mirroring the table layout: string partition / numeric sort on
/// the primary index, an independent key pair on the secondary index, and a
/// non-key payload attribute.
#[allow(unused)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    pub id: Option<String>,
    pub sort: Option<i32>,
    pub value: Option<i32>,
    pub gsi_id: Option<String>,
    pub gsi_sort: Option<i32>,
}

#[allow(unused)]
pub fn record_schema() -> TableSchema<Record> {
    TableSchema::builder(Record::default)
        .add_attribute(
            StaticAttribute::new(
                "id",
                StringConverter,
                |r: &Record| r.id.clone(),
                |r, v| r.id = Some(v),
            )
            .tag(primary_partition_key()),
        )
        .add_attribute(
            StaticAttribute::new(
                "sort",
                I32Converter,
                |r: &Record| r.sort,
                |r, v| r.sort = Some(v),
            )
            .tag(primary_sort_key()),
        )
        .add_attribute(StaticAttribute::new(
            "value",
            I32Converter,
            |r: &Record| r.value,
            |r, v| r.value = Some(v),
        ))
        .add_attribute(
            StaticAttribute::new(
                "gsi_id",
                StringConverter,
                |r: &Record| r.gsi_id.clone(),
                |r, v| r.gsi_id = Some(v),
            )
            .tag(secondary_partition_key(GSI_NAME)),
        )
        .add_attribute(
            StaticAttribute::new(
                "gsi_sort",
                I32Converter,
                |r: &Record| r.gsi_sort,
                |r, v| r.gsi_sort = Some(v),
            )
            .tag(secondary_sort_key(GSI_NAME)),
        )
        .build()
        .unwrap()
}

/// A store with the `records` table and its keys-only index created.
#[allow(unused)]
pub async fn new_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .create_table(TableDefinition {
            table_name: TABLE_NAME.to_string(),
            partition_key: "id".to_string(),
            sort_key: Some("sort".to_string()),
            secondary_indexes: vec![SecondaryIndexDefinition {
                index_name: GSI_NAME.to_string(),
                partition_key: "gsi_id".to_string(),
                sort_key: Some("gsi_sort".to_string()),
                projection: Projection::KeysOnly,
            }],
        })
        .await
        .unwrap();
    store
}

#[allow(unused)]
pub fn mapped_table(store: &MemoryStore) -> MappedTable<Record, MemoryStore> {
    MappedTable::new(store.clone(), TABLE_NAME, record_schema())
}

/// `count` fully-populated records sharing one partition on both indexes,
/// with `sort`, `value` and `gsi_sort` running 0..count.
#[allow(unused)]
pub fn records(id: &Ulid, gsi_id: &Ulid, count: i32) -> Vec<Record> {
    (0..count)
        .map(|index| Record {
            id: Some(id.to_string()),
            sort: Some(index),
            value: Some(index),
            gsi_id: Some(gsi_id.to_string()),
            gsi_sort: Some(index),
        })
        .collect()
}

/// The same records as the keys-only index returns them: every non-key
/// attribute stripped.
#[allow(unused)]
pub fn keys_only(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .cloned()
        .map(|record| Record {
            value: None,
            ..record
        })
        .collect()
}

#[allow(unused)]
pub async fn insert_records(table: &MappedTable<Record, MemoryStore>, records: &[Record]) {
    for record in records {
        table.put_item(record).await.unwrap();
    }
}

#[allow(unused)]
pub fn record_key(id: &Ulid, sort: i32) -> Key {
    Key::builder()
        .partition_value(id.to_string())
        .sort_value(sort)
        .build()
        .unwrap()
}
