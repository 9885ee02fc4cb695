//! # Mapped Table
//!
//! A typed object-mapping and paginated-query layer for schemaless,
//! partition/sort-key-indexed key-value stores, with support for:
//! - Declarative table schemas with explicit getter/setter accessors
//! - Primary and global secondary indexes with independent key schemas
//! - Key-condition predicates (`equal`, `between`, `begins_with`, ...)
//! - Lazy pagination with exact continuation-key round-tripping
//!
//! ## Features
//!
//! - **Type-safe**: field access is bound at schema construction time as
//!   plain functions, so the mapping is statically checkable — no runtime
//!   name-based reflection
//! - **Store-agnostic**: all transport goes through the [`StoreClient`]
//!   trait; the bundled [`MemoryStore`] implements the contract in memory
//!   for tests and local development
//! - **Exact numbers**: number attributes are carried as exact decimal
//!   strings end to end, never as binary floats
//! - **Lazy pages**: queries return a pull-driven [`PageIterator`] whose
//!   continuation keys resume iteration exactly where it left off
//!
//! ## Quick Start
//!
//! ```rust
//! use mapped_table::{
//!     I64Converter, Key, MappedTable, MemoryStore, QueryConditional, StaticAttribute,
//!     StringConverter, TableDefinition, TableSchema, primary_partition_key, primary_sort_key,
//! };
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Order {
//!     customer: Option<String>,
//!     number: Option<i64>,
//!     note: Option<String>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = TableSchema::builder(Order::default)
//!         .add_attribute(
//!             StaticAttribute::new(
//!                 "customer",
//!                 StringConverter,
//!                 |o: &Order| o.customer.clone(),
//!                 |o, v| o.customer = Some(v),
//!             )
//!             .tag(primary_partition_key()),
//!         )
//!         .add_attribute(
//!             StaticAttribute::new(
//!                 "number",
//!                 I64Converter,
//!                 |o: &Order| o.number,
//!                 |o, v| o.number = Some(v),
//!             )
//!             .tag(primary_sort_key()),
//!         )
//!         .add_attribute(StaticAttribute::new(
//!             "note",
//!             StringConverter,
//!             |o: &Order| o.note.clone(),
//!             |o, v| o.note = Some(v),
//!         ))
//!         .build()?;
//!
//!     let store = MemoryStore::new();
//!     store
//!         .create_table(TableDefinition {
//!             table_name: "orders".to_string(),
//!             partition_key: "customer".to_string(),
//!             sort_key: Some("number".to_string()),
//!             secondary_indexes: Vec::new(),
//!         })
//!         .await?;
//!     let table = MappedTable::new(store, "orders", schema);
//!
//!     let order = Order {
//!         customer: Some("c-1".to_string()),
//!         number: Some(7),
//!         note: Some("rush".to_string()),
//!     };
//!     table.put_item(&order).await?;
//!
//!     let key = Key::builder().partition_value("c-1").build()?;
//!     let mut pages = table.query(QueryConditional::key_equal_to(key))?;
//!     while let Some(page) = pages.next_page().await? {
//!         for item in page.items() {
//!             assert_eq!(item, &order);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
#![deny(
    warnings,
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    deprecated,
    unknown_lints,
    unreachable_code,
    unused_mut
)]

mod error;
pub use error::Error;

/// Wire-level attribute values and raw item maps
pub mod attribute;

/// Store client boundary: request/response records and the client trait
pub mod client;

/// Converters between native field types and attribute values
pub mod convert;

/// Typed keys, query conditionals and resolved key conditions
pub mod key;

/// In-memory store client for tests and local development
pub mod memory;

/// Pages and the lazy page iterator
pub mod pagination;

/// Declarative table schemas and key-role tags
pub mod schema;

/// Mapped table and index façades
pub mod table;

// Re-export main types for convenience
pub use attribute::{
    AttributeMap, AttributeValue, binary_value, bool_value, null_value, number_value, string_value,
};
pub use client::{
    DeleteItemInput, GetItemInput, PutItemInput, QueryInput, QueryOutput, ScanInput, ScanOutput,
    StoreClient, StoreError,
};
pub use convert::{
    AttributeConverter, BinaryConverter, BoolConverter, I32Converter, I64Converter, ItemConverter,
    ListConverter, NullableConverter, StringConverter,
};
pub use key::{Key, KeyBuilder, KeyCondition, QueryConditional, SortCondition};
pub use memory::{MemoryStore, Projection, SecondaryIndexDefinition, TableDefinition};
pub use pagination::{Page, PageIterator};
pub use schema::{
    AttributeTag, KeyRole, PRIMARY_INDEX, StaticAttribute, TableSchema, TableSchemaBuilder,
    primary_partition_key, primary_sort_key, secondary_partition_key, secondary_sort_key,
};
pub use table::{GetItemRequest, MappedIndex, MappedTable, QueryRequest, ScanRequest};
