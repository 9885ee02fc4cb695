use std::fmt;
use std::sync::Arc;

use crate::attribute::AttributeValue;
use crate::error::Error;
use crate::schema::TableSchema;

/// Bidirectional conversion between one native field type and the wire-level
/// [`AttributeValue`] representation.
///
/// One converter instance serves one declared field type.
/// [`transform_from`](Self::transform_from) fails with
/// [`Error::Conversion`] when the populated variant does not match the
/// expected shape; nothing is silently coerced. Converters compose:
/// [`ListConverter`] applies an element converter across an `L` value and
/// [`ItemConverter`] applies a whole [`TableSchema`] to an `M` value.
pub trait AttributeConverter: Send + Sync {
    /// Native type this converter handles.
    type Value;

    /// Convert a native value into its wire representation.
    fn transform_to(&self, value: &Self::Value) -> Result<AttributeValue, Error>;

    /// Convert a wire value back into the native type.
    fn transform_from(&self, value: AttributeValue) -> Result<Self::Value, Error>;
}

fn mismatch(expected: &'static str, actual: &AttributeValue) -> Error {
    Error::Conversion {
        expected,
        actual: actual.type_name().to_string(),
    }
}

/// `String` ↔ `S`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl AttributeConverter for StringConverter {
    type Value = String;

    fn transform_to(&self, value: &String) -> Result<AttributeValue, Error> {
        Ok(AttributeValue::S(value.clone()))
    }

    fn transform_from(&self, value: AttributeValue) -> Result<String, Error> {
        match value {
            AttributeValue::S(s) => Ok(s),
            other => Err(mismatch("S", &other)),
        }
    }
}

/// `i32` ↔ `N`.
#[derive(Debug, Clone, Copy, Default)]
pub struct I32Converter;

impl AttributeConverter for I32Converter {
    type Value = i32;

    fn transform_to(&self, value: &i32) -> Result<AttributeValue, Error> {
        Ok(AttributeValue::N(value.to_string()))
    }

    fn transform_from(&self, value: AttributeValue) -> Result<i32, Error> {
        parse_number("N", value)
    }
}

/// `i64` ↔ `N`.
#[derive(Debug, Clone, Copy, Default)]
pub struct I64Converter;

impl AttributeConverter for I64Converter {
    type Value = i64;

    fn transform_to(&self, value: &i64) -> Result<AttributeValue, Error> {
        Ok(AttributeValue::N(value.to_string()))
    }

    fn transform_from(&self, value: AttributeValue) -> Result<i64, Error> {
        parse_number("N", value)
    }
}

fn parse_number<T: std::str::FromStr>(
    expected: &'static str,
    value: AttributeValue,
) -> Result<T, Error> {
    match value {
        AttributeValue::N(n) => n.parse().map_err(|_| Error::Conversion {
            expected,
            actual: format!("unparseable number '{n}'"),
        }),
        other => Err(mismatch(expected, &other)),
    }
}

/// `bool` ↔ `BOOL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter;

impl AttributeConverter for BoolConverter {
    type Value = bool;

    fn transform_to(&self, value: &bool) -> Result<AttributeValue, Error> {
        Ok(AttributeValue::Bool(*value))
    }

    fn transform_from(&self, value: AttributeValue) -> Result<bool, Error> {
        match value {
            AttributeValue::Bool(b) => Ok(b),
            other => Err(mismatch("BOOL", &other)),
        }
    }
}

/// `Vec<u8>` ↔ `B`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryConverter;

impl AttributeConverter for BinaryConverter {
    type Value = Vec<u8>;

    fn transform_to(&self, value: &Vec<u8>) -> Result<AttributeValue, Error> {
        Ok(AttributeValue::B(value.clone()))
    }

    fn transform_from(&self, value: AttributeValue) -> Result<Vec<u8>, Error> {
        match value {
            AttributeValue::B(b) => Ok(b),
            other => Err(mismatch("B", &other)),
        }
    }
}

/// `Option<V>` ↔ explicit `NULL`, delegating present values to the inner
/// converter.
///
/// This is what makes explicit null distinguishable from absence at the
/// schema level: a getter that yields `Some(None)` writes `NULL` into the
/// map, while a getter that yields `None` writes nothing at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableConverter<C>(pub C);

impl<C: AttributeConverter> AttributeConverter for NullableConverter<C> {
    type Value = Option<C::Value>;

    fn transform_to(&self, value: &Option<C::Value>) -> Result<AttributeValue, Error> {
        match value {
            Some(inner) => self.0.transform_to(inner),
            None => Ok(AttributeValue::Null),
        }
    }

    fn transform_from(&self, value: AttributeValue) -> Result<Option<C::Value>, Error> {
        match value {
            AttributeValue::Null => Ok(None),
            other => Ok(Some(self.0.transform_from(other)?)),
        }
    }
}

/// `Vec<V>` ↔ `L`, applying an element converter to each member in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListConverter<C>(pub C);

impl<C: AttributeConverter> AttributeConverter for ListConverter<C> {
    type Value = Vec<C::Value>;

    fn transform_to(&self, value: &Vec<C::Value>) -> Result<AttributeValue, Error> {
        let elements = value
            .iter()
            .map(|v| self.0.transform_to(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AttributeValue::L(elements))
    }

    fn transform_from(&self, value: AttributeValue) -> Result<Vec<C::Value>, Error> {
        match value {
            AttributeValue::L(elements) => elements
                .into_iter()
                .map(|v| self.0.transform_from(v))
                .collect(),
            other => Err(mismatch("L", &other)),
        }
    }
}

/// Nested mapped object ↔ `M`, applying a shared [`TableSchema`] recursively.
#[derive(Clone)]
pub struct ItemConverter<T> {
    schema: Arc<TableSchema<T>>,
}

impl<T> ItemConverter<T> {
    /// Wrap a schema for use as a nested-object converter.
    pub fn new(schema: Arc<TableSchema<T>>) -> Self {
        Self { schema }
    }
}

impl<T> fmt::Debug for ItemConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemConverter").finish_non_exhaustive()
    }
}

impl<T: Send + Sync> AttributeConverter for ItemConverter<T> {
    type Value = T;

    fn transform_to(&self, value: &T) -> Result<AttributeValue, Error> {
        Ok(AttributeValue::M(self.schema.item_to_map(value, None)?))
    }

    fn transform_from(&self, value: AttributeValue) -> Result<T, Error> {
        match value {
            AttributeValue::M(map) => self.schema.map_to_item(&map),
            other => Err(mismatch("M", &other)),
        }
    }
}
