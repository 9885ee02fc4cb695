use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Raw item representation: attribute name to wire-level value.
///
/// This is the storage format itself. Continuation keys
/// (`last_evaluated_key` / `exclusive_start_key`) are plain `AttributeMap`s
/// and round-trip through the engine unconverted.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Wire-level value accepted by the store.
///
/// Exactly one variant is populated. Numbers are carried as exact decimal
/// strings, never as a binary floating type, so no precision is lost between
/// the application and the store. Sets are homogeneous and expected to be
/// non-empty.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// String scalar.
    S(String),
    /// Number scalar, exact decimal textual form.
    N(String),
    /// Binary scalar.
    B(Vec<u8>),
    /// Boolean scalar.
    Bool(bool),
    /// Explicit null. Distinct from an attribute being absent from the map.
    Null,
    /// Ordered list of values.
    L(Vec<AttributeValue>),
    /// Nested attribute map.
    M(HashMap<String, AttributeValue>),
    /// Set of strings.
    Ss(BTreeSet<String>),
    /// Set of numbers (decimal textual form).
    Ns(BTreeSet<String>),
    /// Set of binary values.
    Bs(BTreeSet<Vec<u8>>),
}

impl AttributeValue {
    /// Short type tag for the populated variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Bool(_) => "BOOL",
            Self::Null => "NULL",
            Self::L(_) => "L",
            Self::M(_) => "M",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
        }
    }

    /// Returns `true` for the scalar variants usable as key values.
    pub fn is_key_scalar(&self) -> bool {
        matches!(self, Self::S(_) | Self::N(_) | Self::B(_))
    }

    /// String payload, if this is an `S` value.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// Number payload (decimal string), if this is an `N` value.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// Binary payload, if this is a `B` value.
    pub fn as_b(&self) -> Option<&[u8]> {
        match self {
            Self::B(b) => Some(b),
            _ => None,
        }
    }

    /// Boolean payload, if this is a `BOOL` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` if this is the explicit `NULL` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// List payload, if this is an `L` value.
    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::L(l) => Some(l),
            _ => None,
        }
    }

    /// Map payload, if this is an `M` value.
    pub fn as_m(&self) -> Option<&HashMap<String, AttributeValue>> {
        match self {
            Self::M(m) => Some(m),
            _ => None,
        }
    }

    /// String-set payload, if this is an `SS` value.
    pub fn as_ss(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Ss(ss) => Some(ss),
            _ => None,
        }
    }

    /// Natural key ordering between two scalars of the same variant.
    ///
    /// Strings compare lexicographically, numbers by exact decimal value and
    /// binary values byte-wise. Returns `None` for mismatched variants or
    /// non-key types; this ordering determines sort-condition bounds and item
    /// order within a partition.
    pub fn key_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::S(a), Self::S(b)) => Some(a.cmp(b)),
            (Self::N(a), Self::N(b)) => Some(cmp_decimal(a, b)),
            (Self::B(a), Self::B(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Shorthand for a string value.
pub fn string_value(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

/// Shorthand for a number value from anything that formats as a decimal.
pub fn number_value(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// Shorthand for a binary value.
pub fn binary_value(value: impl Into<Vec<u8>>) -> AttributeValue {
    AttributeValue::B(value.into())
}

/// Shorthand for a boolean value.
pub fn bool_value(value: bool) -> AttributeValue {
    AttributeValue::Bool(value)
}

/// Shorthand for the explicit null value.
pub fn null_value() -> AttributeValue {
    AttributeValue::Null
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::S(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::S(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::N(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::N(value.to_string())
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        Self::N(value.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        Self::B(value)
    }
}

/// Compare two decimal strings by numeric value without parsing into floats.
///
/// Handles an optional leading sign, leading zeros in the integer part and
/// trailing zeros in the fraction, so `"007.10"` equals `"7.1"` and `-0`
/// equals `0`. Exponent notation is not part of the wire form.
fn cmp_decimal(a: &str, b: &str) -> Ordering {
    let (a_neg, a_int, a_frac) = split_decimal(a);
    let (b_neg, b_int, b_frac) = split_decimal(b);

    let a_zero = a_int.is_empty() && a_frac.is_empty();
    let b_zero = b_int.is_empty() && b_frac.is_empty();
    if a_zero && b_zero {
        return Ordering::Equal;
    }

    match (a_neg && !a_zero, b_neg && !b_zero) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    let magnitude = cmp_magnitude(a_int, a_frac, b_int, b_frac);
    if a_neg && !a_zero { magnitude.reverse() } else { magnitude }
}

/// Split into (negative, integer digits without leading zeros, fraction
/// digits without trailing zeros).
fn split_decimal(value: &str) -> (bool, &str, &str) {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    (
        negative,
        int_part.trim_start_matches('0'),
        frac_part.trim_end_matches('0'),
    )
}

fn cmp_magnitude(a_int: &str, a_frac: &str, b_int: &str, b_frac: &str) -> Ordering {
    // More integer digits means strictly larger once leading zeros are gone.
    a_int
        .len()
        .cmp(&b_int.len())
        .then_with(|| a_int.cmp(b_int))
        .then_with(|| a_frac.cmp(b_frac))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> AttributeValue {
        AttributeValue::N(s.to_string())
    }

    #[test]
    fn number_ordering_is_numeric_not_lexical() {
        assert_eq!(n("9").key_cmp(&n("10")), Some(Ordering::Less));
        assert_eq!(n("2").key_cmp(&n("10")), Some(Ordering::Less));
        assert_eq!(n("10").key_cmp(&n("10")), Some(Ordering::Equal));
        assert_eq!(n("100").key_cmp(&n("99")), Some(Ordering::Greater));
    }

    #[test]
    fn number_ordering_handles_sign_and_zeros() {
        assert_eq!(n("-1").key_cmp(&n("1")), Some(Ordering::Less));
        assert_eq!(n("-2").key_cmp(&n("-10")), Some(Ordering::Greater));
        assert_eq!(n("-0").key_cmp(&n("0")), Some(Ordering::Equal));
        assert_eq!(n("007.10").key_cmp(&n("7.1")), Some(Ordering::Equal));
        assert_eq!(n("0.5").key_cmp(&n("0.25")), Some(Ordering::Greater));
        assert_eq!(n("1.25").key_cmp(&n("1.3")), Some(Ordering::Less));
    }

    #[test]
    fn string_ordering_is_lexicographic() {
        let a = string_value("age3");
        let b = string_value("age10");
        // "age10" < "age3" lexically even though 10 > 3 numerically.
        assert_eq!(b.key_cmp(&a), Some(Ordering::Less));
    }

    #[test]
    fn mismatched_variants_do_not_compare() {
        assert_eq!(string_value("1").key_cmp(&n("1")), None);
        assert_eq!(bool_value(true).key_cmp(&bool_value(true)), None);
    }

    #[test]
    fn type_names_match_wire_tags() {
        assert_eq!(string_value("x").type_name(), "S");
        assert_eq!(number_value(4).type_name(), "N");
        assert_eq!(null_value().type_name(), "NULL");
        assert_eq!(binary_value(vec![1u8]).type_name(), "B");
    }

    #[test]
    fn scalar_accessors_reject_other_variants() {
        assert_eq!(number_value(1).as_s(), None);
        assert_eq!(string_value("1").as_n(), None);
        assert!(string_value("x").is_key_scalar());
        assert!(!bool_value(true).is_key_scalar());
    }
}
