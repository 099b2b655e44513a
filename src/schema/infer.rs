//! Column type inference.
//!
//! Reconciles every value observed for one field into the narrowest relational
//! type that can hold all of them. The checks run in a fixed precedence order
//! (nested, string, float, integer, boolean) over the non-null values only.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use super::value::FieldValue;
use crate::config::{INT_RANGE_LIMIT, VARCHAR_MAX_CHARS};

/// Relational column type assigned to an inferred field.
///
/// The string forms are the declared types written into `CREATE TABLE`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum TypeTag {
    /// Nested arrays or objects, stored as JSON text
    #[strum(serialize = "JSON")]
    Json,
    /// Strings longer than `VARCHAR_MAX_CHARS`, and the all-null fallback
    #[strum(serialize = "TEXT")]
    Text,
    /// Strings up to `VARCHAR_MAX_CHARS` characters
    #[strum(serialize = "VARCHAR(255)")]
    Varchar,
    /// Any floating-point value
    #[strum(serialize = "DOUBLE")]
    Double,
    /// Integers whose magnitude reaches 2^31
    #[strum(serialize = "BIGINT")]
    BigInt,
    /// Integers below 2^31 in magnitude
    #[strum(serialize = "INT")]
    Int,
    /// Booleans only
    #[strum(serialize = "BOOLEAN")]
    Boolean,
}

impl TypeTag {
    /// Declared SQL type name.
    pub fn sql_name(self) -> &'static str {
        self.into()
    }
}

/// Infers the column type for the full vector of values of one field.
///
/// Always returns a tag; an empty or all-null input yields [`TypeTag::Text`].
pub fn infer_column_type(values: &[FieldValue<'_>]) -> TypeTag {
    let non_null: Vec<&FieldValue<'_>> = values.iter().filter(|v| !v.is_null()).collect();
    if non_null.is_empty() {
        return TypeTag::Text;
    }

    if non_null.iter().any(|v| v.is_nested()) {
        return TypeTag::Json;
    }

    let longest_text = non_null
        .iter()
        .filter_map(|v| match v {
            FieldValue::Text(s) => Some(s.chars().count()),
            _ => None,
        })
        .max();
    if let Some(max_chars) = longest_text {
        return if max_chars > VARCHAR_MAX_CHARS {
            TypeTag::Text
        } else {
            TypeTag::Varchar
        };
    }

    if non_null.iter().any(|v| matches!(v, FieldValue::Float(_))) {
        return TypeTag::Double;
    }

    let max_magnitude = non_null
        .iter()
        .filter_map(|v| match v {
            FieldValue::Int(i) => Some(i.unsigned_abs()),
            _ => None,
        })
        .max();
    if let Some(magnitude) = max_magnitude {
        return if magnitude >= INT_RANGE_LIMIT {
            TypeTag::BigInt
        } else {
            TypeTag::Int
        };
    }

    if non_null.iter().any(|v| matches!(v, FieldValue::Bool(_))) {
        return TypeTag::Boolean;
    }

    TypeTag::Text
}
