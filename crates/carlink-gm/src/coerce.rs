//! Coercion of the vendor's `{type, value}` tagged fields into typed records.
//!
//! Each target record declares a static schema of field names and native
//! types. [`coerce`] walks the raw record, dispatches on each field's tag, and
//! hands the converted values to the record's constructor. Fields the record
//! does not know about are validated and then dropped; fields the record
//! expects but the vendor omitted take their default value.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoercionError;

/// Type tag attached to every vendor field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    String,
    Boolean,
    Number,
    Null,
    /// Any tag outside the supported set, kept verbatim for error reporting.
    Unsupported(String),
}

impl FieldKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::String => "String",
            FieldKind::Boolean => "Boolean",
            FieldKind::Number => "Number",
            FieldKind::Null => "Null",
            FieldKind::Unsupported(tag) => tag,
        }
    }
}

impl From<String> for FieldKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "String" => FieldKind::String,
            "Boolean" => FieldKind::Boolean,
            "Number" => FieldKind::Number,
            "Null" => FieldKind::Null,
            _ => FieldKind::Unsupported(tag),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Unsupported(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

/// One vendor field before coercion: `{"type": "Boolean", "value": "True"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFieldValue {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
}

impl RawFieldValue {
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Field name → tagged value. Sorted so failures are reported in a stable order.
pub type RawRecord = BTreeMap<String, RawFieldValue>;

/// Native type a record declares for one of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Bool,
    Integer,
    Float,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Bool => "boolean",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// A single coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// The vendor sent `Null`.
    Absent,
}

/// Converted values for the fields a record declares.
///
/// Accessors take the value out and fall back to the type's default when the
/// field was missing or `Null`.
#[derive(Debug, Default)]
pub struct CoercedFields {
    values: HashMap<&'static str, TypedValue>,
}

impl CoercedFields {
    pub fn take_text(&mut self, name: &str) -> String {
        match self.values.remove(name) {
            Some(TypedValue::Text(s)) => s,
            _ => String::new(),
        }
    }

    pub fn take_bool(&mut self, name: &str) -> bool {
        matches!(self.values.remove(name), Some(TypedValue::Bool(true)))
    }

    pub fn take_integer(&mut self, name: &str) -> i64 {
        match self.values.remove(name) {
            Some(TypedValue::Integer(n)) => n,
            _ => 0,
        }
    }

    pub fn take_float(&mut self, name: &str) -> Option<f64> {
        match self.values.remove(name) {
            Some(TypedValue::Float(n)) => Some(n),
            _ => None,
        }
    }
}

/// A record that can be built from a vendor [`RawRecord`].
pub trait TypedRecord: Sized {
    /// Vendor field names this record reads, with their declared types.
    const SCHEMA: &'static [FieldSpec];

    fn from_fields(fields: CoercedFields) -> Self;
}

/// Coerces a raw vendor record into `T`.
///
/// # Errors
///
/// - [`CoercionError::UnsupportedDataType`] for a tag outside
///   `String`/`Boolean`/`Number`/`Null`.
/// - [`CoercionError::UnparsableBoolean`] / [`CoercionError::UnparsableNumber`]
///   when the text does not parse.
/// - [`CoercionError::FieldTypeMismatch`] when a known field's tag contradicts
///   its declared type.
pub fn coerce<T: TypedRecord>(raw: RawRecord) -> Result<T, CoercionError> {
    let mut fields = CoercedFields::default();

    for (name, raw_value) in raw {
        let spec = T::SCHEMA.iter().find(|spec| spec.name == name);
        let value = coerce_value(&name, raw_value, spec.map(|s| s.ty))?;
        if let Some(spec) = spec {
            fields.values.insert(spec.name, value);
        }
    }

    Ok(T::from_fields(fields))
}

/// Converts one tagged value. `declared` is `None` for fields the target
/// record does not know; those are still validated, with numbers checked as
/// floats.
fn coerce_value(
    field: &str,
    raw: RawFieldValue,
    declared: Option<FieldType>,
) -> Result<TypedValue, CoercionError> {
    let RawFieldValue { kind, value } = raw;

    let converted = match kind {
        FieldKind::Unsupported(tag) => return Err(CoercionError::UnsupportedDataType(tag)),
        FieldKind::Null => TypedValue::Absent,
        FieldKind::String => TypedValue::Text(value),
        FieldKind::Boolean => {
            let parsed = match value.as_str() {
                "True" => Some(true),
                "False" => Some(false),
                _ => None,
            };
            match parsed {
                Some(flag) => TypedValue::Bool(flag),
                None => {
                    return Err(CoercionError::UnparsableBoolean {
                        field: field.to_string(),
                        value,
                    })
                }
            }
        }
        FieldKind::Number if declared == Some(FieldType::Integer) => {
            let parsed = value.trim().parse::<i64>();
            match parsed {
                Ok(n) => TypedValue::Integer(n),
                Err(_) => {
                    return Err(CoercionError::UnparsableNumber {
                        field: field.to_string(),
                        value,
                    })
                }
            }
        }
        FieldKind::Number => {
            let parsed = value.trim().parse::<f64>();
            match parsed {
                Ok(n) if n.is_finite() => TypedValue::Float(n),
                _ => {
                    return Err(CoercionError::UnparsableNumber {
                        field: field.to_string(),
                        value,
                    })
                }
            }
        }
    };

    let Some(expected) = declared else {
        return Ok(converted);
    };
    let compatible = matches!(
        (expected, &converted),
        (_, TypedValue::Absent)
            | (FieldType::Text, TypedValue::Text(_))
            | (FieldType::Bool, TypedValue::Bool(_))
            | (FieldType::Integer, TypedValue::Integer(_))
            | (FieldType::Float, TypedValue::Float(_))
    );
    if compatible {
        Ok(converted)
    } else {
        Err(CoercionError::FieldTypeMismatch {
            field: field.to_string(),
            expected,
            found: tag_of(&converted).to_string(),
        })
    }
}

fn tag_of(value: &TypedValue) -> &'static str {
    match value {
        TypedValue::Text(_) => "String",
        TypedValue::Bool(_) => "Boolean",
        TypedValue::Integer(_) | TypedValue::Float(_) => "Number",
        TypedValue::Absent => "Null",
    }
}

#[cfg(test)]
#[path = "coerce_test.rs"]
mod tests;
