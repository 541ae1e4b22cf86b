//! EIP-712 type schemas.
//!
//! A [`TypeSchema`] maps struct names to their ordered field descriptors,
//! the same shape as the `types` member of a typed-data JSON document.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::EncodingError;

/// Name of the implicit domain struct. Never treated as a message type.
pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

/// One `(name, type)` entry of a struct definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into() }
    }
}

/// Struct name -> ordered field descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSchema {
    types: BTreeMap<String, Vec<FieldDescriptor>>,
}

impl TypeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a struct definition. Builder style.
    pub fn with_struct<I>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        self.insert(name, fields);
        self
    }

    pub fn insert<I>(&mut self, name: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        self.types.insert(name.into(), fields.into_iter().collect());
    }

    pub fn fields(&self, name: &str) -> Option<&[FieldDescriptor]> {
        self.types.get(name).map(Vec::as_slice)
    }

    /// Message struct definitions, excluding any `EIP712Domain` entry.
    pub fn structs(&self) -> impl Iterator<Item = (&str, &[FieldDescriptor])> {
        self.types
            .iter()
            .filter(|(name, _)| name.as_str() != DOMAIN_TYPE_NAME)
            .map(|(name, fields)| (name.as_str(), fields.as_slice()))
    }

    /// Checks that every field type is either elementary or a struct defined
    /// in this schema.
    pub fn validate(&self) -> Result<(), EncodingError> {
        for (name, fields) in self.structs() {
            for field in fields {
                let path = format!("{name}.{}", field.name);
                let ty = FieldType::parse(&field.ty)
                    .ok_or_else(|| EncodingError::InvalidFieldType { path, ty: field.ty.clone() })?;
                if let Some(referenced) = ty.struct_name() {
                    if self.fields(referenced).is_none() {
                        return Err(EncodingError::UnknownType(referenced.to_string()));
                    }
                }
            }
        }
        Ok(())
    }

    /// The unique struct that no other struct references.
    pub fn primary_type(&self) -> Result<String, EncodingError> {
        let mut referenced = BTreeSet::new();
        for (name, fields) in self.structs() {
            for field in fields {
                if let Some(target) = FieldType::parse(&field.ty).as_ref().and_then(FieldType::struct_name) {
                    if target != name {
                        referenced.insert(target.to_string());
                    }
                }
            }
        }

        let mut candidates: Vec<String> = self
            .structs()
            .map(|(name, _)| name)
            .filter(|name| !referenced.contains(*name))
            .map(str::to_string)
            .collect();

        match candidates.len() {
            0 => Err(EncodingError::NoPrimaryType),
            1 => Ok(candidates.remove(0)),
            _ => Err(EncodingError::AmbiguousPrimaryType(candidates)),
        }
    }

    /// The schema as the `types` member of a typed-data JSON document.
    pub(crate) fn to_json(&self) -> serde_json::Value {
        let types = self
            .structs()
            .map(|(name, fields)| {
                let fields = fields
                    .iter()
                    .map(|f| serde_json::json!({ "name": f.name, "type": f.ty }))
                    .collect();
                (name.to_string(), serde_json::Value::Array(fields))
            })
            .collect();
        serde_json::Value::Object(types)
    }
}

/// Parsed form of a field type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Uint(usize),
    Int(usize),
    Array(Box<FieldType>, Option<usize>),
    Struct(String),
}

impl FieldType {
    /// Parses `address`, `uint64`, `bytes32[]`, `Person[2][]`, ...
    /// Returns `None` for malformed type strings.
    pub fn parse(ty: &str) -> Option<Self> {
        let ty = ty.trim();
        if let Some(inner) = ty.strip_suffix(']') {
            let open = inner.rfind('[')?;
            let (element, len) = (&inner[..open], &inner[open + 1..]);
            let len = if len.is_empty() { None } else { Some(len.parse().ok()?) };
            return Some(Self::Array(Box::new(Self::parse(element)?), len));
        }

        let parsed = match ty {
            "address" => Self::Address,
            "bool" => Self::Bool,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            _ => match parse_sized(ty) {
                Some(sized) => sized?,
                None if is_identifier(ty) => Self::Struct(ty.to_string()),
                None => return None,
            },
        };
        Some(parsed)
    }

    /// Innermost struct name, looking through arrays.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Self::Struct(name) => Some(name),
            Self::Array(element, _) => element.struct_name(),
            _ => None,
        }
    }
}

/// `Some` when `ty` is shaped like `bytes<N>`, `uint<N>` or `int<N>`, holding
/// `None` if the size is invalid. Other names starting with those prefixes
/// (`interval`, `bytesBag`) are not sized types.
fn parse_sized(ty: &str) -> Option<Option<FieldType>> {
    let (prefix, digits) = ["bytes", "uint", "int"]
        .into_iter()
        .find_map(|prefix| ty.strip_prefix(prefix).map(|rest| (prefix, rest)))?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(match prefix {
        "bytes" => digits.parse().ok().filter(|n| (1..=32).contains(n)).map(FieldType::FixedBytes),
        "uint" => parse_int_bits(digits).map(FieldType::Uint),
        _ => parse_int_bits(digits).map(FieldType::Int),
    })
}

fn parse_int_bits(bits: &str) -> Option<usize> {
    // bare `uint`/`int` is an alias for the 256-bit type
    if bits.is_empty() {
        return Some(256);
    }
    let bits: usize = bits.parse().ok()?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_schema() -> TypeSchema {
        TypeSchema::new()
            .with_struct(
                "Person",
                [FieldDescriptor::new("name", "string"), FieldDescriptor::new("wallet", "address")],
            )
            .with_struct(
                "Mail",
                [
                    FieldDescriptor::new("from", "Person"),
                    FieldDescriptor::new("to", "Person[]"),
                    FieldDescriptor::new("contents", "string"),
                ],
            )
    }

    #[test]
    fn parses_elementary_types() {
        assert_eq!(FieldType::parse("address"), Some(FieldType::Address));
        assert_eq!(FieldType::parse("uint"), Some(FieldType::Uint(256)));
        assert_eq!(FieldType::parse("int8"), Some(FieldType::Int(8)));
        assert_eq!(FieldType::parse("bytes32"), Some(FieldType::FixedBytes(32)));
        assert_eq!(FieldType::parse("bytes"), Some(FieldType::Bytes));
    }

    #[test]
    fn rejects_malformed_types() {
        assert_eq!(FieldType::parse("uint7"), None);
        assert_eq!(FieldType::parse("uint264"), None);
        assert_eq!(FieldType::parse("bytes33"), None);
        assert_eq!(FieldType::parse("bytes0"), None);
        assert_eq!(FieldType::parse("Person[x]"), None);
        assert_eq!(FieldType::parse("9Lives"), None);
    }

    #[test]
    fn struct_names_may_start_with_elementary_prefixes() {
        assert_eq!(FieldType::parse("interval"), Some(FieldType::Struct("interval".into())));
        assert_eq!(FieldType::parse("integrity[]").unwrap().struct_name(), Some("integrity"));
        assert_eq!(FieldType::parse("bytesBag"), Some(FieldType::Struct("bytesBag".into())));
        assert_eq!(FieldType::parse("uintSet"), Some(FieldType::Struct("uintSet".into())));
    }

    #[test]
    fn prefixed_struct_is_referenced_not_primary() {
        let schema = TypeSchema::new()
            .with_struct("interval", [FieldDescriptor::new("start", "uint64")])
            .with_struct("Booking", [FieldDescriptor::new("when", "interval")]);
        assert!(schema.validate().is_ok());
        assert_eq!(schema.primary_type().unwrap(), "Booking");
    }

    #[test]
    fn parses_nested_arrays() {
        let ty = FieldType::parse("Person[2][]").unwrap();
        assert_eq!(
            ty,
            FieldType::Array(
                Box::new(FieldType::Array(Box::new(FieldType::Struct("Person".into())), Some(2))),
                None
            )
        );
        assert_eq!(ty.struct_name(), Some("Person"));
    }

    #[test]
    fn primary_type_is_the_unreferenced_struct() {
        assert_eq!(mail_schema().primary_type().unwrap(), "Mail");
    }

    #[test]
    fn domain_entry_is_not_a_primary_candidate() {
        let schema = mail_schema().with_struct(
            DOMAIN_TYPE_NAME,
            [FieldDescriptor::new("name", "string")],
        );
        assert_eq!(schema.primary_type().unwrap(), "Mail");
        assert!(schema.to_json().get(DOMAIN_TYPE_NAME).is_none());
    }

    #[test]
    fn ambiguous_primary_type_errors() {
        let schema = mail_schema().with_struct("Other", [FieldDescriptor::new("x", "bool")]);
        let err = schema.primary_type().unwrap_err();
        assert!(matches!(err, EncodingError::AmbiguousPrimaryType(c) if c == vec!["Mail", "Other"]));
    }

    #[test]
    fn empty_schema_has_no_primary_type() {
        assert!(matches!(TypeSchema::new().primary_type(), Err(EncodingError::NoPrimaryType)));
    }

    #[test]
    fn validate_reports_undefined_struct() {
        let schema = TypeSchema::new().with_struct("Mail", [FieldDescriptor::new("from", "Person")]);
        let err = schema.validate().unwrap_err();
        assert!(matches!(err, EncodingError::UnknownType(t) if t == "Person"));
        assert!(mail_schema().validate().is_ok());
    }

    #[test]
    fn deserializes_types_json() {
        let schema: TypeSchema = serde_json::from_str(
            r#"{"Agreement":[{"name":"active","type":"address"},{"name":"metadata","type":"bytes"}]}"#,
        )
        .unwrap();
        let fields = schema.fields("Agreement").unwrap();
        assert_eq!(fields[1], FieldDescriptor::new("metadata", "bytes"));
    }
}
