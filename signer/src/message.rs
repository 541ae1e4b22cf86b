//! Message values and their validation against a [`TypeSchema`].

use std::collections::BTreeMap;
use std::str::FromStr;

use alloy_primitives::{hex, Address, Bytes, I256, U256};
use serde_json::{Map, Value as Json};

use crate::error::EncodingError;
use crate::schema::{FieldType, TypeSchema};

/// A single field value of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Address(Address),
    Bool(bool),
    Bytes(Bytes),
    Uint(U256),
    Int(I256),
    /// Also accepted for addresses, hex byte strings and integers.
    String(String),
    Array(Vec<Value>),
    Struct(Message),
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value.into())
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<I256> for Value {
    fn from(value: I256) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Message> for Value {
    fn from(value: Message) -> Self {
        Self::Struct(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<Vec<Message>> for Value {
    fn from(value: Vec<Message>) -> Self {
        Self::Array(value.into_iter().map(Self::Struct).collect())
    }
}

/// Field name -> value. Field order is taken from the schema, not from here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message(BTreeMap<String, Value>);

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validates the message as an instance of `type_name` and lowers it
    /// into the canonical JSON shape consumed by the EIP-712 encoder.
    pub fn to_typed_json(&self, schema: &TypeSchema, type_name: &str) -> Result<Json, EncodingError> {
        encode_struct(schema, type_name, self, type_name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Message {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn encode_struct(
    schema: &TypeSchema,
    type_name: &str,
    message: &Message,
    path: &str,
) -> Result<Json, EncodingError> {
    let fields = schema
        .fields(type_name)
        .ok_or_else(|| EncodingError::UnknownType(type_name.to_string()))?;

    if let Some((extra, _)) = message.iter().find(|(name, _)| !fields.iter().any(|f| f.name == *name)) {
        return Err(EncodingError::UnexpectedField(format!("{path}.{extra}")));
    }

    let mut out = Map::with_capacity(fields.len());
    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        let ty = FieldType::parse(&field.ty).ok_or_else(|| EncodingError::InvalidFieldType {
            path: field_path.clone(),
            ty: field.ty.clone(),
        })?;
        let value = message
            .get(&field.name)
            .ok_or_else(|| EncodingError::MissingField(field_path.clone()))?;
        out.insert(field.name.clone(), encode_value(schema, &ty, &field.ty, value, &field_path)?);
    }
    Ok(Json::Object(out))
}

fn encode_value(
    schema: &TypeSchema,
    ty: &FieldType,
    ty_str: &str,
    value: &Value,
    path: &str,
) -> Result<Json, EncodingError> {
    let mismatch = || EncodingError::TypeMismatch { path: path.to_string(), expected: ty_str.to_string() };

    match (ty, value) {
        (FieldType::Address, Value::Address(addr)) => Ok(Json::String(addr.to_checksum(None))),
        (FieldType::Address, Value::String(s)) => {
            Ok(Json::String(parse_address(s, path)?.to_checksum(None)))
        }
        (FieldType::Bool, Value::Bool(b)) => Ok(Json::Bool(*b)),
        (FieldType::String, Value::String(s)) => Ok(Json::String(s.clone())),
        (FieldType::Bytes, Value::Bytes(bytes)) => Ok(Json::String(hex::encode_prefixed(bytes))),
        (FieldType::Bytes, Value::String(s)) => {
            let bytes = hex::decode(s).map_err(|_| mismatch())?;
            Ok(Json::String(hex::encode_prefixed(bytes)))
        }
        (FieldType::FixedBytes(size), Value::Bytes(bytes)) => {
            if bytes.len() != *size {
                return Err(mismatch());
            }
            Ok(Json::String(hex::encode_prefixed(bytes)))
        }
        (FieldType::FixedBytes(size), Value::String(s)) => {
            let bytes = hex::decode(s).map_err(|_| mismatch())?;
            if bytes.len() != *size {
                return Err(mismatch());
            }
            Ok(Json::String(hex::encode_prefixed(bytes)))
        }
        (FieldType::Uint(bits), Value::Uint(v)) => encode_uint(*v, *bits, ty_str, path),
        (FieldType::Uint(bits), Value::String(s)) => {
            let v = U256::from_str(s.trim()).map_err(|_| mismatch())?;
            encode_uint(v, *bits, ty_str, path)
        }
        (FieldType::Uint(bits), Value::Int(v)) => {
            let v = U256::try_from(*v).map_err(|_| EncodingError::OutOfRange {
                path: path.to_string(),
                ty: ty_str.to_string(),
            })?;
            encode_uint(v, *bits, ty_str, path)
        }
        (FieldType::Int(bits), Value::Int(v)) => encode_int(*v, *bits, ty_str, path),
        (FieldType::Int(bits), Value::Uint(v)) => {
            let v = I256::try_from(*v).map_err(|_| EncodingError::OutOfRange {
                path: path.to_string(),
                ty: ty_str.to_string(),
            })?;
            encode_int(v, *bits, ty_str, path)
        }
        (FieldType::Int(bits), Value::String(s)) => {
            let v = I256::from_str(s.trim()).map_err(|_| mismatch())?;
            encode_int(v, *bits, ty_str, path)
        }
        (FieldType::Array(element, len), Value::Array(items)) => {
            if let Some(expected) = len {
                if items.len() != *expected {
                    return Err(EncodingError::ArrayLength {
                        path: path.to_string(),
                        expected: *expected,
                        actual: items.len(),
                    });
                }
            }
            let element_str = element_type_str(ty_str);
            items
                .iter()
                .enumerate()
                .map(|(i, item)| encode_value(schema, element, element_str, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array)
        }
        (FieldType::Struct(name), Value::Struct(inner)) => encode_struct(schema, name, inner, path),
        _ => Err(mismatch()),
    }
}

fn encode_uint(v: U256, bits: usize, ty: &str, path: &str) -> Result<Json, EncodingError> {
    if v.bit_len() > bits {
        return Err(EncodingError::OutOfRange { path: path.to_string(), ty: ty.to_string() });
    }
    Ok(Json::String(v.to_string()))
}

fn encode_int(v: I256, bits: usize, ty: &str, path: &str) -> Result<Json, EncodingError> {
    let magnitude = v.unsigned_abs();
    let bound = U256::from(1u8) << (bits - 1);
    let fits = if v.is_negative() { magnitude <= bound } else { magnitude < bound };
    if !fits {
        return Err(EncodingError::OutOfRange { path: path.to_string(), ty: ty.to_string() });
    }
    Ok(Json::String(v.to_string()))
}

/// `Person[2][]` -> `Person[2]`
fn element_type_str(ty: &str) -> &str {
    ty.rfind('[').map_or(ty, |open| &ty[..open])
}

/// Mixed-case input must carry a valid EIP-55 checksum; all-lower or
/// all-upper hex is accepted as is.
fn parse_address(s: &str, path: &str) -> Result<Address, EncodingError> {
    let invalid = |reason: String| EncodingError::InvalidAddress { path: path.to_string(), reason };
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(s, None).map_err(|e| invalid(e.to_string()))
    } else {
        Address::from_str(s).map_err(|e| invalid(e.to_string()))
    }
}
