//! Serde integration.
//!
//! This module provides [`JsonValueSerializer`], which converts any Rust
//! data structure implementing `Serialize` into a materialized
//! [`JsonValue`] tree, ready for encoding.
//!
//! ## Usage
//!
//! Most users should use [`crate::to_value`]:
//!
//! ```rust
//! use async_json::{to_value, JsonValue};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 1, y: 2 }).unwrap();
//! assert!(value.is_object());
//! ```
//!
//! Materialized values also implement `Serialize` themselves, so a
//! [`JsonValue`] tree can be handed to any serde serializer. Values that
//! carry live asynchronous sources cannot round-trip through serde and
//! fail with a descriptive error instead.

use crate::error::{Error, Result};
use crate::value::{JsonValue, Number};
use serde::{ser, Serialize};

/// A serde serializer whose output is a [`JsonValue`] tree.
pub struct JsonValueSerializer;

pub struct SerializeVec {
    vec: Vec<JsonValue>,
}

pub struct SerializeEntries {
    entries: Vec<(JsonValue, JsonValue)>,
    current_key: Option<JsonValue>,
}

/// Wraps a variant's content as `{"variant": content}`.
pub struct SerializeVariant {
    variant: &'static str,
    inner: SerializeVec,
}

pub struct SerializeStructVariantEntries {
    variant: &'static str,
    inner: SerializeEntries,
}

impl ser::Serializer for JsonValueSerializer {
    type Ok = JsonValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVariant;
    type SerializeMap = SerializeEntries;
    type SerializeStruct = SerializeEntries;
    type SerializeStructVariant = SerializeStructVariantEntries;

    fn serialize_bool(self, v: bool) -> Result<JsonValue> {
        Ok(JsonValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Int(v as i64)))
    }

    fn serialize_i16(self, v: i16) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Int(v as i64)))
    }

    fn serialize_i32(self, v: i32) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Int(v as i64)))
    }

    fn serialize_i64(self, v: i64) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Int(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Int(v as i64)))
    }

    fn serialize_u16(self, v: u16) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Int(v as i64)))
    }

    fn serialize_u32(self, v: u32) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Int(v as i64)))
    }

    fn serialize_u64(self, v: u64) -> Result<JsonValue> {
        // Values past i64::MAX stay exact as big integers.
        Ok(JsonValue::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Float(v as f64)))
    }

    fn serialize_f64(self, v: f64) -> Result<JsonValue> {
        Ok(JsonValue::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<JsonValue> {
        Ok(JsonValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<JsonValue> {
        Ok(JsonValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<JsonValue> {
        let vec = v
            .iter()
            .map(|&b| JsonValue::Number(Number::Int(b as i64)))
            .collect();
        Ok(JsonValue::Array(vec))
    }

    fn serialize_none(self) -> Result<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<JsonValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<JsonValue> {
        Ok(JsonValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<JsonValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<JsonValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(wrap_variant(variant, value.serialize(JsonValueSerializer)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(Some(len)))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeVec::new(Some(len)),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeEntries> {
        Ok(SerializeEntries::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeEntries> {
        Ok(SerializeEntries::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariantEntries> {
        Ok(SerializeStructVariantEntries {
            variant,
            inner: SerializeEntries::new(),
        })
    }
}

fn wrap_variant(variant: &'static str, content: JsonValue) -> JsonValue {
    JsonValue::Object(vec![(JsonValue::String(variant.to_string()), content)])
}

impl SerializeVec {
    fn new(len: Option<usize>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        }
    }
}

impl SerializeEntries {
    fn new() -> Self {
        SerializeEntries {
            entries: Vec::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(JsonValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(JsonValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Array(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(JsonValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Array(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVariant {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.vec.push(value.serialize(JsonValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(wrap_variant(self.variant, JsonValue::Array(self.inner.vec)))
    }
}

impl ser::SerializeMap for SerializeEntries {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = key.serialize(JsonValueSerializer)?;
        // Container keys would never encode; reject them here where the
        // offending map is still identifiable.
        if key.is_array() || key.is_object() {
            return Err(Error::KeyNotEncodable(key.type_name().to_string()));
        }
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.entries.push((key, value.serialize(JsonValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Object(self.entries))
    }
}

impl ser::SerializeStruct for SerializeEntries {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.entries.push((
            JsonValue::String(key.to_string()),
            value.serialize(JsonValueSerializer)?,
        ));
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Object(self.entries))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariantEntries {
    type Ok = JsonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.entries.push((
            JsonValue::String(key.to_string()),
            value.serialize(JsonValueSerializer)?,
        ));
        Ok(())
    }

    fn end(self) -> Result<JsonValue> {
        Ok(wrap_variant(
            self.variant,
            JsonValue::Object(self.inner.entries),
        ))
    }
}

impl Serialize for JsonValue {
    /// Serializes a materialized tree through any serde serializer.
    ///
    /// Asynchronous sources cannot be driven from a synchronous serde call
    /// and fail with a custom error; encode those with
    /// [`crate::fragment_stream`] instead.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        use serde::ser::{Error as _, SerializeMap, SerializeSeq};
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Number(Number::Int(i)) => serializer.serialize_i64(*i),
            JsonValue::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            JsonValue::Number(Number::BigInt(b)) => {
                match i64::try_from(b.clone()) {
                    Ok(i) => serializer.serialize_i64(i),
                    Err(_) => serializer.serialize_str(&b.to_string()),
                }
            }
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonValue::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            JsonValue::Stream(_) | JsonValue::Entries(_) | JsonValue::Deferred(_) => Err(
                S::Error::custom("cannot serialize a live asynchronous value"),
            ),
            JsonValue::Opaque(opaque) => Err(S::Error::custom(format!(
                "cannot serialize opaque value of type {}",
                opaque.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn to_value<T: Serialize>(value: &T) -> Result<JsonValue> {
        value.serialize(JsonValueSerializer)
    }

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn struct_becomes_object_in_field_order() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        let entries = value.as_entries().unwrap();
        assert_eq!(entries[0].0.as_str(), Some("x"));
        assert_eq!(entries[0].1.as_i64(), Some(1));
        assert_eq!(entries[1].0.as_str(), Some("y"));
    }

    #[test]
    fn large_u64_survives_exactly() {
        let value = to_value(&u64::MAX).unwrap();
        match value {
            JsonValue::Number(Number::BigInt(b)) => {
                assert_eq!(b.to_string(), u64::MAX.to_string());
            }
            other => panic!("expected big integer, got {other:?}"),
        }
    }

    #[test]
    fn enum_variants_follow_external_tagging() {
        #[derive(Serialize)]
        enum Shape {
            Point,
            Circle(f64),
            Rect { w: f64, h: f64 },
        }

        assert_eq!(to_value(&Shape::Point).unwrap().as_str(), Some("Point"));

        let circle = to_value(&Shape::Circle(1.0)).unwrap();
        let entries = circle.as_entries().unwrap();
        assert_eq!(entries[0].0.as_str(), Some("Circle"));
        assert_eq!(entries[0].1.as_f64(), Some(1.0));

        let rect = to_value(&Shape::Rect { w: 2.0, h: 3.0 }).unwrap();
        let entries = rect.as_entries().unwrap();
        assert_eq!(entries[0].0.as_str(), Some("Rect"));
        assert!(entries[0].1.is_object());
    }

    #[test]
    fn map_with_integer_keys_is_accepted() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(1, "one");
        map.insert(2, "two");
        let value = to_value(&map).unwrap();
        let entries = value.as_entries().unwrap();
        assert_eq!(entries[0].0.as_i64(), Some(1));
    }

    #[test]
    fn container_map_keys_are_rejected() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(vec![1, 2], "pair");
        let error = to_value(&map).unwrap_err();
        assert!(matches!(error, Error::KeyNotEncodable(_)));
    }

    #[test]
    fn live_sources_refuse_serde_serialization() {
        let value = JsonValue::stream(futures::stream::iter(vec![JsonValue::Null]));
        assert!(serde_json::to_string(&value).is_err());
    }
}
