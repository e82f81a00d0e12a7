// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::number::Number;

use core::any::Any;
use core::fmt;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use regex::Regex;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

/// A fixed-width numeric buffer view. Element kinds are closed; the generic
/// raw-byte view with field accessors has no counterpart here.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Buffer {
    pub fn len(&self) -> usize {
        match self {
            Buffer::F32(v) => v.len(),
            Buffer::F64(v) => v.len(),
            Buffer::I8(v) => v.len(),
            Buffer::I16(v) => v.len(),
            Buffer::I32(v) => v.len(),
            Buffer::U8(v) => v.len(),
            Buffer::U16(v) => v.len(),
            Buffer::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label stem used when summarizing the buffer.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Buffer::F32(_) => "Float32Array",
            Buffer::F64(_) => "Float64Array",
            Buffer::I8(_) => "Int8Array",
            Buffer::I16(_) => "Int16Array",
            Buffer::I32(_) => "Int32Array",
            Buffer::U8(_) => "Uint8Array",
            Buffer::U16(_) => "Uint16Array",
            Buffer::U32(_) => "Uint32Array",
        }
    }
}

/// Closed classification tag for a [`Value`], computed once per value by
/// [`Value::kind`]. The analyzer dispatches on this rather than on an ordered
/// chain of type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Undefined,
    Null,
    Bool,
    Number,
    BigInt,
    String,
    Symbol,
    Function,
    Buffer,
    Array,
    Object,
    Map,
    Set,
    Date,
    Regex,
    Opaque,
}

impl Kind {
    /// Fixed label for primitive kinds. `None` for callables and composites,
    /// whose summaries depend on the value.
    pub fn terminal_label(self) -> Option<&'static str> {
        match self {
            Kind::Undefined => Some("undefined"),
            Kind::Null => Some("null"),
            Kind::Bool => Some("boolean"),
            Kind::Number => Some("number"),
            Kind::BigInt => Some("bigint"),
            Kind::String => Some("string"),
            Kind::Symbol => Some("symbol"),
            _ => None,
        }
    }

    pub fn is_composite(self) -> bool {
        self.terminal_label().is_none() && self != Kind::Function
    }
}

// We cannot use serde_json::Value because the analyzer must survive shared
// references and true cycles, which require interior mutability, and because
// buffers, dates, maps, sets etc. are distinct kinds with their own
// summaries. Composites hold Rc cells; Clone is shallow and shares the cell,
// so cloning a value into one of its own slots builds a cycle.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    BigInt(Rc<BigInt>),
    String(Rc<str>),
    /// A unique symbol with an optional description.
    Symbol(Option<Rc<str>>),
    /// A callable with an optional declared name.
    Function(Option<Rc<str>>),

    Buffer(Rc<Buffer>),
    /// Ordered sequence. `None` slots are holes: present positions that were
    /// never assigned a value.
    Array(Rc<RefCell<Vec<Option<Value>>>>),
    /// Generic keyed record, insertion-ordered, string keys only.
    Object(Rc<RefCell<IndexMap<Rc<str>, Value>>>),
    /// Map-like container. Keys are arbitrary values compared with `==`.
    Map(Rc<RefCell<Vec<(Value, Value)>>>),
    /// Set-like container, deduplicated with `==`.
    Set(Rc<RefCell<Vec<Value>>>),
    Date(Rc<DateTime<Utc>>),
    Regex(Rc<Regex>),
    /// A host value of no recognized kind.
    Opaque(Rc<dyn Any>),
}

impl Value {
    pub fn new_array() -> Value {
        Value::Array(Rc::new(RefCell::new(vec![])))
    }

    /// An array of `len` holes. Slots can then be populated with
    /// [`Value::set`]; unpopulated slots stay holes.
    pub fn array_with_holes(len: usize) -> Value {
        Value::Array(Rc::new(RefCell::new(vec![None; len])))
    }

    pub fn new_object() -> Value {
        Value::Object(Rc::new(RefCell::new(IndexMap::new())))
    }

    pub fn new_map() -> Value {
        Value::Map(Rc::new(RefCell::new(vec![])))
    }

    pub fn new_set() -> Value {
        Value::Set(Rc::new(RefCell::new(vec![])))
    }

    pub fn function(name: &str) -> Value {
        Value::Function(Some(name.into()))
    }

    pub fn anonymous_function() -> Value {
        Value::Function(None)
    }

    pub fn symbol(description: Option<&str>) -> Value {
        Value::Symbol(description.map(Rc::from))
    }

    pub fn opaque(host_value: impl Any) -> Value {
        Value::Opaque(Rc::new(host_value))
    }

    pub fn from_json_str(json: &str) -> Result<Value> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<Value> {
        Ok(Value::deserialize(json)?)
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Value> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(c) => Self::from_json_str(c.as_str()),
            Err(e) => bail!("Failed to read {}. {e}", path.display()),
        }
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Value> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl Value {
    /// The classification tag of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::BigInt(_) => Kind::BigInt,
            Value::String(_) => Kind::String,
            Value::Symbol(_) => Kind::Symbol,
            Value::Function(_) => Kind::Function,
            Value::Buffer(_) => Kind::Buffer,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
            Value::Map(_) => Kind::Map,
            Value::Set(_) => Kind::Set,
            Value::Date(_) => Kind::Date,
            Value::Regex(_) => Kind::Regex,
            Value::Opaque(_) => Kind::Opaque,
        }
    }

    /// Reference identity of a composite value: the address of its shared
    /// allocation. Primitives and callables have no identity.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Buffer(b) => Some(Rc::as_ptr(b) as usize),
            Value::Array(a) => Some(Rc::as_ptr(a) as usize),
            Value::Object(o) => Some(Rc::as_ptr(o) as usize),
            Value::Map(m) => Some(Rc::as_ptr(m) as usize),
            Value::Set(s) => Some(Rc::as_ptr(s) as usize),
            Value::Date(d) => Some(Rc::as_ptr(d) as usize),
            Value::Regex(r) => Some(Rc::as_ptr(r) as usize),
            Value::Opaque(v) => Some(Rc::as_ptr(v) as *const () as usize),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(anyhow!("not a bool")),
        }
    }

    pub fn as_number(&self) -> Result<&Number> {
        match self {
            Value::Number(n) => Ok(n),
            _ => Err(anyhow!("not a number")),
        }
    }

    pub fn as_string(&self) -> Result<&Rc<str>> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(anyhow!("not a string")),
        }
    }

    pub fn as_bigint(&self) -> Result<&BigInt> {
        match self {
            Value::BigInt(b) => Ok(b),
            _ => Err(anyhow!("not a bigint")),
        }
    }

    pub fn as_buffer(&self) -> Result<&Buffer> {
        match self {
            Value::Buffer(b) => Ok(b),
            _ => Err(anyhow!("not a buffer")),
        }
    }

    pub fn as_array(&self) -> Result<Ref<'_, Vec<Option<Value>>>> {
        match self {
            Value::Array(a) => Ok(a.borrow()),
            _ => Err(anyhow!("not an array")),
        }
    }

    pub fn as_object(&self) -> Result<Ref<'_, IndexMap<Rc<str>, Value>>> {
        match self {
            Value::Object(o) => Ok(o.borrow()),
            _ => Err(anyhow!("not an object")),
        }
    }

    pub fn as_map(&self) -> Result<Ref<'_, Vec<(Value, Value)>>> {
        match self {
            Value::Map(m) => Ok(m.borrow()),
            _ => Err(anyhow!("not a map")),
        }
    }

    pub fn as_set(&self) -> Result<Ref<'_, Vec<Value>>> {
        match self {
            Value::Set(s) => Ok(s.borrow()),
            _ => Err(anyhow!("not a set")),
        }
    }

    pub fn as_date(&self) -> Result<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Ok(d),
            _ => Err(anyhow!("not a date")),
        }
    }

    pub fn as_regex(&self) -> Result<&Regex> {
        match self {
            Value::Regex(r) => Ok(r),
            _ => Err(anyhow!("not a regex")),
        }
    }

    /// Append an element to an array.
    pub fn push(&self, value: Value) -> Result<()> {
        match self {
            Value::Array(a) => {
                a.borrow_mut().push(Some(value));
                Ok(())
            }
            _ => bail!("not an array"),
        }
    }

    /// Populate an existing array slot (a hole or a prior value).
    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        match self {
            Value::Array(a) => {
                let mut slots = a.borrow_mut();
                match slots.get_mut(index) {
                    Some(slot) => {
                        *slot = Some(value);
                        Ok(())
                    }
                    None => bail!("index {index} out of bounds"),
                }
            }
            _ => bail!("not an array"),
        }
    }

    /// Insert a key into an object. Re-inserting an existing key replaces
    /// its value and keeps the original position.
    pub fn insert(&self, key: impl Into<Rc<str>>, value: Value) -> Result<()> {
        match self {
            Value::Object(o) => {
                o.borrow_mut().insert(key.into(), value);
                Ok(())
            }
            _ => bail!("not an object"),
        }
    }

    /// Insert an entry into a map, replacing the value of an `==` key.
    pub fn map_insert(&self, key: Value, value: Value) -> Result<()> {
        match self {
            Value::Map(m) => {
                let mut entries = m.borrow_mut();
                if let Some(entry) = entries.iter_mut().find(|(k, _)| k == &key) {
                    entry.1 = value;
                } else {
                    entries.push((key, value));
                }
                Ok(())
            }
            _ => bail!("not a map"),
        }
    }

    /// Add an element to a set; `==` duplicates are ignored.
    pub fn add(&self, value: Value) -> Result<()> {
        match self {
            Value::Set(s) => {
                let mut elems = s.borrow_mut();
                if !elems.iter().any(|e| e == &value) {
                    elems.push(value);
                }
                Ok(())
            }
            _ => bail!("not a set"),
        }
    }
}

/// Primitives compare by value; composites compare by reference identity.
/// This keeps equality total on cyclic graphs.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Buffer(a), Value::Buffer(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b),
            (Value::Date(a), Value::Date(b)) => Rc::ptr_eq(a, b),
            (Value::Regex(a), Value::Regex(b)) => Rc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// Shallow on purpose: values can be cyclic.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::BigInt(b) => write!(f, "{b}n"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(Some(d)) => write!(f, "Symbol({d})"),
            Value::Symbol(None) => f.write_str("Symbol"),
            Value::Function(Some(n)) => write!(f, "Function({n})"),
            Value::Function(None) => f.write_str("Function"),
            Value::Buffer(b) => write!(f, "{} [Length: {}]", b.kind_name(), b.len()),
            Value::Array(a) => write!(f, "Array [{}]", a.borrow().len()),
            Value::Object(o) => write!(f, "Object [Keys: {}]", o.borrow().len()),
            Value::Map(m) => write!(f, "Map [Size: {}]", m.borrow().len()),
            Value::Set(s) => write!(f, "Set [Size: {}]", s.borrow().len()),
            Value::Date(d) => write!(f, "Date({d})"),
            Value::Regex(r) => write!(f, "RegExp(/{}/)", r.as_str()),
            Value::Opaque(_) => f.write_str("Opaque"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<u128> for Value {
    fn from(n: u128) -> Self {
        match u64::try_from(n) {
            Ok(v) => Value::Number(Number::from(v)),
            Err(_) => Value::BigInt(Rc::new(BigInt::from(n))),
        }
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        match i64::try_from(n) {
            Ok(v) => Value::Number(Number::from(v)),
            Err(_) => Value::BigInt(Rc::new(BigInt::from(n))),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<BigInt> for Value {
    fn from(b: BigInt) -> Self {
        Value::BigInt(Rc::new(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(elems: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elems.into_iter().map(Some).collect())))
    }
}

impl From<Vec<Option<Value>>> for Value {
    fn from(slots: Vec<Option<Value>>) -> Self {
        Value::Array(Rc::new(RefCell::new(slots)))
    }
}

impl From<IndexMap<Rc<str>, Value>> for Value {
    fn from(fields: IndexMap<Rc<str>, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(fields)))
    }
}

impl From<Buffer> for Value {
    fn from(b: Buffer) -> Self {
        Value::Buffer(Rc::new(b))
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Value::from(Buffer::F32(v))
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::from(Buffer::F64(v))
    }
}

impl From<Vec<i8>> for Value {
    fn from(v: Vec<i8>) -> Self {
        Value::from(Buffer::I8(v))
    }
}

impl From<Vec<i16>> for Value {
    fn from(v: Vec<i16>) -> Self {
        Value::from(Buffer::I16(v))
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::from(Buffer::I32(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::from(Buffer::U8(v))
    }
}

impl From<Vec<u16>> for Value {
    fn from(v: Vec<u16>) -> Self {
        Value::from(Buffer::U16(v))
    }
}

impl From<Vec<u32>> for Value {
    fn from(v: Vec<u32>) -> Self {
        Value::from(Buffer::U32(v))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(Rc::new(d))
    }
}

impl From<Regex> for Value {
    fn from(r: Regex) -> Self {
        Value::Regex(Rc::new(r))
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bool(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(v))
    }

    fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(v))
    }

    fn visit_i128<E>(self, v: i128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(v))
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(s.into()))
    }

    fn visit_string<E>(self, s: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(s.into()))
    }

    fn visit_seq<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut slots = vec![];
        while let Some(v) = visitor.next_element()? {
            slots.push(Some(v));
        }
        Ok(Value::from(slots))
    }

    fn visit_map<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut fields = IndexMap::new();
        while let Some((key, value)) = visitor.next_entry::<String, Value>()? {
            fields.insert(Rc::from(key), value);
        }
        Ok(Value::from(fields))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}
