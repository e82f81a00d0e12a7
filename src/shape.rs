// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;

/// Sentinel label for a composite already entered during the current call.
pub const CIRCULAR: &str = "[Circular]";

/// Sentinel label for a composite at the depth bound.
pub const MAX_DEPTH: &str = "[Max Depth]";

/// A bounded structural summary of a value: a terminal label, an ordered
/// sequence of slot summaries, or an insertion-ordered record of summaries.
///
/// A `None` slot in a sequence is a hole carried over from the input: the
/// position exists but holds no shape. It renders as JSON `null` and is
/// distinct from the label `"undefined"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Label(Rc<str>),
    Array(Vec<Option<Shape>>),
    Object(IndexMap<Rc<str>, Shape>),
}

impl Shape {
    pub fn label(label: impl Into<Rc<str>>) -> Shape {
        Shape::Label(label.into())
    }

    pub fn as_label(&self) -> Result<&str> {
        match self {
            Shape::Label(l) => Ok(l),
            _ => Err(anyhow!("not a label")),
        }
    }

    pub fn as_array(&self) -> Result<&Vec<Option<Shape>>> {
        match self {
            Shape::Array(slots) => Ok(slots),
            _ => Err(anyhow!("not an array shape")),
        }
    }

    pub fn as_object(&self) -> Result<&IndexMap<Rc<str>, Shape>> {
        match self {
            Shape::Object(fields) => Ok(fields),
            _ => Err(anyhow!("not an object shape")),
        }
    }

    pub fn to_json_str(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Shape::Label(l) => serializer.serialize_str(l),
            Shape::Array(slots) => {
                let mut seq = serializer.serialize_seq(Some(slots.len()))?;
                for slot in slots.iter() {
                    // holes render as null
                    seq.serialize_element(slot)?;
                }
                seq.end()
            }
            Shape::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields.iter() {
                    map.serialize_entry(k.as_ref(), v)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{s}"),
            Err(_e) => Err(std::fmt::Error),
        }
    }
}

impl From<&str> for Shape {
    fn from(label: &str) -> Self {
        Shape::label(label)
    }
}

impl From<Vec<Shape>> for Shape {
    fn from(shapes: Vec<Shape>) -> Self {
        Shape::Array(shapes.into_iter().map(Some).collect())
    }
}

impl From<IndexMap<Rc<str>, Shape>> for Shape {
    fn from(fields: IndexMap<Rc<str>, Shape>) -> Self {
        Shape::Object(fields)
    }
}
