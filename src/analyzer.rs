// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::shape::{Shape, CIRCULAR, MAX_DEPTH};
use crate::value::Value;

use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use indexmap::IndexMap;

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_ARRAY_LIMIT: usize = 20;

/// Bounds for one analysis call. Immutable for the duration of the call.
#[derive(Debug, Clone)]
pub struct ShapeOptions {
    /// Nesting level at which composites collapse to `"[Max Depth]"`.
    pub max_depth: usize,
    /// Largest element count for which an array is expanded slot by slot
    /// rather than summarized to a tag union.
    pub array_limit: usize,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        ShapeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            array_limit: DEFAULT_ARRAY_LIMIT,
        }
    }
}

/// Compute the silhouette of `value`: a finite summary tree, even when the
/// input graph is cyclic or unbounded.
///
/// Total over all values; the input is never mutated. The visited set lives
/// for exactly this call, so repeated calls are independent.
pub fn silhouette(value: &Value, options: &ShapeOptions) -> Shape {
    let mut visited = HashSet::new();
    walk(value, 0, options.max_depth, options.array_limit, &mut visited)
}

fn walk(
    value: &Value,
    depth: usize,
    max_depth: usize,
    array_limit: usize,
    visited: &mut HashSet<usize>,
) -> Shape {
    let kind = value.kind();
    if let Some(label) = kind.terminal_label() {
        return Shape::label(label);
    }
    if let Value::Function(name) = value {
        return match name {
            Some(n) => Shape::label(format!("Function({n})")),
            None => Shape::label("Function"),
        };
    }

    // Everything past this point is a composite. Record it before looking
    // inside so a back-edge anywhere below resolves to the sentinel. Entries
    // are never removed: a shared non-cyclic value also reports its second
    // occurrence as circular, the set is scoped to the whole call tree.
    if let Some(id) = value.identity() {
        if !visited.insert(id) {
            return Shape::label(CIRCULAR);
        }
    }

    // Uniform for every composite kind; a Date or Map sitting at the bound
    // collapses too instead of producing its normal label.
    if depth >= max_depth {
        return Shape::label(MAX_DEPTH);
    }

    match value {
        Value::Buffer(b) => Shape::label(format!("{} [Length: {}]", b.kind_name(), b.len())),
        Value::Array(slots) => walk_array(&slots.borrow(), depth, max_depth, array_limit, visited),
        Value::Object(fields) => {
            let fields = fields.borrow();
            let mut result = IndexMap::with_capacity(fields.len());
            for (key, v) in fields.iter() {
                result.insert(
                    key.clone(),
                    walk(v, depth + 1, max_depth, array_limit, visited),
                );
            }
            Shape::Object(result)
        }
        Value::Map(entries) => Shape::label(format!("Map [Size: {}]", entries.borrow().len())),
        Value::Set(elems) => Shape::label(format!("Set [Size: {}]", elems.borrow().len())),
        Value::Date(_) => Shape::label("Date"),
        Value::Regex(_) => Shape::label("RegExp"),
        _ => Shape::label("Object"),
    }
}

fn walk_array(
    slots: &[Option<Value>],
    depth: usize,
    max_depth: usize,
    array_limit: usize,
    visited: &mut HashSet<usize>,
) -> Shape {
    if slots.is_empty() {
        return Shape::label("Array [0]");
    }

    if slots.len() <= array_limit {
        let mut shapes = Vec::with_capacity(slots.len());
        for slot in slots {
            // Holes are not walked; the slot stays shapeless.
            shapes.push(
                slot.as_ref()
                    .map(|v| walk(v, depth + 1, max_depth, array_limit, visited)),
            );
        }
        return Shape::Array(shapes);
    }

    // Over the limit: still walk every element exactly once so cycle and
    // depth bookkeeping happen, then keep only a coarse tag per element.
    let mut tags: BTreeSet<Rc<str>> = BTreeSet::new();
    for slot in slots {
        let tag: Rc<str> = match slot {
            // element iteration reads a hole as the absent value
            None => "undefined".into(),
            Some(v) => match walk(v, depth + 1, max_depth, array_limit, visited) {
                Shape::Label(l) => l,
                Shape::Array(_) => "Array".into(),
                Shape::Object(_) => "Object".into(),
            },
        };
        tags.insert(tag);
    }
    let union = tags.iter().map(|t| t.as_ref()).collect::<Vec<_>>().join(" | ");
    Shape::label(format!("Array<{union}> [Length: {}]", slots.len()))
}
