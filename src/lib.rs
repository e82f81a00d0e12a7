// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compact, bounded, lossy structural summaries ("silhouettes") of runtime
//! values.
//!
//! A silhouette describes what a value looks like without serializing its
//! content: primitives become fixed labels, records map each key to the
//! silhouette of its value, short arrays expand slot by slot, long arrays
//! collapse to a union of element tags, and numeric buffers report only
//! their element kind and length. Recursion is bounded by a depth limit and
//! by reference-cycle detection, so the result is always a finite tree even
//! for cyclic inputs.
//!
//! ```ignore
//! use silhouette::{silhouette, ShapeOptions, Value};
//!
//! let output = Value::new_object();
//! output.insert("predictions", Value::from(vec![0.1f32; 1000]))?;
//! output.insert("confidence", Value::from(0.95))?;
//!
//! let shape = silhouette(&output, &ShapeOptions::default());
//! // {"predictions":"Float32Array [Length: 1000]","confidence":"number"}
//! println!("{shape}");
//! ```

mod analyzer;
mod number;
mod shape;
mod value;

pub use analyzer::{silhouette, ShapeOptions, DEFAULT_ARRAY_LIMIT, DEFAULT_MAX_DEPTH};
pub use number::{BigInt, Number};
pub use shape::{Shape, CIRCULAR, MAX_DEPTH};
pub use value::{Buffer, Kind, Value};
