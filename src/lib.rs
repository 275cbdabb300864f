//! # Canopy - Hierarchical Product Traversal
//!
//! Canopy fetches values out of hierarchical scientific product files
//! through paths, without exposing how a product lays its tree out. This
//! implementation prioritizes:
//!
//! - **One-pass reads**: subtrees materialize in a single walk, arrays of
//!   fixed-width scalars in a single bulk read
//! - **Stride-based gathering**: `-1` wildcards enumerate elements with a
//!   precomputed stride table instead of restarting the walk
//! - **Source-agnostic traversal**: products implement [`ProductSource`];
//!   cursors, paths and fetches never change per format
//!
//! ## Quick Start
//!
//! ```
//! use canopy::mem::{field, MemProduct};
//! use canopy::{fetch, path, Value};
//!
//! let mut product = MemProduct::new();
//! let name = product.string("GOME_O3");
//! let lat = product.double_array(&[3], vec![54.1, 54.2, 54.3]);
//! let root = product.record(&[field("name", name), field("latitude", lat)]);
//! product.set_root(root);
//!
//! // Address one value...
//! let value = fetch(&product, &path!["latitude", 1])?;
//! assert_eq!(value, Value::Double(54.2));
//!
//! // ...or gather a dimension with the -1 wildcard.
//! let all = fetch(&product, &path!["latitude", -1])?;
//! assert_eq!(all.as_array().unwrap().len(), 3);
//! # Ok::<(), canopy::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Entry points (fetch, get_size, ...)     │
//! ├─────────────────────────────────────────┤
//! │  Traversal │ Wildcard gather │ Subtree   │
//! ├─────────────────────────────────────────┤
//! │         Cursor (path + position)         │
//! ├─────────────────────────────────────────┤
//! │   ProductSource (per-format backends)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Every fetch traverses its path on a [`Cursor`]; paths that address one
//! node materialize the subtree below it, paths with wildcards gather one
//! result per selected element. Results come back as [`Value`]s: scalars,
//! shaped arrays ([`value::NdArray`]) and ordered records
//! ([`value::Record`]).
//!
//! ## Module Overview
//!
//! - [`fetch`]: entry points, traversal, subtree and gather engines
//! - [`cursor`]: positional handle over one product
//! - [`source`]: the [`ProductSource`] trait format backends implement
//! - [`path`]: path steps and the [`path!`] literal macro
//! - [`value`]: fetched values, arrays and records
//! - [`types`]: type classes, read types and special types
//! - [`mem`]: in-memory products for tests, benches and examples

pub mod cursor;
pub mod error;
pub mod fetch;
pub mod mem;
pub mod path;
pub mod source;
pub mod types;
pub mod value;

pub use cursor::{Cursor, MAX_NESTING_DEPTH};
pub use error::{Error, Result};
pub use fetch::{
    fetch, get_attributes, get_description, get_field_available, get_field_count, get_field_names,
    get_size, get_unit, FetchOptions, Fetcher, IntoCursor,
};
pub use path::{IndexVec, PathStep, WILDCARD};
pub use source::ProductSource;
pub use types::{ArrayOrder, ReadType, ScalarKind, SpecialType, TypeClass};
pub use value::{ArrayData, Complex64, ElementKind, NdArray, Record, Shape, Value};
