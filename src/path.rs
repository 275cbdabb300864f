//! # Path Descriptions
//!
//! A fetch target is addressed by a sequence of [`PathStep`]s: record field
//! names, single array indices, and per-dimension index lists. The sentinel
//! index [`WILDCARD`] (`-1`) selects every element along its dimension and
//! switches the engine into gathering mode from that step onward.
//!
//! Steps convert from plain Rust literals, so paths are usually written
//! with the [`path!`](crate::path!) macro:
//!
//! ```ignore
//! use canopy::path;
//!
//! let p = path!["measurements", [-1, 3], "temperature"];
//! let all = path!["spectra", .., "intensity"]; // `..` is the wildcard
//! ```

use smallvec::SmallVec;

/// Array index sentinel selecting all elements of a dimension.
pub const WILDCARD: i64 = -1;

/// Inline storage for one step's per-dimension indices. Product arrays
/// rarely exceed a handful of dimensions.
pub type IndexVec = SmallVec<[i64; 8]>;

/// One step of a path description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Selects a record field by name.
    Field(String),
    /// Selects one element of a rank-1 array, or all of them if [`WILDCARD`].
    Index(i64),
    /// Selects an element (or slice, where [`WILDCARD`] appears) of a
    /// multi-dimensional array; one entry per dimension.
    Indices(IndexVec),
}

impl From<&str> for PathStep {
    fn from(name: &str) -> Self {
        PathStep::Field(name.to_owned())
    }
}

impl From<String> for PathStep {
    fn from(name: String) -> Self {
        PathStep::Field(name)
    }
}

impl From<i64> for PathStep {
    fn from(index: i64) -> Self {
        PathStep::Index(index)
    }
}

impl From<i32> for PathStep {
    fn from(index: i32) -> Self {
        PathStep::Index(index as i64)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index as i64)
    }
}

/// `..` selects every element of a rank-1 array, like an index of `-1`.
impl From<std::ops::RangeFull> for PathStep {
    fn from(_: std::ops::RangeFull) -> Self {
        PathStep::Index(WILDCARD)
    }
}

impl<const N: usize> From<[i64; N]> for PathStep {
    fn from(indices: [i64; N]) -> Self {
        PathStep::Indices(IndexVec::from_slice(&indices))
    }
}

impl<const N: usize> From<[i32; N]> for PathStep {
    fn from(indices: [i32; N]) -> Self {
        PathStep::Indices(indices.iter().map(|&i| i as i64).collect())
    }
}

impl From<&[i64]> for PathStep {
    fn from(indices: &[i64]) -> Self {
        PathStep::Indices(IndexVec::from_slice(indices))
    }
}

impl From<Vec<i64>> for PathStep {
    fn from(indices: Vec<i64>) -> Self {
        PathStep::Indices(IndexVec::from_vec(indices))
    }
}

/// Builds a `Vec<PathStep>` from mixed step literals.
///
/// Accepts anything `PathStep` converts from: string slices, integers,
/// fixed-size integer arrays, and `..` for a rank-1 wildcard.
#[macro_export]
macro_rules! path {
    () => {
        ::std::vec::Vec::<$crate::PathStep>::new()
    };
    ($($step:expr),+ $(,)?) => {
        ::std::vec![$($crate::PathStep::from($step)),+]
    };
}
