//! # Error Taxonomy
//!
//! Every fallible operation in this crate returns [`Error`]. The variants
//! form a closed, matchable set: callers branch on the failure kind rather
//! than parsing messages.
//!
//! Failures are fail-fast and non-recoverable at this layer. A failing
//! fetch never returns a partial result; any record built so far for a
//! failed subtree is discarded. The one condition handled internally is
//! record field non-availability, which is a silent skip, never an error.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for path traversal, subtree fetch, and field queries.
#[derive(Error, Debug)]
pub enum Error {
    /// A named record field does not exist in the schema at the current
    /// cursor position.
    #[error("record field '{name}' not found")]
    NotFound { name: String },

    /// An index-list path step has a different length than the rank of the
    /// array it is applied to.
    #[error("number of specified indices ({given}) does not match the dimensionality of the array ({rank})")]
    DimensionMismatch { given: usize, rank: usize },

    /// A concrete (non-wildcard) array index is negative or past the end of
    /// its dimension.
    #[error("array index ({index}) exceeds array range [0:{size})")]
    IndexOutOfRange { index: i64, size: i64 },

    /// A path is structurally unusable for the operation it was passed to,
    /// e.g. a field-availability query whose last step is not a field name.
    #[error("invalid path specification: {0}")]
    InvalidPathSpecification(String),

    /// A wildcard (`-1`) index appeared in a path given to an entry point
    /// that requires a fully concrete path.
    #[error("variable (-1) array indices are only allowed when calling fetch()")]
    WildcardNotAllowed,

    /// The node has a type combination the fetch engine cannot read.
    #[error("cannot fetch value ({0})")]
    Fetch(String),

    /// A failure surfaced by the underlying product source, opaque to this
    /// layer beyond a numeric code and a message.
    #[error("backend error {code}: {message}")]
    Backend { code: i32, message: String },
}

impl Error {
    /// Shorthand for a [`Error::Fetch`] with the given condition text.
    pub(crate) fn fetch(msg: impl Into<String>) -> Self {
        Error::Fetch(msg.into())
    }

    /// Shorthand for a [`Error::Backend`] failure.
    pub fn backend(code: i32, message: impl Into<String>) -> Self {
        Error::Backend {
            code,
            message: message.into(),
        }
    }
}
