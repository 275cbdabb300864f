//! Path traversal over a product tree.
//!
//! A path is applied to a [`Cursor`] one step at a time: field steps move
//! into records, index steps move into array elements. Traversal stops
//! early when an index step holds a `-1` wildcard, reporting which step it
//! stopped at so the caller can gather the remaining elements instead.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::path::{PathStep, WILDCARD};
use crate::source::ProductSource;

/// Where a traversal ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Traversal {
    /// Every step was applied; the cursor points at the addressed node.
    Complete,
    /// Traversal stopped at `path[path_index]`, an index step holding at
    /// least one wildcard. The cursor points at the array itself, and the
    /// step has already been validated against the array's shape.
    Wildcard { path_index: usize },
}

/// Applies `path[start..]` to the cursor.
///
/// Field steps require a record under the cursor and move to the named
/// field. Index steps require an array, must match its rank (rank-0
/// arrays count as one-dimensional with a single element) and move to the
/// addressed element. Every concrete index in a step is bounds-checked
/// before any wildcard in the same step takes effect, so an out-of-range
/// index fails even when it sits next to a `-1`.
pub(crate) fn traverse_path<S>(
    cursor: &mut Cursor<'_, S>,
    path: &[PathStep],
    start: usize,
) -> Result<Traversal>
where
    S: ProductSource + ?Sized,
{
    for path_index in start..path.len() {
        match &path[path_index] {
            PathStep::Field(name) => cursor.goto_record_field(name)?,
            PathStep::Index(index) => {
                if apply_index_step(cursor, std::slice::from_ref(index))? {
                    return Ok(Traversal::Wildcard { path_index });
                }
            }
            PathStep::Indices(indices) => {
                if apply_index_step(cursor, indices)? {
                    return Ok(Traversal::Wildcard { path_index });
                }
            }
        }
    }
    Ok(Traversal::Complete)
}

/// Validates an index step against the array under the cursor and moves to
/// the addressed element. Returns `true` without moving when the step
/// holds a wildcard.
fn apply_index_step<S>(cursor: &mut Cursor<'_, S>, indices: &[i64]) -> Result<bool>
where
    S: ProductSource + ?Sized,
{
    let shape = cursor.shape_normalized()?;
    if indices.len() != shape.len() {
        return Err(Error::DimensionMismatch {
            given: indices.len(),
            rank: shape.len(),
        });
    }
    let mut has_wildcard = false;
    for (&index, &size) in indices.iter().zip(shape.iter()) {
        if index == WILDCARD {
            has_wildcard = true;
        } else if index < 0 || index as usize >= size {
            return Err(Error::IndexOutOfRange {
                index,
                size: size as i64,
            });
        }
    }
    if !has_wildcard {
        cursor.goto_array_element(indices)?;
    }
    Ok(has_wildcard)
}
