//! Wildcard gathering over intermediate arrays.
//!
//! When traversal stops at an index step holding `-1` wildcards, the rest
//! of the path is fetched once per addressed element and the results are
//! collected into one array. The selected elements are visited in flat
//! storage order with a precomputed stride table, skipping unselected
//! elements with sibling moves rather than restarting from the first
//! element each time.
//!
//! For a step `[2, -1, -1]` over a `4 x 3 x 2` array the fixed leading
//! index contributes a constant flat offset of 12 and the two wildcards
//! enumerate flat elements 12 through 17 into a `3 x 2` result.

use smallvec::{smallvec, SmallVec};
use tracing::trace;

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::fetch::subtree::fetch_subtree;
use crate::fetch::traverse::{traverse_path, Traversal};
use crate::fetch::FetchOptions;
use crate::path::{PathStep, WILDCARD};
use crate::source::ProductSource;
use crate::types::TypeClass;
use crate::value::{ArrayData, ElementKind, NdArray, Value};

/// Fetches every element selected by the wildcarded step `path[path_index]`
/// of the array under the cursor, applying `path[path_index + 1..]` below
/// each element. Nested wildcards recurse, so each result element may
/// itself be a gathered array.
///
/// The step has already been validated against the array's shape by
/// traversal.
pub(crate) fn fetch_intermediate_array<S>(
    cursor: &mut Cursor<'_, S>,
    path: &[PathStep],
    path_index: usize,
    options: &FetchOptions,
) -> Result<Value>
where
    S: ProductSource + ?Sized,
{
    let shape = cursor.shape_normalized()?;

    // Stride table over the gathered dimensions, innermost first.
    let mut fetch_shape: SmallVec<[usize; 8]> = SmallVec::new();
    let mut fetch_step: SmallVec<[usize; 8]> = SmallVec::new();
    let mut next_element_index = 0usize;
    let mut element_count = 1usize;

    match &path[path_index] {
        PathStep::Index(index) => {
            debug_assert_eq!(*index, WILDCARD, "plain-integer gather steps must be -1");
            fetch_shape.push(shape[0]);
            fetch_step.push(1);
            element_count = shape[0];
        }
        PathStep::Indices(indices) => {
            let mut step = 1usize;
            for i in (0..indices.len()).rev() {
                if indices[i] == WILDCARD {
                    fetch_shape.push(shape[i]);
                    fetch_step.push(step);
                    element_count *= shape[i];
                } else {
                    next_element_index += indices[i] as usize * step;
                }
                step *= shape[i];
            }
        }
        PathStep::Field(_) => {
            return Err(Error::fetch("cannot gather over a record field step"))
        }
    }

    if element_count == 0 {
        return Ok(Value::Empty);
    }

    trace!(
        "gathering {} elements, dims {:?}, strides {:?}, first offset {}",
        element_count,
        fetch_shape,
        fetch_step,
        next_element_index
    );

    let mut fetch_index: SmallVec<[usize; 8]> = smallvec![0; fetch_shape.len()];
    let mut data: Option<ArrayData> = None;
    let mut current_element_index = 0usize;

    cursor.goto_first_array_element()?;
    for _ in 0..element_count {
        // Skip ahead to the next selected element.
        while current_element_index < next_element_index {
            cursor.goto_next_array_element()?;
            current_element_index += 1;
        }

        let depth = cursor.depth();
        let outcome = traverse_path(cursor, path, path_index + 1)?;

        // The first element fixes the result's element kind.
        if data.is_none() {
            let kind = element_kind_under(cursor)?;
            data = Some(ArrayData::with_capacity(kind, element_count));
        }

        let value = match outcome {
            Traversal::Complete => fetch_subtree(cursor, options)?,
            Traversal::Wildcard { path_index: next } => {
                fetch_intermediate_array(cursor, path, next, options)?
            }
        };
        if let Some(data) = data.as_mut() {
            data.push_value(value)?;
        }

        // Ripple-carry to the flat index of the next selected element. A
        // wrapping dimension has contributed `fetch_shape[j] * fetch_step[j]`
        // by now; taking that back resets its digit without touching the
        // offsets of fixed dimensions.
        for j in 0..fetch_shape.len() {
            fetch_index[j] += 1;
            next_element_index += fetch_step[j];
            if fetch_index[j] < fetch_shape[j] {
                break;
            }
            fetch_index[j] = 0;
            next_element_index -= fetch_shape[j] * fetch_step[j];
        }

        cursor.pop_levels(cursor.depth() - depth)?;
    }
    cursor.goto_parent()?;

    let mut result_shape = fetch_shape;
    result_shape.reverse();
    match data {
        Some(data) => Ok(Value::Array(NdArray::new(result_shape, data))),
        None => Err(Error::fetch("gather selected no elements")),
    }
}

/// Result element kind for the node under the cursor, per the read-type
/// and special-type maps.
fn element_kind_under<S>(cursor: &Cursor<'_, S>) -> Result<ElementKind>
where
    S: ProductSource + ?Sized,
{
    match cursor.type_class()? {
        TypeClass::Record | TypeClass::Array => Ok(ElementKind::Object),
        TypeClass::Integer | TypeClass::Real | TypeClass::Text | TypeClass::Raw => {
            match ElementKind::for_read_type(cursor.read_type()?) {
                Some(kind) => Ok(kind),
                None => Err(Error::fetch(
                    "cannot read array (not all elements are available)",
                )),
            }
        }
        TypeClass::Special => Ok(ElementKind::for_special(cursor.special_type()?)),
    }
}
