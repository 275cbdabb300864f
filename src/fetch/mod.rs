//! Fetch entry points.
//!
//! Every call follows the same two-phase plan:
//!
//! ```text
//!                 path
//!                   |
//!             traverse_path
//!             /           \
//!        Complete        Wildcard
//!           |                |
//!     fetch_subtree   fetch_intermediate_array
//!           |                |
//!         Value         Value::Array
//! ```
//!
//! [`fetch`] is the only entry point that accepts wildcarded paths; the
//! inspection calls ([`get_size`], [`get_field_names`], ...) address one
//! node and reject wildcards. All of them start from anything that
//! implements [`IntoCursor`]: a product source (the walk starts at the
//! root) or an existing [`Cursor`] (the walk starts at its position,
//! leaving the original untouched).
//!
//! [`Fetcher`] carries per-call [`FetchOptions`]; the free functions cover
//! the default of hidden fields filtered out.

mod gather;
mod subtree;
mod traverse;

use tracing::debug;

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::path::PathStep;
use crate::source::ProductSource;
use crate::value::Value;

use gather::fetch_intermediate_array;
use subtree::fetch_subtree;
use traverse::{traverse_path, Traversal};

/// Per-call fetch behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// When set, record fields marked hidden by the product layout are
    /// left out of fetched records, field counts and field names.
    /// Unavailable fields are skipped regardless.
    pub filter_hidden: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            filter_hidden: true,
        }
    }
}

impl FetchOptions {
    pub fn new() -> FetchOptions {
        FetchOptions::default()
    }

    /// Keeps hidden record fields in fetched records, field counts and
    /// field names.
    pub fn with_hidden_fields(mut self) -> FetchOptions {
        self.filter_hidden = false;
        self
    }

    /// Whether field `index` of the record under the cursor makes it into
    /// results under these options.
    pub(crate) fn retains_field<S>(&self, cursor: &Cursor<'_, S>, index: usize) -> Result<bool>
    where
        S: ProductSource + ?Sized,
    {
        if !cursor.field_available(index)? {
            return Ok(false);
        }
        if self.filter_hidden && cursor.field_hidden(index)? {
            return Ok(false);
        }
        Ok(true)
    }
}

/// A starting point for a fetch call.
///
/// Implemented by `&S` for any [`ProductSource`] (the call starts at the
/// product root) and by `&Cursor` (the call starts at the cursor's
/// position on a private clone, so the caller's cursor never moves).
pub trait IntoCursor<'a, S: ProductSource + ?Sized> {
    fn into_cursor(self) -> Result<Cursor<'a, S>>;
}

impl<'a, S: ProductSource + ?Sized> IntoCursor<'a, S> for &'a S {
    fn into_cursor(self) -> Result<Cursor<'a, S>> {
        Cursor::new(self)
    }
}

impl<'a, S: ProductSource + ?Sized> IntoCursor<'a, S> for &Cursor<'a, S> {
    fn into_cursor(self) -> Result<Cursor<'a, S>> {
        Ok(self.clone())
    }
}

/// Fetch entry points bound to a set of [`FetchOptions`].
///
/// A `Fetcher` holds no product state and is cheap to copy; every call
/// takes the product (or a positioned cursor) as its first argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fetcher {
    options: FetchOptions,
}

impl Fetcher {
    pub fn new() -> Fetcher {
        Fetcher::default()
    }

    pub fn with_options(options: FetchOptions) -> Fetcher {
        Fetcher { options }
    }

    pub fn options(&self) -> FetchOptions {
        self.options
    }

    /// Fetches the value addressed by `path`.
    ///
    /// Index steps may hold `-1` wildcards; every combination of the
    /// wildcarded dimensions is fetched and the combinations come back as
    /// one array, outermost wildcard first.
    pub fn fetch<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<Value>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        let mut cursor = start.into_cursor()?;
        debug!("fetch {:?}", path);
        match traverse_path(&mut cursor, path, 0)? {
            Traversal::Complete => fetch_subtree(&mut cursor, &self.options),
            Traversal::Wildcard { path_index } => {
                fetch_intermediate_array(&mut cursor, path, path_index, &self.options)
            }
        }
    }

    /// Fetches the attribute record of the node addressed by `path`.
    pub fn get_attributes<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<Value>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        let mut cursor = self.cursor_at(start, path)?;
        cursor.goto_attributes()?;
        fetch_subtree(&mut cursor, &self.options)
    }

    /// Returns the layout description of the node addressed by `path`,
    /// empty when the layout carries none.
    pub fn get_description<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<String>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        self.cursor_at(start, path)?.description()
    }

    /// Returns the unit of the node addressed by `path`, empty when the
    /// layout carries none.
    pub fn get_unit<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<String>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        self.cursor_at(start, path)?.unit()
    }

    /// Reports whether the record field named by the last path step is
    /// available in this product. The step before last addresses the
    /// record; availability is answered without moving into the field, so
    /// it works for fields that cannot be fetched.
    pub fn get_field_available<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<bool>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        let Some((PathStep::Field(name), parent)) = path.split_last() else {
            return Err(Error::InvalidPathSpecification(
                "path argument should not be empty and should end with name of a record field"
                    .into(),
            ));
        };
        let cursor = self.cursor_at(start, parent)?;
        match cursor.field_index(name)? {
            Some(index) => cursor.field_available(index),
            None => Err(Error::NotFound { name: name.clone() }),
        }
    }

    /// Counts the fields of the record addressed by `path`, honoring
    /// availability and the hidden-field option.
    pub fn get_field_count<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<usize>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        let cursor = self.cursor_at(start, path)?;
        let mut count = 0;
        for index in 0..cursor.num_elements()? {
            if self.options.retains_field(&cursor, index)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Lists the field names of the record addressed by `path`, in field
    /// order, honoring availability and the hidden-field option.
    pub fn get_field_names<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<Vec<String>>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        let cursor = self.cursor_at(start, path)?;
        let mut names = Vec::new();
        for index in 0..cursor.num_elements()? {
            if self.options.retains_field(&cursor, index)? {
                names.push(cursor.field_name(index)?);
            }
        }
        Ok(names)
    }

    /// Returns the dimensions of the array addressed by `path`. Rank-0
    /// arrays report `[1]`.
    pub fn get_size<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<Vec<usize>>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        Ok(self.cursor_at(start, path)?.shape_normalized()?.into_vec())
    }

    /// Positions a cursor on the single node `path` addresses. Wildcards
    /// select many nodes and are rejected here.
    fn cursor_at<'a, S, T>(&self, start: T, path: &[PathStep]) -> Result<Cursor<'a, S>>
    where
        S: ProductSource + ?Sized + 'a,
        T: IntoCursor<'a, S>,
    {
        let mut cursor = start.into_cursor()?;
        match traverse_path(&mut cursor, path, 0)? {
            Traversal::Complete => Ok(cursor),
            Traversal::Wildcard { .. } => Err(Error::WildcardNotAllowed),
        }
    }
}

impl<'a, S: ProductSource + ?Sized> Cursor<'a, S> {
    /// Fetches `path` relative to this cursor with default options. The
    /// cursor itself does not move.
    pub fn fetch(&self, path: &[PathStep]) -> Result<Value> {
        Fetcher::new().fetch(self, path)
    }
}

/// Fetches the value addressed by `path` with default options.
/// See [`Fetcher::fetch`].
pub fn fetch<'a, S, T>(start: T, path: &[PathStep]) -> Result<Value>
where
    S: ProductSource + ?Sized + 'a,
    T: IntoCursor<'a, S>,
{
    Fetcher::new().fetch(start, path)
}

/// Fetches the attribute record of the node addressed by `path`.
/// See [`Fetcher::get_attributes`].
pub fn get_attributes<'a, S, T>(start: T, path: &[PathStep]) -> Result<Value>
where
    S: ProductSource + ?Sized + 'a,
    T: IntoCursor<'a, S>,
{
    Fetcher::new().get_attributes(start, path)
}

/// Returns the layout description of the node addressed by `path`.
/// See [`Fetcher::get_description`].
pub fn get_description<'a, S, T>(start: T, path: &[PathStep]) -> Result<String>
where
    S: ProductSource + ?Sized + 'a,
    T: IntoCursor<'a, S>,
{
    Fetcher::new().get_description(start, path)
}

/// Returns the unit of the node addressed by `path`.
/// See [`Fetcher::get_unit`].
pub fn get_unit<'a, S, T>(start: T, path: &[PathStep]) -> Result<String>
where
    S: ProductSource + ?Sized + 'a,
    T: IntoCursor<'a, S>,
{
    Fetcher::new().get_unit(start, path)
}

/// Reports whether the record field named by the last path step is
/// available. See [`Fetcher::get_field_available`].
pub fn get_field_available<'a, S, T>(start: T, path: &[PathStep]) -> Result<bool>
where
    S: ProductSource + ?Sized + 'a,
    T: IntoCursor<'a, S>,
{
    Fetcher::new().get_field_available(start, path)
}

/// Counts the fields of the record addressed by `path`.
/// See [`Fetcher::get_field_count`].
pub fn get_field_count<'a, S, T>(start: T, path: &[PathStep]) -> Result<usize>
where
    S: ProductSource + ?Sized + 'a,
    T: IntoCursor<'a, S>,
{
    Fetcher::new().get_field_count(start, path)
}

/// Lists the field names of the record addressed by `path`.
/// See [`Fetcher::get_field_names`].
pub fn get_field_names<'a, S, T>(start: T, path: &[PathStep]) -> Result<Vec<String>>
where
    S: ProductSource + ?Sized + 'a,
    T: IntoCursor<'a, S>,
{
    Fetcher::new().get_field_names(start, path)
}

/// Returns the dimensions of the array addressed by `path`.
/// See [`Fetcher::get_size`].
pub fn get_size<'a, S, T>(start: T, path: &[PathStep]) -> Result<Vec<usize>>
where
    S: ProductSource + ?Sized + 'a,
    T: IntoCursor<'a, S>,
{
    Fetcher::new().get_size(start, path)
}
