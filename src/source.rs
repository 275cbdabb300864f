//! # Product Source Trait
//!
//! [`ProductSource`] is the seam between the fetch engine and whatever
//! actually stores a product. The engine never touches bytes: it navigates
//! node handles, asks type questions, and requests primitive reads, all
//! through this trait. The in-memory backend in [`crate::mem`] is the
//! reference implementation; file-format backends sit behind the same
//! surface.
//!
//! ## Division of labor
//!
//! The source resolves *children*: field `i` of a record node, flat element
//! `n` of an array node, the attribute record of any node. Everything
//! stack-shaped (parent, root, depth, current position) is owned by
//! [`Cursor`](crate::Cursor), which keeps its own frame stack and never
//! asks the source to walk upward.
//!
//! ## Read methods
//!
//! Scalar and bulk-array readers have default implementations that fail
//! with a backend error, so a source only implements the readers its
//! format can actually contain. Dispatch guarantees a reader is only
//! invoked for a node whose read type matches it.
//!
//! All operations return `Result`; any failure propagates unchanged
//! through the fetch engine to the caller.

use crate::error::{Error, Result};
use crate::types::{ArrayOrder, ReadType, SpecialType, TypeClass};
use crate::value::Shape;

fn unsupported<T>(what: &str) -> Result<T> {
    Err(Error::fetch(format!(
        "{what} read not supported by this product source"
    )))
}

/// Backend capability trait over one product's schema-and-data tree.
///
/// Nodes are small copyable handles whose meaning is private to the
/// backend. A handle stays valid for the lifetime of the source borrow.
pub trait ProductSource {
    /// Positional handle into the product tree.
    type Node: Copy + PartialEq + std::fmt::Debug;

    /// The product's root node.
    fn root(&self) -> Result<Self::Node>;

    // ---- child resolution ----

    /// Field `index` of a record node.
    fn record_field(&self, node: Self::Node, index: usize) -> Result<Self::Node>;

    /// Element at flat row-major position `index` of an array node.
    fn array_element(&self, node: Self::Node, index: usize) -> Result<Self::Node>;

    /// The node's attribute record (an empty record when there are none).
    fn attributes(&self, node: Self::Node) -> Result<Self::Node>;

    // ---- type queries ----

    /// Top-level type classification of a node.
    fn type_class(&self, node: Self::Node) -> Result<TypeClass>;

    /// Concrete primitive read type of a native node.
    fn read_type(&self, node: Self::Node) -> Result<ReadType>;

    /// Decode rule of a special node.
    fn special_type(&self, node: Self::Node) -> Result<SpecialType>;

    /// Type class of an array node's element type.
    fn array_base_class(&self, node: Self::Node) -> Result<TypeClass>;

    /// Read type of an array node's native element type.
    fn array_base_read_type(&self, node: Self::Node) -> Result<ReadType>;

    /// Special type of an array node's special element type.
    fn array_base_special_type(&self, node: Self::Node) -> Result<SpecialType>;

    /// Dimension sizes of an array node. May be empty (rank 0); callers
    /// normalize to `[1]` before shape arithmetic.
    fn array_shape(&self, node: Self::Node) -> Result<Shape>;

    /// Element count: fields of a record, flat element product of an array.
    fn num_elements(&self, node: Self::Node) -> Result<usize>;

    /// Schema description text for a node, empty if the schema has none.
    fn description(&self, node: Self::Node) -> Result<String>;

    /// Unit text for a node, empty if the schema has none.
    fn unit(&self, node: Self::Node) -> Result<String>;

    // ---- record field metadata ----

    /// Dynamic availability of field `index` of a record node.
    fn field_available(&self, node: Self::Node, index: usize) -> Result<bool>;

    /// Schema hidden flag of field `index` of a record node.
    fn field_hidden(&self, node: Self::Node, index: usize) -> Result<bool>;

    /// Name of field `index` of a record node.
    fn field_name(&self, node: Self::Node, index: usize) -> Result<String>;

    /// Index of the field named `name`, or `None` when the record's schema
    /// has no such field.
    fn field_index(&self, node: Self::Node, name: &str) -> Result<Option<usize>>;

    /// True when the record node is a union (exactly one field available).
    fn is_union(&self, node: Self::Node) -> Result<bool>;

    /// Index of the single available field of a union record node.
    fn available_union_field(&self, node: Self::Node) -> Result<usize>;

    // ---- scalar reads ----

    fn read_int8(&self, _node: Self::Node) -> Result<i8> {
        unsupported("int8")
    }

    fn read_uint8(&self, _node: Self::Node) -> Result<u8> {
        unsupported("uint8")
    }

    fn read_int16(&self, _node: Self::Node) -> Result<i16> {
        unsupported("int16")
    }

    fn read_uint16(&self, _node: Self::Node) -> Result<u16> {
        unsupported("uint16")
    }

    fn read_int32(&self, _node: Self::Node) -> Result<i32> {
        unsupported("int32")
    }

    fn read_uint32(&self, _node: Self::Node) -> Result<u32> {
        unsupported("uint32")
    }

    fn read_int64(&self, _node: Self::Node) -> Result<i64> {
        unsupported("int64")
    }

    fn read_uint64(&self, _node: Self::Node) -> Result<u64> {
        unsupported("uint64")
    }

    fn read_float(&self, _node: Self::Node) -> Result<f32> {
        unsupported("float")
    }

    /// Also the decode path for time and scaled-integer special nodes.
    fn read_double(&self, _node: Self::Node) -> Result<f64> {
        unsupported("double")
    }

    fn read_char(&self, _node: Self::Node) -> Result<char> {
        unsupported("char")
    }

    fn read_string(&self, _node: Self::Node) -> Result<String> {
        unsupported("string")
    }

    fn read_bytes(&self, _node: Self::Node) -> Result<Vec<u8>> {
        unsupported("bytes")
    }

    /// Real/imaginary pair of a complex special node.
    fn read_double_pair(&self, _node: Self::Node) -> Result<(f64, f64)> {
        unsupported("complex pair")
    }

    // ---- bulk array reads (on the array node itself) ----

    fn read_int8_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<i8>> {
        unsupported("int8 array")
    }

    fn read_uint8_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<u8>> {
        unsupported("uint8 array")
    }

    fn read_int16_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<i16>> {
        unsupported("int16 array")
    }

    fn read_uint16_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<u16>> {
        unsupported("uint16 array")
    }

    fn read_int32_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<i32>> {
        unsupported("int32 array")
    }

    fn read_uint32_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<u32>> {
        unsupported("uint32 array")
    }

    fn read_int64_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<i64>> {
        unsupported("int64 array")
    }

    fn read_uint64_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<u64>> {
        unsupported("uint64 array")
    }

    fn read_float_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<f32>> {
        unsupported("float array")
    }

    /// Also the decode path for arrays of time and scaled-integer nodes.
    fn read_double_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<f64>> {
        unsupported("double array")
    }

    /// Interleaved real/imaginary pairs of a complex element array; the
    /// returned buffer holds `2 * num_elements` doubles.
    fn read_double_pairs_array(&self, _node: Self::Node, _order: ArrayOrder) -> Result<Vec<f64>> {
        unsupported("complex pair array")
    }
}
