//! # In-Memory Products
//!
//! [`MemProduct`] is a self-contained [`ProductSource`] backed by a node
//! arena. Builder methods append scalar, special, array and record nodes
//! and wire them together by id; [`set_root`](MemProduct::set_root) marks
//! the entry node.
//!
//! ```text
//! nodes: [ attrs(0) | int32(1) | int32(2) | array(3) | record(4) ]
//!                       ^          ^          |           |
//!                       +----------+---elems--+---fields--+  <- root
//! ```
//!
//! Node ids may be shared between parents (a no-data array stores one
//! element id many times). A cursor tracks its own path, so sharing is
//! safe.
//!
//! The arena drives the whole test suite and the benches, and doubles as
//! the reference for format-specific sources: every [`ProductSource`]
//! method has one obvious implementation here.

mod builder;

pub use builder::{field, FieldSpec};

use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::source::ProductSource;
use crate::types::{ArrayOrder, ReadType, SpecialType, TypeClass};
use crate::value::{Shape, Value};

/// Arena index of a node inside one [`MemProduct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

/// Attribute record shared by every node that has no attributes of its
/// own; always arena slot 0.
const EMPTY_ATTRIBUTES: NodeId = NodeId(0);

#[derive(Debug, Clone, Default)]
struct NodeMeta {
    description: Option<String>,
    unit: Option<String>,
    attributes: Option<NodeId>,
}

#[derive(Debug, Clone)]
struct MemNode {
    body: NodeBody,
    meta: NodeMeta,
}

#[derive(Debug, Clone)]
enum NodeBody {
    Record(RecordNode),
    Array(ArrayNode),
    Scalar(Value),
    Special(SpecialNode),
    /// A declared leaf whose value cannot be read from this product.
    Unreadable,
}

#[derive(Debug, Clone, Default)]
struct RecordNode {
    fields: Vec<FieldEntry>,
    by_name: HashMap<String, usize>,
    is_union: bool,
}

#[derive(Debug, Clone)]
struct FieldEntry {
    name: String,
    node: NodeId,
    hidden: bool,
    available: bool,
}

#[derive(Debug, Clone)]
struct ArrayNode {
    /// Raw dimensions; empty for rank-0 arrays, which still store one
    /// element.
    shape: Shape,
    base: BaseKind,
    elems: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
enum BaseKind {
    Native(ReadType),
    Record,
    Array,
    Special(SpecialType),
}

#[derive(Debug, Clone, Copy)]
enum SpecialNode {
    NoData,
    VsfInteger { scale: i32, value: i64 },
    Time(f64),
    Complex(f64, f64),
}

/// In-memory product; see the module docs.
#[derive(Debug, Clone)]
pub struct MemProduct {
    nodes: Vec<MemNode>,
    root: Option<NodeId>,
}

fn schema_error(message: impl Into<String>) -> Error {
    Error::backend(-1, message)
}

fn scalar_read_type(value: &Value) -> ReadType {
    match value {
        Value::Int8(_) => ReadType::Int8,
        Value::Uint8(_) => ReadType::Uint8,
        Value::Int16(_) => ReadType::Int16,
        Value::Uint16(_) => ReadType::Uint16,
        Value::Int32(_) => ReadType::Int32,
        Value::Uint32(_) => ReadType::Uint32,
        Value::Int64(_) => ReadType::Int64,
        Value::Uint64(_) => ReadType::Uint64,
        Value::Float(_) => ReadType::Float,
        Value::Double(_) => ReadType::Double,
        Value::Char(_) => ReadType::Char,
        Value::Text(_) => ReadType::String,
        Value::Bytes(_) => ReadType::Bytes,
        // Builders only store leaf scalars in scalar nodes.
        _ => ReadType::NotAvailable,
    }
}

fn read_type_class(read_type: ReadType) -> TypeClass {
    match read_type {
        ReadType::Int8
        | ReadType::Uint8
        | ReadType::Int16
        | ReadType::Uint16
        | ReadType::Int32
        | ReadType::Uint32
        | ReadType::Int64
        | ReadType::Uint64
        | ReadType::NotAvailable => TypeClass::Integer,
        ReadType::Float | ReadType::Double => TypeClass::Real,
        ReadType::Char | ReadType::String => TypeClass::Text,
        ReadType::Bytes => TypeClass::Raw,
    }
}

fn special_type_of(special: &SpecialNode) -> SpecialType {
    match special {
        SpecialNode::NoData => SpecialType::NoData,
        SpecialNode::VsfInteger { .. } => SpecialType::VsfInteger,
        SpecialNode::Time(_) => SpecialType::Time,
        SpecialNode::Complex(..) => SpecialType::Complex,
    }
}

/// Row-major flat index of each element in column-major visit order
/// (first dimension varying fastest).
fn column_major_flat_order(shape: &[usize]) -> Vec<usize> {
    let count: usize = shape.iter().product();
    let mut order = Vec::with_capacity(count);
    let mut index = vec![0usize; shape.len()];
    for _ in 0..count {
        let mut flat = 0;
        for (d, &size) in shape.iter().enumerate() {
            flat = flat * size + index[d];
        }
        order.push(flat);
        for d in 0..shape.len() {
            index[d] += 1;
            if index[d] < shape[d] {
                break;
            }
            index[d] = 0;
        }
    }
    order
}

impl MemProduct {
    fn node(&self, id: NodeId) -> Result<&MemNode> {
        self.nodes
            .get(id.0 as usize)
            .ok_or_else(|| schema_error("unknown node id"))
    }

    fn record_ref(&self, id: NodeId) -> Result<&RecordNode> {
        match &self.node(id)?.body {
            NodeBody::Record(record) => Ok(record),
            _ => Err(schema_error("node is not a record")),
        }
    }

    fn array_ref(&self, id: NodeId) -> Result<&ArrayNode> {
        match &self.node(id)?.body {
            NodeBody::Array(array) => Ok(array),
            _ => Err(schema_error("node is not an array")),
        }
    }

    fn field_entry(&self, id: NodeId, index: usize) -> Result<&FieldEntry> {
        self.record_ref(id)?
            .fields
            .get(index)
            .ok_or_else(|| schema_error("record field index out of range"))
    }

    /// Element ids of an array node in the requested visit order.
    fn elements_in(&self, id: NodeId, order: ArrayOrder) -> Result<Vec<NodeId>> {
        let array = self.array_ref(id)?;
        match order {
            ArrayOrder::RowMajor => Ok(array.elems.clone()),
            ArrayOrder::ColumnMajor => Ok(column_major_flat_order(&array.shape)
                .into_iter()
                .map(|flat| array.elems[flat])
                .collect()),
        }
    }
}

/// Generates scalar reads that unwrap one `Value` variant.
macro_rules! scalar_reads {
    ($($name:ident : $ty:ty => $variant:ident),* $(,)?) => {
        $(
            ::paste::paste! {
                fn [<read_ $name>](&self, node: NodeId) -> Result<$ty> {
                    match &self.node(node)?.body {
                        NodeBody::Scalar(Value::$variant(v)) => Ok(v.clone()),
                        _ => Err(schema_error(concat!(
                            "node is not readable as ",
                            stringify!($name)
                        ))),
                    }
                }
            }
        )*
    };
}

/// Generates bulk reads that visit every element with the matching scalar
/// read.
macro_rules! array_reads {
    ($($name:ident : $ty:ty),* $(,)?) => {
        $(
            ::paste::paste! {
                fn [<read_ $name _array>](&self, node: NodeId, order: ArrayOrder) -> Result<Vec<$ty>> {
                    self.elements_in(node, order)?
                        .into_iter()
                        .map(|elem| self.[<read_ $name>](elem))
                        .collect()
                }
            }
        )*
    };
}

impl ProductSource for MemProduct {
    type Node = NodeId;

    fn root(&self) -> Result<NodeId> {
        self.root
            .ok_or_else(|| schema_error("product has no root node"))
    }

    fn record_field(&self, node: NodeId, index: usize) -> Result<NodeId> {
        Ok(self.field_entry(node, index)?.node)
    }

    fn array_element(&self, node: NodeId, index: usize) -> Result<NodeId> {
        self.array_ref(node)?
            .elems
            .get(index)
            .copied()
            .ok_or_else(|| schema_error("array element index out of range"))
    }

    fn attributes(&self, node: NodeId) -> Result<NodeId> {
        Ok(self.node(node)?.meta.attributes.unwrap_or(EMPTY_ATTRIBUTES))
    }

    fn type_class(&self, node: NodeId) -> Result<TypeClass> {
        Ok(match &self.node(node)?.body {
            NodeBody::Record(_) => TypeClass::Record,
            NodeBody::Array(_) => TypeClass::Array,
            NodeBody::Scalar(value) => read_type_class(scalar_read_type(value)),
            NodeBody::Special(_) => TypeClass::Special,
            NodeBody::Unreadable => TypeClass::Integer,
        })
    }

    fn read_type(&self, node: NodeId) -> Result<ReadType> {
        match &self.node(node)?.body {
            NodeBody::Scalar(value) => Ok(scalar_read_type(value)),
            NodeBody::Unreadable => Ok(ReadType::NotAvailable),
            _ => Err(schema_error("node has no native read type")),
        }
    }

    fn special_type(&self, node: NodeId) -> Result<SpecialType> {
        match &self.node(node)?.body {
            NodeBody::Special(special) => Ok(special_type_of(special)),
            _ => Err(schema_error("node has no special type")),
        }
    }

    fn array_base_class(&self, node: NodeId) -> Result<TypeClass> {
        Ok(match self.array_ref(node)?.base {
            BaseKind::Native(read_type) => read_type_class(read_type),
            BaseKind::Record => TypeClass::Record,
            BaseKind::Array => TypeClass::Array,
            BaseKind::Special(_) => TypeClass::Special,
        })
    }

    fn array_base_read_type(&self, node: NodeId) -> Result<ReadType> {
        match self.array_ref(node)?.base {
            BaseKind::Native(read_type) => Ok(read_type),
            _ => Err(schema_error("array base type has no native read type")),
        }
    }

    fn array_base_special_type(&self, node: NodeId) -> Result<SpecialType> {
        match self.array_ref(node)?.base {
            BaseKind::Special(special) => Ok(special),
            _ => Err(schema_error("array base type has no special type")),
        }
    }

    fn array_shape(&self, node: NodeId) -> Result<Shape> {
        Ok(self.array_ref(node)?.shape.clone())
    }

    fn num_elements(&self, node: NodeId) -> Result<usize> {
        Ok(match &self.node(node)?.body {
            NodeBody::Record(record) => record.fields.len(),
            NodeBody::Array(array) => array.elems.len(),
            NodeBody::Scalar(_) | NodeBody::Special(_) | NodeBody::Unreadable => 1,
        })
    }

    fn description(&self, node: NodeId) -> Result<String> {
        Ok(self.node(node)?.meta.description.clone().unwrap_or_default())
    }

    fn unit(&self, node: NodeId) -> Result<String> {
        Ok(self.node(node)?.meta.unit.clone().unwrap_or_default())
    }

    fn field_available(&self, node: NodeId, index: usize) -> Result<bool> {
        Ok(self.field_entry(node, index)?.available)
    }

    fn field_hidden(&self, node: NodeId, index: usize) -> Result<bool> {
        Ok(self.field_entry(node, index)?.hidden)
    }

    fn field_name(&self, node: NodeId, index: usize) -> Result<String> {
        Ok(self.field_entry(node, index)?.name.clone())
    }

    fn field_index(&self, node: NodeId, name: &str) -> Result<Option<usize>> {
        Ok(self.record_ref(node)?.by_name.get(name).copied())
    }

    fn is_union(&self, node: NodeId) -> Result<bool> {
        Ok(self.record_ref(node)?.is_union)
    }

    fn available_union_field(&self, node: NodeId) -> Result<usize> {
        let record = self.record_ref(node)?;
        if !record.is_union {
            return Err(schema_error("node is not a union record"));
        }
        record
            .fields
            .iter()
            .position(|f| f.available)
            .ok_or_else(|| schema_error("union record has no available field"))
    }

    scalar_reads! {
        int8: i8 => Int8,
        uint8: u8 => Uint8,
        int16: i16 => Int16,
        uint16: u16 => Uint16,
        int32: i32 => Int32,
        uint32: u32 => Uint32,
        int64: i64 => Int64,
        uint64: u64 => Uint64,
        float: f32 => Float,
        char: char => Char,
        string: String => Text,
        bytes: Vec<u8> => Bytes,
    }

    // Doubles also come from time stamps (already seconds) and scaled
    // variable-scale integers, so this read handles special nodes too.
    fn read_double(&self, node: NodeId) -> Result<f64> {
        match &self.node(node)?.body {
            NodeBody::Scalar(Value::Double(v)) => Ok(*v),
            NodeBody::Special(SpecialNode::Time(t)) => Ok(*t),
            NodeBody::Special(SpecialNode::VsfInteger { scale, value }) => {
                Ok(*value as f64 * 10f64.powi(-scale))
            }
            _ => Err(schema_error("node is not readable as double")),
        }
    }

    fn read_double_pair(&self, node: NodeId) -> Result<(f64, f64)> {
        match &self.node(node)?.body {
            NodeBody::Special(SpecialNode::Complex(re, im)) => Ok((*re, *im)),
            _ => Err(schema_error("node is not readable as a double pair")),
        }
    }

    array_reads! {
        int8: i8,
        uint8: u8,
        int16: i16,
        uint16: u16,
        int32: i32,
        uint32: u32,
        int64: i64,
        uint64: u64,
        float: f32,
        double: f64,
    }

    fn read_double_pairs_array(&self, node: NodeId, order: ArrayOrder) -> Result<Vec<f64>> {
        let elems = self.elements_in(node, order)?;
        let mut out = Vec::with_capacity(elems.len() * 2);
        for elem in elems {
            let (re, im) = self.read_double_pair(elem)?;
            out.push(re);
            out.push(im);
        }
        Ok(out)
    }
}
