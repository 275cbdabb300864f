//! Builders for assembling [`MemProduct`] trees.
//!
//! Builders append nodes and return their [`NodeId`]s; parents are built
//! after their children. Shape and uniqueness mistakes are caught by
//! debug assertions, the same way the value layer checks its own
//! construction.

use hashbrown::HashMap;

use crate::types::{ReadType, SpecialType};
use crate::value::{Shape, Value};

use super::{
    scalar_read_type, special_type_of, ArrayNode, BaseKind, FieldEntry, MemNode, MemProduct,
    NodeBody, NodeId, NodeMeta, RecordNode, SpecialNode,
};

/// Declares a record field holding `node`, available and visible by
/// default.
pub fn field(name: impl Into<String>, node: NodeId) -> FieldSpec {
    FieldSpec {
        name: name.into(),
        node,
        hidden: false,
        available: true,
    }
}

/// One field of a record under construction; see [`field`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(super) name: String,
    pub(super) node: NodeId,
    pub(super) hidden: bool,
    pub(super) available: bool,
}

impl FieldSpec {
    /// Marks the field hidden in the product layout.
    pub fn hidden(mut self) -> FieldSpec {
        self.hidden = true;
        self
    }

    /// Marks the field absent from this particular product.
    pub fn unavailable(mut self) -> FieldSpec {
        self.available = false;
        self
    }
}

/// Generates scalar node builders.
macro_rules! scalar_ctors {
    ($($name:ident : $ty:ty => $variant:ident),* $(,)?) => {
        $(
            #[doc = concat!("Adds a `", stringify!($ty), "` scalar node.")]
            pub fn $name(&mut self, value: $ty) -> NodeId {
                self.push(NodeBody::Scalar(Value::$variant(value)))
            }
        )*
    };
}

/// Generates dense array builders over one scalar type.
macro_rules! dense_array_ctors {
    ($($name:ident : $ty:ty => $variant:ident),* $(,)?) => {
        $(
            ::paste::paste! {
                #[doc = concat!(
                    "Adds a dense `", stringify!($ty),
                    "` array holding `values` in row-major order."
                )]
                pub fn [<$name _array>](&mut self, shape: &[usize], values: Vec<$ty>) -> NodeId {
                    let elems: Vec<NodeId> = values
                        .into_iter()
                        .map(|v| self.push(NodeBody::Scalar(Value::$variant(v))))
                        .collect();
                    self.array_node(shape, BaseKind::Native(ReadType::$variant), elems)
                }
            }
        )*
    };
}

impl MemProduct {
    /// Creates an empty product holding only the shared empty attribute
    /// record.
    pub fn new() -> MemProduct {
        let mut product = MemProduct {
            nodes: Vec::new(),
            root: None,
        };
        product.push(NodeBody::Record(RecordNode::default()));
        product
    }

    /// Marks `node` as the product root.
    pub fn set_root(&mut self, node: NodeId) {
        self.root = Some(node);
    }

    /// Attaches a layout description to `node`.
    pub fn set_description(&mut self, node: NodeId, description: impl Into<String>) {
        self.node_mut(node).meta.description = Some(description.into());
    }

    /// Attaches a unit to `node`.
    pub fn set_unit(&mut self, node: NodeId, unit: impl Into<String>) {
        self.node_mut(node).meta.unit = Some(unit.into());
    }

    /// Uses the record `attributes` as the attribute record of `node`.
    pub fn set_attributes(&mut self, node: NodeId, attributes: NodeId) {
        self.node_mut(node).meta.attributes = Some(attributes);
    }

    scalar_ctors! {
        int8: i8 => Int8,
        uint8: u8 => Uint8,
        int16: i16 => Int16,
        uint16: u16 => Uint16,
        int32: i32 => Int32,
        uint32: u32 => Uint32,
        int64: i64 => Int64,
        uint64: u64 => Uint64,
        float: f32 => Float,
        double: f64 => Double,
        char: char => Char,
    }

    /// Adds a text scalar node.
    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.push(NodeBody::Scalar(Value::Text(value.into())))
    }

    /// Adds a raw-bytes scalar node.
    pub fn bytes(&mut self, value: impl Into<Vec<u8>>) -> NodeId {
        self.push(NodeBody::Scalar(Value::Bytes(value.into())))
    }

    /// Adds a declared leaf whose value cannot be read from this product.
    pub fn unreadable(&mut self) -> NodeId {
        self.push(NodeBody::Unreadable)
    }

    /// Adds a no-data node.
    pub fn no_data(&mut self) -> NodeId {
        self.push(NodeBody::Special(SpecialNode::NoData))
    }

    /// Adds a time node holding seconds since the product epoch.
    pub fn time(&mut self, seconds: f64) -> NodeId {
        self.push(NodeBody::Special(SpecialNode::Time(seconds)))
    }

    /// Adds a variable-scale integer node; it reads as
    /// `value * 10^(-scale)`.
    pub fn vsf_integer(&mut self, scale: i32, value: i64) -> NodeId {
        self.push(NodeBody::Special(SpecialNode::VsfInteger { scale, value }))
    }

    /// Adds a complex node holding interleaved real and imaginary parts.
    pub fn complex(&mut self, re: f64, im: f64) -> NodeId {
        self.push(NodeBody::Special(SpecialNode::Complex(re, im)))
    }

    dense_array_ctors! {
        int8: i8 => Int8,
        uint8: u8 => Uint8,
        int16: i16 => Int16,
        uint16: u16 => Uint16,
        int32: i32 => Int32,
        uint32: u32 => Uint32,
        int64: i64 => Int64,
        uint64: u64 => Uint64,
        float: f32 => Float,
        double: f64 => Double,
    }

    /// Adds a text array with one element per entry of `values`.
    pub fn string_array(&mut self, shape: &[usize], values: &[&str]) -> NodeId {
        let elems: Vec<NodeId> = values.iter().map(|v| self.string(*v)).collect();
        self.array_node(shape, BaseKind::Native(ReadType::String), elems)
    }

    /// Adds a time array holding seconds since the product epoch.
    pub fn time_array(&mut self, shape: &[usize], seconds: Vec<f64>) -> NodeId {
        let elems: Vec<NodeId> = seconds.into_iter().map(|s| self.time(s)).collect();
        self.array_node(shape, BaseKind::Special(SpecialType::Time), elems)
    }

    /// Adds a complex array from `(re, im)` pairs.
    pub fn complex_array(&mut self, shape: &[usize], values: &[(f64, f64)]) -> NodeId {
        let elems: Vec<NodeId> = values.iter().map(|&(re, im)| self.complex(re, im)).collect();
        self.array_node(shape, BaseKind::Special(SpecialType::Complex), elems)
    }

    /// Adds a no-data array; every element is the same no-data node.
    pub fn no_data_array(&mut self, shape: &[usize]) -> NodeId {
        let gap = self.no_data();
        let count = shape.iter().product();
        self.array_node(
            shape,
            BaseKind::Special(SpecialType::NoData),
            vec![gap; count],
        )
    }

    /// Adds an array over existing element nodes. The base kind is derived
    /// from the first element, so the array must not be empty; dense
    /// builders cover empty arrays of a known base.
    pub fn array(&mut self, shape: &[usize], elements: &[NodeId]) -> NodeId {
        debug_assert!(
            !elements.is_empty(),
            "the base kind comes from the first element"
        );
        let base = self.base_kind_of(elements[0]);
        self.array_node(shape, base, elements.to_vec())
    }

    /// Adds a rank-0 array holding `element`: it reports no dimensions but
    /// stores one element.
    pub fn rank0_array(&mut self, element: NodeId) -> NodeId {
        let base = self.base_kind_of(element);
        self.push(NodeBody::Array(ArrayNode {
            shape: Shape::new(),
            base,
            elems: vec![element],
        }))
    }

    /// Adds a record from field declarations, in order.
    pub fn record(&mut self, fields: &[FieldSpec]) -> NodeId {
        self.record_node(fields, false)
    }

    /// Adds a union record; exactly one field must be available.
    pub fn union(&mut self, fields: &[FieldSpec]) -> NodeId {
        self.record_node(fields, true)
    }

    fn record_node(&mut self, fields: &[FieldSpec], is_union: bool) -> NodeId {
        debug_assert!(
            !is_union || fields.iter().filter(|f| f.available).count() == 1,
            "a union holds exactly one available field"
        );
        let mut entries = Vec::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());
        for (index, spec) in fields.iter().enumerate() {
            let previous = by_name.insert(spec.name.clone(), index);
            debug_assert!(previous.is_none(), "duplicate record field name");
            entries.push(FieldEntry {
                name: spec.name.clone(),
                node: spec.node,
                hidden: spec.hidden,
                available: spec.available,
            });
        }
        self.push(NodeBody::Record(RecordNode {
            fields: entries,
            by_name,
            is_union,
        }))
    }

    fn array_node(&mut self, shape: &[usize], base: BaseKind, elems: Vec<NodeId>) -> NodeId {
        debug_assert_eq!(
            shape.iter().product::<usize>(),
            elems.len(),
            "shape does not cover the element count"
        );
        self.push(NodeBody::Array(ArrayNode {
            shape: Shape::from_slice(shape),
            base,
            elems,
        }))
    }

    fn base_kind_of(&self, node: NodeId) -> BaseKind {
        match &self.nodes[node.0 as usize].body {
            NodeBody::Record(_) => BaseKind::Record,
            NodeBody::Array(_) => BaseKind::Array,
            NodeBody::Scalar(value) => BaseKind::Native(scalar_read_type(value)),
            NodeBody::Special(special) => BaseKind::Special(special_type_of(special)),
            NodeBody::Unreadable => BaseKind::Native(ReadType::NotAvailable),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut MemNode {
        &mut self.nodes[id.0 as usize]
    }

    fn push(&mut self, body: NodeBody) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MemNode {
            body,
            meta: NodeMeta::default(),
        });
        id
    }
}

impl Default for MemProduct {
    fn default() -> MemProduct {
        MemProduct::new()
    }
}
