//! # Product Cursor
//!
//! [`Cursor`] is a navigable positional handle over one product: a borrow
//! of the [`ProductSource`] plus a frame stack recording the path from the
//! root to the current node. Every navigation mutates the cursor in place;
//! cloning a cursor is cheap (the stack is inline up to
//! [`MAX_NESTING_DEPTH`] frames) and gives an independent position.
//!
//! The stack also answers the questions the source cannot: parent and root
//! moves are pops, depth is the stack length, and sibling moves
//! (next-field, next-element) use the ordinal each frame remembers about
//! its position inside the parent.
//!
//! ```text
//! stack: [ root(ord 0) | field 2 (ord 2) | element 17 (ord 17) ]
//!                                          ^ current node, depth 2
//! ```
//!
//! A cursor is single-threaded by contract: one fetch call owns one cursor
//! for its whole recursion. Concurrent fetches over the same product each
//! clone their own.

use smallvec::{smallvec, SmallVec};

use crate::error::{Error, Result};
use crate::source::ProductSource;
use crate::types::{ArrayOrder, ReadType, SpecialType, TypeClass};
use crate::value::Shape;

/// Inline frame capacity; product schemas rarely nest deeper than this,
/// and the stack spills to the heap when one does.
pub const MAX_NESTING_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy)]
struct Frame<N> {
    node: N,
    /// Flat child position of `node` within its parent: field index for
    /// record children, row-major element index for array children. Zero
    /// for the root and for attribute records.
    ordinal: usize,
}

type FrameStack<N> = SmallVec<[Frame<N>; MAX_NESTING_DEPTH]>;

/// Positional handle into a product's schema-and-data tree.
pub struct Cursor<'a, S: ProductSource + ?Sized> {
    source: &'a S,
    stack: FrameStack<S::Node>,
}

impl<'a, S: ProductSource + ?Sized> Clone for Cursor<'a, S> {
    fn clone(&self) -> Self {
        Cursor {
            source: self.source,
            stack: self.stack.clone(),
        }
    }
}

/// Generates scalar read delegates for the node under the cursor.
macro_rules! scalar_read_delegates {
    ($($name:ident : $ty:ty),* $(,)?) => {
        $(
            ::paste::paste! {
                #[doc = concat!("Reads the current node as `", stringify!($ty), "`.")]
                #[inline]
                pub fn [<read_ $name>](&self) -> Result<$ty> {
                    self.source.[<read_ $name>](self.node())
                }
            }
        )*
    };
}

/// Generates dense bulk read delegates for the array node under the cursor.
macro_rules! array_read_delegates {
    ($($name:ident : $ty:ty),* $(,)?) => {
        $(
            ::paste::paste! {
                #[doc = concat!("Bulk-reads the current array node into a `Vec<", stringify!($ty), ">`.")]
                #[inline]
                pub fn [<read_ $name _array>](&self, order: ArrayOrder) -> Result<Vec<$ty>> {
                    self.source.[<read_ $name _array>](self.node(), order)
                }
            }
        )*
    };
}

impl<'a, S: ProductSource + ?Sized> Cursor<'a, S> {
    /// Creates a cursor at the product root.
    pub fn new(source: &'a S) -> Result<Cursor<'a, S>> {
        let root = source.root()?;
        Ok(Cursor {
            source,
            stack: smallvec![Frame {
                node: root,
                ordinal: 0,
            }],
        })
    }

    /// The source this cursor reads through.
    pub fn source(&self) -> &'a S {
        self.source
    }

    /// The node the cursor currently points at.
    pub fn node(&self) -> S::Node {
        // The stack is never empty: construction pushes the root and pops
        // stop above it.
        self.stack[self.stack.len() - 1].node
    }

    /// Distance from the root; the root itself is depth 0.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn parent_node(&self) -> Result<S::Node> {
        if self.stack.len() < 2 {
            return Err(Error::fetch("cursor is at the product root"));
        }
        Ok(self.stack[self.stack.len() - 2].node)
    }

    fn push(&mut self, node: S::Node, ordinal: usize) {
        self.stack.push(Frame { node, ordinal });
    }

    fn replace_top(&mut self, node: S::Node, ordinal: usize) {
        let top = self.stack.len() - 1;
        self.stack[top] = Frame { node, ordinal };
    }

    // ---- navigation ----

    /// Moves back to the product root, discarding the current path.
    pub fn goto_root(&mut self) {
        self.stack.truncate(1);
    }

    /// Moves up one level.
    pub fn goto_parent(&mut self) -> Result<()> {
        if self.stack.len() < 2 {
            return Err(Error::fetch("cursor is at the product root"));
        }
        self.stack.pop();
        Ok(())
    }

    /// Pops `levels` levels in one call. Used to restore a saved depth
    /// after a recursive descent.
    pub fn pop_levels(&mut self, levels: usize) -> Result<()> {
        for _ in 0..levels {
            self.goto_parent()?;
        }
        Ok(())
    }

    /// Moves to the named field of the current record node.
    pub fn goto_record_field(&mut self, name: &str) -> Result<()> {
        let node = self.node();
        match self.source.field_index(node, name)? {
            Some(index) => {
                let child = self.source.record_field(node, index)?;
                self.push(child, index);
                Ok(())
            }
            None => Err(Error::NotFound {
                name: name.to_owned(),
            }),
        }
    }

    /// Moves to field 0 of the current record node.
    pub fn goto_first_record_field(&mut self) -> Result<()> {
        let node = self.node();
        let child = self.source.record_field(node, 0)?;
        self.push(child, 0);
        Ok(())
    }

    /// Moves from one record field to its next sibling.
    pub fn goto_next_record_field(&mut self) -> Result<()> {
        let parent = self.parent_node()?;
        let next = self.stack[self.stack.len() - 1].ordinal + 1;
        let child = self.source.record_field(parent, next)?;
        self.replace_top(child, next);
        Ok(())
    }

    /// Moves to the single available field of the current union record.
    pub fn goto_available_union_field(&mut self) -> Result<()> {
        let node = self.node();
        let index = self.source.available_union_field(node)?;
        let child = self.source.record_field(node, index)?;
        self.push(child, index);
        Ok(())
    }

    /// Moves to the array element addressed by one concrete index per
    /// dimension (rank-0 arrays address as `[0]`). Wildcards are not valid
    /// here; a negative index fails the bounds check like any other
    /// out-of-range index.
    pub fn goto_array_element(&mut self, indices: &[i64]) -> Result<()> {
        let shape = self.shape_normalized()?;
        if indices.len() != shape.len() {
            return Err(Error::DimensionMismatch {
                given: indices.len(),
                rank: shape.len(),
            });
        }
        let mut flat = 0usize;
        for (&index, &size) in indices.iter().zip(shape.iter()) {
            if index < 0 || index as usize >= size {
                return Err(Error::IndexOutOfRange {
                    index,
                    size: size as i64,
                });
            }
            flat = flat * size + index as usize;
        }
        let node = self.node();
        let child = self.source.array_element(node, flat)?;
        self.push(child, flat);
        Ok(())
    }

    /// Moves to flat element 0 of the current array node.
    pub fn goto_first_array_element(&mut self) -> Result<()> {
        let node = self.node();
        let child = self.source.array_element(node, 0)?;
        self.push(child, 0);
        Ok(())
    }

    /// Moves from one array element to its next flat sibling.
    pub fn goto_next_array_element(&mut self) -> Result<()> {
        let parent = self.parent_node()?;
        let next = self.stack[self.stack.len() - 1].ordinal + 1;
        let child = self.source.array_element(parent, next)?;
        self.replace_top(child, next);
        Ok(())
    }

    /// Moves to the current node's attribute record.
    pub fn goto_attributes(&mut self) -> Result<()> {
        let node = self.node();
        let attrs = self.source.attributes(node)?;
        self.push(attrs, 0);
        Ok(())
    }

    // ---- type and shape queries ----

    /// Type class of the current node.
    pub fn type_class(&self) -> Result<TypeClass> {
        self.source.type_class(self.node())
    }

    /// Read type of the current native node.
    pub fn read_type(&self) -> Result<ReadType> {
        self.source.read_type(self.node())
    }

    /// Special type of the current special node.
    pub fn special_type(&self) -> Result<SpecialType> {
        self.source.special_type(self.node())
    }

    /// Type class of the current array node's element type.
    pub fn array_base_class(&self) -> Result<TypeClass> {
        self.source.array_base_class(self.node())
    }

    /// Read type of the current array node's native element type.
    pub fn array_base_read_type(&self) -> Result<ReadType> {
        self.source.array_base_read_type(self.node())
    }

    /// Special type of the current array node's special element type.
    pub fn array_base_special_type(&self) -> Result<SpecialType> {
        self.source.array_base_special_type(self.node())
    }

    /// Raw dimension sizes of the current array node; may be rank 0.
    pub fn array_shape(&self) -> Result<Shape> {
        self.source.array_shape(self.node())
    }

    /// Dimension sizes with rank 0 normalized to `[1]`. Every
    /// shape-consuming routine goes through this.
    pub fn shape_normalized(&self) -> Result<Shape> {
        let mut shape = self.source.array_shape(self.node())?;
        if shape.is_empty() {
            shape.push(1);
        }
        Ok(shape)
    }

    /// Element count of the current node (fields for records, flat product
    /// for arrays).
    pub fn num_elements(&self) -> Result<usize> {
        self.source.num_elements(self.node())
    }

    /// Schema description of the current node, empty when absent.
    pub fn description(&self) -> Result<String> {
        self.source.description(self.node())
    }

    /// Unit of the current node, empty when absent.
    pub fn unit(&self) -> Result<String> {
        self.source.unit(self.node())
    }

    /// Availability of field `index` of the current record node.
    pub fn field_available(&self, index: usize) -> Result<bool> {
        self.source.field_available(self.node(), index)
    }

    /// Hidden flag of field `index` of the current record node.
    pub fn field_hidden(&self, index: usize) -> Result<bool> {
        self.source.field_hidden(self.node(), index)
    }

    /// Name of field `index` of the current record node.
    pub fn field_name(&self, index: usize) -> Result<String> {
        self.source.field_name(self.node(), index)
    }

    /// Index of the named field of the current record node, or `None` when
    /// the schema has no such field.
    pub fn field_index(&self, name: &str) -> Result<Option<usize>> {
        self.source.field_index(self.node(), name)
    }

    /// True when the current record node is a union.
    pub fn is_union(&self) -> Result<bool> {
        self.source.is_union(self.node())
    }

    // ---- reads at the current position ----

    scalar_read_delegates! {
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
        char: char,
        string: String,
        double_pair: (f64, f64),
    }

    /// Reads the current node's raw bytes.
    #[inline]
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        self.source.read_bytes(self.node())
    }

    array_read_delegates! {
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
        double_pairs: f64,
    }
}
