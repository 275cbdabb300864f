//! # Runtime Type Descriptors
//!
//! Every node in a product carries a type descriptor, read from the cursor
//! on demand and never stored by this crate. The descriptor is a small
//! closed tag set, so all dispatch is an exhaustive `match` checked at
//! compile time rather than a runtime table.
//!
//! ## Type Classes
//!
//! | Class | Meaning | Materializes as |
//! |---------|----------------------------------|-------------------------|
//! | Record | named, ordered fields | [`Record`](crate::Record) |
//! | Array | dense multi-dimensional elements | [`NdArray`](crate::NdArray) |
//! | Integer | native integer scalar | `i8`..`u64` per read type |
//! | Real | native floating scalar | `f32` / `f64` |
//! | Text | character data | `char` / `String` |
//! | Raw | opaque bytes | `Vec<u8>` |
//! | Special | encoded representation | per special type |
//!
//! Integer, Real, Text, and Raw are collectively the "native" classes: a
//! secondary [`ReadType`] selects the concrete primitive. Special nodes
//! carry a [`SpecialType`] selecting the decode rule instead.
//!
//! ## Scalar versus object reads
//!
//! Fixed-width read types (the integer widths and the two float widths) can
//! be read in bulk into one dense buffer. Char, string, and bytes elements
//! are variable-width and must be gathered one element at a time; the
//! [`ScalarKind`] classification tells the fetch engine which path to take.

/// Top-level classification of a product node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Record,
    Array,
    Integer,
    Real,
    Text,
    Raw,
    Special,
}

impl TypeClass {
    /// Returns true for the four native (primitive-valued) classes.
    pub fn is_native(&self) -> bool {
        matches!(
            self,
            TypeClass::Integer | TypeClass::Real | TypeClass::Text | TypeClass::Raw
        )
    }
}

/// Concrete primitive selection for native nodes.
///
/// `NotAvailable` is the sentinel a backend reports when a node has no
/// readable primitive representation; it is valid as a tag but an error to
/// dispatch a read on, and callers check for it before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadType {
    NotAvailable,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
    Char,
    String,
    Bytes,
}

/// Whether a read type supports one bulk dense read or requires
/// element-by-element gathering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Fixed-width primitive, directly vectorizable.
    Scalar,
    /// Variable-width (char/string/bytes), gathered per element.
    Object,
}

impl ReadType {
    /// Classifies this read type for array reads, or `None` for the
    /// `NotAvailable` sentinel, which has no read path at all.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            ReadType::NotAvailable => None,
            ReadType::Int8
            | ReadType::Uint8
            | ReadType::Int16
            | ReadType::Uint16
            | ReadType::Int32
            | ReadType::Uint32
            | ReadType::Int64
            | ReadType::Uint64
            | ReadType::Float
            | ReadType::Double => Some(ScalarKind::Scalar),
            ReadType::Char | ReadType::String | ReadType::Bytes => Some(ScalarKind::Object),
        }
    }
}

/// Decode rule for special nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialType {
    /// A node with no data at all; fetches as the empty sentinel.
    NoData,
    /// Variable-scale-factor integer: `value * 10^(-scale)`, read as f64.
    VsfInteger,
    /// Time offset, read as f64 seconds.
    Time,
    /// Complex number stored as a real/imaginary pair.
    Complex,
}

/// Element layout of a dense multi-dimensional read.
///
/// Row-major means the last dimension varies fastest, matching the path
/// convention that the last index in a step is the fastest-moving one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayOrder {
    #[default]
    RowMajor,
    ColumnMajor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_read_types_are_scalar() {
        for rt in [
            ReadType::Int8,
            ReadType::Uint8,
            ReadType::Int16,
            ReadType::Uint16,
            ReadType::Int32,
            ReadType::Uint32,
            ReadType::Int64,
            ReadType::Uint64,
            ReadType::Float,
            ReadType::Double,
        ] {
            assert_eq!(rt.scalar_kind(), Some(ScalarKind::Scalar));
        }
    }

    #[test]
    fn variable_width_read_types_are_object() {
        for rt in [ReadType::Char, ReadType::String, ReadType::Bytes] {
            assert_eq!(rt.scalar_kind(), Some(ScalarKind::Object));
        }
    }

    #[test]
    fn not_available_has_no_scalar_kind() {
        assert_eq!(ReadType::NotAvailable.scalar_kind(), None);
    }

    #[test]
    fn native_classes() {
        assert!(TypeClass::Integer.is_native());
        assert!(TypeClass::Real.is_native());
        assert!(TypeClass::Text.is_native());
        assert!(TypeClass::Raw.is_native());
        assert!(!TypeClass::Record.is_native());
        assert!(!TypeClass::Array.is_native());
        assert!(!TypeClass::Special.is_native());
    }
}
