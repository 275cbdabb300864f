//! # Dense Multi-Dimensional Arrays
//!
//! [`NdArray`] is the materialized form of an array node: a shape plus one
//! flat, row-major element buffer. Element storage is monomorphic per
//! array: one typed `Vec` for fixed-width reads, or a `Vec<Value>` when
//! elements are records, arrays, text, bytes, or empty sentinels (the
//! "object" layout).
//!
//! ## Shape conventions
//!
//! Shapes are sequences of non-negative dimension sizes. Rank-0 nodes are
//! normalized to rank-1 size-1 before any arithmetic; the normalization
//! lives in the cursor layer so every shape seen here already has rank
//! >= 1. The last dimension varies fastest (row-major), matching the
//! path convention that the trailing index moves fastest.
//!
//! ## Element kinds
//!
//! | Kind | Storage | Produced by |
//! |----------|----------------|---------------------------------------|
//! | Int8..Uint64 | `Vec<iN>`/`Vec<uN>` | bulk native integer reads |
//! | Float | `Vec<f32>` | bulk float32 reads |
//! | Double | `Vec<f64>` | bulk float64 reads, time, scaled ints |
//! | Complex | `Vec<Complex64>` | pair reads |
//! | Object | `Vec<Value>` | records, arrays, char/string/bytes |

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::types::{ReadType, SpecialType};
use crate::value::{Complex64, Value};

/// Dimension sizes with inline storage; product shapes are shallow.
pub type Shape = SmallVec<[usize; 8]>;

/// Storage classification of one array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
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
    Complex,
    Object,
}

impl ElementKind {
    /// Storage kind for a native read type, or `None` for the
    /// `NotAvailable` sentinel (which has no element representation).
    pub fn for_read_type(read_type: ReadType) -> Option<ElementKind> {
        match read_type {
            ReadType::NotAvailable => None,
            ReadType::Int8 => Some(ElementKind::Int8),
            ReadType::Uint8 => Some(ElementKind::Uint8),
            ReadType::Int16 => Some(ElementKind::Int16),
            ReadType::Uint16 => Some(ElementKind::Uint16),
            ReadType::Int32 => Some(ElementKind::Int32),
            ReadType::Uint32 => Some(ElementKind::Uint32),
            ReadType::Int64 => Some(ElementKind::Int64),
            ReadType::Uint64 => Some(ElementKind::Uint64),
            ReadType::Float => Some(ElementKind::Float),
            ReadType::Double => Some(ElementKind::Double),
            ReadType::Char | ReadType::String | ReadType::Bytes => Some(ElementKind::Object),
        }
    }

    /// Storage kind for a special element type. Time and scaled integers
    /// decode to doubles; no-data elements are empty sentinels.
    pub fn for_special(special: SpecialType) -> ElementKind {
        match special {
            SpecialType::NoData => ElementKind::Object,
            SpecialType::VsfInteger | SpecialType::Time => ElementKind::Double,
            SpecialType::Complex => ElementKind::Complex,
        }
    }

    /// Canonical type name, as used in record structure dumps.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Int8 => "int8",
            ElementKind::Uint8 => "uint8",
            ElementKind::Int16 => "int16",
            ElementKind::Uint16 => "uint16",
            ElementKind::Int32 => "int32",
            ElementKind::Uint32 => "uint32",
            ElementKind::Int64 => "int64",
            ElementKind::Uint64 => "uint64",
            ElementKind::Float => "float",
            ElementKind::Double => "double",
            ElementKind::Complex => "complex",
            ElementKind::Object => "object",
        }
    }
}

/// Flat element storage for one array.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Int64(Vec<i64>),
    Uint64(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Complex(Vec<Complex64>),
    Object(Vec<Value>),
}

impl ArrayData {
    /// Creates empty storage of the given kind with room for `capacity`
    /// elements.
    pub fn with_capacity(kind: ElementKind, capacity: usize) -> ArrayData {
        match kind {
            ElementKind::Int8 => ArrayData::Int8(Vec::with_capacity(capacity)),
            ElementKind::Uint8 => ArrayData::Uint8(Vec::with_capacity(capacity)),
            ElementKind::Int16 => ArrayData::Int16(Vec::with_capacity(capacity)),
            ElementKind::Uint16 => ArrayData::Uint16(Vec::with_capacity(capacity)),
            ElementKind::Int32 => ArrayData::Int32(Vec::with_capacity(capacity)),
            ElementKind::Uint32 => ArrayData::Uint32(Vec::with_capacity(capacity)),
            ElementKind::Int64 => ArrayData::Int64(Vec::with_capacity(capacity)),
            ElementKind::Uint64 => ArrayData::Uint64(Vec::with_capacity(capacity)),
            ElementKind::Float => ArrayData::Float(Vec::with_capacity(capacity)),
            ElementKind::Double => ArrayData::Double(Vec::with_capacity(capacity)),
            ElementKind::Complex => ArrayData::Complex(Vec::with_capacity(capacity)),
            ElementKind::Object => ArrayData::Object(Vec::with_capacity(capacity)),
        }
    }

    /// Storage classification of this buffer.
    pub fn kind(&self) -> ElementKind {
        match self {
            ArrayData::Int8(_) => ElementKind::Int8,
            ArrayData::Uint8(_) => ElementKind::Uint8,
            ArrayData::Int16(_) => ElementKind::Int16,
            ArrayData::Uint16(_) => ElementKind::Uint16,
            ArrayData::Int32(_) => ElementKind::Int32,
            ArrayData::Uint32(_) => ElementKind::Uint32,
            ArrayData::Int64(_) => ElementKind::Int64,
            ArrayData::Uint64(_) => ElementKind::Uint64,
            ArrayData::Float(_) => ElementKind::Float,
            ArrayData::Double(_) => ElementKind::Double,
            ArrayData::Complex(_) => ElementKind::Complex,
            ArrayData::Object(_) => ElementKind::Object,
        }
    }

    /// Number of elements currently stored.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Int8(v) => v.len(),
            ArrayData::Uint8(v) => v.len(),
            ArrayData::Int16(v) => v.len(),
            ArrayData::Uint16(v) => v.len(),
            ArrayData::Int32(v) => v.len(),
            ArrayData::Uint32(v) => v.len(),
            ArrayData::Int64(v) => v.len(),
            ArrayData::Uint64(v) => v.len(),
            ArrayData::Float(v) => v.len(),
            ArrayData::Double(v) => v.len(),
            ArrayData::Complex(v) => v.len(),
            ArrayData::Object(v) => v.len(),
        }
    }

    /// True when no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends one materialized element.
    ///
    /// Object storage accepts any value. Typed storage accepts exactly its
    /// scalar variant; anything else indicates a dispatch bug upstream and
    /// is reported as a fetch failure rather than stored lossily.
    pub fn push_value(&mut self, value: Value) -> Result<()> {
        match (self, value) {
            (ArrayData::Object(v), value) => v.push(value),
            (ArrayData::Int8(v), Value::Int8(x)) => v.push(x),
            (ArrayData::Uint8(v), Value::Uint8(x)) => v.push(x),
            (ArrayData::Int16(v), Value::Int16(x)) => v.push(x),
            (ArrayData::Uint16(v), Value::Uint16(x)) => v.push(x),
            (ArrayData::Int32(v), Value::Int32(x)) => v.push(x),
            (ArrayData::Uint32(v), Value::Uint32(x)) => v.push(x),
            (ArrayData::Int64(v), Value::Int64(x)) => v.push(x),
            (ArrayData::Uint64(v), Value::Uint64(x)) => v.push(x),
            (ArrayData::Float(v), Value::Float(x)) => v.push(x),
            (ArrayData::Double(v), Value::Double(x)) => v.push(x),
            (ArrayData::Complex(v), Value::Complex(x)) => v.push(x),
            (data, value) => {
                return Err(Error::fetch(format!(
                    "array element type mismatch (storing {} into {} array)",
                    value.kind_name(),
                    data.kind().type_name()
                )))
            }
        }
        Ok(())
    }

    /// Clones out the element at `flat`, or `None` past the end.
    pub fn element(&self, flat: usize) -> Option<Value> {
        match self {
            ArrayData::Int8(v) => v.get(flat).map(|&x| Value::Int8(x)),
            ArrayData::Uint8(v) => v.get(flat).map(|&x| Value::Uint8(x)),
            ArrayData::Int16(v) => v.get(flat).map(|&x| Value::Int16(x)),
            ArrayData::Uint16(v) => v.get(flat).map(|&x| Value::Uint16(x)),
            ArrayData::Int32(v) => v.get(flat).map(|&x| Value::Int32(x)),
            ArrayData::Uint32(v) => v.get(flat).map(|&x| Value::Uint32(x)),
            ArrayData::Int64(v) => v.get(flat).map(|&x| Value::Int64(x)),
            ArrayData::Uint64(v) => v.get(flat).map(|&x| Value::Uint64(x)),
            ArrayData::Float(v) => v.get(flat).map(|&x| Value::Float(x)),
            ArrayData::Double(v) => v.get(flat).map(|&x| Value::Double(x)),
            ArrayData::Complex(v) => v.get(flat).map(|&x| Value::Complex(x)),
            ArrayData::Object(v) => v.get(flat).cloned(),
        }
    }
}

/// A materialized array node: shape plus flat row-major elements.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Shape,
    data: ArrayData,
}

impl NdArray {
    /// Wraps a filled element buffer with its shape. The buffer length must
    /// equal the shape's element product.
    pub fn new(shape: impl Into<Shape>, data: ArrayData) -> NdArray {
        let shape = shape.into();
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        NdArray { shape, data }
    }

    /// Dimension sizes, outermost first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Storage classification of the elements.
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// The flat element buffer.
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Clones out the element at flat (row-major) position `flat`.
    pub fn element(&self, flat: usize) -> Option<Value> {
        self.data.element(flat)
    }
}

/// Renders as `[d1xd2x...xdN typename]`, the form record dumps use.
impl std::fmt::Display for NdArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dims = self
            .shape
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("x");
        write!(f, "[{} {}]", dims, self.kind().type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_storage_rejects_mismatched_values() {
        let mut data = ArrayData::with_capacity(ElementKind::Int16, 2);
        data.push_value(Value::Int16(7)).unwrap();
        let err = data.push_value(Value::Double(1.0)).unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[test]
    fn object_storage_accepts_anything() {
        let mut data = ArrayData::with_capacity(ElementKind::Object, 3);
        data.push_value(Value::Empty).unwrap();
        data.push_value(Value::Text("abc".to_owned())).unwrap();
        data.push_value(Value::Int8(-1)).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.element(1), Some(Value::Text("abc".to_owned())));
    }

    #[test]
    fn display_joins_dimensions_with_x() {
        let arr = NdArray::new(
            Shape::from_slice(&[3, 4]),
            ArrayData::Double(vec![0.0; 12]),
        );
        assert_eq!(arr.to_string(), "[3x4 double]");

        let vec1 = NdArray::new(Shape::from_slice(&[3]), ArrayData::Float(vec![0.0; 3]));
        assert_eq!(vec1.to_string(), "[3 float]");
    }

    #[test]
    fn special_kinds_decode_to_expected_storage() {
        assert_eq!(
            ElementKind::for_special(SpecialType::Time),
            ElementKind::Double
        );
        assert_eq!(
            ElementKind::for_special(SpecialType::VsfInteger),
            ElementKind::Double
        );
        assert_eq!(
            ElementKind::for_special(SpecialType::Complex),
            ElementKind::Complex
        );
        assert_eq!(
            ElementKind::for_special(SpecialType::NoData),
            ElementKind::Object
        );
    }

    #[test]
    fn read_type_kinds_cover_all_concrete_types() {
        assert_eq!(
            ElementKind::for_read_type(ReadType::Uint32),
            Some(ElementKind::Uint32)
        );
        assert_eq!(
            ElementKind::for_read_type(ReadType::String),
            Some(ElementKind::Object)
        );
        assert_eq!(ElementKind::for_read_type(ReadType::NotAvailable), None);
    }

    #[test]
    fn flat_element_access_clones_typed_values() {
        let arr = NdArray::new(
            Shape::from_slice(&[2, 2]),
            ArrayData::Int32(vec![1, 2, 3, 4]),
        );
        assert_eq!(arr.element(2), Some(Value::Int32(3)));
        assert_eq!(arr.element(4), None);
    }
}
