//! # Materialized Values
//!
//! [`Value`] is the result type of every fetch: a tagged union over the
//! native scalar widths, text and raw bytes, complex pairs, dense arrays,
//! and composite records. Values own their data outright; nothing aliases
//! back into the cursor or the product source.
//!
//! ## Variants
//!
//! | Variant | Rust type | Produced by |
//! |----------|---------------|--------------------------------------|
//! | Empty | - | zero-length arrays, no-data nodes |
//! | Int8..Uint64 | `i8`..`u64` | native integer reads, exact width |
//! | Float | `f32` | native float32 reads |
//! | Double | `f64` | float64, time, scaled-integer reads |
//! | Char | `char` | single-character text reads |
//! | Text | `String` | string reads |
//! | Bytes | `Vec<u8>` | raw opaque reads |
//! | Complex | [`Complex64`] | real/imaginary pair reads |
//! | Array | [`NdArray`] | array nodes |
//! | Record | [`Record`] | record nodes |
//!
//! Scalar widths are preserved exactly: a 16-bit signed field fetches as
//! `Value::Int16`, never widened to `i64`.

pub mod array;
pub mod record;

pub use array::{ArrayData, ElementKind, NdArray, Shape};
pub use record::Record;

/// Complex value as a plain real/imaginary pair of doubles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex64 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    pub fn new(re: f64, im: f64) -> Complex64 {
        Complex64 { re, im }
    }
}

impl std::fmt::Display for Complex64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im < 0.0 {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

/// One materialized fetch result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The empty sentinel: zero-length arrays and no-data nodes.
    Empty,
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Float(f32),
    Double(f64),
    Char(char),
    Text(String),
    Bytes(Vec<u8>),
    Complex(Complex64),
    Array(NdArray),
    Record(Record),
}

/// Generates one `as_<variant>` accessor per copyable scalar variant.
macro_rules! scalar_accessors {
    ($($variant:ident : $ty:ty),* $(,)?) => {
        $(
            ::paste::paste! {
                #[doc = concat!("Returns the contained `", stringify!($ty), "`, or `None` for other variants.")]
                #[inline]
                pub fn [<as_ $variant:lower>](&self) -> Option<$ty> {
                    match self {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl Value {
    scalar_accessors! {
        Int8: i8,
        Uint8: u8,
        Int16: i16,
        Uint16: u16,
        Int32: i32,
        Uint32: u32,
        Int64: i64,
        Uint64: u64,
        Float: f32,
        Double: f64,
        Char: char,
        Complex: Complex64,
    }

    /// True for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Returns the contained text, or `None` for other variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained raw bytes, or `None` for other variants.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the contained array, or `None` for other variants.
    pub fn as_array(&self) -> Option<&NdArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the contained record, or `None` for other variants.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Short kind label used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Int8(_) => "int8",
            Value::Uint8(_) => "uint8",
            Value::Int16(_) => "int16",
            Value::Uint16(_) => "uint16",
            Value::Int32(_) => "int32",
            Value::Uint32(_) => "uint32",
            Value::Int64(_) => "int64",
            Value::Uint64(_) => "uint64",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::Text(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Complex(_) => "complex",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
        }
    }
}

/// Default textual form, as used for scalar fields in record dumps. Arrays
/// render as their shape summary, records as a field-count summary.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => write!(f, "<empty>"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Uint8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Uint16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Uint32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Uint64(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Bytes(v) => {
                write!(f, "\\x")?;
                for b in v {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Value::Complex(v) => write!(f, "{v}"),
            Value::Array(a) => write!(f, "{a}"),
            Value::Record(r) => write!(f, "record ({} fields)", r.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_their_variant_only() {
        assert_eq!(Value::Int16(-3).as_int16(), Some(-3));
        assert_eq!(Value::Int16(-3).as_int32(), None);
        assert_eq!(Value::Uint64(9).as_uint64(), Some(9));
        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::Char('q').as_char(), Some('q'));
        assert_eq!(
            Value::Complex(Complex64::new(1.0, -2.0)).as_complex(),
            Some(Complex64::new(1.0, -2.0))
        );
        assert_eq!(Value::Text("s".to_owned()).as_str(), Some("s"));
        assert_eq!(Value::Bytes(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Empty.to_string(), "<empty>");
        assert_eq!(Value::Double(1.1).to_string(), "1.1");
        assert_eq!(Value::Bytes(vec![0x00, 0xff]).to_string(), "\\x00ff");
        assert_eq!(
            Value::Complex(Complex64::new(1.5, 2.0)).to_string(),
            "1.5+2i"
        );
        assert_eq!(
            Value::Complex(Complex64::new(0.0, -0.5)).to_string(),
            "0-0.5i"
        );
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(Value::Empty.kind_name(), "empty");
        assert_eq!(Value::Uint16(1).kind_name(), "uint16");
        assert_eq!(Value::Record(Record::new()).kind_name(), "record");
    }
}
