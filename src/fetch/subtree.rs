//! Recursive subtree materialization.
//!
//! Once traversal has positioned a cursor, everything below it is read in
//! one pass. Records become [`Record`]s with unavailable fields always
//! skipped and hidden fields skipped unless the options keep them. Arrays
//! whose base type has a fixed-width representation are read in bulk;
//! arrays of anything else (records, nested arrays, text, raw bytes) are
//! filled element by element with a sibling walk. Scalars dispatch on
//! their read type or special type.
//!
//! Every branch returns the cursor to the node it started at.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::fetch::FetchOptions;
use crate::source::ProductSource;
use crate::types::{ArrayOrder, ReadType, ScalarKind, SpecialType, TypeClass};
use crate::value::{ArrayData, Complex64, ElementKind, NdArray, Record, Value};

/// Reads the node under the cursor, and everything below it, into a
/// [`Value`].
pub(crate) fn fetch_subtree<S>(cursor: &mut Cursor<'_, S>, options: &FetchOptions) -> Result<Value>
where
    S: ProductSource + ?Sized,
{
    match cursor.type_class()? {
        TypeClass::Record => fetch_record(cursor, options),
        TypeClass::Array => fetch_array(cursor, options),
        TypeClass::Integer | TypeClass::Real | TypeClass::Text | TypeClass::Raw => {
            read_native_scalar(cursor)
        }
        TypeClass::Special => read_special_scalar(cursor),
    }
}

fn fetch_record<S>(cursor: &mut Cursor<'_, S>, options: &FetchOptions) -> Result<Value>
where
    S: ProductSource + ?Sized,
{
    let field_count = cursor.num_elements()?;
    if field_count == 0 {
        return Ok(Value::Record(Record::new()));
    }

    // Field names must be resolved before the cursor leaves the record.
    let mut fields: Vec<Option<String>> = Vec::with_capacity(field_count);
    for index in 0..field_count {
        if options.retains_field(cursor, index)? {
            fields.push(Some(cursor.field_name(index)?));
        } else {
            fields.push(None);
        }
    }

    // The walk visits every field, retained or not; skipping a field only
    // skips the read, never the sibling move.
    let mut record = Record::new();
    cursor.goto_first_record_field()?;
    for (index, name) in fields.iter_mut().enumerate() {
        if let Some(name) = name.take() {
            let value = fetch_subtree(cursor, options)?;
            record.append(name, value);
        }
        if index < field_count - 1 {
            cursor.goto_next_record_field()?;
        }
    }
    cursor.goto_parent()?;
    Ok(Value::Record(record))
}

fn fetch_array<S>(cursor: &mut Cursor<'_, S>, options: &FetchOptions) -> Result<Value>
where
    S: ProductSource + ?Sized,
{
    if cursor.num_elements()? == 0 {
        return Ok(Value::Empty);
    }
    match cursor.array_base_class()? {
        TypeClass::Record | TypeClass::Array => fetch_object_array(cursor, options),
        TypeClass::Integer | TypeClass::Real | TypeClass::Text | TypeClass::Raw => {
            let read_type = cursor.array_base_read_type()?;
            match read_type.scalar_kind() {
                Some(ScalarKind::Scalar) => read_native_array(cursor, read_type),
                Some(ScalarKind::Object) => fetch_object_array(cursor, options),
                None => Err(Error::fetch(
                    "cannot read array (not all elements are available)",
                )),
            }
        }
        TypeClass::Special => match cursor.array_base_special_type()? {
            // A no-data array has nothing to read; its shape alone
            // determines the result.
            SpecialType::NoData => {
                let shape = cursor.shape_normalized()?;
                let count = shape.iter().product();
                let data = ArrayData::Object(vec![Value::Empty; count]);
                Ok(Value::Array(NdArray::new(shape, data)))
            }
            SpecialType::VsfInteger | SpecialType::Time => {
                let shape = cursor.shape_normalized()?;
                let data = ArrayData::Double(cursor.read_double_array(ArrayOrder::RowMajor)?);
                Ok(Value::Array(NdArray::new(shape, data)))
            }
            SpecialType::Complex => {
                let shape = cursor.shape_normalized()?;
                let data = ArrayData::Complex(read_complex_elements(cursor)?);
                Ok(Value::Array(NdArray::new(shape, data)))
            }
        },
    }
}

/// Fills an array by fetching each element through the cursor, in flat
/// row-major order. Used whenever elements cannot be read in bulk.
fn fetch_object_array<S>(cursor: &mut Cursor<'_, S>, options: &FetchOptions) -> Result<Value>
where
    S: ProductSource + ?Sized,
{
    let shape = cursor.shape_normalized()?;
    let count: usize = shape.iter().product();
    let mut data = ArrayData::with_capacity(ElementKind::Object, count);
    cursor.goto_first_array_element()?;
    for _ in 1..count {
        data.push_value(fetch_subtree(cursor, options)?)?;
        cursor.goto_next_array_element()?;
    }
    data.push_value(fetch_subtree(cursor, options)?)?;
    cursor.goto_parent()?;
    Ok(Value::Array(NdArray::new(shape, data)))
}

fn read_native_array<S>(cursor: &mut Cursor<'_, S>, read_type: ReadType) -> Result<Value>
where
    S: ProductSource + ?Sized,
{
    let shape = cursor.shape_normalized()?;
    let order = ArrayOrder::RowMajor;
    let data = match read_type {
        ReadType::Int8 => ArrayData::Int8(cursor.read_int8_array(order)?),
        ReadType::Uint8 => ArrayData::Uint8(cursor.read_uint8_array(order)?),
        ReadType::Int16 => ArrayData::Int16(cursor.read_int16_array(order)?),
        ReadType::Uint16 => ArrayData::Uint16(cursor.read_uint16_array(order)?),
        ReadType::Int32 => ArrayData::Int32(cursor.read_int32_array(order)?),
        ReadType::Uint32 => ArrayData::Uint32(cursor.read_uint32_array(order)?),
        ReadType::Int64 => ArrayData::Int64(cursor.read_int64_array(order)?),
        ReadType::Uint64 => ArrayData::Uint64(cursor.read_uint64_array(order)?),
        ReadType::Float => ArrayData::Float(cursor.read_float_array(order)?),
        ReadType::Double => ArrayData::Double(cursor.read_double_array(order)?),
        ReadType::Char | ReadType::String | ReadType::Bytes | ReadType::NotAvailable => {
            return Err(Error::fetch(
                "cannot bulk-read array (base type has no fixed-width representation)",
            ))
        }
    };
    Ok(Value::Array(NdArray::new(shape, data)))
}

fn read_native_scalar<S>(cursor: &mut Cursor<'_, S>) -> Result<Value>
where
    S: ProductSource + ?Sized,
{
    let value = match cursor.read_type()? {
        ReadType::Int8 => Value::Int8(cursor.read_int8()?),
        ReadType::Uint8 => Value::Uint8(cursor.read_uint8()?),
        ReadType::Int16 => Value::Int16(cursor.read_int16()?),
        ReadType::Uint16 => Value::Uint16(cursor.read_uint16()?),
        ReadType::Int32 => Value::Int32(cursor.read_int32()?),
        ReadType::Uint32 => Value::Uint32(cursor.read_uint32()?),
        ReadType::Int64 => Value::Int64(cursor.read_int64()?),
        ReadType::Uint64 => Value::Uint64(cursor.read_uint64()?),
        ReadType::Float => Value::Float(cursor.read_float()?),
        ReadType::Double => Value::Double(cursor.read_double()?),
        ReadType::Char => Value::Char(cursor.read_char()?),
        ReadType::String => Value::Text(cursor.read_string()?),
        ReadType::Bytes => Value::Bytes(cursor.read_bytes()?),
        ReadType::NotAvailable => {
            return Err(Error::fetch("cannot read value (value is not available)"))
        }
    };
    Ok(value)
}

fn read_special_scalar<S>(cursor: &mut Cursor<'_, S>) -> Result<Value>
where
    S: ProductSource + ?Sized,
{
    let value = match cursor.special_type()? {
        SpecialType::NoData => Value::Empty,
        SpecialType::VsfInteger | SpecialType::Time => Value::Double(cursor.read_double()?),
        SpecialType::Complex => {
            let (re, im) = cursor.read_double_pair()?;
            Value::Complex(Complex64::new(re, im))
        }
    };
    Ok(value)
}

fn read_complex_elements<S>(cursor: &mut Cursor<'_, S>) -> Result<Vec<Complex64>>
where
    S: ProductSource + ?Sized,
{
    let pairs = cursor.read_double_pairs_array(ArrayOrder::RowMajor)?;
    Ok(pairs
        .chunks_exact(2)
        .map(|pair| Complex64::new(pair[0], pair[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::{field, MemProduct};

    fn options() -> FetchOptions {
        FetchOptions::default()
    }

    #[test]
    fn record_skips_hidden_fields_unless_kept() {
        let mut p = MemProduct::new();
        let shown = p.int32(7);
        let hidden = p.int32(13);
        let root = p.record(&[field("shown", shown), field("crc", hidden).hidden()]);
        p.set_root(root);

        let mut cur = Cursor::new(&p).unwrap();
        let value = fetch_subtree(&mut cur, &options()).unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record.names().collect::<Vec<_>>(), ["shown"]);
        assert_eq!(cur.depth(), 0);

        let mut cur = Cursor::new(&p).unwrap();
        let keep = FetchOptions::new().with_hidden_fields();
        let value = fetch_subtree(&mut cur, &keep).unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record.names().collect::<Vec<_>>(), ["shown", "crc"]);
    }

    #[test]
    fn unavailable_fields_are_always_skipped() {
        let mut p = MemProduct::new();
        let a = p.int32(1);
        let b = p.int32(2);
        let root = p.record(&[field("a", a).unavailable(), field("b", b)]);
        p.set_root(root);

        let mut cur = Cursor::new(&p).unwrap();
        let keep = FetchOptions::new().with_hidden_fields();
        let value = fetch_subtree(&mut cur, &keep).unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record.names().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn empty_array_fetches_as_empty_value() {
        let mut p = MemProduct::new();
        let none = p.int32_array(&[0], vec![]);
        let root = p.record(&[field("none", none)]);
        p.set_root(root);

        let mut cur = Cursor::new(&p).unwrap();
        cur.goto_record_field("none").unwrap();
        assert_eq!(fetch_subtree(&mut cur, &options()).unwrap(), Value::Empty);
    }

    #[test]
    fn fixed_width_base_is_read_in_bulk_with_shape() {
        let mut p = MemProduct::new();
        let grid = p.int16_array(&[2, 2], vec![1, 2, 3, 4]);
        let root = p.record(&[field("grid", grid)]);
        p.set_root(root);

        let mut cur = Cursor::new(&p).unwrap();
        cur.goto_record_field("grid").unwrap();
        let value = fetch_subtree(&mut cur, &options()).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.shape(), &[2, 2]);
        assert_eq!(array.data(), &ArrayData::Int16(vec![1, 2, 3, 4]));
        assert_eq!(cur.depth(), 1);
    }

    #[test]
    fn string_base_falls_back_to_element_walk() {
        let mut p = MemProduct::new();
        let names = p.string_array(&[2], &["ozone", "no2"]);
        let root = p.record(&[field("names", names)]);
        p.set_root(root);

        let mut cur = Cursor::new(&p).unwrap();
        cur.goto_record_field("names").unwrap();
        let value = fetch_subtree(&mut cur, &options()).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.element(0), Some(Value::Text("ozone".into())));
        assert_eq!(array.element(1), Some(Value::Text("no2".into())));
    }

    #[test]
    fn special_scalars_dispatch_on_special_type() {
        let mut p = MemProduct::new();
        let nothing = p.no_data();
        let stamp = p.time(4.5e8);
        let packed = p.vsf_integer(3, 1234);
        let z = p.complex(1.0, -2.0);
        let root = p.record(&[
            field("nothing", nothing),
            field("stamp", stamp),
            field("packed", packed),
            field("z", z),
        ]);
        p.set_root(root);

        let mut cur = Cursor::new(&p).unwrap();
        let value = fetch_subtree(&mut cur, &options()).unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record.get("nothing").unwrap(), &Value::Empty);
        assert_eq!(record.get("stamp").unwrap(), &Value::Double(4.5e8));
        assert_eq!(record.get("packed").unwrap(), &Value::Double(1.234));
        assert_eq!(
            record.get("z").unwrap(),
            &Value::Complex(Complex64::new(1.0, -2.0))
        );
    }

    #[test]
    fn no_data_array_yields_empty_elements_without_reads() {
        let mut p = MemProduct::new();
        let gaps = p.no_data_array(&[3]);
        let root = p.record(&[field("gaps", gaps)]);
        p.set_root(root);

        let mut cur = Cursor::new(&p).unwrap();
        cur.goto_record_field("gaps").unwrap();
        let value = fetch_subtree(&mut cur, &options()).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.shape(), &[3]);
        assert_eq!(array.element(1), Some(Value::Empty));
    }
}
