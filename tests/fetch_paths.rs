//! # Path Fetch Tests
//!
//! End-to-end coverage of concrete (wildcard-free) fetching: scalar reads
//! at their exact native width, record and array navigation, shape
//! inspection, node metadata, and the errors raised for paths that do not
//! address anything.

use canopy::mem::{field, MemProduct};
use canopy::{
    fetch, get_attributes, get_description, get_field_available, get_size, get_unit, path,
    Complex64, Cursor, Error, Value,
};

/// A small sounding product: scalars, a rank-1 array, a nested record and
/// a rank-2 array under one root.
fn sounding_product() -> MemProduct {
    let mut p = MemProduct::new();

    let mission = p.string("METOP-A");
    let orbit = p.uint32(43_211);
    let latitude = p.double_array(&[4], vec![54.2, 54.9, 55.6, 56.3]);

    let lat = p.double(51.48);
    let lon = p.double(-0.12);
    let site = p.record(&[field("lat", lat), field("lon", lon)]);

    let counts = p.int16_array(&[2, 3], vec![10, 11, 12, 20, 21, 22]);

    let root = p.record(&[
        field("mission", mission),
        field("orbit", orbit),
        field("latitude", latitude),
        field("site", site),
        field("counts", counts),
    ]);
    p.set_root(root);
    p
}

/// One field per native scalar width.
fn widths_product() -> MemProduct {
    let mut p = MemProduct::new();
    let i8_ = p.int8(-8);
    let u8_ = p.uint8(8);
    let i16_ = p.int16(-16);
    let u16_ = p.uint16(16);
    let i32_ = p.int32(-32);
    let u32_ = p.uint32(32);
    let i64_ = p.int64(-64);
    let u64_ = p.uint64(64);
    let f32_ = p.float(0.5);
    let f64_ = p.double(1.25);
    let ch = p.char('z');
    let txt = p.string("payload");
    let raw = p.bytes([0xde, 0xad, 0xbe, 0xef].as_slice());
    let root = p.record(&[
        field("i8", i8_),
        field("u8", u8_),
        field("i16", i16_),
        field("u16", u16_),
        field("i32", i32_),
        field("u32", u32_),
        field("i64", i64_),
        field("u64", u64_),
        field("f32", f32_),
        field("f64", f64_),
        field("ch", ch),
        field("txt", txt),
        field("raw", raw),
    ]);
    p.set_root(root);
    p
}

/// One field per special representation.
fn specials_product() -> MemProduct {
    let mut p = MemProduct::new();
    let start = p.time(1_577_836_800.0);
    let pressure = p.vsf_integer(2, 101_325);
    let gain = p.complex(0.8, -0.6);
    let gap = p.no_data();
    let root = p.record(&[
        field("start", start),
        field("pressure", pressure),
        field("gain", gain),
        field("gap", gap),
    ]);
    p.set_root(root);
    p
}

mod scalar_fetch_tests {
    use super::*;

    #[test]
    fn native_scalars_keep_their_exact_width() {
        let p = widths_product();
        assert_eq!(fetch(&p, &path!["i8"]).unwrap(), Value::Int8(-8));
        assert_eq!(fetch(&p, &path!["u8"]).unwrap(), Value::Uint8(8));
        assert_eq!(fetch(&p, &path!["i16"]).unwrap(), Value::Int16(-16));
        assert_eq!(fetch(&p, &path!["u16"]).unwrap(), Value::Uint16(16));
        assert_eq!(fetch(&p, &path!["i32"]).unwrap(), Value::Int32(-32));
        assert_eq!(fetch(&p, &path!["u32"]).unwrap(), Value::Uint32(32));
        assert_eq!(fetch(&p, &path!["i64"]).unwrap(), Value::Int64(-64));
        assert_eq!(fetch(&p, &path!["u64"]).unwrap(), Value::Uint64(64));
        assert_eq!(fetch(&p, &path!["f32"]).unwrap(), Value::Float(0.5));
        assert_eq!(fetch(&p, &path!["f64"]).unwrap(), Value::Double(1.25));
    }

    #[test]
    fn text_and_raw_scalars_fetch_verbatim() {
        let p = widths_product();
        assert_eq!(fetch(&p, &path!["ch"]).unwrap(), Value::Char('z'));
        assert_eq!(
            fetch(&p, &path!["txt"]).unwrap().as_str(),
            Some("payload")
        );
        assert_eq!(
            fetch(&p, &path!["raw"]).unwrap().as_bytes(),
            Some([0xde, 0xad, 0xbe, 0xef].as_slice())
        );
    }

    #[test]
    fn time_and_scaled_integers_fetch_as_doubles() {
        let p = specials_product();
        assert_eq!(
            fetch(&p, &path!["start"]).unwrap(),
            Value::Double(1_577_836_800.0)
        );
        // 101325 scaled by 10^-2.
        assert_eq!(
            fetch(&p, &path!["pressure"]).unwrap(),
            Value::Double(1013.25)
        );
    }

    #[test]
    fn complex_scalars_fetch_as_pairs() {
        let p = specials_product();
        let gain = fetch(&p, &path!["gain"]).unwrap();
        let c = gain.as_complex().unwrap();
        assert_eq!(c.re, 0.8);
        assert_eq!(c.im, -0.6);
    }

    #[test]
    fn no_data_nodes_fetch_as_the_empty_sentinel() {
        let p = specials_product();
        assert!(fetch(&p, &path!["gap"]).unwrap().is_empty());
    }

    #[test]
    fn complex_arrays_read_as_dense_pairs() {
        let mut p = MemProduct::new();
        let response = p.complex_array(
            &[2, 2],
            &[(0.0, 1.0), (1.0, 0.0), (0.5, 0.5), (-1.0, -2.0)],
        );
        let root = p.record(&[field("response", response)]);
        p.set_root(root);

        let value = fetch(&p, &path!["response"]).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.shape(), &[2, 2]);
        assert_eq!(
            array.element(3),
            Some(Value::Complex(Complex64::new(-1.0, -2.0)))
        );
        assert_eq!(
            fetch(&p, &path!["response", [0, 1]]).unwrap(),
            Value::Complex(Complex64::new(1.0, 0.0))
        );
    }
}

mod navigation_tests {
    use super::*;

    #[test]
    fn paths_descend_nested_records() {
        let p = sounding_product();
        assert_eq!(
            fetch(&p, &path!["site", "lat"]).unwrap(),
            Value::Double(51.48)
        );
        assert_eq!(
            fetch(&p, &path!["site", "lon"]).unwrap(),
            Value::Double(-0.12)
        );
    }

    #[test]
    fn array_elements_address_by_index_and_index_list() {
        let p = sounding_product();
        assert_eq!(
            fetch(&p, &path!["latitude", 2]).unwrap(),
            Value::Double(55.6)
        );
        assert_eq!(
            fetch(&p, &path!["counts", [1, 2]]).unwrap(),
            Value::Int16(22)
        );
        assert_eq!(
            fetch(&p, &path!["counts", [0, 0]]).unwrap(),
            Value::Int16(10)
        );
    }

    #[test]
    fn an_empty_path_fetches_the_whole_product() {
        let p = sounding_product();
        let root = fetch(&p, &[]).unwrap();
        let rec = root.as_record().unwrap();
        assert_eq!(rec.len(), 5);
        assert_eq!(rec.get("orbit").unwrap(), &Value::Uint32(43_211));

        let latitude = rec.get("latitude").unwrap().as_array().unwrap();
        assert_eq!(latitude.shape(), [4]);
        let site = rec.get("site").unwrap().as_record().unwrap();
        assert_eq!(site.get("lon").unwrap(), &Value::Double(-0.12));
    }

    #[test]
    fn fetching_from_a_cursor_is_relative_to_its_position() {
        let p = sounding_product();
        let mut cur = Cursor::new(&p).unwrap();
        cur.goto_record_field("site").unwrap();

        assert_eq!(cur.fetch(&path!["lat"]).unwrap(), Value::Double(51.48));
        // The cursor stays where it was put.
        assert_eq!(cur.depth(), 1);
        assert_eq!(cur.fetch(&path!["lon"]).unwrap(), Value::Double(-0.12));
    }

    #[test]
    fn sequential_fetches_compose_like_one_path() {
        let p = sounding_product();
        let direct = fetch(&p, &path!["counts", [1, 0]]).unwrap();

        let mut cur = Cursor::new(&p).unwrap();
        cur.goto_record_field("counts").unwrap();
        let via_cursor = cur.fetch(&path![[1, 0]]).unwrap();

        assert_eq!(direct, via_cursor);
        assert_eq!(direct, Value::Int16(20));
    }
}

mod bounds_tests {
    use super::*;

    #[test]
    fn out_of_range_indices_report_the_valid_range() {
        let p = sounding_product();
        let err = fetch(&p, &path!["latitude", 10]).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange { index: 10, size: 4 }
        ));
        assert_eq!(err.to_string(), "array index (10) exceeds array range [0:4)");
    }

    #[test]
    fn negative_indices_other_than_the_wildcard_are_rejected() {
        let p = sounding_product();
        assert!(matches!(
            fetch(&p, &path!["latitude", -2]).unwrap_err(),
            Error::IndexOutOfRange { index: -2, .. }
        ));
    }

    #[test]
    fn index_list_length_must_match_the_array_rank() {
        let p = sounding_product();
        let err = fetch(&p, &path!["latitude", [1, 2]]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { given: 2, rank: 1 }));

        let err = fetch(&p, &path!["counts", 1]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { given: 1, rank: 2 }));
    }

    #[test]
    fn unknown_field_names_report_not_found() {
        let p = sounding_product();
        let err = fetch(&p, &path!["altitude"]).unwrap_err();
        assert_eq!(err.to_string(), "record field 'altitude' not found");
        assert!(matches!(err, Error::NotFound { .. }));

        assert!(matches!(
            fetch(&p, &path!["site", "height"]).unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn descending_into_a_scalar_is_a_backend_error() {
        let p = sounding_product();
        assert!(matches!(
            fetch(&p, &path!["orbit", "x"]).unwrap_err(),
            Error::Backend { .. }
        ));
        assert!(matches!(
            fetch(&p, &path!["orbit", 0]).unwrap_err(),
            Error::Backend { .. }
        ));
    }
}

mod size_tests {
    use super::*;

    #[test]
    fn get_size_reports_schema_dimensions() {
        let p = sounding_product();
        assert_eq!(get_size(&p, &path!["latitude"]).unwrap(), [4]);
        assert_eq!(get_size(&p, &path!["counts"]).unwrap(), [2, 3]);
    }

    #[test]
    fn fetched_shape_matches_get_size_for_dense_arrays() {
        let p = sounding_product();
        for name in ["latitude", "counts"] {
            let size = get_size(&p, &path![name]).unwrap();
            let fetched = fetch(&p, &path![name]).unwrap();
            assert_eq!(size.as_slice(), fetched.as_array().unwrap().shape());
        }
    }

    #[test]
    fn rank0_arrays_normalize_to_a_single_element() {
        let mut p = MemProduct::new();
        let e = p.int64(99);
        let s = p.rank0_array(e);
        let root = p.record(&[field("s", s)]);
        p.set_root(root);

        assert_eq!(get_size(&p, &path!["s"]).unwrap(), [1]);
        assert_eq!(fetch(&p, &path!["s", 0]).unwrap(), Value::Int64(99));

        let whole = fetch(&p, &path!["s"]).unwrap();
        let arr = whole.as_array().unwrap();
        assert_eq!(arr.shape(), [1]);
        assert_eq!(arr.element(0), Some(Value::Int64(99)));
    }

    #[test]
    fn zero_length_arrays_fetch_as_the_empty_sentinel() {
        let mut p = MemProduct::new();
        let none = p.double_array(&[0], vec![]);
        let sparse = p.float_array(&[3, 0], vec![]);
        let root = p.record(&[field("none", none), field("sparse", sparse)]);
        p.set_root(root);

        assert!(fetch(&p, &path!["none"]).unwrap().is_empty());
        assert_eq!(get_size(&p, &path!["none"]).unwrap(), [0]);

        // Any zero dimension empties the whole array.
        assert!(fetch(&p, &path!["sparse"]).unwrap().is_empty());
        assert_eq!(get_size(&p, &path!["sparse"]).unwrap(), [3, 0]);
    }
}

mod metadata_tests {
    use super::*;

    #[test]
    fn descriptions_and_units_default_to_empty_strings() {
        let p = sounding_product();
        assert_eq!(get_description(&p, &path!["orbit"]).unwrap(), "");
        assert_eq!(get_unit(&p, &path!["latitude"]).unwrap(), "");
    }

    #[test]
    fn attached_descriptions_and_units_come_back_verbatim() {
        let mut p = MemProduct::new();
        let latitude = p.double_array(&[4], vec![0.0; 4]);
        let root = p.record(&[field("latitude", latitude)]);
        p.set_root(root);
        p.set_description(latitude, "geodetic latitude of the tangent point");
        p.set_unit(latitude, "degrees");

        assert_eq!(
            get_description(&p, &path!["latitude"]).unwrap(),
            "geodetic latitude of the tangent point"
        );
        assert_eq!(get_unit(&p, &path!["latitude"]).unwrap(), "degrees");
    }

    #[test]
    fn attributes_default_to_an_empty_record() {
        let p = sounding_product();
        let attrs = get_attributes(&p, &path!["orbit"]).unwrap();
        let rec = attrs.as_record().unwrap();
        assert!(rec.is_empty());
    }

    #[test]
    fn attached_attributes_fetch_as_records() {
        let mut p = MemProduct::new();
        let latitude = p.double_array(&[2], vec![1.0, 2.0]);
        let fill = p.double(-999.9);
        let attrs = p.record(&[field("fill_value", fill)]);
        let root = p.record(&[field("latitude", latitude)]);
        p.set_root(root);
        p.set_attributes(latitude, attrs);

        let fetched = get_attributes(&p, &path!["latitude"]).unwrap();
        let rec = fetched.as_record().unwrap();
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("fill_value").unwrap(), &Value::Double(-999.9));
    }

    #[test]
    fn field_availability_answers_without_fetching() {
        let mut p = MemProduct::new();
        let ok = p.int32(1);
        let missing = p.unreadable();
        let root = p.record(&[field("ok", ok), field("gone", missing).unavailable()]);
        p.set_root(root);

        assert!(get_field_available(&p, &path!["ok"]).unwrap());
        assert!(!get_field_available(&p, &path!["gone"]).unwrap());
        assert!(matches!(
            get_field_available(&p, &path!["absent"]).unwrap_err(),
            Error::NotFound { .. }
        ));
    }
}
