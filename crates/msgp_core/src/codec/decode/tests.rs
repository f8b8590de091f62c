use std::collections::{BTreeMap, HashMap};

use super::{DecodeOptions, Decoder, decode_dynamic, decode_from_slice, parse_bool_literal};
use crate::codec::{MsgpError, Value, encode_to_vec};

#[derive(Debug, Default, PartialEq)]
struct Inner {
	name: String,
	score: u32,
}

crate::record!(Inner { name: "", score: "s,omitempty" });

#[derive(Debug, Default, PartialEq)]
struct Outer {
	id: i64,
	inner: Option<Inner>,
	count: i32,
	on: bool,
	skipped: u8,
}

crate::record!(Outer {
	id: "",
	inner: ",omitempty",
	count: ",string",
	on: "enabled,string",
	skipped: "-",
});

#[test]
fn nil_reads_as_zero_for_scalars() {
	assert!(!decode_from_slice::<bool>(&[0xc0]).expect("bool from nil"));
	assert_eq!(decode_from_slice::<i32>(&[0xc0]).expect("int from nil"), 0);
	assert_eq!(decode_from_slice::<f64>(&[0xc0]).expect("float from nil"), 0.0);
	assert_eq!(decode_from_slice::<String>(&[0xc0]).expect("string from nil"), "");
}

#[test]
fn numeric_kinds_coerce_into_each_other() {
	assert_eq!(decode_from_slice::<i64>(&[0xcc, 0xff]).expect("uint into int"), 255);
	assert_eq!(decode_from_slice::<u8>(&[0xd1, 0x01, 0x02]).expect("int16 into u8 truncates"), 0x02);
	assert_eq!(decode_from_slice::<i32>(&[0xcb, 0xc0, 0x04, 0, 0, 0, 0, 0, 0]).expect("float into int"), -2);
	assert_eq!(decode_from_slice::<f32>(&[0xe0]).expect("fixint into float"), -32.0);
	assert_eq!(decode_from_slice::<u64>(&[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).expect("u64 reads"), u64::MAX);
}

#[test]
fn wrong_family_is_type_mismatch() {
	let err = decode_from_slice::<bool>(&[0x01]).expect_err("int is not bool");
	assert!(matches!(err, MsgpError::TypeMismatch { expected: "bool", got: "int" }));

	let err = decode_from_slice::<i32>(&[0xa1, b'1']).expect_err("str is not int");
	assert!(matches!(err, MsgpError::TypeMismatch { expected: "int", got: "str" }));

	let err = decode_from_slice::<Vec<i32>>(&[0xc4, 0x01, 0x01]).expect_err("bin is not an int array");
	assert!(matches!(err, MsgpError::TypeMismatch { expected: "array", got: "bin" }));
}

#[test]
fn string_target_accepts_bin_and_repairs_utf8() {
	assert_eq!(decode_from_slice::<String>(&[0xc4, 0x02, b'h', b'i']).expect("bin into string"), "hi");
	assert_eq!(decode_from_slice::<String>(&[0xa2, b'a', 0xff]).expect("lossy utf8"), "a\u{fffd}");
}

#[test]
fn byte_targets_accept_bin_and_arrays() {
	assert_eq!(decode_from_slice::<Vec<u8>>(&[0xc4, 0x02, 0x05, 0x06]).expect("bin into vec"), [5, 6]);
	assert_eq!(decode_from_slice::<Vec<u8>>(&[0x92, 0x05, 0xcc, 0x06]).expect("array into vec"), [5, 6]);
	assert_eq!(decode_from_slice::<[u8; 4]>(&[0xc4, 0x02, 0x05, 0x06]).expect("short bin pads"), [5, 6, 0, 0]);

	let err = decode_from_slice::<[u8; 1]>(&[0xc4, 0x02, 0x05, 0x06]).expect_err("bin overflows array");
	assert!(matches!(err, MsgpError::BufferTooSmall { need: 2, capacity: 1 }));
}

#[test]
fn fixed_arrays_check_capacity_and_reset_tail() {
	let mut target = [9_i32; 3];
	let mut de = Decoder::new(&[0x92_u8, 0x01, 0x02][..]);
	de.decode_into(&mut target).expect("array decodes");
	assert_eq!(target, [1, 2, 0]);

	let err = decode_from_slice::<[i32; 1]>(&[0x92, 0x01, 0x02]).expect_err("array overflows");
	assert!(matches!(err, MsgpError::BufferTooSmall { need: 2, capacity: 1 }));
}

#[test]
fn nil_empties_containers() {
	assert_eq!(decode_from_slice::<[u8; 1]>(&[0xc0]).expect("nil into byte array"), [0]);
	assert!(decode_from_slice::<Vec<String>>(&[0xc0]).expect("nil into vec").is_empty());
	assert!(decode_from_slice::<HashMap<String, i32>>(&[0xc0]).expect("nil into map").is_empty());
	assert_eq!(decode_from_slice::<Option<bool>>(&[0xc0]).expect("nil into option"), None);
}

#[test]
fn maps_let_later_duplicates_win() {
	let bytes = [0x83, 0xa1, b'a', 0x01, 0xa1, b'b', 0x02, 0xa1, b'a', 0x03];
	let map = decode_from_slice::<BTreeMap<String, i64>>(&bytes).expect("map decodes");
	assert_eq!(map, BTreeMap::from([("a".to_owned(), 3), ("b".to_owned(), 2)]));
}

#[test]
fn optionals_decode_sequentially_from_one_stream() {
	let mut bytes = encode_to_vec(&None::<String>).expect("none encodes");
	bytes.extend(encode_to_vec(&Some("some text")).expect("some encodes"));

	let mut de = Decoder::new(&bytes[..]);
	let mut first = Some("stale".to_owned());
	let mut second = None::<String>;
	de.decode_into(&mut first).expect("first decodes");
	de.decode_into(&mut second).expect("second decodes");
	assert_eq!(first, None);
	assert_eq!(second.as_deref(), Some("some text"));
	assert!(de.is_at_end().expect("end check"));
}

#[test]
fn optional_at_end_of_input_is_end_of_input() {
	let err = decode_from_slice::<Option<i32>>(&[]).expect_err("nothing to decode");
	assert!(err.is_end_of_input());
}

#[test]
fn input_ending_inside_a_container_is_truncated() {
	let err = decode_dynamic(&[0x92_u8, 0x01][..]).expect_err("second element missing");
	assert!(matches!(err, MsgpError::Truncated { need: 1, have: 0 }), "got {err:?}");

	let err = decode_from_slice::<Vec<i32>>(&[0x92, 0x01]).expect_err("second element missing");
	assert!(matches!(err, MsgpError::Truncated { need: 1, have: 0 }), "got {err:?}");

	let err = decode_from_slice::<BTreeMap<String, i32>>(&[0x81]).expect_err("key missing");
	assert!(matches!(err, MsgpError::Truncated { need: 1, have: 0 }), "got {err:?}");

	let err = decode_from_slice::<Vec<Option<i32>>>(&[0x91]).expect_err("element missing");
	assert!(matches!(err, MsgpError::Truncated { need: 1, have: 0 }), "got {err:?}");
}

#[test]
fn record_cut_before_field_value_is_truncated() {
	let err = decode_from_slice::<Inner>(&[0x81, 0xa4, b'n', b'a', b'm', b'e']).expect_err("value missing");
	assert!(matches!(err, MsgpError::Truncated { need: 1, have: 0 }), "got {err:?}");
	assert!(!err.is_end_of_input());

	let err = decode_from_slice::<Inner>(&[0x82, 0xa1, b's', 0x05]).expect_err("second key missing");
	assert!(matches!(err, MsgpError::Truncated { .. }), "got {err:?}");
}

#[test]
fn end_of_input_between_top_level_values_stays_clean() {
	let mut de = Decoder::new(&[0x91_u8, 0x01][..]);
	assert_eq!(de.decode_dynamic().expect("array decodes"), Value::Array(vec![Value::I64(1)]));
	assert!(de.decode_dynamic().expect_err("stream drained").is_end_of_input());
}

#[test]
fn dynamic_decode_maps_each_family() {
	let bytes = [
		0x99, 0xc0, 0xc3, 0xd0, 0x80, 0xcd, 0x01, 0x00, 0xca, 0x40, 0x20, 0x00, 0x00, 0xa1, b'x', 0xc4, 0x01, 0x07, 0x90, 0x81, 0x01, 0x02,
	];
	let value = decode_dynamic(&bytes[..]).expect("dynamic decodes");
	assert_eq!(
		value,
		Value::Array(vec![
			Value::Null,
			Value::Bool(true),
			Value::I64(-128),
			Value::U64(256),
			Value::F64(2.5),
			Value::String("x".into()),
			Value::Bytes(vec![7]),
			Value::Array(Vec::new()),
			Value::Map(vec![(Value::I64(1), Value::I64(2))]),
		])
	);
}

#[test]
fn malformed_tag_is_reported() {
	let err = decode_dynamic(&[0xc1_u8][..]).expect_err("0xc1 is never used");
	assert!(matches!(err, MsgpError::MalformedTag { tag: 0xc1 }));
}

#[test]
fn short_string_payload_is_truncated() {
	let bytes = [0xda, 0x00, 0x0a, b'h', b'e', b'l', b'l', b'o'];
	let err = decode_from_slice::<String>(&bytes).expect_err("payload is short");
	assert!(matches!(err, MsgpError::Truncated { need: 10, have: 5 }));
}

#[test]
fn length_limit_rejects_before_allocating() {
	let options = DecodeOptions { max_len: 4, ..DecodeOptions::default() };
	let mut de = Decoder::with_options(&[0xdd_u8, 0xff, 0xff, 0xff, 0xff][..], options);
	let err = de.decode_dynamic().expect_err("array exceeds limit");
	assert!(matches!(err, MsgpError::LengthLimitExceeded { len: 0xffff_ffff, max: 4 }));
}

#[test]
fn depth_limit_rejects_deep_nesting_and_recovers() {
	let options = DecodeOptions { max_depth: 2, ..DecodeOptions::default() };
	let bytes = [0x91, 0x91, 0x91, 0xc0, 0x91, 0x91, 0xc0];
	let mut de = Decoder::with_options(&bytes[..], options);
	let err = de.decode_dynamic().expect_err("three levels exceed two");
	assert!(matches!(err, MsgpError::DepthExceeded { max_depth: 2 }));

	assert_eq!(de.decode_dynamic().expect("leftover nil"), Value::Null);
	assert_eq!(de.decode_dynamic().expect("two levels fit").depth(), 2);
	assert!(de.is_at_end().expect("end check"));
}

#[test]
fn record_round_trips_and_drops_unknown_keys() {
	let record = Outer {
		id: 7,
		inner: Some(Inner { name: "n".into(), score: 3 }),
		count: -12,
		on: true,
		skipped: 9,
	};
	let bytes = encode_to_vec(&record).expect("record encodes");
	let decoded = decode_from_slice::<Outer>(&bytes).expect("record decodes");
	assert_eq!(decoded, Outer { skipped: 0, ..record });

	let wire = [0x83, 0xa2, b'i', b'd', 0x05, 0xa5, b'e', b'x', b't', b'r', b'a', 0x92, 0x01, 0x02, 0xa7, b'e', b'n', b'a', b'b', b'l', b'e', b'd', 0xa1, b'T'];
	let decoded = decode_from_slice::<Outer>(&wire).expect("unknown key is skipped");
	assert_eq!(decoded, Outer { id: 5, on: true, ..Outer::default() });
}

#[test]
fn record_decode_resets_previous_contents() {
	let mut target = Outer { id: 1, count: 2, ..Outer::default() };
	Decoder::new(&[0x80_u8][..]).decode_into(&mut target).expect("empty map decodes");
	assert_eq!(target, Outer::default());

	let mut target = Outer { id: 1, ..Outer::default() };
	Decoder::new(&[0xc0_u8][..]).decode_into(&mut target).expect("nil decodes");
	assert_eq!(target, Outer::default());
}

#[test]
fn string_field_nil_literal_resets_and_bad_text_names_field() {
	let wire = [0x82, 0xa2, b'i', b'd', 0x01, 0xa5, b'c', b'o', b'u', b'n', b't', 0xa3, b'n', b'i', b'l'];
	let decoded = decode_from_slice::<Outer>(&wire).expect("nil literal decodes");
	assert_eq!(decoded.count, 0);

	let wire = [0x81, 0xa5, b'c', b'o', b'u', b'n', b't', 0xa2, b'x', b'y'];
	let err = decode_from_slice::<Outer>(&wire).expect_err("xy is not an int");
	match err {
		MsgpError::FieldDecode { record, field, .. } => {
			assert_eq!(record, "Outer");
			assert_eq!(field, "count");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn record_from_non_map_is_type_mismatch() {
	let err = decode_from_slice::<Outer>(&[0x90]).expect_err("array is not a record");
	assert!(matches!(err, MsgpError::TypeMismatch { expected: "map", got: "array" }));
}

#[test]
fn bool_literals_follow_strconv_set() {
	for text in ["1", "t", "T", "TRUE", "true", "True"] {
		assert!(parse_bool_literal(text).expect("true literal"));
	}
	for text in ["0", "f", "F", "FALSE", "false", "False"] {
		assert!(!parse_bool_literal(text).expect("false literal"));
	}
	assert!(matches!(parse_bool_literal("yes"), Err(MsgpError::InvalidText { target: "bool", .. })));
}

#[test]
fn primitive_readers_report_nil_as_absent_headers() {
	let mut de = Decoder::new(&[0xc0_u8, 0x92, 0xc0, 0x81][..]);
	assert_eq!(de.decode_array_len().expect("nil array"), None);
	assert_eq!(de.decode_array_len().expect("fixarray"), Some(2));
	assert_eq!(de.decode_map_len().expect("nil map"), None);
	assert_eq!(de.decode_map_len().expect("fixmap"), Some(1));
	assert!(de.is_at_end().expect("end check"));
}

#[test]
fn peek_tag_leaves_value_in_place() {
	let mut de = Decoder::new(&[0xa1_u8, b'z'][..]);
	assert_eq!(de.peek_tag().expect("peek"), Some(crate::codec::tag::Tag::FixStr(1)));
	assert_eq!(de.decode_string().expect("string follows peek"), "z");
	assert_eq!(de.peek_tag().expect("peek at end"), None);
}
