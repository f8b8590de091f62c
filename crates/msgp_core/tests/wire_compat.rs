use std::collections::HashMap;

use msgp::codec::{Decoder, MsgpError, Value, decode_dynamic, decode_from_slice, decode_into, encode_to_vec, encode_value};
use msgp_testkit::{from_hex, hex};

#[derive(Debug, Default, PartialEq)]
struct Legacy {
	aaa: String,
	bbb: i64,
	ccc: String,
	ddd: i64,
	fff: i32,
	ggg: i32,
	hhh: i32,
	iii: i32,
}

msgp::record!(Legacy {
	aaa: "AAA",
	bbb: "BBB",
	ccc: "ccc",
	ddd: "-",
	fff: "-,omitempty",
	ggg: "GGG,omitempty",
	hhh: "HHH,string",
	iii: "III,omitempty",
});

#[derive(Debug, Default, PartialEq)]
struct Basic {
	aaa: String,
	bbb: i64,
	ccc: String,
	ddd: i64,
}

msgp::record!(Basic {
	aaa: "AAA",
	bbb: "BBB",
	ccc: "ccc",
	ddd: "-",
});

#[derive(Debug, Default, PartialEq)]
struct Counter {
	hits: i64,
}

msgp::record!(Counter { hits: ",string" });

fn encode_hex<T: msgp::codec::Encode>(value: &T) -> String {
	hex(&encode_to_vec(value).expect("value encodes"))
}

#[test]
fn minimal_width_integers() {
	assert_eq!(encode_hex(&127_i64), "7f");
	assert_eq!(encode_hex(&128_i64), "cc 80");
	assert_eq!(encode_hex(&200_i32), "cc c8");
	assert_eq!(encode_hex(&-32_i64), "e0");
	assert_eq!(encode_hex(&-33_i64), "d0 df");
	assert_eq!(encode_hex(&i32::MAX), "d2 7f ff ff ff");
	assert_eq!(encode_hex(&u32::MAX), "ce ff ff ff ff");
}

#[test]
fn string_boundary_between_fixstr_and_str8() {
	let short = "1234567890123456789012345678901";
	let long = "12345678901234567890123456789012";
	assert_eq!(encode_to_vec(short).expect("fixstr")[0], 0xbf);
	assert_eq!(encode_to_vec(long).expect("str8")[..2], [0xd9, 0x20]);
}

#[test]
fn nil_is_absorbed_by_every_container_target() {
	let nil = [0xc0_u8];
	assert_eq!(decode_from_slice::<[u8; 1]>(&nil).expect("byte array"), [0]);
	assert_eq!(decode_from_slice::<Vec<u8>>(&nil).expect("byte vec"), Vec::<u8>::new());
	assert_eq!(decode_from_slice::<HashMap<String, i64>>(&nil).expect("map"), HashMap::new());
	assert_eq!(decode_from_slice::<Option<Box<bool>>>(&nil).expect("pointer"), None);
	assert_eq!(decode_dynamic(&nil[..]).expect("dynamic"), Value::Null);
}

#[test]
fn legacy_record_bytes_are_stable() {
	let record = Legacy {
		aaa: "1234567890".into(),
		bbb: 0xff,
		ccc: "12345".into(),
		ddd: 0x11,
		fff: 0x22,
		ggg: 0x33,
		hhh: 100,
		iii: 0,
	};
	let expected = "86 a3 41 41 41 aa 31 32 33 34 35 36 37 38 39 30 a3 42 42 42 cc ff a3 63 63 63 a5 31 32 33 34 35 a1 5f 22 a3 47 47 47 33 a3 48 48 48 a3 31 30 30";
	assert_eq!(encode_hex(&record), expected);

	let decoded = decode_from_slice::<Legacy>(&from_hex(expected)).expect("legacy bytes decode");
	assert_eq!(decoded, Legacy { ddd: 0, ..record });
}

#[test]
fn skipped_field_never_round_trips() {
	let record = Basic {
		aaa: "x".into(),
		bbb: 1,
		ccc: "y".into(),
		ddd: 99,
	};
	let bytes = encode_to_vec(&record).expect("record encodes");
	let decoded = decode_from_slice::<Basic>(&bytes).expect("record decodes");
	assert_eq!(decoded, Basic { ddd: 0, ..record });

	let keys: Vec<String> = decode_dynamic(&bytes[..])
		.expect("dynamic view")
		.as_map()
		.expect("record is a map")
		.iter()
		.filter_map(|(key, _)| key.as_str().map(str::to_owned))
		.collect();
	assert_eq!(keys, ["AAA", "BBB", "ccc"]);
}

#[test]
fn string_encoded_integer_field() {
	let bytes = encode_to_vec(&Counter { hits: 100 }).expect("counter encodes");
	assert_eq!(hex(&bytes), "81 a4 68 69 74 73 a3 31 30 30");
	assert_eq!(decode_from_slice::<Counter>(&bytes).expect("counter decodes"), Counter { hits: 100 });

	let nil_text = from_hex("81 a4 68 69 74 73 a3 6e 69 6c");
	let mut target = Counter { hits: 5 };
	decode_into(&nil_text[..], &mut target).expect("nil literal decodes");
	assert_eq!(target.hits, 0);
}

#[test]
fn optional_then_present_from_one_stream() {
	let mut stream = Vec::new();
	encode_value(&mut stream, &None::<String>).expect("absent encodes");
	encode_value(&mut stream, &Some("some text".to_owned())).expect("present encodes");

	let mut de = Decoder::new(&stream[..]);
	let mut first: Option<String> = Some("stale".into());
	let mut second: Option<String> = None;
	de.decode_into(&mut first).expect("absent decodes");
	de.decode_into(&mut second).expect("present decodes");
	assert_eq!(first, None);
	assert_eq!(second.as_deref(), Some("some text"));

	let err = de.decode_dynamic().expect_err("stream is drained");
	assert!(err.is_end_of_input());
}

#[test]
fn short_str16_payload_is_truncated_not_short() {
	let bytes = from_hex("da 00 0a 68 65 6c 6c 6f");
	let err = decode_from_slice::<String>(&bytes).expect_err("five of ten bytes");
	assert!(matches!(err, MsgpError::Truncated { need: 10, have: 5 }));

	let err = decode_dynamic(&bytes[..]).expect_err("dynamic path agrees");
	assert!(matches!(err, MsgpError::Truncated { .. }));
}

#[test]
fn truncated_scalar_mid_value() {
	let err = decode_from_slice::<u32>(&from_hex("ce ff ff")).expect_err("two of four bytes");
	assert!(matches!(err, MsgpError::Truncated { need: 4, have: 2 }));
}

#[test]
fn typed_values_round_trip() {
	let mut map = HashMap::new();
	map.insert("a".to_owned(), vec![1.5_f64, -0.25]);
	map.insert("b".to_owned(), Vec::new());
	let bytes = encode_to_vec(&map).expect("map encodes");
	assert_eq!(decode_from_slice::<HashMap<String, Vec<f64>>>(&bytes).expect("map decodes"), map);

	let nested = vec![Some(vec![1_u8, 2, 3]), None, Some(Vec::new())];
	let bytes = encode_to_vec(&nested).expect("nested encodes");
	assert_eq!(decode_from_slice::<Vec<Option<Vec<u8>>>>(&bytes).expect("nested decodes"), nested);

	let value = Value::Map(vec![
		(Value::from("k"), Value::Array(vec![Value::I64(-70000), Value::U64(u64::MAX), Value::Bytes(vec![0; 40])])),
		(Value::from("k"), Value::Null),
	]);
	let bytes = encode_to_vec(&value).expect("value encodes");
	assert_eq!(decode_dynamic(&bytes[..]).expect("value decodes"), value);
}
