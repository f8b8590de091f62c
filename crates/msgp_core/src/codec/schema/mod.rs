use std::collections::HashMap;
use std::io::{Read, Write};

use crate::codec::{Decoder, Result};

/// Resolved wire behavior of one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
	/// Declared Rust field identifier.
	pub ident: &'static str,
	/// Key written to and matched from the wire.
	pub wire_name: String,
	/// Field never appears on the wire and is never matched.
	pub skip: bool,
	/// Field is left out of encoded output while it holds its zero value.
	pub omit_if_zero: bool,
	/// Field value travels as a decimal/literal string.
	pub encode_as_string: bool,
}

/// Parse one `name,opt1,opt2` field annotation.
///
/// `-` alone skips the field. `-` followed by options is the literal wire
/// name `_`, and the options still apply. An empty name keeps the declared
/// identifier. Unknown options are ignored.
pub fn parse_field_annotation(ident: &'static str, annotation: &str) -> FieldSchema {
	let (name, options) = match annotation.split_once(',') {
		Some((name, options)) => (name.trim(), options),
		None => (annotation.trim(), ""),
	};

	let mut field = FieldSchema {
		ident,
		wire_name: ident.to_owned(),
		skip: false,
		omit_if_zero: false,
		encode_as_string: false,
	};

	if name == "-" {
		if options.trim().is_empty() {
			field.skip = true;
		} else {
			field.wire_name = "_".to_owned();
		}
	} else if !name.is_empty() {
		field.wire_name = name.to_owned();
	}

	for option in options.split(',').map(str::trim) {
		match option {
			"omitempty" => field.omit_if_zero = true,
			"string" => field.encode_as_string = true,
			_ => {}
		}
	}

	field
}

/// Field schema of one record type, built once and cached per type.
#[derive(Debug)]
pub struct RecordSchema {
	/// Record type name.
	pub name: &'static str,
	fields: Vec<FieldSchema>,
	by_wire_name: HashMap<String, usize>,
}

impl RecordSchema {
	/// Build a schema from `(identifier, annotation)` pairs in declaration order.
	pub fn new(name: &'static str, declared: &[(&'static str, &str)]) -> Self {
		let fields: Vec<FieldSchema> = declared.iter().map(|&(ident, annotation)| parse_field_annotation(ident, annotation)).collect();

		let mut by_wire_name = HashMap::with_capacity(fields.len());
		for (idx, field) in fields.iter().enumerate() {
			if field.skip {
				continue;
			}
			by_wire_name.insert(field.wire_name.clone(), idx);
		}

		Self { name, fields, by_wire_name }
	}

	/// All declared fields, skipped ones included, in declaration order.
	pub fn fields(&self) -> &[FieldSchema] {
		&self.fields
	}

	/// Resolve a wire key to a non-skipped field; later duplicates win.
	pub fn lookup(&self, wire_name: &str) -> Option<&FieldSchema> {
		self.by_wire_name.get(wire_name).map(|idx| &self.fields[*idx])
	}
}

/// Struct-like type encoded as a map of wire field names to field values.
///
/// Implemented through [`record!`](crate::record); the methods dispatch on the
/// declared field identifier stored in [`FieldSchema::ident`].
pub trait Record: Default {
	/// Cached schema for this type.
	fn schema() -> &'static RecordSchema;

	/// Return `true` when the field holds its zero value.
	fn field_is_zero(&self, ident: &str) -> bool;

	/// Encode the field value.
	fn encode_field<W: Write + ?Sized>(&self, ident: &str, sink: &mut W) -> Result<()>;

	/// Render the field value for the `string` option.
	fn encode_field_text(&self, ident: &str) -> Result<String>;

	/// Decode one wire value into the field.
	fn decode_field<R: Read>(&mut self, ident: &str, de: &mut Decoder<R>) -> Result<()>;

	/// Parse `text` into the field for the `string` option.
	fn assign_field_text(&mut self, ident: &str, text: &str) -> Result<()>;

	/// Reset the field to its zero value.
	fn reset_field(&mut self, ident: &str);
}

/// Implement [`Record`], [`Encode`](crate::codec::Encode) and
/// [`Decode`](crate::codec::Decode) for an existing `Default` struct.
///
/// Each listed field carries an annotation string (`""`, `"name"`, `"-"`,
/// `"name,omitempty,string"`, ...). Unlisted fields stay off the wire.
///
/// ```
/// #[derive(Debug, Default, PartialEq)]
/// struct Sample {
/// 	aaa: String,
/// 	ccc: String,
/// 	ddd: i64,
/// }
///
/// msgp::record!(Sample {
/// 	aaa: "AAA",
/// 	ccc: "ccc,omitempty",
/// 	ddd: "-",
/// });
///
/// let bytes = msgp::codec::encode_to_vec(&Sample { aaa: "x".into(), ccc: String::new(), ddd: 9 }).unwrap();
/// assert_eq!(bytes, [0x81, 0xa3, b'A', b'A', b'A', 0xa1, b'x']);
/// ```
#[macro_export]
macro_rules! record {
	($name:ident { $($field:ident : $annotation:literal),+ $(,)? }) => {
		impl $crate::codec::Record for $name {
			fn schema() -> &'static $crate::codec::RecordSchema {
				static SCHEMA: ::std::sync::OnceLock<$crate::codec::RecordSchema> = ::std::sync::OnceLock::new();
				SCHEMA.get_or_init(|| $crate::codec::RecordSchema::new(stringify!($name), &[$((stringify!($field), $annotation)),+]))
			}

			fn field_is_zero(&self, ident: &str) -> bool {
				$(if ident == stringify!($field) {
					return $crate::codec::Encode::is_zero(&self.$field);
				})+
				false
			}

			fn encode_field<W: ::std::io::Write + ?Sized>(&self, ident: &str, sink: &mut W) -> $crate::codec::Result<()> {
				$(if ident == stringify!($field) {
					return $crate::codec::Encode::encode(&self.$field, sink);
				})+
				Ok(())
			}

			fn encode_field_text(&self, ident: &str) -> $crate::codec::Result<String> {
				$(if ident == stringify!($field) {
					return $crate::codec::Encode::encode_text(&self.$field);
				})+
				Ok(String::new())
			}

			fn decode_field<R: ::std::io::Read>(&mut self, ident: &str, de: &mut $crate::codec::Decoder<R>) -> $crate::codec::Result<()> {
				$(if ident == stringify!($field) {
					return $crate::codec::Decode::decode(&mut self.$field, de);
				})+
				Ok(())
			}

			fn assign_field_text(&mut self, ident: &str, text: &str) -> $crate::codec::Result<()> {
				$(if ident == stringify!($field) {
					return $crate::codec::Decode::assign_text(&mut self.$field, text);
				})+
				Ok(())
			}

			fn reset_field(&mut self, ident: &str) {
				$(if ident == stringify!($field) {
					$crate::codec::Decode::reset(&mut self.$field);
					return;
				})+
			}
		}

		impl $crate::codec::Encode for $name {
			fn encode<W: ::std::io::Write + ?Sized>(&self, sink: &mut W) -> $crate::codec::Result<()> {
				$crate::codec::encode_record(self, sink)
			}

			fn is_zero(&self) -> bool {
				$crate::codec::record_is_zero(self)
			}
		}

		impl $crate::codec::Decode for $name {
			fn decode<R: ::std::io::Read>(&mut self, de: &mut $crate::codec::Decoder<R>) -> $crate::codec::Result<()> {
				$crate::codec::decode_record(self, de)
			}

			fn reset(&mut self) {
				*self = <Self as ::std::default::Default>::default();
			}
		}
	};
}
