use crate::codec::{MsgpError, Result};

// Nil and booleans
/// Nil marker.
pub const NIL: u8 = 0xc0;
/// Boolean `false`.
pub const FALSE: u8 = 0xc2;
/// Boolean `true`.
pub const TRUE: u8 = 0xc3;

// Binary blobs
/// Binary blob with 1-byte length.
pub const BIN8: u8 = 0xc4;
/// Binary blob with 2-byte length.
pub const BIN16: u8 = 0xc5;
/// Binary blob with 4-byte length.
pub const BIN32: u8 = 0xc6;

// IEEE 754 floats
/// Single-precision float.
pub const FLOAT32: u8 = 0xca;
/// Double-precision float.
pub const FLOAT64: u8 = 0xcb;

// Unsigned integers
/// Unsigned 8-bit integer.
pub const UINT8: u8 = 0xcc;
/// Unsigned 16-bit integer.
pub const UINT16: u8 = 0xcd;
/// Unsigned 32-bit integer.
pub const UINT32: u8 = 0xce;
/// Unsigned 64-bit integer.
pub const UINT64: u8 = 0xcf;

// Signed integers
/// Signed 8-bit integer.
pub const INT8: u8 = 0xd0;
/// Signed 16-bit integer.
pub const INT16: u8 = 0xd1;
/// Signed 32-bit integer.
pub const INT32: u8 = 0xd2;
/// Signed 64-bit integer.
pub const INT64: u8 = 0xd3;

// Strings
/// UTF-8 string with 1-byte length.
pub const STR8: u8 = 0xd9;
/// UTF-8 string with 2-byte length.
pub const STR16: u8 = 0xda;
/// UTF-8 string with 4-byte length.
pub const STR32: u8 = 0xdb;

// Containers
/// Array with 2-byte element count.
pub const ARRAY16: u8 = 0xdc;
/// Array with 4-byte element count.
pub const ARRAY32: u8 = 0xdd;
/// Map with 2-byte pair count.
pub const MAP16: u8 = 0xde;
/// Map with 4-byte pair count.
pub const MAP32: u8 = 0xdf;

// Fix-form prefixes; the low bits carry the value or length.
/// Positive fixint range is `0x00..=0x7f`.
pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;
/// Negative fixint prefix (`0xe0..=0xff`, -32..=-1).
pub const NEGATIVE_FIXINT_PREFIX: u8 = 0xe0;
/// FixStr prefix (`0xa0..=0xbf`, 0..=31 bytes).
pub const FIXSTR_PREFIX: u8 = 0xa0;
/// FixArray prefix (`0x90..=0x9f`, 0..=15 elements).
pub const FIXARRAY_PREFIX: u8 = 0x90;
/// FixMap prefix (`0x80..=0x8f`, 0..=15 pairs).
pub const FIXMAP_PREFIX: u8 = 0x80;

/// Largest length stored directly in a FixStr tag.
pub const FIXSTR_MAX_LEN: usize = 0x1f;
/// Largest count stored directly in a FixArray or FixMap tag.
pub const FIXCONTAINER_MAX_LEN: usize = 0x0f;

/// Decoded leading tag, one variant per wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
	/// `0xc0`.
	Nil,
	/// `0xc2` / `0xc3`.
	Bool(bool),
	/// `0x00..=0x7f`, value carried in the tag.
	PositiveFixInt(u8),
	/// `0xe0..=0xff`, value carried in the tag.
	NegativeFixInt(i8),
	/// `0xd0`.
	Int8,
	/// `0xd1`.
	Int16,
	/// `0xd2`.
	Int32,
	/// `0xd3`.
	Int64,
	/// `0xcc`.
	UInt8,
	/// `0xcd`.
	UInt16,
	/// `0xce`.
	UInt32,
	/// `0xcf`.
	UInt64,
	/// `0xca`.
	Float32,
	/// `0xcb`.
	Float64,
	/// `0xa0..=0xbf`, byte length carried in the tag.
	FixStr(u8),
	/// `0xd9`.
	Str8,
	/// `0xda`.
	Str16,
	/// `0xdb`.
	Str32,
	/// `0xc4`.
	Bin8,
	/// `0xc5`.
	Bin16,
	/// `0xc6`.
	Bin32,
	/// `0x90..=0x9f`, element count carried in the tag.
	FixArray(u8),
	/// `0xdc`.
	Array16,
	/// `0xdd`.
	Array32,
	/// `0x80..=0x8f`, pair count carried in the tag.
	FixMap(u8),
	/// `0xde`.
	Map16,
	/// `0xdf`.
	Map32,
}

/// Coarse wire family a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
	/// Nil marker.
	Nil,
	/// Boolean.
	Bool,
	/// Signed integer, including both fixint forms.
	Int,
	/// Unsigned integer.
	UInt,
	/// Float32 or Float64.
	Float,
	/// String.
	Str,
	/// Binary blob.
	Bin,
	/// Array.
	Array,
	/// Map.
	Map,
}

impl Family {
	/// Stable lowercase label used in errors and reports.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Nil => "nil",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::UInt => "uint",
			Self::Float => "float",
			Self::Str => "str",
			Self::Bin => "bin",
			Self::Array => "array",
			Self::Map => "map",
		}
	}
}

/// Where a variable-size form stores its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthField {
	/// Length packed into the tag's low bits.
	Inline(usize),
	/// Big-endian length suffix of the given byte width.
	Prefix(usize),
}

impl Tag {
	/// Classify one leading byte.
	///
	/// Exact single-purpose tags are matched before the fix-form masks, since
	/// `0xc0..=0xdf` would otherwise fall into no family or the wrong one.
	pub fn from_byte(head: u8) -> Result<Self> {
		let tag = match head {
			NIL => Self::Nil,
			FALSE => Self::Bool(false),
			TRUE => Self::Bool(true),
			BIN8 => Self::Bin8,
			BIN16 => Self::Bin16,
			BIN32 => Self::Bin32,
			FLOAT32 => Self::Float32,
			FLOAT64 => Self::Float64,
			UINT8 => Self::UInt8,
			UINT16 => Self::UInt16,
			UINT32 => Self::UInt32,
			UINT64 => Self::UInt64,
			INT8 => Self::Int8,
			INT16 => Self::Int16,
			INT32 => Self::Int32,
			INT64 => Self::Int64,
			STR8 => Self::Str8,
			STR16 => Self::Str16,
			STR32 => Self::Str32,
			ARRAY16 => Self::Array16,
			ARRAY32 => Self::Array32,
			MAP16 => Self::Map16,
			MAP32 => Self::Map32,
			_ if head & 0x80 == 0 => Self::PositiveFixInt(head),
			_ if head & 0xe0 == NEGATIVE_FIXINT_PREFIX => Self::NegativeFixInt(head as i8),
			_ if head & 0xe0 == FIXSTR_PREFIX => Self::FixStr(head & 0x1f),
			_ if head & 0xf0 == FIXARRAY_PREFIX => Self::FixArray(head & 0x0f),
			_ if head & 0xf0 == FIXMAP_PREFIX => Self::FixMap(head & 0x0f),
			_ => return Err(MsgpError::MalformedTag { tag: head }),
		};
		Ok(tag)
	}

	/// Render the tag back to its leading byte.
	pub fn to_byte(self) -> u8 {
		match self {
			Self::Nil => NIL,
			Self::Bool(false) => FALSE,
			Self::Bool(true) => TRUE,
			Self::PositiveFixInt(value) => value & POSITIVE_FIXINT_MAX,
			Self::NegativeFixInt(value) => (value as u8) | NEGATIVE_FIXINT_PREFIX,
			Self::Int8 => INT8,
			Self::Int16 => INT16,
			Self::Int32 => INT32,
			Self::Int64 => INT64,
			Self::UInt8 => UINT8,
			Self::UInt16 => UINT16,
			Self::UInt32 => UINT32,
			Self::UInt64 => UINT64,
			Self::Float32 => FLOAT32,
			Self::Float64 => FLOAT64,
			Self::FixStr(len) => FIXSTR_PREFIX | (len & 0x1f),
			Self::Str8 => STR8,
			Self::Str16 => STR16,
			Self::Str32 => STR32,
			Self::Bin8 => BIN8,
			Self::Bin16 => BIN16,
			Self::Bin32 => BIN32,
			Self::FixArray(len) => FIXARRAY_PREFIX | (len & 0x0f),
			Self::Array16 => ARRAY16,
			Self::Array32 => ARRAY32,
			Self::FixMap(len) => FIXMAP_PREFIX | (len & 0x0f),
			Self::Map16 => MAP16,
			Self::Map32 => MAP32,
		}
	}

	/// Return the wire family of this tag.
	pub fn family(self) -> Family {
		match self {
			Self::Nil => Family::Nil,
			Self::Bool(_) => Family::Bool,
			Self::PositiveFixInt(_) | Self::NegativeFixInt(_) | Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => Family::Int,
			Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => Family::UInt,
			Self::Float32 | Self::Float64 => Family::Float,
			Self::FixStr(_) | Self::Str8 | Self::Str16 | Self::Str32 => Family::Str,
			Self::Bin8 | Self::Bin16 | Self::Bin32 => Family::Bin,
			Self::FixArray(_) | Self::Array16 | Self::Array32 => Family::Array,
			Self::FixMap(_) | Self::Map16 | Self::Map32 => Family::Map,
		}
	}

	/// Return how the length of a string, binary, array or map form is stored.
	pub fn length_field(self) -> Option<LengthField> {
		match self {
			Self::FixStr(len) | Self::FixArray(len) | Self::FixMap(len) => Some(LengthField::Inline(usize::from(len))),
			Self::Str8 | Self::Bin8 => Some(LengthField::Prefix(1)),
			Self::Str16 | Self::Bin16 | Self::Array16 | Self::Map16 => Some(LengthField::Prefix(2)),
			Self::Str32 | Self::Bin32 | Self::Array32 | Self::Map32 => Some(LengthField::Prefix(4)),
			_ => None,
		}
	}

	/// Return the fixed payload width of a scalar form, in bytes.
	pub fn scalar_width(self) -> Option<usize> {
		match self {
			Self::Nil | Self::Bool(_) | Self::PositiveFixInt(_) | Self::NegativeFixInt(_) => Some(0),
			Self::Int8 | Self::UInt8 => Some(1),
			Self::Int16 | Self::UInt16 => Some(2),
			Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
			Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
			_ => None,
		}
	}
}
