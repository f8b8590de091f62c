use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use crate::codec::tag::{self, Tag};
use crate::codec::wire::{write_f32, write_f64, write_i8, write_i16, write_i32, write_i64, write_payload, write_tag, write_u8, write_u16, write_u32, write_u64};
use crate::codec::{MsgpError, Record, Result, Value};

/// Largest length any 32-bit length prefix can carry.
const MAX_WIRE_LEN: usize = u32::MAX as usize;

/// Shape with a static wire encoding.
pub trait Encode {
	/// Append the wire form of `self` to `sink`.
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()>;

	/// Return `true` when `self` holds its zero value (`omitempty`).
	fn is_zero(&self) -> bool {
		false
	}

	/// Render `self` as text for a field carrying the `string` option.
	fn encode_text(&self) -> Result<String> {
		Err(MsgpError::UnsupportedShape { shape: type_name::<Self>() })
	}

	/// Encode a slice of `Self`; sequences write an Array unless overridden.
	fn encode_slice<W: Write + ?Sized>(items: &[Self], sink: &mut W) -> Result<()>
	where
		Self: Sized,
	{
		encode_array_len(sink, items.len())?;
		for item in items {
			item.encode(sink)?;
		}
		Ok(())
	}
}

/// Encode one value into `sink`.
pub fn encode_value<T: Encode + ?Sized, W: Write + ?Sized>(sink: &mut W, value: &T) -> Result<()> {
	value.encode(sink)
}

/// Encode one value into a fresh buffer.
pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	value.encode(&mut out)?;
	Ok(out)
}

/// Write the Nil marker.
pub fn encode_nil<W: Write + ?Sized>(sink: &mut W) -> Result<()> {
	write_tag(sink, Tag::Nil)
}

/// Write a boolean.
pub fn encode_bool<W: Write + ?Sized>(sink: &mut W, value: bool) -> Result<()> {
	write_tag(sink, Tag::Bool(value))
}

/// Write a signed integer in its minimal form.
///
/// Non-negative values interleave signed and unsigned tags: `128..=255` is
/// `UInt8`, `32768..=65535` is `UInt16` and `2^31..=2^32-1` is `UInt32`. Other
/// readers of the format depend on these exact bytes.
pub fn encode_int<W: Write + ?Sized>(sink: &mut W, value: i64) -> Result<()> {
	if value >= 0 {
		if value <= i64::from(tag::POSITIVE_FIXINT_MAX) {
			write_tag(sink, Tag::PositiveFixInt(value as u8))
		} else if value <= i64::from(u8::MAX) {
			write_tag(sink, Tag::UInt8)?;
			write_u8(sink, value as u8)
		} else if value <= i64::from(i16::MAX) {
			write_tag(sink, Tag::Int16)?;
			write_i16(sink, value as i16)
		} else if value <= i64::from(u16::MAX) {
			write_tag(sink, Tag::UInt16)?;
			write_u16(sink, value as u16)
		} else if value <= i64::from(i32::MAX) {
			write_tag(sink, Tag::Int32)?;
			write_i32(sink, value as i32)
		} else if value <= i64::from(u32::MAX) {
			write_tag(sink, Tag::UInt32)?;
			write_u32(sink, value as u32)
		} else {
			write_tag(sink, Tag::Int64)?;
			write_i64(sink, value)
		}
	} else if value >= -32 {
		write_tag(sink, Tag::NegativeFixInt(value as i8))
	} else if value >= i64::from(i8::MIN) {
		write_tag(sink, Tag::Int8)?;
		write_i8(sink, value as i8)
	} else if value >= i64::from(i16::MIN) {
		write_tag(sink, Tag::Int16)?;
		write_i16(sink, value as i16)
	} else if value >= i64::from(i32::MIN) {
		write_tag(sink, Tag::Int32)?;
		write_i32(sink, value as i32)
	} else {
		write_tag(sink, Tag::Int64)?;
		write_i64(sink, value)
	}
}

/// Write an unsigned integer as the smallest of `UInt8..UInt64`.
pub fn encode_uint<W: Write + ?Sized>(sink: &mut W, value: u64) -> Result<()> {
	if value <= u64::from(u8::MAX) {
		write_tag(sink, Tag::UInt8)?;
		write_u8(sink, value as u8)
	} else if value <= u64::from(u16::MAX) {
		write_tag(sink, Tag::UInt16)?;
		write_u16(sink, value as u16)
	} else if value <= u64::from(u32::MAX) {
		write_tag(sink, Tag::UInt32)?;
		write_u32(sink, value as u32)
	} else {
		write_tag(sink, Tag::UInt64)?;
		write_u64(sink, value)
	}
}

/// Write a single-precision float.
pub fn encode_f32<W: Write + ?Sized>(sink: &mut W, value: f32) -> Result<()> {
	write_tag(sink, Tag::Float32)?;
	write_f32(sink, value)
}

/// Write a double-precision float.
pub fn encode_f64<W: Write + ?Sized>(sink: &mut W, value: f64) -> Result<()> {
	write_tag(sink, Tag::Float64)?;
	write_f64(sink, value)
}

/// Write a string as `FixStr`, `Str8`, `Str16` or `Str32` by byte length.
pub fn encode_str<W: Write + ?Sized>(sink: &mut W, value: &str) -> Result<()> {
	let len = value.len();
	if len <= tag::FIXSTR_MAX_LEN {
		write_tag(sink, Tag::FixStr(len as u8))?;
	} else if len <= usize::from(u8::MAX) {
		write_tag(sink, Tag::Str8)?;
		write_u8(sink, len as u8)?;
	} else if len <= usize::from(u16::MAX) {
		write_tag(sink, Tag::Str16)?;
		write_u16(sink, len as u16)?;
	} else if len <= MAX_WIRE_LEN {
		write_tag(sink, Tag::Str32)?;
		write_u32(sink, len as u32)?;
	} else {
		return Err(MsgpError::ValueTooLarge { len, max: MAX_WIRE_LEN });
	}
	write_payload(sink, value.as_bytes())
}

/// Write a byte buffer as `Bin8`, `Bin16` or `Bin32` by length.
pub fn encode_bin<W: Write + ?Sized>(sink: &mut W, value: &[u8]) -> Result<()> {
	let len = value.len();
	if len <= usize::from(u8::MAX) {
		write_tag(sink, Tag::Bin8)?;
		write_u8(sink, len as u8)?;
	} else if len <= usize::from(u16::MAX) {
		write_tag(sink, Tag::Bin16)?;
		write_u16(sink, len as u16)?;
	} else if len <= MAX_WIRE_LEN {
		write_tag(sink, Tag::Bin32)?;
		write_u32(sink, len as u32)?;
	} else {
		return Err(MsgpError::ValueTooLarge { len, max: MAX_WIRE_LEN });
	}
	write_payload(sink, value)
}

/// Write an array header for `len` elements.
pub fn encode_array_len<W: Write + ?Sized>(sink: &mut W, len: usize) -> Result<()> {
	if len <= tag::FIXCONTAINER_MAX_LEN {
		write_tag(sink, Tag::FixArray(len as u8))
	} else if len <= usize::from(u16::MAX) {
		write_tag(sink, Tag::Array16)?;
		write_u16(sink, len as u16)
	} else if len <= MAX_WIRE_LEN {
		write_tag(sink, Tag::Array32)?;
		write_u32(sink, len as u32)
	} else {
		Err(MsgpError::ValueTooLarge { len, max: MAX_WIRE_LEN })
	}
}

/// Write a map header for `len` key/value pairs.
pub fn encode_map_len<W: Write + ?Sized>(sink: &mut W, len: usize) -> Result<()> {
	if len <= tag::FIXCONTAINER_MAX_LEN {
		write_tag(sink, Tag::FixMap(len as u8))
	} else if len <= usize::from(u16::MAX) {
		write_tag(sink, Tag::Map16)?;
		write_u16(sink, len as u16)
	} else if len <= MAX_WIRE_LEN {
		write_tag(sink, Tag::Map32)?;
		write_u32(sink, len as u32)
	} else {
		Err(MsgpError::ValueTooLarge { len, max: MAX_WIRE_LEN })
	}
}

/// Encode a record as a map of its emitted fields.
///
/// Skipped fields and `omitempty` fields holding zero are filtered before the
/// map header is written, so the header count matches the emitted pairs.
pub fn encode_record<T: Record, W: Write + ?Sized>(record: &T, sink: &mut W) -> Result<()> {
	let schema = T::schema();
	let emitted: Vec<_> = schema
		.fields()
		.iter()
		.filter(|field| !field.skip && !(field.omit_if_zero && record.field_is_zero(field.ident)))
		.collect();

	encode_map_len(sink, emitted.len())?;
	for field in emitted {
		encode_str(sink, &field.wire_name)?;
		if field.encode_as_string {
			let text = record.encode_field_text(field.ident)?;
			encode_str(sink, &text)?;
		} else {
			record.encode_field(field.ident, sink)?;
		}
	}
	Ok(())
}

/// Return `true` when every declared field of `record` holds zero.
pub fn record_is_zero<T: Record>(record: &T) -> bool {
	T::schema().fields().iter().all(|field| record.field_is_zero(field.ident))
}

impl Encode for bool {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_bool(sink, *self)
	}

	fn is_zero(&self) -> bool {
		!*self
	}

	fn encode_text(&self) -> Result<String> {
		Ok(self.to_string())
	}
}

macro_rules! encode_signed {
	($($ty:ty),*) => {$(
		impl Encode for $ty {
			fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
				encode_int(sink, *self as i64)
			}

			fn is_zero(&self) -> bool {
				*self == 0
			}

			fn encode_text(&self) -> Result<String> {
				Ok(self.to_string())
			}
		}
	)*};
}

macro_rules! encode_unsigned {
	($($ty:ty),*) => {$(
		impl Encode for $ty {
			fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
				encode_uint(sink, *self as u64)
			}

			fn is_zero(&self) -> bool {
				*self == 0
			}

			fn encode_text(&self) -> Result<String> {
				Ok(self.to_string())
			}
		}
	)*};
}

encode_signed!(i8, i16, i32, i64, isize);
encode_unsigned!(u16, u32, u64, usize);

impl Encode for u8 {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_uint(sink, u64::from(*self))
	}

	fn is_zero(&self) -> bool {
		*self == 0
	}

	fn encode_text(&self) -> Result<String> {
		Ok(self.to_string())
	}

	fn encode_slice<W: Write + ?Sized>(items: &[Self], sink: &mut W) -> Result<()> {
		encode_bin(sink, items)
	}
}

impl Encode for f32 {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_f32(sink, *self)
	}

	fn is_zero(&self) -> bool {
		*self == 0.0
	}

	fn encode_text(&self) -> Result<String> {
		Ok(shortest_float_text(&format!("{self:e}")))
	}
}

impl Encode for f64 {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_f64(sink, *self)
	}

	fn is_zero(&self) -> bool {
		*self == 0.0
	}

	fn encode_text(&self) -> Result<String> {
		Ok(shortest_float_text(&format!("{self:e}")))
	}
}

/// Rewrite Rust's shortest `{:e}` rendering in `%g` layout: plain digits for
/// exponents in `-4..6`, otherwise `d.ddde±XX` with at least two exponent digits.
fn shortest_float_text(scientific: &str) -> String {
	match scientific {
		"NaN" => return "NaN".to_owned(),
		"inf" => return "+Inf".to_owned(),
		"-inf" => return "-Inf".to_owned(),
		_ => {}
	}

	let (mantissa, exp) = scientific.split_once('e').unwrap_or((scientific, "0"));
	let exp: i32 = exp.parse().unwrap_or(0);
	let (sign, mantissa) = match mantissa.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", mantissa),
	};
	let digits: String = mantissa.chars().filter(|ch| *ch != '.').collect();

	if !(-4..6).contains(&exp) {
		let (lead, rest) = digits.split_at(1);
		let dot = if rest.is_empty() { "" } else { "." };
		let exp_sign = if exp < 0 { '-' } else { '+' };
		return format!("{sign}{lead}{dot}{rest}e{exp_sign}{:02}", exp.unsigned_abs());
	}
	if exp < 0 {
		let zeros = "0".repeat(exp.unsigned_abs() as usize - 1);
		return format!("{sign}0.{zeros}{digits}");
	}

	let int_len = exp as usize + 1;
	if digits.len() <= int_len {
		let zeros = "0".repeat(int_len - digits.len());
		format!("{sign}{digits}{zeros}")
	} else {
		let (int, frac) = digits.split_at(int_len);
		format!("{sign}{int}.{frac}")
	}
}

impl Encode for str {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_str(sink, self)
	}

	fn is_zero(&self) -> bool {
		self.is_empty()
	}

	fn encode_text(&self) -> Result<String> {
		Ok(self.to_owned())
	}
}

impl Encode for String {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_str(sink, self)
	}

	fn is_zero(&self) -> bool {
		self.is_empty()
	}

	fn encode_text(&self) -> Result<String> {
		Ok(self.clone())
	}
}

impl<T: Encode> Encode for [T] {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		T::encode_slice(self, sink)
	}

	fn is_zero(&self) -> bool {
		self.is_empty()
	}
}

impl<T: Encode> Encode for Vec<T> {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		T::encode_slice(self, sink)
	}

	fn is_zero(&self) -> bool {
		self.is_empty()
	}
}

impl<T: Encode, const N: usize> Encode for [T; N] {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		T::encode_slice(self, sink)
	}

	fn is_zero(&self) -> bool {
		self.iter().all(Encode::is_zero)
	}
}

impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_map_len(sink, self.len())?;
		for (key, value) in self {
			key.encode(sink)?;
			value.encode(sink)?;
		}
		Ok(())
	}

	fn is_zero(&self) -> bool {
		self.is_empty()
	}
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_map_len(sink, self.len())?;
		for (key, value) in self {
			key.encode(sink)?;
			value.encode(sink)?;
		}
		Ok(())
	}

	fn is_zero(&self) -> bool {
		self.is_empty()
	}
}

impl<T: Encode> Encode for Option<T> {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		match self {
			Some(value) => value.encode(sink),
			None => encode_nil(sink),
		}
	}

	fn is_zero(&self) -> bool {
		self.is_none()
	}

	fn encode_text(&self) -> Result<String> {
		match self {
			Some(value) => value.encode_text(),
			None => Ok("nil".to_owned()),
		}
	}
}

impl<T: Encode + ?Sized> Encode for Box<T> {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		(**self).encode(sink)
	}

	fn is_zero(&self) -> bool {
		(**self).is_zero()
	}

	fn encode_text(&self) -> Result<String> {
		(**self).encode_text()
	}
}

impl<T: Encode + ?Sized> Encode for &T {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		(**self).encode(sink)
	}

	fn is_zero(&self) -> bool {
		(**self).is_zero()
	}

	fn encode_text(&self) -> Result<String> {
		(**self).encode_text()
	}
}

impl Encode for () {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		encode_nil(sink)
	}

	fn is_zero(&self) -> bool {
		true
	}
}

impl Encode for Value {
	fn encode<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
		match self {
			Self::Null => encode_nil(sink),
			Self::Bool(value) => encode_bool(sink, *value),
			Self::I64(value) => encode_int(sink, *value),
			Self::U64(value) => encode_uint(sink, *value),
			Self::F64(value) => encode_f64(sink, *value),
			Self::String(value) => encode_str(sink, value),
			Self::Bytes(value) => encode_bin(sink, value),
			Self::Array(items) => {
				encode_array_len(sink, items.len())?;
				for item in items {
					item.encode(sink)?;
				}
				Ok(())
			}
			Self::Map(pairs) => {
				encode_map_len(sink, pairs.len())?;
				for (key, value) in pairs {
					key.encode(sink)?;
					value.encode(sink)?;
				}
				Ok(())
			}
		}
	}

	fn is_zero(&self) -> bool {
		self.is_nil()
	}

	fn encode_text(&self) -> Result<String> {
		match self {
			Self::Null => Ok("nil".to_owned()),
			Self::Bool(value) => Ok(value.to_string()),
			Self::I64(value) => Ok(value.to_string()),
			Self::U64(value) => Ok(value.to_string()),
			Self::F64(value) => Ok(value.to_string()),
			Self::String(value) => Ok(value.clone()),
			_ => Err(MsgpError::UnsupportedShape { shape: type_name::<Self>() }),
		}
	}
}
