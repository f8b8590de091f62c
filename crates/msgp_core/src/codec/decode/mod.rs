use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::io::Read;
use std::str::FromStr;

use tracing::{debug, trace, warn};

use crate::codec::tag::{Family, Tag};
use crate::codec::wire::{read_f32, read_f64, read_i8, read_i16, read_i32, read_i64, read_len, read_payload, read_tag, read_u8, read_u16, read_u32, read_u64};
use crate::codec::{MsgpError, PeekReader, Record, Result, Value};

/// Upper bound on elements reserved before they are actually decoded.
const PREALLOC_ELEMS: usize = 1024;

/// Runtime limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
	/// Maximum nesting of arrays, maps, records and optionals.
	pub max_depth: u32,
	/// Maximum length prefix accepted for strings, binaries, arrays and maps.
	pub max_len: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_len: 16 * 1024 * 1024,
		}
	}
}

impl DecodeOptions {
	/// Preset for small messages from untrusted peers.
	pub fn strict() -> Self {
		Self {
			max_depth: 16,
			max_len: 64 * 1024,
		}
	}

	/// Preset that only stops at what the wire format itself can express.
	pub fn unbounded() -> Self {
		Self {
			max_depth: u32::MAX,
			max_len: usize::MAX,
		}
	}
}

/// Shape that can be populated from one wire value.
pub trait Decode {
	/// Decode exactly one wire value into `self`.
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()>;

	/// Reset `self` to its zero value.
	fn reset(&mut self);

	/// Parse `text` into `self` for a field carrying the `string` option.
	fn assign_text(&mut self, text: &str) -> Result<()> {
		let _ = text;
		Err(MsgpError::UnsupportedShape { shape: type_name::<Self>() })
	}

	/// Decode a growable sequence of `Self`; reads an Array unless overridden.
	fn decode_vec<R: Read>(items: &mut Vec<Self>, de: &mut Decoder<R>) -> Result<()>
	where
		Self: Sized + Default,
	{
		let tag = de.read_tag()?;
		if tag.family() == Family::Bin {
			return Err(mismatch("array", tag));
		}
		decode_vec_elements(items, tag, de)
	}

	/// Decode a fixed-capacity sequence of `Self`; reads an Array unless overridden.
	fn decode_slice<R: Read>(items: &mut [Self], de: &mut Decoder<R>) -> Result<()>
	where
		Self: Sized,
	{
		let tag = de.read_tag()?;
		if tag.family() == Family::Bin {
			return Err(mismatch("array", tag));
		}
		decode_slice_elements(items, tag, de)
	}
}

/// Numeric payload read from any int, uint or float form.
#[derive(Debug, Clone, Copy)]
enum Number {
	Int(i64),
	UInt(u64),
	Float(f64),
}

impl From<Number> for Value {
	fn from(number: Number) -> Self {
		match number {
			Number::Int(value) => Self::I64(value),
			Number::UInt(value) => Self::U64(value),
			Number::Float(value) => Self::F64(value),
		}
	}
}

/// Streaming decoder over one byte source.
///
/// Values are decoded one after another from the same source; the one-byte
/// lookahead used by optionals never leaks between calls.
#[derive(Debug)]
pub struct Decoder<R> {
	source: PeekReader<R>,
	options: DecodeOptions,
	depth: u32,
}

impl<R: Read> Decoder<R> {
	/// Create a decoder with default limits.
	pub fn new(source: R) -> Self {
		Self::with_options(source, DecodeOptions::default())
	}

	/// Create a decoder with explicit limits.
	pub fn with_options(source: R, options: DecodeOptions) -> Self {
		Self {
			source: PeekReader::new(source),
			options,
			depth: 0,
		}
	}

	/// Active decode limits.
	pub fn options(&self) -> DecodeOptions {
		self.options
	}

	/// Unwrap into the source and any peeked but unconsumed byte.
	pub fn into_parts(self) -> (R, Option<u8>) {
		self.source.into_parts()
	}

	/// Decode the next value into a caller-owned target.
	pub fn decode_into<T: Decode + ?Sized>(&mut self, target: &mut T) -> Result<()> {
		target.decode(self)
	}

	/// Decode the next value into a fresh [`Value`].
	pub fn decode_dynamic(&mut self) -> Result<Value> {
		let tag = self.read_tag()?;
		self.decode_dynamic_tagged(tag)
	}

	/// Classify the next tag without consuming it; `None` at end of input.
	pub fn peek_tag(&mut self) -> Result<Option<Tag>> {
		match self.source.peek()? {
			Some(head) => Tag::from_byte(head).map(Some),
			None => Ok(None),
		}
	}

	/// Return `true` when no byte remains before the next value.
	pub fn is_at_end(&mut self) -> Result<bool> {
		Ok(self.source.peek()?.is_none())
	}

	/// Consume and classify the next tag.
	///
	/// Running out of input is [`MsgpError::EndOfInput`] only between top-level
	/// values; inside a container it is [`MsgpError::Truncated`].
	pub fn read_tag(&mut self) -> Result<Tag> {
		match read_tag(&mut self.source) {
			Err(MsgpError::EndOfInput) => Err(self.end_of_input()),
			other => other,
		}
	}

	fn end_of_input(&self) -> MsgpError {
		if self.depth == 0 {
			MsgpError::EndOfInput
		} else {
			MsgpError::Truncated { need: 1, have: 0 }
		}
	}

	/// Read the length that follows a string, binary, array or map tag.
	pub fn read_length(&mut self, tag: Tag) -> Result<usize> {
		let Some(field) = tag.length_field() else {
			return Err(mismatch("length-prefixed value", tag));
		};
		let len = read_len(&mut self.source, field)?;
		if len > self.options.max_len {
			warn!(len, max = self.options.max_len, family = tag.family().as_str(), "length prefix exceeds decode limit");
			return Err(MsgpError::LengthLimitExceeded {
				len,
				max: self.options.max_len,
			});
		}
		Ok(len)
	}

	/// Run `f` one nesting level deeper, failing once `max_depth` is reached.
	pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		if self.depth >= self.options.max_depth {
			warn!(max_depth = self.options.max_depth, "nesting exceeds decode depth");
			return Err(MsgpError::DepthExceeded {
				max_depth: self.options.max_depth,
			});
		}
		self.depth += 1;
		let out = f(self);
		self.depth -= 1;
		out
	}

	/// Read a Nil marker.
	pub fn decode_nil(&mut self) -> Result<()> {
		match self.read_tag()? {
			Tag::Nil => Ok(()),
			tag => Err(mismatch("nil", tag)),
		}
	}

	/// Read a boolean; Nil reads as `false`.
	pub fn decode_bool(&mut self) -> Result<bool> {
		match self.read_tag()? {
			Tag::Nil => Ok(false),
			Tag::Bool(value) => Ok(value),
			tag => Err(mismatch("bool", tag)),
		}
	}

	/// Read any numeric form as `i64`; Nil reads as `0`.
	pub fn decode_int(&mut self) -> Result<i64> {
		let tag = self.read_tag()?;
		if tag == Tag::Nil {
			return Ok(0);
		}
		Ok(match self.read_number(tag, "int")? {
			Number::Int(value) => value,
			Number::UInt(value) => value as i64,
			Number::Float(value) => value as i64,
		})
	}

	/// Read any numeric form as `u64`; Nil reads as `0`.
	pub fn decode_uint(&mut self) -> Result<u64> {
		let tag = self.read_tag()?;
		if tag == Tag::Nil {
			return Ok(0);
		}
		Ok(match self.read_number(tag, "uint")? {
			Number::Int(value) => value as u64,
			Number::UInt(value) => value,
			Number::Float(value) => value as u64,
		})
	}

	/// Read any numeric form as `f64`; Nil reads as `0.0`.
	pub fn decode_float(&mut self) -> Result<f64> {
		let tag = self.read_tag()?;
		if tag == Tag::Nil {
			return Ok(0.0);
		}
		Ok(match self.read_number(tag, "float")? {
			Number::Int(value) => value as f64,
			Number::UInt(value) => value as f64,
			Number::Float(value) => value,
		})
	}

	/// Read a string or binary payload as text; Nil reads as empty.
	pub fn decode_string(&mut self) -> Result<String> {
		let tag = self.read_tag()?;
		match tag.family() {
			Family::Nil => Ok(String::new()),
			Family::Str | Family::Bin => self.read_text(tag),
			_ => Err(mismatch("str", tag)),
		}
	}

	/// Read a binary payload; Nil reads as empty.
	pub fn decode_bin(&mut self) -> Result<Vec<u8>> {
		let tag = self.read_tag()?;
		match tag.family() {
			Family::Nil => Ok(Vec::new()),
			Family::Bin => self.read_bytes(tag),
			_ => Err(mismatch("bin", tag)),
		}
	}

	/// Read an array header; `None` for Nil.
	pub fn decode_array_len(&mut self) -> Result<Option<usize>> {
		let tag = self.read_tag()?;
		match tag.family() {
			Family::Nil => Ok(None),
			Family::Array => self.read_length(tag).map(Some),
			_ => Err(mismatch("array", tag)),
		}
	}

	/// Read a map header; `None` for Nil.
	pub fn decode_map_len(&mut self) -> Result<Option<usize>> {
		let tag = self.read_tag()?;
		match tag.family() {
			Family::Nil => Ok(None),
			Family::Map => self.read_length(tag).map(Some),
			_ => Err(mismatch("map", tag)),
		}
	}

	fn read_number(&mut self, tag: Tag, expected: &'static str) -> Result<Number> {
		let source = &mut self.source;
		Ok(match tag {
			Tag::PositiveFixInt(value) => Number::Int(i64::from(value)),
			Tag::NegativeFixInt(value) => Number::Int(i64::from(value)),
			Tag::Int8 => Number::Int(i64::from(read_i8(source)?)),
			Tag::Int16 => Number::Int(i64::from(read_i16(source)?)),
			Tag::Int32 => Number::Int(i64::from(read_i32(source)?)),
			Tag::Int64 => Number::Int(read_i64(source)?),
			Tag::UInt8 => Number::UInt(u64::from(read_u8(source)?)),
			Tag::UInt16 => Number::UInt(u64::from(read_u16(source)?)),
			Tag::UInt32 => Number::UInt(u64::from(read_u32(source)?)),
			Tag::UInt64 => Number::UInt(read_u64(source)?),
			Tag::Float32 => Number::Float(f64::from(read_f32(source)?)),
			Tag::Float64 => Number::Float(read_f64(source)?),
			_ => return Err(mismatch(expected, tag)),
		})
	}

	fn read_bytes(&mut self, tag: Tag) -> Result<Vec<u8>> {
		let len = self.read_length(tag)?;
		read_payload(&mut self.source, len)
	}

	fn read_text(&mut self, tag: Tag) -> Result<String> {
		let bytes = self.read_bytes(tag)?;
		Ok(match String::from_utf8(bytes) {
			Ok(text) => text,
			Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
		})
	}

	fn decode_dynamic_tagged(&mut self, tag: Tag) -> Result<Value> {
		trace!(?tag, "dynamic decode");
		match tag.family() {
			Family::Nil => Ok(Value::Null),
			Family::Bool => Ok(Value::Bool(tag == Tag::Bool(true))),
			Family::Int | Family::UInt | Family::Float => self.read_number(tag, "number").map(Value::from),
			Family::Str => self.read_text(tag).map(Value::String),
			Family::Bin => self.read_bytes(tag).map(Value::Bytes),
			Family::Array => {
				let len = self.read_length(tag)?;
				self.nested(|de| {
					let mut items = Vec::with_capacity(len.min(PREALLOC_ELEMS));
					for _ in 0..len {
						items.push(de.decode_dynamic()?);
					}
					Ok(Value::Array(items))
				})
			}
			Family::Map => {
				let len = self.read_length(tag)?;
				self.nested(|de| {
					let mut pairs = Vec::with_capacity(len.min(PREALLOC_ELEMS));
					for _ in 0..len {
						let key = de.decode_dynamic()?;
						let value = de.decode_dynamic()?;
						pairs.push((key, value));
					}
					Ok(Value::Map(pairs))
				})
			}
		}
	}
}

/// Decode one value from `source` into `target`.
pub fn decode_into<T: Decode + ?Sized, R: Read>(source: R, target: &mut T) -> Result<()> {
	Decoder::new(source).decode_into(target)
}

/// Decode one value from `source` into a fresh [`Value`].
pub fn decode_dynamic<R: Read>(source: R) -> Result<Value> {
	Decoder::new(source).decode_dynamic()
}

/// Decode one value of type `T` from the front of `bytes`.
pub fn decode_from_slice<T: Decode + Default>(bytes: &[u8]) -> Result<T> {
	let mut target = T::default();
	Decoder::new(bytes).decode_into(&mut target)?;
	Ok(target)
}

/// Parse a boolean literal: `1 t T TRUE true True` or `0 f F FALSE false False`.
pub fn parse_bool_literal(text: &str) -> Result<bool> {
	match text {
		"1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
		"0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
		_ => Err(MsgpError::InvalidText {
			text: text.to_owned(),
			target: "bool",
			reason: "not a boolean literal".to_owned(),
		}),
	}
}

/// Decode a record from a map of wire field names.
///
/// Nil resets the record. Unknown keys are decoded and dropped, and fields
/// absent from the wire keep their zero value.
pub fn decode_record<T: Record, R: Read>(record: &mut T, de: &mut Decoder<R>) -> Result<()> {
	let tag = de.read_tag()?;
	match tag.family() {
		Family::Nil => {
			*record = T::default();
			return Ok(());
		}
		Family::Map => {}
		_ => return Err(mismatch("map", tag)),
	}

	let schema = T::schema();
	let len = de.read_length(tag)?;
	*record = T::default();

	de.nested(|de| {
		for _ in 0..len {
			let key = de.decode_string()?;
			let Some(field) = schema.lookup(&key) else {
				let dropped = de.decode_dynamic()?;
				debug!(record = schema.name, key = %key, kind = dropped.kind(), "discarding unknown record key");
				continue;
			};

			if !field.encode_as_string {
				record.decode_field(field.ident, de)?;
				continue;
			}

			let text = de.decode_string()?;
			if text == "nil" || text == "null" {
				debug!(record = schema.name, field = %field.wire_name, "nil literal resets string field");
				record.reset_field(field.ident);
				continue;
			}
			record
				.assign_field_text(field.ident, &text)
				.map_err(|err| err.for_field(schema.name, &field.wire_name))?;
		}
		Ok(())
	})
}

fn mismatch(expected: &'static str, tag: Tag) -> MsgpError {
	MsgpError::TypeMismatch {
		expected,
		got: tag.family().as_str(),
	}
}

fn parse_text<T>(text: &str, target: &'static str) -> Result<T>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	text.parse().map_err(|err: T::Err| MsgpError::InvalidText {
		text: text.to_owned(),
		target,
		reason: err.to_string(),
	})
}

fn decode_vec_elements<T: Decode + Default, R: Read>(items: &mut Vec<T>, tag: Tag, de: &mut Decoder<R>) -> Result<()> {
	match tag.family() {
		Family::Nil => {
			items.clear();
			Ok(())
		}
		Family::Array => {
			let len = de.read_length(tag)?;
			items.clear();
			items.reserve(len.min(PREALLOC_ELEMS));
			de.nested(|de| {
				for _ in 0..len {
					let mut item = T::default();
					item.decode(de)?;
					items.push(item);
				}
				Ok(())
			})
		}
		_ => Err(mismatch("array", tag)),
	}
}

fn decode_slice_elements<T: Decode, R: Read>(items: &mut [T], tag: Tag, de: &mut Decoder<R>) -> Result<()> {
	match tag.family() {
		Family::Nil => {
			items.iter_mut().for_each(Decode::reset);
			Ok(())
		}
		Family::Array => {
			let len = de.read_length(tag)?;
			if len > items.len() {
				return Err(MsgpError::BufferTooSmall {
					need: len,
					capacity: items.len(),
				});
			}
			items.iter_mut().for_each(Decode::reset);
			de.nested(|de| items[..len].iter_mut().try_for_each(|item| item.decode(de)))
		}
		_ => Err(mismatch("array", tag)),
	}
}

fn decode_pairs<K, V, R>(de: &mut Decoder<R>, mut insert: impl FnMut(K, V)) -> Result<()>
where
	K: Decode + Default,
	V: Decode + Default,
	R: Read,
{
	let Some(len) = de.decode_map_len()? else {
		return Ok(());
	};
	de.nested(|de| {
		for _ in 0..len {
			let mut key = K::default();
			key.decode(de)?;
			let mut value = V::default();
			value.decode(de)?;
			insert(key, value);
		}
		Ok(())
	})
}

impl Decode for bool {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		*self = de.decode_bool()?;
		Ok(())
	}

	fn reset(&mut self) {
		*self = false;
	}

	fn assign_text(&mut self, text: &str) -> Result<()> {
		*self = parse_bool_literal(text)?;
		Ok(())
	}
}

macro_rules! decode_signed {
	($($ty:ty),*) => {$(
		impl Decode for $ty {
			fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
				*self = de.decode_int()? as $ty;
				Ok(())
			}

			fn reset(&mut self) {
				*self = 0;
			}

			fn assign_text(&mut self, text: &str) -> Result<()> {
				*self = parse_text(text, stringify!($ty))?;
				Ok(())
			}
		}
	)*};
}

macro_rules! decode_unsigned {
	($($ty:ty),*) => {$(
		impl Decode for $ty {
			fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
				*self = de.decode_uint()? as $ty;
				Ok(())
			}

			fn reset(&mut self) {
				*self = 0;
			}

			fn assign_text(&mut self, text: &str) -> Result<()> {
				*self = parse_text(text, stringify!($ty))?;
				Ok(())
			}
		}
	)*};
}

decode_signed!(i8, i16, i32, i64, isize);
decode_unsigned!(u16, u32, u64, usize);

impl Decode for u8 {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		*self = de.decode_uint()? as u8;
		Ok(())
	}

	fn reset(&mut self) {
		*self = 0;
	}

	fn assign_text(&mut self, text: &str) -> Result<()> {
		*self = parse_text(text, "u8")?;
		Ok(())
	}

	fn decode_vec<R: Read>(items: &mut Vec<Self>, de: &mut Decoder<R>) -> Result<()> {
		let tag = de.read_tag()?;
		if tag.family() == Family::Bin {
			*items = de.read_bytes(tag)?;
			return Ok(());
		}
		decode_vec_elements(items, tag, de)
	}

	fn decode_slice<R: Read>(items: &mut [Self], de: &mut Decoder<R>) -> Result<()> {
		let tag = de.read_tag()?;
		if tag.family() != Family::Bin {
			return decode_slice_elements(items, tag, de);
		}

		let bytes = de.read_bytes(tag)?;
		if bytes.len() > items.len() {
			return Err(MsgpError::BufferTooSmall {
				need: bytes.len(),
				capacity: items.len(),
			});
		}
		let (head, tail) = items.split_at_mut(bytes.len());
		head.copy_from_slice(&bytes);
		tail.fill(0);
		Ok(())
	}
}

impl Decode for f32 {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		*self = de.decode_float()? as f32;
		Ok(())
	}

	fn reset(&mut self) {
		*self = 0.0;
	}

	fn assign_text(&mut self, text: &str) -> Result<()> {
		*self = parse_text(text, "f32")?;
		Ok(())
	}
}

impl Decode for f64 {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		*self = de.decode_float()?;
		Ok(())
	}

	fn reset(&mut self) {
		*self = 0.0;
	}

	fn assign_text(&mut self, text: &str) -> Result<()> {
		*self = parse_text(text, "f64")?;
		Ok(())
	}
}

impl Decode for String {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		*self = de.decode_string()?;
		Ok(())
	}

	fn reset(&mut self) {
		self.clear();
	}

	fn assign_text(&mut self, text: &str) -> Result<()> {
		text.clone_into(self);
		Ok(())
	}
}

impl<T: Decode + Default> Decode for Vec<T> {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		T::decode_vec(self, de)
	}

	fn reset(&mut self) {
		self.clear();
	}
}

impl<T: Decode, const N: usize> Decode for [T; N] {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		T::decode_slice(self, de)
	}

	fn reset(&mut self) {
		self.iter_mut().for_each(Decode::reset);
	}
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
	K: Decode + Default + Eq + Hash,
	V: Decode + Default,
	S: BuildHasher,
{
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		self.clear();
		decode_pairs(de, |key, value| {
			self.insert(key, value);
		})
	}

	fn reset(&mut self) {
		self.clear();
	}
}

impl<K, V> Decode for BTreeMap<K, V>
where
	K: Decode + Default + Ord,
	V: Decode + Default,
{
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		self.clear();
		decode_pairs(de, |key, value| {
			self.insert(key, value);
		})
	}

	fn reset(&mut self) {
		self.clear();
	}
}

impl<T: Decode + Default> Decode for Option<T> {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		match de.peek_tag()? {
			None => Err(de.end_of_input()),
			Some(Tag::Nil) => {
				de.read_tag()?;
				*self = None;
				Ok(())
			}
			Some(_) => {
				let mut inner = T::default();
				de.nested(|de| inner.decode(de))?;
				*self = Some(inner);
				Ok(())
			}
		}
	}

	fn reset(&mut self) {
		*self = None;
	}

	fn assign_text(&mut self, text: &str) -> Result<()> {
		let mut inner = T::default();
		inner.assign_text(text)?;
		*self = Some(inner);
		Ok(())
	}
}

impl<T: Decode + ?Sized> Decode for Box<T> {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		(**self).decode(de)
	}

	fn reset(&mut self) {
		(**self).reset();
	}

	fn assign_text(&mut self, text: &str) -> Result<()> {
		(**self).assign_text(text)
	}
}

impl Decode for () {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		de.decode_nil()
	}

	fn reset(&mut self) {}
}

impl Decode for Value {
	fn decode<R: Read>(&mut self, de: &mut Decoder<R>) -> Result<()> {
		*self = de.decode_dynamic()?;
		Ok(())
	}

	fn reset(&mut self) {
		*self = Self::Null;
	}
}

#[cfg(test)]
mod tests;
