mod decode;
mod encode;
mod error;
mod peek;
mod schema;
/// Leading tag byte grammar.
pub mod tag;
mod value;
/// Fixed-width big-endian readers and writers for the wire primitives.
pub mod wire;

/// Streaming decoder, decode trait, limits, and decode entry points.
pub use decode::{Decode, DecodeOptions, Decoder, decode_dynamic, decode_from_slice, decode_into, decode_record, parse_bool_literal};
/// Encode trait, primitive writers, and encode entry points.
pub use encode::{
	Encode, encode_array_len, encode_bin, encode_bool, encode_f32, encode_f64, encode_int, encode_map_len, encode_nil, encode_record, encode_str,
	encode_to_vec, encode_uint, encode_value, record_is_zero,
};
/// Error and result aliases.
pub use error::{MsgpError, Result};
/// One-byte lookahead adapter over a byte source.
pub use peek::PeekReader;
/// Field annotation parsing and record schema types.
pub use schema::{FieldSchema, Record, RecordSchema, parse_field_annotation};
/// Self-describing decoded value.
pub use value::Value;
