use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use msgp::codec::{DecodeOptions, Decoder, Result, Value};
use tracing::debug;

/// Build decode limits from optional CLI overrides.
pub(crate) fn decode_options(max_depth: Option<u32>, max_len: Option<usize>) -> DecodeOptions {
	let defaults = DecodeOptions::default();
	DecodeOptions {
		max_depth: max_depth.unwrap_or(defaults.max_depth),
		max_len: max_len.unwrap_or(defaults.max_len),
	}
}

/// Decode every concatenated value in a wire file.
pub(crate) fn read_values(path: &Path, options: DecodeOptions) -> Result<Vec<Value>> {
	let file = File::open(path)?;
	let mut de = Decoder::with_options(BufReader::new(file), options);
	let mut values = Vec::new();
	while !de.is_at_end()? {
		values.push(de.decode_dynamic()?);
	}
	debug!(path = %path.display(), values = values.len(), "decoded wire file");
	Ok(values)
}

/// Write a pretty JSON document to stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	let mut stdout = io::stdout().lock();
	serde_json::to_writer_pretty(&mut stdout, payload).map_err(io::Error::from)?;
	writeln!(stdout)?;
	Ok(())
}

/// Convert a decoded value into JSON.
///
/// Maps with only string keys become objects (later duplicates win); other
/// maps become arrays of `[key, value]` pairs. Binary payloads become byte arrays.
pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Null => serde_json::Value::Null,
		Value::Bool(value) => serde_json::Value::Bool(*value),
		Value::I64(value) => serde_json::Value::from(*value),
		Value::U64(value) => serde_json::Value::from(*value),
		Value::F64(value) => serde_json::Number::from_f64(*value).map_or(serde_json::Value::Null, serde_json::Value::Number),
		Value::String(value) => serde_json::Value::String(value.clone()),
		Value::Bytes(bytes) => serde_json::Value::Array(bytes.iter().map(|byte| serde_json::Value::from(*byte)).collect()),
		Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
		Value::Map(pairs) => {
			if pairs.iter().all(|(key, _)| key.as_str().is_some()) {
				let mut object = serde_json::Map::with_capacity(pairs.len());
				for (key, value) in pairs {
					if let Some(key) = key.as_str() {
						object.insert(key.to_owned(), value_to_json(value));
					}
				}
				serde_json::Value::Object(object)
			} else {
				serde_json::Value::Array(
					pairs
						.iter()
						.map(|(key, value)| serde_json::Value::Array(vec![value_to_json(key), value_to_json(value)]))
						.collect(),
				)
			}
		}
	}
}

/// Convert a JSON document into a wire value.
pub(crate) fn json_to_value(json: &serde_json::Value) -> Value {
	match json {
		serde_json::Value::Null => Value::Null,
		serde_json::Value::Bool(value) => Value::Bool(*value),
		serde_json::Value::Number(number) => {
			if let Some(value) = number.as_i64() {
				Value::I64(value)
			} else if let Some(value) = number.as_u64() {
				Value::U64(value)
			} else {
				Value::F64(number.as_f64().unwrap_or(f64::NAN))
			}
		}
		serde_json::Value::String(value) => Value::String(value.clone()),
		serde_json::Value::Array(items) => Value::Array(items.iter().map(json_to_value).collect()),
		serde_json::Value::Object(object) => Value::Map(
			object
				.iter()
				.map(|(key, value)| (Value::String(key.clone()), json_to_value(value)))
				.collect(),
		),
	}
}
