use std::collections::BTreeMap;

/// Self-describing value produced by open-ended decoding.
///
/// Every wire family maps onto one variant; `Float32` wire values are widened
/// to [`Value::F64`]. Maps keep wire order and duplicate keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// Nil marker.
	#[default]
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Signed integer scalar (fixints and `Int8..Int64`).
	I64(i64),
	/// Unsigned integer scalar (`UInt8..UInt64`).
	U64(u64),
	/// Float scalar.
	F64(f64),
	/// UTF-8 lossy decoded string.
	String(String),
	/// Opaque byte payload.
	Bytes(Vec<u8>),
	/// Ordered sequence.
	Array(Vec<Value>),
	/// Key/value pairs in wire order.
	Map(Vec<(Value, Value)>),
}

impl Value {
	/// Stable lowercase label for the variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "nil",
			Self::Bool(_) => "bool",
			Self::I64(_) => "int",
			Self::U64(_) => "uint",
			Self::F64(_) => "float",
			Self::String(_) => "str",
			Self::Bytes(_) => "bin",
			Self::Array(_) => "array",
			Self::Map(_) => "map",
		}
	}

	/// Return `true` for [`Value::Null`].
	pub fn is_nil(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Return the boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// Return an integer payload that fits `i64`.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::I64(value) => Some(*value),
			Self::U64(value) => i64::try_from(*value).ok(),
			_ => None,
		}
	}

	/// Return an integer payload that fits `u64`.
	pub fn as_u64(&self) -> Option<u64> {
		match self {
			Self::I64(value) => u64::try_from(*value).ok(),
			Self::U64(value) => Some(*value),
			_ => None,
		}
	}

	/// Return any numeric payload widened to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::I64(value) => Some(*value as f64),
			Self::U64(value) => Some(*value as f64),
			Self::F64(value) => Some(*value),
			_ => None,
		}
	}

	/// Return the string payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value.as_str()),
			_ => None,
		}
	}

	/// Return the binary payload.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Bytes(value) => Some(value.as_slice()),
			_ => None,
		}
	}

	/// Return the array elements.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items.as_slice()),
			_ => None,
		}
	}

	/// Return the map pairs in wire order.
	pub fn as_map(&self) -> Option<&[(Value, Value)]> {
		match self {
			Self::Map(pairs) => Some(pairs.as_slice()),
			_ => None,
		}
	}

	/// Look up a string key in a map; the last duplicate wins.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_map()?
			.iter()
			.rev()
			.find(|(candidate, _)| candidate.as_str() == Some(key))
			.map(|(_, value)| value)
	}

	/// Materialize a map whose keys are all strings; later duplicates overwrite earlier ones.
	pub fn into_map(self) -> Option<BTreeMap<String, Value>> {
		let Self::Map(pairs) = self else {
			return None;
		};
		let mut out = BTreeMap::new();
		for (key, value) in pairs {
			let Self::String(key) = key else {
				return None;
			};
			out.insert(key, value);
		}
		Some(out)
	}

	/// Nesting depth of this tree; scalars are depth 0.
	pub fn depth(&self) -> usize {
		match self {
			Self::Array(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
			Self::Map(pairs) => 1 + pairs.iter().map(|(key, value)| key.depth().max(value.depth())).max().unwrap_or(0),
			_ => 0,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::I64(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::I64(i64::from(value))
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Self::U64(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Self::U64(u64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::F64(value)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Self::F64(f64::from(value))
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::Array(items)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}
