use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MsgpError>;

/// Errors produced while encoding or decoding wire values.
#[derive(Debug, Error)]
pub enum MsgpError {
	/// Underlying sink or source failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Source ended cleanly before the first byte of a value.
	#[error("end of input")]
	EndOfInput,
	/// Source ended in the middle of a value.
	#[error("truncated value: need {need} bytes, have {have}")]
	Truncated {
		/// Bytes the wire form declared.
		need: usize,
		/// Bytes actually available.
		have: usize,
	},
	/// Leading byte does not name any supported wire family.
	#[error("malformed tag 0x{tag:02x}")]
	MalformedTag {
		/// Offending tag byte.
		tag: u8,
	},
	/// Wire family cannot be assigned to the target shape.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Target shape description.
		expected: &'static str,
		/// Wire family name that was read.
		got: &'static str,
	},
	/// Fixed-capacity target is smaller than the wire length.
	#[error("buffer too small: need {need} elements, capacity {capacity}")]
	BufferTooSmall {
		/// Decoded element count.
		need: usize,
		/// Target capacity.
		capacity: usize,
	},
	/// Value does not fit the widest wire length prefix.
	#[error("value too large: len={len}, max={max}")]
	ValueTooLarge {
		/// Length of the value being encoded.
		len: usize,
		/// Largest encodable length.
		max: usize,
	},
	/// String-encoded record field failed primitive parsing.
	#[error("cannot decode field {record}.{field}: {reason}")]
	FieldDecode {
		/// Record type name.
		record: &'static str,
		/// Wire field name.
		field: String,
		/// Parse failure description.
		reason: String,
	},
	/// Text could not be parsed as the requested primitive.
	#[error("invalid {target} text {text:?}: {reason}")]
	InvalidText {
		/// Input text.
		text: String,
		/// Primitive type name.
		target: &'static str,
		/// Parser message.
		reason: String,
	},
	/// Shape has no codec rule for the requested operation.
	#[error("unsupported shape: {shape}")]
	UnsupportedShape {
		/// Rust type name of the shape.
		shape: &'static str,
	},
	/// Wire length prefix exceeded the configured decode limit.
	#[error("length {len} exceeds decode limit {max}")]
	LengthLimitExceeded {
		/// Declared wire length.
		len: usize,
		/// Configured maximum.
		max: usize,
	},
	/// Nested values exceeded the configured decode depth.
	#[error("decode depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
}

impl MsgpError {
	/// Return `true` for a clean end of input between values.
	pub fn is_end_of_input(&self) -> bool {
		matches!(self, Self::EndOfInput)
	}

	/// Re-label a text parse failure as a failure of one record field.
	pub(crate) fn for_field(self, record: &'static str, field: &str) -> Self {
		match self {
			Self::InvalidText { text, target, reason } => Self::FieldDecode {
				record,
				field: field.to_owned(),
				reason: format!("invalid {target} text {text:?}: {reason}"),
			},
			other => other,
		}
	}
}
