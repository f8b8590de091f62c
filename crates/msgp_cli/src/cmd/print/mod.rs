use std::io::{self, Write};

use msgp::codec::Value;

/// Output truncation limits for printed value trees.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements printed for arrays.
	pub max_array_items: usize,
	/// Maximum number of pairs printed for maps.
	pub max_map_entries: usize,
	/// Maximum number of bytes shown for binary payloads.
	pub max_bin_preview: usize,
	/// Maximum recursive print depth for nested arrays/maps.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_array_items: 16,
			max_map_entries: 80,
			max_bin_preview: 16,
			max_print_depth: 6,
		}
	}
}

/// Print one decoded value tree to stdout.
pub fn print_value(value: &Value, indent: usize, options: PrintOptions) -> io::Result<()> {
	let mut stdout = io::stdout().lock();
	write_value(&mut stdout, value, indent, 0, options)
}

/// Write one decoded value tree as indented text.
pub fn write_value<W: Write>(out: &mut W, value: &Value, indent: usize, depth: u32, options: PrintOptions) -> io::Result<()> {
	let pad = " ".repeat(indent);
	match value {
		Value::Null => writeln!(out, "{pad}nil"),
		Value::Bool(v) => writeln!(out, "{pad}{v}"),
		Value::I64(v) => writeln!(out, "{pad}{v}"),
		Value::U64(v) => writeln!(out, "{pad}{v}u"),
		Value::F64(v) => writeln!(out, "{pad}{v:?}"),
		Value::String(v) => writeln!(out, "{pad}\"{}\"", truncate(v, options.max_string_len)),
		Value::Bytes(v) => writeln!(out, "{pad}bin[{}] {}", v.len(), bin_preview(v, options.max_bin_preview)),
		Value::Array(items) => {
			if depth >= options.max_print_depth {
				return writeln!(out, "{pad}[... {} items]", items.len());
			}
			writeln!(out, "{pad}[")?;
			for item in items.iter().take(options.max_array_items) {
				write_value(out, item, indent + 2, depth + 1, options)?;
			}
			if items.len() > options.max_array_items {
				writeln!(out, "{pad}  ... {} more", items.len() - options.max_array_items)?;
			}
			writeln!(out, "{pad}]")
		}
		Value::Map(pairs) => {
			if depth >= options.max_print_depth {
				return writeln!(out, "{pad}{{ ... {} entries }}", pairs.len());
			}
			writeln!(out, "{pad}{{")?;
			for (key, item) in pairs.iter().take(options.max_map_entries) {
				write!(out, "{pad}  {} = ", key_label(key, options))?;
				if matches!(item, Value::Array(_) | Value::Map(_)) {
					writeln!(out)?;
					write_value(out, item, indent + 4, depth + 1, options)?;
				} else {
					write_value(out, item, 0, depth + 1, options)?;
				}
			}
			if pairs.len() > options.max_map_entries {
				writeln!(out, "{pad}  ... {} more entries", pairs.len() - options.max_map_entries)?;
			}
			writeln!(out, "{pad}}}")
		}
	}
}

fn key_label(key: &Value, options: PrintOptions) -> String {
	match key {
		Value::String(text) => truncate(text, options.max_string_len),
		Value::I64(v) => v.to_string(),
		Value::U64(v) => v.to_string(),
		Value::Bool(v) => v.to_string(),
		Value::Null => "nil".to_owned(),
		other => format!("<{}>", other.kind()),
	}
}

fn bin_preview(bytes: &[u8], max: usize) -> String {
	let mut out: Vec<String> = bytes.iter().take(max).map(|byte| format!("{byte:02x}")).collect();
	if bytes.len() > max {
		out.push("..".to_owned());
	}
	out.join(" ")
}

fn truncate(input: &str, max_chars: usize) -> String {
	if input.chars().count() <= max_chars {
		return input.to_owned();
	}
	let mut out: String = input.chars().take(max_chars).collect();
	out.push_str("...");
	out
}
