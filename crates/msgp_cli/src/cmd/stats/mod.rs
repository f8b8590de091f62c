use std::collections::BTreeMap;
use std::path::PathBuf;

use msgp::codec::{Result, Value};

use crate::cmd::util::{decode_options, emit_json, read_values};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Count values and wire families across a wire file.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let file_bytes = std::fs::metadata(&path)?.len();
	let values = read_values(&path, decode_options(None, None))?;
	let tally = Tally::collect(&values);

	if json {
		let payload = StatsJson {
			path: path.display().to_string(),
			file_bytes,
			values: values.len(),
			max_depth: tally.max_depth,
			families: tally.families,
		};
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("file_bytes: {file_bytes}");
	println!("values: {}", values.len());
	println!("max_depth: {}", tally.max_depth);
	println!("families:");
	for (family, count) in &tally.families {
		println!("  {family}: {count}");
	}

	Ok(())
}

#[derive(Debug, Default)]
struct Tally {
	families: BTreeMap<&'static str, usize>,
	max_depth: usize,
}

impl Tally {
	fn collect(values: &[Value]) -> Self {
		let mut tally = Self::default();
		for value in values {
			tally.max_depth = tally.max_depth.max(value.depth());
			tally.visit(value);
		}
		tally
	}

	fn visit(&mut self, value: &Value) {
		*self.families.entry(value.kind()).or_default() += 1;
		match value {
			Value::Array(items) => items.iter().for_each(|item| self.visit(item)),
			Value::Map(pairs) => {
				for (key, item) in pairs {
					self.visit(key);
					self.visit(item);
				}
			}
			_ => {}
		}
	}
}

#[derive(serde::Serialize)]
struct StatsJson {
	path: String,
	file_bytes: u64,
	values: usize,
	max_depth: usize,
	families: BTreeMap<&'static str, usize>,
}
