use std::path::PathBuf;

use msgp::codec::Result;

use crate::cmd::print::{PrintOptions, print_value};
use crate::cmd::util::{decode_options, emit_json, read_values, value_to_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	#[arg(long)]
	pub max_depth: Option<u32>,
	#[arg(long)]
	pub max_len: Option<usize>,
}

/// Decode every concatenated value in a wire file and print each tree.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		max_depth,
		max_len,
	} = args;

	let values = read_values(&path, decode_options(max_depth, max_len))?;

	if json {
		let payload: Vec<serde_json::Value> = values.iter().map(value_to_json).collect();
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("values: {}", values.len());
	for (idx, value) in values.iter().enumerate() {
		println!("value[{idx}] ({}):", value.kind());
		print_value(value, 2, PrintOptions::default())?;
	}

	Ok(())
}
