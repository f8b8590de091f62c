use std::fs;
use std::io;
use std::path::PathBuf;

use msgp::codec::{Result, encode_to_vec};

use crate::cmd::util::json_to_value;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(short, long)]
	pub output: PathBuf,
}

/// Convert a JSON document into one wire value and write it to `output`.
pub fn run(args: Args) -> Result<()> {
	let Args { path, output } = args;

	let text = fs::read_to_string(&path)?;
	let json: serde_json::Value = serde_json::from_str(&text).map_err(io::Error::from)?;
	let bytes = encode_to_vec(&json_to_value(&json))?;
	fs::write(&output, &bytes)?;

	println!("wrote {} bytes to {}", bytes.len(), output.display());
	Ok(())
}
