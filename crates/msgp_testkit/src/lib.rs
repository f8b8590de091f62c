//! Shared test helpers for workspace crates.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Workspace root, two directories above this crate's manifest.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir.ancestors().nth(2).unwrap_or(manifest_dir).to_path_buf()
}

/// Path of a checked-in file under `<workspace>/fixtures`; panics when it is missing.
pub fn fixture_path(name: &str) -> PathBuf {
	let path = workspace_root().join("fixtures").join(name);
	assert!(path.is_file(), "missing fixture {}", path.display());
	path
}

/// Cargo target directory, honoring `CARGO_TARGET_DIR`.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR").map_or_else(|| workspace_root().join("target"), PathBuf::from)
}

/// Per-suite scratch directory under the target directory, created on demand.
pub fn scratch_dir(suite: &str) -> PathBuf {
	let dir = target_dir().join("scratch").join(suite);
	std::fs::create_dir_all(&dir).unwrap_or_else(|err| panic!("create scratch dir {}: {err}", dir.display()));
	dir
}

/// Read and parse a JSON fixture.
pub fn json_fixture(name: &str) -> serde_json::Value {
	let path = fixture_path(name);
	let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("read fixture {}: {err}", path.display()));
	serde_json::from_str(&text).unwrap_or_else(|err| panic!("parse fixture {}: {err}", path.display()))
}

/// Render bytes as space-separated lowercase hex pairs.
pub fn hex(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 3);
	for (idx, byte) in bytes.iter().enumerate() {
		if idx > 0 {
			out.push(' ');
		}
		let _ = write!(out, "{byte:02x}");
	}
	out
}

/// Parse whitespace-separated hex pairs; panics on malformed input.
pub fn from_hex(text: &str) -> Vec<u8> {
	text.split_whitespace()
		.map(|pair| u8::from_str_radix(pair, 16).unwrap_or_else(|err| panic!("bad hex pair {pair:?}: {err}")))
		.collect()
}
