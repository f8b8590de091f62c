use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

pub(crate) use msgp_testkit::fixture_path;

pub(crate) fn scratch_path(name: &str) -> PathBuf {
	msgp_testkit::scratch_dir("msgp_cli").join(format!("{}-{name}", std::process::id()))
}

pub(crate) fn run_msgp(args: &[&str]) -> Output {
	Command::new(msgp_bin()).args(args).output().expect("msgp command executes")
}

pub(crate) fn run_msgp_json(args: &[&str]) -> serde_json::Value {
	let output = run_msgp(args);
	assert!(
		output.status.success(),
		"msgp {args:?} exited with {}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout is json")
}

// Unit tests get no CARGO_BIN_EXE_msgp, so the binary is built once per run.
fn msgp_bin() -> &'static Path {
	static BIN: OnceLock<PathBuf> = OnceLock::new();
	BIN.get_or_init(|| {
		let status = Command::new(env!("CARGO"))
			.current_dir(env!("CARGO_MANIFEST_DIR"))
			.args(["build", "--quiet", "--bin", "msgp"])
			.status()
			.expect("cargo build executes");
		assert!(status.success(), "cargo build --bin msgp failed");
		msgp_testkit::target_dir().join("debug").join(format!("msgp{}", std::env::consts::EXE_SUFFIX))
	})
}
