#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;
mod logging;

#[derive(Parser)]
#[command(name = "msgp", about = "Inspect and produce msgp wire files")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode every value in a wire file and print it.
	Dump(cmd::dump::Args),
	/// Convert a JSON document into one wire value.
	Encode(cmd::encode::Args),
	/// Count values and wire families in a wire file.
	Stats(cmd::stats::Args),
}

fn main() {
	logging::init();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> msgp::codec::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Dump(args) => cmd::dump::run(args),
		Commands::Encode(args) => cmd::encode::run(args),
		Commands::Stats(args) => cmd::stats::run(args),
	}
}
