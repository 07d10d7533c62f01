#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "nifdoc", about = "NetImmerse/Gamebryo .nif inspection tools")]
struct Cli {
	/// Report block-size mismatches instead of failing on them.
	#[arg(long, global = true)]
	lenient: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info(cmd::info::Args),
	Blocks(cmd::blocks::Args),
	Tree(cmd::tree::Args),
	Show(cmd::show::Args),
}

fn main() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> nifdoc::nif::Result<()> {
	let cli = Cli::parse();
	let lenient = cli.lenient;

	match cli.command {
		Commands::Info(args) => cmd::info::run(args, lenient),
		Commands::Blocks(args) => cmd::blocks::run(args, lenient),
		Commands::Tree(args) => cmd::tree::run(args, lenient),
		Commands::Show(args) => cmd::show::run(args, lenient),
	}
}
