#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "plyfmt", about = "Render ply compiler values from captured memory")]
struct Cli {
	/// Log declined and truncated renders to stderr.
	#[arg(long, short, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Render image roots or an ad-hoc address.
	Render(cmd::render::Args),
	/// List the roots of an image.
	Roots(cmd::roots::Args),
	/// Print struct layouts.
	Layout(cmd::layout::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing(verbose: bool) {
	let fallback = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(command: Commands) -> plyfmt::ply::Result<()> {
	match command {
		Commands::Render(args) => cmd::render::run(args),
		Commands::Roots(args) => cmd::roots::run(args),
		Commands::Layout(args) => cmd::layout::run(args),
	}
}
