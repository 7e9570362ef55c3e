use std::path::PathBuf;

use plyfmt::ply::{MemoryImage, Result};

use crate::cmd::util::{addr_hex, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct RootJson<'a> {
	name: &'a str,
	addr: String,
	tag: Option<&'a str>,
	pointer: bool,
	mapped: bool,
}

/// List the named roots of a memory image.
pub fn run(args: Args) -> Result<()> {
	let Args { file, json } = args;
	let image = MemoryImage::open(&file)?;

	let rows: Vec<RootJson<'_>> = image
		.roots()
		.iter()
		.map(|item| RootJson {
			name: &item.name,
			addr: addr_hex(item.addr),
			tag: item.tag.as_deref(),
			pointer: item.pointer,
			mapped: image.is_mapped(item.addr),
		})
		.collect();

	if json {
		return emit_json(&rows);
	}

	println!("path: {}", file.display());
	println!("regions: {}", image.regions().len());
	println!("roots: {}", rows.len());
	for row in &rows {
		println!(
			"  {} tag={} addr={}{}{}",
			row.name,
			row.tag.unwrap_or("-"),
			row.addr,
			if row.pointer { " ptr" } else { "" },
			if row.mapped { "" } else { " (unmapped)" }
		);
	}

	Ok(())
}
