use std::path::PathBuf;

use plyfmt::ply::{FieldKind, Layout, MemoryImage, PlyError, Result, StructLayout};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Show the layout embedded in this image instead of the built-in one.
	#[arg(long)]
	pub image: Option<PathBuf>,
	#[arg(long)]
	pub tag: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print struct layouts.
pub fn run(args: Args) -> Result<()> {
	let Args { image, tag, json } = args;

	let layout = match image {
		Some(path) => MemoryImage::open(path)?.layout().clone(),
		None => Layout::lp64(),
	};

	let selected: Vec<&StructLayout> = match &tag {
		Some(tag) => vec![layout.get(tag).ok_or_else(|| PlyError::UnknownStructTag { tag: tag.clone() })?],
		None => layout.structs.iter().collect(),
	};

	if json {
		return emit_json(&selected);
	}

	for item in selected {
		println!("{} size={}", item.tag, item.size);
		for field in &item.fields {
			println!("  {:>3} {:<12} {}", field.offset, field.path, describe(&field.kind));
		}
	}

	Ok(())
}

fn describe(kind: &FieldKind) -> String {
	match kind {
		FieldKind::Ptr { tag } => format!("*{tag}"),
		FieldKind::Enum { variants } => format!("enum({})", variants.join(", ")),
		other => other.label().to_owned(),
	}
}
