use std::path::PathBuf;
use std::sync::Arc;

use plyfmt::ply::{DisplayHint, ImageValue, MAX_TYPE_DEPTH, MapStyle, MemoryImage, PrinterRegistry, ReadOptions, RenderOptions, Result};

use crate::cmd::util::{RootSelector, addr_hex, emit_json, parse_root_selector};

/// Map rendering style as accepted on the command line.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum MapStyleArg {
	/// `value{value}`.
	Literal,
	/// `{key}value`.
	KeyValue,
}

impl From<MapStyleArg> for MapStyle {
	fn from(value: MapStyleArg) -> Self {
		match value {
			MapStyleArg::Literal => MapStyle::Literal,
			MapStyleArg::KeyValue => MapStyle::KeyValue,
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub root: Option<String>,
	#[arg(long)]
	pub addr: Option<String>,
	#[arg(long)]
	pub tag: Option<String>,
	#[arg(long)]
	pub ptr: bool,
	#[arg(long)]
	pub json: bool,
	#[arg(long = "map-style", value_enum, default_value = "literal")]
	pub map_style: MapStyleArg,
	#[arg(long = "max-type-depth", value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_TYPE_DEPTH)))]
	pub max_type_depth: Option<u32>,
	#[arg(long = "max-args")]
	pub max_args: Option<usize>,
	#[arg(long = "max-string")]
	pub max_string: Option<usize>,
	#[arg(long)]
	pub anonymous: Option<String>,
}

#[derive(serde::Serialize)]
struct RenderedJson {
	name: String,
	addr: String,
	tag: Option<String>,
	pointer: bool,
	hint: Option<DisplayHint>,
	text: Option<String>,
}

/// Render one root, an ad-hoc address, or every root of a memory image.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file,
		root,
		addr,
		tag,
		ptr,
		json,
		map_style,
		max_type_depth,
		max_args,
		max_string,
		anonymous,
	} = args;

	let selector = parse_root_selector(root, addr, tag, ptr)?;

	let mut image = MemoryImage::open(&file)?;
	if let Some(max_string) = max_string {
		image = image.with_max_string_len(max_string);
	}

	let mut read = ReadOptions::default();
	let mut render = RenderOptions {
		map_style: map_style.into(),
		..RenderOptions::default()
	};
	if let Some(max_type_depth) = max_type_depth {
		read.max_type_depth = max_type_depth;
		render.max_type_depth = max_type_depth;
	}
	if let Some(max_args) = max_args {
		read.max_args = max_args;
	}
	if let Some(anonymous) = anonymous {
		render.anonymous = anonymous;
	}
	let registry = PrinterRegistry::with_defaults(read, render);

	let targets: Vec<(String, Option<String>, bool, u64, ImageValue)> = match selector {
		RootSelector::All => image
			.roots()
			.iter()
			.map(|item| (item.name.clone(), item.tag.clone(), item.pointer, item.addr, item.value()))
			.collect(),
		RootSelector::Named(name) => {
			let item = image.root(&name)?;
			vec![(item.name.clone(), item.tag.clone(), item.pointer, item.addr, item.value())]
		}
		RootSelector::Addr { addr, tag, pointer } => {
			let value = if pointer {
				ImageValue::Pointer {
					target: addr,
					tag: Arc::from(tag.as_str()),
				}
			} else {
				ImageValue::Struct {
					addr,
					tag: Arc::from(tag.as_str()),
				}
			};
			vec![(addr_hex(addr), Some(tag), pointer, addr, value)]
		}
	};

	let rows: Vec<RenderedJson> = targets
		.into_iter()
		.map(|(name, tag, pointer, addr, value)| {
			let (hint, text) = match registry.render_with_hint(&image, &value) {
				Some((hint, text)) => (Some(hint), text),
				None => (None, None),
			};
			RenderedJson {
				name,
				addr: addr_hex(addr),
				tag,
				pointer,
				hint,
				text,
			}
		})
		.collect();

	if json {
		return emit_json(&rows);
	}

	for row in &rows {
		match &row.text {
			Some(text) => println!("{} = {text}", row.name),
			None => println!("{} = <no printer>", row.name),
		}
	}

	Ok(())
}
