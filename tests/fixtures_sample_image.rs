#![allow(missing_docs)]

use plyfmt::ply::{DisplayHint, MapStyle, MemoryImage, PrinterRegistry, ReadOptions, RenderOptions};
use plyfmt_testkit::fixture_path;
use pretty_assertions::assert_eq;

fn sample() -> MemoryImage {
	MemoryImage::open(fixture_path("sample.json")).expect("fixture opens")
}

fn render_root(registry: &PrinterRegistry, image: &MemoryImage, name: &str) -> Option<String> {
	let root = image.root(name).expect("root exists");
	registry.render_value(image, &root.value())
}

#[test]
fn sample_roots_render_with_default_options() {
	let image = sample();
	let registry = PrinterRegistry::with_defaults(ReadOptions::default(), RenderOptions::default());

	let expected = [
		("sum", Some("*plyN(add <1> <2>)")),
		("call", Some("plyN(call mul \"hi\" <-3>)")),
		("pp", Some("plyT(**int)")),
		("buf", Some("*plyT(char[4])")),
		("counts", Some("plyT(u64{u64})")),
		("pid", Some("plyS(pid)")),
		("anon", Some("*plyS(<anonymous>)")),
		("probe", Some("*plyF(kprobe:do_sys_open)")),
		("raw", None),
		("dangling", None),
	];
	for (name, want) in expected {
		assert_eq!(render_root(&registry, &image, name).as_deref(), want, "root {name}");
	}
}

#[test]
fn sample_cyclic_type_is_cut_at_depth_ceiling() {
	let image = sample();
	let registry = PrinterRegistry::with_defaults(ReadOptions::default(), RenderOptions::default());

	let text = render_root(&registry, &image, "loop").expect("loop renders");
	let body = text.strip_prefix("plyT(").and_then(|rest| rest.strip_suffix(")")).expect("framed output");
	assert_eq!(body, format!("{}...", "*".repeat(64)));

	let shallow = PrinterRegistry::with_defaults(
		ReadOptions::default(),
		RenderOptions {
			max_type_depth: 3,
			..RenderOptions::default()
		},
	);
	assert_eq!(render_root(&shallow, &image, "loop").as_deref(), Some("plyT(***...)"));
}

#[test]
fn sample_map_in_key_value_style() {
	let image = sample();
	let registry = PrinterRegistry::with_defaults(
		ReadOptions::default(),
		RenderOptions {
			map_style: MapStyle::KeyValue,
			..RenderOptions::default()
		},
	);
	assert_eq!(render_root(&registry, &image, "counts").as_deref(), Some("plyT({int}u64)"));
}

#[test]
fn sample_display_hints_follow_struct_tags() {
	let image = sample();
	let registry = PrinterRegistry::with_defaults(ReadOptions::default(), RenderOptions::default());

	for (name, hint) in [("sum", DisplayHint::Node), ("pp", DisplayHint::Type), ("pid", DisplayHint::Sym), ("probe", DisplayHint::Func)] {
		let root = image.root(name).expect("root exists");
		let printer = registry.lookup(&image, &root.value()).expect("printer exists");
		assert_eq!(printer.display_hint(), hint, "root {name}");
		assert_eq!(printer.display_hint().as_str(), hint.to_string());
	}
}
