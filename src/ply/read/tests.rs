use std::sync::Arc;

use plyfmt_testkit::{MemWriter, T_STRUCT, T_TYPEDEF, T_VOID};
use pretty_assertions::assert_eq;

use super::{ReadOptions, read_function, read_node, read_symbol, read_type};
use crate::ply::{ImageValue, Layout, MemoryImage, Node, NumValue, PlyError, Region, RenderOptions, TypeDesc, render_node, render_type};

fn image(writer: MemWriter) -> MemoryImage {
	let (base, bytes) = writer.into_parts();
	MemoryImage::new(vec![Region { base, bytes }], Layout::lp64(), Vec::new()).expect("image builds")
}

fn at(addr: u64, tag: &str) -> ImageValue {
	ImageValue::Struct {
		addr,
		tag: Arc::from(tag),
	}
}

#[test]
fn numeric_node_honours_signedness_flag() {
	let mut w = MemWriter::new(0x1000);
	let unsigned = w.num_unsigned(42);
	let signed = w.num_signed(-5);
	let img = image(w);
	let options = ReadOptions::default();

	assert_eq!(read_node(&img, &at(unsigned, "node"), &options).expect("node reads"), Node::Num(NumValue::Unsigned(42)));
	assert_eq!(read_node(&img, &at(signed, "node"), &options).expect("node reads"), Node::Num(NumValue::Signed(-5)));
}

#[test]
fn expression_chain_is_read_in_order() {
	let mut w = MemWriter::new(0x1000);
	let one = w.num_unsigned(1);
	let two = w.num_unsigned(2);
	let add = w.expr("add", &[one, two]);
	let img = image(w);

	let node = read_node(&img, &at(add, "node"), &ReadOptions::default()).expect("node reads");
	assert_eq!(node, Node::expr("add", vec![Node::unsigned(1), Node::unsigned(2)]));
	assert_eq!(render_node(&node), "add <1> <2>");
}

#[test]
fn argument_chains_of_arguments_are_not_read() {
	let mut w = MemWriter::new(0x1000);
	let two = w.num_unsigned(2);
	let three = w.num_unsigned(3);
	let mul = w.expr("mul", &[two, three]);
	let text = w.string(b"x");
	let add = w.expr("add", &[mul, text]);
	let img = image(w);

	let node = read_node(&img, &at(add, "node"), &ReadOptions::default()).expect("node reads");
	let Node::Expr { args, .. } = &node else {
		panic!("expected expression, got {node:?}");
	};
	assert_eq!(args[0], Node::expr("mul", Vec::new()));
	assert_eq!(render_node(&node), "add mul \"x\"");
}

#[test]
fn cyclic_argument_chain_is_truncated() {
	let mut w = MemWriter::new(0x1000);
	let a = w.num_unsigned(1);
	let b = w.num_unsigned(2);
	let call = w.expr("loop", &[a, b]);
	w.set_next(b, a);
	let img = image(w);

	let options = ReadOptions {
		max_args: 5,
		..ReadOptions::default()
	};
	let node = read_node(&img, &at(call, "node"), &options).expect("node reads");
	assert_eq!(render_node(&node), "loop <1> <2> <1> <2> <1> ...");
}

#[test]
fn unreadable_argument_degrades_to_placeholder() {
	let mut w = MemWriter::new(0x1000);
	let one = w.num_unsigned(1);
	let call = w.expr("f", &[one]);
	w.set_next(one, 0xdead_0000);
	let img = image(w);

	let node = read_node(&img, &at(call, "node"), &ReadOptions::default()).expect("node reads");
	assert_eq!(render_node(&node), "f <1> ???");
}

#[test]
fn unknown_node_tag_is_other() {
	let mut w = MemWriter::new(0x1000);
	let odd = w.node(9);
	let img = image(w);

	assert_eq!(read_node(&img, &at(odd, "node"), &ReadOptions::default()).expect("node reads"), Node::Other);
}

#[test]
fn unmapped_root_node_is_an_error() {
	let img = image(MemWriter::new(0x1000));
	let err = read_node(&img, &at(0x9000, "node"), &ReadOptions::default()).expect_err("unmapped node fails");
	assert!(matches!(err, PlyError::UnmappedAddress { addr: 0x9000 }));
}

#[test]
fn type_graph_reads_nested_descriptors() {
	let mut w = MemWriter::new(0x4000);
	let int = w.scalar("int");
	let inner = w.pointer(int);
	let outer = w.pointer(inner);
	let ch = w.scalar("char");
	let arr = w.array(ch, 4);
	let img = image(w);
	let options = ReadOptions::default();
	let render = RenderOptions::default();

	let (arena, root) = read_type(&img, &at(outer, "type"), &options).expect("type reads");
	assert_eq!(render_type(&arena, root, &render), "**int");

	let (arena, root) = read_type(&img, &at(arr, "type"), &options).expect("type reads");
	assert_eq!(render_type(&arena, root, &render), "char[4]");
}

#[test]
fn named_and_composite_descriptors() {
	let mut w = MemWriter::new(0x4000);
	let void = w.ty(T_VOID);
	let func = w.func_type(void);
	let tdef = w.named_type(T_TYPEDEF, "pid_t");
	let st = w.named_type(T_STRUCT, "task_struct");
	let key = w.pointer(st);
	let map = w.map(key, tdef);
	let img = image(w);
	let options = ReadOptions::default();

	let (arena, root) = read_type(&img, &at(func, "type"), &options).expect("type reads");
	assert_eq!(render_type(&arena, root, &RenderOptions::default()), "void (*)()");

	let (arena, root) = read_type(&img, &at(map, "type"), &options).expect("type reads");
	assert_eq!(render_type(&arena, root, &RenderOptions::default()), "pid_t{pid_t}");
	let keyed = RenderOptions {
		map_style: crate::ply::MapStyle::KeyValue,
		..RenderOptions::default()
	};
	assert_eq!(render_type(&arena, root, &keyed), "{*struct task_struct}pid_t");
}

#[test]
fn cyclic_type_graph_becomes_cyclic_arena() {
	let mut w = MemWriter::new(0x4000);
	let ptr = w.pointer(0);
	let arr = w.array(ptr, 2);
	w.set_inner(ptr, arr);
	let img = image(w);

	let (arena, root) = read_type(&img, &at(ptr, "type"), &ReadOptions::default()).expect("type reads");
	assert_eq!(arena.len(), 2);

	let render = RenderOptions {
		max_type_depth: 4,
		..RenderOptions::default()
	};
	assert_eq!(render_type(&arena, root, &render), "**...[2][2]");
}

#[test]
fn deep_type_chain_is_cut_at_read_budget() {
	let mut w = MemWriter::new(0x4000);
	let mut top = w.scalar("int");
	for _ in 0..10 {
		top = w.pointer(top);
	}
	let img = image(w);

	let options = ReadOptions {
		max_type_depth: 3,
		..ReadOptions::default()
	};
	let (arena, root) = read_type(&img, &at(top, "type"), &options).expect("type reads");
	assert_eq!(arena.get(crate::ply::TypeId(arena.len() - 1)), Some(&TypeDesc::Truncated));
	assert_eq!(render_type(&arena, root, &RenderOptions::default()), "***...");
}

#[test]
fn self_referencing_map_reads_as_one_descriptor() {
	let mut w = MemWriter::new(0x4000);
	let map = w.map(0, 0);
	w.put_u64(map + 8, map);
	w.put_u64(map + 16, map);
	let img = image(w);

	let (arena, root) = read_type(&img, &at(map, "type"), &ReadOptions::default()).expect("type reads");
	assert_eq!(arena.len(), 1);
	assert_eq!(arena.get(root), Some(&TypeDesc::Map { key: root, value: root }));

	let render = RenderOptions {
		max_type_visits: 3,
		..RenderOptions::default()
	};
	assert_eq!(render_type(&arena, root, &render), "...{...}{...}{...}");

	let rendered = render_type(&arena, root, &RenderOptions::default());
	assert!(rendered.contains("..."));
	assert!(rendered.len() < 10 * RenderOptions::default().max_type_visits);
}

#[test]
fn shared_map_descriptors_are_read_once() {
	let mut w = MemWriter::new(0x4000);
	let mut top = w.scalar("int");
	for _ in 0..30 {
		top = w.map(top, top);
	}
	let img = image(w);

	let (arena, root) = read_type(&img, &at(top, "type"), &ReadOptions::default()).expect("type reads");
	assert_eq!(arena.len(), 31);

	let keyed = RenderOptions {
		map_style: crate::ply::MapStyle::KeyValue,
		..RenderOptions::default()
	};
	let rendered = render_type(&arena, root, &keyed);
	assert!(rendered.starts_with("{{{"));
	assert!(rendered.len() < 10 * keyed.max_type_visits);
}

#[test]
fn oversized_read_depth_is_clamped() {
	let mut w = MemWriter::new(0x4000);
	let mut top = w.scalar("int");
	for _ in 0..300 {
		top = w.pointer(top);
	}
	let img = image(w);

	let options = ReadOptions {
		max_type_depth: u32::MAX,
		max_type_nodes: usize::MAX,
		..ReadOptions::default()
	};
	let (arena, root) = read_type(&img, &at(top, "type"), &options).expect("type reads");
	assert_eq!(arena.len(), crate::ply::MAX_TYPE_DEPTH as usize + 1);
	assert_eq!(arena.get(crate::ply::TypeId(arena.len() - 1)), Some(&TypeDesc::Truncated));
}

#[test]
fn unreadable_pointee_is_placeholder() {
	let mut w = MemWriter::new(0x4000);
	let ptr = w.pointer(0xbad0_0000);
	let img = image(w);

	let (arena, root) = read_type(&img, &at(ptr, "type"), &ReadOptions::default()).expect("type reads");
	assert_eq!(render_type(&arena, root, &RenderOptions::default()), "*???");
}

#[test]
fn symbol_and_function_names() {
	let mut w = MemWriter::new(0x8000);
	let named = w.sym(Some("x"));
	let anon = w.sym(None);
	let func = w.func("kprobe");
	let img = image(w);

	assert_eq!(read_symbol(&img, &at(named, "sym")).expect("sym reads").name.as_deref(), Some(&b"x"[..]));
	assert_eq!(read_symbol(&img, &at(anon, "sym")).expect("sym reads").name, None);
	assert_eq!(read_function(&img, &at(func, "func")).expect("func reads").name.as_deref(), Some(&b"kprobe"[..]));
}
