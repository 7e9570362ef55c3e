#![allow(missing_docs)]

use std::path::Path;
use std::process::{Command, Output};

use plyfmt_testkit::{MemWriter, RootSpec, fixture_path, image_json};

fn plyfmt(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_plyfmt")).args(args).output().expect("plyfmt executes")
}

fn stdout_of(output: Output) -> String {
	assert!(
		output.status.success(),
		"plyfmt failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8(output.stdout).expect("stdout is utf8")
}

fn sample() -> String {
	fixture_path("sample.json").display().to_string()
}

#[test]
fn render_prints_every_root() {
	let stdout = stdout_of(plyfmt(&["render", &sample()]));

	assert!(stdout.contains("sum = *plyN(add <1> <2>)\n"), "missing sum in {stdout}");
	assert!(stdout.contains("pp = plyT(**int)\n"));
	assert!(stdout.contains("anon = *plyS(<anonymous>)\n"));
	assert!(stdout.contains("raw = <no printer>\n"));
	assert!(stdout.contains("dangling = <no printer>\n"));
}

#[test]
fn render_single_root_with_options() {
	let stdout = stdout_of(plyfmt(&["render", &sample(), "--root", "counts", "--map-style", "key-value"]));
	assert_eq!(stdout, "counts = plyT({int}u64)\n");

	let stdout = stdout_of(plyfmt(&["render", &sample(), "--root", "loop", "--max-type-depth", "2"]));
	assert_eq!(stdout, "loop = plyT(**...)\n");

	let stdout = stdout_of(plyfmt(&["render", &sample(), "--root", "anon", "--anonymous", "?"]));
	assert_eq!(stdout, "anon = *plyS(?)\n");
}

#[test]
fn render_json_reports_hints_and_declines() {
	let stdout = stdout_of(plyfmt(&["render", &sample(), "--json"]));
	let rows: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is json");
	let rows = rows.as_array().expect("json array");

	let sum = rows.iter().find(|row| row["name"] == "sum").expect("sum row");
	assert_eq!(sum["hint"], "node");
	assert_eq!(sum["text"], "*plyN(add <1> <2>)");

	let dangling = rows.iter().find(|row| row["name"] == "dangling").expect("dangling row");
	assert!(dangling["hint"].is_null());
	assert!(dangling["text"].is_null());
}

#[test]
fn render_ad_hoc_address_from_written_image() {
	let mut w = MemWriter::new(0x4000);
	let arg = w.num_signed(-1);
	let args = (0..10).map(|value| w.num_unsigned(value)).collect::<Vec<_>>();
	let long = w.expr("sum", &args);
	let neg = w.expr("neg", &[arg]);
	let json = image_json(&[&w], &[RootSpec::value("neg", neg, "node")]);

	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("image.json");
	std::fs::write(&path, json.to_string()).expect("image written");
	let path = path.display().to_string();

	let addr = format!("0x{long:x}");
	let stdout = stdout_of(plyfmt(&["render", &path, "--addr", &addr, "--tag", "node", "--ptr", "--max-args", "3"]));
	assert_eq!(stdout, format!("0x{long:016x} = *plyN(sum <0> <1> <2> ...)\n"));

	let stdout = stdout_of(plyfmt(&["render", &path, "--root", "neg"]));
	assert_eq!(stdout, "neg = plyN(neg <-1>)\n");
}

#[test]
fn render_self_referencing_map_and_depth_limit() {
	let mut w = MemWriter::new(0x4000);
	let map = w.map(0, 0);
	w.put_u64(map + 8, map);
	w.put_u64(map + 16, map);
	let json = image_json(&[&w], &[RootSpec::value("rec", map, "type")]);

	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("image.json");
	std::fs::write(&path, json.to_string()).expect("image written");
	let path = path.display().to_string();

	let stdout = stdout_of(plyfmt(&["render", &path, "--root", "rec", "--map-style", "key-value"]));
	assert!(stdout.starts_with("rec = plyT({{"));
	assert!(stdout.ends_with("...)\n"));

	let stdout = stdout_of(plyfmt(&["render", &sample(), "--root", "loop", "--max-type-depth", "256"]));
	assert_eq!(stdout, format!("loop = plyT({}...)\n", "*".repeat(256)));

	let output = plyfmt(&["render", &sample(), "--root", "loop", "--max-type-depth", "1000000"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("--max-type-depth"));
}

#[test]
fn roots_and_layout_listings() {
	let stdout = stdout_of(plyfmt(&["roots", &sample()]));
	assert!(stdout.contains("roots: 11"));
	assert!(stdout.contains("dangling tag=node addr=0x00000000dead0000 ptr (unmapped)"));

	let stdout = stdout_of(plyfmt(&["layout", "--tag", "node"]));
	assert!(stdout.starts_with("node size=32\n"));
	assert!(stdout.contains("enum(N_EXPR, N_STRING, N_NUM)"));
	assert!(stdout.contains("*node"));
}

#[test]
fn bad_selectors_and_missing_files_fail() {
	let output = plyfmt(&["render", &sample(), "--addr", "0x10000"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("--addr requires --tag"));

	let output = plyfmt(&["render", &sample(), "--root", "nope"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("root not found: nope"));

	let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join("missing.json");
	let output = plyfmt(&["roots", &missing.display().to_string()]);
	assert!(!output.status.success());
}
