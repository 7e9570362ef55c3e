//! Shared test helpers for workspace crates.
//!
//! [`MemWriter`] lays out ply structs the way the built-in LP64 layout expects them, so tests
//! can build memory images without hand-encoding bytes.

use std::path::{Path, PathBuf};

/// `ntype` discriminant of an expression node.
pub const N_EXPR: u32 = 0;
/// `ntype` discriminant of a string node.
pub const N_STRING: u32 = 1;
/// `ntype` discriminant of a numeric node.
pub const N_NUM: u32 = 2;

/// `ttype` discriminants in layout order.
pub const T_VOID: u32 = 0;
/// Typedef descriptor.
pub const T_TYPEDEF: u32 = 1;
/// Scalar descriptor.
pub const T_SCALAR: u32 = 2;
/// Pointer descriptor.
pub const T_POINTER: u32 = 3;
/// Array descriptor.
pub const T_ARRAY: u32 = 4;
/// Struct descriptor.
pub const T_STRUCT: u32 = 5;
/// Function descriptor.
pub const T_FUNC: u32 = 6;
/// Map descriptor.
pub const T_MAP: u32 = 7;

const NODE_SIZE: usize = 32;
const TYPE_SIZE: usize = 24;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Bump allocator over one contiguous region of fake process memory.
#[derive(Debug, Clone)]
pub struct MemWriter {
	base: u64,
	bytes: Vec<u8>,
}

impl MemWriter {
	/// Start an empty region at `base`.
	pub fn new(base: u64) -> Self {
		Self { base, bytes: Vec::new() }
	}

	/// Region base address.
	pub fn base(&self) -> u64 {
		self.base
	}

	/// Bytes written so far.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Consume the writer into `(base, bytes)`.
	pub fn into_parts(self) -> (u64, Vec<u8>) {
		(self.base, self.bytes)
	}

	/// Lowercase hex encoding of the region bytes.
	pub fn hex(&self) -> String {
		self.bytes.iter().map(|byte| format!("{byte:02x}")).collect()
	}

	/// Reserve `size` zeroed bytes at the next 8-byte boundary.
	pub fn alloc(&mut self, size: usize) -> u64 {
		let aligned = (self.bytes.len() + 7) & !7;
		self.bytes.resize(aligned + size, 0);
		self.base + aligned as u64
	}

	fn offset(&self, addr: u64, len: usize) -> usize {
		let offset = (addr - self.base) as usize;
		assert!(offset + len <= self.bytes.len(), "write at 0x{addr:x} outside allocated bytes");
		offset
	}

	/// Store one byte.
	pub fn put_u8(&mut self, addr: u64, value: u8) {
		let at = self.offset(addr, 1);
		self.bytes[at] = value;
	}

	/// Store a little-endian `u32`.
	pub fn put_u32(&mut self, addr: u64, value: u32) {
		let at = self.offset(addr, 4);
		self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
	}

	/// Store a little-endian `u64`.
	pub fn put_u64(&mut self, addr: u64, value: u64) {
		let at = self.offset(addr, 8);
		self.bytes[at..at + 8].copy_from_slice(&value.to_le_bytes());
	}

	/// Store a little-endian `i64`.
	pub fn put_i64(&mut self, addr: u64, value: i64) {
		self.put_u64(addr, value as u64);
	}

	/// Copy a NUL-terminated string into the region and return its address.
	pub fn cstr(&mut self, text: &[u8]) -> u64 {
		let addr = self.alloc(text.len() + 1);
		let at = self.offset(addr, text.len());
		self.bytes[at..at + text.len()].copy_from_slice(text);
		addr
	}

	/// `N_NUM` node read through `num.u64`.
	pub fn num_unsigned(&mut self, value: u64) -> u64 {
		let node = self.node(N_NUM);
		self.put_u64(node + 16, value);
		self.put_u8(node + 24, 1);
		node
	}

	/// `N_NUM` node read through `num.s64`.
	pub fn num_signed(&mut self, value: i64) -> u64 {
		let node = self.node(N_NUM);
		self.put_i64(node + 16, value);
		node
	}

	/// `N_STRING` node.
	pub fn string(&mut self, data: &[u8]) -> u64 {
		let node = self.node(N_STRING);
		let data = self.cstr(data);
		self.put_u64(node + 16, data);
		node
	}

	/// `N_EXPR` node whose `args` chain links `args` in order through `next`.
	pub fn expr(&mut self, func: &str, args: &[u64]) -> u64 {
		let node = self.node(N_EXPR);
		let func = self.cstr(func.as_bytes());
		self.put_u64(node + 16, func);
		for pair in args.windows(2) {
			self.set_next(pair[0], pair[1]);
		}
		self.put_u64(node + 24, args.first().copied().unwrap_or(0));
		node
	}

	/// Node with an arbitrary `ntype` value and otherwise zeroed fields.
	pub fn node(&mut self, ntype: u32) -> u64 {
		let node = self.alloc(NODE_SIZE);
		self.put_u32(node, ntype);
		node
	}

	/// Overwrite a node's `next` link.
	pub fn set_next(&mut self, node: u64, next: u64) {
		self.put_u64(node + 8, next);
	}

	/// Descriptor with an arbitrary `ttype` and zeroed payload.
	pub fn ty(&mut self, ttype: u32) -> u64 {
		let ty = self.alloc(TYPE_SIZE);
		self.put_u32(ty, ttype);
		ty
	}

	/// Named descriptor (`T_TYPEDEF`, `T_SCALAR`, `T_STRUCT`).
	pub fn named_type(&mut self, ttype: u32, name: &str) -> u64 {
		let ty = self.ty(ttype);
		let name = self.cstr(name.as_bytes());
		self.put_u64(ty + 8, name);
		ty
	}

	/// `T_SCALAR` descriptor.
	pub fn scalar(&mut self, name: &str) -> u64 {
		self.named_type(T_SCALAR, name)
	}

	/// `T_POINTER` descriptor.
	pub fn pointer(&mut self, pointee: u64) -> u64 {
		let ty = self.ty(T_POINTER);
		self.put_u64(ty + 8, pointee);
		ty
	}

	/// `T_ARRAY` descriptor.
	pub fn array(&mut self, elem: u64, len: u64) -> u64 {
		let ty = self.ty(T_ARRAY);
		self.put_u64(ty + 8, elem);
		self.put_u64(ty + 16, len);
		ty
	}

	/// `T_FUNC` descriptor.
	pub fn func_type(&mut self, ret: u64) -> u64 {
		let ty = self.ty(T_FUNC);
		self.put_u64(ty + 8, ret);
		ty
	}

	/// `T_MAP` descriptor.
	pub fn map(&mut self, key: u64, value: u64) -> u64 {
		let ty = self.ty(T_MAP);
		self.put_u64(ty + 8, value);
		self.put_u64(ty + 16, key);
		ty
	}

	/// Overwrite the first reference slot of a descriptor (pointee, element, return or value type).
	pub fn set_inner(&mut self, ty: u64, inner: u64) {
		self.put_u64(ty + 8, inner);
	}

	/// `sym` struct; `None` leaves the name pointer null.
	pub fn sym(&mut self, name: Option<&str>) -> u64 {
		let sym = self.alloc(16);
		if let Some(name) = name {
			let name = self.cstr(name.as_bytes());
			self.put_u64(sym, name);
		}
		sym
	}

	/// `func` struct.
	pub fn func(&mut self, name: &str) -> u64 {
		let func = self.alloc(8);
		let name = self.cstr(name.as_bytes());
		self.put_u64(func, name);
		func
	}
}

/// Root entry for [`image_json`].
#[derive(Debug, Clone)]
pub struct RootSpec {
	/// Root name.
	pub name: &'static str,
	/// Struct address or pointer value.
	pub addr: u64,
	/// Struct tag; `None` for an opaque value.
	pub tag: Option<&'static str>,
	/// Whether the root is reached through a pointer.
	pub pointer: bool,
}

impl RootSpec {
	/// Struct root reached directly.
	pub fn value(name: &'static str, addr: u64, tag: &'static str) -> Self {
		Self {
			name,
			addr,
			tag: Some(tag),
			pointer: false,
		}
	}

	/// Struct root reached through a pointer.
	pub fn pointer(name: &'static str, addr: u64, tag: &'static str) -> Self {
		Self {
			name,
			addr,
			tag: Some(tag),
			pointer: true,
		}
	}
}

/// Serialize regions and roots in the JSON image format.
pub fn image_json(regions: &[&MemWriter], roots: &[RootSpec]) -> serde_json::Value {
	let regions: Vec<serde_json::Value> = regions
		.iter()
		.map(|region| {
			serde_json::json!({
				"base": format!("0x{:x}", region.base()),
				"bytes": region.hex(),
			})
		})
		.collect();
	let roots: Vec<serde_json::Value> = roots
		.iter()
		.map(|root| {
			serde_json::json!({
				"name": root.name,
				"addr": format!("0x{:x}", root.addr),
				"tag": root.tag,
				"pointer": root.pointer,
			})
		})
		.collect();

	serde_json::json!({ "regions": regions, "roots": roots })
}
