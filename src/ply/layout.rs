use serde::{Deserialize, Serialize};

use crate::ply::{FieldPath, PlyError, Result};

const POINTER_SIZE: usize = 8;

/// Storage kind of one struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
	/// Pointer to a struct with the given tag.
	Ptr {
		/// Struct tag of the pointee.
		tag: String,
	},
	/// `char *` to a NUL-terminated string.
	#[serde(rename = "cstr")]
	CStr,
	/// Signed 64-bit integer.
	I64,
	/// Unsigned 64-bit integer.
	U64,
	/// One-byte boolean.
	Bool,
	/// 32-bit enum discriminant; `variants[n]` names value `n`.
	Enum {
		/// Variant names indexed by discriminant value.
		variants: Vec<String>,
	},
}

impl FieldKind {
	/// Storage size in bytes.
	pub fn size(&self) -> usize {
		match self {
			Self::Ptr { .. } | Self::CStr | Self::I64 | Self::U64 => POINTER_SIZE,
			Self::Bool => 1,
			Self::Enum { .. } => 4,
		}
	}

	/// Short kind label for diagnostics.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Ptr { .. } => "ptr",
			Self::CStr => "cstr",
			Self::I64 => "i64",
			Self::U64 => "u64",
			Self::Bool => "bool",
			Self::Enum { .. } => "enum",
		}
	}
}

/// One field at a fixed byte offset. Union members share offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
	/// Dotted path, e.g. `num.u64`.
	pub path: String,
	/// Byte offset from the start of the struct.
	pub offset: usize,
	/// Storage kind.
	#[serde(flatten)]
	pub kind: FieldKind,
}

/// Layout of one tagged struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructLayout {
	/// Struct tag name as the host reports it.
	pub tag: String,
	/// Total struct size in bytes.
	pub size: usize,
	/// Field declarations.
	pub fields: Vec<FieldLayout>,
}

impl StructLayout {
	/// Look up a field by path.
	pub fn field(&self, path: &FieldPath) -> Option<&FieldLayout> {
		self.fields.iter().find(|field| field.path == path.as_str())
	}
}

/// Struct layouts for every tag a memory image can describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
	/// Struct layouts in declaration order.
	pub structs: Vec<StructLayout>,
}

impl Default for Layout {
	fn default() -> Self {
		Self::lp64()
	}
}

impl Layout {
	/// Built-in little-endian LP64 layout of the ply `node`, `type`, `sym` and `func` structs.
	pub fn lp64() -> Self {
		let node_ptr = || FieldKind::Ptr { tag: "node".to_owned() };
		let type_ptr = || FieldKind::Ptr { tag: "type".to_owned() };

		Self {
			structs: vec![
				StructLayout {
					tag: "node".to_owned(),
					size: 32,
					fields: vec![
						field("ntype", 0, enum_kind(&["N_EXPR", "N_STRING", "N_NUM"])),
						field("next", 8, node_ptr()),
						field("expr.func", 16, FieldKind::CStr),
						field("expr.args", 24, node_ptr()),
						field("string.data", 16, FieldKind::CStr),
						field("num.s64", 16, FieldKind::I64),
						field("num.u64", 16, FieldKind::U64),
						field("num.unsignd", 24, FieldKind::Bool),
					],
				},
				StructLayout {
					tag: "type".to_owned(),
					size: 24,
					fields: vec![
						field(
							"ttype",
							0,
							enum_kind(&["T_VOID", "T_TYPEDEF", "T_SCALAR", "T_POINTER", "T_ARRAY", "T_STRUCT", "T_FUNC", "T_MAP"]),
						),
						field("tdef.name", 8, FieldKind::CStr),
						field("scalar.name", 8, FieldKind::CStr),
						field("ptr.type", 8, type_ptr()),
						field("array.type", 8, type_ptr()),
						field("array.len", 16, FieldKind::U64),
						field("struct.name", 8, FieldKind::CStr),
						field("func.type", 8, type_ptr()),
						field("map.vtype", 8, type_ptr()),
						field("map.ktype", 16, type_ptr()),
					],
				},
				StructLayout {
					tag: "sym".to_owned(),
					size: 16,
					fields: vec![field("name", 0, FieldKind::CStr), field("type", 8, type_ptr())],
				},
				StructLayout {
					tag: "func".to_owned(),
					size: 8,
					fields: vec![field("name", 0, FieldKind::CStr)],
				},
			],
		}
	}

	/// Look up a struct layout by tag.
	pub fn get(&self, tag: &str) -> Option<&StructLayout> {
		self.structs.iter().find(|item| item.tag == tag)
	}

	/// Resolve `path` on struct `tag`.
	pub fn field(&self, tag: &str, path: &FieldPath) -> Result<&FieldLayout> {
		let item = self.get(tag).ok_or_else(|| PlyError::UnknownStructTag { tag: tag.to_owned() })?;
		item.field(path).ok_or_else(|| PlyError::UnknownField {
			tag: tag.to_owned(),
			field: path.to_string(),
		})
	}
}

fn field(path: &str, offset: usize, kind: FieldKind) -> FieldLayout {
	FieldLayout {
		path: path.to_owned(),
		offset,
		kind,
	}
}

fn enum_kind(variants: &[&str]) -> FieldKind {
	FieldKind::Enum {
		variants: variants.iter().map(|item| (*item).to_owned()).collect(),
	}
}
