use std::fmt;

use crate::ply::{PlyError, Result};

/// Parsed dotted field path such as `expr.args` or `num.u64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
	dotted: Box<str>,
	steps: usize,
}

impl FieldPath {
	/// Parse dotted field syntax. Each segment is `[A-Za-z0-9_]+`.
	pub fn parse(input: &str) -> Result<Self> {
		if input.is_empty() {
			return Err(PlyError::InvalidFieldPath { path: input.to_owned() });
		}

		let mut steps = 0_usize;
		for segment in input.split('.') {
			if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_') {
				return Err(PlyError::InvalidFieldPath { path: input.to_owned() });
			}
			steps += 1;
		}

		Ok(Self {
			dotted: input.into(),
			steps,
		})
	}

	/// Return the path in dotted form.
	pub fn as_str(&self) -> &str {
		&self.dotted
	}

	/// Iterate path segments in order.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.dotted.split('.')
	}

	/// Return the number of segments.
	pub fn len(&self) -> usize {
		self.steps
	}

	/// Always false; empty paths are rejected by [`FieldPath::parse`].
	pub fn is_empty(&self) -> bool {
		self.steps == 0
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.dotted)
	}
}

/// Field paths of the in-memory ply structs.
pub(crate) mod fields {
	use std::sync::LazyLock;

	use super::FieldPath;

	macro_rules! field_paths {
		($($ident:ident = $path:literal;)*) => {
			$(
				pub(crate) static $ident: LazyLock<FieldPath> = LazyLock::new(|| FieldPath {
					dotted: $path.into(),
					steps: $path.split('.').count(),
				});
			)*
		};
	}

	field_paths! {
		NTYPE = "ntype";
		NEXT = "next";
		EXPR_FUNC = "expr.func";
		EXPR_ARGS = "expr.args";
		STRING_DATA = "string.data";
		NUM_UNSIGND = "num.unsignd";
		NUM_U64 = "num.u64";
		NUM_S64 = "num.s64";
		TTYPE = "ttype";
		TDEF_NAME = "tdef.name";
		SCALAR_NAME = "scalar.name";
		PTR_TYPE = "ptr.type";
		ARRAY_TYPE = "array.type";
		ARRAY_LEN = "array.len";
		STRUCT_NAME = "struct.name";
		FUNC_TYPE = "func.type";
		MAP_KTYPE = "map.ktype";
		MAP_VTYPE = "map.vtype";
		NAME = "name";
	}
}
