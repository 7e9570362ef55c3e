use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ply::path::fields;
use crate::ply::render::MAX_TYPE_DEPTH;
use crate::ply::{Function, Node, NumValue, Result, Symbol, TypeArena, TypeDesc, TypeId, ValueAccess};

/// Traversal budgets applied while copying values out of inspected memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
	/// Maximum number of arguments read from one `expr.args` chain.
	pub max_args: usize,
	/// Maximum nesting of type descriptors followed from the root; clamped to
	/// [`MAX_TYPE_DEPTH`](crate::ply::MAX_TYPE_DEPTH).
	pub max_type_depth: u32,
	/// Maximum number of distinct type descriptors read for one root.
	pub max_type_nodes: usize,
}

impl Default for ReadOptions {
	fn default() -> Self {
		Self {
			max_args: 256,
			max_type_depth: 64,
			max_type_nodes: 1024,
		}
	}
}

/// Read an AST node and one level of its argument chain.
///
/// Failures reading the node itself are returned; failures inside an argument degrade that
/// argument to [`Node::Unreadable`].
pub fn read_node<A: ValueAccess>(access: &A, value: &A::Value, options: &ReadOptions) -> Result<Node> {
	read_node_impl(access, value, options, false)
}

fn read_node_impl<A: ValueAccess>(access: &A, value: &A::Value, options: &ReadOptions, stop: bool) -> Result<Node> {
	let ntype = access.field_tag(value, &fields::NTYPE)?;
	let node = match ntype.as_str() {
		"N_EXPR" => {
			let func = access.field_string(value, &fields::EXPR_FUNC)?.unwrap_or_default();
			let func = String::from_utf8_lossy(&func).into_owned().into_boxed_str();
			if stop {
				return Ok(Node::Expr {
					func,
					args: Vec::new(),
					truncated: false,
				});
			}

			let (args, truncated) = read_arg_chain(access, value, options);
			Node::Expr { func, args, truncated }
		}
		"N_STRING" => Node::Str(access.field_string(value, &fields::STRING_DATA)?.unwrap_or_default()),
		"N_NUM" => {
			if access.field_bool(value, &fields::NUM_UNSIGND)? {
				Node::Num(NumValue::Unsigned(access.field_uint(value, &fields::NUM_U64)?))
			} else {
				Node::Num(NumValue::Signed(access.field_int(value, &fields::NUM_S64)?))
			}
		}
		_ => Node::Other,
	};
	Ok(node)
}

// Walks `expr.args` -> `next` -> ... until null, an unreadable link, or `max_args`.
fn read_arg_chain<A: ValueAccess>(access: &A, value: &A::Value, options: &ReadOptions) -> (Vec<Node>, bool) {
	let mut args = Vec::new();
	let mut cursor = match access.follow(value, &fields::EXPR_ARGS) {
		Ok(head) => head,
		Err(err) => {
			tracing::debug!(%err, "argument chain head unreadable");
			return (vec![Node::Unreadable], false);
		}
	};

	while let Some(arg) = cursor {
		if args.len() >= options.max_args {
			tracing::debug!(max_args = options.max_args, "argument chain truncated");
			return (args, true);
		}

		let readable = match read_node_impl(access, &arg, options, true) {
			Ok(node) => {
				args.push(node);
				true
			}
			Err(err) => {
				tracing::debug!(%err, "argument unreadable");
				args.push(Node::Unreadable);
				false
			}
		};

		cursor = match access.follow(&arg, &fields::NEXT) {
			Ok(next) => next,
			Err(err) => {
				tracing::debug!(%err, "argument chain link unreadable");
				if readable {
					args.push(Node::Unreadable);
				}
				None
			}
		};
	}

	(args, false)
}

/// Read the type graph reachable from `value` into an arena.
///
/// Descriptors are deduplicated by [`ValueAccess::identity`], so a cycle in memory becomes a
/// cycle in the arena rather than an unbounded read.
pub fn read_type<A: ValueAccess>(access: &A, value: &A::Value, options: &ReadOptions) -> Result<(TypeArena, TypeId)> {
	let mut reader = TypeReader {
		access,
		options,
		arena: TypeArena::new(),
		seen: HashMap::new(),
	};

	// Only the root's own tag is fatal; everything below degrades in place.
	let ttype = access.field_tag(value, &fields::TTYPE)?;
	let root = reader.reserve(value);
	let desc = reader.read_desc(value, &ttype, 0)?;
	reader.arena.set(root, desc);
	Ok((reader.arena, root))
}

struct TypeReader<'a, A: ValueAccess> {
	access: &'a A,
	options: &'a ReadOptions,
	arena: TypeArena,
	seen: HashMap<u64, TypeId>,
}

impl<A: ValueAccess> TypeReader<'_, A> {
	fn reserve(&mut self, value: &A::Value) -> TypeId {
		let id = self.arena.push(TypeDesc::Truncated);
		if let Some(key) = self.access.identity(value) {
			self.seen.insert(key, id);
		}
		id
	}

	fn child(&mut self, value: &A::Value, path: &crate::ply::FieldPath, depth: u32) -> TypeId {
		let target = match self.access.follow(value, path) {
			Ok(Some(target)) => target,
			Ok(None) | Err(_) => return self.arena.push(TypeDesc::Unreadable),
		};

		if let Some(id) = self.access.identity(&target).and_then(|key| self.seen.get(&key).copied()) {
			return id;
		}
		if depth >= self.options.max_type_depth.min(MAX_TYPE_DEPTH) || self.arena.len() >= self.options.max_type_nodes {
			tracing::debug!(depth, nodes = self.arena.len(), "type read budget exhausted");
			return self.arena.push(TypeDesc::Truncated);
		}

		let id = self.reserve(&target);
		let desc = self
			.access
			.field_tag(&target, &fields::TTYPE)
			.and_then(|ttype| self.read_desc(&target, &ttype, depth))
			.unwrap_or_else(|err| {
				tracing::debug!(%err, "type descriptor unreadable");
				TypeDesc::Unreadable
			});
		self.arena.set(id, desc);
		id
	}

	fn read_desc(&mut self, value: &A::Value, ttype: &str, depth: u32) -> Result<TypeDesc> {
		let next = depth + 1;
		let desc = match ttype {
			"T_VOID" => TypeDesc::Void,
			"T_TYPEDEF" => TypeDesc::Typedef(self.name(value, &fields::TDEF_NAME)?),
			"T_SCALAR" => TypeDesc::Scalar(self.name(value, &fields::SCALAR_NAME)?),
			"T_STRUCT" => TypeDesc::Struct(self.name(value, &fields::STRUCT_NAME)?),
			"T_POINTER" => TypeDesc::Pointer(self.child(value, &fields::PTR_TYPE, next)),
			"T_ARRAY" => {
				let len = self.access.field_uint(value, &fields::ARRAY_LEN)?;
				TypeDesc::Array {
					elem: self.child(value, &fields::ARRAY_TYPE, next),
					len,
				}
			}
			"T_FUNC" => TypeDesc::Func {
				ret: self.child(value, &fields::FUNC_TYPE, next),
			},
			"T_MAP" => TypeDesc::Map {
				key: self.child(value, &fields::MAP_KTYPE, next),
				value: self.child(value, &fields::MAP_VTYPE, next),
			},
			_ => TypeDesc::Other,
		};
		Ok(desc)
	}

	fn name(&self, value: &A::Value, path: &crate::ply::FieldPath) -> Result<Box<str>> {
		let raw = self.access.field_string(value, path)?.unwrap_or_default();
		Ok(String::from_utf8_lossy(&raw).into_owned().into_boxed_str())
	}
}

/// Read a symbol; a null name pointer yields an anonymous symbol.
pub fn read_symbol<A: ValueAccess>(access: &A, value: &A::Value) -> Result<Symbol> {
	Ok(Symbol {
		name: access.field_string(value, &fields::NAME)?,
	})
}

/// Read a function handle.
pub fn read_function<A: ValueAccess>(access: &A, value: &A::Value) -> Result<Function> {
	Ok(Function {
		name: access.field_string(value, &fields::NAME)?,
	})
}

#[cfg(test)]
mod tests;
