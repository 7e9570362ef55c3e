use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::ply::{
	ReadOptions, RenderOptions, Result, ValueAccess, read_function, read_node, read_symbol, read_type, render_function, render_node, render_symbol,
	render_type,
};

/// Category hint a host may use to frame rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayHint {
	/// Function handle.
	Func,
	/// AST node.
	Node,
	/// Symbol.
	Sym,
	/// Type descriptor.
	Type,
}

impl DisplayHint {
	/// Hint name as hosts expect it.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Func => "func",
			Self::Node => "node",
			Self::Sym => "sym",
			Self::Type => "type",
		}
	}
}

impl fmt::Display for DisplayHint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Which renderer produces the body of a printed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrinterKind {
	/// `plyF(...)`.
	Func,
	/// `plyN(...)`.
	Node,
	/// `plyS(...)`.
	Sym,
	/// `plyT(...)`.
	Type,
}

impl PrinterKind {
	/// Output prefix identifying the renderer.
	pub fn prefix(self) -> &'static str {
		match self {
			Self::Func => "plyF",
			Self::Node => "plyN",
			Self::Sym => "plyS",
			Self::Type => "plyT",
		}
	}

	/// Matching display hint.
	pub fn display_hint(self) -> DisplayHint {
		match self {
			Self::Func => DisplayHint::Func,
			Self::Node => DisplayHint::Node,
			Self::Sym => DisplayHint::Sym,
			Self::Type => DisplayHint::Type,
		}
	}
}

/// Mapping from struct tag to printer, built once and passed to whoever dispatches.
#[derive(Debug, Clone, Default)]
pub struct PrinterRegistry {
	by_tag: HashMap<Box<str>, PrinterKind>,
	read: ReadOptions,
	render: RenderOptions,
}

impl PrinterRegistry {
	/// Empty registry; nothing is printed until tags are registered.
	pub fn new(read: ReadOptions, render: RenderOptions) -> Self {
		Self {
			by_tag: HashMap::new(),
			read,
			render,
		}
	}

	/// Registry with the ply struct tags `func`, `node`, `sym` and `type`.
	pub fn with_defaults(read: ReadOptions, render: RenderOptions) -> Self {
		let mut registry = Self::new(read, render);
		registry.register("func", PrinterKind::Func);
		registry.register("node", PrinterKind::Node);
		registry.register("sym", PrinterKind::Sym);
		registry.register("type", PrinterKind::Type);
		registry
	}

	/// Bind `tag` to `kind`, returning the previous binding.
	pub fn register(&mut self, tag: impl Into<Box<str>>, kind: PrinterKind) -> Option<PrinterKind> {
		self.by_tag.insert(tag.into(), kind)
	}

	/// Printer bound to `tag`, if any.
	pub fn kind_for(&self, tag: &str) -> Option<PrinterKind> {
		self.by_tag.get(tag).copied()
	}

	/// Pick a printer for `value`.
	///
	/// Pointers are dereferenced first; a failed dereference, a non-struct value or an
	/// unregistered tag all decline with `None`.
	pub fn lookup<A: ValueAccess>(&self, access: &A, value: &A::Value) -> Option<Printer<'_, A::Value>> {
		let (value, via_pointer) = if access.is_pointer(value) {
			match access.dereference(value) {
				Ok(target) => (target, true),
				Err(err) => {
					tracing::debug!(%err, "pointer dereference failed; declining");
					return None;
				}
			}
		} else {
			(value.clone(), false)
		};

		let tag = access.struct_tag(&value)?;
		let kind = self.kind_for(&tag)?;
		Some(Printer {
			kind,
			value,
			via_pointer,
			registry: self,
		})
	}

	/// Look up and render, keeping the display hint.
	///
	/// `None` when no printer applies; the text is `None` when a printer applies but the
	/// value is unreadable.
	pub fn render_with_hint<A: ValueAccess>(&self, access: &A, value: &A::Value) -> Option<(DisplayHint, Option<String>)> {
		let printer = self.lookup(access, value)?;
		let text = match printer.render(access) {
			Ok(text) => Some(text),
			Err(err) => {
				tracing::debug!(%err, kind = printer.kind.prefix(), "value unreadable; declining");
				None
			}
		};
		Some((printer.display_hint(), text))
	}

	/// Look up and render in one step; `None` when no printer applies or the value is unreadable.
	pub fn render_value<A: ValueAccess>(&self, access: &A, value: &A::Value) -> Option<String> {
		self.render_with_hint(access, value).and_then(|(_, text)| text)
	}
}

/// A value matched to its renderer.
#[derive(Debug, Clone)]
pub struct Printer<'r, V> {
	kind: PrinterKind,
	value: V,
	via_pointer: bool,
	registry: &'r PrinterRegistry,
}

impl<V> Printer<'_, V> {
	/// Renderer that will produce the body.
	pub fn kind(&self) -> PrinterKind {
		self.kind
	}

	/// Display hint for the host.
	pub fn display_hint(&self) -> DisplayHint {
		self.kind.display_hint()
	}

	/// Whether the value was reached through a pointer.
	pub fn via_pointer(&self) -> bool {
		self.via_pointer
	}

	/// Render the framed string, e.g. `*plyN(add <1> <2>)`.
	pub fn render<A: ValueAccess<Value = V>>(&self, access: &A) -> Result<String> {
		let body = self.render_body(access)?;
		let marker = if self.via_pointer { "*" } else { "" };
		Ok(format!("{marker}{}({body})", self.kind.prefix()))
	}

	fn render_body<A: ValueAccess<Value = V>>(&self, access: &A) -> Result<String> {
		let read = &self.registry.read;
		let render = &self.registry.render;
		let body = match self.kind {
			PrinterKind::Node => render_node(&read_node(access, &self.value, read)?),
			PrinterKind::Type => {
				let (arena, root) = read_type(access, &self.value, read)?;
				render_type(&arena, root, render)
			}
			PrinterKind::Sym => render_symbol(&read_symbol(access, &self.value)?, render),
			PrinterKind::Func => render_function(&read_function(access, &self.value)?, render),
		};
		Ok(body)
	}
}
