use crate::ply::render::{MAX_TYPE_DEPTH, PLACEHOLDER, TRUNCATED};
use crate::ply::{MapStyle, RenderOptions, TypeArena, TypeDesc, TypeId};

/// Render the type expression rooted at `root`.
///
/// Nesting deeper than [`RenderOptions::max_type_depth`] and descriptors past
/// [`RenderOptions::max_type_visits`] are replaced with `...`, so cyclic or heavily shared
/// arenas terminate with bounded output.
pub fn render_type(arena: &TypeArena, root: TypeId, options: &RenderOptions) -> String {
	let mut writer = TypeWriter {
		out: String::new(),
		arena,
		options,
		max_depth: options.max_type_depth.min(MAX_TYPE_DEPTH),
		visits_left: options.max_type_visits,
	};
	writer.write(root, 0);
	writer.out
}

struct TypeWriter<'a> {
	out: String,
	arena: &'a TypeArena,
	options: &'a RenderOptions,
	max_depth: u32,
	visits_left: usize,
}

impl TypeWriter<'_> {
	// Every call that recurses spends one visit, so total calls stay within three per visit
	// even for maps, which write two children.
	fn write(&mut self, id: TypeId, depth: u32) {
		if depth >= self.max_depth || self.visits_left == 0 {
			self.out.push_str(TRUNCATED);
			return;
		}
		self.visits_left -= 1;

		let Some(desc) = self.arena.get(id) else {
			self.out.push_str(PLACEHOLDER);
			return;
		};

		let next = depth + 1;
		match desc {
			TypeDesc::Void => self.out.push_str("void"),
			TypeDesc::Typedef(name) | TypeDesc::Scalar(name) => self.out.push_str(name),
			TypeDesc::Struct(name) => {
				self.out.push_str("struct ");
				self.out.push_str(name);
			}
			TypeDesc::Pointer(pointee) => {
				self.out.push('*');
				self.write(*pointee, next);
			}
			TypeDesc::Array { elem, len } => {
				self.write(*elem, next);
				self.out.push_str(&format!("[{len}]"));
			}
			TypeDesc::Func { ret } => {
				self.write(*ret, next);
				self.out.push_str(" (*)()");
			}
			TypeDesc::Map { key, value } => match self.options.map_style {
				MapStyle::Literal => {
					self.write(*value, next);
					self.out.push('{');
					self.write(*value, next);
					self.out.push('}');
				}
				MapStyle::KeyValue => {
					self.out.push('{');
					self.write(*key, next);
					self.out.push('}');
					self.write(*value, next);
				}
			},
			TypeDesc::Truncated => self.out.push_str(TRUNCATED),
			TypeDesc::Other | TypeDesc::Unreadable => self.out.push_str(PLACEHOLDER),
		}
	}
}
