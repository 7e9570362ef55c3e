use crate::ply::render::push_bytes;
use crate::ply::{Function, RenderOptions, Symbol};

/// Render a symbol name, or the anonymous marker when it has none.
pub fn render_symbol(sym: &Symbol, options: &RenderOptions) -> String {
	render_name(sym.name.as_deref(), options)
}

/// Render a function name; nameless handles get the same marker as symbols.
pub fn render_function(func: &Function, options: &RenderOptions) -> String {
	render_name(func.name.as_deref(), options)
}

fn render_name(name: Option<&[u8]>, options: &RenderOptions) -> String {
	match name {
		Some(bytes) if !bytes.is_empty() => {
			let mut out = String::new();
			push_bytes(&mut out, bytes);
			out
		}
		_ => options.anonymous.clone(),
	}
}
