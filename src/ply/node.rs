use crate::ply::render::{PLACEHOLDER, TRUNCATED, push_bytes};
use crate::ply::{Node, NumValue};

/// Render a node as `func arg...`, showing one level of arguments.
pub fn render_node(node: &Node) -> String {
	let mut out = String::new();
	write_node(&mut out, node, false);
	out
}

// Arguments are written in stop mode: their own arguments stay hidden.
fn write_node(out: &mut String, node: &Node, stop: bool) {
	match node {
		Node::Expr { func, args, truncated } => {
			out.push_str(func);
			if stop {
				return;
			}

			for arg in args {
				out.push(' ');
				write_node(out, arg, true);
			}
			if *truncated {
				out.push(' ');
				out.push_str(TRUNCATED);
			}
		}
		Node::Str(data) => {
			out.push('"');
			push_bytes(out, data);
			out.push('"');
		}
		Node::Num(NumValue::Unsigned(value)) => out.push_str(&format!("<{value}>")),
		Node::Num(NumValue::Signed(value)) => out.push_str(&format!("<{value}>")),
		Node::Other | Node::Unreadable => out.push_str(PLACEHOLDER),
	}
}
