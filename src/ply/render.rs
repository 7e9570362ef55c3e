use serde::{Deserialize, Serialize};

/// Text emitted for unknown tags and unreadable sub-values.
pub const PLACEHOLDER: &str = "???";

/// Text emitted where output was cut by a depth or length limit.
pub const TRUNCATED: &str = "...";

/// Hard limit on type nesting, whatever the configured depth.
pub const MAX_TYPE_DEPTH: u32 = 256;

/// Default marker for nameless symbols and functions.
pub const ANONYMOUS: &str = "<anonymous>";

/// How `T_MAP` descriptors are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapStyle {
	/// `value{value}`: the value type in both positions, matching existing debugger output.
	#[default]
	Literal,
	/// `{key}value`.
	KeyValue,
}

/// Formatting switches shared by all renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
	/// Maximum nesting of type descriptors before [`TRUNCATED`] is written; clamped to
	/// [`MAX_TYPE_DEPTH`].
	pub max_type_depth: u32,
	/// Maximum number of descriptors written for one type; shared subtrees count every time
	/// they are written.
	pub max_type_visits: usize,
	/// Map descriptor style.
	pub map_style: MapStyle,
	/// Marker for absent or empty names.
	pub anonymous: String,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			max_type_depth: 64,
			max_type_visits: 4096,
			map_style: MapStyle::Literal,
			anonymous: ANONYMOUS.to_owned(),
		}
	}
}

pub(crate) fn push_bytes(out: &mut String, bytes: &[u8]) {
	out.push_str(&String::from_utf8_lossy(bytes));
}
