mod access;
mod bytes;
mod dispatch;
mod error;
mod image;
mod layout;
mod node;
mod path;
mod read;
mod render;
mod symbol;
mod types;
mod value;

/// Host memory access interface.
pub use access::ValueAccess;
/// Printer lookup and framing.
pub use dispatch::{DisplayHint, Printer, PrinterKind, PrinterRegistry};
/// Error and result aliases.
pub use error::{PlyError, Result};
/// Memory image accessor and its serialized form.
pub use image::{DEFAULT_MAX_STRING_LEN, ImageFile, ImageValue, MemoryImage, Region, RegionFile, Root, parse_addr};
/// Struct layout description.
pub use layout::{FieldKind, FieldLayout, Layout, StructLayout};
/// Node renderer.
pub use node::render_node;
/// Field path parser.
pub use path::FieldPath;
/// Snapshot readers and their budgets.
pub use read::{ReadOptions, read_function, read_node, read_symbol, read_type};
/// Shared formatting options and markers.
pub use render::{ANONYMOUS, MAX_TYPE_DEPTH, MapStyle, PLACEHOLDER, RenderOptions, TRUNCATED};
/// Symbol and function renderers.
pub use symbol::{render_function, render_symbol};
/// Type renderer.
pub use types::render_type;
/// Owned snapshot types.
pub use value::{Function, Node, NumValue, Symbol, TypeArena, TypeDesc, TypeId};
