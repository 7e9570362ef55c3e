/// Built-in struct layout listing.
pub mod layout;
/// Render values from a memory image.
pub mod render;
/// Memory image root listing.
pub mod roots;
/// Shared CLI helpers.
pub(crate) mod util;
