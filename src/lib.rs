//! Debugger-side pretty printers for the ply compiler's AST nodes, type descriptors,
//! symbols and function handles.

/// Memory access, snapshot reading, rendering, and printer dispatch.
pub mod ply;
