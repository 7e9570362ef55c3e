use crate::ply::{FieldPath, Result};

/// Field-level read access into inspected process memory.
///
/// A host (debugger, core-dump reader, or [`crate::ply::MemoryImage`]) implements this so the
/// readers in this crate never touch raw memory themselves. Every accessor may fail when the
/// underlying memory is unreadable; callers decide whether a failure declines the whole render
/// or degrades one sub-value to a placeholder.
pub trait ValueAccess {
	/// Host handle for one inspected value.
	type Value: Clone;

	/// Whether `value` is a pointer that must be dereferenced before inspection.
	fn is_pointer(&self, value: &Self::Value) -> bool;

	/// Dereference a pointer value.
	fn dereference(&self, value: &Self::Value) -> Result<Self::Value>;

	/// Struct tag of `value` (`node`, `type`, ...), or `None` when it is not a struct.
	fn struct_tag(&self, value: &Self::Value) -> Option<String>;

	/// Name of the enum variant stored at `path`, e.g. `N_EXPR`.
	///
	/// Discriminants without a known name are reported as their decimal value.
	fn field_tag(&self, value: &Self::Value, path: &FieldPath) -> Result<String>;

	/// Bytes of the C string referenced at `path`; `None` for a null pointer.
	fn field_string(&self, value: &Self::Value, path: &FieldPath) -> Result<Option<Vec<u8>>>;

	/// Signed integer stored at `path`.
	fn field_int(&self, value: &Self::Value, path: &FieldPath) -> Result<i64>;

	/// Unsigned integer stored at `path`.
	fn field_uint(&self, value: &Self::Value, path: &FieldPath) -> Result<u64>;

	/// Boolean flag stored at `path`.
	fn field_bool(&self, value: &Self::Value, path: &FieldPath) -> Result<bool>;

	/// Follow the reference stored at `path`; `None` for a null reference.
	fn follow(&self, value: &Self::Value, path: &FieldPath) -> Result<Option<Self::Value>>;

	/// Stable identity (usually the address) of `value`, used to detect shared and cyclic references.
	fn identity(&self, value: &Self::Value) -> Option<u64>;
}
