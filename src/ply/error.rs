use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PlyError>;

/// Errors produced while reading inspected memory or loading memory images.
#[derive(Debug, Error)]
pub enum PlyError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Memory image JSON was malformed.
	#[error("image json: {0}")]
	ImageJson(#[from] serde_json::Error),
	/// Hex byte string in an image region could not be decoded.
	#[error("invalid hex bytes in region at 0x{base:016x}: {reason}")]
	InvalidHex {
		/// Region base address.
		base: u64,
		/// Short description of the defect.
		reason: &'static str,
	},
	/// Two image regions cover the same address.
	#[error("overlapping regions at 0x{first:016x} and 0x{second:016x}")]
	OverlappingRegions {
		/// Base of the earlier region.
		first: u64,
		/// Base of the overlapping region.
		second: u64,
	},
	/// Address or pointer literal could not be parsed.
	#[error("invalid address literal: {value}")]
	InvalidAddressLiteral {
		/// User-provided literal.
		value: String,
	},
	/// Address is not covered by any readable region.
	#[error("unmapped address 0x{addr:016x}")]
	UnmappedAddress {
		/// Requested address.
		addr: u64,
	},
	/// Read started inside a region but ran past its end.
	#[error("read of {need} bytes at 0x{addr:016x} exceeds region (remaining {rem})")]
	ReadOutOfBounds {
		/// Start address of the read.
		addr: u64,
		/// Requested byte count.
		need: usize,
		/// Bytes left in the region.
		rem: usize,
	},
	/// Dereference of a null pointer.
	#[error("null pointer dereference")]
	NullPointer,
	/// Dereference requested on a value that is not a pointer.
	#[error("value is not a pointer")]
	NotAPointer,
	/// Field access on a value that is not a struct.
	#[error("value is not a struct")]
	NotAStruct,
	/// Struct tag has no layout.
	#[error("no layout for struct tag {tag}")]
	UnknownStructTag {
		/// Struct tag name.
		tag: String,
	},
	/// Field path does not exist on the struct layout.
	#[error("struct {tag} has no field {field}")]
	UnknownField {
		/// Struct tag name.
		tag: String,
		/// Dotted field path.
		field: String,
	},
	/// Field exists but has a different storage kind.
	#[error("field {field} is {got}, expected {expected}")]
	FieldKindMismatch {
		/// Dotted field path.
		field: String,
		/// Expected storage kind.
		expected: &'static str,
		/// Actual storage kind.
		got: &'static str,
	},
	/// C string ran to the end of its region without a terminator.
	#[error("unterminated string at 0x{addr:016x}")]
	UnterminatedString {
		/// Start address of the string.
		addr: u64,
	},
	/// Field path expression syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Original path string.
		path: String,
	},
	/// Named root is not present in the image.
	#[error("root not found: {name}")]
	RootNotFound {
		/// Requested root name.
		name: String,
	},
	/// Root selection flags were missing or contradictory.
	#[error("invalid root selector: {reason}")]
	InvalidRootSelector {
		/// What was wrong with the selection.
		reason: &'static str,
	},
}
