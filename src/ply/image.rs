use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ply::bytes::Cursor;
use crate::ply::{FieldKind, FieldLayout, FieldPath, Layout, PlyError, Result, ValueAccess};

/// Default cap on C string reads.
pub const DEFAULT_MAX_STRING_LEN: usize = 4096;

/// One contiguous range of captured memory.
#[derive(Debug, Clone)]
pub struct Region {
	/// Address of the first byte.
	pub base: u64,
	/// Captured bytes.
	pub bytes: Vec<u8>,
}

impl Region {
	/// Exclusive end address.
	pub fn end(&self) -> u64 {
		self.base.saturating_add(self.bytes.len() as u64)
	}
}

/// Named entry point into an image, like a variable the developer asks to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
	/// Display name.
	pub name: String,
	/// Address of the struct (the pointer value when `pointer` is set).
	#[serde(with = "addr_serde")]
	pub addr: u64,
	/// Struct tag; `None` for a value the printers do not know about.
	#[serde(default)]
	pub tag: Option<String>,
	/// Whether the root is reached through a pointer.
	#[serde(default)]
	pub pointer: bool,
}

/// Value handle handed out by [`MemoryImage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageValue {
	/// Struct with `tag` stored at `addr`.
	Struct {
		/// Struct address.
		addr: u64,
		/// Struct tag.
		tag: Arc<str>,
	},
	/// Pointer to a struct with `tag`.
	Pointer {
		/// Pointer value.
		target: u64,
		/// Pointee struct tag.
		tag: Arc<str>,
	},
	/// Anything that is not a struct (scalars, foreign data).
	Opaque {
		/// Value address.
		addr: u64,
	},
}

impl Root {
	/// Value handle for this root.
	pub fn value(&self) -> ImageValue {
		match (&self.tag, self.pointer) {
			(None, _) => ImageValue::Opaque { addr: self.addr },
			(Some(tag), true) => ImageValue::Pointer {
				target: self.addr,
				tag: Arc::from(tag.as_str()),
			},
			(Some(tag), false) => ImageValue::Struct {
				addr: self.addr,
				tag: Arc::from(tag.as_str()),
			},
		}
	}
}

/// Serialized form of a memory image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
	/// Struct layouts; defaults to [`Layout::lp64`].
	#[serde(default)]
	pub layout: Layout,
	/// Captured memory ranges.
	#[serde(default)]
	pub regions: Vec<RegionFile>,
	/// Named roots.
	#[serde(default)]
	pub roots: Vec<Root>,
}

/// Serialized memory range with hex-encoded bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionFile {
	/// Address of the first byte.
	#[serde(with = "addr_serde")]
	pub base: u64,
	/// Hex bytes; ASCII whitespace is ignored.
	pub bytes: String,
}

/// Captured process memory plus the layout needed to interpret it.
#[derive(Debug, Clone)]
pub struct MemoryImage {
	starts: Vec<u64>,
	regions: Vec<Region>,
	layout: Layout,
	roots: Vec<Root>,
	max_string_len: usize,
}

impl MemoryImage {
	/// Build an image from regions; regions must not overlap.
	pub fn new(regions: Vec<Region>, layout: Layout, roots: Vec<Root>) -> Result<Self> {
		let mut regions: Vec<Region> = regions.into_iter().filter(|region| !region.bytes.is_empty()).collect();
		regions.sort_by_key(|region| region.base);

		for pair in regions.windows(2) {
			if pair[1].base < pair[0].end() {
				return Err(PlyError::OverlappingRegions {
					first: pair[0].base,
					second: pair[1].base,
				});
			}
		}

		let starts = regions.iter().map(|region| region.base).collect();
		Ok(Self {
			starts,
			regions,
			layout,
			roots,
			max_string_len: DEFAULT_MAX_STRING_LEN,
		})
	}

	/// Decode an image from its serialized form.
	pub fn from_file(file: ImageFile) -> Result<Self> {
		let regions = file
			.regions
			.into_iter()
			.map(|region| {
				Ok(Region {
					base: region.base,
					bytes: decode_hex(region.base, &region.bytes)?,
				})
			})
			.collect::<Result<Vec<_>>>()?;
		Self::new(regions, file.layout, file.roots)
	}

	/// Parse an image from JSON text.
	pub fn from_json_str(text: &str) -> Result<Self> {
		Self::from_file(serde_json::from_str(text)?)
	}

	/// Read and parse a JSON image file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let text = std::fs::read_to_string(path)?;
		Self::from_json_str(&text)
	}

	/// Override the C string read cap.
	pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
		self.max_string_len = max_string_len;
		self
	}

	/// Struct layouts used to interpret memory.
	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	/// Captured regions sorted by base address.
	pub fn regions(&self) -> &[Region] {
		&self.regions
	}

	/// Named roots in file order.
	pub fn roots(&self) -> &[Root] {
		&self.roots
	}

	/// Look up a root by name.
	pub fn root(&self, name: &str) -> Result<&Root> {
		self.roots
			.iter()
			.find(|root| root.name == name)
			.ok_or_else(|| PlyError::RootNotFound { name: name.to_owned() })
	}

	/// Whether `addr` falls inside a captured region.
	pub fn is_mapped(&self, addr: u64) -> bool {
		self.region_for(addr).is_some()
	}

	fn region_for(&self, addr: u64) -> Option<&Region> {
		let idx = self.starts.partition_point(|start| *start <= addr);
		if idx == 0 {
			return None;
		}

		let region = &self.regions[idx - 1];
		(addr < region.end()).then_some(region)
	}

	fn cursor_at(&self, addr: u64) -> Result<Cursor<'_>> {
		let region = self.region_for(addr).ok_or(PlyError::UnmappedAddress { addr })?;
		let offset = (addr - region.base) as usize;
		Ok(Cursor::new(&region.bytes[offset..], addr))
	}

	fn field_cursor(&self, value: &ImageValue, path: &FieldPath) -> Result<(Cursor<'_>, &FieldLayout)> {
		let ImageValue::Struct { addr, tag } = value else {
			return Err(PlyError::NotAStruct);
		};

		let field = self.layout.field(tag, path)?;
		let field_addr = addr.checked_add(field.offset as u64).ok_or(PlyError::UnmappedAddress { addr: *addr })?;
		Ok((self.cursor_at(field_addr)?, field))
	}
}

fn kind_mismatch(path: &FieldPath, expected: &'static str, got: &FieldKind) -> PlyError {
	PlyError::FieldKindMismatch {
		field: path.to_string(),
		expected,
		got: got.label(),
	}
}

impl ValueAccess for MemoryImage {
	type Value = ImageValue;

	fn is_pointer(&self, value: &ImageValue) -> bool {
		matches!(value, ImageValue::Pointer { .. })
	}

	fn dereference(&self, value: &ImageValue) -> Result<ImageValue> {
		let ImageValue::Pointer { target, tag } = value else {
			return Err(PlyError::NotAPointer);
		};
		if *target == 0 {
			return Err(PlyError::NullPointer);
		}
		if !self.is_mapped(*target) {
			return Err(PlyError::UnmappedAddress { addr: *target });
		}

		Ok(ImageValue::Struct {
			addr: *target,
			tag: tag.clone(),
		})
	}

	fn struct_tag(&self, value: &ImageValue) -> Option<String> {
		match value {
			ImageValue::Struct { tag, .. } => Some(tag.to_string()),
			_ => None,
		}
	}

	fn field_tag(&self, value: &ImageValue, path: &FieldPath) -> Result<String> {
		let (mut cursor, field) = self.field_cursor(value, path)?;
		let FieldKind::Enum { variants } = &field.kind else {
			return Err(kind_mismatch(path, "enum", &field.kind));
		};

		let raw = cursor.read_u32_le()?;
		Ok(variants.get(raw as usize).cloned().unwrap_or_else(|| raw.to_string()))
	}

	fn field_string(&self, value: &ImageValue, path: &FieldPath) -> Result<Option<Vec<u8>>> {
		let (mut cursor, field) = self.field_cursor(value, path)?;
		if field.kind != FieldKind::CStr {
			return Err(kind_mismatch(path, "cstr", &field.kind));
		}

		let ptr = cursor.read_u64_le()?;
		if ptr == 0 {
			return Ok(None);
		}

		let mut data = self.cursor_at(ptr)?;
		Ok(Some(data.read_cstring_bytes(self.max_string_len)?.to_vec()))
	}

	fn field_int(&self, value: &ImageValue, path: &FieldPath) -> Result<i64> {
		let (mut cursor, field) = self.field_cursor(value, path)?;
		if field.kind != FieldKind::I64 {
			return Err(kind_mismatch(path, "i64", &field.kind));
		}
		cursor.read_i64_le()
	}

	fn field_uint(&self, value: &ImageValue, path: &FieldPath) -> Result<u64> {
		let (mut cursor, field) = self.field_cursor(value, path)?;
		if field.kind != FieldKind::U64 {
			return Err(kind_mismatch(path, "u64", &field.kind));
		}
		cursor.read_u64_le()
	}

	fn field_bool(&self, value: &ImageValue, path: &FieldPath) -> Result<bool> {
		let (mut cursor, field) = self.field_cursor(value, path)?;
		if field.kind != FieldKind::Bool {
			return Err(kind_mismatch(path, "bool", &field.kind));
		}
		Ok(cursor.read_u8()? != 0)
	}

	fn follow(&self, value: &ImageValue, path: &FieldPath) -> Result<Option<ImageValue>> {
		let (mut cursor, field) = self.field_cursor(value, path)?;
		let FieldKind::Ptr { tag } = &field.kind else {
			return Err(kind_mismatch(path, "ptr", &field.kind));
		};

		let target = cursor.read_u64_le()?;
		if target == 0 {
			return Ok(None);
		}

		Ok(Some(ImageValue::Struct {
			addr: target,
			tag: Arc::from(tag.as_str()),
		}))
	}

	fn identity(&self, value: &ImageValue) -> Option<u64> {
		match value {
			ImageValue::Struct { addr, .. } | ImageValue::Opaque { addr } => Some(*addr),
			ImageValue::Pointer { target, .. } => Some(*target),
		}
	}
}

/// Parse decimal or `0x`-prefixed hex address literal.
pub fn parse_addr(value: &str) -> Result<u64> {
	let parsed = if let Some(stripped) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
		u64::from_str_radix(stripped, 16)
	} else {
		value.parse::<u64>()
	};

	parsed.map_err(|_| PlyError::InvalidAddressLiteral { value: value.to_owned() })
}

fn decode_hex(base: u64, text: &str) -> Result<Vec<u8>> {
	let digits: Vec<u8> = text.bytes().filter(|byte| !byte.is_ascii_whitespace()).collect();
	if digits.len() % 2 != 0 {
		return Err(PlyError::InvalidHex {
			base,
			reason: "odd number of digits",
		});
	}

	digits
		.chunks_exact(2)
		.map(|pair| {
			let hi = hex_digit(pair[0]);
			let lo = hex_digit(pair[1]);
			match (hi, lo) {
				(Some(hi), Some(lo)) => Ok((hi << 4) | lo),
				_ => Err(PlyError::InvalidHex {
					base,
					reason: "non-hex digit",
				}),
			}
		})
		.collect()
}

fn hex_digit(byte: u8) -> Option<u8> {
	char::from(byte).to_digit(16).map(|digit| digit as u8)
}

mod addr_serde {
	use super::*;

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum AddrRepr {
		Num(u64),
		Text(String),
	}

	pub(super) fn serialize<S: Serializer>(addr: &u64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(&format!("0x{addr:x}"))
	}

	pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
		match AddrRepr::deserialize(deserializer)? {
			AddrRepr::Num(value) => Ok(value),
			AddrRepr::Text(text) => parse_addr(&text).map_err(serde::de::Error::custom),
		}
	}
}
