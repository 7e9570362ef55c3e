use crate::ply::{PlyError, Result};

/// Bounded little-endian cursor over a slice of inspected memory.
///
/// `base` is the address of the first byte so errors can report absolute addresses.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	base: u64,
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0 of memory starting at `base`.
	pub fn new(bytes: &'a [u8], base: u64) -> Self {
		Self { bytes, base, pos: 0 }
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	fn addr(&self) -> u64 {
		self.base.wrapping_add(self.pos as u64)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(PlyError::ReadOutOfBounds {
				addr: self.addr(),
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(u32::from_le_bytes(buf))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64_le(&mut self) -> Result<u64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(u64::from_le_bytes(buf))
	}

	/// Read a little-endian `i64`.
	pub fn read_i64_le(&mut self) -> Result<i64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(i64::from_le_bytes(buf))
	}

	/// Read a zero-terminated byte string without the terminator.
	///
	/// At most `max_len` bytes are returned; a longer string is cut short rather than rejected.
	pub fn read_cstring_bytes(&mut self, max_len: usize) -> Result<&'a [u8]> {
		let start = self.pos;
		let rem = &self.bytes[self.pos..];
		let window = &rem[..rem.len().min(max_len)];

		if let Some(rel_end) = window.iter().position(|byte| *byte == 0) {
			self.pos = start + rel_end + 1;
			return Ok(&self.bytes[start..start + rel_end]);
		}
		if window.len() == max_len {
			self.pos = start + max_len;
			return Ok(window);
		}

		Err(PlyError::UnterminatedString { addr: self.addr() })
	}
}
