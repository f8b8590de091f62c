use std::io::{self, Read, Write};

use crate::codec::tag::{LengthField, Tag};
use crate::codec::{MsgpError, Result};

/// Upper bound on bytes reserved before a length-prefixed payload is actually read.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// Read the leading tag of the next value.
///
/// An empty source here is a clean [`MsgpError::EndOfInput`]; every later
/// short read inside the value is [`MsgpError::Truncated`].
pub fn read_tag<R: Read + ?Sized>(source: &mut R) -> Result<Tag> {
	let mut head = [0_u8; 1];
	if fill(source, &mut head)? == 0 {
		return Err(MsgpError::EndOfInput);
	}
	Tag::from_byte(head[0])
}

/// Read exactly `N` bytes.
pub fn read_array<const N: usize, R: Read + ?Sized>(source: &mut R) -> Result<[u8; N]> {
	let mut buf = [0_u8; N];
	let have = fill(source, &mut buf)?;
	if have < N {
		return Err(MsgpError::Truncated { need: N, have });
	}
	Ok(buf)
}

/// Read a `u8`.
pub fn read_u8<R: Read + ?Sized>(source: &mut R) -> Result<u8> {
	Ok(read_array::<1, R>(source)?[0])
}

/// Read a big-endian `u16`.
pub fn read_u16<R: Read + ?Sized>(source: &mut R) -> Result<u16> {
	Ok(u16::from_be_bytes(read_array(source)?))
}

/// Read a big-endian `u32`.
pub fn read_u32<R: Read + ?Sized>(source: &mut R) -> Result<u32> {
	Ok(u32::from_be_bytes(read_array(source)?))
}

/// Read a big-endian `u64`.
pub fn read_u64<R: Read + ?Sized>(source: &mut R) -> Result<u64> {
	Ok(u64::from_be_bytes(read_array(source)?))
}

/// Read an `i8`.
pub fn read_i8<R: Read + ?Sized>(source: &mut R) -> Result<i8> {
	Ok(i8::from_be_bytes(read_array(source)?))
}

/// Read a big-endian `i16`.
pub fn read_i16<R: Read + ?Sized>(source: &mut R) -> Result<i16> {
	Ok(i16::from_be_bytes(read_array(source)?))
}

/// Read a big-endian `i32`.
pub fn read_i32<R: Read + ?Sized>(source: &mut R) -> Result<i32> {
	Ok(i32::from_be_bytes(read_array(source)?))
}

/// Read a big-endian `i64`.
pub fn read_i64<R: Read + ?Sized>(source: &mut R) -> Result<i64> {
	Ok(i64::from_be_bytes(read_array(source)?))
}

/// Read a big-endian IEEE 754 `f32`.
pub fn read_f32<R: Read + ?Sized>(source: &mut R) -> Result<f32> {
	Ok(f32::from_bits(read_u32(source)?))
}

/// Read a big-endian IEEE 754 `f64`.
pub fn read_f64<R: Read + ?Sized>(source: &mut R) -> Result<f64> {
	Ok(f64::from_bits(read_u64(source)?))
}

/// Read the length of a string, binary, array or map form.
pub fn read_len<R: Read + ?Sized>(source: &mut R, field: LengthField) -> Result<usize> {
	match field {
		LengthField::Inline(len) => Ok(len),
		LengthField::Prefix(1) => Ok(usize::from(read_u8(source)?)),
		LengthField::Prefix(2) => Ok(usize::from(read_u16(source)?)),
		LengthField::Prefix(_) => Ok(read_u32(source)? as usize),
	}
}

/// Read a `len`-byte payload.
///
/// Storage grows with the bytes actually delivered, so a lying length prefix
/// fails as [`MsgpError::Truncated`] instead of reserving `len` bytes upfront.
pub fn read_payload<R: Read + ?Sized>(source: &mut R, len: usize) -> Result<Vec<u8>> {
	let mut out = Vec::with_capacity(len.min(PREALLOC_LIMIT));
	let have = (&mut *source).take(len as u64).read_to_end(&mut out)?;
	if have < len {
		return Err(MsgpError::Truncated { need: len, have });
	}
	Ok(out)
}

/// Write one tag byte.
pub fn write_tag<W: Write + ?Sized>(sink: &mut W, tag: Tag) -> Result<()> {
	write_u8(sink, tag.to_byte())
}

/// Write a `u8`.
pub fn write_u8<W: Write + ?Sized>(sink: &mut W, value: u8) -> Result<()> {
	sink.write_all(&[value])?;
	Ok(())
}

/// Write a big-endian `u16`.
pub fn write_u16<W: Write + ?Sized>(sink: &mut W, value: u16) -> Result<()> {
	sink.write_all(&value.to_be_bytes())?;
	Ok(())
}

/// Write a big-endian `u32`.
pub fn write_u32<W: Write + ?Sized>(sink: &mut W, value: u32) -> Result<()> {
	sink.write_all(&value.to_be_bytes())?;
	Ok(())
}

/// Write a big-endian `u64`.
pub fn write_u64<W: Write + ?Sized>(sink: &mut W, value: u64) -> Result<()> {
	sink.write_all(&value.to_be_bytes())?;
	Ok(())
}

/// Write an `i8`.
pub fn write_i8<W: Write + ?Sized>(sink: &mut W, value: i8) -> Result<()> {
	sink.write_all(&value.to_be_bytes())?;
	Ok(())
}

/// Write a big-endian `i16`.
pub fn write_i16<W: Write + ?Sized>(sink: &mut W, value: i16) -> Result<()> {
	sink.write_all(&value.to_be_bytes())?;
	Ok(())
}

/// Write a big-endian `i32`.
pub fn write_i32<W: Write + ?Sized>(sink: &mut W, value: i32) -> Result<()> {
	sink.write_all(&value.to_be_bytes())?;
	Ok(())
}

/// Write a big-endian `i64`.
pub fn write_i64<W: Write + ?Sized>(sink: &mut W, value: i64) -> Result<()> {
	sink.write_all(&value.to_be_bytes())?;
	Ok(())
}

/// Write a big-endian IEEE 754 `f32`.
pub fn write_f32<W: Write + ?Sized>(sink: &mut W, value: f32) -> Result<()> {
	write_u32(sink, value.to_bits())
}

/// Write a big-endian IEEE 754 `f64`.
pub fn write_f64<W: Write + ?Sized>(sink: &mut W, value: f64) -> Result<()> {
	write_u64(sink, value.to_bits())
}

/// Write raw payload bytes.
pub fn write_payload<W: Write + ?Sized>(sink: &mut W, bytes: &[u8]) -> Result<()> {
	sink.write_all(bytes)?;
	Ok(())
}

/// Read into `buf` until it is full or the source is exhausted.
fn fill<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
	let mut filled = 0;
	while filled < buf.len() {
		match source.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
			Err(err) => return Err(err),
		}
	}
	Ok(filled)
}
