use std::io::{self, Read};

/// Byte source with a one-byte lookahead buffer.
///
/// Optional targets peek the next tag to decide between "leave absent" and
/// "allocate and decode" without consuming the tag. Not meant to be shared
/// between independent decode call chains.
#[derive(Debug)]
pub struct PeekReader<R> {
	inner: R,
	peeked: Option<u8>,
}

impl<R: Read> PeekReader<R> {
	/// Wrap a byte source with an empty lookahead buffer.
	pub fn new(inner: R) -> Self {
		Self { inner, peeked: None }
	}

	/// Return the next byte without consuming it, or `None` at end of input.
	pub fn peek(&mut self) -> io::Result<Option<u8>> {
		if let Some(byte) = self.peeked {
			return Ok(Some(byte));
		}

		let mut buf = [0_u8; 1];
		loop {
			match self.inner.read(&mut buf) {
				Ok(0) => return Ok(None),
				Ok(_) => {
					self.peeked = Some(buf[0]);
					return Ok(Some(buf[0]));
				}
				Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
				Err(err) => return Err(err),
			}
		}
	}

	/// Return `true` when a peeked byte is waiting to be consumed.
	pub fn has_peeked(&self) -> bool {
		self.peeked.is_some()
	}

	/// Borrow the wrapped source.
	pub fn get_ref(&self) -> &R {
		&self.inner
	}

	/// Unwrap into the source and any byte still held in the lookahead buffer.
	pub fn into_parts(self) -> (R, Option<u8>) {
		(self.inner, self.peeked)
	}
}

impl<R: Read> Read for PeekReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}
		if let Some(byte) = self.peeked.take() {
			buf[0] = byte;
			return Ok(1);
		}
		self.inner.read(buf)
	}
}
