//! Reusable output buffers for expanding many messages.
//!
//! A [`BufferPool`] is created and owned by the caller.
//! There is no process wide pool.

use std::sync::{Mutex, PoisonError};

use crate::error::ExpandError;
use crate::Resolve;

/// Default number of buffers kept by a pool.
const DEFAULT_MAX_BUFFERS: usize = 16;

/// Default capacity above which a buffer is dropped instead of returned to the pool.
const DEFAULT_MAX_CAPACITY: usize = 64 * 1024;

/// Initial capacity of a freshly allocated buffer.
const INITIAL_CAPACITY: usize = 256;

/// A pool of [`String`] buffers that can be shared between threads.
///
/// Every buffer is checked out exclusively with [`acquire()`][Self::acquire]
/// and returned to the pool when the [`PooledString`] guard is dropped.
/// The lock of the pool is only held to take or return a buffer.
///
/// # Example
/// ```
/// let pool = sllm::pool::BufferPool::new();
/// let mut output = Vec::new();
/// pool.write(&mut output, "hello `name`\n", &[("name", "world")]).unwrap();
/// assert_eq!(output, b"hello `name:world`\n");
/// ```
#[derive(Debug)]
pub struct BufferPool {
	buffers: Mutex<Vec<String>>,
	max_buffers: usize,
	max_capacity: usize,
}

impl Default for BufferPool {
	fn default() -> Self {
		Self::new()
	}
}

impl BufferPool {
	/// Create a pool with the default limits.
	pub fn new() -> Self {
		Self::with_limits(DEFAULT_MAX_BUFFERS, DEFAULT_MAX_CAPACITY)
	}

	/// Create a pool that keeps at most `max_buffers` idle buffers,
	/// each with a capacity of at most `max_capacity` bytes.
	///
	/// Buffers that grew beyond `max_capacity` are freed when they are released.
	pub fn with_limits(max_buffers: usize, max_capacity: usize) -> Self {
		Self {
			buffers: Mutex::new(Vec::new()),
			max_buffers,
			max_capacity,
		}
	}

	/// Check out an empty buffer.
	///
	/// Allocates a new buffer if the pool is empty.
	pub fn acquire(&self) -> PooledString<'_> {
		let buffer = self.lock().pop().unwrap_or_else(|| String::with_capacity(INITIAL_CAPACITY));
		PooledString { pool: self, buffer }
	}

	/// Get the number of idle buffers in the pool.
	pub fn idle(&self) -> usize {
		self.lock().len()
	}

	/// Expand a template into a pooled buffer and write the complete message to `writer`.
	///
	/// Returns the number of bytes written.
	/// If some arguments could not be resolved, the message with inline error tokens is still written,
	/// and the unresolved arguments are reported afterwards.
	pub fn write<W, R>(&self, writer: &mut W, template: &str, args: &R) -> Result<usize, WriteError>
	where
		W: std::io::Write + ?Sized,
		R: Resolve + ?Sized,
	{
		let mut buffer = self.acquire();
		match crate::append(&mut buffer, template, args) {
			Ok(()) => {
				writer.write_all(buffer.as_bytes())?;
				Ok(buffer.len())
			},
			Err(ExpandError::Unresolved(e)) => {
				writer.write_all(buffer.as_bytes())?;
				Err(ExpandError::Unresolved(e).into())
			},
			Err(e) => Err(e.into()),
		}
	}

	fn release(&self, mut buffer: String) {
		if buffer.capacity() > self.max_capacity {
			return;
		}
		buffer.clear();
		let mut buffers = self.lock();
		if buffers.len() < self.max_buffers {
			buffers.push(buffer);
		}
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
		// A panic while holding the lock can not leave the list of buffers in an invalid state.
		self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// A buffer checked out from a [`BufferPool`].
///
/// Dereferences to the [`String`] it holds.
/// The buffer is cleared and returned to the pool on drop.
#[derive(Debug)]
pub struct PooledString<'a> {
	pool: &'a BufferPool,
	buffer: String,
}

impl PooledString<'_> {
	/// Take the buffer out of the pool for good.
	pub fn into_inner(mut self) -> String {
		std::mem::take(&mut self.buffer)
	}
}

impl std::ops::Deref for PooledString<'_> {
	type Target = String;

	fn deref(&self) -> &String {
		&self.buffer
	}
}

impl std::ops::DerefMut for PooledString<'_> {
	fn deref_mut(&mut self) -> &mut String {
		&mut self.buffer
	}
}

impl Drop for PooledString<'_> {
	fn drop(&mut self) {
		let buffer = std::mem::take(&mut self.buffer);
		// Buffers taken with `into_inner()` leave an unallocated string behind.
		if buffer.capacity() > 0 {
			self.pool.release(buffer);
		}
	}
}

/// An error that can occur while writing a message with [`BufferPool::write()`].
#[derive(Debug)]
pub enum WriteError {
	/// The template could not be expanded completely.
	///
	/// For unresolved arguments the message was still written.
	Expand(ExpandError),

	/// Writing the message failed.
	Io(std::io::Error),
}

impl From<ExpandError> for WriteError {
	fn from(other: ExpandError) -> Self {
		Self::Expand(other)
	}
}

impl From<std::io::Error> for WriteError {
	fn from(other: std::io::Error) -> Self {
		Self::Io(other)
	}
}

impl std::error::Error for WriteError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Expand(e) => Some(e),
			Self::Io(e) => Some(e),
		}
	}
}

impl std::fmt::Display for WriteError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Expand(e) => e.fmt(f),
			Self::Io(e) => write!(f, "failed to write message: {}", e),
		}
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use crate::{positional, NoArguments};
	use assert2::{assert, check, let_assert};

	#[test]
	fn test_buffers_are_reused() {
		let pool = BufferPool::new();
		check!(pool.idle() == 0);

		let mut buffer = pool.acquire();
		buffer.push_str("some text");
		let address = buffer.as_ptr();
		drop(buffer);
		check!(pool.idle() == 1);

		let buffer = pool.acquire();
		check!(pool.idle() == 0);
		check!(buffer.is_empty());
		check!(buffer.as_ptr() == address);
	}

	#[test]
	fn test_buffers_are_exclusive() {
		let pool = BufferPool::new();
		let mut first = pool.acquire();
		let mut second = pool.acquire();
		first.push_str("one");
		second.push_str("two");
		check!(*first == "one");
		check!(*second == "two");
		drop(first);
		drop(second);
		check!(pool.idle() == 2);
	}

	#[test]
	fn test_limits() {
		let pool = BufferPool::with_limits(1, 512);
		let mut large = pool.acquire();
		large.reserve(4096);
		drop(large);
		check!(pool.idle() == 0);

		let first = pool.acquire();
		let second = pool.acquire();
		drop(first);
		drop(second);
		check!(pool.idle() == 1);
	}

	#[test]
	fn test_into_inner() {
		let pool = BufferPool::new();
		let mut buffer = pool.acquire();
		buffer.push_str("kept");
		assert!(buffer.into_inner() == "kept");
		check!(pool.idle() == 0);
	}

	#[test]
	fn test_write() {
		let pool = BufferPool::new();
		let mut output = Vec::new();
		let_assert!(Ok(written) = pool.write(&mut output, "`a` and `b`\n", &positional(&[1, 2])));
		check!(written == 16);
		check!(output == b"`a:1` and `b:2`\n");
		check!(pool.idle() == 1);
	}

	#[test]
	fn test_write_unresolved_still_writes() {
		let pool = BufferPool::new();
		let mut output = Vec::new();
		let_assert!(Err(WriteError::Expand(ExpandError::Unresolved(_))) = pool.write(&mut output, "`a`", &NoArguments));
		check!(output == b"`a!(missing argument 0 'a')`");
	}

	#[test]
	fn test_write_syntax_error_writes_nothing() {
		let pool = BufferPool::new();
		let mut output = Vec::new();
		let_assert!(Err(WriteError::Expand(ExpandError::Syntax(_))) = pool.write(&mut output, "ok `a", &NoArguments));
		check!(output.is_empty());
	}

	#[test]
	fn test_write_io_error() {
		struct Broken;
		impl std::io::Write for Broken {
			fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
				Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
			}
			fn flush(&mut self) -> std::io::Result<()> {
				Ok(())
			}
		}

		let pool = BufferPool::new();
		let_assert!(Err(e @ WriteError::Io(_)) = pool.write(&mut Broken, "`a`", &[("a", 1)]));
		check!(e.to_string() == "failed to write message: pipe closed");
		check!(pool.idle() == 1);
	}

	#[test]
	fn test_shared_between_threads() {
		let pool = BufferPool::new();
		std::thread::scope(|scope| {
			for i in 0..4 {
				let pool = &pool;
				scope.spawn(move || {
					let mut output = Vec::new();
					let_assert!(Ok(_) = pool.write(&mut output, "`i`", &positional(&[i])));
					assert!(output == format!("`i:{i}`").into_bytes());
				});
			}
		});
		check!(pool.idle() >= 1);
	}
}
