//! Delimiters and escaping shared by the expander and the parser.

use std::borrow::Cow;

/// The character that opens and closes an argument.
///
/// Inside values and literal text it is escaped by doubling it.
pub const DELIMITER: char = '`';

/// Separates the argument name from its value (or from the explicit index in a template).
pub const NAME_SEPARATOR: char = ':';

/// Separates the argument name from an inline error value.
pub const ERROR_MARKER: char = '!';

pub(crate) const DELIM: u8 = DELIMITER as u8;
pub(crate) const NAME_SEP: u8 = NAME_SEPARATOR as u8;
pub(crate) const ERR_MARK: u8 = ERROR_MARKER as u8;

/// Append `value` to `out`, doubling every delimiter.
///
/// All other characters, including newlines, NUL and non-ASCII text, are copied unchanged.
pub fn escape_into(out: &mut String, mut value: &str) {
	while let Some(idx) = memchr::memchr(DELIM, value.as_bytes()) {
		// Copy up to and including the delimiter, then add the extra one.
		let (head, tail) = value.split_at(idx + 1);
		out.push_str(head);
		out.push(DELIMITER);
		value = tail;
	}
	out.push_str(value);
}

/// Escape a value so it can be embedded in a message.
///
/// Returns a borrowed string if the value contains no delimiter.
pub fn escape(value: &str) -> Cow<'_, str> {
	if memchr::memchr(DELIM, value.as_bytes()).is_none() {
		return Cow::Borrowed(value);
	}
	let mut out = String::with_capacity(value.len() + 2);
	escape_into(&mut out, value);
	Cow::Owned(out)
}

/// Undo [`escape()`]: collapse every doubled delimiter into a single one.
///
/// A lone delimiter is copied as-is.
pub fn unescape(value: &str) -> Cow<'_, str> {
	let bytes = value.as_bytes();
	let Some(first) = find_doubled(bytes, 0) else {
		return Cow::Borrowed(value);
	};

	let mut out = String::with_capacity(value.len());
	let mut finger = 0;
	let mut next = Some(first);
	while let Some(idx) = next {
		// Keep the first delimiter of the pair, skip the second.
		out.push_str(&value[finger..idx + 1]);
		finger = idx + 2;
		next = find_doubled(bytes, finger);
	}
	out.push_str(&value[finger..]);
	Cow::Owned(out)
}

/// Find the start of the next doubled delimiter at or after `start`.
fn find_doubled(haystack: &[u8], start: usize) -> Option<usize> {
	let mut finger = start;
	while finger < haystack.len() {
		let idx = finger + memchr::memchr(DELIM, &haystack[finger..])?;
		if haystack.get(idx + 1) == Some(&DELIM) {
			return Some(idx);
		}
		finger = idx + 1;
	}
	None
}

/// Find the first delimiter at or after `start` that is not part of a doubled pair.
///
/// Doubled delimiters are skipped as a whole.
pub(crate) fn find_single_delimiter(haystack: &[u8], start: usize) -> Option<usize> {
	let mut finger = start;
	while finger < haystack.len() {
		let idx = finger + memchr::memchr(DELIM, &haystack[finger..])?;
		if haystack.get(idx + 1) == Some(&DELIM) {
			finger = idx + 2;
		} else {
			return Some(idx);
		}
	}
	None
}

/// Writer for argument values.
///
/// Everything written through an `ArgWriter` is escaped before it reaches the message.
/// Resolvers and [`Appender`][crate::Appender]s receive one to produce the value of an argument,
/// and can use it with [`write!`] through its [`std::fmt::Write`] implementation.
pub struct ArgWriter<'a> {
	out: &'a mut String,
}

impl<'a> ArgWriter<'a> {
	pub(crate) fn new(out: &'a mut String) -> Self {
		Self { out }
	}

	/// Remember the current end of the output, to [`rewind()`][Self::rewind] to it later.
	#[inline]
	pub(crate) fn mark(&self) -> usize {
		self.out.len()
	}

	/// Discard everything written since `mark` was taken.
	#[inline]
	pub(crate) fn rewind(&mut self, mark: usize) {
		self.out.truncate(mark);
	}

	/// Write a piece of the value.
	#[inline]
	pub fn write_str(&mut self, value: &str) {
		escape_into(self.out, value);
	}

	/// Write a single character of the value.
	#[inline]
	pub fn write_char(&mut self, value: char) {
		self.out.push(value);
		if value == DELIMITER {
			self.out.push(DELIMITER);
		}
	}

	/// Write a value of one of the supported value kinds.
	#[inline]
	pub fn write_value<V: crate::ToValue + ?Sized>(&mut self, value: &V) -> std::fmt::Result {
		value.to_value().append_to(self)
	}
}

impl std::fmt::Write for ArgWriter<'_> {
	#[inline]
	fn write_str(&mut self, s: &str) -> std::fmt::Result {
		ArgWriter::write_str(self, s);
		Ok(())
	}

	#[inline]
	fn write_char(&mut self, c: char) -> std::fmt::Result {
		ArgWriter::write_char(self, c);
		Ok(())
	}
}

impl std::fmt::Debug for ArgWriter<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ArgWriter").finish_non_exhaustive()
	}
}
