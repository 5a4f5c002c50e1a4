use super::{Part, Placeholder};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::grammar::{DELIM, ERR_MARK, NAME_SEP};

/// Single-pass scanner over a template.
///
/// Yields the literal text and the arguments of the template from left to right.
/// After a syntax error is yielded, the scanner is exhausted.
pub struct Scanner<'a> {
	source: &'a str,
	finger: usize,
	next_index: usize,
}

impl<'a> Scanner<'a> {
	/// Create a scanner for the given template.
	pub fn new(source: &'a str) -> Self {
		Self {
			source,
			finger: 0,
			next_index: 0,
		}
	}

	fn error(&mut self, position: usize, kind: SyntaxErrorKind) -> SyntaxError {
		self.finger = self.source.len();
		SyntaxError::new(self.source, position, kind)
	}

	/// Parse the argument with the opening delimiter at `start`.
	fn placeholder(&mut self, start: usize) -> Result<Placeholder, SyntaxError> {
		let source = self.source.as_bytes();
		let name_start = start + 1;
		let end = match memchr::memchr(DELIM, &source[name_start..]) {
			Some(x) => name_start + x,
			None => return Err(self.error(name_start, SyntaxErrorKind::UnterminatedArgument)),
		};
		let body = &source[name_start..end];

		let name_end = match memchr::memchr(NAME_SEP, body) {
			Some(x) => name_start + x,
			None => end,
		};
		if name_end == name_start {
			return Err(self.error(name_start, SyntaxErrorKind::EmptyName));
		}
		if let Some(x) = memchr::memchr(ERR_MARK, &source[name_start..name_end]) {
			return Err(self.error(name_start + x, SyntaxErrorKind::NameContainsSeparator));
		}

		let index = if name_end == end {
			let index = self.next_index;
			self.next_index += 1;
			index
		} else {
			self.explicit_index(name_end + 1, end)?
		};

		self.finger = end + 1;
		Ok(Placeholder {
			start,
			name: name_start..name_end,
			index,
		})
	}

	/// Parse the explicit index in `source[start..end]`.
	///
	/// Explicit indices do not affect the automatic index.
	fn explicit_index(&mut self, start: usize, end: usize) -> Result<usize, SyntaxError> {
		if start == end {
			return Err(self.error(start, SyntaxErrorKind::EmptyIndex));
		}
		let mut index: usize = 0;
		for (i, &c) in self.source.as_bytes()[start..end].iter().enumerate() {
			if !c.is_ascii_digit() {
				return Err(self.error(start + i, SyntaxErrorKind::NotADigit));
			}
			index = match index.checked_mul(10).and_then(|x| x.checked_add(usize::from(c - b'0'))) {
				Some(x) => x,
				None => return Err(self.error(start, SyntaxErrorKind::IndexOutOfRange)),
			};
		}
		Ok(index)
	}
}

impl Iterator for Scanner<'_> {
	type Item = Result<Part, SyntaxError>;

	fn next(&mut self) -> Option<Self::Item> {
		let len = self.source.len();
		if self.finger >= len {
			return None;
		}

		let start = self.finger;
		match find_argument_start(self.source.as_bytes(), start) {
			// No more arguments, the rest is literal text.
			None => {
				self.finger = len;
				Some(Ok(Part::Literal(start..len)))
			},
			// Literal text up to the next argument.
			Some(next) if next > start => {
				self.finger = next;
				Some(Ok(Part::Literal(start..next)))
			},
			Some(next) => Some(self.placeholder(next).map(Part::Placeholder)),
		}
	}
}

/// Find the next delimiter that opens an argument.
///
/// Doubled delimiters are literal text and are skipped.
/// A delimiter at the very end of the input does open an argument (which is unterminated).
fn find_argument_start(source: &[u8], start: usize) -> Option<usize> {
	crate::grammar::find_single_delimiter(source, start)
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::{assert, check, let_assert};

	fn scan(source: &str) -> Result<Vec<Part>, SyntaxError> {
		Scanner::new(source).collect()
	}

	fn placeholder(start: usize, name: std::ops::Range<usize>, index: usize) -> Part {
		Part::Placeholder(Placeholder { start, name, index })
	}

	#[test]
	fn test_literal_only() {
		check!(scan("foo bar bar").unwrap() == [Part::Literal(0..11)]);
		check!(scan("").unwrap().is_empty());
	}

	#[test]
	fn test_doubled_delimiter_is_literal() {
		check!(scan("backtick '``' here").unwrap() == [Part::Literal(0..18)]);
		check!(scan("``").unwrap() == [Part::Literal(0..2)]);
	}

	#[test]
	fn test_placeholders() {
		assert!(scan("want `arg1` here").unwrap() == [
			Part::Literal(0..5),
			placeholder(5, 6..10, 0),
			Part::Literal(11..16),
		]);
		assert!(scan("`a``b`").unwrap() == [
			placeholder(0, 1..2, 0),
			placeholder(3, 4..5, 1),
		]);
	}

	#[test]
	fn test_auto_index_ignores_explicit_index() {
		let_assert!(Ok(parts) = scan("`a`, `b:11`, `c`, `d:0`, `e`"));
		let indices: Vec<usize> = parts.iter().filter_map(|part| match part {
			Part::Placeholder(x) => Some(x.index),
			Part::Literal(_) => None,
		}).collect();
		assert!(indices == [0, 11, 1, 0, 2]);
	}

	#[test]
	fn test_syntax_errors() {
		let check_error = |source: &str, position: usize, kind: SyntaxErrorKind| {
			let_assert!(Err(e) = scan(source));
			check!(e.position == position, "{source:?}");
			check!(e.kind == kind, "{source:?}");
			check!(e.template == source);
		};
		check_error("foo `bar without end", 5, SyntaxErrorKind::UnterminatedArgument);
		check_error("without end `", 13, SyntaxErrorKind::UnterminatedArgument);
		check_error("foo `ba:` baz", 8, SyntaxErrorKind::EmptyIndex);
		check_error("foo `ba:1x2` baz", 9, SyntaxErrorKind::NotADigit);
		check_error("foo `:1` baz", 5, SyntaxErrorKind::EmptyName);
		check_error("foo `b!a` baz", 6, SyntaxErrorKind::NameContainsSeparator);
		check_error("`i:99999999999999999999999`", 3, SyntaxErrorKind::IndexOutOfRange);
	}

	#[test]
	fn test_scanner_stops_after_error() {
		let mut scanner = Scanner::new("ok `x:` `never`");
		check!(let Some(Ok(Part::Literal(_))) = scanner.next());
		check!(let Some(Err(_)) = scanner.next());
		check!(let None = scanner.next());
	}
}
