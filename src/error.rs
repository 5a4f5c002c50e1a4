//! Module containing error details.

use crate::{Value, positional};

/// Template used to render a [`SyntaxError`].
///
/// Syntax errors are themselves sllm messages, so they can be parsed like any other message.
const SYNTAX_ERROR_TEMPLATE: &str = "syntax error in `tmpl`:`pos`:`desc`";

/// The template contains invalid argument syntax.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct SyntaxError {
	/// The erroneous template.
	pub template: String,

	/// The byte offset within the template where the error occurs.
	pub position: usize,

	/// What is wrong with the template.
	pub kind: SyntaxErrorKind,
}

/// The different kinds of syntax errors in a template.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SyntaxErrorKind {
	/// An argument was opened but never closed.
	///
	/// The position points just past the opening delimiter.
	UnterminatedArgument,

	/// An argument has an explicit index separator but no name (`` `:1` ``).
	EmptyName,

	/// An argument name contains the error marker (`!`).
	NameContainsSeparator,

	/// An argument has a name/index separator but no index (`` `name:` ``).
	///
	/// The position points just past the separator.
	EmptyIndex,

	/// The explicit index of an argument contains something other than a decimal digit.
	NotADigit,

	/// The explicit index of an argument does not fit in a `usize`.
	IndexOutOfRange,
}

impl SyntaxErrorKind {
	/// Get the short diagnostic message for this kind of error.
	pub fn description(self) -> &'static str {
		match self {
			Self::UnterminatedArgument => "unterminated argument",
			Self::EmptyName => "empty argument name",
			Self::NameContainsSeparator => "name contains separator",
			Self::EmptyIndex => "empty explicit index",
			Self::NotADigit => "not a digit in explicit arg index",
			Self::IndexOutOfRange => "explicit arg index out of range",
		}
	}
}

impl std::fmt::Display for SyntaxErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str(self.description())
	}
}

impl SyntaxError {
	pub(crate) fn new(template: &str, position: usize, kind: SyntaxErrorKind) -> Self {
		Self {
			template: template.to_owned(),
			position,
			kind,
		}
	}

	/// Get the range in the template that contains the error.
	pub fn source_range(&self) -> std::ops::Range<usize> {
		let start = match self.kind {
			// Highlight the opening delimiter.
			SyntaxErrorKind::UnterminatedArgument => self.position.saturating_sub(1),
			_ => self.position,
		};
		let start = start.min(self.template.len());
		let width = self.template.get(start..)
			.and_then(|rest| rest.chars().next())
			.map_or(0, char::len_utf8);
		let end = (start + width).min(self.template.len());
		start..end
	}

	/// Get the line of the template that contains the error.
	pub fn source_line(&self) -> &str {
		let position = self.source_range().start;
		let start = line_start(&self.template, position);
		let end = line_end(&self.template, position);
		&self.template[start..end]
	}

	/// Write source highlighting for the error location.
	///
	/// The highlighting ends with a newline.
	///
	/// Note: this function doesn't print anything if the source line exceeds 60 characters in width.
	/// For more control over this behaviour, consider using [`Self::source_range()`] and [`Self::source_line()`] instead.
	pub fn write_source_highlighting(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
		use unicode_width::UnicodeWidthStr;

		let range = self.source_range();
		let line_start = line_start(&self.template, range.start);
		let line = self.source_line();
		if line.width() > 60 {
			return Ok(());
		}
		write!(f, "  {}\n  ", line)?;
		write_underline(f, line, range.start - line_start..range.end - line_start)?;
		writeln!(f)
	}

	/// Get source highlighting for the error location as a string.
	///
	/// The highlighting ends with a newline.
	pub fn source_highlighting(&self) -> String {
		let mut output = String::new();
		// Writing to a String can not fail.
		let _ = self.write_source_highlighting(&mut output);
		output
	}
}

impl std::error::Error for SyntaxError {}

impl std::fmt::Display for SyntaxError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let args = [
			Value::Str(&self.template),
			Value::Uint(self.position as u64),
			Value::Str(self.kind.description()),
		];
		let mut message = String::with_capacity(SYNTAX_ERROR_TEMPLATE.len() + self.template.len() + 32);
		crate::append(&mut message, SYNTAX_ERROR_TEMPLATE, &positional(&args)).map_err(|_| std::fmt::Error)?;
		f.write_str(&message)
	}
}

fn line_start(source: &str, position: usize) -> usize {
	match source.as_bytes()[..position].iter().rposition(|&c| c == b'\n' || c == b'\r') {
		Some(line_end) => line_end + 1,
		None => 0,
	}
}

fn line_end(source: &str, position: usize) -> usize {
	match source.as_bytes()[position..].iter().position(|&c| c == b'\n' || c == b'\r') {
		Some(line_end) => position + line_end,
		None => source.len(),
	}
}

fn write_underline(f: &mut impl std::fmt::Write, line: &str, range: std::ops::Range<usize>) -> std::fmt::Result {
	use unicode_width::UnicodeWidthStr;
	let spaces = line[..range.start].width();
	let carets = line[range].width().max(1);
	write!(f, "{}", " ".repeat(spaces))?;
	write!(f, "{}", "^".repeat(carets))?;
	Ok(())
}

/// A resolver could not produce the value of an argument.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub enum ResolveError {
	/// There is no value for the requested argument.
	Missing(MissingArgument),

	/// Formatting the value failed.
	Format(std::fmt::Error),

	/// Any other reason, described by a message.
	Custom(String),
}

impl ResolveError {
	/// Create a resolve error with a custom message.
	pub fn custom(message: impl std::fmt::Display) -> Self {
		Self::Custom(message.to_string())
	}

	/// Check if the error means the argument is missing.
	pub fn is_missing(&self) -> bool {
		matches!(self, Self::Missing(_))
	}
}

impl From<MissingArgument> for ResolveError {
	fn from(other: MissingArgument) -> Self {
		Self::Missing(other)
	}
}

impl From<std::fmt::Error> for ResolveError {
	fn from(other: std::fmt::Error) -> Self {
		Self::Format(other)
	}
}

impl std::error::Error for ResolveError {}

impl std::fmt::Display for ResolveError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Missing(e) => e.fmt(f),
			Self::Format(e) => e.fmt(f),
			Self::Custom(message) => f.write_str(message),
		}
	}
}

/// There is no value for the requested argument.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct MissingArgument {
	/// The index of the argument.
	pub index: usize,

	/// The name of the argument.
	pub name: String,
}

impl MissingArgument {
	/// Create a new error for the argument with the given index and name.
	pub fn new(index: usize, name: &str) -> Self {
		Self {
			index,
			name: name.to_owned(),
		}
	}
}

impl std::error::Error for MissingArgument {}

impl std::fmt::Display for MissingArgument {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "missing argument {} '{}'", self.index, self.name)
	}
}

/// An argument that was written as inline error token instead of a value.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct FailedArgument {
	/// The byte offset of the argument within the template.
	///
	/// This points to the opening delimiter of the argument.
	pub position: usize,

	/// The index that was passed to the resolver.
	pub index: usize,

	/// The name of the argument.
	pub name: String,

	/// The error reported by the resolver.
	pub error: ResolveError,
}

/// One or more arguments could not be resolved.
///
/// The message was still expanded completely,
/// with an inline error token in place of every failed argument.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct UnresolvedArguments {
	pub(crate) message: String,
	pub(crate) failures: Vec<FailedArgument>,
}

impl UnresolvedArguments {
	/// Get the expanded message, including the inline error tokens.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Consume the error to get the expanded message.
	pub fn into_message(self) -> String {
		self.message
	}

	/// Get the arguments that failed, in template order.
	pub fn failures(&self) -> &[FailedArgument] {
		&self.failures
	}
}

impl std::error::Error for UnresolvedArguments {}

impl std::fmt::Display for UnresolvedArguments {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "unresolved arguments: ")?;
		for (i, failure) in self.failures.iter().enumerate() {
			if i > 0 {
				write!(f, "; ")?;
			}
			write!(f, "{}: {}", failure.name, failure.error)?;
		}
		Ok(())
	}
}

/// An error that can occur while expanding a template.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub enum ExpandError {
	/// The template contains invalid syntax.
	///
	/// Expansion stopped at the offending argument.
	Syntax(SyntaxError),

	/// Some arguments could not be resolved.
	///
	/// Expansion completed, the failed arguments are written as inline error tokens.
	Unresolved(UnresolvedArguments),
}

impl From<SyntaxError> for ExpandError {
	fn from(other: SyntaxError) -> Self {
		Self::Syntax(other)
	}
}

impl From<UnresolvedArguments> for ExpandError {
	fn from(other: UnresolvedArguments) -> Self {
		Self::Unresolved(other)
	}
}

impl std::error::Error for ExpandError {}

impl std::fmt::Display for ExpandError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Syntax(e) => e.fmt(f),
			Self::Unresolved(e) => e.fmt(f),
		}
	}
}

/// An error that can occur while parsing a message.
#[derive(Debug)]
pub enum ParseError {
	/// The message ends with a single delimiter.
	EmptyArgument(EmptyArgument),

	/// An argument name is not followed by a separator.
	UnterminatedName(UnterminatedName),

	/// An argument has a separator but no name.
	EmptyName(EmptyName),

	/// The message ends right after an error marker.
	MissingErrorMarker(MissingErrorMarker),

	/// An error marker is not followed by an opening parenthesis.
	InvalidErrorStart(InvalidErrorStart),

	/// An error value does not end with a closing parenthesis.
	InvalidErrorEnd(InvalidErrorEnd),

	/// An argument value has no closing delimiter.
	UnterminatedArgument(UnterminatedArgument),

	/// The callback rejected an argument.
	Callback(CallbackError),
}

macro_rules! impl_from_for_parse_error {
	($($variant:ident),* $(,)?) => {
		$(
			impl From<$variant> for ParseError {
				fn from(other: $variant) -> Self {
					Self::$variant(other)
				}
			}
		)*
	};
}

impl_from_for_parse_error!(
	EmptyArgument,
	UnterminatedName,
	EmptyName,
	MissingErrorMarker,
	InvalidErrorStart,
	InvalidErrorEnd,
	UnterminatedArgument,
);

impl From<CallbackError> for ParseError {
	fn from(other: CallbackError) -> Self {
		Self::Callback(other)
	}
}

impl ParseError {
	/// Get the byte offset within the message where the error occurs.
	pub fn position(&self) -> usize {
		match self {
			Self::EmptyArgument(e) => e.position,
			Self::UnterminatedName(e) => e.position,
			Self::EmptyName(e) => e.position,
			Self::MissingErrorMarker(e) => e.position,
			Self::InvalidErrorStart(e) => e.position,
			Self::InvalidErrorEnd(e) => e.position,
			Self::UnterminatedArgument(e) => e.position,
			Self::Callback(e) => e.position,
		}
	}
}

impl std::error::Error for ParseError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Callback(e) => Some(e),
			_ => None,
		}
	}
}

impl std::fmt::Display for ParseError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::EmptyArgument(e) => e.fmt(f),
			Self::UnterminatedName(e) => e.fmt(f),
			Self::EmptyName(e) => e.fmt(f),
			Self::MissingErrorMarker(e) => e.fmt(f),
			Self::InvalidErrorStart(e) => e.fmt(f),
			Self::InvalidErrorEnd(e) => e.fmt(f),
			Self::UnterminatedArgument(e) => e.fmt(f),
			Self::Callback(e) => e.fmt(f),
		}
	}
}

/// The message ends with a single delimiter.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct EmptyArgument {
	/// The byte offset of the delimiter in the message.
	pub position: usize,
}

impl std::error::Error for EmptyArgument {}

impl std::fmt::Display for EmptyArgument {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "empty arg")
	}
}

/// An argument has a name separator or error marker right after the opening delimiter.
///
/// Templates can not contain arguments without a name, so no expanded message does either.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct EmptyName {
	/// The byte offset of the separator or error marker in the message.
	pub position: usize,
}

impl std::error::Error for EmptyName {}

impl std::fmt::Display for EmptyName {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "empty arg name")
	}
}

/// An argument name is not followed by a name separator or error marker.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct UnterminatedName {
	/// The byte offset of the opening delimiter in the message.
	pub position: usize,

	/// The text following the opening delimiter, up to the next delimiter.
	pub text: String,
}

impl std::error::Error for UnterminatedName {}

impl std::fmt::Display for UnterminatedName {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "unterminated arg name '{}'", self.text)
	}
}

/// The message ends right after the error marker of an argument.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct MissingErrorMarker {
	/// The byte offset of the error marker in the message.
	pub position: usize,

	/// The name of the argument.
	pub name: String,
}

impl std::error::Error for MissingErrorMarker {}

impl std::fmt::Display for MissingErrorMarker {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "no error marker for arg '{}'", self.name)
	}
}

/// The error marker of an argument is not followed by an opening parenthesis.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct InvalidErrorStart {
	/// The byte offset of the unexpected character in the message.
	pub position: usize,

	/// The name of the argument.
	pub name: String,

	/// The character found instead of `(`.
	pub character: char,
}

impl std::error::Error for InvalidErrorStart {}

impl std::fmt::Display for InvalidErrorStart {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid error start marker '{}'", self.character)
	}
}

/// The error value of an argument does not end with a closing parenthesis.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct InvalidErrorEnd {
	/// The byte offset of the unexpected character in the message.
	pub position: usize,

	/// The name of the argument.
	pub name: String,

	/// The character found instead of `)`.
	pub character: char,
}

impl std::error::Error for InvalidErrorEnd {}

impl std::fmt::Display for InvalidErrorEnd {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid error end marker '{}'", self.character)
	}
}

/// The value of an argument has no closing delimiter.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct UnterminatedArgument {
	/// The byte offset of the opening delimiter in the message.
	pub position: usize,

	/// The name of the argument.
	pub name: String,
}

impl std::error::Error for UnterminatedArgument {}

impl std::fmt::Display for UnterminatedArgument {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "unterminated arg '{}'", self.name)
	}
}

/// The callback passed to [`parse()`][crate::parse()] rejected an argument.
#[derive(Debug)]
pub struct CallbackError {
	/// The byte offset of the opening delimiter of the argument in the message.
	pub position: usize,

	/// The name of the argument.
	pub name: String,

	/// True if the argument carried an inline error instead of a value.
	pub is_error: bool,

	/// The error returned by the callback.
	pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for CallbackError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&*self.source)
	}
}

impl std::fmt::Display for CallbackError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		if self.is_error {
			write!(f, "error arg '{}': {}", self.name, self.source)
		} else {
			write!(f, "arg '{}': {}", self.name, self.source)
		}
	}
}

/// The same argument name appears more than once in a message.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct DuplicateArgument {
	/// The name of the argument.
	pub name: String,
}

impl std::error::Error for DuplicateArgument {}

impl std::fmt::Display for DuplicateArgument {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "duplicate argument '{}'", self.name)
	}
}
