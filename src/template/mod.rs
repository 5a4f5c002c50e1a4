use std::borrow::Cow;

use crate::error::{ExpandError, SyntaxError};
use crate::Resolve;

pub(crate) mod raw;

/// A parsed template that borrows the source string.
///
/// You can parse the template once and call [`Self::expand()`] multiple times.
/// This is generally more efficient than calling [`expand()`][crate::expand] multiple times on the same string,
/// and it reports syntax errors before any argument is resolved.
///
/// This template borrows the source string.
/// You can use [`TemplateBuf`] if you need a template that owns the source string.
#[derive(Clone)]
pub struct Template<'a> {
	source: &'a str,
	raw: Cow<'a, raw::Template>,
}

impl std::fmt::Debug for Template<'_> {
	#[inline]
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Template").field(&self.source).finish()
	}
}

impl<'a> Template<'a> {
	/// Parse a template from a string slice.
	///
	/// The source can contain arguments of the form `` `name` `` or `` `name:index` ``,
	/// to be filled in later when you call [`Self::expand()`].
	/// A doubled delimiter (` `` `) is literal text.
	#[inline]
	#[allow(clippy::should_implement_trait)]
	pub fn from_str(source: &'a str) -> Result<Self, SyntaxError> {
		Ok(Self {
			source,
			raw: Cow::Owned(raw::Template::parse(source)?),
		})
	}

	/// Get the original source string.
	#[inline]
	pub fn source(&self) -> &'a str {
		self.source
	}

	/// Get the names of all arguments in the template, in order of appearance.
	///
	/// Names that appear more than once are listed more than once.
	pub fn parameters(&self) -> Vec<&'a str> {
		self.raw.names(self.source)
	}

	/// Expand the template and append the result to `output`.
	///
	/// If some arguments fail to resolve, the complete message is still appended,
	/// with inline error tokens for the failed arguments.
	pub fn append<R>(&self, output: &mut String, args: &R) -> Result<(), ExpandError>
	where
		R: Resolve + ?Sized,
	{
		self.raw.expand(output, self.source, args)
	}

	/// Expand the template into a new string.
	pub fn expand<R>(&self, args: &R) -> Result<String, ExpandError>
	where
		R: Resolve + ?Sized,
	{
		let mut output = String::with_capacity(self.source.len() + self.source.len() / 2);
		self.append(&mut output, args)?;
		Ok(output)
	}
}

/// A parsed template that owns the source string.
///
/// You can parse the template once and call [`Self::expand()`] multiple times.
///
/// This template owns the source string.
/// If you do not need ownership, you can also use [`Template`] to borrow it instead.
#[derive(Clone)]
pub struct TemplateBuf {
	source: String,
	raw: raw::Template,
}

impl std::fmt::Debug for TemplateBuf {
	#[inline]
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("TemplateBuf").field(&self.source).finish()
	}
}

impl TemplateBuf {
	/// Parse a template from a string.
	///
	/// This takes ownership of the string.
	/// See [`Template::from_str()`] for the syntax.
	#[inline]
	pub fn from_string(source: String) -> Result<Self, SyntaxError> {
		let raw = raw::Template::parse(&source)?;
		Ok(Self { source, raw })
	}

	/// Get the original source string.
	#[inline]
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Consume the template to get the original source string.
	#[inline]
	pub fn into_source(self) -> String {
		self.source
	}

	/// Borrow the template.
	#[inline]
	pub fn as_template(&self) -> Template<'_> {
		Template {
			source: &self.source,
			raw: Cow::Borrowed(&self.raw),
		}
	}

	/// Get the names of all arguments in the template, in order of appearance.
	pub fn parameters(&self) -> Vec<&str> {
		self.raw.names(&self.source)
	}

	/// Expand the template and append the result to `output`.
	pub fn append<R>(&self, output: &mut String, args: &R) -> Result<(), ExpandError>
	where
		R: Resolve + ?Sized,
	{
		self.raw.expand(output, &self.source, args)
	}

	/// Expand the template into a new string.
	pub fn expand<R>(&self, args: &R) -> Result<String, ExpandError>
	where
		R: Resolve + ?Sized,
	{
		self.as_template().expand(args)
	}
}

/// Templates compare equal if they have the same source.
impl PartialEq for Template<'_> {
	#[inline]
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
	}
}

impl Eq for Template<'_> {}

impl PartialEq for TemplateBuf {
	#[inline]
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
	}
}

impl Eq for TemplateBuf {}

impl<'a> From<&'a TemplateBuf> for Template<'a> {
	#[inline]
	fn from(other: &'a TemplateBuf) -> Self {
		other.as_template()
	}
}

impl From<&Template<'_>> for TemplateBuf {
	#[inline]
	fn from(other: &Template<'_>) -> Self {
		other.clone().into()
	}
}

impl From<Template<'_>> for TemplateBuf {
	#[inline]
	fn from(other: Template<'_>) -> Self {
		Self {
			source: other.source.to_owned(),
			raw: other.raw.into_owned(),
		}
	}
}

impl std::str::FromStr for TemplateBuf {
	type Err = SyntaxError;

	#[inline]
	fn from_str(source: &str) -> Result<Self, Self::Err> {
		Self::from_string(source.to_owned())
	}
}
