//! Structured logging lightweight markup.
//!
//! A message template names its arguments inline, in backticks, so the expanded message
//! stays readable for humans and can still be parsed back by programs:
//!
//! ```text
//! template: added `count` x `item` to shopping cart by `user`
//! message:  added `count:7` x `item:Hat` to shopping cart by `user:John Doe`
//! ```
//!
//! # Features
//!
//! * Expand a template with positional or name-keyed arguments: [`expand()`], [`append()`].
//! * Explicit argument indices: `` `name:2` `` takes the third positional argument.
//! * Arguments that can not be resolved are written as inline errors: `` `name!(missing argument 0 'name')` ``.
//! * Parse an expanded message back into its arguments and template: [`parse()`], [`parse_map()`].
//! * Parse templates once and expand them many times: [`Template`], [`TemplateBuf`].
//! * Defer expansion until a message is formatted, for example by a logger: [`message()`].
//! * Turn a message into an error value: [`MessageError`].
//! * Reuse output buffers across threads with an explicit [`BufferPool`][pool::BufferPool].
//! * Convert parsed messages to JSON (optional, requires the `json` feature).
//! * Format timestamps compactly (optional, requires the `chrono` feature).
//!
//! A backtick in a value or in literal text is written as two backticks.
//! Argument names can not contain backticks, colons or exclamation marks.
//!
//! # Examples
//!
//! The [`expand()`] function expands a template with any [`Resolve`] implementation,
//! such as a [`BTreeMap`][std::collections::BTreeMap] or a list of [`positional()`] arguments.
//!
//! ```
//! # fn main() -> Result<(), sllm::ExpandError> {
//! use sllm::Value;
//! let args = [Value::Int(7), Value::Str("Hat"), Value::Str("John Doe")];
//! assert_eq!(
//!   sllm::expand("added `count` x `item` to shopping cart by `user`", &sllm::positional(&args))?,
//!   "added `count:7` x `item:Hat` to shopping cart by `user:John Doe`",
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The expanded message can be parsed back.
//!
//! ```
//! # fn main() -> Result<(), sllm::ParseError> {
//! let mut template = String::new();
//! let args = sllm::parse_map("added `count:7` x `item:Hat`", Some(&mut template))?;
//! assert_eq!(template, "added `count` x `item`");
//! assert_eq!(args["item"][0].as_str(), "Hat");
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(feature = "doc-cfg", feature(doc_cfg))]

pub mod error;
pub use error::{ExpandError, ParseError, SyntaxError};

mod grammar;
pub use grammar::{escape, escape_into, unescape, ArgWriter, DELIMITER, ERROR_MARKER, NAME_SEPARATOR};

mod value;
pub use value::*;

pub mod args;
pub use args::*;

mod template;
pub use template::*;

mod parse;
pub use parse::*;

mod message;
pub use message::*;

pub mod pool;

mod features;
#[allow(unused_imports)]
pub use features::*;

/// Expand a template and append the message to `output`.
///
/// Arguments have the form `` `name` `` or `` `name:index` ``.
/// Every argument is written as `` `name:value` ``, with the value escaped.
/// Arguments without explicit index receive the indices 0, 1, 2, ... in order,
/// arguments with an explicit index do not affect that count.
///
/// A doubled delimiter in the template is literal text and is copied to the message doubled,
/// so the message stays parseable: `` "a `` b" `` expands to `` "a `` b" ``.
/// [`parse()`] turns it back into a single delimiter.
///
/// If the resolver fails for an argument, the argument is written as `` `name!(error)` ``
/// and expansion continues. The failures are reported together after the whole message was appended.
///
/// A syntax error in the template stops expansion.
/// Output up to the erroneous argument remains in `output`.
pub fn append<R>(output: &mut String, template: &str, args: &R) -> Result<(), ExpandError>
where
	R: Resolve + ?Sized,
{
	template::raw::expand_source(output, template, args)
}

/// Expand a template into a new string.
///
/// See [`append()`] for details.
pub fn expand<R>(template: &str, args: &R) -> Result<String, ExpandError>
where
	R: Resolve + ?Sized,
{
	let mut output = String::with_capacity(template.len() + template.len() / 2);
	append(&mut output, template, args)?;
	Ok(output)
}

/// Get the names of all arguments in a template, in order of appearance.
///
/// ```
/// assert_eq!(sllm::parameters("this is `foo` and `bar:0`").unwrap(), ["foo", "bar"]);
/// ```
pub fn parameters(template: &str) -> Result<Vec<&str>, SyntaxError> {
	Ok(Template::from_str(template)?.parameters())
}
