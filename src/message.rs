use crate::error::{ExpandError, ParseError};
use crate::{ParsedArgs, Resolve};

/// A template together with its arguments, expanded only when it is formatted.
///
/// This makes it possible to hand a message to a logger without expanding it up front:
/// ```
/// let args = [("user", "John"), ("item", "Hat")];
/// let message = sllm::message("`user` bought `item`", &args);
/// assert_eq!(message.to_string(), "`user:John` bought `item:Hat`");
/// ```
///
/// Formatting never fails.
/// Unresolved arguments are written as inline error tokens,
/// and a template with a syntax error is formatted as the [`SyntaxError`][crate::SyntaxError] message instead.
/// Use [`Message::expand()`] to get the errors.
#[derive(Debug)]
pub struct Message<'a, R: ?Sized> {
	template: &'a str,
	args: &'a R,
}

impl<R: ?Sized> Clone for Message<'_, R> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<R: ?Sized> Copy for Message<'_, R> {}

/// Bind a template to its arguments without expanding it.
///
/// See [`Message`].
pub fn message<'a, R>(template: &'a str, args: &'a R) -> Message<'a, R>
where
	R: Resolve + ?Sized,
{
	Message { template, args }
}

impl<'a, R: Resolve + ?Sized> Message<'a, R> {
	/// Get the template of the message.
	pub fn template(&self) -> &'a str {
		self.template
	}

	/// Expand the message and append it to `output`.
	///
	/// See [`append()`][crate::append()] for details.
	pub fn append(&self, output: &mut String) -> Result<(), ExpandError> {
		crate::append(output, self.template, self.args)
	}

	/// Expand the message into a new string.
	pub fn expand(&self) -> Result<String, ExpandError> {
		crate::expand(self.template, self.args)
	}

	/// Expand the message into an error value.
	pub fn to_error(&self) -> MessageError {
		MessageError::new(self.template, self.args)
	}
}

impl<R: Resolve + ?Sized> std::fmt::Display for Message<'_, R> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let mut output = String::with_capacity(self.template.len() + self.template.len() / 2);
		match self.append(&mut output) {
			Ok(()) | Err(ExpandError::Unresolved(_)) => f.write_str(&output),
			Err(ExpandError::Syntax(e)) => std::fmt::Display::fmt(&e, f),
		}
	}
}

/// An error whose description is an expanded message.
///
/// The arguments of the message can be recovered with [`MessageError::args()`].
///
/// # Example
/// ```
/// let error = sllm::MessageError::new("no stock for `item`", &[("item", "Hat")]);
/// assert_eq!(error.to_string(), "no stock for `item:Hat`");
/// assert_eq!(error.args().unwrap()["item"][0].as_str(), "Hat");
/// ```
#[derive(Debug, Clone)]
pub struct MessageError {
	message: String,
	expand_error: Option<ExpandError>,
}

impl MessageError {
	/// Expand a template into a new error.
	///
	/// If the expansion fails, the expansion error is available as [`source()`][std::error::Error::source].
	pub fn new<R>(template: &str, args: &R) -> Self
	where
		R: Resolve + ?Sized,
	{
		let mut message = String::with_capacity(template.len() + template.len() / 2);
		let expand_error = crate::append(&mut message, template, args).err();
		Self { message, expand_error }
	}

	/// Get the expanded message.
	///
	/// After a syntax error this only holds the message up to the erroneous argument.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Get the error that occurred while expanding the message, if any.
	pub fn expand_error(&self) -> Option<&ExpandError> {
		self.expand_error.as_ref()
	}

	/// Parse the arguments back from the message.
	pub fn args(&self) -> Result<ParsedArgs<'_>, ParseError> {
		crate::parse_map(&self.message, None)
	}
}

impl std::error::Error for MessageError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.expand_error.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
	}
}

impl std::fmt::Display for MessageError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match &self.expand_error {
			Some(ExpandError::Syntax(e)) => write!(f, "appending '{}': {}", self.message, e),
			_ => f.write_str(&self.message),
		}
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use crate::{positional, ArgValue, NoArguments, Value};
	use assert2::{assert, check, let_assert};
	use std::error::Error;

	#[test]
	fn test_message_display() {
		let values = [Value::Int(7), Value::Str("H`at")];
		let args = positional(&values);
		let message = message("added `count` x `item`", &args);
		check!(message.template() == "added `count` x `item`");
		check!(message.to_string() == "added `count:7` x `item:H``at`");
		check!(format!("[{message}]") == "[added `count:7` x `item:H``at`]");
	}

	#[test]
	fn test_message_is_expanded_on_every_format() {
		let count = std::cell::Cell::new(0);
		let args = crate::from_fn(|out, _, _| {
			count.set(count.get() + 1);
			out.write_value(&count.get())?;
			Ok(())
		});
		let message = message("`n`", &args);
		check!(count.get() == 0);
		check!(message.to_string() == "`n:1`");
		check!(message.to_string() == "`n:2`");
	}

	#[test]
	fn test_message_display_unresolved() {
		let args = positional(&[4711]);
		let message = message("`argok` but `notok`", &args);
		check!(message.to_string() == "`argok:4711` but `notok!(missing argument 1 'notok')`");
		let_assert!(Err(ExpandError::Unresolved(e)) = message.expand());
		check!(e.message() == message.to_string());
	}

	#[test]
	fn test_message_display_syntax_error() {
		let message = message("foo `ba:` baz", &NoArguments);
		check!(message.to_string() == "syntax error in `tmpl:foo ``ba:`` baz`:`pos:8`:`desc:empty explicit index`");
		let_assert!(Err(ExpandError::Syntax(_)) = message.expand());
	}

	#[test]
	fn test_message_append() {
		let mut output = String::from("log: ");
		let_assert!(Ok(()) = message("`a`", &[("a", true)]).append(&mut output));
		assert!(output == "log: `a:true`");
	}

	#[test]
	fn test_message_error() {
		let error = message("no stock for `item` in `store`", &[("item", "Hat"), ("store", "Main St.")]).to_error();
		check!(error.to_string() == "no stock for `item:Hat` in `store:Main St.`");
		check!(error.source().is_none());
		check!(error.expand_error().is_none());
		let_assert!(Ok(args) = error.args());
		check!(args["item"] == [ArgValue::Value("Hat".into())]);
		check!(args["store"] == [ArgValue::Value("Main St.".into())]);
	}

	#[test]
	fn test_message_error_unresolved() {
		let error = MessageError::new("lost `item`", &NoArguments);
		check!(error.to_string() == "lost `item!(missing argument 0 'item')`");
		let_assert!(Some(ExpandError::Unresolved(_)) = error.expand_error());
		check!(error.source().is_some());
		let_assert!(Ok(args) = error.args());
		check!(args["item"] == [ArgValue::Error("missing argument 0 'item'".into())]);
	}

	#[test]
	fn test_message_error_syntax() {
		let error = MessageError::new("done `a` and `b", &[("a", 1)]);
		check!(error.message() == "done `a:1` and ");
		check!(error.to_string() == "appending 'done `a:1` and ': syntax error in `tmpl:done ``a`` and ``b`:`pos:14`:`desc:unterminated argument`");
		let_assert!(Some(ExpandError::Syntax(_)) = error.expand_error());
	}
}
