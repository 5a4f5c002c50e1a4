use std::borrow::Cow;
use std::collections::btree_map::{BTreeMap, Entry};

use crate::error::{
	CallbackError,
	DuplicateArgument,
	EmptyArgument,
	EmptyName,
	InvalidErrorEnd,
	InvalidErrorStart,
	MissingErrorMarker,
	ParseError,
	UnterminatedArgument,
	UnterminatedName,
};
use crate::grammar::{find_single_delimiter, unescape, DELIM, DELIMITER, ERR_MARK, NAME_SEP};

/// The value of an argument found in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue<'a> {
	/// A normal `` `name:value` `` argument.
	Value(Cow<'a, str>),

	/// An inline error `` `name!(error)` `` written in place of a value.
	Error(Cow<'a, str>),
}

impl<'a> ArgValue<'a> {
	fn new(value: Cow<'a, str>, is_error: bool) -> Self {
		if is_error {
			Self::Error(value)
		} else {
			Self::Value(value)
		}
	}

	/// Get the text of the value or the error.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Value(x) => x,
			Self::Error(x) => x,
		}
	}

	/// Check if the argument carried an inline error.
	pub fn is_error(&self) -> bool {
		matches!(self, Self::Error(_))
	}

	/// Convert into an owned value that does not borrow the message.
	pub fn into_owned(self) -> ArgValue<'static> {
		match self {
			Self::Value(x) => ArgValue::Value(Cow::Owned(x.into_owned())),
			Self::Error(x) => ArgValue::Error(Cow::Owned(x.into_owned())),
		}
	}
}

impl std::fmt::Display for ArgValue<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// All arguments of a message, grouped by name.
///
/// Every name maps to the values of all its occurrences, in message order.
pub type ParsedArgs<'a> = BTreeMap<&'a str, Vec<ArgValue<'a>>>;

/// Parse an expanded message and call `on_arg` for every argument in it.
///
/// The callback receives the name, the unescaped value and a flag that is true
/// if the argument carries an inline error (`` `name!(error)` ``) instead of a value.
/// If the callback returns an error, parsing stops and the error is returned wrapped in a [`CallbackError`].
///
/// If `template` is given, the template of the message is reconstructed and appended to it:
/// every argument is written back as `` `name` ``, literal text is copied unchanged.
///
/// # Example
/// ```
/// let mut template = String::new();
/// let mut found = Vec::new();
/// sllm::parse("added `count:7` x `item:Hat`", Some(&mut template), |name, value, _is_error| {
///     found.push((name, value));
///     Ok::<_, std::convert::Infallible>(())
/// }).unwrap();
/// assert_eq!(template, "added `count` x `item`");
/// assert_eq!(found, [("count", "7".into()), ("item", "Hat".into())]);
/// ```
pub fn parse<'m, F, E>(message: &'m str, mut template: Option<&mut String>, mut on_arg: F) -> Result<(), ParseError>
where
	F: FnMut(&'m str, Cow<'m, str>, bool) -> Result<(), E>,
	E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
	let bytes = message.as_bytes();
	let mut finger = 0;
	loop {
		let start = match memchr::memchr(DELIM, &bytes[finger..]) {
			Some(x) => finger + x,
			None => {
				if let Some(template) = template.as_deref_mut() {
					template.push_str(&message[finger..]);
				}
				return Ok(());
			},
		};
		if let Some(template) = template.as_deref_mut() {
			template.push_str(&message[finger..start]);
		}

		let name_start = start + 1;
		match bytes.get(name_start) {
			None => return Err(EmptyArgument { position: start }.into()),
			Some(&DELIM) => {
				// Doubled delimiter: literal text.
				if let Some(template) = template.as_deref_mut() {
					template.push(DELIMITER);
					template.push(DELIMITER);
				}
				finger = name_start + 1;
				continue;
			},
			Some(_) => (),
		}

		let name_end = match memchr::memchr3(NAME_SEP, ERR_MARK, DELIM, &bytes[name_start..]) {
			Some(x) if bytes[name_start + x] != DELIM => name_start + x,
			_ => {
				let text_end = memchr::memchr(DELIM, &bytes[name_start..]).map_or(message.len(), |x| name_start + x);
				return Err(UnterminatedName {
					position: start,
					text: message[name_start..text_end].to_owned(),
				}.into());
			},
		};
		if name_end == name_start {
			return Err(EmptyName { position: name_end }.into());
		}
		let name = &message[name_start..name_end];

		let is_error = bytes[name_end] == ERR_MARK;
		let value_start = if is_error {
			let marker = name_end + 1;
			match message[marker..].chars().next() {
				None => return Err(MissingErrorMarker { position: name_end, name: name.into() }.into()),
				Some('(') => marker + 1,
				Some(character) => return Err(InvalidErrorStart {
					position: marker,
					name: name.into(),
					character,
				}.into()),
			}
		} else {
			name_end + 1
		};

		let end = match find_single_delimiter(bytes, value_start) {
			Some(x) => x,
			None => return Err(UnterminatedArgument { position: start, name: name.into() }.into()),
		};

		let value = if is_error {
			match message[value_start..end].strip_suffix(')') {
				Some(x) => x,
				None => {
					// The opening parenthesis is the last character if the error value is empty.
					let (position, character) = message[..end].char_indices().next_back().unwrap_or((start, DELIMITER));
					return Err(InvalidErrorEnd {
						position,
						name: name.into(),
						character,
					}.into());
				},
			}
		} else {
			&message[value_start..end]
		};

		on_arg(name, unescape(value), is_error).map_err(|e| CallbackError {
			position: start,
			name: name.into(),
			is_error,
			source: e.into(),
		})?;

		if let Some(template) = template.as_deref_mut() {
			template.push(DELIMITER);
			template.push_str(name);
			template.push(DELIMITER);
		}
		finger = end + 1;
	}
}

/// Parse an expanded message into a map of all arguments.
///
/// Arguments that appear more than once keep all their values, in message order.
/// See [`parse()`] for the meaning of `template`.
///
/// # Example
/// ```
/// # use sllm::ArgValue;
/// let args = sllm::parse_map("added `count:7` x `item:Hat` and `item!(sold out)`", None).unwrap();
/// assert_eq!(args["count"], [ArgValue::Value("7".into())]);
/// assert_eq!(args["item"], [ArgValue::Value("Hat".into()), ArgValue::Error("sold out".into())]);
/// ```
pub fn parse_map<'m>(message: &'m str, template: Option<&mut String>) -> Result<ParsedArgs<'m>, ParseError> {
	let mut args = ParsedArgs::new();
	parse(message, template, |name, value, is_error| {
		args.entry(name).or_default().push(ArgValue::new(value, is_error));
		Ok::<_, std::convert::Infallible>(())
	})?;
	Ok(args)
}

/// Parse an expanded message into a map with exactly one value per argument.
///
/// If an argument name appears more than once, parsing fails with a [`CallbackError`]
/// that has a [`DuplicateArgument`] as source.
pub fn parse_unique<'m>(message: &'m str, template: Option<&mut String>) -> Result<BTreeMap<&'m str, ArgValue<'m>>, ParseError> {
	let mut args = BTreeMap::new();
	parse(message, template, |name, value, is_error| match args.entry(name) {
		Entry::Vacant(entry) => {
			entry.insert(ArgValue::new(value, is_error));
			Ok(())
		},
		Entry::Occupied(_) => Err(DuplicateArgument { name: name.into() }),
	})?;
	Ok(args)
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use crate::error::ExpandError;
	use crate::{expand, with_default, Value};
	use assert2::{assert, check, let_assert};

	fn parse_template(message: &str) -> Result<(ParsedArgs<'_>, String), ParseError> {
		let mut template = String::new();
		let args = parse_map(message, Some(&mut template))?;
		Ok((args, template))
	}

	#[test]
	fn test_parse_map() {
		let_assert!(Ok((args, template)) = parse_template("added `count:7` ⨉ `item:Hat` to shopping cart by `user:John Doe`"));
		assert!(template == "added `count` ⨉ `item` to shopping cart by `user`");
		assert!(args.len() == 3);
		check!(args["count"] == [ArgValue::Value("7".into())]);
		check!(args["item"] == [ArgValue::Value("Hat".into())]);
		check!(args["user"] == [ArgValue::Value("John Doe".into())]);
	}

	#[test]
	fn test_parse_repeated_and_errors() {
		let_assert!(Ok((args, template)) = parse_template("`a:1` `b!(missing argument 1 'b')` `a:2`"));
		assert!(template == "`a` `b` `a`");
		check!(args["a"] == [ArgValue::Value("1".into()), ArgValue::Value("2".into())]);
		check!(args["b"] == [ArgValue::Error("missing argument 1 'b'".into())]);
		check!(args["b"][0].is_error());
		check!(args["b"][0].as_str() == "missing argument 1 'b'");
	}

	#[test]
	fn test_parse_unescapes_values() {
		let_assert!(Ok((args, template)) = parse_template("a `item:``hat``` and `err!(no ``x``)` ``lit``"));
		assert!(template == "a `item` and `err` ``lit``");
		check!(args["item"] == [ArgValue::Value("`hat`".into())]);
		check!(args["err"] == [ArgValue::Error("no `x`".into())]);

		let mut borrowed = true;
		let_assert!(Ok(()) = parse("`a:plain` `b:esc``aped`", None, |name, value, _| {
			if name == "a" {
				borrowed &= matches!(value, Cow::Borrowed(_));
			} else {
				borrowed &= matches!(value, Cow::Owned(_));
			}
			Ok::<_, std::convert::Infallible>(())
		}));
		assert!(borrowed);
	}

	#[test]
	fn test_parse_doubled_delimiter_is_no_argument() {
		let_assert!(Ok((args, template)) = parse_template("there is no empty `` arg"));
		assert!(args.is_empty());
		assert!(template == "there is no empty `` arg");
	}

	#[test]
	fn test_parse_empty_values() {
		let_assert!(Ok((args, _)) = parse_template("`a:` and `b!()`"));
		check!(args["a"] == [ArgValue::Value("".into())]);
		check!(args["b"] == [ArgValue::Error("".into())]);
	}

	#[test]
	fn test_parse_errors() {
		let_assert!(Err(ParseError::EmptyArgument(e)) = parse_map("there is no arg `", None));
		check!(e.position == 16);
		check!(e.to_string() == "empty arg");

		let_assert!(Err(ParseError::UnterminatedName(e)) = parse_map("there is no `arg`", None));
		check!(e.position == 12);
		check!(e.to_string() == "unterminated arg name 'arg'");

		let_assert!(Err(ParseError::EmptyName(e)) = parse_map("value `:x` here", None));
		check!(e.position == 7);
		check!(e.to_string() == "empty arg name");

		let_assert!(Err(ParseError::EmptyName(e)) = parse_map("error `!(x)` here", None));
		check!(e.position == 7);

		let_assert!(Err(ParseError::UnterminatedName(e)) = parse_map("no `end", None));
		check!(e.to_string() == "unterminated arg name 'end'");

		let_assert!(Err(ParseError::MissingErrorMarker(e)) = parse_map("there is no `arg!", None));
		check!(e.position == 16);
		check!(e.to_string() == "no error marker for arg 'arg'");

		let_assert!(Err(ParseError::InvalidErrorStart(e)) = parse_map("there is no `arg!<bla>`", None));
		check!(e.position == 17);
		check!(e.to_string() == "invalid error start marker '<'");

		let_assert!(Err(ParseError::InvalidErrorEnd(e)) = parse_map("there is no `arg!(bla>`", None));
		check!(e.position == 21);
		check!(e.to_string() == "invalid error end marker '>'");

		let_assert!(Err(ParseError::InvalidErrorEnd(e)) = parse_map("`a!(`", None));
		check!(e.position == 3);
		check!(e.character == '(');

		let_assert!(Err(ParseError::UnterminatedArgument(e)) = parse_map("there is no `arg:4711", None));
		check!(e.position == 12);
		check!(e.to_string() == "unterminated arg 'arg'");

		let_assert!(Err(ParseError::UnterminatedArgument(e)) = parse_map("`arg:47``11``", None));
		check!(e.to_string() == "unterminated arg 'arg'");
	}

	#[test]
	fn test_parse_callback_error() {
		let_assert!(Err(e) = parse("`a:1` `user:x`", None, |name, _, _| {
			if name == "user" {
				Err("rejected")
			} else {
				Ok(())
			}
		}));
		check!(e.position() == 6);
		check!(e.to_string() == "arg 'user': rejected");
		check!(let ParseError::Callback(CallbackError { is_error: false, .. }) = e);

		let_assert!(Err(e) = parse("`user!(gone)`", None, |_, _, _| Err("rejected")));
		check!(e.to_string() == "error arg 'user': rejected");
	}

	#[test]
	fn test_parse_unique() {
		let_assert!(Ok(args) = parse_unique("`a:1` `b:2`", None));
		check!(args["a"] == ArgValue::Value("1".into()));
		check!(args["b"] == ArgValue::Value("2".into()));

		let_assert!(Err(ParseError::Callback(e)) = parse_unique("`a:1` `a:2`", None));
		check!(e.to_string() == "arg 'a': duplicate argument 'a'");
		check!(e.source.is::<DuplicateArgument>());
	}

	#[rustfmt::skip]
	#[test]
	fn test_expand_then_parse() {
		let cases: &[(&str, &[(&str, &str)])] = &[
			("foo bar bar",                 &[]),
			("`arg`",                       &[("arg", "4711")]),
			("with `arg` carriage return",  &[("arg", "hide \r this")]),
			("with `arg` new line",         &[("arg", "break \n this")]),
			("with `arg` zero byte",        &[("arg", "Zero \0 byte")]),
			("with `arg` backtick",         &[("arg", "`quoted`")]),
			("``literal`` and `a` `b`",     &[("a", "x"), ("b", "")]),
		];
		for &(source, args) in cases {
			let_assert!(Ok(message) = expand(source, &with_default(args, Value::Str("<?>"))));
			let_assert!(Ok((parsed, template)) = parse_template(&message));
			check!(template == source);
			check!(parsed.len() == args.len());
			for &(name, value) in args {
				check!(parsed[name] == [ArgValue::Value(value.into())], "{name}");
			}
		}
	}

	#[test]
	fn test_expand_errors_then_parse() {
		let_assert!(Err(ExpandError::Unresolved(e)) = expand("`argok` but `notok`", &[("argok", 4711)]));
		let_assert!(Ok((parsed, template)) = parse_template(e.message()));
		check!(template == "`argok` but `notok`");
		check!(parsed["argok"] == [ArgValue::Value("4711".into())]);
		check!(parsed["notok"] == [ArgValue::Error("missing argument 1 'notok'".into())]);
	}
}
