//! Conversion of parsed messages into JSON data.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::ArgValue;

/// Convert a message into a JSON object with its template, argument values and inline errors.
///
/// Arguments that occur once map to a string, arguments that occur more than once map to an array of strings.
/// Both `args` and `errors` are always present, possibly empty.
///
/// # Example
/// ```
/// let value = sllm::json::to_value("`user:John` bought `item:Hat` and `item:Scarf`, `price!(unknown)`").unwrap();
/// assert_eq!(value, serde_json::json!({
///     "template": "`user` bought `item` and `item`, `price`",
///     "args": { "user": "John", "item": ["Hat", "Scarf"] },
///     "errors": { "price": "unknown" },
/// }));
/// ```
pub fn to_value(message: &str) -> Result<Value, Error> {
	let mut template = String::new();
	let parsed = crate::parse_map(message, Some(&mut template))?;

	let mut args = Map::new();
	let mut errors = Map::new();
	for (name, values) in parsed {
		let (failed, values): (Vec<_>, Vec<_>) = values.into_iter().partition(ArgValue::is_error);
		insert_values(&mut args, name, values);
		insert_values(&mut errors, name, failed);
	}

	let mut object = Map::new();
	object.insert("template".into(), Value::String(template));
	object.insert("args".into(), Value::Object(args));
	object.insert("errors".into(), Value::Object(errors));
	Ok(Value::Object(object))
}

/// Parse a struct from the argument values of a message.
///
/// The arguments are collected into a JSON object like the `args` of [`to_value()`],
/// which is then deserialized into `T`.
/// All values are strings, so the fields of `T` must accept strings.
/// Inline errors are ignored.
pub fn from_message<T: DeserializeOwned>(message: &str) -> Result<T, Error> {
	let parsed = crate::parse_map(message, None)?;
	let mut args = Map::new();
	for (name, values) in parsed {
		let values = values.into_iter().filter(|x| !x.is_error()).collect();
		insert_values(&mut args, name, values);
	}
	Ok(T::deserialize(Value::Object(args))?)
}

fn insert_values(map: &mut Map<String, Value>, name: &str, values: Vec<ArgValue<'_>>) {
	let mut values: Vec<Value> = values.into_iter()
		.map(|x| Value::String(x.as_str().to_owned()))
		.collect();
	match values.len() {
		0 => (),
		1 => {
			map.insert(name.into(), values.remove(0));
		},
		_ => {
			map.insert(name.into(), Value::Array(values));
		},
	}
}

/// Error for converting a message into JSON data.
#[derive(Debug)]
pub enum Error {
	/// The message could not be parsed.
	Parse(ParseError),

	/// The JSON value could not be converted into the requested type.
	Json(serde_json::Error),
}

impl From<ParseError> for Error {
	#[inline]
	fn from(other: ParseError) -> Self {
		Self::Parse(other)
	}
}

impl From<serde_json::Error> for Error {
	#[inline]
	fn from(other: serde_json::Error) -> Self {
		Self::Json(other)
	}
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
	#[inline]
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Parse(e) => std::fmt::Display::fmt(e, f),
			Self::Json(e) => std::fmt::Display::fmt(e, f),
		}
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::{assert, let_assert};
	use serde_json::json;

	#[test]
	fn test_to_value() {
		let_assert!(Ok(value) = to_value("added `count:7` x `item:``Hat``` by `user!(missing argument 2 'user')`"));
		assert!(value == json!({
			"template": "added `count` x `item` by `user`",
			"args": { "count": "7", "item": "`Hat`" },
			"errors": { "user": "missing argument 2 'user'" },
		}));
	}

	#[test]
	fn test_to_value_without_arguments() {
		let_assert!(Ok(value) = to_value("just text"));
		assert!(value == json!({ "template": "just text", "args": {}, "errors": {} }));
	}

	#[test]
	fn test_to_value_parse_error() {
		let_assert!(Err(Error::Parse(e)) = to_value("broken `arg"));
		assert!(e.to_string() == "unterminated arg name 'arg'");
	}

	#[test]
	fn test_from_message() {
		#[derive(Debug, serde::Deserialize)]
		struct Purchase {
			user: String,
			#[serde(default)]
			items: Vec<String>,
			price: Option<String>,
		}

		let_assert!(Ok(parsed) = from_message("`user:John Doe` bought `items:Hat` and `items:Scarf` for `price!(unknown)`"));
		let parsed: Purchase = parsed;
		assert!(parsed.user == "John Doe");
		assert!(parsed.items == ["Hat", "Scarf"]);
		assert!(parsed.price == None);
	}

	#[test]
	fn test_from_message_type_error() {
		#[derive(Debug, serde::Deserialize)]
		#[allow(dead_code)]
		struct Count {
			count: String,
		}

		let_assert!(Err(Error::Json(_)) = from_message::<Count>("no count here"));
	}
}
