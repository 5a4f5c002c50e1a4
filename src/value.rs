use std::borrow::Cow;

use crate::ArgWriter;

/// A type that knows how to write itself as the value of an argument.
///
/// Everything written to the [`ArgWriter`] is escaped,
/// so implementations do not need to care about delimiters.
///
/// # Example
/// ```
/// # use sllm::{Appender, ArgWriter, Value};
/// struct Celsius(f64);
///
/// impl Appender for Celsius {
///     fn append_sllm(&self, out: &mut ArgWriter<'_>) -> std::fmt::Result {
///         use std::fmt::Write;
///         write!(out, "{:.1}°C", self.0)
///     }
/// }
///
/// let temperature = Celsius(21.55);
/// let message = sllm::expand("it is `temp`", &sllm::positional(&[Value::Custom(&temperature)]));
/// assert_eq!(message.unwrap(), "it is `temp:21.6°C`");
/// ```
pub trait Appender {
	/// Write the value to `out`.
	fn append_sllm(&self, out: &mut ArgWriter<'_>) -> std::fmt::Result;
}

/// The value of an argument.
///
/// This is the closed set of value kinds the expander knows how to write.
/// Use [`Value::Custom`] for types that control their own textual form,
/// and [`Value::Display`] for anything else that implements [`std::fmt::Display`].
#[derive(Clone, Copy)]
pub enum Value<'a> {
	/// A string, written as-is.
	Str(&'a str),

	/// A signed integer, written in decimal.
	Int(i64),

	/// An unsigned integer, written in decimal.
	Uint(u64),

	/// A boolean, written as `true` or `false`.
	Bool(bool),

	/// A single precision float, written as the shortest decimal that round-trips.
	F32(f32),

	/// A double precision float, written as the shortest decimal that round-trips.
	F64(f64),

	/// A single character.
	Char(char),

	/// A value that writes itself.
	Custom(&'a dyn Appender),

	/// Any value that implements [`std::fmt::Display`].
	Display(&'a dyn std::fmt::Display),
}

impl Value<'_> {
	/// Write the value to an argument writer.
	pub fn append_to(&self, out: &mut ArgWriter<'_>) -> std::fmt::Result {
		use std::fmt::Write;
		match *self {
			Self::Str(value) => {
				out.write_str(value);
				Ok(())
			},
			Self::Int(value) => write!(out, "{}", value),
			Self::Uint(value) => write!(out, "{}", value),
			Self::Bool(value) => {
				out.write_str(if value { "true" } else { "false" });
				Ok(())
			},
			Self::F32(value) => write!(out, "{}", value),
			Self::F64(value) => write!(out, "{}", value),
			Self::Char(value) => {
				out.write_char(value);
				Ok(())
			},
			Self::Custom(value) => value.append_sllm(out),
			Self::Display(value) => write!(out, "{}", value),
		}
	}
}

impl std::fmt::Debug for Value<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Str(value) => f.debug_tuple("Str").field(value).finish(),
			Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
			Self::Uint(value) => f.debug_tuple("Uint").field(value).finish(),
			Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
			Self::F32(value) => f.debug_tuple("F32").field(value).finish(),
			Self::F64(value) => f.debug_tuple("F64").field(value).finish(),
			Self::Char(value) => f.debug_tuple("Char").field(value).finish(),
			Self::Custom(_) => f.write_str("Custom(..)"),
			Self::Display(value) => f.debug_tuple("Display").field(&format_args!("{}", value)).finish(),
		}
	}
}

/// Conversion into a [`Value`].
///
/// Implemented for strings, primitive numbers, booleans, characters and [`Value`] itself.
/// Resolvers that look up arguments in slices or maps require their values to implement this trait.
pub trait ToValue {
	/// Get the value to write for `self`.
	fn to_value(&self) -> Value<'_>;
}

impl ToValue for Value<'_> {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		*self
	}
}

impl<T: ToValue + ?Sized> ToValue for &'_ T {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		T::to_value(self)
	}
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		T::to_value(self)
	}
}

impl ToValue for str {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		Value::Str(self)
	}
}

impl ToValue for String {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		Value::Str(self)
	}
}

impl ToValue for Cow<'_, str> {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		Value::Str(self)
	}
}

impl ToValue for bool {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		Value::Bool(*self)
	}
}

impl ToValue for char {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		Value::Char(*self)
	}
}

impl ToValue for f32 {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		Value::F32(*self)
	}
}

impl ToValue for f64 {
	#[inline]
	fn to_value(&self) -> Value<'_> {
		Value::F64(*self)
	}
}

macro_rules! impl_to_value {
	($variant:ident as $target:ty: $($source:ty),*) => {
		$(
			impl ToValue for $source {
				#[inline]
				fn to_value(&self) -> Value<'_> {
					Value::$variant(*self as $target)
				}
			}

			impl<'a> From<$source> for Value<'a> {
				#[inline]
				fn from(other: $source) -> Self {
					Value::$variant(other as $target)
				}
			}
		)*
	};
}

impl_to_value!(Int as i64: i8, i16, i32, i64, isize);
impl_to_value!(Uint as u64: u8, u16, u32, u64, usize);

impl<'a> From<&'a str> for Value<'a> {
	#[inline]
	fn from(other: &'a str) -> Self {
		Self::Str(other)
	}
}

impl<'a> From<&'a String> for Value<'a> {
	#[inline]
	fn from(other: &'a String) -> Self {
		Self::Str(other)
	}
}

impl From<bool> for Value<'_> {
	#[inline]
	fn from(other: bool) -> Self {
		Self::Bool(other)
	}
}

impl From<char> for Value<'_> {
	#[inline]
	fn from(other: char) -> Self {
		Self::Char(other)
	}
}

impl From<f32> for Value<'_> {
	#[inline]
	fn from(other: f32) -> Self {
		Self::F32(other)
	}
}

impl From<f64> for Value<'_> {
	#[inline]
	fn from(other: f64) -> Self {
		Self::F64(other)
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::assert;

	fn render(value: Value<'_>) -> String {
		let mut out = String::new();
		value.append_to(&mut ArgWriter::new(&mut out)).unwrap();
		out
	}

	struct Shout(&'static str);

	impl Appender for Shout {
		fn append_sllm(&self, out: &mut ArgWriter<'_>) -> std::fmt::Result {
			out.write_str(&self.0.to_uppercase());
			out.write_char('!');
			Ok(())
		}
	}

	#[test]
	fn test_value_kinds() {
		assert!(render(Value::Str("John Doe")) == "John Doe");
		assert!(render(Value::from(-7i32)) == "-7");
		assert!(render(Value::from(4711u16)) == "4711");
		assert!(render(Value::from(u64::MAX)) == "18446744073709551615");
		assert!(render(Value::Bool(true)) == "true");
		assert!(render(Value::Bool(false)) == "false");
		assert!(render(Value::F64(0.1)) == "0.1");
		assert!(render(Value::F64(1e21)) == "1000000000000000000000");
		assert!(render(Value::F32(0.3)) == "0.3");
		assert!(render(Value::F64(2.0)) == "2");
		assert!(render(Value::Char('x')) == "x");
		assert!(render(Value::Custom(&Shout("hat"))) == "HAT!");
		assert!(render(Value::Display(&std::net::Ipv4Addr::LOCALHOST)) == "127.0.0.1");
	}

	#[test]
	fn test_values_are_escaped() {
		assert!(render(Value::Str("`hat`")) == "``hat``");
		assert!(render(Value::Char('`')) == "``");
		assert!(render(Value::Custom(&Shout("a`b"))) == "A``B!");
		assert!(render(Value::Display(&"x`y")) == "x``y");
	}

	#[test]
	fn test_to_value() {
		assert!(render("str".to_value()) == "str");
		assert!(render(String::from("string").to_value()) == "string");
		assert!(render(Cow::Borrowed("cow").to_value()) == "cow");
		assert!(render((&&42u8).to_value()) == "42");
		assert!(render(Box::new(false).to_value()) == "false");
		assert!(render(Value::Int(-1).to_value()) == "-1");
	}
}
