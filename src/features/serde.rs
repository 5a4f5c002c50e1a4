use std::marker::PhantomData;

use serde::{
	de::{Error, Visitor},
	Deserialize,
	Deserializer,
	Serialize,
	Serializer,
};

use crate::{ArgValue, Template, TemplateBuf};

struct TemplateVisitor<'de> {
	_lifetime: PhantomData<&'de ()>,
}

impl<'de> TemplateVisitor<'de> {
	const fn new() -> Self {
		Self { _lifetime: PhantomData }
	}
}

impl<'de> Visitor<'de> for TemplateVisitor<'de> {
	type Value = Template<'de>;

	fn visit_borrowed_str<E>(self, v: &'de str) -> Result<Self::Value, E>
	where
		E: Error,
	{
		Template::from_str(v).map_err(E::custom)
	}

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("a borrowed template string")
	}
}

struct TemplateBufVisitor;

impl<'de> Visitor<'de> for TemplateBufVisitor {
	type Value = TemplateBuf;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("a template string")
	}

	fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
	where
		E: Error,
	{
		self.visit_string(v.to_owned())
	}

	fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
	where
		E: Error,
	{
		TemplateBuf::from_string(v).map_err(E::custom)
	}
}

impl Serialize for Template<'_> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.source())
	}
}

impl Serialize for TemplateBuf {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.source())
	}
}

/// Argument values serialize as their text, errors and values alike.
impl Serialize for ArgValue<'_> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for Template<'de> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_str(TemplateVisitor::new())
	}
}

impl<'de> Deserialize<'de> for TemplateBuf {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_string(TemplateBufVisitor)
	}
}

#[cfg(test)]
mod test {
	use serde_test::{assert_de_tokens_error, assert_ser_tokens, assert_tokens, Token};

	use crate::{ArgValue, Template, TemplateBuf};

	const SOURCE: &str = "added `count` x `item:0`";

	#[test]
	fn template_ser_de() {
		let template = Template::from_str(SOURCE).unwrap();

		assert_tokens(&template, &[Token::BorrowedStr(SOURCE)]);
	}

	#[test]
	fn template_buf_ser_de() {
		let template = TemplateBuf::from_string(SOURCE.to_string()).unwrap();

		assert_tokens(&template, &[Token::String(SOURCE)]);
	}

	#[test]
	fn invalid_template_is_rejected() {
		assert_de_tokens_error::<TemplateBuf>(
			&[Token::Str("broken `arg:`")],
			"syntax error in `tmpl:broken ``arg:```:`pos:12`:`desc:empty explicit index`",
		);
	}

	#[test]
	fn arg_value_ser() {
		assert_ser_tokens(&ArgValue::Value("7".into()), &[Token::Str("7")]);
		assert_ser_tokens(&ArgValue::Error("gone".into()), &[Token::Str("gone")]);
	}
}
