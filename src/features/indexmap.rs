use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::error::{MissingArgument, ParseError, ResolveError};
use crate::{ArgValue, ArgWriter, Resolve, ToValue};

impl<V: ToValue, S: BuildHasher> Resolve for IndexMap<&str, V, S> {
	#[inline]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		let value = self.get(name).ok_or_else(|| MissingArgument::new(index, name))?;
		out.write_value(value)?;
		Ok(())
	}
}

impl<V: ToValue, S: BuildHasher> Resolve for IndexMap<String, V, S> {
	#[inline]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		let value = self.get(name).ok_or_else(|| MissingArgument::new(index, name))?;
		out.write_value(value)?;
		Ok(())
	}
}

/// Parse an expanded message into a map of all arguments, in order of first appearance.
///
/// Like [`parse_map()`][crate::parse_map], but the map iterates over the names
/// in the order they first occur in the message.
pub fn parse_index_map<'m>(message: &'m str, template: Option<&mut String>) -> Result<IndexMap<&'m str, Vec<ArgValue<'m>>>, ParseError> {
	let mut args: IndexMap<&str, Vec<ArgValue>> = IndexMap::new();
	crate::parse(message, template, |name, value, is_error| {
		let value = if is_error {
			ArgValue::Error(value)
		} else {
			ArgValue::Value(value)
		};
		args.entry(name).or_default().push(value);
		Ok::<_, std::convert::Infallible>(())
	})?;
	Ok(args)
}
