use super::{Constant, Fallback, Resolve};
use crate::error::{MissingArgument, ResolveError};
use crate::{ArgWriter, ToValue};

/// [`Resolve`] implementation produced by [`positional()`].
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Positional<'a, V> {
	args: &'a [V],
}

impl<V> Clone for Positional<'_, V> {
	#[inline]
	fn clone(&self) -> Self {
		*self
	}
}

impl<V> Copy for Positional<'_, V> {}

impl<'a, V: ToValue> Positional<'a, V> {
	/// Write `default` for every argument with an index beyond the end of the list.
	pub const fn with_default<D: ToValue>(self, default: D) -> Fallback<Self, Constant<D>> {
		super::with_default(self, default)
	}
}

impl<V: ToValue> Resolve for Positional<'_, V> {
	#[inline]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		let value = self.args.get(index).ok_or_else(|| MissingArgument::new(index, name))?;
		out.write_value(value)?;
		Ok(())
	}
}

/// Creates a resolver that looks up arguments by index in a list of values.
///
/// Arguments without an explicit index in the template take the values in order.
/// Use [`Value`][crate::Value] to mix different kinds of values in one list.
///
/// # Example
/// ```rust
/// # use sllm::{positional, Value};
/// let args = [Value::Int(4711), Value::Bool(true)];
/// let message = sllm::expand("`one` and `two`, again `again:0`", &positional(&args));
/// assert_eq!(message.unwrap(), "`one:4711` and `two:true`, again `again:4711`");
/// ```
pub const fn positional<V: ToValue>(args: &[V]) -> Positional<'_, V> {
	Positional { args }
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use assert2::{assert, check, let_assert};

	use super::*;
	use crate::error::ExpandError;
	use crate::{expand, from_fn, fallback, constant, Value};

	#[test]
	fn test_positional() {
		check!(let Ok("`a:x`, `b:y`") = expand("`a`, `b`", &positional(&["x", "y"])).as_deref());
		check!(let Ok("`b:y`, `a:x`") = expand("`b:1`, `a:0`", &positional(&["x", "y"])).as_deref());
	}

	#[test]
	fn test_positional_default() {
		let args = [Value::Int(4711), Value::Bool(true)];
		check!(
			let Ok("touching args: `one:4711` `two:true` `three:–`")
			= expand("touching args: `one` `two` `three`", &positional(&args).with_default("–")).as_deref()
		);
	}

	#[test]
	fn test_missing_positional() {
		let_assert!(Err(ExpandError::Unresolved(e)) = expand("`argok` but `notok`", &positional(&[4711])));
		assert!(e.message() == "`argok:4711` but `notok!(missing argument 1 'notok')`");
	}

	#[test]
	fn test_fallback_only_for_missing() {
		let failing = from_fn(|out, _, _| {
			out.write_str("partial");
			Err(ResolveError::custom("broken `value`"))
		});
		let_assert!(Err(ExpandError::Unresolved(e)) = expand("`a`", &fallback(failing, constant("default"))));
		assert!(e.message() == "`a!(broken ``value``)`");
	}

	#[test]
	fn test_fallback_discards_partial_output() {
		let missing = from_fn(|out, index, name| {
			out.write_str("partial");
			Err(MissingArgument::new(index, name).into())
		});
		check!(let Ok("`a:default`") = expand("`a`", &fallback(missing, constant("default"))).as_deref());
	}
}
