use super::Resolve;
use crate::error::ResolveError;
use crate::{ArgWriter, ToValue};

/// [`Resolve`] implementation produced by [`constant()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Constant<V> {
	value: V,
}

impl<V: ToValue> Resolve for Constant<V> {
	#[inline]
	fn resolve(&self, out: &mut ArgWriter<'_>, _index: usize, _name: &str) -> Result<(), ResolveError> {
		out.write_value(&self.value)?;
		Ok(())
	}
}

/// Creates a resolver that writes the same value for every argument.
///
/// This can be used to anonymize messages, or as default value with [`fallback()`][super::fallback()].
///
/// # Example
/// ```rust
/// let message = sllm::expand("`user` bought `item`", &sllm::constant("***"));
/// assert_eq!(message.unwrap(), "`user:***` bought `item:***`");
/// ```
///
/// To anonymize only some arguments, put fixed values in front of the real arguments with [`fallback()`][super::fallback()]:
/// ```rust
/// # use sllm::{fallback, positional, Value};
/// let args = [Value::Str("John Doe"), Value::Str("Hat")];
/// let anonymized = fallback([("user", "***")], positional(&args));
/// let message = sllm::expand("`user` bought `item`", &anonymized);
/// assert_eq!(message.unwrap(), "`user:***` bought `item:Hat`");
/// ```
pub const fn constant<V: ToValue>(value: V) -> Constant<V> {
	Constant { value }
}
