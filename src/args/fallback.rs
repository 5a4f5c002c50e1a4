use super::{Constant, Resolve};
use crate::error::ResolveError;
use crate::{ArgWriter, ToValue};

/// [`Resolve`] implementation produced by [`fallback()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fallback<Base, Fb> {
	base: Base,
	fallback: Fb,
}

impl<Base, Fb> Resolve for Fallback<Base, Fb>
where
	Base: Resolve,
	Fb: Resolve,
{
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		let mark = out.mark();
		match self.base.resolve(out, index, name) {
			Err(ResolveError::Missing(_)) => {
				out.rewind(mark);
				self.fallback.resolve(out, index, name)
			},
			result => result,
		}
	}
}

/// Creates a resolver that will first try to resolve arguments with `base`,
/// and then attempt to resolve missing arguments with `fallback`.
///
/// Only missing arguments are passed on to `fallback`,
/// any other error of `base` is reported as-is.
///
/// # Example
/// ```rust
/// # use sllm::fallback;
/// let user = [("first_name", "John"), ("last_name", "Doe")];
/// let with_fallback = fallback(user, [("middle_name", "<unknown>")]);
///
/// let message = sllm::expand("`first_name` `middle_name` `last_name`", &with_fallback);
/// assert_eq!(message.unwrap(), "`first_name:John` `middle_name:<unknown>` `last_name:Doe`");
/// ```
pub const fn fallback<Base, Fb>(base: Base, fallback: Fb) -> Fallback<Base, Fb> {
	Fallback { base, fallback }
}

/// Creates a resolver that writes `default` for every argument that `base` does not have.
///
/// # Example
/// ```rust
/// # use std::collections::HashMap;
/// let mut args = HashMap::new();
/// args.insert("count", 7);
///
/// let message = sllm::expand("`count` x `item`", &sllm::with_default(&args, "<?>"));
/// assert_eq!(message.unwrap(), "`count:7` x `item:<?>`");
/// ```
pub const fn with_default<Base, V>(base: Base, default: V) -> Fallback<Base, Constant<V>>
where
	V: ToValue,
{
	fallback(base, super::constant(default))
}
