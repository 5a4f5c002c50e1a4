use super::Resolve;
use crate::error::ResolveError;
use crate::ArgWriter;

/// [`Resolve`] implementation produced by [`from_fn()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FnArgs<F> {
	func: F,
}

impl<F> Resolve for FnArgs<F>
where
	F: Fn(&mut ArgWriter<'_>, usize, &str) -> Result<(), ResolveError>,
{
	#[inline(always)]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		(self.func)(out, index, name)
	}
}

/// Creates a resolver that delegates to the given function.
///
/// The function receives the writer for the value, the index and the name of the argument.
///
/// # Example
/// ```rust
/// # use std::fmt::Write;
/// let args = sllm::from_fn(|out, index, name| {
///     write!(out, "#{}/'{}'", index, name)?;
///     Ok(())
/// });
///
/// let message = sllm::expand("want `arg1` here and `arg2` here", &args);
/// assert_eq!(message.unwrap(), "want `arg1:#0/'arg1'` here and `arg2:#1/'arg2'` here");
/// ```
pub const fn from_fn<F>(func: F) -> FnArgs<F>
where
	F: Fn(&mut ArgWriter<'_>, usize, &str) -> Result<(), ResolveError>,
{
	FnArgs { func }
}
