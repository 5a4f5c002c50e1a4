//! Argument resolvers and related utilities for template expansion.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::error::{MissingArgument, ResolveError};
use crate::{ArgWriter, ToValue};

mod constant;
pub use constant::*;

mod fallback;
pub use fallback::*;

mod fn_args;
pub use fn_args::*;

mod positional;
pub use positional::*;

/// Trait for types that can provide the values of template arguments.
///
/// The expander calls [`resolve()`][Self::resolve] once for every argument in the template,
/// from left to right.
/// The `index` is the explicit index of the argument if the template has one,
/// or its position among the arguments without explicit index otherwise.
///
/// Name-keyed maps ([`HashMap`], [`BTreeMap`], key-value slices) resolve arguments by name,
/// [`Positional`] resolves them by index.
pub trait Resolve {
	/// Write the value of the argument with the given index and name.
	///
	/// Everything written to `out` is escaped.
	/// If an error is returned, whatever was written is discarded
	/// and the argument is written as an inline error token.
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError>;
}

/// Write a value found by a lookup, or report the argument as missing.
#[inline]
fn write_found<V>(out: &mut ArgWriter<'_>, value: Option<&V>, index: usize, name: &str) -> Result<(), ResolveError>
where
	V: ToValue + ?Sized,
{
	let value = value.ok_or_else(|| MissingArgument::new(index, name))?;
	out.write_value(value)?;
	Ok(())
}

/// Allow using key-value [`slice`]s as name-keyed arguments.
///
/// # Performance
///
/// For a few key-value pairs, where the keys and values are small,
/// this is should be reasonably performant.
///
/// However, for many numbers of key-value pairs, or when the keys or values are large,
/// you may get better performance from a [`HashMap`] or [`BTreeMap`].
///
/// # Example
/// ```rust
/// let user = [("name", "John Doe"), ("role", "admin")];
/// let message = sllm::expand("`name` logged in as `role`", &user[..]);
/// assert_eq!(message.unwrap(), "`name:John Doe` logged in as `role:admin`");
/// ```
impl<K, V> Resolve for [(K, V)]
where
	K: Borrow<str>,
	V: ToValue,
{
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		let value = self.iter().find_map(|(k, v)| (k.borrow() == name).then_some(v));
		write_found(out, value, index, name)
	}
}

/// Allow using key-value [`arrays`](`array`) as name-keyed arguments.
///
/// Delegate to [impl](#impl-Resolve-for-[(K,+V)]) of [`Resolve`] for [`slices`](`slice`).
///
/// # Example
/// ```rust
/// let message = sllm::expand("added `count` x `item`", &[("count", 7), ("item", 1)]);
/// assert_eq!(message.unwrap(), "added `count:7` x `item:1`");
/// ```
impl<K, V, const N: usize> Resolve for [(K, V); N]
where
	K: Borrow<str>,
	V: ToValue,
{
	#[inline(always)]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		Resolve::resolve(self.as_slice(), out, index, name)
	}
}

/// Allow using key-value [`Vec`]s as name-keyed arguments.
///
/// Delegate to [impl](#impl-Resolve-for-[(K,+V)]) of [`Resolve`] for [`slices`](`slice`).
impl<K, V> Resolve for Vec<(K, V)>
where
	K: Borrow<str>,
	V: ToValue,
{
	#[inline(always)]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		Resolve::resolve(self.as_slice(), out, index, name)
	}
}

impl<T> Resolve for &'_ T
where
	T: ?Sized + Resolve,
{
	#[inline(always)]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		T::resolve(self, out, index, name)
	}
}

impl<T> Resolve for &'_ mut T
where
	T: ?Sized + Resolve,
{
	#[inline(always)]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		T::resolve(self, out, index, name)
	}
}

impl<T> Resolve for std::boxed::Box<T>
where
	T: ?Sized + Resolve,
{
	#[inline(always)]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		T::resolve(self, out, index, name)
	}
}

impl<T> Resolve for std::rc::Rc<T>
where
	T: ?Sized + Resolve,
{
	#[inline(always)]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		T::resolve(self, out, index, name)
	}
}

impl<T> Resolve for std::sync::Arc<T>
where
	T: ?Sized + Resolve,
{
	#[inline(always)]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		T::resolve(self, out, index, name)
	}
}

/// A resolver that has no arguments at all.
///
/// Every argument expands to an inline "missing argument" error.
#[derive(Debug)]
pub struct NoArguments;

impl Resolve for NoArguments {
	#[inline]
	fn resolve(&self, _out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		Err(MissingArgument::new(index, name).into())
	}
}

impl<V: ToValue, S: BuildHasher> Resolve for HashMap<&str, V, S> {
	#[inline]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		write_found(out, self.get(name), index, name)
	}
}

impl<V: ToValue, S: BuildHasher> Resolve for HashMap<String, V, S> {
	#[inline]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		write_found(out, self.get(name), index, name)
	}
}

impl<V: ToValue> Resolve for BTreeMap<&str, V> {
	#[inline]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		write_found(out, self.get(name), index, name)
	}
}

impl<V: ToValue> Resolve for BTreeMap<String, V> {
	#[inline]
	fn resolve(&self, out: &mut ArgWriter<'_>, index: usize, name: &str) -> Result<(), ResolveError> {
		write_found(out, self.get(name), index, name)
	}
}
