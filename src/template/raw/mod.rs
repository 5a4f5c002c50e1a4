mod expand;
mod parse;

pub use expand::expand_source;
pub use parse::Scanner;

/// Scanned template without its source string.
///
/// Parts refer to the source by byte range, so the same source must be passed when expanding.
#[derive(Clone)]
pub struct Template {
	/// The individual parts that make up the template.
	parts: Vec<Part>,
}

/// One piece of a scanned template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Part {
	/// Literal text, copied to the output as-is.
	///
	/// Literals may contain doubled delimiters, which are copied in doubled form.
	Literal(std::ops::Range<usize>),

	/// An argument to be resolved at expansion time.
	Placeholder(Placeholder),
}

/// An argument to be resolved at expansion time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
	/// The byte offset of the opening delimiter.
	pub start: usize,

	/// The range in the source holding the name of the argument.
	pub name: std::ops::Range<usize>,

	/// The index passed to the resolver.
	///
	/// Either the explicit index from the template, or the next automatic index.
	pub index: usize,
}

impl Template {
	/// Scan the whole template at once.
	pub fn parse(source: &str) -> Result<Self, crate::error::SyntaxError> {
		let parts = Scanner::new(source).collect::<Result<Vec<_>, _>>()?;
		Ok(Self { parts })
	}

	/// Get the names of all arguments, in template order.
	pub fn names<'s>(&self, source: &'s str) -> Vec<&'s str> {
		self.parts.iter()
			.filter_map(|part| match part {
				Part::Literal(_) => None,
				Part::Placeholder(x) => Some(&source[x.name.clone()]),
			})
			.collect()
	}
}
