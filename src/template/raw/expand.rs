use super::{Part, Placeholder, Scanner, Template};
use crate::error::{ExpandError, FailedArgument, UnresolvedArguments};
use crate::grammar::{DELIMITER, ERROR_MARKER, NAME_SEPARATOR};
use crate::{ArgWriter, Resolve};

/// Collects the failed arguments of one expansion.
pub struct Failures {
	/// The length of the output when expansion started.
	output_start: usize,
	failures: Vec<FailedArgument>,
}

impl Failures {
	pub fn new(output: &str) -> Self {
		Self {
			output_start: output.len(),
			failures: Vec::new(),
		}
	}

	/// Turn the collected failures into the result of the expansion.
	pub fn finish(self, output: &str) -> Result<(), ExpandError> {
		if self.failures.is_empty() {
			return Ok(());
		}
		Err(UnresolvedArguments {
			message: output[self.output_start..].to_owned(),
			failures: self.failures,
		}
		.into())
	}
}

impl Template {
	/// Expand the template into the output string.
	pub fn expand<R>(&self, output: &mut String, source: &str, args: &R) -> Result<(), ExpandError>
	where
		R: Resolve + ?Sized,
	{
		let mut failures = Failures::new(output);
		for part in &self.parts {
			expand_part(output, source, part, args, &mut failures);
		}
		failures.finish(output)
	}
}

/// Scan and expand a template in a single pass.
///
/// Output produced before a syntax error is found stays in `output`.
pub fn expand_source<R>(output: &mut String, source: &str, args: &R) -> Result<(), ExpandError>
where
	R: Resolve + ?Sized,
{
	let mut failures = Failures::new(output);
	for part in Scanner::new(source) {
		let part = part?;
		expand_part(output, source, &part, args, &mut failures);
	}
	failures.finish(output)
}

fn expand_part<R>(output: &mut String, source: &str, part: &Part, args: &R, failures: &mut Failures)
where
	R: Resolve + ?Sized,
{
	match part {
		Part::Literal(range) => output.push_str(&source[range.clone()]),
		Part::Placeholder(x) => expand_placeholder(output, source, x, args, failures),
	}
}

/// Write one argument as `` `name:value` `` or `` `name!(error)` ``.
fn expand_placeholder<R>(output: &mut String, source: &str, placeholder: &Placeholder, args: &R, failures: &mut Failures)
where
	R: Resolve + ?Sized,
{
	let name = &source[placeholder.name.clone()];
	output.push(DELIMITER);
	output.push_str(name);
	output.push(NAME_SEPARATOR);

	let value_start = output.len();
	if let Err(error) = args.resolve(&mut ArgWriter::new(output), placeholder.index, name) {
		// Replace the separator with the error marker and write the error instead of the value.
		output.truncate(value_start - 1);
		output.push(ERROR_MARKER);
		output.push('(');
		crate::grammar::escape_into(output, &error.to_string());
		output.push(')');
		failures.failures.push(FailedArgument {
			position: placeholder.start,
			index: placeholder.index,
			name: name.to_owned(),
			error,
		});
	}
	output.push(DELIMITER);
}
