//! Inspect log files written with sllm messages.
//!
//! # Usage
//!
//! ```bash
//! # List the argument names used in a log file
//! sllm names service.log
//!
//! # Show only lines that mention a user or a session
//! sllm filter --name user,session service.log
//!
//! # Convert messages to JSON lines
//! tail -f service.log | sllm json
//! ```

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sllm")]
#[command(version)]
#[command(about = "List, filter and convert structured log messages")]
struct Cli {
	#[command(subcommand)]
	command: Command,

	/// Fail on lines that are not valid messages, instead of skipping them
	#[arg(long, global = true)]
	strict: bool,
}

#[derive(Subcommand)]
enum Command {
	/// List the distinct argument names per input
	Names {
		/// Input files (reads stdin if not provided)
		files: Vec<PathBuf>,
	},

	/// Print only lines with at least one of the given argument names
	Filter {
		/// Argument names, separated by commas
		#[arg(long, short, value_delimiter = ',', required = true)]
		name: Vec<String>,

		/// Input files (reads stdin if not provided)
		files: Vec<PathBuf>,
	},

	/// Print every message as a JSON object on its own line
	Json {
		/// Input files (reads stdin if not provided)
		files: Vec<PathBuf>,
	},
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
	let cli = Cli::parse();
	let strict = cli.strict;

	let stdout = io::stdout();
	let mut out = stdout.lock();
	match &cli.command {
		Command::Names { files } => for_each_input(files, |source, input| {
			list_names(source, input, &mut out, strict)
		})?,
		Command::Filter { name, files } => {
			let names: BTreeSet<&str> = name.iter().map(String::as_str).collect();
			for_each_input(files, |source, input| {
				let shown = filter_lines(source, input, &mut out, &names, strict)?;
				log::debug!("{}: {} matching lines", source, shown);
				Ok(())
			})?
		},
		Command::Json { files } => for_each_input(files, |source, input| {
			json_lines(source, input, &mut out, strict)
		})?,
	}
	out.flush()?;
	Ok(())
}

/// Run `fun` for every input file, or for stdin if there are no files.
fn for_each_input<F>(files: &[PathBuf], mut fun: F) -> Result<()>
where
	F: FnMut(&str, &mut dyn BufRead) -> Result<()>,
{
	if files.is_empty() {
		let stdin = io::stdin();
		return fun("<stdin>", &mut stdin.lock());
	}
	for path in files {
		let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
		fun(&path.display().to_string(), &mut BufReader::new(file))?;
	}
	Ok(())
}

/// Report a line that is not a valid message.
fn invalid_line(source: &str, line_number: usize, error: sllm::ParseError, strict: bool) -> Result<()> {
	if strict {
		return Err(anyhow::Error::new(error).context(format!("{}:{}: invalid message", source, line_number)));
	}
	log::warn!("{}:{}: skipping invalid message: {}", source, line_number, error);
	Ok(())
}

/// Call `fun` for every line of the input, with its 1-based line number.
fn for_each_line<F>(source: &str, input: &mut dyn BufRead, mut fun: F) -> Result<()>
where
	F: FnMut(usize, &str) -> Result<()>,
{
	for (i, line) in input.lines().enumerate() {
		let line = line.with_context(|| format!("{}: failed to read line {}", source, i + 1))?;
		fun(i + 1, &line)?;
	}
	Ok(())
}

fn list_names(source: &str, input: &mut dyn BufRead, out: &mut dyn Write, strict: bool) -> Result<()> {
	let mut names = BTreeSet::new();
	for_each_line(source, input, |line_number, line| {
		let mut found = Vec::new();
		match sllm::parse(line, None, |name, _, _| {
			found.push(name.to_owned());
			Ok::<_, std::convert::Infallible>(())
		}) {
			Ok(()) => names.extend(found),
			Err(e) => invalid_line(source, line_number, e, strict)?,
		}
		Ok(())
	})?;
	log::debug!("{}: {} distinct argument names", source, names.len());
	for name in &names {
		writeln!(out, "{}: '{}'", source, name)?;
	}
	Ok(())
}

fn filter_lines(source: &str, input: &mut dyn BufRead, out: &mut dyn Write, names: &BTreeSet<&str>, strict: bool) -> Result<usize> {
	let mut shown = 0;
	for_each_line(source, input, |line_number, line| {
		let mut matches = false;
		let parsed = sllm::parse(line, None, |name, _, _| {
			matches |= names.contains(name);
			Ok::<_, std::convert::Infallible>(())
		});
		match parsed {
			Ok(()) if matches => {
				writeln!(out, "{}", line)?;
				shown += 1;
			},
			Ok(()) => (),
			Err(e) => invalid_line(source, line_number, e, strict)?,
		}
		Ok(())
	})?;
	Ok(shown)
}

fn json_lines(source: &str, input: &mut dyn BufRead, out: &mut dyn Write, strict: bool) -> Result<()> {
	for_each_line(source, input, |line_number, line| {
		match sllm::json::to_value(line) {
			Ok(value) => {
				serde_json::to_writer(&mut *out, &value)?;
				writeln!(out)?;
			},
			Err(sllm::json::Error::Parse(e)) => invalid_line(source, line_number, e, strict)?,
			Err(e) => return Err(e.into()),
		}
		Ok(())
	})
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::{assert, check, let_assert};

	const LOG: &str = concat!(
		"`user:alice` logged in from `ip:10.0.0.1`\n",
		"plain line without arguments\n",
		"`user:bob` opened `session:7`\n",
		"broken `line\n",
		"`session:7` closed by `user!(missing argument 0 'user')`\n",
	);

	fn run<F>(fun: F) -> (Result<()>, String)
	where
		F: FnOnce(&mut dyn BufRead, &mut dyn Write) -> Result<()>,
	{
		let mut output = Vec::new();
		let result = fun(&mut LOG.as_bytes(), &mut output);
		(result, String::from_utf8(output).unwrap())
	}

	#[test]
	fn test_list_names() {
		let (result, output) = run(|input, out| list_names("test.log", input, out, false));
		assert!(let Ok(()) = result);
		assert!(output == "test.log: 'ip'\ntest.log: 'session'\ntest.log: 'user'\n");
	}

	#[test]
	fn test_list_names_strict() {
		let (result, _) = run(|input, out| list_names("test.log", input, out, true));
		let_assert!(Err(e) = result);
		assert!(e.to_string() == "test.log:4: invalid message");
		check!(e.root_cause().to_string() == "unterminated arg name 'line'");
	}

	#[test]
	fn test_filter_lines() {
		let names = BTreeSet::from(["session"]);
		let mut shown = 0;
		let (result, output) = run(|input, out| {
			shown = filter_lines("test.log", input, out, &names, false)?;
			Ok(())
		});
		assert!(let Ok(()) = result);
		check!(shown == 2);
		check!(output == "`user:bob` opened `session:7`\n`session:7` closed by `user!(missing argument 0 'user')`\n");
	}

	#[test]
	fn test_filter_matches_error_arguments() {
		let names = BTreeSet::from(["user", "ip"]);
		let (result, output) = run(|input, out| filter_lines("test.log", input, out, &names, false).map(|_| ()));
		assert!(let Ok(()) = result);
		check!(output.lines().count() == 3);
	}

	#[test]
	fn test_json_lines() {
		let (result, output) = run(|input, out| json_lines("test.log", input, out, false));
		assert!(let Ok(()) = result);
		let lines: Vec<serde_json::Value> = output.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
		assert!(lines.len() == 4);
		check!(lines[0]["args"]["user"] == "alice");
		check!(lines[1]["template"] == "plain line without arguments");
		check!(lines[3]["errors"]["user"] == "missing argument 0 'user'");
	}
}
