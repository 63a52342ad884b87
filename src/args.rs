use std::{ffi::OsString, path::PathBuf};

use clap::{clap_app, crate_authors, crate_version, crate_description};


/// Default operand stack capacity.
pub const DEFAULT_STACK: usize = 256;


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
	Help(Box<str>),
	Version(Box<str>),
	Run(Args)
}


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Args {
	/// Path of the script.
	pub script: PathBuf,
	/// Compile the script, but don't run it.
	pub check: bool,
	/// Print the disassembled program before running.
	pub dump: bool,
	/// Operand stack capacity of the task.
	pub stack: usize,
}


pub fn parse<A, T>(args: A) -> clap::Result<Command>
where
	A: IntoIterator<Item = T>,
	T: Into<OsString> + Clone
{
	let app = clap_app!(
		Wisp =>
			(version: crate_version!())
			(author: crate_authors!())
			(about: crate_description!())
			(@arg check: --check "Compile the script, without running it")
			(@arg dump: --dump "Print the disassembled program")
			(@arg stack: --stack +takes_value "Operand stack capacity (default 256)")
			(@arg script: +required "The script to run")
	);

	match app.get_matches_from_safe(args) {
		Ok(matches) => {
			let stack = match matches.value_of("stack") {
				Some(size) => size
					.parse::<usize>()
					.ok()
					.filter(|&size| size > 0)
					.ok_or_else(
						|| clap::Error::with_description(
							&format!("invalid stack size '{}'", size),
							clap::ErrorKind::InvalidValue
						)
					)?,
				None => DEFAULT_STACK,
			};

			Ok(
				Command::Run(
					Args {
						script: matches
							.value_of_os("script")
							.map(PathBuf::from)
							.unwrap_or_default(),
						check: matches.is_present("check"),
						dump: matches.is_present("dump"),
						stack,
					}
				)
			)
		}

		Err(error) => match error.kind {
			clap::ErrorKind::HelpDisplayed => Ok(
				Command::Help(error.message.into_boxed_str())
			),
			clap::ErrorKind::VersionDisplayed => Ok(
				Command::Version(error.message.into_boxed_str())
			),
			_ => Err(error)
		}
	}
}


#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;

	use super::*;


	#[test]
	fn test_defaults() {
		let command = parse(vec!["wisp", "script.wisp"]).expect("valid arguments");

		assert_matches!(
			command,
			Command::Run(Args { check: false, dump: false, stack: DEFAULT_STACK, ref script })
				if script == &PathBuf::from("script.wisp")
		);
	}


	#[test]
	fn test_flags() {
		let command = parse(vec!["wisp", "--check", "--dump", "--stack", "64", "a.wisp"])
			.expect("valid arguments");

		assert_matches!(command, Command::Run(Args { check: true, dump: true, stack: 64, .. }));
	}


	#[test]
	fn test_invalid_stack() {
		assert!(parse(vec!["wisp", "--stack", "lots", "a.wisp"]).is_err());
		assert!(parse(vec!["wisp", "--stack", "0", "a.wisp"]).is_err());
	}


	#[test]
	fn test_missing_script() {
		assert!(parse(vec!["wisp"]).is_err());
	}


	#[test]
	fn test_help() {
		assert_matches!(parse(vec!["wisp", "--help"]), Ok(Command::Help(_)));
	}
}
