mod args;
mod codegen;
mod compiler;
mod fmt;
mod runtime;
mod semantic;
mod symbol;
mod syntax;
mod term;
mod types;
#[cfg(test)]
mod tests;

use std::io;

use tracing_subscriber::EnvFilter;

use term::color;

use args::{Args, Command};
use compiler::ErrorsDisplayContext;
use runtime::{lib, Outcome, Task, Value, VmBuilder};


/// Maximum number of diagnostics to print.
const MAX_ERRORS: usize = 20;


fn main() -> ! {
	init_logging();

	let command = match args::parse(std::env::args_os()) {
		Ok(command) => command,
		Err(error) => {
			eprint!("{}", error);
			std::process::exit(1)
		}
	};

	let result = match command {
		Command::Run(args) => run(args),
		Command::Help(msg) | Command::Version(msg) => {
			println!("{}", msg);
			std::process::exit(0)
		},
	};

	let exit_code = match result {
		Ok(code) => code,
		Err(error) => {
			eprintln!("{}: {}", color::Fg(color::Red, "Error"), error);
			1
		}
	};

	std::process::exit(exit_code)
}


/// Log to stderr, so that stdout is left for the script. The filter is read from
/// RUST_LOG.
fn init_logging() {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(io::stderr)
		.init();
}


fn run(args: Args) -> io::Result<i32> {
	let mut interner = symbol::Interner::new();

	let source = syntax::Source::from_path(args.script.clone())
		.map_err(|error| io::Error::new(error.kind(), format!("{}: {}", args.script.display(), error)))?;

	let vm = lib::register(VmBuilder::new()).build();

	// ----------------------------------------------------------------------------------------
	let program = match compiler::compile(&source, &mut interner, &vm) {
		Ok(program) => program,

		Err(errors) => {
			eprint!(
				"{}",
				fmt::Show(
					&errors,
					ErrorsDisplayContext {
						max_errors: Some(MAX_ERRORS),
						interner: &interner,
						source: &source,
					}
				)
			);

			tracing::info!(errors = errors.len(), "compilation failed");
			return Ok(2);
		}
	};

	if args.dump {
		println!("{}", color::Fg(color::Yellow, "--------------------------------------------------"));
		print!("{}", program);
		println!("{}", color::Fg(color::Yellow, "--------------------------------------------------"));
	}

	if args.check {
		return Ok(0);
	}

	// ----------------------------------------------------------------------------------------
	if program.script.variable_count > args.stack {
		return Err(
			io::Error::new(
				io::ErrorKind::InvalidInput,
				format!("stack size {} can't hold {} variables", args.stack, program.script.variable_count)
			)
		);
	}

	let mut task = Task::new(&program, args.stack);

	loop {
		match vm.run(&mut task) {
			(Outcome::Continue, Value::Nil) => (),

			(Outcome::Continue, value) => println!("{}", value),

			(Outcome::Done, _) => {
				tracing::info!("task done");
				return Ok(0);
			}

			(Outcome::Error, value) => {
				eprintln!("{}: {}", color::Fg(color::Red, "Failed"), value);
				tracing::info!(%value, "task failed");
				return Ok(1);
			}
		}
	}
}
