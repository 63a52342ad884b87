use std::io::{self, BufRead, Write};

use crate::types::Type;
use super::super::Module;


/// IO.print, IO.toString and IO.getLine.
pub fn module() -> Module {
	let mut module = Module::new("IO");

	module.add_function(
		"print",
		1,
		Type::Void,
		|_, task| {
			let value = task.pop();
			let stdout = io::stdout();
			let mut stdout = stdout.lock();

			if let Err(error) = writeln!(stdout, "{}", value) {
				tracing::warn!(%error, "IO.print failed");
			}
		},
	);

	module.add_function(
		"toString",
		1,
		Type::String,
		|_, task| {
			let value = task.pop();
			task.push(value.to_string().into());
		},
	);

	module.add_function(
		"getLine",
		0,
		Type::String,
		|_, task| task.push(read_line().into()),
	);

	module.add_function(
		"getLine",
		1,
		Type::String,
		|_, task| {
			let prompt = task.pop();
			let stdout = io::stdout();
			let mut stdout = stdout.lock();

			if let Err(error) = write!(stdout, "{}", prompt).and_then(|_| stdout.flush()) {
				tracing::warn!(%error, "IO.getLine failed to print the prompt");
			}

			task.push(read_line().into());
		},
	);

	module
}


/// Read a line from stdin, without the line break. Errors and EOF produce an empty
/// string.
fn read_line() -> String {
	let stdin = io::stdin();
	let mut line = String::new();

	if let Err(error) = stdin.lock().read_line(&mut line) {
		tracing::warn!(%error, "IO.getLine failed");
		line.clear();
	}

	while line.ends_with('\n') || line.ends_with('\r') {
		line.pop();
	}

	line
}
