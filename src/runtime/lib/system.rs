use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Type;
use super::super::{Module, Value};


/// System.getOS, System.getTime and System.version.
pub fn module() -> Module {
	let mut module = Module::new("System");

	module.add_function(
		"getOS",
		0,
		Type::String,
		|_, task| task.push(Value::from(std::env::consts::OS)),
	);

	module.add_function(
		"getTime",
		0,
		Type::Integer,
		|_, task| {
			let seconds = SystemTime::now()
				.duration_since(UNIX_EPOCH)
				.map(|duration| duration.as_secs() as i64)
				.unwrap_or(0);

			task.push(Value::Int(seconds));
		},
	);

	module.add_variable("version", env!("CARGO_PKG_VERSION"));

	module
}
