use crate::types::Type;
use super::super::{Module, Value};


/// String.equal, String.slice and String.length.
pub fn module() -> Module {
	let mut module = Module::new("String");

	module.add_function(
		"equal",
		2,
		Type::Bool,
		|_, task| {
			let args = task.args(2);
			task.push(Value::Bool(args[0].as_str() == args[1].as_str()));
		},
	);

	module.add_function(
		"slice",
		3,
		Type::String,
		|_, task| {
			let args = task.args(3);
			let slice = slice(args[0].as_str(), args[1].as_int(), args[2].as_int());
			task.push(slice.into());
		},
	);

	module.add_function(
		"length",
		1,
		Type::Integer,
		|_, task| {
			let string = task.pop();
			task.push(Value::Int(string.as_str().chars().count() as i64));
		},
	);

	module
}


/// The characters in [start, start + length), clamped to the string.
fn slice(string: &str, start: i64, length: i64) -> String {
	let start = start.max(0) as usize;
	let length = length.max(0) as usize;

	string
		.chars()
		.skip(start)
		.take(length)
		.collect()
}
