use crate::types::Type;
use super::super::{mangle_function, Module, Value};


/// Reflection.mangle and Reflection.functionExists.
pub fn module() -> Module {
	let mut module = Module::new("Reflection");

	module.add_function(
		"mangle",
		3,
		Type::String,
		|_, task| {
			let args = task.args(3);
			let name = mangle_function(args[0].as_str(), args[1].as_str(), arity(&args[2]));
			task.push(name.into());
		},
	);

	module.add_function(
		"functionExists",
		3,
		Type::Bool,
		|vm, task| {
			let args = task.args(3);
			let exists = vm.function_exists(args[0].as_str(), args[1].as_str(), arity(&args[2]));
			task.push(Value::Bool(exists));
		},
	);

	module
}


/// Arities are bytes. Out of range values are clamped.
fn arity(value: &Value) -> u8 {
	value.as_int().max(0).min(u8::MAX as i64) as u8
}
