use std::{
	collections::HashMap,
	fmt::{self, Debug},
};

use crate::types::Type;
use super::{Task, Value, Vm};


/// A host callback. It must pop exactly its arity of arguments from the task's stack,
/// and push exactly one result, or none if the declared return type is Void.
pub type Foreign = Box<dyn Fn(&Vm, &mut Task<'_>)>;


/// A function provided by the host.
pub struct ForeignFunction {
	pub arity: u8,
	pub return_type: Type,
	pub callback: Foreign,
}


impl Debug for ForeignFunction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("ForeignFunction")
			.field("arity", &self.arity)
			.field("return_type", &self.return_type)
			.finish()
	}
}


/// A named set of host functions and variables.
#[derive(Debug)]
pub struct Module {
	name: Box<str>,
	pub(super) functions: HashMap<String, ForeignFunction>,
	pub(super) variables: HashMap<String, Value>,
}


impl Module {
	pub fn new<N: Into<Box<str>>>(name: N) -> Self {
		Self {
			name: name.into(),
			functions: HashMap::new(),
			variables: HashMap::new(),
		}
	}


	pub fn name(&self) -> &str {
		&self.name
	}


	/// Add a function to the module.
	/// Panics if a function with the same symbol and arity was already added.
	pub fn add_function<F>(&mut self, symbol: &str, arity: u8, return_type: Type, callback: F)
	where
		F: Fn(&Vm, &mut Task<'_>) + 'static,
	{
		let name = mangle_function(&self.name, symbol, arity);
		let function = ForeignFunction {
			arity,
			return_type,
			callback: Box::new(callback),
		};

		let previous = self.functions.insert(name, function);
		assert!(previous.is_none(), "function {}.{} is already declared", self.name, symbol);
	}


	/// Add a constant variable to the module.
	/// Panics if a variable with the same symbol was already added.
	pub fn add_variable<V: Into<Value>>(&mut self, symbol: &str, value: V) {
		let name = mangle_variable(&self.name, symbol);
		let previous = self.variables.insert(name, value.into());
		assert!(previous.is_none(), "variable {}.{} is already declared", self.name, symbol);
	}
}


/// The dispatch key of a function: module, symbol and arity, length prefixed.
pub fn mangle_function(module: &str, symbol: &str, arity: u8) -> String {
	format!("_F{}{}{}{}_${}", module.len(), module, symbol.len(), symbol, arity)
}


/// The key of a module variable: module and symbol, length prefixed.
pub fn mangle_variable(module: &str, symbol: &str) -> String {
	format!("_V{}{}{}{}", module.len(), module, symbol.len(), symbol)
}
