use std::collections::HashMap;

use crate::types::Type;
use super::{Error, Span, Symbol};


/// What introduced a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
	/// The script's top level.
	Global,
	/// An if, else or guard block.
	Block,
	/// A loop body.
	Loop,
	/// A function body. Variable lookup doesn't cross this scope.
	Function { return_type: Type },
}


/// A declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
	pub ty: Type,
	pub declared: Span,
}


/// A declared user function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
	pub params: Box<[Type]>,
	pub return_type: Type,
	pub declared: Span,
}


#[derive(Debug)]
struct Scope {
	kind: ScopeKind,
	variables: HashMap<Symbol, Variable>,
	functions: HashMap<(Symbol, u8), Function>,
}


/// A scope stack.
#[derive(Debug)]
pub struct Stack(Vec<Scope>);


impl Stack {
	/// A stack containing only the global scope.
	pub fn new() -> Self {
		let mut stack = Self(Vec::new());
		stack.enter(ScopeKind::Global);
		stack
	}


	/// Enter a new empty scope.
	pub fn enter(&mut self, kind: ScopeKind) {
		self.0.push(
			Scope {
				kind,
				variables: HashMap::new(),
				functions: HashMap::new(),
			}
		);
	}


	/// Exit the current scope.
	/// Panics if the current scope is the global one.
	pub fn exit(&mut self) {
		assert!(self.0.len() > 1, "attempt to exit the global scope");
		self.0.pop();
	}


	/// The kind of the innermost scope.
	pub fn kind(&self) -> ScopeKind {
		self.current().kind
	}


	/// Declares a variable in the current scope.
	pub fn declare_variable(&mut self, symbol: Symbol, variable: Variable) -> Result<(), Error> {
		let scope = self.current_mut();

		if let Some(first) = scope.variables.get(&symbol) {
			return Err(Error::duplicate_variable(symbol, variable.declared, first.declared));
		}

		scope.variables.insert(symbol, variable);
		Ok(())
	}


	/// Declares a function in the current scope.
	pub fn declare_function(&mut self, symbol: Symbol, function: Function) -> Result<(), Error> {
		let arity = function.params.len() as u8;
		let scope = self.current_mut();

		if let Some(first) = scope.functions.get(&(symbol, arity)) {
			return Err(Error::duplicate_function(symbol, arity, function.declared, first.declared));
		}

		scope.functions.insert((symbol, arity), function);
		Ok(())
	}


	/// Find a variable, innermost scope first. The lookup stops at the enclosing function
	/// scope.
	pub fn resolve_variable(&self, symbol: Symbol) -> Option<&Variable> {
		for scope in self.0.iter().rev() {
			if let Some(variable) = scope.variables.get(&symbol) {
				return Some(variable);
			}

			if let ScopeKind::Function { .. } = scope.kind {
				break;
			}
		}

		None
	}


	/// Find a function, innermost scope first.
	pub fn resolve_function(&self, symbol: Symbol, arity: u8) -> Option<&Function> {
		self.0
			.iter()
			.rev()
			.find_map(|scope| scope.functions.get(&(symbol, arity)))
	}


	/// Whether there is a loop between the current scope and the enclosing function.
	pub fn in_loop(&self) -> bool {
		for scope in self.0.iter().rev() {
			match scope.kind {
				ScopeKind::Loop => return true,
				ScopeKind::Function { .. } => return false,
				_ => (),
			}
		}

		false
	}


	/// The return type of the enclosing function, if any.
	pub fn return_type(&self) -> Option<Type> {
		self.0
			.iter()
			.rev()
			.find_map(
				|scope| match scope.kind {
					ScopeKind::Function { return_type } => Some(return_type),
					_ => None,
				}
			)
	}


	fn current(&self) -> &Scope {
		self.0.last().expect("empty scope stack")
	}


	fn current_mut(&mut self) -> &mut Scope {
		self.0.last_mut().expect("empty scope stack")
	}
}


impl Default for Stack {
	fn default() -> Self {
		Self::new()
	}
}
