mod error;
mod scope;
#[cfg(test)]
mod tests;

use crate::{
	runtime::{Value, Vm},
	symbol::{self, Symbol},
	syntax::{scanner::{Operator, OperatorClass}, Span},
	types::Type,
};
pub use error::{Error, ErrorKind, Note};
pub use scope::{Function, ScopeKind, Variable};


/// The type of an expression, and the variable it refers to, if the expression is a bare
/// variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeExpr {
	pub ty: Type,
	pub lvalue: Option<Symbol>,
}


impl TypeExpr {
	pub fn lvalue(ty: Type, symbol: Symbol) -> Self {
		Self { ty, lvalue: Some(symbol) }
	}
}


impl From<Type> for TypeExpr {
	fn from(ty: Type) -> Self {
		Self { ty, lvalue: None }
	}
}


/// The typing of a binary operator application: both operands are converted to `from`,
/// and the result has type `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorMapping {
	pub from: Type,
	pub to: Type,
}


impl OperatorMapping {
	pub fn invalid() -> Self {
		Self { from: Type::Invalid, to: Type::Invalid }
	}
}


/// The semantic checker. Holds the scope stack, and resolves foreign symbols against the
/// VM's tables.
#[derive(Debug)]
pub struct Sema<'v> {
	vm: &'v Vm,
	scopes: scope::Stack,
}


impl<'v> Sema<'v> {
	pub fn new(vm: &'v Vm) -> Self {
		Self {
			vm,
			scopes: scope::Stack::new(),
		}
	}


	pub fn enter_scope(&mut self, kind: ScopeKind) {
		self.scopes.enter(kind);
	}


	pub fn exit_scope(&mut self) {
		self.scopes.exit();
	}


	pub fn scope_kind(&self) -> ScopeKind {
		self.scopes.kind()
	}


	pub fn in_loop(&self) -> bool {
		self.scopes.in_loop()
	}


	/// The return type of the enclosing function, or None outside functions.
	pub fn return_type(&self) -> Option<Type> {
		self.scopes.return_type()
	}


	/// Declare a variable in the innermost scope. A Void variable is reported, and declared
	/// as Invalid to prevent cascading errors.
	pub fn declare_variable(&mut self, symbol: Symbol, span: Span, ty: Type) -> Result<(), Error> {
		let declared_type = if ty == Type::Void { Type::Invalid } else { ty };

		self.scopes.declare_variable(symbol, Variable { ty: declared_type, declared: span })?;

		if ty == Type::Void {
			Err(Error::void_variable(symbol, span))
		} else {
			Ok(())
		}
	}


	/// The type of a variable reference.
	pub fn variable_type(&self, symbol: Symbol, span: Span) -> Result<TypeExpr, Error> {
		self.scopes
			.resolve_variable(symbol)
			.map(|variable| TypeExpr::lvalue(variable.ty, symbol))
			.ok_or_else(|| Error::unknown_variable(symbol, span))
	}


	/// Declare a user function in the innermost scope.
	pub fn declare_function(
		&mut self,
		symbol: Symbol,
		span: Span,
		params: Box<[Type]>,
		return_type: Type,
	) -> Result<(), Error> {
		self.scopes.declare_function(
			symbol,
			Function { params, return_type, declared: span }
		)
	}


	/// Resolve a user function by name and arity.
	pub fn function(&self, symbol: Symbol, arity: u8, span: Span) -> Result<&Function, Error> {
		self.scopes
			.resolve_function(symbol, arity)
			.ok_or_else(|| Error::unknown_function(symbol, arity, span))
	}


	/// The return type of a foreign function registered in the VM.
	pub fn foreign_function_type(
		&self,
		module: Symbol,
		name: Symbol,
		arity: u8,
		span: Span,
		interner: &symbol::Interner,
	) -> Result<Type, Error> {
		let module_name = interner.name(module);
		let function_name = interner.name(name);

		match self.vm.function_type(module_name, function_name, arity) {
			Type::Invalid => Err(Error::unknown_foreign_function(module, name, arity, span)),
			ty => Ok(ty),
		}
	}


	/// A module variable registered in the VM.
	pub fn module_variable(
		&self,
		module: Symbol,
		name: Symbol,
		span: Span,
		interner: &symbol::Interner,
	) -> Result<&'v Value, Error> {
		let module_name = interner.name(module);
		let variable_name = interner.name(name);

		self.vm
			.variable(module_name, variable_name)
			.filter(|value| value.static_type().is_valid())
			.ok_or_else(|| Error::unknown_module_variable(module, name, span))
	}


	/// Type a binary operator application.
	/// Both operands being Invalid yields Invalid silently. A single Invalid operand takes
	/// the type of the other one.
	pub fn binary_op_type(
		&self,
		op: Operator,
		lhs: TypeExpr,
		rhs: TypeExpr,
		span: Span,
	) -> Result<OperatorMapping, Error> {
		let (left, right) = (lhs.ty, rhs.ty);

		if !left.is_valid() && !right.is_valid() {
			return Ok(OperatorMapping::invalid());
		}

		if left == Type::Void || right == Type::Void {
			return Err(Error::void_operand(op, span));
		}

		let left = if left.is_valid() { left } else { right };
		let right = if right.is_valid() { right } else { left };

		match op.class() {
			OperatorClass::Arithmetic => match Type::constrain(left, right, true) {
				ty @ Type::Integer | ty @ Type::Number => Ok(OperatorMapping { from: ty, to: ty }),
				Type::String if op == Operator::Plus => Ok(
					OperatorMapping { from: Type::String, to: Type::String }
				),
				_ => Err(Error::arithmetic_mismatch(op, left, right, span)),
			},

			OperatorClass::String => {
				let has_string = left == Type::String || right == Type::String;

				if has_string && is_printable(left) && is_printable(right) {
					Ok(OperatorMapping { from: Type::String, to: Type::String })
				} else {
					Err(Error::string_operands(left, right, span))
				}
			}

			OperatorClass::Relational => {
				let ty = Type::constrain(left, right, true);
				let valid = match op {
					Operator::Equals => ty.is_valid(),
					_ => ty.is_numeric(),
				};

				if valid {
					Ok(OperatorMapping { from: ty, to: Type::Bool })
				} else {
					Err(Error::relational_mismatch(op, left, right, span))
				}
			}

			OperatorClass::Logical => {
				if left == Type::Bool && right == Type::Bool {
					Ok(OperatorMapping { from: Type::Bool, to: Type::Bool })
				} else {
					Err(Error::logical_operands(op, left, right, span))
				}
			}

			OperatorClass::Assignment => {
				if Type::constrain(left, right, true).is_valid() {
					Ok(OperatorMapping { from: left, to: Type::Void })
				} else {
					Err(Error::assignment_mismatch(left, right, span))
				}
			}
		}
	}


	/// Type an unary operator application.
	pub fn unary_op_type(&self, op: Operator, operand: Type, span: Span) -> Result<Type, Error> {
		match operand {
			Type::Invalid => Ok(Type::Invalid),
			Type::Integer | Type::Number if op.is_unary() => Ok(operand),
			_ => Err(Error::unary_mismatch(op, operand, span)),
		}
	}


	/// Whether a value of type `from` may be implicitly converted to `to`, as done for
	/// arguments and return values. Invalid types are always accepted.
	pub fn coercible(from: Type, to: Type) -> bool {
		if !from.is_valid() || !to.is_valid() || from == to {
			return true;
		}

		match to {
			Type::Integer | Type::Number => from.is_numeric(),
			Type::String => is_printable(from),
			_ => false,
		}
	}
}


/// Types that may be converted to strings.
fn is_printable(ty: Type) -> bool {
	matches!(ty, Type::String | Type::Integer | Type::Number | Type::Bool)
}
