use std::fmt::Display as _;

use super::{Error, ErrorKind};
use crate::{
	fmt::{self, Display},
	symbol::{self},
};


impl<'a> Display<'a> for ErrorKind {
	type Context = &'a symbol::Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		match self {
			Self::UnknownVariable(symbol) => {
				"unknown variable '".fmt(f)?;
				symbol.fmt(f, context)?;
				"'".fmt(f)
			}

			Self::DuplicateVariable(symbol) => {
				"variable '".fmt(f)?;
				symbol.fmt(f, context)?;
				"' already declared in this scope".fmt(f)
			}

			Self::DuplicateFunction { name, arity } => {
				"function '".fmt(f)?;
				name.fmt(f, context)?;
				write!(f, "' with {} parameters already declared in this scope", arity)
			}

			Self::UnknownFunction { name, arity } => {
				"unknown function '".fmt(f)?;
				name.fmt(f, context)?;
				write!(f, "' with {} parameters", arity)
			}

			Self::UnknownForeignFunction { module, name, arity } => {
				"unknown function '".fmt(f)?;
				module.fmt(f, context)?;
				".".fmt(f)?;
				name.fmt(f, context)?;
				write!(f, "' with {} parameters", arity)
			}

			Self::UnknownModuleVariable { module, name } => {
				"unknown module variable '".fmt(f)?;
				module.fmt(f, context)?;
				".".fmt(f)?;
				name.fmt(f, context)?;
				"'".fmt(f)
			}

			Self::VoidVariable(symbol) => {
				"cannot declare variable '".fmt(f)?;
				symbol.fmt(f, context)?;
				"' of type Void".fmt(f)
			}

			Self::VoidOperand(op) => write!(f, "cannot operate on void types with '{}'", op.as_str()),

			Self::ArithmeticMismatch { op, left, right } => write!(
				f,
				"arithmetic expression type mismatch: {} {} {}",
				left, op.as_str(), right
			),

			Self::StringOperands { left, right } => write!(
				f,
				"both sides of string operators must be strings, found {} & {}",
				left, right
			),

			Self::RelationalMismatch { op, left, right } => write!(
				f,
				"relational expression type mismatch: {} {} {}",
				left, op.as_str(), right
			),

			Self::LogicalOperands { op, left, right } => write!(
				f,
				"both sides of logical operators must be boolean expressions, found {} {} {}",
				left, op.as_str(), right
			),

			Self::UnaryMismatch { op, operand } => write!(
				f,
				"invalid operand for unary '{}': {}",
				op.as_str(), operand
			),

			Self::AssignmentMismatch { variable, value } => write!(
				f,
				"cannot assign a value of type {} to a variable of type {}",
				value, variable
			),

			Self::InvalidAssignment => "cannot assign to a non-variable".fmt(f),

			Self::NonBoolCondition(found) => write!(
				f,
				"conditional statements work on boolean expressions, found {}",
				found
			),

			Self::ArgumentMismatch { index, parameter, argument } => write!(
				f,
				"argument {} has type {}, but the parameter has type {}",
				index + 1, argument, parameter
			),

			Self::VoidArgument(index) => write!(f, "argument {} has type Void", index + 1),

			Self::TooManyArguments(count) => write!(
				f,
				"functions take at most {} arguments, found {}",
				u8::MAX, count
			),

			Self::ReturnOutsideFunction => "return statement outside function".fmt(f),

			Self::ReturnMismatch { expected, found } => write!(
				f,
				"returned value has type {}, but the function returns {}",
				found, expected
			),

			Self::MissingReturnValue(expected) => write!(f, "missing return value of type {}", expected),

			Self::UnexpectedReturnValue => "void functions cannot return a value".fmt(f),

			Self::OutsideLoop(keyword) => write!(f, "{} statement outside loop", keyword.as_str()),

			Self::NestedFunction(name) => {
				"function '".fmt(f)?;
				name.fmt(f, context)?;
				"' must be declared at the top level".fmt(f)
			}
		}
	}
}


impl<'a> Display<'a> for Error {
	type Context = &'a symbol::Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		write!(f, "{} - ", self.span.pos)?;
		self.kind.fmt(f, context)
	}
}


/// We need this in order to be able to implement std::error::Error.
impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		Display::fmt(self, f, &symbol::Interner::new())
	}
}
