mod fmt;

use crate::{
	syntax::{scanner::{Keyword, Operator}, Span},
	types::Type,
};
use super::Symbol;


/// The kind of semantic error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
	/// Variable usage before variable declaration.
	UnknownVariable(Symbol),
	/// Variable declared with the same name twice in the same scope.
	/// Includes function parameters.
	DuplicateVariable(Symbol),
	/// Function declared with the same name and arity twice in the same scope.
	DuplicateFunction { name: Symbol, arity: u8 },
	/// Call to an undeclared user function.
	UnknownFunction { name: Symbol, arity: u8 },
	/// Call to an unregistered foreign function.
	UnknownForeignFunction { module: Symbol, name: Symbol, arity: u8 },
	/// Usage of an unregistered module variable.
	UnknownModuleVariable { module: Symbol, name: Symbol },
	/// Variable initialized with a Void expression.
	VoidVariable(Symbol),
	/// Operand of type Void.
	VoidOperand(Operator),
	/// Incompatible operands for an arithmetic operator.
	ArithmeticMismatch { op: Operator, left: Type, right: Type },
	/// Concatenation without string operands.
	StringOperands { left: Type, right: Type },
	/// Incompatible operands for a relational operator.
	RelationalMismatch { op: Operator, left: Type, right: Type },
	/// Non boolean operands for a logical operator.
	LogicalOperands { op: Operator, left: Type, right: Type },
	/// Invalid operand for an unary operator.
	UnaryMismatch { op: Operator, operand: Type },
	/// Assigned value not compatible with the variable.
	AssignmentMismatch { variable: Type, value: Type },
	/// Assignment to something that is not a variable.
	InvalidAssignment,
	/// Non boolean condition in if, guard or until.
	NonBoolCondition(Type),
	/// Argument not compatible with the parameter.
	ArgumentMismatch { index: u8, parameter: Type, argument: Type },
	/// Void expression used as a call argument.
	VoidArgument(u8),
	/// Parameter or argument list longer than the maximum arity.
	TooManyArguments(usize),
	/// Return statement outside function.
	ReturnOutsideFunction,
	/// Returned value not compatible with the return type.
	ReturnMismatch { expected: Type, found: Type },
	/// Return without a value in a non-void function.
	MissingReturnValue(Type),
	/// Return with a value in a void function.
	UnexpectedReturnValue,
	/// Next or stoploop statement outside loop.
	OutsideLoop(Keyword),
	/// Function declared inside a block or another function.
	NestedFunction(Symbol),
}


/// An explanatory note attached to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
	pub message: &'static str,
	pub span: Span,
}


/// A semantic error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
	pub kind: ErrorKind,
	pub span: Span,
	pub note: Option<Note>,
}


impl std::error::Error for Error { }


impl Error {
	fn new(kind: ErrorKind, span: Span) -> Self {
		Self { kind, span, note: None }
	}


	fn with_note(mut self, message: &'static str, span: Span) -> Self {
		self.note = Some(Note { message, span });
		self
	}


	/// Variable usage before variable declaration.
	pub fn unknown_variable(symbol: Symbol, span: Span) -> Self {
		Self::new(ErrorKind::UnknownVariable(symbol), span)
	}


	/// Variable declared with the same name twice in the same scope.
	pub fn duplicate_variable(symbol: Symbol, span: Span, first: Span) -> Self {
		Self::new(ErrorKind::DuplicateVariable(symbol), span)
			.with_note("first declaration was here", first)
	}


	/// Function declared with the same signature twice in the same scope.
	pub fn duplicate_function(name: Symbol, arity: u8, span: Span, first: Span) -> Self {
		Self::new(ErrorKind::DuplicateFunction { name, arity }, span)
			.with_note("first declaration was here", first)
	}


	pub fn unknown_function(name: Symbol, arity: u8, span: Span) -> Self {
		Self::new(ErrorKind::UnknownFunction { name, arity }, span)
	}


	pub fn unknown_foreign_function(module: Symbol, name: Symbol, arity: u8, span: Span) -> Self {
		Self::new(ErrorKind::UnknownForeignFunction { module, name, arity }, span)
	}


	pub fn unknown_module_variable(module: Symbol, name: Symbol, span: Span) -> Self {
		Self::new(ErrorKind::UnknownModuleVariable { module, name }, span)
	}


	pub fn void_variable(symbol: Symbol, span: Span) -> Self {
		Self::new(ErrorKind::VoidVariable(symbol), span)
	}


	pub fn void_operand(op: Operator, span: Span) -> Self {
		Self::new(ErrorKind::VoidOperand(op), span)
	}


	pub fn arithmetic_mismatch(op: Operator, left: Type, right: Type, span: Span) -> Self {
		Self::new(ErrorKind::ArithmeticMismatch { op, left, right }, span)
	}


	pub fn string_operands(left: Type, right: Type, span: Span) -> Self {
		Self::new(ErrorKind::StringOperands { left, right }, span)
	}


	pub fn relational_mismatch(op: Operator, left: Type, right: Type, span: Span) -> Self {
		Self::new(ErrorKind::RelationalMismatch { op, left, right }, span)
	}


	pub fn logical_operands(op: Operator, left: Type, right: Type, span: Span) -> Self {
		Self::new(ErrorKind::LogicalOperands { op, left, right }, span)
	}


	pub fn unary_mismatch(op: Operator, operand: Type, span: Span) -> Self {
		Self::new(ErrorKind::UnaryMismatch { op, operand }, span)
	}


	pub fn assignment_mismatch(variable: Type, value: Type, span: Span) -> Self {
		Self::new(ErrorKind::AssignmentMismatch { variable, value }, span)
	}


	/// Assignment to something that is not a variable.
	pub fn invalid_assignment(span: Span) -> Self {
		Self::new(ErrorKind::InvalidAssignment, span)
	}


	pub fn non_bool_condition(found: Type, span: Span) -> Self {
		Self::new(ErrorKind::NonBoolCondition(found), span)
	}


	pub fn argument_mismatch(index: u8, parameter: Type, argument: Type, span: Span, declaration: Span) -> Self {
		Self::new(ErrorKind::ArgumentMismatch { index, parameter, argument }, span)
			.with_note("function declared here", declaration)
	}


	pub fn void_argument(index: u8, span: Span) -> Self {
		Self::new(ErrorKind::VoidArgument(index), span)
	}


	/// Arity is encoded in a single byte.
	pub fn too_many_arguments(count: usize, span: Span) -> Self {
		Self::new(ErrorKind::TooManyArguments(count), span)
	}


	pub fn return_outside_function(span: Span) -> Self {
		Self::new(ErrorKind::ReturnOutsideFunction, span)
	}


	pub fn return_mismatch(expected: Type, found: Type, span: Span) -> Self {
		Self::new(ErrorKind::ReturnMismatch { expected, found }, span)
	}


	pub fn missing_return_value(expected: Type, span: Span) -> Self {
		Self::new(ErrorKind::MissingReturnValue(expected), span)
	}


	pub fn unexpected_return_value(span: Span) -> Self {
		Self::new(ErrorKind::UnexpectedReturnValue, span)
	}


	/// Next or stoploop outside loop.
	pub fn outside_loop(keyword: Keyword, span: Span) -> Self {
		Self::new(ErrorKind::OutsideLoop(keyword), span)
	}


	pub fn nested_function(name: Symbol, span: Span) -> Self {
		Self::new(ErrorKind::NestedFunction(name), span)
	}
}
