use super::*;

use assert_matches::assert_matches;

use crate::runtime::{Module, VmBuilder};


fn vm() -> Vm {
	let mut io = Module::new("IO");
	io.add_function("print", 1, Type::Void, |_, task| { task.pop(); });
	io.add_variable("answer", 42i64);

	VmBuilder::new()
		.register(io)
		.build()
}


fn span(offset: usize) -> Span {
	Span { offset, length: 1, ..Span::default() }
}


#[test]
fn test_block_scope() {
	let vm = vm();
	let mut interner = symbol::Interner::new();
	let x = interner.get_or_intern("x");
	let mut sema = Sema::new(&vm);

	sema.enter_scope(ScopeKind::Block);
	assert_matches!(sema.declare_variable(x, span(0), Type::Integer), Ok(()));
	assert_matches!(
		sema.variable_type(x, span(1)),
		Ok(TypeExpr { ty: Type::Integer, lvalue: Some(symbol) }) if symbol == x
	);
	sema.exit_scope();

	assert_matches!(
		sema.variable_type(x, span(2)),
		Err(Error { kind: ErrorKind::UnknownVariable(_), .. })
	);

	// Redeclaring in the enclosing scope is fine.
	assert_matches!(sema.declare_variable(x, span(3), Type::String), Ok(()));
}


#[test]
fn test_duplicate_variable_has_note() {
	let vm = vm();
	let mut interner = symbol::Interner::new();
	let x = interner.get_or_intern("x");
	let mut sema = Sema::new(&vm);

	assert_matches!(sema.declare_variable(x, span(0), Type::Integer), Ok(()));
	assert_matches!(
		sema.declare_variable(x, span(5), Type::Integer),
		Err(Error {
			kind: ErrorKind::DuplicateVariable(_),
			span: Span { offset: 5, .. },
			note: Some(Note { span: Span { offset: 0, .. }, .. }),
		})
	);
}


#[test]
fn test_shadowing_in_inner_scope() {
	let vm = vm();
	let mut interner = symbol::Interner::new();
	let x = interner.get_or_intern("x");
	let mut sema = Sema::new(&vm);

	assert_matches!(sema.declare_variable(x, span(0), Type::Integer), Ok(()));
	sema.enter_scope(ScopeKind::Loop);
	assert_matches!(sema.declare_variable(x, span(1), Type::String), Ok(()));
	assert_matches!(sema.variable_type(x, span(2)), Ok(TypeExpr { ty: Type::String, .. }));
	sema.exit_scope();
	assert_matches!(sema.variable_type(x, span(3)), Ok(TypeExpr { ty: Type::Integer, .. }));
}


#[test]
fn test_function_boundary() {
	let vm = vm();
	let mut interner = symbol::Interner::new();
	let x = interner.get_or_intern("x");
	let f = interner.get_or_intern("f");
	let mut sema = Sema::new(&vm);

	assert_matches!(sema.declare_variable(x, span(0), Type::Integer), Ok(()));
	assert_matches!(sema.declare_function(f, span(1), Box::new([Type::Integer]), Type::Void), Ok(()));

	sema.enter_scope(ScopeKind::Function { return_type: Type::Void });
	sema.enter_scope(ScopeKind::Loop);

	assert!(sema.in_loop());
	assert_eq!(sema.return_type(), Some(Type::Void));
	assert_matches!(sema.variable_type(x, span(2)), Err(_));
	assert_matches!(sema.function(f, 1, span(3)), Ok(Function { return_type: Type::Void, .. }));
	assert_matches!(
		sema.function(f, 2, span(4)),
		Err(Error { kind: ErrorKind::UnknownFunction { arity: 2, .. }, .. })
	);

	sema.exit_scope();
	assert!(!sema.in_loop());
	sema.exit_scope();
	assert_eq!(sema.return_type(), None);
}


#[test]
fn test_void_variable() {
	let vm = vm();
	let mut interner = symbol::Interner::new();
	let x = interner.get_or_intern("x");
	let mut sema = Sema::new(&vm);

	assert_matches!(
		sema.declare_variable(x, span(0), Type::Void),
		Err(Error { kind: ErrorKind::VoidVariable(_), .. })
	);
	// Declared as invalid, so that later usages don't cascade.
	assert_matches!(sema.variable_type(x, span(1)), Ok(TypeExpr { ty: Type::Invalid, .. }));
}


#[test]
fn test_foreign_resolution() {
	let vm = vm();
	let mut interner = symbol::Interner::new();
	let io = interner.get_or_intern("IO");
	let print = interner.get_or_intern("print");
	let answer = interner.get_or_intern("answer");
	let sema = Sema::new(&vm);

	assert_matches!(sema.foreign_function_type(io, print, 1, span(0), &interner), Ok(Type::Void));
	assert_matches!(
		sema.foreign_function_type(io, print, 2, span(0), &interner),
		Err(Error { kind: ErrorKind::UnknownForeignFunction { arity: 2, .. }, .. })
	);
	assert_matches!(sema.module_variable(io, answer, span(0), &interner), Ok(Value::Int(42)));
	assert_matches!(sema.module_variable(io, print, span(0), &interner), Err(_));
}


#[test]
fn test_arithmetic_typing() {
	let vm = vm();
	let sema = Sema::new(&vm);
	let int = TypeExpr::from(Type::Integer);
	let num = TypeExpr::from(Type::Number);
	let string = TypeExpr::from(Type::String);

	assert_matches!(
		sema.binary_op_type(Operator::Plus, int, int, span(0)),
		Ok(OperatorMapping { from: Type::Integer, to: Type::Integer })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Times, int, num, span(0)),
		Ok(OperatorMapping { from: Type::Number, to: Type::Number })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Plus, string, string, span(0)),
		Ok(OperatorMapping { from: Type::String, to: Type::String })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Minus, string, string, span(0)),
		Err(Error { kind: ErrorKind::ArithmeticMismatch { .. }, .. })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Plus, string, int, span(0)),
		Err(Error { kind: ErrorKind::ArithmeticMismatch { .. }, .. })
	);
}


#[test]
fn test_other_typing() {
	let vm = vm();
	let sema = Sema::new(&vm);
	let int = TypeExpr::from(Type::Integer);
	let num = TypeExpr::from(Type::Number);
	let string = TypeExpr::from(Type::String);
	let boolean = TypeExpr::from(Type::Bool);
	let void = TypeExpr::from(Type::Void);

	assert_matches!(
		sema.binary_op_type(Operator::Lower, int, num, span(0)),
		Ok(OperatorMapping { from: Type::Number, to: Type::Bool })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Lower, string, string, span(0)),
		Err(Error { kind: ErrorKind::RelationalMismatch { .. }, .. })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Equals, string, string, span(0)),
		Ok(OperatorMapping { from: Type::String, to: Type::Bool })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Equals, boolean, boolean, span(0)),
		Ok(OperatorMapping { from: Type::Bool, to: Type::Bool })
	);
	assert_matches!(
		sema.binary_op_type(Operator::And, boolean, int, span(0)),
		Err(Error { kind: ErrorKind::LogicalOperands { .. }, .. })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Concat, string, num, span(0)),
		Ok(OperatorMapping { from: Type::String, to: Type::String })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Concat, int, num, span(0)),
		Err(Error { kind: ErrorKind::StringOperands { .. }, .. })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Plus, int, void, span(0)),
		Err(Error { kind: ErrorKind::VoidOperand(Operator::Plus), .. })
	);
}


#[test]
fn test_assignment_typing() {
	let vm = vm();
	let mut interner = symbol::Interner::new();
	let x = interner.get_or_intern("x");
	let sema = Sema::new(&vm);

	let int_var = TypeExpr::lvalue(Type::Integer, x);

	assert_matches!(
		sema.binary_op_type(Operator::Assign, int_var, Type::Number.into(), span(0)),
		Ok(OperatorMapping { from: Type::Integer, to: Type::Void })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Assign, int_var, Type::String.into(), span(0)),
		Err(Error { kind: ErrorKind::AssignmentMismatch { .. }, .. })
	);
}


#[test]
fn test_invalid_suppresses_cascades() {
	let vm = vm();
	let sema = Sema::new(&vm);
	let invalid = TypeExpr::from(Type::Invalid);

	assert_matches!(
		sema.binary_op_type(Operator::Plus, invalid, invalid, span(0)),
		Ok(OperatorMapping { from: Type::Invalid, to: Type::Invalid })
	);
	assert_matches!(
		sema.binary_op_type(Operator::Plus, invalid, Type::Integer.into(), span(0)),
		Ok(OperatorMapping { from: Type::Integer, to: Type::Integer })
	);
	assert_matches!(sema.unary_op_type(Operator::Minus, Type::Invalid, span(0)), Ok(Type::Invalid));
	assert_matches!(
		sema.unary_op_type(Operator::Minus, Type::String, span(0)),
		Err(Error { kind: ErrorKind::UnaryMismatch { .. }, .. })
	);
}


#[test]
fn test_coercible() {
	assert!(Sema::coercible(Type::Integer, Type::Number));
	assert!(Sema::coercible(Type::Number, Type::Integer));
	assert!(Sema::coercible(Type::Bool, Type::String));
	assert!(Sema::coercible(Type::Invalid, Type::Bool));
	assert!(!Sema::coercible(Type::String, Type::Integer));
	assert!(!Sema::coercible(Type::Void, Type::String));
}
