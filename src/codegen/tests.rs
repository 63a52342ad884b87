use assert_matches::assert_matches;

use super::*;
use il::{Function, Operand};
use crate::symbol::Symbol;


fn jump_operand(bytecode: &[u8], at: usize) -> u16 {
	u16::from_be_bytes([bytecode[at + 1], bytecode[at + 2]])
}


#[test]
fn test_forward_jump_encoding() {
	let mut function = Function::new(0);
	function.push(Instruction::jump(Opcode::Jmp, "end"));
	function.push(Instruction::new(Opcode::Nop));
	function.push(Instruction::new(Opcode::Nop));
	function.label("end");
	function.push(Instruction::new(Opcode::Halt));

	let built = function.build();
	assert_eq!(built.bytecode[0], Opcode::Jmp as u8);
	// The displacement is relative to the end of the jump.
	assert_eq!(jump_operand(&built.bytecode, 0), 2);
}


#[test]
fn test_backward_jump_encoding() {
	let mut function = Function::new(0);
	function.label("start");
	function.push(Instruction::new(Opcode::Nop));
	function.push(Instruction::with_byte(Opcode::LoadC, 0));
	function.push(Instruction::jump(Opcode::RJmp, "start"));

	let built = function.build();
	// nop (1) + load_c (2) + rjmp (3) back to zero.
	assert_eq!(jump_operand(&built.bytecode, 3), 6);
}


#[test]
fn test_jump_to_self_end() {
	let mut function = Function::new(0);
	function.push(Instruction::jump(Opcode::Jnz, "next"));
	function.label("next");
	function.push(Instruction::jump(Opcode::RJnz, "next"));

	let built = function.build();
	assert_eq!(jump_operand(&built.bytecode, 0), 0);
	assert_eq!(jump_operand(&built.bytecode, 3), 3);
}


#[test]
fn test_label_at_end() {
	let mut function = Function::new(0);
	function.push(Instruction::jump(Opcode::Jmp, "end"));
	function.push(Instruction::with_byte(Opcode::Load, 0));
	function.label("end");

	let built = function.build();
	assert_eq!(built.bytecode.len(), 5);
	assert_eq!(jump_operand(&built.bytecode, 0), 2);
}


#[test]
#[should_panic(expected = "jumps backwards")]
fn test_forward_opcode_backwards() {
	let mut function = Function::new(0);
	function.label("start");
	function.push(Instruction::new(Opcode::Nop));
	function.push(Instruction::jump(Opcode::Jmp, "start"));
	function.build();
}


#[test]
#[should_panic(expected = "undefined label")]
fn test_undefined_label() {
	let mut function = Function::new(0);
	function.push(Instruction::jump(Opcode::Jmp, "nowhere"));
	function.build();
}


#[test]
fn test_first_label_definition_wins() {
	let mut function = Function::new(0);
	function.label("a");
	function.push(Instruction::new(Opcode::Nop));
	function.label("a");

	assert_eq!(function.label_index("a"), Some(0));
}


#[test]
fn test_insert_shifts_labels() {
	let mut function = Function::new(0);
	function.push(Instruction::new(Opcode::Nop));
	function.label("before");
	function.push(Instruction::new(Opcode::Pop));
	function.push(Instruction::new(Opcode::Nop));
	function.label("after");
	function.push(Instruction::new(Opcode::Halt));

	function.insert(1, Instruction::new(Opcode::I2F));
	assert_eq!(function.label_index("before"), Some(2));
	assert_eq!(function.label_index("after"), Some(4));

	function.insert(4, Instruction::new(Opcode::F2I));
	assert_eq!(function.label_index("before"), Some(2));
	assert_eq!(function.label_index("after"), Some(5));

	assert_eq!(function.instructions()[5].opcode, Opcode::Halt);
}


#[test]
fn test_append_keeps_labels() {
	let mut function = Function::new(0);
	function.push(Instruction::new(Opcode::Nop));
	function.label("end");

	function.insert(1, Instruction::new(Opcode::I2F));
	assert_eq!(function.label_index("end"), Some(1));
}


#[test]
fn test_remove_shifts_labels() {
	let mut function = Function::new(0);
	function.label("start");
	function.push(Instruction::with_byte(Opcode::Load, 0));
	function.push(Instruction::new(Opcode::Nop));
	function.label("end");
	function.push(Instruction::new(Opcode::Halt));

	let removed = function.remove(0);
	assert_eq!(removed.opcode, Opcode::Load);
	assert_eq!(function.label_index("start"), Some(0));
	assert_eq!(function.label_index("end"), Some(1));
}


#[test]
fn test_scoped_locals() {
	let x = Local::Variable(Symbol::default());
	let mut function = Function::new(0);

	assert_eq!(function.declare(x), 0);
	function.enter_scope();
	assert_eq!(function.declare(x), 1);
	assert_eq!(function.slot(x), Some(1));
	function.exit_scope();
	assert_eq!(function.slot(x), Some(0));
	assert_eq!(function.slot(Local::Counter(0)), None);

	assert_eq!(function.build().variable_count, 2);
}


#[test]
#[should_panic(expected = "too many local variables")]
fn test_local_limit() {
	let mut function = Function::new(0);
	for ix in 0 ..= 256 {
		function.declare(Local::Counter(ix));
	}
}


#[test]
fn test_constant_dedupe() {
	let mut codegen = CodeGen::new();
	codegen.emit_constant(Value::Int(1));
	codegen.emit_constant(Value::from("one"));
	codegen.emit_constant(Value::Int(1));
	codegen.emit_constant(Value::Number(1.0));

	let program = codegen.generate();
	assert_eq!(program.constants.len(), 3);
	assert_eq!(&program.script.bytecode[..], &[
		Opcode::LoadC as u8, 0,
		Opcode::LoadC as u8, 1,
		Opcode::LoadC as u8, 0,
		Opcode::LoadC as u8, 2,
		Opcode::Halt as u8,
	]);
}


#[test]
#[should_panic(expected = "too many constants")]
fn test_constant_limit() {
	let mut codegen = CodeGen::new();
	for int in 0 ..= 256 {
		codegen.emit_constant(Value::Int(int));
	}
}


#[test]
fn test_count_loop_shape() {
	let mut codegen = CodeGen::new();
	codegen.begin_count_loop(3);
	codegen.emit_next();
	codegen.emit_stoploop();
	codegen.end_loop();

	let opcodes: Vec<_> = codegen.function
		.instructions()
		.iter()
		.map(|instruction| instruction.opcode)
		.collect();

	assert_eq!(
		opcodes,
		[
			Opcode::LoadC, Opcode::Store,
			Opcode::Load, Opcode::LoadC, Opcode::TestIEq, Opcode::Jnz,
			Opcode::Jmp, Opcode::Jmp,
			Opcode::Load, Opcode::LoadC, Opcode::ISub, Opcode::Store,
			Opcode::RJmp,
		]
	);

	assert_eq!(codegen.function.label_index("loop_0"), Some(2));
	assert_eq!(codegen.function.label_index("next_0"), Some(8));
	assert_eq!(codegen.function.label_index("endloop_0"), Some(13));

	// Resolves without direction violations.
	codegen.generate();
}


#[test]
fn test_until_next_jumps_back() {
	let mut codegen = CodeGen::new();
	codegen.begin_until_loop();
	codegen.emit(Opcode::LoadNo);
	codegen.until_condition();
	codegen.emit_next();
	codegen.end_loop();

	assert_matches!(
		&codegen.function.instructions()[2],
		Instruction { opcode: Opcode::RJmp, operand: Operand::Label(label) } if &**label == "loop_0"
	);

	codegen.generate();
}


#[test]
fn test_nested_function_restores_state() {
	let mut codegen = CodeGen::new();
	codegen.begin_until_loop();
	codegen.emit(Opcode::LoadNo);
	codegen.until_condition();

	codegen.open_function("_F03foo_$0".into(), 0);
	codegen.emit_constant(Value::Int(1));
	codegen.emit(Opcode::RetV);
	codegen.close_function(Type::Integer);

	codegen.emit_stoploop();
	codegen.end_loop();

	let program = codegen.generate();
	let function = &program.functions["_F03foo_$0"];
	assert_eq!(function.arity, 0);
	assert_eq!(
		&function.bytecode[..],
		&[Opcode::LoadC as u8, 0, Opcode::RetV as u8, Opcode::Fail as u8, 1]
	);
	assert_matches!(program.constant(1), Value::String(message) if &**message == "missing return value");
}


#[test]
fn test_if_else_labels() {
	let mut codegen = CodeGen::new();
	codegen.emit(Opcode::LoadYes);
	codegen.begin_if();
	codegen.emit(Opcode::Nop);
	codegen.begin_else();
	codegen.emit(Opcode::Nop);
	codegen.end_if();

	let program = codegen.generate();
	let code = &program.script.bytecode;

	// load_yes; jnz if_0; jmp else_0; if_0: nop; jmp endif_0; else_0: nop; endif_0: halt
	assert_eq!(code[1], Opcode::Jnz as u8);
	assert_eq!(jump_operand(code, 1), 3);
	assert_eq!(jump_operand(code, 4), 4);
	assert_eq!(jump_operand(code, 8), 1);
	assert_eq!(code[12], Opcode::Halt as u8);
}
