use std::{collections::HashMap, io, path::Path};

use assert_matches::assert_matches;

use crate::{
	compiler::{self, ErrorsDisplayContext},
	fmt,
	symbol,
	syntax::Source,
	tests,
	types::Type,
};
use super::{lib, mangle_function, Function, Module, Opcode, Outcome, Program, Task, Value, Vm, VmBuilder};


/// Build a program from hand assembled bytecode.
fn program(
	script: Vec<u8>,
	variable_count: usize,
	constants: Vec<Value>,
	functions: Vec<(String, Function)>,
) -> Program {
	Program {
		script: Function {
			bytecode: script.into(),
			variable_count,
			arity: 0,
		},
		functions: functions
			.into_iter()
			.map(|(name, function)| (name.into_boxed_str(), function))
			.collect::<HashMap<_, _>>(),
		constants: constants.into(),
	}
}


fn function(bytecode: Vec<u8>, arity: u8, variable_count: usize) -> Function {
	Function {
		bytecode: bytecode.into(),
		variable_count,
		arity,
	}
}


fn empty_vm() -> Vm {
	VmBuilder::new().build()
}


#[test]
fn test_halt_is_sticky() {
	let vm = empty_vm();
	let program = program(vec![Opcode::Halt as u8], 0, vec![], vec![]);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Done, Value::Nil));
	assert_matches!(vm.run(&mut task), (Outcome::Done, Value::Nil));
}


#[test]
fn test_yield_and_resume() {
	let vm = empty_vm();
	let program = program(
		vec![
			Opcode::LoadC as u8, 0,
			Opcode::YieldV as u8,
			Opcode::Yield as u8,
			Opcode::LoadC as u8, 1,
			Opcode::YieldV as u8,
			Opcode::Halt as u8,
		],
		0,
		vec![Value::Int(1), Value::Int(2)],
		vec![],
	);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(1)));
	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Nil));
	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(2)));
	assert_eq!(task.stack_size(), 0);
	assert_matches!(vm.run(&mut task), (Outcome::Done, Value::Nil));
}


#[test]
fn test_backward_jump() {
	let vm = empty_vm();
	// Increment a local until it reaches 5.
	let program = program(
		vec![
			Opcode::LoadC as u8, 0,   // 0
			Opcode::Store as u8, 0,   // 2
			Opcode::Load as u8, 0,    // 4
			Opcode::LoadC as u8, 1,   // 6
			Opcode::IAdd as u8,       // 8
			Opcode::Store as u8, 0,   // 9
			Opcode::Load as u8, 0,    // 11
			Opcode::LoadC as u8, 2,   // 13
			Opcode::TestIlt as u8,    // 15
			Opcode::RJnz as u8, 0, 15, // 16, back to 4
			Opcode::Load as u8, 0,    // 19
			Opcode::YieldV as u8,     // 21
			Opcode::Halt as u8,       // 22
		],
		1,
		vec![Value::Int(0), Value::Int(1), Value::Int(5)],
		vec![],
	);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(5)));
	assert_matches!(vm.run(&mut task), (Outcome::Done, _));
}


#[test]
fn test_forward_jumps() {
	let vm = empty_vm();
	let constants = vec![Value::from("unreachable")];

	let skip = program(
		vec![
			Opcode::Jmp as u8, 0, 2,
			Opcode::Fail as u8, 0,
			Opcode::LoadYes as u8,
			Opcode::YieldV as u8,
			Opcode::Halt as u8,
		],
		0,
		constants.clone(),
		vec![],
	);
	let mut task = Task::new(&skip, 8);
	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Bool(true)));

	let not_taken = program(
		vec![
			Opcode::LoadNo as u8,
			Opcode::Jnz as u8, 0, 2,
			Opcode::Fail as u8, 0,
			Opcode::Halt as u8,
		],
		0,
		constants.clone(),
		vec![],
	);
	let mut task = Task::new(&not_taken, 8);
	assert_matches!(vm.run(&mut task), (Outcome::Error, Value::String(s)) if &*s == "unreachable");

	let taken = program(
		vec![
			Opcode::LoadYes as u8,
			Opcode::Jnz as u8, 0, 2,
			Opcode::Fail as u8, 0,
			Opcode::Halt as u8,
		],
		0,
		constants,
		vec![],
	);
	let mut task = Task::new(&taken, 8);
	assert_matches!(vm.run(&mut task), (Outcome::Done, _));
}


#[test]
fn test_call_and_return() {
	let vm = empty_vm();
	let name = mangle_function("", "add", 2);
	let add = function(
		vec![
			Opcode::Load as u8, 0,
			Opcode::Load as u8, 1,
			Opcode::IAdd as u8,
			Opcode::RetV as u8,
		],
		2,
		2,
	);
	let program = program(
		vec![
			Opcode::LoadC as u8, 0,
			Opcode::LoadC as u8, 1,
			Opcode::CallN as u8, 2,
			Opcode::YieldV as u8,
			Opcode::Halt as u8,
		],
		0,
		vec![Value::Int(2), Value::Int(3), Value::from(name.as_str())],
		vec![(name, add)],
	);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(5)));
	assert_eq!(task.depth(), 1);
	assert_eq!(task.stack_size(), 0);
}


#[test]
fn test_yield_inside_call() {
	let vm = empty_vm();
	let name = mangle_function("", "f", 0);
	let f = function(
		vec![
			Opcode::LoadC as u8, 0,
			Opcode::YieldV as u8,
			Opcode::LoadC as u8, 1,
			Opcode::RetV as u8,
		],
		0,
		1,
	);
	let program = program(
		vec![
			Opcode::CallN as u8, 2,
			Opcode::YieldV as u8,
			Opcode::Halt as u8,
		],
		0,
		vec![Value::Int(1), Value::Int(2), Value::from(name.as_str())],
		vec![(name, f)],
	);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(1)));
	assert_eq!(task.depth(), 2);
	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(2)));
	assert_eq!(task.depth(), 1);
	assert_matches!(vm.run(&mut task), (Outcome::Done, _));
}


#[test]
fn test_fail_is_sticky() {
	let vm = empty_vm();
	let program = program(
		vec![Opcode::Fail as u8, 0],
		0,
		vec![Value::from("broken")],
		vec![],
	);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Error, Value::String(s)) if &*s == "broken");
	assert_matches!(vm.run(&mut task), (Outcome::Error, Value::String(s)) if &*s == "broken");
}


#[test]
fn test_division_by_zero_is_sticky() {
	let vm = empty_vm();
	let program = program(
		vec![
			Opcode::LoadC as u8, 0,
			Opcode::LoadC as u8, 1,
			Opcode::IDiv as u8,
			Opcode::Halt as u8,
		],
		0,
		vec![Value::Int(1), Value::Int(0)],
		vec![],
	);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Error, Value::String(s)) if &*s == "division by zero");
	assert_matches!(vm.run(&mut task), (Outcome::Error, Value::String(s)) if &*s == "division by zero");
}


#[test]
fn test_arithmetic() {
	let vm = empty_vm();
	let program = program(
		vec![
			Opcode::LoadC as u8, 0,
			Opcode::LoadC as u8, 1,
			Opcode::IAdd as u8,
			Opcode::YieldV as u8,
			Opcode::LoadC as u8, 2,
			Opcode::F2I as u8,
			Opcode::YieldV as u8,
			Opcode::LoadC as u8, 3,
			Opcode::F2I as u8,
			Opcode::YieldV as u8,
			Opcode::LoadC as u8, 4,
			Opcode::LoadC as u8, 5,
			Opcode::SAdd as u8,
			Opcode::YieldV as u8,
			Opcode::LoadC as u8, 1,
			Opcode::I2F as u8,
			Opcode::FMin as u8,
			Opcode::YieldV as u8,
			Opcode::Halt as u8,
		],
		0,
		vec![
			Value::Int(i64::MAX),
			Value::Int(1),
			Value::Number(2.7),
			Value::Number(-2.7),
			Value::from("wi"),
			Value::from("sp"),
		],
		vec![],
	);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(i64::MIN)));
	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(2)));
	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(-2)));
	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::String(s)) if &*s == "wisp");
	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Number(n)) if n == -1.0);
}


#[test]
fn test_foreign_call() {
	let mut module = Module::new("Test");
	module.add_function(
		"double",
		1,
		Type::Integer,
		|_, task| {
			let value = task.pop();
			task.push(Value::Int(value.as_int() * 2));
		}
	);
	let vm = VmBuilder::new().register(module).build();

	let signature = mangle_function("Test", "double", 1);
	let program = program(
		vec![
			Opcode::LoadC as u8, 0,
			Opcode::CallF as u8, 1,
			Opcode::YieldV as u8,
			Opcode::Halt as u8,
		],
		0,
		vec![Value::Int(21), Value::from(signature.as_str())],
		vec![],
	);
	let mut task = Task::new(&program, 8);

	assert_matches!(vm.run(&mut task), (Outcome::Continue, Value::Int(42)));
	assert!(vm.function_exists("Test", "double", 1));
	assert!(!vm.function_exists("Test", "double", 2));
	assert_eq!(vm.function_type("Test", "double", 1), Type::Integer);
}


#[test]
#[should_panic(expected = "task stack overflow")]
fn test_stack_overflow() {
	let vm = empty_vm();
	let program = program(
		vec![Opcode::LoadYes as u8, Opcode::LoadYes as u8, Opcode::Halt as u8],
		0,
		vec![],
		vec![],
	);
	let mut task = Task::new(&program, 1);
	vm.run(&mut task);
}


#[test]
#[should_panic(expected = "task stack underflow")]
fn test_stack_underflow() {
	let vm = empty_vm();
	// The pop must not reach the script's locals.
	let program = program(vec![Opcode::Pop as u8, Opcode::Halt as u8], 1, vec![], vec![]);
	let mut task = Task::new(&program, 8);
	vm.run(&mut task);
}


#[test]
#[should_panic(expected = "frame stack underflow")]
fn test_frame_underflow() {
	let vm = empty_vm();
	let program = program(vec![Opcode::Ret as u8], 0, vec![], vec![]);
	let mut task = Task::new(&program, 8);
	vm.run(&mut task);
}


#[test]
#[should_panic(expected = "unknown function")]
fn test_unknown_function() {
	let vm = empty_vm();
	let program = program(
		vec![Opcode::CallN as u8, 0, Opcode::Halt as u8],
		0,
		vec![Value::from("_F07missing_$0")],
		vec![],
	);
	let mut task = Task::new(&program, 8);
	vm.run(&mut task);
}


#[test]
fn test_nil_is_never_equal() {
	assert_ne!(Value::Nil, Value::Nil);
	assert_eq!(Value::Int(1), Value::Int(1));
	assert_ne!(Value::Int(1), Value::Number(1.0));
	assert_eq!(Value::from("a"), Value::from("a"));
}


/// Compile and run every script in a directory, checking how each task ends.
fn test_scripts<P, F>(path: P, mut check: F) -> io::Result<()>
where
	P: AsRef<Path>,
	F: FnMut(Outcome) -> bool,
{
	let vm = lib::register(VmBuilder::new()).build();

	tests::util::test_dir(
		path,
		move |path, file| {
			let source = Source::from_reader(path, file)?;
			let mut interner = symbol::Interner::new();

			let program = match compiler::compile(&source, &mut interner, &vm) {
				Ok(program) => program,
				Err(errors) => panic!(
					"File {}:\n{}",
					path.display(),
					fmt::Show(
						&errors,
						ErrorsDisplayContext {
							max_errors: None,
							interner: &interner,
							source: &source,
						}
					)
				),
			};

			let mut task = Task::new(&program, 256);
			let (outcome, value) = loop {
				match vm.run(&mut task) {
					(Outcome::Continue, _) => continue,
					result => break result,
				}
			};

			if !check(outcome) {
				panic!("File {}: unexpected {:?}, with {}", path.display(), outcome, value);
			}

			Ok(())
		}
	)
}


#[test]
fn test_positive() -> io::Result<()> {
	test_scripts("src/runtime/tests/data/positive", |outcome| outcome == Outcome::Done)
}


#[test]
fn test_negative() -> io::Result<()> {
	test_scripts("src/runtime/tests/data/negative", |outcome| outcome == Outcome::Error)
}


#[test]
fn test_invalid() -> io::Result<()> {
	let vm = lib::register(VmBuilder::new()).build();

	tests::util::test_dir(
		"src/runtime/tests/data/invalid",
		|path, file| {
			let source = Source::from_reader(path, file)?;
			let mut interner = symbol::Interner::new();

			if compiler::compile(&source, &mut interner, &vm).is_ok() {
				panic!("File {}: expected compilation errors", path.display());
			}

			Ok(())
		}
	)
}
