use std::collections::HashMap;

use crate::types::Type;
use super::{
	module::{self, ForeignFunction, Module},
	Opcode,
	Task,
	Value,
};


/// The result of running a task until it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	/// The task halted.
	Done,
	/// The task yielded, and may be resumed.
	Continue,
	/// The task failed.
	Error,
}


/// Collects modules before the VM is built. Once built, the VM's tables are immutable.
#[derive(Debug, Default)]
pub struct VmBuilder {
	functions: HashMap<String, ForeignFunction>,
	variables: HashMap<String, Value>,
}


impl VmBuilder {
	pub fn new() -> Self {
		Self::default()
	}


	/// Merge a module's functions and variables into the dispatch tables.
	pub fn register(mut self, module: Module) -> Self {
		tracing::debug!(module = module.name(), functions = module.functions.len(), "register module");

		self.functions.extend(module.functions);
		self.variables.extend(module.variables);
		self
	}


	pub fn build(self) -> Vm {
		Vm {
			functions: self.functions,
			variables: self.variables,
		}
	}
}


/// The bytecode interpreter. The VM holds the foreign function table, and executes
/// tasks.
#[derive(Debug)]
pub struct Vm {
	functions: HashMap<String, ForeignFunction>,
	variables: HashMap<String, Value>,
}


macro_rules! binary_op {
	($task:ident, $get:ident, |$a:ident, $b:ident| $result:expr) => {{
		let $b = $task.pop().$get();
		let $a = $task.pop().$get();
		$task.push(Value::from($result));
	}};
}


macro_rules! unary_op {
	($task:ident, $get:ident, |$a:ident| $result:expr) => {{
		let $a = $task.pop().$get();
		$task.push(Value::from($result));
	}};
}


impl Vm {
	/// The declared return type of a foreign function, or Invalid if there is no such
	/// function.
	pub fn function_type(&self, module: &str, symbol: &str, arity: u8) -> Type {
		self.functions
			.get(&module::mangle_function(module, symbol, arity))
			.map(|function| function.return_type)
			.unwrap_or(Type::Invalid)
	}


	pub fn function_exists(&self, module: &str, symbol: &str, arity: u8) -> bool {
		self.functions.contains_key(&module::mangle_function(module, symbol, arity))
	}


	/// Get a module variable.
	pub fn variable(&self, module: &str, symbol: &str) -> Option<&Value> {
		self.variables.get(&module::mangle_variable(module, symbol))
	}


	/// Run the task until it halts, yields or fails. A yielded task resumes from where it
	/// stopped when run again. Halted and failed tasks produce the same result if run
	/// again.
	pub fn run(&self, task: &mut Task<'_>) -> (Outcome, Value) {
		loop {
			let byte = task.next_byte();
			let opcode = Opcode::from_byte(byte)
				.unwrap_or_else(|| panic!("invalid opcode 0x{:02x}", byte));

			tracing::trace!(
				ip = task.ip() - 1,
				opcode = opcode.mnemonic(),
				stack = task.stack_size(),
				depth = task.depth(),
				"dispatch"
			);

			match opcode {
				Opcode::Halt => {
					task.rewind(opcode.size());
					return (Outcome::Done, Value::Nil);
				}

				Opcode::LoadC => {
					let index = task.next_byte();
					task.push(task.constant(index).clone());
				}

				Opcode::LoadYes => task.push(Value::Bool(true)),

				Opcode::LoadNo => task.push(Value::Bool(false)),

				Opcode::Load => {
					let slot = task.next_byte();
					task.load(slot);
				}

				Opcode::Store => {
					let slot = task.next_byte();
					task.store(slot);
				}

				Opcode::Pop => {
					task.pop();
				}

				Opcode::FMin => unary_op!(task, as_number, |a| -a),
				Opcode::FAdd => binary_op!(task, as_number, |a, b| a + b),
				Opcode::FSub => binary_op!(task, as_number, |a, b| a - b),
				Opcode::FMul => binary_op!(task, as_number, |a, b| a * b),
				Opcode::FDiv => binary_op!(task, as_number, |a, b| a / b),

				Opcode::IMin => unary_op!(task, as_int, |a| a.wrapping_neg()),
				Opcode::IAdd => binary_op!(task, as_int, |a, b| a.wrapping_add(b)),
				Opcode::ISub => binary_op!(task, as_int, |a, b| a.wrapping_sub(b)),
				Opcode::IMul => binary_op!(task, as_int, |a, b| a.wrapping_mul(b)),

				Opcode::IDiv => {
					let b = task.pop();
					if b.as_int() == 0 {
						// Keep the operands so that running again fails the same way.
						task.push(b);
						task.rewind(opcode.size());
						return (Outcome::Error, Value::from("division by zero"));
					}

					unary_op!(task, as_int, |a| a.wrapping_div(b.as_int()))
				}

				Opcode::I2F => unary_op!(task, as_int, |a| a as f64),
				Opcode::F2I => unary_op!(task, as_number, |a| a as i64),

				Opcode::SAdd => {
					let b = task.pop();
					let a = task.pop();
					let mut result = String::with_capacity(a.as_str().len() + b.as_str().len());
					result.push_str(a.as_str());
					result.push_str(b.as_str());
					task.push(result.into());
				}

				Opcode::LogAnd => binary_op!(task, as_bool, |a, b| a && b),
				Opcode::LogOr => binary_op!(task, as_bool, |a, b| a || b),

				Opcode::TestFlt => binary_op!(task, as_number, |a, b| a < b),
				Opcode::TestFltEq => binary_op!(task, as_number, |a, b| a <= b),
				Opcode::TestFgt => binary_op!(task, as_number, |a, b| a > b),
				Opcode::TestFgtEq => binary_op!(task, as_number, |a, b| a >= b),
				Opcode::TestFEq => binary_op!(task, as_number, |a, b| a == b),

				Opcode::TestIlt => binary_op!(task, as_int, |a, b| a < b),
				Opcode::TestIltEq => binary_op!(task, as_int, |a, b| a <= b),
				Opcode::TestIgt => binary_op!(task, as_int, |a, b| a > b),
				Opcode::TestIgtEq => binary_op!(task, as_int, |a, b| a >= b),
				Opcode::TestIEq => binary_op!(task, as_int, |a, b| a == b),

				Opcode::TestSEq => {
					let b = task.pop();
					let a = task.pop();
					task.push(Value::Bool(a.as_str() == b.as_str()));
				}

				Opcode::TestBEq => binary_op!(task, as_bool, |a, b| a == b),

				Opcode::Jmp => {
					let offset = task.read16();
					task.jump_forward(offset);
				}

				Opcode::RJmp => {
					let offset = task.read16();
					task.jump_backward(offset);
				}

				Opcode::Jnz => {
					let offset = task.read16();
					if task.pop().as_bool() {
						task.jump_forward(offset);
					}
				}

				Opcode::RJnz => {
					let offset = task.read16();
					if task.pop().as_bool() {
						task.jump_backward(offset);
					}
				}

				Opcode::CallF => {
					let index = task.next_byte();
					let signature = task.constant(index).as_str();
					let function = self.functions
						.get(signature)
						.unwrap_or_else(|| panic!("unknown foreign function {}", signature));

					(function.callback)(self, task);
				}

				Opcode::CallN => {
					let index = task.next_byte();
					let signature = task.constant(index).as_str();
					let function = task
						.program()
						.functions
						.get(signature)
						.unwrap_or_else(|| panic!("unknown function {}", signature));

					task.call(function);
				}

				Opcode::Ret => task.ret(),

				Opcode::RetV => {
					let value = task.pop();
					task.ret();
					task.push(value);
				}

				Opcode::Yield => return (Outcome::Continue, Value::Nil),

				Opcode::YieldV => return (Outcome::Continue, task.pop()),

				Opcode::Fail => {
					let index = task.next_byte();
					task.rewind(opcode.size());
					return (Outcome::Error, task.constant(index).clone());
				}

				Opcode::Nop => (),
			}
		}
	}
}
