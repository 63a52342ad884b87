mod il;
mod selector;
#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::{
	runtime::{self, mangle_function, Opcode, Program, Value},
	types::Type,
};
use il::Instruction;
pub use il::Local;
pub use selector::{binary_instruction, unary_instruction, Conversion};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopKind {
	Count,
	Until,
}


#[derive(Debug, Clone, Copy)]
struct Loop {
	id: usize,
	kind: LoopKind,
}


/// The state of an enclosing function while a nested one is being generated.
#[derive(Debug)]
struct Suspended {
	name: Option<Box<str>>,
	function: il::Function,
	ifs: Vec<usize>,
	loops: Vec<Loop>,
}


/// The code generator. Instructions are appended to the current function as the
/// compiler goes, and may be patched afterwards at recorded patch points.
#[derive(Debug)]
pub struct CodeGen {
	/// The function being generated. The script is the outermost one.
	function: il::Function,
	/// The mangled name of the current function, or None for the script.
	name: Option<Box<str>>,
	/// Open if and guard statements, innermost last.
	ifs: Vec<usize>,
	/// Open loops, innermost last.
	loops: Vec<Loop>,
	suspended: Vec<Suspended>,
	functions: HashMap<Box<str>, runtime::Function>,
	constants: Vec<Value>,
	if_count: usize,
	loop_count: usize,
}


impl CodeGen {
	pub fn new() -> Self {
		Self {
			function: il::Function::new(0),
			name: None,
			ifs: Vec::new(),
			loops: Vec::new(),
			suspended: Vec::new(),
			functions: HashMap::new(),
			constants: Vec::new(),
			if_count: 0,
			loop_count: 0,
		}
	}


	/// The index of the next instruction in the current function.
	pub fn patch_point(&self) -> usize {
		self.function.len()
	}


	pub fn emit(&mut self, opcode: Opcode) {
		self.function.push(Instruction::new(opcode));
	}


	/// Emit a `load_c` for the given value.
	pub fn emit_constant(&mut self, value: Value) {
		let index = self.constant(value);
		self.function.push(Instruction::with_byte(Opcode::LoadC, index));
	}


	/// Emit a call to a user function, given its mangled name.
	pub fn emit_call(&mut self, name: &str) {
		let index = self.constant(name.into());
		self.function.push(Instruction::with_byte(Opcode::CallN, index));
	}


	/// Emit a call to a foreign function, given its mangled name.
	pub fn emit_foreign_call(&mut self, name: &str) {
		let index = self.constant(name.into());
		self.function.push(Instruction::with_byte(Opcode::CallF, index));
	}


	pub fn emit_fail(&mut self, message: &str) {
		let index = self.constant(message.into());
		self.function.push(Instruction::with_byte(Opcode::Fail, index));
	}


	pub fn enter_scope(&mut self) {
		self.function.enter_scope();
	}


	pub fn exit_scope(&mut self) {
		self.function.exit_scope();
	}


	/// Allocate a slot for a new local in the current scope.
	pub fn declare_local(&mut self, local: Local) -> u8 {
		self.function.declare(local)
	}


	/// Emit a `load` of a local. Returns false if there is no such local.
	pub fn emit_load(&mut self, local: Local) -> bool {
		match self.function.slot(local) {
			Some(slot) => {
				self.function.push(Instruction::with_byte(Opcode::Load, slot));
				true
			}
			None => false,
		}
	}


	/// Emit a `store` to a local. Returns false if there is no such local.
	pub fn emit_store(&mut self, local: Local) -> bool {
		match self.function.slot(local) {
			Some(slot) => {
				self.function.push(Instruction::with_byte(Opcode::Store, slot));
				true
			}
			None => false,
		}
	}


	/// Remove a previously emitted instruction.
	pub fn remove(&mut self, at: usize) {
		self.function.remove(at);
	}


	/// Insert a conversion at a patch point.
	pub fn insert_conversion(&mut self, at: usize, conversion: Conversion) {
		let instruction = match conversion {
			Conversion::None => return,
			Conversion::IntFloat => Instruction::new(Opcode::I2F),
			Conversion::FloatInt => Instruction::new(Opcode::F2I),
			Conversion::ToString => {
				let name = mangle_function("IO", "toString", 1);
				Instruction::with_byte(Opcode::CallF, self.constant(name.into()))
			}
		};

		self.function.insert(at, instruction);
	}


	/// Start an if statement, after its condition was emitted.
	pub fn begin_if(&mut self) {
		let id = self.next_if();
		self.function.push(Instruction::jump(Opcode::Jnz, format!("if_{}", id)));
		self.function.push(Instruction::jump(Opcode::Jmp, format!("else_{}", id)));
		self.function.label(format!("if_{}", id));
	}


	/// Finish the then block of the innermost if statement.
	pub fn begin_else(&mut self) {
		let id = self.current_if();
		self.function.push(Instruction::jump(Opcode::Jmp, format!("endif_{}", id)));
		self.function.label(format!("else_{}", id));
	}


	/// Start a guard statement, after its condition was emitted. The flow statement
	/// follows, and the guard is closed with `end_if`.
	pub fn begin_guard(&mut self) {
		let id = self.next_if();
		self.function.push(Instruction::jump(Opcode::Jnz, format!("endif_{}", id)));
	}


	/// Close the innermost if or guard statement.
	pub fn end_if(&mut self) {
		let id = self.ifs
			.pop()
			.expect("no open if statement");
		self.function.label(format!("endif_{}", id));
	}


	/// Start a loop that runs its body `count` times.
	pub fn begin_count_loop(&mut self, count: i64) {
		let id = self.next_loop(LoopKind::Count);
		let counter = Local::Counter(id);
		let slot = self.function.declare(counter);

		self.emit_constant(Value::Int(count));
		self.function.push(Instruction::with_byte(Opcode::Store, slot));

		self.function.label(format!("loop_{}", id));
		self.function.push(Instruction::with_byte(Opcode::Load, slot));
		self.emit_constant(Value::Int(0));
		self.emit(Opcode::TestIEq);
		self.function.push(Instruction::jump(Opcode::Jnz, format!("endloop_{}", id)));
	}


	/// Start a loop that runs its body until a condition holds. The condition must be
	/// emitted next, followed by `until_condition`.
	pub fn begin_until_loop(&mut self) {
		let id = self.next_loop(LoopKind::Until);
		self.function.label(format!("loop_{}", id));
	}


	/// Exit the innermost loop if its condition, on the top of the stack, is true.
	pub fn until_condition(&mut self) {
		let id = self.current_loop().id;
		self.function.push(Instruction::jump(Opcode::Jnz, format!("endloop_{}", id)));
	}


	/// Close the innermost loop.
	pub fn end_loop(&mut self) {
		let Loop { id, kind } = self.loops
			.pop()
			.expect("no open loop");

		if kind == LoopKind::Count {
			let slot = self.function
				.slot(Local::Counter(id))
				.expect("loop counter not declared");

			self.function.label(format!("next_{}", id));
			self.function.push(Instruction::with_byte(Opcode::Load, slot));
			self.emit_constant(Value::Int(1));
			self.emit(Opcode::ISub);
			self.function.push(Instruction::with_byte(Opcode::Store, slot));
		}

		self.function.push(Instruction::jump(Opcode::RJmp, format!("loop_{}", id)));
		self.function.label(format!("endloop_{}", id));
	}


	/// Continue with the next iteration of the innermost loop.
	pub fn emit_next(&mut self) {
		let Loop { id, kind } = self.current_loop();
		let instruction = match kind {
			LoopKind::Count => Instruction::jump(Opcode::Jmp, format!("next_{}", id)),
			LoopKind::Until => Instruction::jump(Opcode::RJmp, format!("loop_{}", id)),
		};
		self.function.push(instruction);
	}


	/// Exit the innermost loop.
	pub fn emit_stoploop(&mut self) {
		let id = self.current_loop().id;
		self.function.push(Instruction::jump(Opcode::Jmp, format!("endloop_{}", id)));
	}


	/// Start generating a user function. The enclosing function is suspended, along with
	/// its open ifs and loops.
	pub fn open_function(&mut self, name: Box<str>, arity: u8) {
		tracing::debug!(function = %name, arity, "open function");

		let enclosing = Suspended {
			name: self.name.replace(name),
			function: std::mem::replace(&mut self.function, il::Function::new(arity)),
			ifs: std::mem::take(&mut self.ifs),
			loops: std::mem::take(&mut self.loops),
		};

		self.suspended.push(enclosing);
	}


	/// Finish the current user function, and resume the enclosing one.
	/// Void functions return implicitly at the end. Other functions fail when their end is
	/// reached.
	pub fn close_function(&mut self, return_type: Type) {
		if return_type == Type::Void {
			self.emit(Opcode::Ret);
		} else {
			self.emit_fail("missing return value");
		}

		let enclosing = self.suspended
			.pop()
			.expect("no open function");

		let name = std::mem::replace(&mut self.name, enclosing.name)
			.expect("script is not a function");
		let function = std::mem::replace(&mut self.function, enclosing.function);
		self.ifs = enclosing.ifs;
		self.loops = enclosing.loops;

		tracing::debug!(
			function = %name,
			instructions = function.len(),
			"close function"
		);

		self.functions.insert(name, function.build());
	}


	/// Finish the script and produce the program.
	pub fn generate(mut self) -> Program {
		assert!(self.suspended.is_empty(), "unclosed function");

		self.emit(Opcode::Halt);

		let program = Program {
			script: self.function.build(),
			functions: self.functions,
			constants: self.constants.into(),
		};

		tracing::debug!(
			functions = program.functions.len(),
			constants = program.constants.len(),
			script = program.script.bytecode.len(),
			"program generated"
		);

		program
	}


	/// Get the pool index of a constant, adding it if needed.
	/// Panics if the pool exceeds 256 entries.
	fn constant(&mut self, value: Value) -> u8 {
		if let Some(index) = self.constants.iter().position(|constant| *constant == value) {
			return index as u8;
		}

		assert!(self.constants.len() < 256, "too many constants");
		self.constants.push(value);
		(self.constants.len() - 1) as u8
	}


	fn next_if(&mut self) -> usize {
		let id = self.if_count;
		self.if_count += 1;
		self.ifs.push(id);
		id
	}


	fn current_if(&self) -> usize {
		*self.ifs
			.last()
			.expect("no open if statement")
	}


	fn next_loop(&mut self, kind: LoopKind) -> usize {
		let id = self.loop_count;
		self.loop_count += 1;
		self.loops.push(Loop { id, kind });
		id
	}


	fn current_loop(&self) -> Loop {
		*self.loops
			.last()
			.expect("no open loop")
	}
}


impl Default for CodeGen {
	fn default() -> Self {
		Self::new()
	}
}
