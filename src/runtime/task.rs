use super::{program::{Function, Program}, Value};


/// A call activation record.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'p> {
	pub function: &'p Function,
	/// The caller's instruction pointer, to be restored on return.
	pub return_ip: usize,
	/// Index of the first local slot. Arguments are the first locals.
	pub base: usize,
	/// Stack size when the frame was entered.
	pub top: usize,
}


/// The suspendable state of a program execution: operand stack, call frames and
/// instruction pointer. A task may be run several times, resuming after each yield.
#[derive(Debug)]
pub struct Task<'p> {
	program: &'p Program,
	stack: Vec<Value>,
	capacity: usize,
	frames: Vec<Frame<'p>>,
	/// Instruction pointer in the active frame's function.
	ip: usize,
}


impl<'p> Task<'p> {
	/// Create a task for the given program, with the given operand stack capacity.
	/// Panics if the capacity is not enough for the script's locals.
	pub fn new(program: &'p Program, capacity: usize) -> Self {
		let mut task = Self {
			program,
			stack: Vec::with_capacity(capacity),
			capacity,
			frames: Vec::new(),
			ip: 0,
		};

		task.frames.push(
			Frame {
				function: &program.script,
				return_ip: 0,
				base: 0,
				top: 0,
			}
		);
		task.reserve_locals(program.script.variable_count);

		task
	}


	pub fn program(&self) -> &'p Program {
		self.program
	}


	/// Push a value to the operand stack.
	/// Panics on overflow.
	pub fn push(&mut self, value: Value) {
		assert!(self.stack.len() < self.capacity, "task stack overflow");
		self.stack.push(value);
	}


	/// Pop a value from the operand stack.
	/// Panics if there are no operands in the active frame.
	pub fn pop(&mut self) -> Value {
		assert!(self.stack.len() > self.floor(), "task stack underflow");
		self.stack
			.pop()
			.expect("stack length checked above")
	}


	/// Peek the top of the operand stack.
	/// Panics if there are no operands in the active frame.
	pub fn peek(&self) -> &Value {
		assert!(self.stack.len() > self.floor(), "task stack underflow");
		&self.stack[self.stack.len() - 1]
	}


	/// Pop the given number of values, returning them in the order they were pushed.
	pub fn args(&mut self, arity: usize) -> Vec<Value> {
		assert!(self.stack.len() >= self.floor() + arity, "task stack underflow");
		self.stack.split_off(self.stack.len() - arity)
	}


	/// Number of operands in the active frame, not counting locals.
	pub fn stack_size(&self) -> usize {
		self.stack.len() - self.floor()
	}


	/// Number of active call frames, including the script's.
	pub fn depth(&self) -> usize {
		self.frames.len()
	}


	pub fn ip(&self) -> usize {
		self.ip
	}


	pub(super) fn next_byte(&mut self) -> u8 {
		let byte = self.frame().function.bytecode[self.ip];
		self.ip += 1;
		byte
	}


	pub(super) fn read16(&mut self) -> u16 {
		let high = self.next_byte();
		let low = self.next_byte();
		u16::from_be_bytes([high, low])
	}


	pub(super) fn jump_forward(&mut self, offset: u16) {
		self.ip += offset as usize;
	}


	pub(super) fn jump_backward(&mut self, offset: u16) {
		self.ip -= offset as usize;
	}


	/// Move the instruction pointer back, so that the last instruction is executed again.
	pub(super) fn rewind(&mut self, size: usize) {
		self.ip -= size;
	}


	pub(super) fn constant(&self, index: u8) -> &'p Value {
		self.program.constant(index)
	}


	/// Push a copy of a local.
	pub(super) fn load(&mut self, slot: u8) {
		let index = self.local_index(slot);
		let value = self.stack[index].clone();
		self.push(value);
	}


	/// Pop a value into a local.
	pub(super) fn store(&mut self, slot: u8) {
		let index = self.local_index(slot);
		let value = self.pop();
		self.stack[index] = value;
	}


	/// Enter a function whose arguments are on the top of the stack.
	pub(super) fn call(&mut self, function: &'p Function) {
		let arity = function.arity as usize;
		assert!(self.stack_size() >= arity, "task stack underflow");

		let top = self.stack.len();
		self.frames.push(
			Frame {
				function,
				return_ip: self.ip,
				base: top - arity,
				top,
			}
		);
		self.ip = 0;
		self.reserve_locals(function.variable_count - arity);
	}


	/// Leave the active function, restoring the caller.
	/// Panics if the active frame is the script's.
	pub(super) fn ret(&mut self) {
		assert!(self.frames.len() > 1, "frame stack underflow");

		let frame = self.frames
			.pop()
			.expect("frame count checked above");

		tracing::trace!(base = frame.base, top = frame.top, "return");

		self.stack.truncate(frame.base);
		self.ip = frame.return_ip;
	}


	fn frame(&self) -> &Frame<'p> {
		self.frames
			.last()
			.expect("task has no frames")
	}


	/// The lowest stack index that may be popped in the active frame.
	fn floor(&self) -> usize {
		let frame = self.frame();
		frame.base + frame.function.variable_count
	}


	fn local_index(&self, slot: u8) -> usize {
		let frame = self.frame();
		assert!((slot as usize) < frame.function.variable_count, "invalid local slot");
		frame.base + slot as usize
	}


	fn reserve_locals(&mut self, count: usize) {
		assert!(self.stack.len() + count <= self.capacity, "task stack overflow");
		self.stack.resize(self.stack.len() + count, Value::Nil);
	}
}
