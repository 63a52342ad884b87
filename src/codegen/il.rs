use std::{collections::HashMap, convert::TryFrom};

use crate::{
	runtime::{self, Opcode},
	symbol::Symbol,
};


/// A named local slot. Loop counters are synthetic, so they can't clash with user
/// variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Local {
	Variable(Symbol),
	Counter(usize),
}


/// An instruction operand, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
	None,
	Byte(u8),
	/// A jump target, resolved to a 16 bit displacement when the function is built.
	Label(Box<str>),
}


/// An instruction in the intermediate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
	pub opcode: Opcode,
	pub operand: Operand,
}


impl Instruction {
	pub fn new(opcode: Opcode) -> Self {
		debug_assert_eq!(opcode.operand_size(), 0, "missing operand for {}", opcode);
		Self { opcode, operand: Operand::None }
	}


	pub fn with_byte(opcode: Opcode, byte: u8) -> Self {
		debug_assert_eq!(opcode.operand_size(), 1, "unexpected operand for {}", opcode);
		Self { opcode, operand: Operand::Byte(byte) }
	}


	pub fn jump<L: Into<Box<str>>>(opcode: Opcode, label: L) -> Self {
		debug_assert_eq!(opcode.operand_size(), 2, "{} is not a jump", opcode);
		Self { opcode, operand: Operand::Label(label.into()) }
	}
}


/// A function under construction: an editable instruction list, labels pointing into
/// it, and lexically scoped local slots.
#[derive(Debug)]
pub struct Function {
	arity: u8,
	instructions: Vec<Instruction>,
	/// Label name to instruction index.
	labels: HashMap<Box<str>, usize>,
	scopes: Vec<HashMap<Local, u8>>,
	variable_count: usize,
}


impl Function {
	pub fn new(arity: u8) -> Self {
		Self {
			arity,
			instructions: Vec::new(),
			labels: HashMap::new(),
			scopes: vec![HashMap::new()],
			variable_count: 0,
		}
	}


	/// The number of instructions. This is the index the next instruction will get.
	pub fn len(&self) -> usize {
		self.instructions.len()
	}


	pub fn instructions(&self) -> &[Instruction] {
		&self.instructions
	}


	pub fn push(&mut self, instruction: Instruction) {
		self.instructions.push(instruction);
	}


	/// Insert an instruction at the given index. Labels at or after the index are moved
	/// along with the instructions they point to. Appending moves no labels.
	pub fn insert(&mut self, at: usize, instruction: Instruction) {
		if at < self.instructions.len() {
			for index in self.labels.values_mut() {
				if *index >= at {
					*index += 1;
				}
			}
		}

		self.instructions.insert(at, instruction);
	}


	/// Remove the instruction at the given index. Labels after the index are moved back.
	pub fn remove(&mut self, at: usize) -> Instruction {
		for index in self.labels.values_mut() {
			if *index > at {
				*index -= 1;
			}
		}

		self.instructions.remove(at)
	}


	/// Define a label pointing to the next instruction. The first definition wins.
	pub fn label<L: Into<Box<str>>>(&mut self, name: L) {
		let index = self.instructions.len();
		self.labels.entry(name.into()).or_insert(index);
	}


	pub fn label_index(&self, name: &str) -> Option<usize> {
		self.labels.get(name).copied()
	}


	pub fn enter_scope(&mut self) {
		self.scopes.push(HashMap::new());
	}


	pub fn exit_scope(&mut self) {
		assert!(self.scopes.len() > 1, "attempt to exit the function scope");
		self.scopes.pop();
	}


	/// Allocate a fresh slot for a local in the innermost scope.
	/// Panics if the function exceeds 256 locals.
	pub fn declare(&mut self, local: Local) -> u8 {
		assert!(self.variable_count < 256, "too many local variables");

		let slot = self.variable_count as u8;
		self.variable_count += 1;

		self.scopes
			.last_mut()
			.expect("function has no scopes")
			.insert(local, slot);

		slot
	}


	/// The slot of a local, innermost scope first.
	pub fn slot(&self, local: Local) -> Option<u8> {
		self.scopes
			.iter()
			.rev()
			.find_map(|scope| scope.get(&local).copied())
	}


	/// Resolve labels and encode the function.
	/// Panics on undefined labels, on jumps in the wrong direction for their opcode, and on
	/// displacements that don't fit in 16 bits.
	pub fn build(self) -> runtime::Function {
		let mut addresses = Vec::with_capacity(self.instructions.len() + 1);
		let mut address = 0;
		for instruction in &self.instructions {
			addresses.push(address);
			address += instruction.opcode.size();
		}
		addresses.push(address);

		let mut bytecode = Vec::with_capacity(address);

		for (ix, instruction) in self.instructions.iter().enumerate() {
			let opcode = instruction.opcode;
			bytecode.push(opcode as u8);

			match &instruction.operand {
				Operand::None => (),

				Operand::Byte(byte) => bytecode.push(*byte),

				Operand::Label(label) => {
					let index = self
						.label_index(label)
						.unwrap_or_else(|| panic!("undefined label {}", label));

					let end = addresses[ix] + opcode.size();
					let target = addresses[index];

					if opcode.is_forward_jump() {
						assert!(target >= end, "{} to {} jumps backwards", opcode, label);
					}
					if opcode.is_backward_jump() {
						assert!(target <= end, "{} to {} jumps forward", opcode, label);
					}

					let offset = if target >= end { target - end } else { end - target };
					let offset = u16::try_from(offset)
						.unwrap_or_else(|_| panic!("jump to {} is too far", label));

					bytecode.extend_from_slice(&offset.to_be_bytes());
				}
			}
		}

		runtime::Function {
			bytecode: bytecode.into(),
			variable_count: self.variable_count,
			arity: self.arity,
		}
	}
}
