use std::{
	collections::HashMap,
	fmt::{self, Display},
};

use super::{Opcode, Value};


/// A compiled function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Function {
	pub bytecode: Box<[u8]>,
	/// Number of local slots, including the parameters.
	pub variable_count: usize,
	pub arity: u8,
}


/// A compiled program.
#[derive(Debug, Default)]
pub struct Program {
	/// The top level code.
	pub script: Function,
	/// User defined functions, keyed by mangled signature.
	pub functions: HashMap<Box<str>, Function>,
	/// The constant pool, shared by all functions.
	pub constants: Box<[Value]>,
}


impl Program {
	/// Get a constant by index. Panics if the index is out of bounds.
	pub fn constant(&self, index: u8) -> &Value {
		&self.constants[index as usize]
	}
}


/// Disassembles the program.
impl Display for Program {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		writeln!(f, "constants:")?;
		for (ix, constant) in self.constants.iter().enumerate() {
			match constant {
				Value::String(string) => writeln!(f, "\t{}:\tString  {:?}", ix, string)?,
				Value::Number(number) => writeln!(f, "\t{}:\tNumber  {}", ix, number)?,
				Value::Int(int) => writeln!(f, "\t{}:\tInteger {}", ix, int)?,
				other => writeln!(f, "\t{}:\t{}", ix, other)?,
			}
		}

		writeln!(f, "script:")?;
		disassemble(f, &self.script, self)?;

		let mut functions: Vec<_> = self.functions.iter().collect();
		functions.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));

		for (name, function) in functions {
			writeln!(f, "function {} (arity {}, locals {}):", name, function.arity, function.variable_count)?;
			disassemble(f, function, self)?;
		}

		Ok(())
	}
}


fn disassemble(
	f: &mut fmt::Formatter,
	function: &Function,
	program: &Program,
) -> fmt::Result {
	let code = &function.bytecode;
	let mut ip = 0;

	while ip < code.len() {
		let address = ip;
		let opcode = match Opcode::from_byte(code[ip]) {
			Some(opcode) => opcode,
			None => {
				writeln!(f, "\t{:04}  <invalid 0x{:02x}>", address, code[ip])?;
				ip += 1;
				continue;
			}
		};

		let end = address + opcode.size();
		if end > code.len() {
			writeln!(f, "\t{:04}  {} <truncated>", address, opcode)?;
			break;
		}

		write!(f, "\t{:04}  {:<10}", address, opcode.mnemonic())?;

		match opcode.operand_size() {
			1 => {
				let operand = code[address + 1];
				match opcode {
					Opcode::LoadC | Opcode::CallF | Opcode::CallN | Opcode::Fail => {
						write!(f, " #{}", operand)?;
						if let Some(constant) = program.constants.get(operand as usize) {
							write!(f, "\t({})", constant)?;
						}
					}
					_ => write!(f, " ${}", operand)?,
				}
			}

			2 => {
				let offset = u16::from_be_bytes([code[address + 1], code[address + 2]]) as usize;
				let target = if opcode.is_backward_jump() {
					end.wrapping_sub(offset)
				} else {
					end + offset
				};
				write!(f, " -> {:04}", target)?;
			}

			_ => (),
		}

		writeln!(f)?;
		ip = end;
	}

	Ok(())
}
