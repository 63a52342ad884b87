use std::fmt::{self, Display};


macro_rules! opcodes {
	($($name:ident => $mnemonic:literal, $operand:literal;)*) => {
		/// Bytecode instructions. Each opcode is encoded as a single byte, followed by its
		/// operand, if any. 16 bit operands are big endian.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		#[repr(u8)]
		pub enum Opcode {
			$($name,)*
		}


		impl Opcode {
			const ALL: &'static [Opcode] = &[$(Opcode::$name,)*];


			/// The assembly name of the opcode.
			pub fn mnemonic(self) -> &'static str {
				match self {
					$(Self::$name => $mnemonic,)*
				}
			}


			/// The size of the operand in bytes: 0, 1 or 2.
			pub fn operand_size(self) -> usize {
				match self {
					$(Self::$name => $operand,)*
				}
			}
		}
	};
}


opcodes! {
	Halt => "halt", 0;
	LoadC => "load_c", 1;
	LoadYes => "load_yes", 0;
	LoadNo => "load_no", 0;
	Load => "load", 1;
	Store => "store", 1;
	Pop => "pop", 0;

	FMin => "fmin", 0;
	FAdd => "fadd", 0;
	FSub => "fsub", 0;
	FMul => "fmul", 0;
	FDiv => "fdiv", 0;

	IMin => "imin", 0;
	IAdd => "iadd", 0;
	ISub => "isub", 0;
	IMul => "imul", 0;
	IDiv => "idiv", 0;

	I2F => "i2f", 0;
	F2I => "f2i", 0;

	SAdd => "sadd", 0;

	LogAnd => "log_and", 0;
	LogOr => "log_or", 0;

	TestFlt => "test_flt", 0;
	TestFltEq => "test_flteq", 0;
	TestFgt => "test_fgt", 0;
	TestFgtEq => "test_fgteq", 0;
	TestFEq => "test_feq", 0;

	TestIlt => "test_ilt", 0;
	TestIltEq => "test_ilteq", 0;
	TestIgt => "test_igt", 0;
	TestIgtEq => "test_igteq", 0;
	TestIEq => "test_ieq", 0;

	TestSEq => "test_seq", 0;
	TestBEq => "test_beq", 0;

	Jmp => "jmp", 2;
	RJmp => "rjmp", 2;
	Jnz => "jnz", 2;
	RJnz => "rjnz", 2;

	CallF => "call_f", 1;
	CallN => "call_n", 1;
	Ret => "ret", 0;
	RetV => "ret_v", 0;

	Yield => "yield", 0;
	YieldV => "yield_v", 0;
	Fail => "fail", 1;
	Nop => "nop", 0;
}


impl Opcode {
	/// Decode an opcode byte.
	pub fn from_byte(byte: u8) -> Option<Self> {
		Self::ALL.get(byte as usize).copied()
	}


	/// The encoded size of the instruction, including the operand.
	pub fn size(self) -> usize {
		1 + self.operand_size()
	}


	/// Jumps whose target is after the instruction.
	pub fn is_forward_jump(self) -> bool {
		matches!(self, Self::Jmp | Self::Jnz)
	}


	/// Jumps whose target is before the end of the instruction.
	pub fn is_backward_jump(self) -> bool {
		matches!(self, Self::RJmp | Self::RJnz)
	}
}


impl Display for Opcode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.mnemonic().fmt(f)
	}
}
