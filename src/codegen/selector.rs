use crate::{
	runtime::Opcode,
	syntax::scanner::Operator,
	types::Type,
};


/// An implicit conversion between static types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
	None,
	IntFloat,
	FloatInt,
	/// A call to `IO.toString/1`.
	ToString,
}


impl Conversion {
	/// The conversion required for a value of type `from` to be used as `to`. Invalid
	/// and incompatible types need no conversion, as they have been reported already.
	pub fn between(from: Type, to: Type) -> Self {
		match (from, to) {
			(Type::Integer, Type::Number) => Self::IntFloat,
			(Type::Number, Type::Integer) => Self::FloatInt,
			(Type::Integer, Type::String)
			| (Type::Number, Type::String)
			| (Type::Bool, Type::String) => Self::ToString,
			_ => Self::None,
		}
	}
}


/// The instruction for a binary operator applied to operands of the given type.
/// Assignment has no instruction of its own.
pub fn binary_instruction(op: Operator, operands: Type) -> Option<Opcode> {
	let opcode = match (op, operands) {
		(Operator::Plus, Type::Integer) => Opcode::IAdd,
		(Operator::Plus, Type::Number) => Opcode::FAdd,
		(Operator::Plus, Type::String) => Opcode::SAdd,
		(Operator::Minus, Type::Integer) => Opcode::ISub,
		(Operator::Minus, Type::Number) => Opcode::FSub,
		(Operator::Times, Type::Integer) => Opcode::IMul,
		(Operator::Times, Type::Number) => Opcode::FMul,
		(Operator::Div, Type::Integer) => Opcode::IDiv,
		(Operator::Div, Type::Number) => Opcode::FDiv,

		(Operator::Concat, Type::String) => Opcode::SAdd,

		(Operator::Lower, Type::Integer) => Opcode::TestIlt,
		(Operator::Lower, Type::Number) => Opcode::TestFlt,
		(Operator::LowerEquals, Type::Integer) => Opcode::TestIltEq,
		(Operator::LowerEquals, Type::Number) => Opcode::TestFltEq,
		(Operator::Greater, Type::Integer) => Opcode::TestIgt,
		(Operator::Greater, Type::Number) => Opcode::TestFgt,
		(Operator::GreaterEquals, Type::Integer) => Opcode::TestIgtEq,
		(Operator::GreaterEquals, Type::Number) => Opcode::TestFgtEq,
		(Operator::Equals, Type::Integer) => Opcode::TestIEq,
		(Operator::Equals, Type::Number) => Opcode::TestFEq,
		(Operator::Equals, Type::String) => Opcode::TestSEq,
		(Operator::Equals, Type::Bool) => Opcode::TestBEq,

		(Operator::And, Type::Bool) => Opcode::LogAnd,
		(Operator::Or, Type::Bool) => Opcode::LogOr,

		_ => return None,
	};

	Some(opcode)
}


/// The instruction for unary minus.
pub fn unary_instruction(operand: Type) -> Option<Opcode> {
	match operand {
		Type::Integer => Some(Opcode::IMin),
		Type::Number => Some(Opcode::FMin),
		_ => None,
	}
}


#[cfg(test)]
mod tests {
	use super::*;


	#[test]
	fn test_conversions() {
		assert_eq!(Conversion::between(Type::Integer, Type::Number), Conversion::IntFloat);
		assert_eq!(Conversion::between(Type::Number, Type::Integer), Conversion::FloatInt);
		assert_eq!(Conversion::between(Type::Bool, Type::String), Conversion::ToString);
		assert_eq!(Conversion::between(Type::String, Type::String), Conversion::None);
		assert_eq!(Conversion::between(Type::Invalid, Type::Number), Conversion::None);
	}


	#[test]
	fn test_selection() {
		assert_eq!(binary_instruction(Operator::Plus, Type::String), Some(Opcode::SAdd));
		assert_eq!(binary_instruction(Operator::GreaterEquals, Type::Number), Some(Opcode::TestFgtEq));
		assert_eq!(binary_instruction(Operator::Equals, Type::Bool), Some(Opcode::TestBEq));
		assert_eq!(binary_instruction(Operator::Minus, Type::String), None);
		assert_eq!(binary_instruction(Operator::Assign, Type::Integer), None);
		assert_eq!(unary_instruction(Type::Number), Some(Opcode::FMin));
		assert_eq!(unary_instruction(Type::Bool), None);
	}
}
