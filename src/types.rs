use std::fmt::{self, Display};


/// Static types. The discriminants are bit flags, so that the numeric join can be
/// computed by masking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Type {
	/// Result of an erroneous expression. Suppresses further diagnostics.
	Invalid = 0,
	Void = 1 << 0,
	Bool = 1 << 1,
	Integer = 1 << 2,
	Number = 1 << 3,
	String = 1 << 4,
}


impl Type {
	const NUMERIC: u8 = Type::Integer as u8 | Type::Number as u8;


	pub fn is_valid(self) -> bool {
		self != Self::Invalid
	}


	pub fn is_numeric(self) -> bool {
		(self as u8) & Self::NUMERIC != 0
	}


	/// The common type of two operands.
	/// Equal types join to themselves, and Integer with Number joins to Number. When not
	/// strict, anything joins with String to String. Everything else joins to Invalid.
	pub fn constrain(lhs: Self, rhs: Self, strict: bool) -> Self {
		let mask = lhs as u8 | rhs as u8;

		if lhs == rhs {
			lhs
		} else if mask == Self::NUMERIC {
			Self::Number
		} else if !strict && mask & Self::String as u8 != 0 {
			Self::String
		} else {
			Self::Invalid
		}
	}
}


impl Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			Self::Invalid => "<invalid>",
			Self::Void => "Void",
			Self::Bool => "Bool",
			Self::Integer => "Integer",
			Self::Number => "Number",
			Self::String => "String",
		};

		name.fmt(f)
	}
}
