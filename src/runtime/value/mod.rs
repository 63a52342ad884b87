mod fmt;

use crate::types::Type;


/// A runtime value. Strings are owned and copied on load.
#[derive(Debug, Clone)]
pub enum Value {
	Nil,
	Bool(bool),
	Int(i64),
	Number(f64),
	String(Box<str>),
}


impl Value {
	/// The static type corresponding to the value's kind. Nil has no such type.
	pub fn static_type(&self) -> Type {
		match self {
			Self::Nil => Type::Invalid,
			Self::Bool(_) => Type::Bool,
			Self::Int(_) => Type::Integer,
			Self::Number(_) => Type::Number,
			Self::String(_) => Type::String,
		}
	}


	/// Get the value as a boolean, or false if it is of another kind.
	pub fn as_bool(&self) -> bool {
		match self {
			Self::Bool(b) => *b,
			_ => false,
		}
	}


	/// Get the value as an integer, or zero if it is of another kind.
	pub fn as_int(&self) -> i64 {
		match self {
			Self::Int(int) => *int,
			_ => 0,
		}
	}


	/// Get the value as a number, or zero if it is of another kind.
	pub fn as_number(&self) -> f64 {
		match self {
			Self::Number(number) => *number,
			_ => 0.0,
		}
	}


	/// Get the value as a string, or the empty string if it is of another kind.
	pub fn as_str(&self) -> &str {
		match self {
			Self::String(string) => string,
			_ => "",
		}
	}
}


impl Default for Value {
	fn default() -> Self {
		Self::Nil
	}
}


/// Nil is never equal to anything, not even to Nil.
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Bool(b1), Self::Bool(b2)) => b1 == b2,
			(Self::Int(i1), Self::Int(i2)) => i1 == i2,
			(Self::Number(n1), Self::Number(n2)) => n1 == n2,
			(Self::String(s1), Self::String(s2)) => s1 == s2,
			_ => false,
		}
	}
}


impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}


impl From<i64> for Value {
	fn from(int: i64) -> Self {
		Self::Int(int)
	}
}


impl From<f64> for Value {
	fn from(number: f64) -> Self {
		Self::Number(number)
	}
}


impl From<&str> for Value {
	fn from(string: &str) -> Self {
		Self::String(string.into())
	}
}


impl From<String> for Value {
	fn from(string: String) -> Self {
		Self::String(string.into())
	}
}


impl From<Box<str>> for Value {
	fn from(string: Box<str>) -> Self {
		Self::String(string)
	}
}
