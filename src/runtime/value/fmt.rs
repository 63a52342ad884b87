use std::fmt::{self, Display};

use super::Value;


/// The textual representation of values, used when printing yielded values.
impl Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Nil => write!(f, "<nil>"),
			Self::Bool(b) => write!(f, "{}", b),
			Self::Int(int) => write!(f, "{}", int),
			Self::Number(number) => write!(f, "{:.6}", number),
			Self::String(string) => write!(f, "{}", string),
		}
	}
}
