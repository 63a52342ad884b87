use std::fmt::{self, Display};

use super::Span;


/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
	/// Unexpected character.
	Unexpected(char),
	/// String literal missing the closing quote.
	UnterminatedString,
	/// Integer literal that doesn't fit in 64 bits.
	IntegerOverflow(Box<str>),
}


/// A lexical error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
	pub error: ErrorKind,
	pub span: Span,
}


impl std::error::Error for Error {}


impl Error {
	pub fn unexpected(input: char, span: Span) -> Self {
		Self { error: ErrorKind::Unexpected(input), span }
	}

	pub fn unterminated_string(span: Span) -> Self {
		Self { error: ErrorKind::UnterminatedString, span }
	}

	pub fn integer_overflow(literal: &str, span: Span) -> Self {
		Self {
			error: ErrorKind::IntegerOverflow(literal.into()),
			span,
		}
	}
}


impl Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Unexpected(input) => write!(f, "unexpected character {:?}", input),
			Self::UnterminatedString => write!(f, "unterminated string literal"),
			Self::IntegerOverflow(literal) => write!(f, "integer literal {} is too large", literal),
		}
	}
}


impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} - {}.", self.span.pos, self.error)
	}
}
