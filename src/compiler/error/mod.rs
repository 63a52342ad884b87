mod fmt;

use crate::{
	semantic,
	symbol,
	syntax::{scanner::{self, TokenKind}, Source, Span},
};


/// The kind of syntax error.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
	/// A token other than the one required by the grammar.
	UnexpectedToken { expected: TokenKind, found: TokenKind },
	/// Two statements on the same line without a semicolon.
	MissingTerminator(TokenKind),
	/// A token that can't start an expression.
	ExpectedExpression(TokenKind),
	/// A token that is not a type name.
	InvalidTypeName(TokenKind),
	/// An else not followed by a block or an if.
	ExpectedBlockOrIf(TokenKind),
	/// A guard not followed by a flow statement.
	ExpectedFlow(TokenKind),
}


/// A syntax error.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
	pub kind: SyntaxErrorKind,
	pub span: Span,
}


impl SyntaxError {
	pub fn unexpected(expected: TokenKind, found: TokenKind, span: Span) -> Self {
		Self {
			kind: SyntaxErrorKind::UnexpectedToken { expected, found },
			span,
		}
	}


	pub fn missing_terminator(found: TokenKind, span: Span) -> Self {
		Self { kind: SyntaxErrorKind::MissingTerminator(found), span }
	}


	pub fn expected_expression(found: TokenKind, span: Span) -> Self {
		Self { kind: SyntaxErrorKind::ExpectedExpression(found), span }
	}


	pub fn invalid_type_name(found: TokenKind, span: Span) -> Self {
		Self { kind: SyntaxErrorKind::InvalidTypeName(found), span }
	}


	pub fn expected_block_or_if(found: TokenKind, span: Span) -> Self {
		Self { kind: SyntaxErrorKind::ExpectedBlockOrIf(found), span }
	}


	pub fn expected_flow(found: TokenKind, span: Span) -> Self {
		Self { kind: SyntaxErrorKind::ExpectedFlow(found), span }
	}
}


impl std::error::Error for SyntaxError { }


/// A compilation diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	Lexical(scanner::Error),
	Syntax(SyntaxError),
	Semantic(semantic::Error),
}


impl Error {
	/// The region of the source code the error refers to.
	pub fn span(&self) -> Span {
		match self {
			Self::Lexical(error) => error.span,
			Self::Syntax(error) => error.span,
			Self::Semantic(error) => error.span,
		}
	}


	pub fn note(&self) -> Option<&semantic::Note> {
		match self {
			Self::Semantic(error) => error.note.as_ref(),
			_ => None,
		}
	}
}


impl From<scanner::Error> for Error {
	fn from(error: scanner::Error) -> Self {
		Self::Lexical(error)
	}
}


impl From<SyntaxError> for Error {
	fn from(error: SyntaxError) -> Self {
		Self::Syntax(error)
	}
}


impl From<semantic::Error> for Error {
	fn from(error: semantic::Error) -> Self {
		Self::Semantic(error)
	}
}


impl std::error::Error for Error { }


/// A collection of diagnostics, in emission order.
#[derive(Debug, Default)]
pub struct Errors(Vec<Error>);


impl Errors {
	pub fn new() -> Self {
		Self::default()
	}


	pub fn push<E: Into<Error>>(&mut self, error: E) {
		self.0.push(error.into());
	}


	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}


	pub fn len(&self) -> usize {
		self.0.len()
	}


	pub fn iter(&self) -> std::slice::Iter<Error> {
		self.0.iter()
	}
}


impl IntoIterator for Errors {
	type Item = Error;
	type IntoIter = std::vec::IntoIter<Error>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}


impl<'a> IntoIterator for &'a Errors {
	type Item = &'a Error;
	type IntoIter = std::slice::Iter<'a, Error>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}


impl Extend<Error> for Errors {
	fn extend<T: IntoIterator<Item = Error>>(&mut self, iter: T) {
		self.0.extend(iter);
	}
}


impl std::error::Error for Errors { }


/// Context for displaying diagnostics along with the offending source lines.
#[derive(Debug, Clone, Copy)]
pub struct ErrorsDisplayContext<'a> {
	/// Maximum number of diagnostics to display.
	pub max_errors: Option<usize>,
	pub interner: &'a symbol::Interner,
	pub source: &'a Source,
}
