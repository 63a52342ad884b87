mod cursor;
mod error;
mod token;

use crate::symbol;
use super::{SourcePos, Span};
pub use cursor::Cursor;
pub use error::{Error, ErrorKind};
pub use token::{Keyword, Literal, Operator, OperatorClass, Token, TokenKind, TypeName};


/// The scanner produces tokens on demand. After the end of the input, it keeps producing
/// `Eof` tokens.
#[derive(Debug)]
pub struct Scanner<'a, 'b> {
	cursor: Cursor<'a>,
	interner: &'b mut symbol::Interner,
	/// Whether a line break was consumed since the last token.
	start_of_line: bool,
}


impl<'a, 'b> Scanner<'a, 'b> {
	pub fn new(cursor: Cursor<'a>, interner: &'b mut symbol::Interner) -> Self {
		Self {
			cursor,
			interner,
			start_of_line: true,
		}
	}


	/// Get the interner used for identifiers.
	pub fn interner(&mut self) -> &mut symbol::Interner {
		self.interner
	}


	/// Produce the next token.
	pub fn next_token(&mut self) -> Result<Token, Error> {
		self.skip_trivia();

		let start = self.cursor.offset();
		let pos = self.cursor.pos();
		let start_of_line = std::mem::replace(&mut self.start_of_line, false);

		let kind = match self.cursor.peek() {
			None => Ok(TokenKind::Eof),
			Some(c) if is_identifier_head(c) => Ok(self.identifier()),
			Some(c) if c.is_ascii_digit() => self.number(start, pos),
			Some('"') => self.string(start, pos),
			Some(c) => self.symbol(c, start, pos),
		};

		match kind {
			Ok(kind) => Ok(
				Token {
					kind,
					span: self.span(start, pos),
					start_of_line,
				}
			),

			Err(error) => {
				// The next token inherits the line break.
				self.start_of_line = start_of_line;
				tracing::warn!(%pos, "{}", error.error);
				Err(error)
			}
		}
	}


	/// Skip whitespace and comments, tracking line breaks.
	fn skip_trivia(&mut self) {
		loop {
			match self.cursor.peek() {
				Some('\n') => {
					self.start_of_line = true;
					self.cursor.step();
				}

				Some(c) if c.is_whitespace() => self.cursor.step(),

				Some('#') => {
					while !self.cursor.is_eof() && self.cursor.peek() != Some('\n') {
						self.cursor.step();
					}
				}

				_ => break,
			}
		}
	}


	fn identifier(&mut self) -> TokenKind {
		let start = self.cursor.offset();

		while matches!(self.cursor.peek(), Some(c) if is_identifier_tail(c)) {
			self.cursor.step();
		}

		let ident = self.cursor.slice_from(start);

		match ident {
			"var" => TokenKind::Keyword(Keyword::Var),
			"func" => TokenKind::Keyword(Keyword::Func),
			"if" => TokenKind::Keyword(Keyword::If),
			"guard" => TokenKind::Keyword(Keyword::Guard),
			"else" => TokenKind::Keyword(Keyword::Else),
			"loop" => TokenKind::Keyword(Keyword::Loop),
			"until" => TokenKind::Keyword(Keyword::Until),
			"next" => TokenKind::Keyword(Keyword::Next),
			"stoploop" => TokenKind::Keyword(Keyword::Stoploop),
			"return" => TokenKind::Keyword(Keyword::Return),
			"yield" => TokenKind::Keyword(Keyword::Yield),
			"exit" => TokenKind::Keyword(Keyword::Exit),
			"fail" => TokenKind::Keyword(Keyword::Fail),
			"yes" => TokenKind::Keyword(Keyword::Yes),
			"no" => TokenKind::Keyword(Keyword::No),

			"and" => TokenKind::Operator(Operator::And),
			"or" => TokenKind::Operator(Operator::Or),

			"Integer" => TokenKind::Type(TypeName::Integer),
			"Number" => TokenKind::Type(TypeName::Number),
			"String" => TokenKind::Type(TypeName::String),
			"Bool" => TokenKind::Type(TypeName::Bool),
			"Void" => TokenKind::Type(TypeName::Void),

			ident => TokenKind::Identifier(self.interner.get_or_intern(ident)),
		}
	}


	/// A number is floating point iff the dot is immediately followed by a digit.
	fn number(&mut self, start: usize, pos: SourcePos) -> Result<TokenKind, Error> {
		self.digits();

		let floating = self.cursor.peek() == Some('.')
			&& matches!(self.cursor.peek_next(), Some(c) if c.is_ascii_digit());

		if floating {
			self.cursor.step(); // Dot.
			self.digits();
		}

		let literal = self.cursor.slice_from(start);

		if floating {
			let float = literal
				.parse()
				.expect("lexed float literal should be valid");
			Ok(TokenKind::Literal(Literal::Float(float)))
		} else {
			literal
				.parse()
				.map(|int| TokenKind::Literal(Literal::Int(int)))
				.map_err(|_| Error::integer_overflow(literal, self.span(start, pos)))
		}
	}


	fn digits(&mut self) {
		while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
			self.cursor.step();
		}
	}


	/// String literals have no escape sequences.
	fn string(&mut self, start: usize, pos: SourcePos) -> Result<TokenKind, Error> {
		self.cursor.step(); // Opening quote.
		let contents_start = self.cursor.offset();

		loop {
			match self.cursor.peek() {
				Some('"') => {
					let contents = self.cursor.slice_from(contents_start);
					self.cursor.step();
					return Ok(TokenKind::Literal(Literal::String(contents.into())));
				}

				Some(_) => self.cursor.step(),

				None => return Err(Error::unterminated_string(self.span(start, pos))),
			}
		}
	}


	fn symbol(&mut self, c: char, start: usize, pos: SourcePos) -> Result<TokenKind, Error> {
		let next = self.cursor.peek_next();

		let (kind, length) = match (c, next) {
			('-', Some('>')) => (TokenKind::Arrow, 2),
			('>', Some('=')) => (TokenKind::Operator(Operator::GreaterEquals), 2),
			('<', Some('=')) => (TokenKind::Operator(Operator::LowerEquals), 2),
			('=', Some('=')) => (TokenKind::Operator(Operator::Equals), 2),

			('(', _) => (TokenKind::OpenParens, 1),
			(')', _) => (TokenKind::CloseParens, 1),
			('[', _) => (TokenKind::OpenBracket, 1),
			(']', _) => (TokenKind::CloseBracket, 1),
			('{', _) => (TokenKind::OpenBrace, 1),
			('}', _) => (TokenKind::CloseBrace, 1),
			(',', _) => (TokenKind::Comma, 1),
			('.', _) => (TokenKind::Dot, 1),
			(':', _) => (TokenKind::Colon, 1),
			(';', _) => (TokenKind::Semicolon, 1),
			('+', _) => (TokenKind::Operator(Operator::Plus), 1),
			('-', _) => (TokenKind::Operator(Operator::Minus), 1),
			('*', _) => (TokenKind::Operator(Operator::Times), 1),
			('/', _) => (TokenKind::Operator(Operator::Div), 1),
			('&', _) => (TokenKind::Operator(Operator::Concat), 1),
			('>', _) => (TokenKind::Operator(Operator::Greater), 1),
			('<', _) => (TokenKind::Operator(Operator::Lower), 1),
			('=', _) => (TokenKind::Operator(Operator::Assign), 1),

			(c, _) => {
				self.cursor.step(); // Skip the offending character.
				return Err(Error::unexpected(c, self.span(start, pos)));
			}
		};

		for _ in 0 .. length {
			self.cursor.step();
		}

		Ok(kind)
	}


	fn span(&self, start: usize, pos: SourcePos) -> Span {
		Span {
			offset: start,
			length: self.cursor.offset() - start,
			pos,
		}
	}
}


fn is_identifier_head(c: char) -> bool {
	c == '_' || c.is_alphabetic()
}


fn is_identifier_tail(c: char) -> bool {
	c == '_' || c.is_alphanumeric()
}
