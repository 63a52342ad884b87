use super::{Compiler, SyntaxError};
use crate::syntax::scanner::{Token, TokenKind};


/// The error recovery state. While recovering, diagnostics are suppressed and the
/// compiler skips tokens until it reaches a synchronization point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Normal,
	Recovering,
}


/// Whether a token is of the expected kind. Identifiers, literals and type names match
/// regardless of their payload.
fn token_matches(found: &TokenKind, expected: &TokenKind) -> bool {
	match (found, expected) {
		(TokenKind::Literal(found), TokenKind::Literal(expected)) => {
			std::mem::discriminant(found) == std::mem::discriminant(expected)
		}

		(_, TokenKind::Identifier(_)) | (_, TokenKind::Type(_)) => found.same_kind(expected),

		_ => found == expected,
	}
}


impl<'s, 'i, 'v> Compiler<'s, 'i, 'v> {
	/// Consume a token of the expected kind.
	/// In normal mode, a mismatch is reported and the compiler starts recovering. While
	/// recovering, tokens are skipped until the expected kind is found, which ends the
	/// recovery.
	pub(super) fn expect(&mut self, expected: TokenKind) -> Option<Token> {
		match self.mode {
			Mode::Normal => {
				if token_matches(&self.token.kind, &expected) {
					Some(self.advance())
				} else {
					let error = SyntaxError::unexpected(expected, self.token.kind.clone(), self.token.span);
					self.syntax_error(error);
					None
				}
			}

			Mode::Recovering => loop {
				if token_matches(&self.token.kind, &expected) {
					self.mode = Mode::Normal;
					return Some(self.advance());
				}

				if self.token.kind == TokenKind::Eof {
					return None;
				}

				self.advance();
			},
		}
	}


	/// Finish a statement. Statements are terminated by a semicolon, a line break, a
	/// closing brace or the end of the file. When recovering, tokens are skipped up to the
	/// next terminator, which ends the recovery.
	pub(super) fn terminator(&mut self) {
		if self.mode == Mode::Normal {
			match self.token.kind {
				TokenKind::Semicolon => {
					self.advance();
					return;
				}

				TokenKind::CloseBrace | TokenKind::Eof => return,

				_ if self.token.start_of_line => return,

				_ => {
					let error = SyntaxError::missing_terminator(self.token.kind.clone(), self.token.span);
					self.syntax_error(error);
				}
			}
		}

		loop {
			match self.token.kind {
				TokenKind::Semicolon => {
					self.advance();
					break;
				}

				TokenKind::CloseBrace | TokenKind::Eof => break,

				_ if self.token.start_of_line => break,

				_ => {
					self.advance();
				}
			}
		}

		self.mode = Mode::Normal;
	}
}
