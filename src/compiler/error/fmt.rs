use std::fmt::Display as _;

use super::{Error, Errors, ErrorsDisplayContext, SyntaxError, SyntaxErrorKind};
use crate::{
	fmt::{self, Display},
	symbol,
	syntax::{scanner::{Literal, TokenKind}, Source, Span},
	term::color,
};


/// Describe what the parser was looking for. Payloads of the expected kind are
/// placeholders, so only the category is shown.
fn expected(kind: &TokenKind, f: &mut std::fmt::Formatter, context: &symbol::Interner) -> std::fmt::Result {
	match kind {
		TokenKind::Identifier(_) => "identifier".fmt(f),
		TokenKind::Literal(Literal::Int(_)) => "integer literal".fmt(f),
		TokenKind::Literal(Literal::Float(_)) => "float literal".fmt(f),
		TokenKind::Literal(Literal::String(_)) => "string literal".fmt(f),
		TokenKind::Type(_) => "type name".fmt(f),
		other => other.fmt(f, context),
	}
}


impl<'a> Display<'a> for SyntaxErrorKind {
	type Context = &'a symbol::Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		match self {
			Self::UnexpectedToken { expected: kind, found } => {
				"unexpected ".fmt(f)?;
				found.fmt(f, context)?;
				", expected ".fmt(f)?;
				expected(kind, f, context)
			}

			Self::MissingTerminator(found) => {
				"consecutive statements on a line must be separated by ';', found ".fmt(f)?;
				found.fmt(f, context)
			}

			Self::ExpectedExpression(found) => {
				"expected expression, found ".fmt(f)?;
				found.fmt(f, context)
			}

			Self::InvalidTypeName(found) => {
				"invalid type name ".fmt(f)?;
				found.fmt(f, context)
			}

			Self::ExpectedBlockOrIf(found) => {
				"expected block or if statement after else, found ".fmt(f)?;
				found.fmt(f, context)
			}

			Self::ExpectedFlow(found) => {
				"guard requires a flow statement, found ".fmt(f)?;
				found.fmt(f, context)
			}
		}
	}
}


impl<'a> Display<'a> for SyntaxError {
	type Context = &'a symbol::Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		write!(f, "{} - ", self.span.pos)?;
		self.kind.fmt(f, context)
	}
}


impl<'a> Display<'a> for Error {
	type Context = &'a symbol::Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		match self {
			Self::Lexical(error) => write!(f, "{} - {}", error.span.pos, error.error),
			Self::Syntax(error) => Display::fmt(error, f, context),
			Self::Semantic(error) => Display::fmt(error, f, context),
		}
	}
}


/// We need this in order to be able to implement std::error::Error.
impl std::fmt::Display for SyntaxError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		Display::fmt(self, f, &symbol::Interner::new())
	}
}


/// We need this in order to be able to implement std::error::Error.
impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		Display::fmt(self, f, &symbol::Interner::new())
	}
}


/// We need this in order to be able to implement std::error::Error.
impl std::fmt::Display for Errors {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		for error in self {
			writeln!(f, "{}", error)?;
		}

		Ok(())
	}
}


/// The source line of a span, with the span underlined.
fn snippet(f: &mut std::fmt::Formatter, source: &Source, span: Span) -> std::fmt::Result {
	let line = source.line_at(span.offset);
	let line_start = source.line_start(span.offset);
	let line_end = line_start + line.len();

	let start = span.offset.clamp(line_start, line_end);
	let end = (span.offset + span.length).clamp(start, line_end);

	// Keep tabs so that the marks line up with the source line.
	let padding: String = source.contents[line_start .. start]
		.chars()
		.map(|c| if c == '\t' { '\t' } else { ' ' })
		.collect();

	let width = source.contents[start .. end].chars().count().max(1);

	writeln!(f, "\t{}", line)?;
	writeln!(
		f,
		"\t{}{}",
		padding,
		color::Fg(color::Yellow, format!("^{}", "~".repeat(width - 1)))
	)
}


impl<'a> Display<'a> for Errors {
	type Context = ErrorsDisplayContext<'a>;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		for (ix, error) in self.iter().enumerate() {
			if let Some(max) = context.max_errors {
				if max <= ix {
					writeln!(
						f,
						"{} {}",
						color::Fg(color::Red, self.len() - max),
						color::Fg(color::Red, "more suppressed errors"),
					)?;

					break;
				}
			}

			writeln!(
				f,
				"{}: {}",
				color::Fg(color::Red, "Error"),
				fmt::Show(error, context.interner)
			)?;
			snippet(f, context.source, error.span())?;

			if let Some(note) = error.note() {
				writeln!(
					f,
					"{}: {} - {}",
					color::Fg(color::Blue, "Note"),
					note.span.pos,
					note.message,
				)?;
				snippet(f, context.source, note.span)?;
			}
		}

		Ok(())
	}
}
