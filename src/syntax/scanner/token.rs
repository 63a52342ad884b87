use std::fmt::Display as _;

use super::Span;
use crate::{
	fmt::Display,
	symbol::{self, Symbol},
};


/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
	Var,
	Func,
	If,
	Guard,
	Else,
	Loop,
	Until,
	Next,
	Stoploop,
	Return,
	Yield,
	Exit,
	Fail,
	Yes,
	No,
}


impl Keyword {
	/// Flow statements may be used as the body of a guard.
	pub fn is_flow(&self) -> bool {
		matches!(
			self,
			Self::Next | Self::Stoploop | Self::Return | Self::Yield | Self::Exit | Self::Fail
		)
	}


	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Var => "var",
			Self::Func => "func",
			Self::If => "if",
			Self::Guard => "guard",
			Self::Else => "else",
			Self::Loop => "loop",
			Self::Until => "until",
			Self::Next => "next",
			Self::Stoploop => "stoploop",
			Self::Return => "return",
			Self::Yield => "yield",
			Self::Exit => "exit",
			Self::Fail => "fail",
			Self::Yes => "yes",
			Self::No => "no",
		}
	}
}


/// Built-in type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
	Integer,
	Number,
	String,
	Bool,
	Void,
}


impl TypeName {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Integer => "Integer",
			Self::Number => "Number",
			Self::String => "String",
			Self::Bool => "Bool",
			Self::Void => "Void",
		}
	}
}


/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
	Int(i64),
	Float(f64),
	String(Box<str>),
}


/// How an operator is type checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
	Arithmetic,
	String,
	Relational,
	Logical,
	Assignment,
}


/// Operators. Only `-` may be used in unary position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
	Plus,
	Minus,
	Times,
	Div,
	Concat,
	Greater,
	Lower,
	GreaterEquals,
	LowerEquals,
	Equals,
	And,
	Or,
	Assign,
}


impl Operator {
	/// The binding power of the operator when used as a binary operator.
	pub fn precedence(&self) -> u8 {
		match self {
			Self::Times | Self::Div => 90,
			Self::Plus | Self::Minus | Self::Concat => 80,
			Self::Greater | Self::Lower | Self::GreaterEquals | Self::LowerEquals => 60,
			Self::Equals => 50,
			Self::And => 10,
			Self::Or => 9,
			Self::Assign => 0,
		}
	}


	/// All current operators are left associative.
	pub fn is_right_associative(&self) -> bool {
		false
	}


	pub fn is_unary(&self) -> bool {
		matches!(self, Self::Minus)
	}


	pub fn class(&self) -> OperatorClass {
		match self {
			Self::Plus | Self::Minus | Self::Times | Self::Div => OperatorClass::Arithmetic,
			Self::Concat => OperatorClass::String,
			Self::Greater
			| Self::Lower
			| Self::GreaterEquals
			| Self::LowerEquals
			| Self::Equals => OperatorClass::Relational,
			Self::And | Self::Or => OperatorClass::Logical,
			Self::Assign => OperatorClass::Assignment,
		}
	}


	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Plus => "+",
			Self::Minus => "-",
			Self::Times => "*",
			Self::Div => "/",
			Self::Concat => "&",
			Self::Greater => ">",
			Self::Lower => "<",
			Self::GreaterEquals => ">=",
			Self::LowerEquals => "<=",
			Self::Equals => "==",
			Self::And => "and",
			Self::Or => "or",
			Self::Assign => "=",
		}
	}
}


/// The kind of a token. This is a closed set.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
	Identifier(Symbol),
	Keyword(Keyword),
	Type(TypeName),
	Literal(Literal),
	Operator(Operator),
	OpenParens, // (
	CloseParens, // )
	OpenBracket, // [
	CloseBracket, // ]
	OpenBrace, // {
	CloseBrace, // }
	Comma,
	Dot,
	Colon,
	Semicolon,
	Arrow, // ->
	Eof,
}


impl TokenKind {
	/// Whether the token may start an expression.
	pub fn is_term_start(&self) -> bool {
		matches!(
			self,
			Self::Identifier(_)
				| Self::Literal(_)
				| Self::Keyword(Keyword::Yes)
				| Self::Keyword(Keyword::No)
				| Self::OpenParens
				| Self::OpenBracket
				| Self::Operator(Operator::Minus)
		)
	}


	/// The operator, if this token is one usable in binary position.
	pub fn binary_operator(&self) -> Option<Operator> {
		match self {
			Self::Operator(op) => Some(*op),
			_ => None,
		}
	}


	/// Compare only the discriminant, ignoring payloads.
	pub fn same_kind(&self, other: &Self) -> bool {
		std::mem::discriminant(self) == std::mem::discriminant(other)
	}
}


/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	pub span: Span,
	/// Whether the token is the first one in its line.
	pub start_of_line: bool,
}


impl<'a> Display<'a> for TokenKind {
	type Context = &'a symbol::Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter<'_>, context: Self::Context) -> std::fmt::Result {
		match self {
			Self::Identifier(symbol) => {
				"identifier '".fmt(f)?;
				symbol.fmt(f, context)?;
				"'".fmt(f)
			}
			Self::Keyword(keyword) => write!(f, "keyword '{}'", keyword.as_str()),
			Self::Type(name) => write!(f, "type '{}'", name.as_str()),
			Self::Literal(Literal::Int(int)) => write!(f, "integer literal {}", int),
			Self::Literal(Literal::Float(float)) => write!(f, "float literal {}", float),
			Self::Literal(Literal::String(string)) => write!(f, "string literal {:?}", string),
			Self::Operator(op) => write!(f, "'{}'", op.as_str()),
			Self::OpenParens => "'('".fmt(f),
			Self::CloseParens => "')'".fmt(f),
			Self::OpenBracket => "'['".fmt(f),
			Self::CloseBracket => "']'".fmt(f),
			Self::OpenBrace => "'{'".fmt(f),
			Self::CloseBrace => "'}'".fmt(f),
			Self::Comma => "','".fmt(f),
			Self::Dot => "'.'".fmt(f),
			Self::Colon => "':'".fmt(f),
			Self::Semicolon => "';'".fmt(f),
			Self::Arrow => "'->'".fmt(f),
			Self::Eof => "end of file".fmt(f),
		}
	}
}
