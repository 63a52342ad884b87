use std::fmt::Display as _;

use intaglio::{Symbol as SymbolInner, SymbolTable};

use crate::{fmt::Display, term::color};


/// A symbol is a reference to an identifier stored in the symbol interner.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Symbol(SymbolInner);


/// The default symbol is a dummy symbol, which stands for names that failed to parse.
impl Default for Symbol {
	fn default() -> Self {
		Self(SymbolInner::new(0))
	}
}


/// Interns identifiers, module names and the names the compiler looks up by itself.
#[derive(Debug)]
pub struct Interner(SymbolTable);


impl Interner {
	/// Create a new interner, holding only the dummy symbol.
	pub fn new() -> Self {
		let mut interner = SymbolTable::new();
		interner
			.intern("<invalid symbol>")
			.expect("failed to intern symbol");
		Self(interner)
	}


	/// Get the symbol for a string, interning it if needed.
	pub fn get_or_intern<T>(&mut self, value: T) -> Symbol
	where
		T: AsRef<str>,
	{
		let value = value.as_ref();

		if let Some(symbol) = self.0.check_interned(value) {
			return Symbol(symbol);
		}

		Symbol(
			self.0
				.intern(value.to_owned())
				.expect("failed to intern symbol")
		)
	}


	/// Resolve the string for a symbol.
	pub fn resolve(&self, symbol: Symbol) -> Option<&str> {
		self.0.get(symbol.0)
	}


	/// The string for a symbol, or the empty string for symbols from another interner.
	pub fn name(&self, symbol: Symbol) -> &str {
		self.resolve(symbol).unwrap_or_default()
	}


	/// Get the number of interned strings, not including the dummy symbol.
	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.0.len() - 1
	}
}


impl Default for Interner {
	fn default() -> Self {
		Self::new()
	}
}


/// Identifiers are highlighted in diagnostics.
impl<'a> Display<'a> for Symbol {
	type Context = &'a Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter<'_>, context: Self::Context) -> std::fmt::Result {
		if *self == Self::default() {
			"<invalid symbol>".fmt(f)
		} else {
			color::Fg(color::Green, context.name(*self)).fmt(f)
		}
	}
}
