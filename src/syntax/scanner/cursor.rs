use super::SourcePos;


/// A cursor for the source code.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	input: &'a str,
	offset: usize,
	pos: SourcePos,
}


impl<'a> Cursor<'a> {
	pub fn pos(&self) -> SourcePos {
		self.pos
	}


	pub fn offset(&self) -> usize {
		self.offset
	}


	pub fn is_eof(&self) -> bool {
		self.offset == self.input.len()
	}


	pub fn peek(&self) -> Option<char> {
		self.input[self.offset ..].chars().next()
	}


	/// Peek the character after the current one.
	pub fn peek_next(&self) -> Option<char> {
		let mut chars = self.input[self.offset ..].chars();
		chars.next()?;
		chars.next()
	}


	/// The input from the given offset up to the current one.
	pub fn slice_from(&self, start: usize) -> &'a str {
		&self.input[start .. self.offset]
	}


	pub fn step(&mut self) {
		if let Some(c) = self.peek() {
			self.pos.visit(c);
			self.offset += c.len_utf8();
		}
	}
}


impl<'a> From<&'a str> for Cursor<'a> {
	fn from(input: &'a str) -> Self {
		Self {
			input,
			offset: 0,
			pos: SourcePos::default()
		}
	}
}
