use std::{
	fmt::{self, Display},
	fs::File,
	path::Path,
};


/// Wisp source code.
#[derive(Debug)]
pub struct Source {
	/// The origin path, may be something fictional like `<test>`.
	pub path: Box<Path>,
	/// The source code.
	pub contents: Box<str>,
}


impl Source {
	/// Load the source code from a file path.
	pub fn from_path<P>(path: P) -> std::io::Result<Self>
	where
		P: Into<Box<Path>>,
	{
		let path = path.into();
		let file = File::open(&path)?;
		Self::from_reader(path, file)
	}


	/// Load the source code from a std::io::Read.
	/// The path argument may be anything, including fictional paths like `<test>`.
	/// Fails with `InvalidData` if the contents are not valid UTF-8.
	pub fn from_reader<P, R>(path: P, mut reader: R) -> std::io::Result<Self>
	where
		P: Into<Box<Path>>,
		R: std::io::Read,
	{
		let path = path.into();
		let mut contents = String::with_capacity(512); // Expect a few characters.
		reader.read_to_string(&mut contents)?;

		Ok(Self { path, contents: contents.into() })
	}


	/// Build a source from a string, mostly for tests.
	#[cfg(test)]
	pub fn from_str(contents: &str) -> Self {
		Self {
			path: Path::new("<test>").into(),
			contents: contents.into(),
		}
	}


	/// Get the whole line that contains the given byte offset, without the line break.
	pub fn line_at(&self, offset: usize) -> &str {
		let offset = offset.min(self.contents.len());
		let start = self.line_start(offset);

		let end = self.contents[offset ..]
			.find('\n')
			.map(|ix| offset + ix)
			.unwrap_or_else(|| self.contents.len());

		self.contents[start .. end].trim_end_matches('\r')
	}


	/// Get the byte offset of the start of the line that contains the given byte offset.
	pub fn line_start(&self, offset: usize) -> usize {
		let offset = offset.min(self.contents.len());

		self.contents[.. offset]
			.rfind('\n')
			.map(|ix| ix + 1)
			.unwrap_or(0)
	}
}


/// A human readable position in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePos {
	pub line: u32,
	pub column: u32,
}


impl SourcePos {
	pub fn visit(&mut self, input: char) {
		if input == '\n' {
			self.line += 1;
			self.column = 0;
		} else {
			self.column += 1;
		}
	}
}


impl Default for SourcePos {
	fn default() -> Self {
		Self { line: 1, column: 0 }
	}
}


impl Display for SourcePos {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "line {}, column {}", self.line, self.column)
	}
}


/// A region of the source code: byte offset and length, plus the human readable position
/// of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
	pub offset: usize,
	pub length: usize,
	pub pos: SourcePos,
}
