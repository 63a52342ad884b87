pub mod scanner;
mod source;

pub use source::{Source, SourcePos, Span};
