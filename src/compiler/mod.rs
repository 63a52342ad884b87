mod error;
mod sync;

use std::convert::TryFrom;

use crate::{
	codegen::{self, CodeGen, Conversion, Local},
	runtime::{mangle_function, Opcode, Program, Value, Vm},
	semantic::{self, ScopeKind, Sema, TypeExpr},
	symbol::{self, Symbol},
	syntax::{
		scanner::{Cursor, Keyword, Literal, Operator, Scanner, Token, TokenKind, TypeName},
		Source,
		Span,
	},
	types::Type,
};
pub use error::{Error, Errors, ErrorsDisplayContext, SyntaxError, SyntaxErrorKind};
use sync::Mode;


/// A compiled call argument.
#[derive(Debug, Clone, Copy)]
struct Argument {
	ty: Type,
	/// Patch point after the argument's code.
	end: usize,
	span: Span,
}


/// The single pass compiler: parses, type checks and generates code as tokens are
/// consumed.
#[derive(Debug)]
pub struct Compiler<'s, 'i, 'v> {
	scanner: Scanner<'s, 'i>,
	sema: Sema<'v>,
	codegen: CodeGen,
	mode: Mode,
	errors: Errors,
	/// The current token.
	token: Token,
}


impl<'s, 'i, 'v> Compiler<'s, 'i, 'v> {
	/// Create a compiler for the given source. Foreign functions and module variables are
	/// resolved against the VM.
	pub fn new(source: &'s Source, interner: &'i mut symbol::Interner, vm: &'v Vm) -> Self {
		let cursor = Cursor::from(&*source.contents);

		let mut compiler = Self {
			scanner: Scanner::new(cursor, interner),
			sema: Sema::new(vm),
			codegen: CodeGen::new(),
			mode: Mode::Normal,
			errors: Errors::new(),
			token: Token {
				kind: TokenKind::Eof,
				span: Span::default(),
				start_of_line: true,
			},
		};

		compiler.advance();
		compiler
	}


	/// Compile the whole source. The program is produced only if there are no
	/// diagnostics.
	pub fn compile(mut self) -> Result<Program, Errors> {
		loop {
			self.block();

			if self.at(&TokenKind::Eof) {
				break;
			}

			// Unbalanced closing brace.
			let error = SyntaxError::unexpected(TokenKind::Eof, TokenKind::CloseBrace, self.token.span);
			self.syntax_error(error);
			self.advance();
			self.mode = Mode::Normal;
		}

		if self.errors.is_empty() {
			Ok(self.codegen.generate())
		} else {
			Err(self.errors)
		}
	}


	/// Move to the next token, returning the previous one. Lexical errors are collected,
	/// and the offending input skipped.
	fn advance(&mut self) -> Token {
		loop {
			match self.scanner.next_token() {
				Ok(token) => return std::mem::replace(&mut self.token, token),
				Err(error) => self.errors.push(error),
			}
		}
	}


	fn at(&self, kind: &TokenKind) -> bool {
		self.token.kind == *kind
	}


	fn at_keyword(&self, keyword: Keyword) -> bool {
		self.token.kind == TokenKind::Keyword(keyword)
	}


	/// Whether the current token is an operand for a flow statement in the same line.
	fn has_operand(&self) -> bool {
		self.token.kind.is_term_start() && !self.token.start_of_line
	}


	fn syntax_error(&mut self, error: SyntaxError) {
		if self.mode == Mode::Normal {
			self.errors.push(error);
			self.mode = Mode::Recovering;
		}
	}


	/// Report a semantic error. Semantic errors don't affect the recovery mode.
	fn report(&mut self, error: semantic::Error) {
		if self.mode == Mode::Normal {
			self.errors.push(error);
		}
	}


	/// Report the error of a semantic check, if any.
	fn check<T>(&mut self, result: Result<T, semantic::Error>) -> Option<T> {
		match result {
			Ok(value) => Some(value),
			Err(error) => {
				self.report(error);
				None
			}
		}
	}


	/// Parameter and argument counts must fit the arity byte.
	fn arity(&mut self, count: usize, span: Span) -> Option<u8> {
		let result = u8::try_from(count)
			.map_err(|_| semantic::Error::too_many_arguments(count, span));
		self.check(result)
	}


	fn resolve(&mut self, symbol: Symbol) -> String {
		self.scanner
			.interner()
			.name(symbol)
			.to_owned()
	}


	fn expect_identifier(&mut self) -> Option<(Symbol, Span)> {
		match self.expect(TokenKind::Identifier(Symbol::default()))? {
			Token { kind: TokenKind::Identifier(symbol), span, .. } => Some((symbol, span)),
			_ => None,
		}
	}


	fn type_name(&mut self) -> Type {
		let name = match self.token.kind {
			TokenKind::Type(name) => name,
			_ => {
				let error = SyntaxError::invalid_type_name(self.token.kind.clone(), self.token.span);
				self.syntax_error(error);
				return Type::Invalid;
			}
		};

		self.advance();

		match name {
			TypeName::Integer => Type::Integer,
			TypeName::Number => Type::Number,
			TypeName::String => Type::String,
			TypeName::Bool => Type::Bool,
			TypeName::Void => Type::Void,
		}
	}


	/// Statements up to a closing brace or the end of the file.
	fn block(&mut self) {
		while !self.at(&TokenKind::CloseBrace) && !self.at(&TokenKind::Eof) {
			let offset = self.token.span.offset;

			self.statement();
			self.terminator();

			// A token that can't start a statement.
			if self.token.span.offset == offset
				&& !self.at(&TokenKind::CloseBrace)
				&& !self.at(&TokenKind::Eof) {
				self.advance();
			}
		}
	}


	/// A braced block with its own scope.
	fn scoped_block(&mut self, kind: ScopeKind) {
		self.expect(TokenKind::OpenBrace);

		self.sema.enter_scope(kind);
		self.codegen.enter_scope();

		self.block();

		self.codegen.exit_scope();
		self.sema.exit_scope();

		self.expect(TokenKind::CloseBrace);
	}


	fn statement(&mut self) {
		match self.token.kind {
			TokenKind::Keyword(Keyword::Var) => self.variable_declaration(),
			TokenKind::Keyword(Keyword::Func) => self.function_declaration(),
			TokenKind::Keyword(Keyword::If) => self.if_statement(),
			TokenKind::Keyword(Keyword::Guard) => self.guard_statement(),
			TokenKind::Keyword(Keyword::Loop) => self.count_loop(),
			TokenKind::Keyword(Keyword::Until) => self.until_loop(),
			TokenKind::Keyword(keyword) if keyword.is_flow() => self.flow_statement(keyword),
			_ => self.expression_statement(),
		}
	}


	fn variable_declaration(&mut self) {
		self.advance(); // var

		let name = self.expect_identifier();
		self.expect(TokenKind::Operator(Operator::Assign));

		// The initializer can't see the variable being declared.
		let value = self.expression(0);

		if let Some((symbol, span)) = name {
			let result = self.sema.declare_variable(symbol, span, value.ty);
			self.check(result);

			let local = Local::Variable(symbol);
			self.codegen.declare_local(local);

			if value.ty.is_valid() && value.ty != Type::Void {
				self.codegen.emit_store(local);
			}
		}
	}


	fn function_declaration(&mut self) {
		self.advance(); // func

		let name = self.expect_identifier();
		self.expect(TokenKind::Operator(Operator::Assign));
		self.expect(TokenKind::OpenBracket);

		let mut params = Vec::new();
		if !self.at(&TokenKind::CloseBracket) {
			loop {
				let param = self.expect_identifier();
				self.expect(TokenKind::Colon);
				let ty = self.type_name();

				if let Some((symbol, span)) = param {
					params.push((symbol, span, ty));
				}

				if self.at(&TokenKind::Comma) {
					self.advance();
				} else {
					break;
				}
			}
		}

		self.expect(TokenKind::CloseBracket);
		self.expect(TokenKind::Colon);
		let return_type = self.type_name();

		let (symbol, span) = name.unwrap_or_default();
		let arity = self.arity(params.len(), span);

		if self.sema.scope_kind() != ScopeKind::Global {
			self.report(semantic::Error::nested_function(symbol, span));
		}

		// Declared before the body, so that it may be called recursively.
		if name.is_some() && arity.is_some() {
			let types = params
				.iter()
				.map(|&(_, _, ty)| ty)
				.collect();
			let result = self.sema.declare_function(symbol, span, types, return_type);
			self.check(result);
		}

		let arity = arity.unwrap_or_default();
		let mangled = mangle_function("", &self.resolve(symbol), arity);
		self.codegen.open_function(mangled.into(), arity);
		self.sema.enter_scope(ScopeKind::Function { return_type });

		for (symbol, span, ty) in params {
			let result = self.sema.declare_variable(symbol, span, ty);
			self.check(result);
			self.codegen.declare_local(Local::Variable(symbol));
		}

		self.expect(TokenKind::OpenBrace);
		self.block();
		self.expect(TokenKind::CloseBrace);

		self.sema.exit_scope();
		self.codegen.close_function(return_type);
	}


	fn if_statement(&mut self) {
		self.advance(); // if

		self.condition();
		self.codegen.begin_if();

		self.scoped_block(ScopeKind::Block);
		self.codegen.begin_else();

		if self.at_keyword(Keyword::Else) {
			self.advance();

			match self.token.kind {
				TokenKind::Keyword(Keyword::If) => self.if_statement(),
				TokenKind::OpenBrace => self.scoped_block(ScopeKind::Block),
				_ => {
					let error = SyntaxError::expected_block_or_if(self.token.kind.clone(), self.token.span);
					self.syntax_error(error);
				}
			}
		}

		self.codegen.end_if();
	}


	fn guard_statement(&mut self) {
		self.advance(); // guard

		self.condition();
		self.codegen.begin_guard();

		self.expect(TokenKind::Keyword(Keyword::Else));

		match self.token.kind {
			TokenKind::Keyword(keyword) if keyword.is_flow() => self.flow_statement(keyword),
			_ => {
				let error = SyntaxError::expected_flow(self.token.kind.clone(), self.token.span);
				self.syntax_error(error);
			}
		}

		self.codegen.end_if();
	}


	fn count_loop(&mut self) {
		self.advance(); // loop

		let count = match self.expect(TokenKind::Literal(Literal::Int(0))) {
			Some(Token { kind: TokenKind::Literal(Literal::Int(count)), .. }) => count,
			_ => 0,
		};

		self.codegen.begin_count_loop(count);
		self.scoped_block(ScopeKind::Loop);
		self.codegen.end_loop();
	}


	fn until_loop(&mut self) {
		self.advance(); // until

		self.codegen.begin_until_loop();
		self.condition();
		self.codegen.until_condition();

		self.scoped_block(ScopeKind::Loop);
		self.codegen.end_loop();
	}


	/// A boolean condition for if, guard or until.
	fn condition(&mut self) {
		let span = self.token.span;
		let condition = self.expression(0);

		if condition.ty.is_valid() && condition.ty != Type::Bool {
			self.report(semantic::Error::non_bool_condition(condition.ty, span));
		}
	}


	fn flow_statement(&mut self, keyword: Keyword) {
		let span = self.advance().span;

		match keyword {
			Keyword::Next | Keyword::Stoploop => {
				if !self.sema.in_loop() {
					self.report(semantic::Error::outside_loop(keyword, span));
				} else if keyword == Keyword::Next {
					self.codegen.emit_next();
				} else {
					self.codegen.emit_stoploop();
				}
			}

			Keyword::Yield => {
				let ty = if self.has_operand() {
					self.expression(0).ty
				} else {
					Type::Void
				};

				match ty {
					Type::Invalid => (),
					Type::Void => self.codegen.emit(Opcode::Yield),
					_ => self.codegen.emit(Opcode::YieldV),
				}
			}

			Keyword::Return => self.return_statement(span),

			Keyword::Exit => self.codegen.emit(Opcode::Halt),

			Keyword::Fail => {
				let message = self.expect(TokenKind::Literal(Literal::String("".into())));
				if let Some(Token { kind: TokenKind::Literal(Literal::String(message)), .. }) = message {
					self.codegen.emit_fail(&message);
				}
			}

			_ => unreachable!("{} is not a flow statement", keyword.as_str()),
		}
	}


	fn return_statement(&mut self, span: Span) {
		let value = if self.has_operand() {
			let value_span = self.token.span;
			Some((self.expression(0).ty, value_span))
		} else {
			None
		};

		let return_type = match self.sema.return_type() {
			Some(return_type) => return_type,
			None => {
				self.report(semantic::Error::return_outside_function(span));
				return;
			}
		};

		match (value, return_type) {
			(None, Type::Void) => self.codegen.emit(Opcode::Ret),

			(None, expected) => {
				if expected.is_valid() {
					self.report(semantic::Error::missing_return_value(expected, span));
				}
			}

			(Some(_), Type::Void) => self.report(semantic::Error::unexpected_return_value(span)),

			(Some((found, value_span)), expected) => {
				if Sema::coercible(found, expected) {
					let end = self.codegen.patch_point();
					self.convert(found, expected, end, value_span);
					self.codegen.emit(Opcode::RetV);
				} else {
					self.report(semantic::Error::return_mismatch(expected, found, value_span));
				}
			}
		}
	}


	fn expression_statement(&mut self) {
		let value = self.expression(0);

		if value.ty.is_valid() && value.ty != Type::Void {
			self.codegen.emit(Opcode::Pop);
		}
	}


	/// Precedence climbing over binary operators.
	fn expression(&mut self, min_precedence: u8) -> TypeExpr {
		let start = self.codegen.patch_point();
		let mut lhs = self.term();

		while let Some(op) = self.token.kind.binary_operator() {
			if op.precedence() < min_precedence {
				break;
			}

			let span = self.advance().span;
			let lhs_end = self.codegen.patch_point();

			let next_precedence = if op.is_right_associative() {
				op.precedence()
			} else {
				op.precedence() + 1
			};

			let rhs = self.expression(next_precedence);
			lhs = self.binary(op, lhs, rhs, start, lhs_end, span);
		}

		lhs
	}


	fn binary(
		&mut self,
		op: Operator,
		lhs: TypeExpr,
		rhs: TypeExpr,
		start: usize,
		lhs_end: usize,
		span: Span,
	) -> TypeExpr {
		if op == Operator::Assign {
			return self.assignment(lhs, rhs, start, span);
		}

		let result = self.sema.binary_op_type(op, lhs, rhs, span);
		let mapping = match self.check(result) {
			Some(mapping) if mapping.to.is_valid() => mapping,
			_ => return Type::Invalid.into(),
		};

		// The rhs is converted first, as inserting after the lhs moves the end.
		let end = self.codegen.patch_point();
		self.convert(rhs.ty, mapping.from, end, span);
		self.convert(lhs.ty, mapping.from, lhs_end, span);

		if let Some(opcode) = codegen::binary_instruction(op, mapping.from) {
			self.codegen.emit(opcode);
		}

		mapping.to.into()
	}


	/// An assignment. The lhs code is a single load of the variable, which is replaced by a
	/// store after the rhs.
	fn assignment(&mut self, lhs: TypeExpr, rhs: TypeExpr, start: usize, span: Span) -> TypeExpr {
		let symbol = match lhs.lvalue {
			Some(symbol) => symbol,
			None => {
				if lhs.ty.is_valid() {
					self.report(semantic::Error::invalid_assignment(span));
				}
				return Type::Invalid.into();
			}
		};

		let result = self.sema.binary_op_type(Operator::Assign, lhs, rhs, span);
		let mapping = match self.check(result) {
			Some(mapping) if mapping.from.is_valid() => mapping,
			_ => return Type::Invalid.into(),
		};

		self.codegen.remove(start);

		let end = self.codegen.patch_point();
		self.convert(rhs.ty, mapping.from, end, span);
		self.codegen.emit_store(Local::Variable(symbol));

		Type::Void.into()
	}


	fn term(&mut self) -> TypeExpr {
		match self.token.kind {
			TokenKind::Operator(Operator::Minus) => {
				let span = self.advance().span;
				let operand = self.term();

				let result = self.sema.unary_op_type(Operator::Minus, operand.ty, span);
				match self.check(result) {
					Some(ty) => {
						if let Some(opcode) = codegen::unary_instruction(ty) {
							self.codegen.emit(opcode);
						}
						ty.into()
					}
					None => Type::Invalid.into(),
				}
			}

			TokenKind::OpenParens => {
				self.advance();
				let inner = self.expression(0);
				self.expect(TokenKind::CloseParens);
				inner.ty.into()
			}

			TokenKind::OpenBracket => self.call(),

			TokenKind::Identifier(symbol) => {
				let span = self.advance().span;

				if self.at(&TokenKind::Dot) {
					self.advance();
					self.module_variable(symbol, span)
				} else {
					self.variable(symbol, span)
				}
			}

			TokenKind::Keyword(Keyword::Yes) => {
				self.advance();
				self.codegen.emit(Opcode::LoadYes);
				Type::Bool.into()
			}

			TokenKind::Keyword(Keyword::No) => {
				self.advance();
				self.codegen.emit(Opcode::LoadNo);
				Type::Bool.into()
			}

			TokenKind::Literal(_) => {
				let value = match self.advance().kind {
					TokenKind::Literal(Literal::Int(int)) => Value::Int(int),
					TokenKind::Literal(Literal::Float(float)) => Value::Number(float),
					TokenKind::Literal(Literal::String(string)) => Value::String(string),
					_ => unreachable!("token checked above"),
				};

				let ty = value.static_type();
				self.codegen.emit_constant(value);
				ty.into()
			}

			_ => {
				let error = SyntaxError::expected_expression(self.token.kind.clone(), self.token.span);
				self.syntax_error(error);
				Type::Invalid.into()
			}
		}
	}


	fn variable(&mut self, symbol: Symbol, span: Span) -> TypeExpr {
		let result = self.sema.variable_type(symbol, span);

		let variable = match self.check(result) {
			Some(variable) => variable,
			None => return Type::Invalid.into(),
		};

		if self.codegen.emit_load(Local::Variable(symbol)) {
			variable
		} else {
			Type::Invalid.into()
		}
	}


	/// A module variable, after the dot. The value is loaded as a constant.
	fn module_variable(&mut self, module: Symbol, span: Span) -> TypeExpr {
		let name = match self.expect_identifier() {
			Some((name, _)) => name,
			None => return Type::Invalid.into(),
		};

		let result = self.sema.module_variable(module, name, span, self.scanner.interner());

		match self.check(result) {
			Some(value) => {
				let ty = value.static_type();
				self.codegen.emit_constant(value.clone());
				ty.into()
			}
			None => Type::Invalid.into(),
		}
	}


	/// A call, either to a user function or to a module function.
	fn call(&mut self) -> TypeExpr {
		self.advance(); // [

		let mut module = None;
		let mut name = match self.token.kind {
			// Type names double as module names, as in String.length.
			TokenKind::Type(type_name) => {
				let span = self.advance().span;
				let symbol = self.scanner.interner().get_or_intern(type_name.as_str());
				Some((symbol, span))
			}

			_ => self.expect_identifier(),
		};

		if self.at(&TokenKind::Dot) {
			self.advance();
			module = name;
			name = self.expect_identifier();
		}

		let mut arguments = Vec::new();
		if !self.at(&TokenKind::CloseBracket) {
			loop {
				let span = self.token.span;
				let ty = self.expression(0).ty;
				arguments.push(
					Argument {
						ty,
						end: self.codegen.patch_point(),
						span,
					}
				);

				if self.at(&TokenKind::Comma) {
					self.advance();
				} else {
					break;
				}
			}
		}

		self.expect(TokenKind::CloseBracket);

		let (name, span) = match name {
			Some(name) => name,
			None => return Type::Invalid.into(),
		};

		let arity = match self.arity(arguments.len(), span) {
			Some(arity) => arity,
			None => return Type::Invalid.into(),
		};

		match module {
			Some((module, _)) => self.foreign_call(module, name, arity, &arguments, span),
			None => self.user_call(name, arity, &arguments, span),
		}
	}


	fn user_call(&mut self, name: Symbol, arity: u8, arguments: &[Argument], span: Span) -> TypeExpr {
		let result = self.sema
			.function(name, arity, span)
			.map(Clone::clone);
		let function = match self.check(result) {
			Some(function) => function,
			None => return Type::Invalid.into(),
		};

		let mut valid = true;
		for (index, (argument, &parameter)) in arguments.iter().zip(function.params.iter()).enumerate() {
			if !Sema::coercible(argument.ty, parameter) {
				valid = false;
				self.report(
					semantic::Error::argument_mismatch(
						index as u8,
						parameter,
						argument.ty,
						argument.span,
						function.declared,
					)
				);
			}
		}

		if !valid {
			return Type::Invalid.into();
		}

		// Last to first, so that the patch points of earlier arguments stay put.
		for (argument, &parameter) in arguments.iter().zip(function.params.iter()).rev() {
			self.convert(argument.ty, parameter, argument.end, argument.span);
		}

		let mangled = mangle_function("", &self.resolve(name), arity);
		self.codegen.emit_call(&mangled);

		function.return_type.into()
	}


	fn foreign_call(
		&mut self,
		module: Symbol,
		name: Symbol,
		arity: u8,
		arguments: &[Argument],
		span: Span,
	) -> TypeExpr {
		let result = self.sema.foreign_function_type(module, name, arity, span, self.scanner.interner());
		let return_type = match self.check(result) {
			Some(return_type) => return_type,
			None => return Type::Invalid.into(),
		};

		let mut valid = true;
		for (index, argument) in arguments.iter().enumerate() {
			if argument.ty == Type::Void {
				valid = false;
				self.report(semantic::Error::void_argument(index as u8, argument.span));
			}
		}

		if !valid {
			return Type::Invalid.into();
		}

		let mangled = mangle_function(&self.resolve(module), &self.resolve(name), arity);
		self.codegen.emit_foreign_call(&mangled);

		return_type.into()
	}


	/// Insert a conversion at a patch point. The to-string conversion requires
	/// `IO.toString/1`.
	fn convert(&mut self, from: Type, to: Type, at: usize, span: Span) {
		let conversion = Conversion::between(from, to);

		if conversion == Conversion::ToString {
			let interner = self.scanner.interner();
			let module = interner.get_or_intern("IO");
			let name = interner.get_or_intern("toString");

			let result = self.sema.foreign_function_type(module, name, 1, span, self.scanner.interner());
			if self.check(result).is_none() {
				return;
			}
		}

		self.codegen.insert_conversion(at, conversion);
	}
}


/// Compile a source, resolving foreign symbols against the VM.
pub fn compile(source: &Source, interner: &mut symbol::Interner, vm: &Vm) -> Result<Program, Errors> {
	Compiler::new(source, interner, vm).compile()
}
