//! Recursive-descent parser producing the analyzer's syntax tree.
//!
//! The parser scans the whole file into a token buffer up front;
//! backtracking (cast-vs-paren, local-declaration-vs-expression,
//! enhanced-for detection) is a cursor reset. `>>`-family tokens are lexed
//! with maximal munch and split while closing nested type-argument lists
//! via a pending-close counter.

use crate::syntax::*;
use defuse_common::Span;
use defuse_scanner::{ScanError, Scanner, Token, TokenKind};
use std::fmt;

/// A syntax error. The whole file is dropped from the batch on the first
/// one; there is no recovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub offset: u32,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> Self {
        ParseError {
            message: err.message,
            offset: err.offset,
        }
    }
}

type PResult<T> = Result<T, ParseError>;

/// Parse one source file into a `CompilationUnit`.
pub fn parse(source: &str) -> Result<CompilationUnit, ParseError> {
    let tokens = Scanner::new(source).scan_all()?;
    Parser::new(source, tokens).parse_compilation_unit()
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    /// Closes still owed after consuming a `>>`/`>>>` inside nested
    /// type-argument lists. While nonzero the cursor conceptually sits on
    /// a `>`.
    pending_gt: u32,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
            pending_gt: 0,
        }
    }

    // ===== token plumbing =====

    fn current(&self) -> Token {
        self.tokens[self.pos]
    }

    fn kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    fn peek(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::EndOfFile)
    }

    fn text(&self, token: Token) -> String {
        token.text(self.source).to_string()
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos];
        if token.kind != TokenKind::EndOfFile {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.pending_gt == 0 && self.kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("expected {what}")))
        }
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            offset: self.current().span.start,
        }
    }

    fn save(&self) -> (usize, u32) {
        (self.pos, self.pending_gt)
    }

    fn restore(&mut self, state: (usize, u32)) {
        self.pos = state.0;
        self.pending_gt = state.1;
    }

    // ===== compilation unit =====

    pub fn parse_compilation_unit(&mut self) -> PResult<CompilationUnit> {
        let mut unit = CompilationUnit::default();

        self.skip_annotations()?;
        if self.eat(TokenKind::PackageKeyword) {
            unit.package = Some(self.parse_dotted_name()?);
            self.expect(TokenKind::Semicolon, "`;` after package declaration")?;
        }

        while self.check(TokenKind::ImportKeyword) {
            self.advance();
            self.eat(TokenKind::StaticKeyword);
            self.parse_dotted_name()?;
            if self.eat(TokenKind::Dot) {
                self.expect(TokenKind::Star, "`*` in import")?;
            }
            self.expect(TokenKind::Semicolon, "`;` after import")?;
        }

        while !self.check(TokenKind::EndOfFile) {
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            self.skip_annotations()?;
            self.skip_modifiers(false);
            unit.types.push(self.parse_type_decl()?);
        }
        Ok(unit)
    }

    fn parse_dotted_name(&mut self) -> PResult<String> {
        let first = self.expect(TokenKind::Identifier, "identifier")?;
        let mut name = self.text(first);
        while self.check(TokenKind::Dot) && self.peek(1) == TokenKind::Identifier {
            self.advance();
            let seg = self.advance();
            name.push('.');
            name.push_str(seg.text(self.source));
        }
        Ok(name)
    }

    // ===== annotations and modifiers =====

    fn skip_annotations(&mut self) -> PResult<()> {
        while self.check(TokenKind::At) {
            self.advance();
            self.parse_dotted_name()?;
            if self.check(TokenKind::OpenParen) {
                self.skip_balanced(TokenKind::OpenParen, TokenKind::CloseParen)?;
            }
        }
        Ok(())
    }

    /// Skip modifier keywords (and interleaved annotations); returns
    /// whether `static` was among them.
    fn skip_modifiers(&mut self, allow_default: bool) -> bool {
        let mut is_static = false;
        loop {
            if self.check(TokenKind::At) {
                // Annotations between modifiers; malformed ones surface
                // later as ordinary parse errors.
                if self.skip_annotations().is_err() {
                    return is_static;
                }
                continue;
            }
            let kind = self.kind();
            if self.pending_gt == 0
                && (kind.is_modifier() || (allow_default && kind == TokenKind::DefaultKeyword))
            {
                if kind == TokenKind::StaticKeyword {
                    is_static = true;
                }
                self.advance();
                continue;
            }
            return is_static;
        }
    }

    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) -> PResult<()> {
        let start = self.expect(open, "opening delimiter")?;
        let mut depth = 1usize;
        loop {
            let kind = self.kind();
            if kind == TokenKind::EndOfFile {
                return Err(ParseError {
                    message: "unbalanced delimiters".into(),
                    offset: start.span.start,
                });
            }
            self.advance();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
    }

    /// Skip a `<...>` type-parameter section of a declaration.
    fn skip_type_params(&mut self) -> PResult<()> {
        let start = self.expect(TokenKind::LessThan, "`<`")?;
        let mut depth: i32 = 1;
        while depth > 0 {
            let kind = self.kind();
            match kind {
                TokenKind::LessThan => depth += 1,
                TokenKind::GreaterThan => depth -= 1,
                TokenKind::GreaterThanGreaterThan => depth -= 2,
                TokenKind::GreaterThanGreaterThanGreaterThan => depth -= 3,
                TokenKind::EndOfFile => {
                    return Err(ParseError {
                        message: "unterminated type parameter list".into(),
                        offset: start.span.start,
                    });
                }
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    // ===== types =====

    fn parse_type(&mut self) -> PResult<TypeRef> {
        let base = match self.kind() {
            kind if self.pending_gt == 0 && kind.is_primitive() => {
                self.advance();
                TypeRef::Primitive
            }
            TokenKind::VoidKeyword if self.pending_gt == 0 => {
                self.advance();
                TypeRef::Void
            }
            TokenKind::Identifier if self.pending_gt == 0 => {
                let first = self.advance();
                let mut name = self.text(first);
                let mut args = Vec::new();
                if self.check(TokenKind::LessThan) {
                    args = self.parse_type_args()?;
                }
                while self.check(TokenKind::Dot) && self.peek(1) == TokenKind::Identifier {
                    self.advance();
                    let seg = self.advance();
                    name = self.text(seg);
                    args.clear();
                    if self.check(TokenKind::LessThan) {
                        args = self.parse_type_args()?;
                    }
                }
                TypeRef::Named { name, args }
            }
            _ => return Err(self.error_here("expected a type")),
        };

        let mut ty = base;
        while self.check(TokenKind::OpenBracket) && self.peek(1) == TokenKind::CloseBracket {
            self.advance();
            self.advance();
            ty = TypeRef::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_type_args(&mut self) -> PResult<Vec<TypeRef>> {
        self.expect(TokenKind::LessThan, "`<`")?;
        let mut args = Vec::new();
        if self.try_close_angle() {
            // Diamond `<>`.
            return Ok(args);
        }
        loop {
            args.push(self.parse_type_arg()?);
            if self.pending_gt == 0 && self.eat(TokenKind::Comma) {
                continue;
            }
            if self.try_close_angle() {
                return Ok(args);
            }
            return Err(self.error_here("expected `,` or `>` in type arguments"));
        }
    }

    fn parse_type_arg(&mut self) -> PResult<TypeRef> {
        if self.check(TokenKind::Question) {
            self.advance();
            if self.eat(TokenKind::ExtendsKeyword) || self.eat(TokenKind::SuperKeyword) {
                self.parse_type()?;
            }
            return Ok(TypeRef::Wildcard);
        }
        self.parse_type()
    }

    /// Consume one closing angle bracket, splitting `>>`/`>>>` as needed.
    fn try_close_angle(&mut self) -> bool {
        if self.pending_gt > 0 {
            self.pending_gt -= 1;
            return true;
        }
        match self.kind() {
            TokenKind::GreaterThan => {
                self.advance();
                true
            }
            TokenKind::GreaterThanGreaterThan => {
                self.advance();
                self.pending_gt = 1;
                true
            }
            TokenKind::GreaterThanGreaterThanGreaterThan => {
                self.advance();
                self.pending_gt = 2;
                true
            }
            _ => false,
        }
    }

    // ===== type declarations =====

    /// Parse a type declaration with the cursor on `class`/`interface`/`enum`.
    fn parse_type_decl(&mut self) -> PResult<TypeDecl> {
        let kind = match self.kind() {
            TokenKind::ClassKeyword => TypeKind::Class,
            TokenKind::InterfaceKeyword => TypeKind::Interface,
            TokenKind::EnumKeyword => TypeKind::Enum,
            _ => return Err(self.error_here("expected a type declaration")),
        };
        self.advance();
        let name_tok = self.expect(TokenKind::Identifier, "type name")?;
        let name = self.text(name_tok);

        if self.check(TokenKind::LessThan) {
            self.skip_type_params()?;
        }

        let mut supertypes = Vec::new();
        if self.eat(TokenKind::ExtendsKeyword) {
            supertypes.push(self.parse_type()?);
            // Interfaces may extend several.
            while self.eat(TokenKind::Comma) {
                supertypes.push(self.parse_type()?);
            }
        }
        if self.eat(TokenKind::ImplementsKeyword) {
            supertypes.push(self.parse_type()?);
            while self.eat(TokenKind::Comma) {
                supertypes.push(self.parse_type()?);
            }
        }

        let (constants, members) = if kind == TypeKind::Enum {
            self.parse_enum_body()?
        } else {
            (Vec::new(), self.parse_type_body()?)
        };

        Ok(TypeDecl {
            kind,
            name,
            supertypes,
            constants,
            members,
            span: name_tok.span,
        })
    }

    fn parse_type_body(&mut self) -> PResult<Vec<Member>> {
        self.expect(TokenKind::OpenBrace, "`{`")?;
        let mut members = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            if self.check(TokenKind::EndOfFile) {
                return Err(self.error_here("unterminated type body"));
            }
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            members.push(self.parse_member()?);
        }
        self.advance();
        Ok(members)
    }

    fn parse_enum_body(&mut self) -> PResult<(Vec<EnumConstant>, Vec<Member>)> {
        self.expect(TokenKind::OpenBrace, "`{`")?;
        let mut constants = Vec::new();
        while !self.check(TokenKind::CloseBrace) && !self.check(TokenKind::Semicolon) {
            self.skip_annotations()?;
            let name_tok = self.expect(TokenKind::Identifier, "enum constant name")?;
            let args = if self.check(TokenKind::OpenParen) {
                self.parse_args()?
            } else {
                Vec::new()
            };
            let body = if self.check(TokenKind::OpenBrace) {
                Some(self.parse_type_body()?)
            } else {
                None
            };
            constants.push(EnumConstant {
                name: self.text(name_tok),
                args,
                body,
                span: name_tok.span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let mut members = Vec::new();
        if self.eat(TokenKind::Semicolon) {
            while !self.check(TokenKind::CloseBrace) {
                if self.check(TokenKind::EndOfFile) {
                    return Err(self.error_here("unterminated enum body"));
                }
                if self.eat(TokenKind::Semicolon) {
                    continue;
                }
                members.push(self.parse_member()?);
            }
        }
        self.expect(TokenKind::CloseBrace, "`}` closing enum body")?;
        Ok((constants, members))
    }

    fn parse_member(&mut self) -> PResult<Member> {
        self.skip_annotations()?;
        let is_static = self.skip_modifiers(true);

        match self.kind() {
            TokenKind::OpenBrace => {
                let body = self.parse_block()?;
                return Ok(Member::Initializer(InitializerBlock { is_static, body }));
            }
            TokenKind::ClassKeyword | TokenKind::InterfaceKeyword | TokenKind::EnumKeyword => {
                return Ok(Member::Type(self.parse_type_decl()?));
            }
            TokenKind::LessThan => {
                // Generic method: skip the type parameters, then parse as
                // an ordinary method.
                self.skip_type_params()?;
            }
            _ => {}
        }

        // Constructor: a bare name followed by a parameter list.
        if self.check(TokenKind::Identifier) && self.peek(1) == TokenKind::OpenParen {
            let name_tok = self.advance();
            return Ok(Member::Method(self.parse_method_rest(
                self.text(name_tok),
                None,
                true,
                name_tok.span,
            )?));
        }

        let ty = self.parse_type()?;
        let name_tok = self.expect(TokenKind::Identifier, "member name")?;
        let name = self.text(name_tok);

        if self.check(TokenKind::OpenParen) {
            return Ok(Member::Method(self.parse_method_rest(
                name,
                Some(ty),
                false,
                name_tok.span,
            )?));
        }

        let fragments = self.parse_fragments(name_tok)?;
        self.expect(TokenKind::Semicolon, "`;` after field declaration")?;
        Ok(Member::Field(FieldDecl { ty, fragments }))
    }

    fn parse_method_rest(
        &mut self,
        name: String,
        return_type: Option<TypeRef>,
        is_constructor: bool,
        span: Span,
    ) -> PResult<MethodDecl> {
        let params = self.parse_params()?;
        while self.check(TokenKind::OpenBracket) && self.peek(1) == TokenKind::CloseBracket {
            self.advance();
            self.advance();
        }
        if self.eat(TokenKind::ThrowsKeyword) {
            self.parse_dotted_name()?;
            while self.eat(TokenKind::Comma) {
                self.parse_dotted_name()?;
            }
        }
        let body = if self.check(TokenKind::OpenBrace) {
            Some(self.parse_block()?)
        } else {
            self.expect(TokenKind::Semicolon, "method body or `;`")?;
            None
        };
        Ok(MethodDecl {
            name,
            params,
            return_type,
            is_constructor,
            body,
            span,
        })
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(TokenKind::OpenParen, "`(`")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "`)` closing parameter list")?;
        Ok(params)
    }

    fn parse_param(&mut self) -> PResult<Param> {
        self.skip_annotations()?;
        self.skip_modifiers(false);
        let mut ty = self.parse_type()?;
        if self.eat(TokenKind::DotDotDot) {
            ty = TypeRef::Array(Box::new(ty));
        }
        let name_tok = self.expect(TokenKind::Identifier, "parameter name")?;
        while self.check(TokenKind::OpenBracket) && self.peek(1) == TokenKind::CloseBracket {
            self.advance();
            self.advance();
        }
        Ok(Param {
            ty: Some(ty),
            name: self.text(name_tok),
            span: name_tok.span,
        })
    }

    /// Parse declarator fragments starting from an already-consumed first
    /// name token.
    fn parse_fragments(&mut self, first_name: Token) -> PResult<Vec<VarFragment>> {
        let mut fragments = Vec::new();
        let mut name_tok = first_name;
        loop {
            while self.check(TokenKind::OpenBracket) && self.peek(1) == TokenKind::CloseBracket {
                self.advance();
                self.advance();
            }
            let init = if self.eat(TokenKind::Equals) {
                Some(self.parse_variable_initializer()?)
            } else {
                None
            };
            fragments.push(VarFragment {
                name: self.text(name_tok),
                init,
                span: name_tok.span,
            });
            if !self.eat(TokenKind::Comma) {
                return Ok(fragments);
            }
            name_tok = self.expect(TokenKind::Identifier, "declarator name")?;
        }
    }

    fn parse_variable_initializer(&mut self) -> PResult<Expr> {
        if self.check(TokenKind::OpenBrace) {
            self.parse_array_initializer()
        } else {
            self.parse_expression()
        }
    }

    fn parse_array_initializer(&mut self) -> PResult<Expr> {
        self.expect(TokenKind::OpenBrace, "`{`")?;
        let mut elements = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            elements.push(self.parse_variable_initializer()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseBrace, "`}` closing array initializer")?;
        Ok(Expr::ArrayInit(elements))
    }

    // ===== statements =====

    fn parse_block(&mut self) -> PResult<Block> {
        let open = self.expect(TokenKind::OpenBrace, "`{`")?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            if self.check(TokenKind::EndOfFile) {
                return Err(ParseError {
                    message: "unterminated block".into(),
                    offset: open.span.start,
                });
            }
            stmts.push(self.parse_statement()?);
        }
        let close = self.advance();
        Ok(Block {
            stmts,
            span: open.span.to(close.span),
        })
    }

    fn parse_statement(&mut self) -> PResult<Stmt> {
        match self.kind() {
            TokenKind::OpenBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::Empty)
            }
            TokenKind::IfKeyword => self.parse_if(),
            TokenKind::WhileKeyword => {
                self.advance();
                self.expect(TokenKind::OpenParen, "`(`")?;
                let cond = self.parse_expression()?;
                self.expect(TokenKind::CloseParen, "`)`")?;
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::While { cond, body })
            }
            TokenKind::DoKeyword => {
                self.advance();
                let body = Box::new(self.parse_statement()?);
                self.expect(TokenKind::WhileKeyword, "`while`")?;
                self.expect(TokenKind::OpenParen, "`(`")?;
                let cond = self.parse_expression()?;
                self.expect(TokenKind::CloseParen, "`)`")?;
                self.expect(TokenKind::Semicolon, "`;`")?;
                Ok(Stmt::Do { body, cond })
            }
            TokenKind::ForKeyword => self.parse_for(),
            TokenKind::SwitchKeyword => self.parse_switch(),
            TokenKind::ReturnKeyword => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(TokenKind::Semicolon, "`;` after return")?;
                Ok(Stmt::Return(value))
            }
            TokenKind::ThrowKeyword => {
                self.advance();
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "`;` after throw")?;
                Ok(Stmt::Throw(value))
            }
            TokenKind::TryKeyword => self.parse_try(),
            TokenKind::BreakKeyword => {
                self.advance();
                if self.check(TokenKind::Identifier) {
                    self.advance();
                }
                self.expect(TokenKind::Semicolon, "`;` after break")?;
                Ok(Stmt::Break)
            }
            TokenKind::ContinueKeyword => {
                self.advance();
                if self.check(TokenKind::Identifier) {
                    self.advance();
                }
                self.expect(TokenKind::Semicolon, "`;` after continue")?;
                Ok(Stmt::Continue)
            }
            TokenKind::AssertKeyword => {
                self.advance();
                let cond = self.parse_expression()?;
                let message = if self.eat(TokenKind::Colon) {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                self.expect(TokenKind::Semicolon, "`;` after assert")?;
                Ok(Stmt::Assert { cond, message })
            }
            TokenKind::SynchronizedKeyword if self.peek(1) == TokenKind::OpenParen => {
                self.advance();
                self.expect(TokenKind::OpenParen, "`(`")?;
                let lock = self.parse_expression()?;
                self.expect(TokenKind::CloseParen, "`)`")?;
                let body = self.parse_block()?;
                Ok(Stmt::Synchronized { lock, body })
            }
            TokenKind::ClassKeyword | TokenKind::InterfaceKeyword | TokenKind::EnumKeyword => {
                Ok(Stmt::LocalType(self.parse_type_decl()?))
            }
            TokenKind::Identifier if self.peek(1) == TokenKind::Colon => {
                let label_tok = self.advance();
                self.advance();
                let stmt = Box::new(self.parse_statement()?);
                Ok(Stmt::Labeled {
                    label: self.text(label_tok),
                    stmt,
                })
            }
            kind if kind.is_modifier() || kind == TokenKind::At => {
                // `final` locals, annotated locals, or modified local types.
                self.skip_annotations()?;
                self.skip_modifiers(false);
                if matches!(
                    self.kind(),
                    TokenKind::ClassKeyword | TokenKind::InterfaceKeyword | TokenKind::EnumKeyword
                ) {
                    return Ok(Stmt::LocalType(self.parse_type_decl()?));
                }
                let decl = self.parse_local_var_decl()?;
                self.expect(TokenKind::Semicolon, "`;` after declaration")?;
                Ok(Stmt::LocalVar(decl))
            }
            _ => {
                if let Some(decl) = self.try_parse_local_var_decl()? {
                    self.expect(TokenKind::Semicolon, "`;` after declaration")?;
                    return Ok(Stmt::LocalVar(decl));
                }
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "`;` after expression")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::IfKeyword, "`if`")?;
        self.expect(TokenKind::OpenParen, "`(`")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::CloseParen, "`)`")?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(TokenKind::ElseKeyword) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::ForKeyword, "`for`")?;
        self.expect(TokenKind::OpenParen, "`(`")?;

        // Enhanced for: `for (Type name : iterable)`.
        if let Some(param) = self.try_parse_foreach_param()? {
            let iterable = self.parse_expression()?;
            self.expect(TokenKind::CloseParen, "`)`")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(Stmt::ForEach {
                param,
                iterable,
                body,
            });
        }

        let mut init = Vec::new();
        if !self.check(TokenKind::Semicolon) {
            if let Some(decl) = self.try_parse_inline_decl()? {
                init.push(decl);
            } else {
                init.push(self.parse_expression()?);
                while self.eat(TokenKind::Comma) {
                    init.push(self.parse_expression()?);
                }
            }
        }
        self.expect(TokenKind::Semicolon, "`;` in for")?;
        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon, "`;` in for")?;
        let mut update = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            update.push(self.parse_expression()?);
            while self.eat(TokenKind::Comma) {
                update.push(self.parse_expression()?);
            }
        }
        self.expect(TokenKind::CloseParen, "`)`")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::For {
            init,
            cond,
            update,
            body,
        })
    }

    fn try_parse_foreach_param(&mut self) -> PResult<Option<Param>> {
        let state = self.save();
        if self.skip_annotations().is_err() {
            self.restore(state);
            return Ok(None);
        }
        self.skip_modifiers(false);
        let Ok(ty) = self.parse_type() else {
            self.restore(state);
            return Ok(None);
        };
        if self.check(TokenKind::Identifier) && self.peek(1) == TokenKind::Colon {
            let name_tok = self.advance();
            self.advance();
            return Ok(Some(Param {
                ty: Some(ty),
                name: self.text(name_tok),
                span: name_tok.span,
            }));
        }
        self.restore(state);
        Ok(None)
    }

    fn try_parse_inline_decl(&mut self) -> PResult<Option<Expr>> {
        let state = self.save();
        self.skip_modifiers(false);
        let Ok(ty) = self.parse_type() else {
            self.restore(state);
            return Ok(None);
        };
        if !self.local_decl_follows() {
            self.restore(state);
            return Ok(None);
        }
        let name_tok = self.expect(TokenKind::Identifier, "declarator name")?;
        let fragments = self.parse_fragments(name_tok)?;
        Ok(Some(Expr::InlineDecl { ty, fragments }))
    }

    fn try_parse_local_var_decl(&mut self) -> PResult<Option<LocalVarDecl>> {
        let state = self.save();
        let Ok(ty) = self.parse_type() else {
            self.restore(state);
            return Ok(None);
        };
        if !self.local_decl_follows() {
            self.restore(state);
            return Ok(None);
        }
        let name_tok = self.expect(TokenKind::Identifier, "declarator name")?;
        let fragments = self.parse_fragments(name_tok)?;
        Ok(Some(LocalVarDecl { ty, fragments }))
    }

    fn parse_local_var_decl(&mut self) -> PResult<LocalVarDecl> {
        let ty = self.parse_type()?;
        let name_tok = self.expect(TokenKind::Identifier, "declarator name")?;
        let fragments = self.parse_fragments(name_tok)?;
        Ok(LocalVarDecl { ty, fragments })
    }

    /// After a successfully parsed type, does a declarator follow?
    fn local_decl_follows(&self) -> bool {
        if self.pending_gt != 0 || self.kind() != TokenKind::Identifier {
            return false;
        }
        matches!(
            self.peek(1),
            TokenKind::Equals | TokenKind::Comma | TokenKind::Semicolon
        ) || (self.peek(1) == TokenKind::OpenBracket && self.peek(2) == TokenKind::CloseBracket)
    }

    fn parse_switch(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::SwitchKeyword, "`switch`")?;
        self.expect(TokenKind::OpenParen, "`(`")?;
        let scrutinee = self.parse_expression()?;
        self.expect(TokenKind::CloseParen, "`)`")?;
        self.expect(TokenKind::OpenBrace, "`{`")?;

        let mut arms = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            if self.check(TokenKind::EndOfFile) {
                return Err(self.error_here("unterminated switch body"));
            }
            let mut labels = Vec::new();
            loop {
                if self.eat(TokenKind::CaseKeyword) {
                    let label = self.parse_expression()?;
                    self.expect(TokenKind::Colon, "`:` after case label")?;
                    labels.push(Some(label));
                } else if self.eat(TokenKind::DefaultKeyword) {
                    self.expect(TokenKind::Colon, "`:` after default")?;
                    labels.push(None);
                } else {
                    break;
                }
            }
            if labels.is_empty() {
                return Err(self.error_here("expected `case` or `default`"));
            }
            let mut stmts = Vec::new();
            while !matches!(
                self.kind(),
                TokenKind::CaseKeyword | TokenKind::DefaultKeyword | TokenKind::CloseBrace
            ) {
                stmts.push(self.parse_statement()?);
            }
            arms.push(SwitchArm { labels, stmts });
        }
        self.advance();
        Ok(Stmt::Switch { scrutinee, arms })
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        self.expect(TokenKind::TryKeyword, "`try`")?;
        let mut resources = Vec::new();
        if self.eat(TokenKind::OpenParen) {
            loop {
                self.skip_modifiers(false);
                resources.push(self.parse_local_var_decl()?);
                if !self.eat(TokenKind::Semicolon) {
                    break;
                }
                if self.check(TokenKind::CloseParen) {
                    break;
                }
            }
            self.expect(TokenKind::CloseParen, "`)` closing resources")?;
        }
        let body = self.parse_block()?;
        let mut catches = Vec::new();
        while self.eat(TokenKind::CatchKeyword) {
            self.expect(TokenKind::OpenParen, "`(`")?;
            self.skip_modifiers(false);
            let mut ty = self.parse_type()?;
            if self.check(TokenKind::Bar) {
                let mut alternatives = vec![ty];
                while self.eat(TokenKind::Bar) {
                    alternatives.push(self.parse_type()?);
                }
                ty = TypeRef::Union(alternatives);
            }
            let name_tok = self.expect(TokenKind::Identifier, "catch variable")?;
            self.expect(TokenKind::CloseParen, "`)`")?;
            let block = self.parse_block()?;
            catches.push(CatchClause {
                param: Param {
                    ty: Some(ty),
                    name: self.text(name_tok),
                    span: name_tok.span,
                },
                body: block,
            });
        }
        let finally = if self.eat(TokenKind::FinallyKeyword) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::Try {
            resources,
            body,
            catches,
            finally,
        })
    }

    // ===== expressions =====

    pub fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> PResult<Expr> {
        let lhs = self.parse_conditional()?;
        if self.pending_gt == 0 && self.kind().is_assignment_op() {
            self.advance();
            let value = self.parse_assignment()?;
            return Ok(Expr::Assign {
                target: Box::new(lhs),
                value: Box::new(value),
            });
        }
        Ok(lhs)
    }

    fn parse_conditional(&mut self) -> PResult<Expr> {
        let cond = self.parse_binary(0)?;
        if self.eat(TokenKind::Question) {
            let then_expr = self.parse_expression()?;
            self.expect(TokenKind::Colon, "`:` in conditional")?;
            let else_expr = self.parse_conditional()?;
            return Ok(Expr::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            });
        }
        Ok(cond)
    }

    fn binary_op(kind: TokenKind) -> Option<(BinaryOp, u8)> {
        let entry = match kind {
            TokenKind::BarBar => (BinaryOp::Or, 1),
            TokenKind::AmpAmp => (BinaryOp::And, 2),
            TokenKind::Bar => (BinaryOp::BitOr, 3),
            TokenKind::Caret => (BinaryOp::BitXor, 4),
            TokenKind::Amp => (BinaryOp::BitAnd, 5),
            TokenKind::EqualsEquals => (BinaryOp::Eq, 6),
            TokenKind::BangEquals => (BinaryOp::Ne, 6),
            TokenKind::LessThan => (BinaryOp::Lt, 7),
            TokenKind::GreaterThan => (BinaryOp::Gt, 7),
            TokenKind::LessThanEquals => (BinaryOp::Le, 7),
            TokenKind::GreaterThanEquals => (BinaryOp::Ge, 7),
            TokenKind::LessThanLessThan => (BinaryOp::Shl, 8),
            TokenKind::GreaterThanGreaterThan => (BinaryOp::Shr, 8),
            TokenKind::GreaterThanGreaterThanGreaterThan => (BinaryOp::UShr, 8),
            TokenKind::Plus => (BinaryOp::Add, 9),
            TokenKind::Minus => (BinaryOp::Sub, 9),
            TokenKind::Star => (BinaryOp::Mul, 10),
            TokenKind::Slash => (BinaryOp::Div, 10),
            TokenKind::Percent => (BinaryOp::Rem, 10),
            _ => return None,
        };
        Some(entry)
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            if self.pending_gt != 0 {
                return Ok(lhs);
            }
            if self.kind() == TokenKind::InstanceofKeyword && 7 >= min_prec {
                self.advance();
                let ty = self.parse_type()?;
                lhs = Expr::InstanceOf {
                    expr: Box::new(lhs),
                    ty,
                };
                continue;
            }
            let Some((op, prec)) = Self::binary_op(self.kind()) else {
                return Ok(lhs);
            };
            if prec < min_prec {
                return Ok(lhs);
            }
            self.advance();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let op = match self.kind() {
            TokenKind::PlusPlus => Some(UnaryOp::Inc),
            TokenKind::MinusMinus => Some(UnaryOp::Dec),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                prefix: true,
            });
        }
        if self.check(TokenKind::OpenParen) {
            if let Some(cast) = self.try_parse_cast()? {
                return Ok(cast);
            }
        }
        self.parse_postfix()
    }

    fn try_parse_cast(&mut self) -> PResult<Option<Expr>> {
        let state = self.save();
        self.expect(TokenKind::OpenParen, "`(`")?;
        let Ok(ty) = self.parse_type() else {
            self.restore(state);
            return Ok(None);
        };
        if !self.eat(TokenKind::CloseParen) {
            self.restore(state);
            return Ok(None);
        }
        let primitive_target = matches!(ty, TypeRef::Primitive)
            || matches!(&ty, TypeRef::Array(elem) if matches!(**elem, TypeRef::Primitive));
        let starts_operand = match self.kind() {
            TokenKind::Identifier
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral
            | TokenKind::TrueKeyword
            | TokenKind::FalseKeyword
            | TokenKind::NullKeyword
            | TokenKind::OpenParen
            | TokenKind::ThisKeyword
            | TokenKind::SuperKeyword
            | TokenKind::NewKeyword
            | TokenKind::Bang
            | TokenKind::Tilde => true,
            // `(int) -x` is a cast; `(a) - b` is a subtraction.
            TokenKind::Plus | TokenKind::Minus => primitive_target,
            _ => false,
        };
        if !starts_operand {
            self.restore(state);
            return Ok(None);
        }
        let expr = self.parse_unary()?;
        Ok(Some(Expr::Cast {
            ty,
            expr: Box::new(expr),
        }))
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.pending_gt != 0 {
                return Ok(expr);
            }
            match self.kind() {
                TokenKind::Dot => match self.peek(1) {
                    TokenKind::Identifier => {
                        if self.peek(2) == TokenKind::OpenParen {
                            self.advance();
                            let name_tok = self.advance();
                            let args = self.parse_args()?;
                            expr = Expr::Call {
                                receiver: Some(Box::new(expr)),
                                name: self.text(name_tok),
                                args,
                            };
                        } else {
                            self.advance();
                            let name_tok = self.advance();
                            let name = self.text(name_tok);
                            expr = match expr {
                                Expr::Name(qualifier) => Expr::Name(NameExpr {
                                    qualifier: Some(Box::new(qualifier)),
                                    id: name,
                                }),
                                object => Expr::FieldAccess {
                                    object: Box::new(object),
                                    name,
                                },
                            };
                        }
                    }
                    TokenKind::ClassKeyword => {
                        self.advance();
                        self.advance();
                        expr = Expr::ClassLiteral;
                    }
                    TokenKind::ThisKeyword => {
                        // `Outer.this` reads as plain `this`.
                        self.advance();
                        self.advance();
                        expr = Expr::This;
                    }
                    TokenKind::NewKeyword => {
                        self.advance();
                        expr = self.parse_new(Some(Box::new(expr)))?;
                    }
                    TokenKind::LessThan => {
                        // Explicit type arguments: `recv.<T>m(args)`.
                        self.advance();
                        self.skip_type_params()?;
                        let name_tok = self.expect(TokenKind::Identifier, "method name")?;
                        let args = self.parse_args()?;
                        expr = Expr::Call {
                            receiver: Some(Box::new(expr)),
                            name: self.text(name_tok),
                            args,
                        };
                    }
                    _ => return Err(self.error_here("expected member name after `.`")),
                },
                TokenKind::OpenBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::CloseBracket, "`]`")?;
                    expr = Expr::Index {
                        array: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::ColonColon => {
                    self.advance();
                    let name = if self.check(TokenKind::NewKeyword) {
                        self.advance();
                        "new".to_string()
                    } else {
                        let tok = self.expect(TokenKind::Identifier, "method reference name")?;
                        self.text(tok)
                    };
                    expr = Expr::MethodRef {
                        target: Box::new(expr),
                        name,
                    };
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if self.kind() == TokenKind::PlusPlus {
                        UnaryOp::Inc
                    } else {
                        UnaryOp::Dec
                    };
                    self.advance();
                    expr = Expr::Unary {
                        op,
                        operand: Box::new(expr),
                        prefix: false,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        match self.kind() {
            TokenKind::OpenParen => {
                if self.paren_lambda_ahead() {
                    return self.parse_paren_lambda();
                }
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::CloseParen, "`)`")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::Identifier => {
                let name_tok = self.advance();
                if self.check(TokenKind::Arrow) {
                    self.advance();
                    let param = Param {
                        ty: None,
                        name: self.text(name_tok),
                        span: name_tok.span,
                    };
                    return self.parse_lambda_body(vec![param], name_tok.span);
                }
                if self.check(TokenKind::OpenParen) {
                    let args = self.parse_args()?;
                    return Ok(Expr::Call {
                        receiver: None,
                        name: self.text(name_tok),
                        args,
                    });
                }
                Ok(Expr::Name(NameExpr::simple(self.text(name_tok))))
            }
            TokenKind::IntLiteral => {
                self.advance();
                Ok(Expr::Literal(Literal::Int))
            }
            TokenKind::FloatLiteral => {
                self.advance();
                Ok(Expr::Literal(Literal::Float))
            }
            TokenKind::CharLiteral => {
                self.advance();
                Ok(Expr::Literal(Literal::Char))
            }
            TokenKind::StringLiteral => {
                self.advance();
                Ok(Expr::Literal(Literal::Str))
            }
            TokenKind::TrueKeyword | TokenKind::FalseKeyword => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool))
            }
            TokenKind::NullKeyword => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::ThisKeyword => {
                self.advance();
                if self.check(TokenKind::OpenParen) {
                    let args = self.parse_args()?;
                    return Ok(Expr::ConstructorCall { args });
                }
                Ok(Expr::This)
            }
            TokenKind::SuperKeyword => {
                self.advance();
                if self.check(TokenKind::OpenParen) {
                    let args = self.parse_args()?;
                    return Ok(Expr::ConstructorCall { args });
                }
                self.expect(TokenKind::Dot, "`.` after super")?;
                let name_tok = self.expect(TokenKind::Identifier, "member name")?;
                let name = self.text(name_tok);
                if self.check(TokenKind::OpenParen) {
                    let args = self.parse_args()?;
                    return Ok(Expr::SuperCall { name, args });
                }
                Ok(Expr::SuperField { name })
            }
            TokenKind::NewKeyword => self.parse_new(None),
            kind if kind.is_primitive() || kind == TokenKind::VoidKeyword => {
                // `int.class`, `void.class`.
                self.advance();
                self.expect(TokenKind::Dot, "`.` after primitive type")?;
                self.expect(TokenKind::ClassKeyword, "`class`")?;
                Ok(Expr::ClassLiteral)
            }
            _ => Err(self.error_here("expected an expression")),
        }
    }

    fn parse_new(&mut self, qualifier: Option<Box<Expr>>) -> PResult<Expr> {
        self.expect(TokenKind::NewKeyword, "`new`")?;
        let ty = self.parse_creation_type()?;

        if self.check(TokenKind::OpenBracket) {
            let mut dims = Vec::new();
            while self.check(TokenKind::OpenBracket) {
                self.advance();
                if !self.check(TokenKind::CloseBracket) {
                    dims.push(self.parse_expression()?);
                }
                self.expect(TokenKind::CloseBracket, "`]`")?;
            }
            let init = if self.check(TokenKind::OpenBrace) {
                Some(Box::new(self.parse_array_initializer()?))
            } else {
                None
            };
            return Ok(Expr::ArrayNew { ty, dims, init });
        }

        let args = self.parse_args()?;
        let body = if self.check(TokenKind::OpenBrace) {
            Some(self.parse_type_body()?)
        } else {
            None
        };
        Ok(Expr::New {
            ty,
            qualifier,
            args,
            body,
        })
    }

    /// The type after `new`: a primitive (array creation only) or a named
    /// type; array brackets are handled by the caller.
    fn parse_creation_type(&mut self) -> PResult<TypeRef> {
        if self.kind().is_primitive() {
            self.advance();
            return Ok(TypeRef::Primitive);
        }
        let first = self.expect(TokenKind::Identifier, "type name after `new`")?;
        let mut name = self.text(first);
        let mut args = Vec::new();
        if self.check(TokenKind::LessThan) {
            args = self.parse_type_args()?;
        }
        while self.check(TokenKind::Dot) && self.peek(1) == TokenKind::Identifier {
            self.advance();
            let seg = self.advance();
            name = self.text(seg);
            args.clear();
            if self.check(TokenKind::LessThan) {
                args = self.parse_type_args()?;
            }
        }
        Ok(TypeRef::Named { name, args })
    }

    fn parse_args(&mut self) -> PResult<Vec<Expr>> {
        self.expect(TokenKind::OpenParen, "`(`")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "`)` closing arguments")?;
        Ok(args)
    }

    /// Does a parenthesized lambda start here? Finds the matching `)` and
    /// checks for `->`.
    fn paren_lambda_ahead(&self) -> bool {
        debug_assert_eq!(self.kind(), TokenKind::OpenParen);
        let mut depth = 0usize;
        let mut i = self.pos;
        loop {
            match self.tokens.get(i).map(|t| t.kind) {
                Some(TokenKind::OpenParen) => depth += 1,
                Some(TokenKind::CloseParen) => {
                    depth -= 1;
                    if depth == 0 {
                        return self.tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::Arrow);
                    }
                }
                Some(TokenKind::EndOfFile) | None => return false,
                _ => {}
            }
            i += 1;
        }
    }

    fn parse_paren_lambda(&mut self) -> PResult<Expr> {
        let open = self.expect(TokenKind::OpenParen, "`(`")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                if self.check(TokenKind::Identifier)
                    && matches!(self.peek(1), TokenKind::Comma | TokenKind::CloseParen)
                {
                    let name_tok = self.advance();
                    params.push(Param {
                        ty: None,
                        name: self.text(name_tok),
                        span: name_tok.span,
                    });
                } else {
                    params.push(self.parse_param()?);
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "`)` closing lambda parameters")?;
        self.expect(TokenKind::Arrow, "`->`")?;
        self.parse_lambda_body(params, open.span)
    }

    fn parse_lambda_body(&mut self, params: Vec<Param>, start: Span) -> PResult<Expr> {
        let body = if self.check(TokenKind::OpenBrace) {
            LambdaBody::Block(self.parse_block()?)
        } else {
            LambdaBody::Expr(Box::new(self.parse_expression()?))
        };
        Ok(Expr::Lambda(LambdaExpr {
            params,
            body,
            span: start,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> CompilationUnit {
        match parse(src) {
            Ok(unit) => unit,
            Err(err) => panic!("parse failed: {err}\nsource:\n{src}"),
        }
    }

    fn first_method(unit: &CompilationUnit) -> &MethodDecl {
        unit.types[0]
            .members
            .iter()
            .find_map(|m| match m {
                Member::Method(m) => Some(m),
                _ => None,
            })
            .expect("no method")
    }

    #[test]
    fn package_and_class_shell() {
        let unit = parse_ok("package com.example.app;\nimport java.util.List;\npublic class Foo {}\n");
        assert_eq!(unit.package.as_deref(), Some("com.example.app"));
        assert_eq!(unit.types.len(), 1);
        assert_eq!(unit.types[0].name, "Foo");
        assert_eq!(unit.types[0].kind, TypeKind::Class);
    }

    #[test]
    fn supertype_references() {
        let unit = parse_ok("class Foo extends Bar implements Baz, Qux {}");
        let names: Vec<_> = unit.types[0]
            .supertypes
            .iter()
            .filter_map(|t| t.name())
            .collect();
        assert_eq!(names, vec!["Bar", "Baz", "Qux"]);
    }

    #[test]
    fn fields_methods_and_constructors() {
        let unit = parse_ok(
            "class Foo {\n  private int a, b = 2;\n  static String name;\n  Foo(int x) {}\n  <T> List<T> all(T seed) { return null; }\n}",
        );
        let members = &unit.types[0].members;
        assert_eq!(members.len(), 4);
        match &members[0] {
            Member::Field(f) => {
                assert_eq!(f.fragments.len(), 2);
                assert!(f.fragments[1].init.is_some());
            }
            other => panic!("expected field, got {other:?}"),
        }
        match &members[2] {
            Member::Method(m) => {
                assert!(m.is_constructor);
                assert_eq!(m.name, "Foo");
                assert_eq!(m.params.len(), 1);
            }
            other => panic!("expected constructor, got {other:?}"),
        }
        match &members[3] {
            Member::Method(m) => {
                assert_eq!(m.name, "all");
                assert_eq!(m.return_type.as_ref().and_then(|t| t.name()), Some("List"));
            }
            other => panic!("expected method, got {other:?}"),
        }
    }

    #[test]
    fn enum_constants_and_members() {
        let unit = parse_ok("enum Color { RED, GREEN(2), BLUE;\n  int code() { return 0; }\n}");
        let decl = &unit.types[0];
        assert_eq!(decl.kind, TypeKind::Enum);
        let names: Vec<_> = decl.constants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN", "BLUE"]);
        assert_eq!(decl.constants[1].args.len(), 1);
        assert_eq!(decl.members.len(), 1);
    }

    #[test]
    fn nested_generics_split_shift_tokens() {
        let unit = parse_ok("class A { Map<String, List<Integer>> index; }");
        match &unit.types[0].members[0] {
            Member::Field(f) => assert_eq!(f.ty.name(), Some("Map")),
            other => panic!("expected field, got {other:?}"),
        }
    }

    #[test]
    fn local_declaration_vs_expression_statement() {
        let unit = parse_ok("class A { void m() { int x = 1; x = 2; foo.bar(); List<String> l; } }");
        let body = first_method(&unit).body.as_ref().unwrap();
        assert!(matches!(body.stmts[0], Stmt::LocalVar(_)));
        assert!(matches!(body.stmts[1], Stmt::Expr(Expr::Assign { .. })));
        assert!(matches!(body.stmts[2], Stmt::Expr(Expr::Call { .. })));
        assert!(matches!(body.stmts[3], Stmt::LocalVar(_)));
    }

    #[test]
    fn qualified_names_build_name_chains() {
        let unit = parse_ok("class A { void m() { return; } Object o = a.b.c; }");
        match &unit.types[0].members[1] {
            Member::Field(f) => match f.fragments[0].init.as_ref().unwrap() {
                Expr::Name(name) => assert_eq!(name.to_string(), "a.b.c"),
                other => panic!("expected name, got {other:?}"),
            },
            other => panic!("expected field, got {other:?}"),
        }
    }

    #[test]
    fn calls_field_access_and_indexing() {
        let unit = parse_ok("class A { void m() { a.b.run(1); get().length; rows[0][i] = 4; } }");
        let body = first_method(&unit).body.as_ref().unwrap();
        match &body.stmts[0] {
            Stmt::Expr(Expr::Call { receiver, name, args }) => {
                assert_eq!(name, "run");
                assert_eq!(args.len(), 1);
                assert_eq!(
                    receiver.as_ref().unwrap().name_text().as_deref(),
                    Some("a.b")
                );
            }
            other => panic!("expected call, got {other:?}"),
        }
        match &body.stmts[1] {
            Stmt::Expr(Expr::FieldAccess { name, .. }) => assert_eq!(name, "length"),
            other => panic!("expected field access, got {other:?}"),
        }
    }

    #[test]
    fn cast_versus_parenthesized() {
        let unit = parse_ok("class A { void m() { x = (String) o; y = (a) - b; z = (int) -q; } }");
        let body = first_method(&unit).body.as_ref().unwrap();
        match &body.stmts[0] {
            Stmt::Expr(Expr::Assign { value, .. }) => {
                assert!(matches!(**value, Expr::Cast { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
        match &body.stmts[1] {
            Stmt::Expr(Expr::Assign { value, .. }) => {
                assert!(matches!(**value, Expr::Binary { op: BinaryOp::Sub, .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
        match &body.stmts[2] {
            Stmt::Expr(Expr::Assign { value, .. }) => {
                assert!(matches!(**value, Expr::Cast { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn creation_forms() {
        let unit = parse_ok(
            "class A { void m() { new Foo(1); new int[10]; new String[] {\"a\"}; outer.new Inner(); } }",
        );
        let body = first_method(&unit).body.as_ref().unwrap();
        assert!(matches!(body.stmts[0], Stmt::Expr(Expr::New { .. })));
        assert!(matches!(body.stmts[1], Stmt::Expr(Expr::ArrayNew { .. })));
        match &body.stmts[2] {
            Stmt::Expr(Expr::ArrayNew { init, .. }) => assert!(init.is_some()),
            other => panic!("expected array creation, got {other:?}"),
        }
        match &body.stmts[3] {
            Stmt::Expr(Expr::New { qualifier, ty, .. }) => {
                assert!(qualifier.is_some());
                assert_eq!(ty.name(), Some("Inner"));
            }
            other => panic!("expected qualified creation, got {other:?}"),
        }
    }

    #[test]
    fn control_flow_statements() {
        let unit = parse_ok(
            "class A { void m() {\n  if (a) { b(); } else c();\n  while (x) y();\n  do { z(); } while (k);\n  for (int i = 0, j = 1; i < n; i++) body();\n  for (String s : names) use(s);\n  switch (tag) { case 1: one(); break; default: other(); }\n  try (Res r = open()) { work(); } catch (IOException | RuntimeException e) { log(e); } finally { close(); }\n  synchronized (lock) { inside(); }\n  outer: while (true) break outer;\n} }",
        );
        let body = first_method(&unit).body.as_ref().unwrap();
        assert!(matches!(body.stmts[0], Stmt::If { .. }));
        assert!(matches!(body.stmts[1], Stmt::While { .. }));
        assert!(matches!(body.stmts[2], Stmt::Do { .. }));
        match &body.stmts[3] {
            Stmt::For { init, cond, update, .. } => {
                assert_eq!(init.len(), 1);
                assert!(matches!(init[0], Expr::InlineDecl { .. }));
                assert!(cond.is_some());
                assert_eq!(update.len(), 1);
            }
            other => panic!("expected for, got {other:?}"),
        }
        match &body.stmts[4] {
            Stmt::ForEach { param, .. } => assert_eq!(param.name, "s"),
            other => panic!("expected foreach, got {other:?}"),
        }
        match &body.stmts[5] {
            Stmt::Switch { arms, .. } => assert_eq!(arms.len(), 2),
            other => panic!("expected switch, got {other:?}"),
        }
        match &body.stmts[6] {
            Stmt::Try { resources, catches, finally, .. } => {
                assert_eq!(resources.len(), 1);
                assert_eq!(catches.len(), 1);
                assert!(matches!(
                    catches[0].param.ty,
                    Some(TypeRef::Union(_))
                ));
                assert!(finally.is_some());
            }
            other => panic!("expected try, got {other:?}"),
        }
        assert!(matches!(body.stmts[7], Stmt::Synchronized { .. }));
        assert!(matches!(body.stmts[8], Stmt::Labeled { .. }));
    }

    #[test]
    fn lambdas_and_method_refs() {
        let unit = parse_ok(
            "class A { void m() { run(x -> x); map((a, b) -> { return a; }); take(String::valueOf); apply((Foo f) -> f); } }",
        );
        let body = first_method(&unit).body.as_ref().unwrap();
        match &body.stmts[0] {
            Stmt::Expr(Expr::Call { args, .. }) => {
                assert!(matches!(args[0], Expr::Lambda(_)));
            }
            other => panic!("expected call, got {other:?}"),
        }
        match &body.stmts[2] {
            Stmt::Expr(Expr::Call { args, .. }) => {
                assert!(matches!(args[0], Expr::MethodRef { .. }));
            }
            other => panic!("expected call, got {other:?}"),
        }
        match &body.stmts[3] {
            Stmt::Expr(Expr::Call { args, .. }) => match &args[0] {
                Expr::Lambda(lambda) => {
                    assert_eq!(lambda.params[0].ty.as_ref().and_then(|t| t.name()), Some("Foo"));
                }
                other => panic!("expected lambda, got {other:?}"),
            },
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn conditional_instanceof_and_super() {
        let unit = parse_ok(
            "class A { void m() { r = c ? a : b; if (o instanceof Foo) {} super.close(); v = super.base; } }",
        );
        let body = first_method(&unit).body.as_ref().unwrap();
        match &body.stmts[0] {
            Stmt::Expr(Expr::Assign { value, .. }) => {
                assert!(matches!(**value, Expr::Conditional { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
        match &body.stmts[1] {
            Stmt::If { cond, .. } => assert!(matches!(cond, Expr::InstanceOf { .. })),
            other => panic!("expected if, got {other:?}"),
        }
        assert!(matches!(body.stmts[2], Stmt::Expr(Expr::SuperCall { .. })));
        match &body.stmts[3] {
            Stmt::Expr(Expr::Assign { value, .. }) => {
                assert!(matches!(**value, Expr::SuperField { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn anonymous_class_body() {
        let unit = parse_ok("class A { Runnable r = new Runnable() { public void run() {} }; }");
        match &unit.types[0].members[0] {
            Member::Field(f) => match f.fragments[0].init.as_ref().unwrap() {
                Expr::New { body, .. } => assert_eq!(body.as_ref().unwrap().len(), 1),
                other => panic!("expected creation, got {other:?}"),
            },
            other => panic!("expected field, got {other:?}"),
        }
    }

    #[test]
    fn initializer_blocks() {
        let unit = parse_ok("class A { static { setup(); } { tick(); } }");
        match &unit.types[0].members[0] {
            Member::Initializer(init) => assert!(init.is_static),
            other => panic!("expected initializer, got {other:?}"),
        }
        match &unit.types[0].members[1] {
            Member::Initializer(init) => assert!(!init.is_static),
            other => panic!("expected initializer, got {other:?}"),
        }
    }

    #[test]
    fn parse_error_reports_offset() {
        let err = parse("class Foo { void m() { return }; }").unwrap_err();
        assert!(err.offset > 0);
    }

    #[test]
    fn this_and_super_constructor_delegation() {
        let unit = parse_ok("class A { A() { this(1); } A(int x) { super(); } }");
        let members = &unit.types[0].members;
        match &members[0] {
            Member::Method(m) => {
                let body = m.body.as_ref().unwrap();
                assert!(matches!(
                    body.stmts[0],
                    Stmt::Expr(Expr::ConstructorCall { .. })
                ));
            }
            other => panic!("expected constructor, got {other:?}"),
        }
    }
}
