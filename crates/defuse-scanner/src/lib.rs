//! Java scanner/tokenizer for the defuse analyzer.
//!
//! This crate provides the lexical analysis phase:
//! - `TokenKind` - token types
//! - `Token` - a kind plus its source span (text is sliced from the source)
//! - `Scanner` - the tokenizer
//!
//! Comments and whitespace are consumed as trivia and never surface as
//! tokens. `>>`-family operators are lexed with maximal munch; the parser
//! splits them when closing nested type-argument lists.

use defuse_common::Span;
use std::fmt;

/// Token types for the Java subset the analyzer understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,

    // Keywords
    AbstractKeyword,
    AssertKeyword,
    BooleanKeyword,
    BreakKeyword,
    ByteKeyword,
    CaseKeyword,
    CatchKeyword,
    CharKeyword,
    ClassKeyword,
    ContinueKeyword,
    DefaultKeyword,
    DoKeyword,
    DoubleKeyword,
    ElseKeyword,
    EnumKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinalKeyword,
    FinallyKeyword,
    FloatKeyword,
    ForKeyword,
    IfKeyword,
    ImplementsKeyword,
    ImportKeyword,
    InstanceofKeyword,
    IntKeyword,
    InterfaceKeyword,
    LongKeyword,
    NativeKeyword,
    NewKeyword,
    NullKeyword,
    PackageKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    ReturnKeyword,
    ShortKeyword,
    StaticKeyword,
    StrictfpKeyword,
    SuperKeyword,
    SwitchKeyword,
    SynchronizedKeyword,
    ThisKeyword,
    ThrowKeyword,
    ThrowsKeyword,
    TransientKeyword,
    TrueKeyword,
    TryKeyword,
    VoidKeyword,
    VolatileKeyword,
    WhileKeyword,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    DotDotDot,
    At,
    Colon,
    ColonColon,
    Question,
    Arrow,

    // Operators
    Equals,
    EqualsEquals,
    Bang,
    BangEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThanLessThan,
    GreaterThanGreaterThan,
    GreaterThanGreaterThanGreaterThan,
    Plus,
    PlusPlus,
    Minus,
    MinusMinus,
    Star,
    Slash,
    Percent,
    Amp,
    AmpAmp,
    Bar,
    BarBar,
    Caret,
    Tilde,
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,
    AmpEquals,
    BarEquals,
    CaretEquals,
    LessThanLessThanEquals,
    GreaterThanGreaterThanEquals,
    GreaterThanGreaterThanGreaterThanEquals,

    EndOfFile,
}

impl TokenKind {
    /// Primitive type keywords (`int`, `boolean`, ...), which never produce
    /// a nameable type form.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            TokenKind::BooleanKeyword
                | TokenKind::ByteKeyword
                | TokenKind::CharKeyword
                | TokenKind::DoubleKeyword
                | TokenKind::FloatKeyword
                | TokenKind::IntKeyword
                | TokenKind::LongKeyword
                | TokenKind::ShortKeyword
        )
    }

    /// Declaration modifier keywords, all skipped uniformly.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::AbstractKeyword
                | TokenKind::FinalKeyword
                | TokenKind::NativeKeyword
                | TokenKind::PrivateKeyword
                | TokenKind::ProtectedKeyword
                | TokenKind::PublicKeyword
                | TokenKind::StaticKeyword
                | TokenKind::StrictfpKeyword
                | TokenKind::SynchronizedKeyword
                | TokenKind::TransientKeyword
                | TokenKind::VolatileKeyword
        )
    }

    /// Compound and simple assignment operators.
    pub fn is_assignment_op(self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
                | TokenKind::AmpEquals
                | TokenKind::BarEquals
                | TokenKind::CaretEquals
                | TokenKind::LessThanLessThanEquals
                | TokenKind::GreaterThanGreaterThanEquals
                | TokenKind::GreaterThanGreaterThanGreaterThanEquals
        )
    }
}

/// A single token: kind plus source span. The lexeme is `&source[span]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Token {
            kind,
            span: Span::new(start, end),
        }
    }

    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.span.start as usize..self.span.end as usize]
    }
}

/// A lexical error: the scan stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanError {
    pub message: String,
    pub offset: u32,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.offset)
    }
}

impl std::error::Error for ScanError {}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "abstract" => TokenKind::AbstractKeyword,
        "assert" => TokenKind::AssertKeyword,
        "boolean" => TokenKind::BooleanKeyword,
        "break" => TokenKind::BreakKeyword,
        "byte" => TokenKind::ByteKeyword,
        "case" => TokenKind::CaseKeyword,
        "catch" => TokenKind::CatchKeyword,
        "char" => TokenKind::CharKeyword,
        "class" => TokenKind::ClassKeyword,
        "continue" => TokenKind::ContinueKeyword,
        "default" => TokenKind::DefaultKeyword,
        "do" => TokenKind::DoKeyword,
        "double" => TokenKind::DoubleKeyword,
        "else" => TokenKind::ElseKeyword,
        "enum" => TokenKind::EnumKeyword,
        "extends" => TokenKind::ExtendsKeyword,
        "false" => TokenKind::FalseKeyword,
        "final" => TokenKind::FinalKeyword,
        "finally" => TokenKind::FinallyKeyword,
        "float" => TokenKind::FloatKeyword,
        "for" => TokenKind::ForKeyword,
        "if" => TokenKind::IfKeyword,
        "implements" => TokenKind::ImplementsKeyword,
        "import" => TokenKind::ImportKeyword,
        "instanceof" => TokenKind::InstanceofKeyword,
        "int" => TokenKind::IntKeyword,
        "interface" => TokenKind::InterfaceKeyword,
        "long" => TokenKind::LongKeyword,
        "native" => TokenKind::NativeKeyword,
        "new" => TokenKind::NewKeyword,
        "null" => TokenKind::NullKeyword,
        "package" => TokenKind::PackageKeyword,
        "private" => TokenKind::PrivateKeyword,
        "protected" => TokenKind::ProtectedKeyword,
        "public" => TokenKind::PublicKeyword,
        "return" => TokenKind::ReturnKeyword,
        "short" => TokenKind::ShortKeyword,
        "static" => TokenKind::StaticKeyword,
        "strictfp" => TokenKind::StrictfpKeyword,
        "super" => TokenKind::SuperKeyword,
        "switch" => TokenKind::SwitchKeyword,
        "synchronized" => TokenKind::SynchronizedKeyword,
        "this" => TokenKind::ThisKeyword,
        "throw" => TokenKind::ThrowKeyword,
        "throws" => TokenKind::ThrowsKeyword,
        "transient" => TokenKind::TransientKeyword,
        "true" => TokenKind::TrueKeyword,
        "try" => TokenKind::TryKeyword,
        "void" => TokenKind::VoidKeyword,
        "volatile" => TokenKind::VolatileKeyword,
        "while" => TokenKind::WhileKeyword,
        _ => return None,
    };
    Some(kind)
}

/// The tokenizer. Scans the whole source up front; the parser works over
/// the resulting token buffer (backtracking is a cursor reset).
pub struct Scanner<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Tokenize the entire source. The returned buffer always ends with a
    /// single `EndOfFile` token.
    pub fn scan_all(mut self) -> Result<Vec<Token>, ScanError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ScanError> {
        self.skip_trivia()?;
        let start = self.pos as u32;
        let Some(&b) = self.bytes.get(self.pos) else {
            return Ok(Token::new(TokenKind::EndOfFile, start, start));
        };

        if b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80 {
            return Ok(self.scan_word(start));
        }
        if b.is_ascii_digit() {
            return self.scan_number(start);
        }
        match b {
            b'"' => self.scan_string(start),
            b'\'' => self.scan_char(start),
            b'.' => {
                // A dot followed by a digit starts a float literal.
                if self
                    .bytes
                    .get(self.pos + 1)
                    .is_some_and(|c| c.is_ascii_digit())
                {
                    self.scan_number(start)
                } else {
                    self.scan_operator(start)
                }
            }
            _ => self.scan_operator(start),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') => match self.bytes.get(self.pos + 1) {
                    Some(b'/') => {
                        while let Some(&b) = self.bytes.get(self.pos) {
                            if b == b'\n' {
                                break;
                            }
                            self.pos += 1;
                        }
                    }
                    Some(b'*') => {
                        let open = self.pos as u32;
                        self.pos += 2;
                        loop {
                            match self.bytes.get(self.pos) {
                                Some(b'*') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                                    self.pos += 2;
                                    break;
                                }
                                Some(_) => self.pos += 1,
                                None => {
                                    return Err(ScanError {
                                        message: "unterminated block comment".into(),
                                        offset: open,
                                    });
                                }
                            }
                        }
                    }
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn scan_word(&mut self, start: u32) -> Token {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80 {
                self.pos += 1;
            } else {
                break;
            }
        }
        let end = self.pos as u32;
        let text = &self.source[start as usize..end as usize];
        let kind = keyword_kind(text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, start, end)
    }

    fn scan_number(&mut self, start: u32) -> Result<Token, ScanError> {
        let mut is_float = false;

        if self.bytes[self.pos] == b'0'
            && matches!(self.bytes.get(self.pos + 1), Some(b'x' | b'X' | b'b' | b'B'))
        {
            self.pos += 2;
            while self
                .bytes
                .get(self.pos)
                .is_some_and(|b| b.is_ascii_hexdigit() || *b == b'_')
            {
                self.pos += 1;
            }
        } else {
            self.eat_digits();
            if self.bytes.get(self.pos) == Some(&b'.')
                && self
                    .bytes
                    .get(self.pos + 1)
                    .is_some_and(|b| b.is_ascii_digit())
            {
                is_float = true;
                self.pos += 1;
                self.eat_digits();
            }
            if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.bytes.get(self.pos), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                self.eat_digits();
            }
        }

        match self.bytes.get(self.pos) {
            Some(b'f' | b'F' | b'd' | b'D') => {
                is_float = true;
                self.pos += 1;
            }
            Some(b'l' | b'L') => {
                self.pos += 1;
            }
            _ => {}
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        Ok(Token::new(kind, start, self.pos as u32))
    }

    fn eat_digits(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_digit() || *b == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, start: u32) -> Result<Token, ScanError> {
        self.pos += 1;
        loop {
            match self.bytes.get(self.pos) {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(Token::new(TokenKind::StringLiteral, start, self.pos as u32));
                }
                Some(b'\\') => self.pos += 2,
                Some(b'\n') | None => {
                    return Err(ScanError {
                        message: "unterminated string literal".into(),
                        offset: start,
                    });
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn scan_char(&mut self, start: u32) -> Result<Token, ScanError> {
        self.pos += 1;
        loop {
            match self.bytes.get(self.pos) {
                Some(b'\'') => {
                    self.pos += 1;
                    return Ok(Token::new(TokenKind::CharLiteral, start, self.pos as u32));
                }
                Some(b'\\') => self.pos += 2,
                Some(b'\n') | None => {
                    return Err(ScanError {
                        message: "unterminated character literal".into(),
                        offset: start,
                    });
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn scan_operator(&mut self, start: u32) -> Result<Token, ScanError> {
        // Maximal munch over the operator table, longest first.
        let rest = &self.bytes[self.pos..];
        let table: &[(&[u8], TokenKind)] = &[
            (b">>>=", TokenKind::GreaterThanGreaterThanGreaterThanEquals),
            (b">>>", TokenKind::GreaterThanGreaterThanGreaterThan),
            (b">>=", TokenKind::GreaterThanGreaterThanEquals),
            (b"<<=", TokenKind::LessThanLessThanEquals),
            (b"...", TokenKind::DotDotDot),
            (b"==", TokenKind::EqualsEquals),
            (b"!=", TokenKind::BangEquals),
            (b"<=", TokenKind::LessThanEquals),
            (b">=", TokenKind::GreaterThanEquals),
            (b"&&", TokenKind::AmpAmp),
            (b"||", TokenKind::BarBar),
            (b"++", TokenKind::PlusPlus),
            (b"--", TokenKind::MinusMinus),
            (b"<<", TokenKind::LessThanLessThan),
            (b">>", TokenKind::GreaterThanGreaterThan),
            (b"+=", TokenKind::PlusEquals),
            (b"-=", TokenKind::MinusEquals),
            (b"*=", TokenKind::StarEquals),
            (b"/=", TokenKind::SlashEquals),
            (b"%=", TokenKind::PercentEquals),
            (b"&=", TokenKind::AmpEquals),
            (b"|=", TokenKind::BarEquals),
            (b"^=", TokenKind::CaretEquals),
            (b"->", TokenKind::Arrow),
            (b"::", TokenKind::ColonColon),
            (b"(", TokenKind::OpenParen),
            (b")", TokenKind::CloseParen),
            (b"{", TokenKind::OpenBrace),
            (b"}", TokenKind::CloseBrace),
            (b"[", TokenKind::OpenBracket),
            (b"]", TokenKind::CloseBracket),
            (b";", TokenKind::Semicolon),
            (b",", TokenKind::Comma),
            (b".", TokenKind::Dot),
            (b"@", TokenKind::At),
            (b":", TokenKind::Colon),
            (b"?", TokenKind::Question),
            (b"=", TokenKind::Equals),
            (b"!", TokenKind::Bang),
            (b"<", TokenKind::LessThan),
            (b">", TokenKind::GreaterThan),
            (b"+", TokenKind::Plus),
            (b"-", TokenKind::Minus),
            (b"*", TokenKind::Star),
            (b"/", TokenKind::Slash),
            (b"%", TokenKind::Percent),
            (b"&", TokenKind::Amp),
            (b"|", TokenKind::Bar),
            (b"^", TokenKind::Caret),
            (b"~", TokenKind::Tilde),
        ];
        for (text, kind) in table {
            if rest.starts_with(text) {
                self.pos += text.len();
                return Ok(Token::new(*kind, start, self.pos as u32));
            }
        }
        Err(ScanError {
            message: format!("unexpected character `{}`", rest[0] as char),
            offset: start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::new(src)
            .scan_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("class Foo extends Bar"),
            vec![
                TokenKind::ClassKeyword,
                TokenKind::Identifier,
                TokenKind::ExtendsKeyword,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn token_text_slices_source() {
        let src = "int count = 42;";
        let tokens = Scanner::new(src).scan_all().unwrap();
        assert_eq!(tokens[1].text(src), "count");
        assert_eq!(tokens[3].text(src), "42");
    }

    #[test]
    fn operators_maximal_munch() {
        assert_eq!(
            kinds("a >>>= b >>> c >> d >= e > f"),
            vec![
                TokenKind::Identifier,
                TokenKind::GreaterThanGreaterThanGreaterThanEquals,
                TokenKind::Identifier,
                TokenKind::GreaterThanGreaterThanGreaterThan,
                TokenKind::Identifier,
                TokenKind::GreaterThanGreaterThan,
                TokenKind::Identifier,
                TokenKind::GreaterThanEquals,
                TokenKind::Identifier,
                TokenKind::GreaterThan,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn comments_are_trivia() {
        assert_eq!(
            kinds("x // line\n/* block\nspanning */ y"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn string_and_char_literals() {
        let src = r#"s = "a \"quoted\" string" + 'c' + '\n';"#;
        let toks = Scanner::new(src).scan_all().unwrap();
        let literal_kinds: Vec<_> = toks
            .iter()
            .filter(|t| {
                matches!(
                    t.kind,
                    TokenKind::StringLiteral | TokenKind::CharLiteral
                )
            })
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            literal_kinds,
            vec![
                TokenKind::StringLiteral,
                TokenKind::CharLiteral,
                TokenKind::CharLiteral,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Scanner::new("\"abc").scan_all().is_err());
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(
            kinds("0 42L 0xFF 0b1010 3.14 1e9 2.5f 10_000"),
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::IntLiteral,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn lambda_and_method_ref_operators() {
        assert_eq!(
            kinds("x -> Foo::bar"),
            vec![
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::ColonColon,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }
}
