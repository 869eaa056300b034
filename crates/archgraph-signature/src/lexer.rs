use crate::error::{Result, SignatureError};
use crate::syntax::BaseType;

/// A single grammar token.
///
/// The signature grammar is context sensitive: `L` starts a class type in a type position but is
/// an ordinary letter inside an identifier. The lexer therefore has two entry points, one per
/// token shape, and the parser picks the one the current production expects. Input is consumed
/// strictly left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    LAngle,
    RAngle,
    Colon,
    Semicolon,
    Dot,
    Slash,
    LParen,
    RParen,
    /// `^`, introduces a thrown type in method signatures.
    Caret,
    /// `*`, the unbounded wildcard.
    Star,
    Plus,
    Minus,
    /// `[`
    ArrayMarker,
    /// `L`
    ClassStart,
    /// `T`
    TypeVarStart,
    Base(BaseType),
    /// `V`
    Void,
    Identifier(&'a str),
    Eof,
}

impl TokenKind<'_> {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LAngle => "`<`",
            TokenKind::RAngle => "`>`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::Slash => "`/`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Caret => "`^`",
            TokenKind::Star => "`*`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::ArrayMarker => "`[`",
            TokenKind::ClassStart => "`L`",
            TokenKind::TypeVarStart => "`T`",
            TokenKind::Base(_) => "base type",
            TokenKind::Void => "`V`",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Eof => "end of signature",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Byte offset of the first byte of the token.
    pub offset: usize,
}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Classifies the byte at the cursor as a marker without consuming it.
    ///
    /// Returns `None` when the byte cannot start a marker token (it may still start an
    /// identifier).
    pub fn peek_marker(&self) -> Option<TokenKind<'a>> {
        match self.input.as_bytes().get(self.pos) {
            None => Some(TokenKind::Eof),
            Some(&b) => marker(b),
        }
    }

    /// Consumes one marker token.
    pub fn next_marker(&mut self) -> Result<Token<'a>> {
        let offset = self.pos;
        let kind = self.peek_marker().ok_or_else(|| {
            SignatureError::malformed(offset, format!("unexpected character {:?}", self.char_at(offset)))
        })?;
        if kind != TokenKind::Eof {
            self.pos += 1;
        }
        Ok(Token { kind, offset })
    }

    /// Consumes a maximal identifier: a non-empty run of characters other than
    /// `.`, `;`, `[`, `/`, `<`, `>` and `:`.
    pub fn next_identifier(&mut self) -> Result<Token<'a>> {
        let offset = self.pos;
        let rest = &self.input[offset..];
        let len = rest
            .bytes()
            .position(is_identifier_terminator)
            .unwrap_or(rest.len());
        if len == 0 {
            let message = if rest.is_empty() {
                "unexpected end of signature, expected identifier".to_string()
            } else {
                format!("expected identifier, found {:?}", self.char_at(offset))
            };
            return Err(SignatureError::malformed(offset, message));
        }
        self.pos += len;
        Ok(Token {
            kind: TokenKind::Identifier(&rest[..len]),
            offset,
        })
    }

    fn char_at(&self, offset: usize) -> char {
        self.input[offset..].chars().next().unwrap_or('\0')
    }
}

fn marker(b: u8) -> Option<TokenKind<'static>> {
    Some(match b {
        b'<' => TokenKind::LAngle,
        b'>' => TokenKind::RAngle,
        b':' => TokenKind::Colon,
        b';' => TokenKind::Semicolon,
        b'.' => TokenKind::Dot,
        b'/' => TokenKind::Slash,
        b'(' => TokenKind::LParen,
        b')' => TokenKind::RParen,
        b'^' => TokenKind::Caret,
        b'*' => TokenKind::Star,
        b'+' => TokenKind::Plus,
        b'-' => TokenKind::Minus,
        b'[' => TokenKind::ArrayMarker,
        b'L' => TokenKind::ClassStart,
        b'T' => TokenKind::TypeVarStart,
        b'V' => TokenKind::Void,
        other => TokenKind::Base(BaseType::from_descriptor(other)?),
    })
}

fn is_identifier_terminator(b: u8) -> bool {
    matches!(b, b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':')
}
