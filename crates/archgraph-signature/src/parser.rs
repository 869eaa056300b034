use std::collections::HashSet;

use crate::error::{Result, SignatureError};
use crate::lexer::{Lexer, TokenKind};
use crate::syntax::{
    ClassSignature, ClassTypeSignature, FieldTypeSignature, MethodSignature,
    SimpleClassTypeSignature, TypeArgument, TypeParameter, TypeSignature, TypeVariableSignature,
};

/// Parses the `Signature` attribute of a class declaration.
pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut parser = Parser::new(sig);
    let parsed = parser.class_signature()?;
    parser.finish()?;
    Ok(parsed)
}

/// Parses the `Signature` attribute of a method declaration.
pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut parser = Parser::new(sig);
    let parsed = parser.method_signature()?;
    parser.finish()?;
    Ok(parsed)
}

/// Parses the `Signature` attribute of a field declaration.
pub fn parse_field_signature(sig: &str) -> Result<FieldTypeSignature> {
    let mut parser = Parser::new(sig);
    let parsed = parser.reference_type()?;
    parser.finish()?;
    Ok(parsed)
}

/// Deepest nesting of reference types: 255 array dimensions plus the element type.
pub const MAX_NESTING_DEPTH: usize = 256;

struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            depth: 0,
        }
    }

    fn finish(&self) -> Result<()> {
        if self.lexer.is_at_end() {
            Ok(())
        } else {
            Err(SignatureError::malformed(
                self.lexer.offset(),
                "trailing input after signature",
            ))
        }
    }

    fn at(&self, kind: TokenKind<'_>) -> bool {
        self.lexer.peek_marker() == Some(kind)
    }

    fn eat(&mut self, kind: TokenKind<'_>) -> Result<bool> {
        if self.at(kind) {
            self.lexer.next_marker()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind<'_>, context: &str) -> Result<usize> {
        let offset = self.lexer.offset();
        if self.eat(kind)? {
            Ok(offset)
        } else {
            Err(self.unexpected(&format!("{} {context}", kind.describe())))
        }
    }

    fn unexpected(&self, expected: &str) -> SignatureError {
        let offset = self.lexer.offset();
        if self.lexer.is_at_end() {
            SignatureError::malformed(offset, format!("unexpected end of signature, expected {expected}"))
        } else {
            SignatureError::malformed(offset, format!("expected {expected}"))
        }
    }

    fn identifier(&mut self) -> Result<(String, usize)> {
        let token = self.lexer.next_identifier()?;
        match token.kind {
            TokenKind::Identifier(text) => Ok((text.to_string(), token.offset)),
            _ => Err(SignatureError::malformed(token.offset, "expected identifier")),
        }
    }

    fn class_signature(&mut self) -> Result<ClassSignature> {
        let type_params = self.type_params()?;
        let super_class = self.class_type()?;
        let mut interfaces = Vec::new();
        while self.at(TokenKind::ClassStart) {
            interfaces.push(self.class_type()?);
        }
        Ok(ClassSignature {
            type_params,
            super_class,
            interfaces,
        })
    }

    fn method_signature(&mut self) -> Result<MethodSignature> {
        let type_params = self.type_params()?;
        self.expect(TokenKind::LParen, "opening the parameter list")?;
        let mut params = Vec::new();
        while !self.eat(TokenKind::RParen)? {
            if self.lexer.is_at_end() {
                return Err(self.unexpected("`)` closing the parameter list"));
            }
            params.push(self.java_type()?);
        }
        let return_type = if self.eat(TokenKind::Void)? {
            None
        } else {
            Some(self.java_type()?)
        };
        let mut throws = Vec::new();
        while self.eat(TokenKind::Caret)? {
            let thrown = match self.lexer.peek_marker() {
                Some(TokenKind::ClassStart) => FieldTypeSignature::Class(self.class_type()?),
                Some(TokenKind::TypeVarStart) => self.type_variable()?,
                _ => return Err(self.unexpected("class or type variable after `^`")),
            };
            throws.push(thrown);
        }
        Ok(MethodSignature {
            type_params,
            params,
            return_type,
            throws,
        })
    }

    /// `[ '<' TypeParam+ '>' ]`
    fn type_params(&mut self) -> Result<Vec<TypeParameter>> {
        if !self.eat(TokenKind::LAngle)? {
            return Ok(Vec::new());
        }
        if self.at(TokenKind::RAngle) {
            return Err(self.unexpected("type parameter"));
        }

        let mut params = Vec::new();
        let mut seen = HashSet::new();
        while !self.eat(TokenKind::RAngle)? {
            let param = self.type_param()?;
            if !seen.insert(param.name.clone()) {
                return Err(SignatureError::malformed(
                    param.offset,
                    format!("duplicate type parameter `{}`", param.name),
                ));
            }
            params.push(param);
        }
        Ok(params)
    }

    /// `Identifier ':' [ClassBound] (':' RefTypeSig)*`
    fn type_param(&mut self) -> Result<TypeParameter> {
        let (name, offset) = self.identifier()?;
        self.expect(TokenKind::Colon, "after type parameter name")?;
        let class_bound = if self.at_reference_type() {
            Some(self.reference_type()?)
        } else {
            None
        };
        let mut interface_bounds = Vec::new();
        while self.eat(TokenKind::Colon)? {
            interface_bounds.push(self.reference_type()?);
        }
        Ok(TypeParameter {
            name,
            offset,
            class_bound,
            interface_bounds,
        })
    }

    fn at_reference_type(&self) -> bool {
        matches!(
            self.lexer.peek_marker(),
            Some(TokenKind::ClassStart | TokenKind::TypeVarStart | TokenKind::ArrayMarker)
        )
    }

    fn reference_type(&mut self) -> Result<FieldTypeSignature> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SignatureError::malformed(
                self.lexer.offset(),
                "signature nested too deeply",
            ));
        }
        self.depth += 1;
        let parsed = self.nested_reference_type();
        self.depth -= 1;
        parsed
    }

    fn nested_reference_type(&mut self) -> Result<FieldTypeSignature> {
        match self.lexer.peek_marker() {
            Some(TokenKind::ClassStart) => Ok(FieldTypeSignature::Class(self.class_type()?)),
            Some(TokenKind::TypeVarStart) => self.type_variable(),
            Some(TokenKind::ArrayMarker) => {
                self.lexer.next_marker()?;
                Ok(FieldTypeSignature::Array(Box::new(self.java_type()?)))
            }
            _ => Err(self.unexpected("reference type signature")),
        }
    }

    fn java_type(&mut self) -> Result<TypeSignature> {
        if let Some(TokenKind::Base(base)) = self.lexer.peek_marker() {
            self.lexer.next_marker()?;
            return Ok(TypeSignature::Base(base));
        }
        Ok(TypeSignature::Reference(self.reference_type()?))
    }

    /// `'T' Identifier ';'`
    fn type_variable(&mut self) -> Result<FieldTypeSignature> {
        let offset = self.expect(TokenKind::TypeVarStart, "starting a type variable")?;
        let (name, _) = self.identifier()?;
        self.expect(TokenKind::Semicolon, "terminating type variable signature")?;
        Ok(FieldTypeSignature::TypeVariable(TypeVariableSignature {
            name,
            offset,
        }))
    }

    /// `'L' (Identifier '/')* Identifier [TypeArgs] ('.' Identifier [TypeArgs])* ';'`
    fn class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect(TokenKind::ClassStart, "starting a class type")?;
        let mut package = String::new();
        let (mut name, _) = self.identifier()?;
        while self.eat(TokenKind::Slash)? {
            if !package.is_empty() {
                package.push('/');
            }
            package.push_str(&name);
            name = self.identifier()?.0;
        }

        let type_args = self.type_args()?;
        let mut segments = vec![SimpleClassTypeSignature { name, type_args }];
        while self.eat(TokenKind::Dot)? {
            let (name, _) = self.identifier()?;
            let type_args = self.type_args()?;
            segments.push(SimpleClassTypeSignature { name, type_args });
        }

        self.expect(TokenKind::Semicolon, "terminating class type signature")?;
        Ok(ClassTypeSignature { package, segments })
    }

    /// `[ '<' TypeArg+ '>' ]`
    fn type_args(&mut self) -> Result<Vec<TypeArgument>> {
        if !self.eat(TokenKind::LAngle)? {
            return Ok(Vec::new());
        }
        if self.at(TokenKind::RAngle) {
            return Err(self.unexpected("type argument"));
        }
        let mut args = Vec::new();
        while !self.eat(TokenKind::RAngle)? {
            args.push(self.type_arg()?);
        }
        Ok(args)
    }

    fn type_arg(&mut self) -> Result<TypeArgument> {
        if self.eat(TokenKind::Star)? {
            return Ok(TypeArgument::Any);
        }
        if self.eat(TokenKind::Plus)? {
            return Ok(TypeArgument::Extends(self.reference_type()?));
        }
        if self.eat(TokenKind::Minus)? {
            return Ok(TypeArgument::Super(self.reference_type()?));
        }
        Ok(TypeArgument::Exact(self.reference_type()?))
    }
}
