//! Lexer and recursive-descent parser for JVM generic signatures (the `Signature` attribute of
//! classes, methods and fields).

#![forbid(unsafe_code)]

mod display;
mod error;
mod lexer;
mod parser;
mod syntax;

pub use crate::error::{Result, SignatureError};
pub use crate::lexer::{Lexer, Token, TokenKind};
pub use crate::parser::{
    parse_class_signature, parse_field_signature, parse_method_signature, MAX_NESTING_DEPTH,
};
pub use crate::syntax::{
    BaseType, ClassSignature, ClassTypeSignature, FieldTypeSignature, MethodSignature,
    SimpleClassTypeSignature, TypeArgument, TypeParameter, TypeSignature, TypeVariableSignature,
};
