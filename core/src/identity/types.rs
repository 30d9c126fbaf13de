#![deny(missing_docs)]

//! # Type References
//!
//! Structural description of the types that appear in member signatures.
//!
//! Hosts describe types with a compact notation close to runtime type names:
//!
//! | Notation                                  | Meaning                               |
//! |-------------------------------------------|---------------------------------------|
//! | `Acme.Api.UsersController`                | namespace `Acme.Api`, type name       |
//! | `Acme.Api.Outer+Inner`                    | `Inner` nested inside `Outer`         |
//! | ``System.Collections.Generic.List`1``     | generic type definition (arity 1)     |
//! | `System.Collections.Generic.List<System.Int32>` | constructed generic type        |
//! | `System.String[]`, `System.Int32[,]`      | arrays (rank 1, rank 2)               |
//! | `System.Int32&`, `System.Byte*`           | by-reference and pointer types        |
//! | `!0`, `!!0`                               | type / method generic parameter       |

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One name in the chain of (possibly nested) type names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSegment {
    /// Simple name without arity marker (e.g. `Dictionary`).
    pub name: String,
    /// Number of generic parameters introduced by this segment.
    pub arity: usize,
}

impl TypeSegment {
    /// Creates a non-generic segment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
        }
    }

    /// Creates a segment that introduces `arity` generic parameters.
    pub fn generic(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// A named (non-parameter, non-array) type.
///
/// `segments` runs from the outermost declaring type to the type itself.
/// `generic_args` is the flat list of arguments for a constructed generic type,
/// consumed segment by segment according to each segment's arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamedType {
    /// Dotted namespace, if any.
    pub namespace: Option<String>,
    /// Declaring chain, outermost first. Never empty.
    pub segments: Vec<TypeSegment>,
    /// Generic arguments when the type is constructed.
    pub generic_args: Vec<TypeRef>,
}

impl NamedType {
    /// Creates a top-level, non-generic type.
    pub fn new(namespace: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            segments: vec![TypeSegment::new(name)],
            generic_args: Vec::new(),
        }
    }

    /// Appends a nested type segment.
    pub fn nested(mut self, segment: TypeSegment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Sets the generic arity of the innermost segment.
    pub fn with_arity(mut self, arity: usize) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.arity = arity;
        }
        self
    }

    /// Sets the generic arguments of a constructed type.
    pub fn with_generic_args(mut self, args: Vec<TypeRef>) -> Self {
        self.generic_args = args;
        self
    }

    /// The innermost simple name.
    pub fn name(&self) -> &str {
        self.segments
            .last()
            .map(|segment| segment.name.as_str())
            .unwrap_or_default()
    }

    /// Parses a named type from the type notation.
    pub fn parse(text: &str) -> AppResult<Self> {
        match TypeRef::parse(text)? {
            TypeRef::Named(named) => Ok(named),
            other => Err(AppError::Parse(format!(
                "'{}' is not a named type (found '{}')",
                text, other
            ))),
        }
    }
}

/// A type as it appears in a member signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// A named type, possibly constructed generic.
    Named(NamedType),
    /// Generic parameter of the declaring type, by position.
    TypeParameter(usize),
    /// Generic parameter of the method itself, by position.
    MethodTypeParameter(usize),
    /// Array of `element`; `rank` 1 is a single-dimensional array.
    Array {
        /// Element type.
        element: Box<TypeRef>,
        /// Number of dimensions.
        rank: usize,
    },
    /// By-reference (`ref`/`out`/`in`) parameter type.
    ByRef(Box<TypeRef>),
    /// Unmanaged pointer type.
    Pointer(Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for a top-level named type (`System`, `Int32`).
    pub fn named(namespace: Option<&str>, name: impl Into<String>) -> Self {
        TypeRef::Named(NamedType::new(namespace, name))
    }

    /// Wraps `self` in a single-dimensional array.
    pub fn array(self) -> Self {
        TypeRef::Array {
            element: Box::new(self),
            rank: 1,
        }
    }

    /// Parses the type notation described in the module docs.
    ///
    /// # Examples
    /// ```
    /// use xmldoc_core::identity::TypeRef;
    ///
    /// let ty = TypeRef::parse("System.Collections.Generic.List<System.Int32>[]").unwrap();
    /// assert_eq!(ty.to_string(), "System.Collections.Generic.List`1<System.Int32>[]");
    /// ```
    pub fn parse(text: &str) -> AppResult<Self> {
        let mut parser = NotationParser::new(text);
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if let Some(rest) = parser.remaining() {
            return Err(parser.error(&format!("unexpected trailing input '{}'", rest)));
        }
        Ok(ty)
    }
}

impl FromStr for TypeRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

impl FromStr for NamedType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamedType::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl TryFrom<String> for NamedType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NamedType::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

impl From<NamedType> for String {
    fn from(value: NamedType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.namespace {
            write!(f, "{}.", ns)?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(&segment.name)?;
            if segment.arity > 0 {
                write!(f, "`{}", segment.arity)?;
            }
        }
        if !self.generic_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.generic_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(named) => write!(f, "{}", named),
            TypeRef::TypeParameter(position) => write!(f, "!{}", position),
            TypeRef::MethodTypeParameter(position) => write!(f, "!!{}", position),
            TypeRef::Array { element, rank } => {
                write!(f, "{}[{}]", element, ",".repeat(rank.saturating_sub(1)))
            }
            TypeRef::ByRef(inner) => write!(f, "{}&", inner),
            TypeRef::Pointer(inner) => write!(f, "{}*", inner),
        }
    }
}

/// Recursive descent parser over the type notation.
struct NotationParser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> NotationParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: &str) -> AppError {
        AppError::Parse(format!(
            "invalid type '{}' at position {}: {}",
            self.source, self.pos, message
        ))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn remaining(&self) -> Option<String> {
        if self.pos < self.chars.len() {
            Some(self.chars[self.pos..].iter().collect())
        } else {
            None
        }
    }

    fn parse_type(&mut self) -> AppResult<TypeRef> {
        self.skip_whitespace();
        let mut ty = if self.eat('!') {
            if self.eat('!') {
                TypeRef::MethodTypeParameter(self.parse_number()?)
            } else {
                TypeRef::TypeParameter(self.parse_number()?)
            }
        } else {
            TypeRef::Named(self.parse_named()?)
        };

        loop {
            self.skip_whitespace();
            if self.eat('[') {
                let mut rank = 1;
                loop {
                    self.skip_whitespace();
                    if self.eat(',') {
                        rank += 1;
                    } else if self.eat(']') {
                        break;
                    } else {
                        return Err(self.error("expected ',' or ']' in array suffix"));
                    }
                }
                ty = TypeRef::Array {
                    element: Box::new(ty),
                    rank,
                };
            } else if self.eat('&') {
                ty = TypeRef::ByRef(Box::new(ty));
            } else if self.eat('*') {
                ty = TypeRef::Pointer(Box::new(ty));
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_number(&mut self) -> AppResult<usize> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a generic parameter position"));
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map_err(|_| self.error("generic parameter position out of range"))
    }

    fn parse_identifier(&mut self) -> AppResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_named(&mut self) -> AppResult<NamedType> {
        let mut dotted = vec![self.parse_identifier()?];
        while self.eat('.') {
            dotted.push(self.parse_identifier()?);
        }
        let mut nested = Vec::new();
        while self.eat('+') {
            nested.push(self.parse_identifier()?);
        }

        let outer = dotted.pop().unwrap_or_default();
        let namespace = if dotted.is_empty() {
            None
        } else {
            Some(dotted.join("."))
        };

        let mut segments = Vec::with_capacity(nested.len() + 1);
        for raw in std::iter::once(outer).chain(nested) {
            segments.push(self.split_arity(&raw)?);
        }

        let mut generic_args = Vec::new();
        self.skip_whitespace();
        if self.eat('<') {
            loop {
                generic_args.push(self.parse_type()?);
                self.skip_whitespace();
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected ',' or '>' in generic argument list"));
            }
        }

        let declared: usize = segments.iter().map(|s| s.arity).sum();
        if !generic_args.is_empty() {
            if declared == 0 {
                if let Some(last) = segments.last_mut() {
                    last.arity = generic_args.len();
                }
            } else if declared != generic_args.len() {
                return Err(self.error(&format!(
                    "declared arity {} does not match {} generic arguments",
                    declared,
                    generic_args.len()
                )));
            }
        }

        Ok(NamedType {
            namespace,
            segments,
            generic_args,
        })
    }

    fn split_arity(&self, raw: &str) -> AppResult<TypeSegment> {
        match raw.split_once('`') {
            Some((name, arity)) => {
                let arity = arity
                    .parse()
                    .map_err(|_| self.error(&format!("invalid generic arity in '{}'", raw)))?;
                Ok(TypeSegment::generic(name, arity))
            }
            None => Ok(TypeSegment::new(raw)),
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '.' | '+' | '<' | '>' | ',' | '[' | ']' | '&' | '*' | '!')
}
