//! Tokenizer and recursive-descent parser for the executable subset of GraphQL
//! this service understands: operations, variable definitions with defaults,
//! fields with aliases and arguments, and nested selection sets.
//!
//! Fragments, directives and block strings are rejected with a parse error.

use pokedex_core::config::DEFAULT_MAX_QUERY_DEPTH;

use super::types::{GraphQLError, Location};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub variables: Vec<VariableDefinition>,
    pub selections: Vec<Field>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub type_ref: TypeRef,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// An input value as written in the query, before variables are bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(String),
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    pub selections: Vec<Field>,
    pub location: Location,
}

impl Field {
    /// Key under which the field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Punct(char),
    Spread,
    Name(String),
    Str(String),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    tok: Tok,
    loc: Location,
}

/// Split a query into tokens. Whitespace, commas and `#` comments are dropped.
fn tokenize(input: &str) -> Result<Vec<Token>, GraphQLError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1u32;
    let mut line_start = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let loc = Location {
            line,
            column: (i - line_start + 1) as u32,
        };

        if c == '\n' {
            line += 1;
            line_start = i + 1;
            i += 1;
            continue;
        }
        if c.is_whitespace() || c == ',' || c == '\u{feff}' {
            i += 1;
            continue;
        }
        if c == '#' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        if c == '"' {
            if chars.get(i + 1) == Some(&'"') && chars.get(i + 2) == Some(&'"') {
                return Err(GraphQLError::new("Block strings are not supported").at(loc));
            }
            i += 1;
            let mut s = String::new();
            loop {
                match chars.get(i) {
                    None | Some('\n') => {
                        return Err(GraphQLError::new("Unterminated string").at(loc));
                    }
                    Some('"') => {
                        i += 1;
                        break;
                    }
                    Some('\\') => {
                        let escaped = chars
                            .get(i + 1)
                            .ok_or_else(|| GraphQLError::new("Unterminated string").at(loc))?;
                        match escaped {
                            '"' => s.push('"'),
                            '\\' => s.push('\\'),
                            '/' => s.push('/'),
                            'b' => s.push('\u{0008}'),
                            'f' => s.push('\u{000c}'),
                            'n' => s.push('\n'),
                            'r' => s.push('\r'),
                            't' => s.push('\t'),
                            'u' => {
                                let (decoded, consumed) = unicode_escape(&chars, i + 2)
                                    .ok_or_else(|| {
                                        let hex: String =
                                            chars.iter().skip(i + 2).take(4).collect();
                                        GraphQLError::new(format!(
                                            "Invalid unicode escape '\\u{}'",
                                            hex
                                        ))
                                        .at(loc)
                                    })?;
                                s.push(decoded);
                                i += consumed;
                            }
                            other => {
                                return Err(GraphQLError::new(format!(
                                    "Invalid escape sequence '\\{}'",
                                    other
                                ))
                                .at(loc));
                            }
                        }
                        i += 2;
                    }
                    Some(&ch) => {
                        s.push(ch);
                        i += 1;
                    }
                }
            }
            tokens.push(Token { tok: Tok::Str(s), loc });
            continue;
        }

        if c == '.' {
            if chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
                tokens.push(Token { tok: Tok::Spread, loc });
                i += 3;
                continue;
            }
            return Err(GraphQLError::new("Unexpected character '.'").at(loc));
        }

        if matches!(
            c,
            '{' | '}' | '(' | ')' | '[' | ']' | ':' | '!' | '$' | '=' | '@' | '|' | '&'
        ) {
            tokens.push(Token { tok: Tok::Punct(c), loc });
            i += 1;
            continue;
        }

        if c == '-' || c.is_ascii_digit() {
            let start = i;
            i += 1;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || matches!(chars[i], '.' | '+' | '-'))
            {
                i += 1;
            }
            let raw: String = chars[start..i].iter().collect();
            let tok = if let Ok(n) = raw.parse::<i64>() {
                Tok::Int(n)
            } else if let Ok(n) = raw.parse::<f64>() {
                Tok::Float(n)
            } else {
                return Err(GraphQLError::new(format!("Invalid number '{}'", raw)).at(loc));
            };
            tokens.push(Token { tok, loc });
            continue;
        }

        if c == '_' || c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && (chars[i] == '_' || chars[i].is_ascii_alphanumeric()) {
                i += 1;
            }
            tokens.push(Token {
                tok: Tok::Name(chars[start..i].iter().collect()),
                loc,
            });
            continue;
        }

        return Err(GraphQLError::new(format!("Unexpected character '{}'", c)).at(loc));
    }

    Ok(tokens)
}

/// Decode the four hex digits at `start` (just past `\\u`). A high surrogate
/// must be followed by `\\u` and a low surrogate; the pair becomes one char.
/// Returns the char and the number of input chars consumed past `start`.
fn unicode_escape(chars: &[char], start: usize) -> Option<(char, usize)> {
    let hex4 = |at: usize| -> Option<u32> {
        let digits = chars.get(at..at + 4)?;
        if !digits.iter().all(char::is_ascii_hexdigit) {
            return None;
        }
        u32::from_str_radix(&digits.iter().collect::<String>(), 16).ok()
    };

    let high = hex4(start)?;
    match high {
        0xD800..=0xDBFF => {
            if chars.get(start + 4..start + 6)? != ['\\', 'u'] {
                return None;
            }
            let low = hex4(start + 6)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return None;
            }
            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(code).map(|c| (c, 10))
        }
        _ => char::from_u32(high).map(|c| (c, 4)),
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a query document with the default nesting limit.
pub fn parse(input: &str) -> Result<Document, GraphQLError> {
    parse_with_max_depth(input, DEFAULT_MAX_QUERY_DEPTH)
}

/// Parse a query document. Selection sets, list and object values and list
/// types all count towards `max_depth`.
pub fn parse_with_max_depth(input: &str, max_depth: usize) -> Result<Document, GraphQLError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };

    let mut operations = Vec::new();
    while !parser.at_end() {
        operations.push(parser.operation()?);
    }
    if operations.is_empty() {
        return Err(GraphQLError::new("Query document contains no operations"));
    }
    Ok(Document { operations })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn descend(&mut self) -> Result<(), GraphQLError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(GraphQLError::new(format!(
                "Query exceeds maximum depth of {}",
                self.max_depth
            ))
            .at(self.location()));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    fn location(&self) -> Location {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.loc)
            .unwrap_or(Location { line: 1, column: 1 })
    }

    fn is_punct(&self, c: char) -> bool {
        self.peek() == Some(&Tok::Punct(c))
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.is_punct(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<(), GraphQLError> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", c)))
        }
    }

    fn name(&mut self) -> Result<String, GraphQLError> {
        match self.peek() {
            Some(Tok::Name(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected("a name")),
        }
    }

    fn unexpected(&self, expected: &str) -> GraphQLError {
        let found = match self.peek() {
            None => "end of query".to_string(),
            Some(Tok::Punct(c)) => format!("'{}'", c),
            Some(Tok::Spread) => "'...'".to_string(),
            Some(Tok::Name(n)) => format!("'{}'", n),
            Some(Tok::Str(s)) => format!("\"{}\"", s),
            Some(Tok::Int(n)) => n.to_string(),
            Some(Tok::Float(n)) => n.to_string(),
        };
        GraphQLError::new(format!("Expected {}, found {}", expected, found)).at(self.location())
    }

    fn operation(&mut self) -> Result<Operation, GraphQLError> {
        let location = self.location();

        if self.is_punct('{') {
            return Ok(Operation {
                kind: OperationKind::Query,
                name: None,
                variables: Vec::new(),
                selections: self.selection_set()?,
                location,
            });
        }

        let kind = match self.peek() {
            Some(Tok::Name(n)) if n == "query" => OperationKind::Query,
            Some(Tok::Name(n)) if n == "mutation" => OperationKind::Mutation,
            Some(Tok::Name(n)) if n == "subscription" => OperationKind::Subscription,
            Some(Tok::Name(n)) if n == "fragment" => {
                return Err(GraphQLError::new("Fragments are not supported").at(location));
            }
            _ => return Err(self.unexpected("an operation")),
        };
        self.pos += 1;

        let name = match self.peek() {
            Some(Tok::Name(_)) => Some(self.name()?),
            _ => None,
        };

        let variables = if self.is_punct('(') {
            self.variable_definitions()?
        } else {
            Vec::new()
        };

        self.reject_directives()?;

        Ok(Operation {
            kind,
            name,
            variables,
            selections: self.selection_set()?,
            location,
        })
    }

    fn variable_definitions(&mut self) -> Result<Vec<VariableDefinition>, GraphQLError> {
        self.expect_punct('(')?;
        let mut defs = Vec::new();
        while !self.eat_punct(')') {
            self.expect_punct('$')?;
            let name = self.name()?;
            self.expect_punct(':')?;
            let type_ref = self.type_ref()?;
            let default = if self.eat_punct('=') {
                Some(self.value(true)?)
            } else {
                None
            };
            defs.push(VariableDefinition {
                name,
                type_ref,
                default,
            });
        }
        Ok(defs)
    }

    fn type_ref(&mut self) -> Result<TypeRef, GraphQLError> {
        let base = if self.eat_punct('[') {
            self.descend()?;
            let inner = self.type_ref()?;
            self.expect_punct(']')?;
            self.ascend();
            TypeRef::List(Box::new(inner))
        } else {
            TypeRef::Named(self.name()?)
        };
        if self.eat_punct('!') {
            Ok(TypeRef::NonNull(Box::new(base)))
        } else {
            Ok(base)
        }
    }

    fn reject_directives(&self) -> Result<(), GraphQLError> {
        if self.is_punct('@') {
            return Err(GraphQLError::new("Directives are not supported").at(self.location()));
        }
        Ok(())
    }

    fn selection_set(&mut self) -> Result<Vec<Field>, GraphQLError> {
        self.expect_punct('{')?;
        self.descend()?;
        let mut fields = Vec::new();
        while !self.eat_punct('}') {
            if self.peek() == Some(&Tok::Spread) {
                return Err(GraphQLError::new("Fragments are not supported").at(self.location()));
            }
            if self.at_end() {
                return Err(self.unexpected("'}'"));
            }
            fields.push(self.field()?);
        }
        if fields.is_empty() {
            return Err(GraphQLError::new("Selection set cannot be empty").at(self.location()));
        }
        self.ascend();
        Ok(fields)
    }

    fn field(&mut self) -> Result<Field, GraphQLError> {
        let location = self.location();
        let first = self.name()?;
        let (alias, name) = if self.eat_punct(':') {
            (Some(first), self.name()?)
        } else {
            (None, first)
        };

        let mut arguments = Vec::new();
        if self.eat_punct('(') {
            while !self.eat_punct(')') {
                let arg = self.name()?;
                self.expect_punct(':')?;
                let value = self.value(false)?;
                arguments.push((arg, value));
            }
        }

        self.reject_directives()?;

        let selections = if self.is_punct('{') {
            self.selection_set()?
        } else {
            Vec::new()
        };

        Ok(Field {
            alias,
            name,
            arguments,
            selections,
            location,
        })
    }

    /// Parse a value; `constant` forbids variables (used for defaults).
    fn value(&mut self, constant: bool) -> Result<Value, GraphQLError> {
        let location = self.location();
        let tok = self
            .tokens
            .get(self.pos)
            .map(|t| t.tok.clone())
            .ok_or_else(|| self.unexpected("a value"))?;

        match tok {
            Tok::Punct('$') => {
                if constant {
                    return Err(GraphQLError::new("Variables are not allowed in default values")
                        .at(location));
                }
                self.pos += 1;
                Ok(Value::Variable(self.name()?))
            }
            Tok::Punct('[') => {
                self.pos += 1;
                self.descend()?;
                let mut items = Vec::new();
                while !self.eat_punct(']') {
                    if self.at_end() {
                        return Err(self.unexpected("']'"));
                    }
                    items.push(self.value(constant)?);
                }
                self.ascend();
                Ok(Value::List(items))
            }
            Tok::Punct('{') => {
                self.pos += 1;
                self.descend()?;
                let mut entries = Vec::new();
                while !self.eat_punct('}') {
                    let key = self.name()?;
                    self.expect_punct(':')?;
                    entries.push((key, self.value(constant)?));
                }
                self.ascend();
                Ok(Value::Object(entries))
            }
            Tok::Str(s) => {
                self.pos += 1;
                Ok(Value::String(s))
            }
            Tok::Int(n) => {
                self.pos += 1;
                Ok(Value::Int(n))
            }
            Tok::Float(n) => {
                self.pos += 1;
                Ok(Value::Float(n))
            }
            Tok::Name(n) => {
                self.pos += 1;
                Ok(match n.as_str() {
                    "true" => Value::Boolean(true),
                    "false" => Value::Boolean(false),
                    "null" => Value::Null,
                    _ => Value::Enum(n),
                })
            }
            _ => Err(self.unexpected("a value")),
        }
    }
}
