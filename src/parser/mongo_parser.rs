//! mongosh script parser
//!
//! Recursive-descent parser for the statements pasted shell scripts use
//! with the compatibility helpers: `ObjectId("...")`, `new Date("...")`,
//! `DBRef("users", ObjectId("..."))`, `{ at: ISODate("...") }`, `db`,
//! `use("sales")` and the shell command form `use sales`.
//!
//! Statements end at `;`, at a line break, or at the end of input.

use super::mongo_ast::*;
use super::mongo_lexer::{MongoLexer, MongoToken, MongoTokenKind};
use crate::error::{ParseError, Result};

/// Deepest nesting of arrays, objects, calls and unary operators accepted
pub const MAX_NESTING_DEPTH: usize = 128;

/// mongosh script parser
pub struct MongoParser {
    source: Vec<char>,
    tokens: Vec<MongoToken>,
    pos: usize,
    depth: usize,
}

impl MongoParser {
    /// Create a new parser from input string
    pub fn new(input: &str) -> Self {
        let tokens = MongoLexer::tokenize(input);
        Self {
            source: input.chars().collect(),
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the input as a single expression
    pub fn parse(input: &str) -> Result<Expr> {
        let mut parser = Self::new(input);
        let expr = parser.parse_expression()?;
        if !parser.check(&MongoTokenKind::EOF) {
            return Err(parser.unexpected("end of input"));
        }
        Ok(expr)
    }

    /// Parse the input as a script: a sequence of statements
    pub fn parse_script(input: &str) -> Result<Vec<Statement>> {
        let mut parser = Self::new(input);
        let mut statements = Vec::new();

        loop {
            while parser.match_token(&MongoTokenKind::Semicolon) {}
            if parser.check(&MongoTokenKind::EOF) {
                break;
            }
            statements.push(parser.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse one statement and its terminator
    fn parse_statement(&mut self) -> Result<Statement> {
        if self.at_use_command() {
            return self.parse_use_command();
        }

        let start = self.current_pos();
        let expr = self.parse_expression()?;
        let end = self.previous_end();

        let at_boundary = self.check(&MongoTokenKind::Semicolon)
            || self.check(&MongoTokenKind::EOF)
            || self.current().is_some_and(|t| t.newline_before);
        if !at_boundary {
            return Err(self.unexpected("';' or newline"));
        }

        Ok(Statement::Expr(expr, start..end))
    }

    /// `use <name>` written without parentheses
    fn at_use_command(&self) -> bool {
        let is_use = matches!(
            self.current(),
            Some(MongoToken { kind: MongoTokenKind::Ident(name), .. })
                if name.eq_ignore_ascii_case("use")
        );
        let next = self.tokens.get(self.pos + 1);
        is_use
            && next.is_some_and(|t| {
                !matches!(t.kind, MongoTokenKind::LParen | MongoTokenKind::Dot) && !t.newline_before
            })
    }

    /// Parse `use <name>` up to the end of the line or a `;`
    fn parse_use_command(&mut self) -> Result<Statement> {
        let start = self.current_pos();
        self.advance();

        let name_start = self.current_pos();
        let name_end = self.use_name_end(name_start);

        while self
            .current()
            .is_some_and(|t| t.span.start < name_end && !matches!(t.kind, MongoTokenKind::EOF))
        {
            self.advance();
        }

        let raw: String = self.source[name_start..name_end].iter().collect();
        let name = strip_quotes(raw.trim());
        if name.is_empty() {
            return Err(
                ParseError::InvalidCommand("Database name cannot be empty".to_string()).into(),
            );
        }

        Ok(Statement::Use(name.to_string(), start..name_end))
    }

    /// End of a `use` name: a line break, a `;` or a comment outside quotes
    fn use_name_end(&self, from: usize) -> usize {
        let mut quote = None;
        let mut i = from;
        while i < self.source.len() {
            let ch = self.source[i];
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => {}
                None => match ch {
                    '\n' | ';' => break,
                    '"' | '\'' => quote = Some(ch),
                    '/' if matches!(self.source.get(i + 1), Some('/') | Some('*')) => break,
                    _ => {}
                },
            }
            i += 1;
        }
        i
    }

    /// Parse an expression
    fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_unary()
    }

    /// Parse unary expression: -x, +x, !x
    ///
    /// Every nested construct passes through here, so this is where the
    /// nesting depth is bounded.
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::SyntaxError(format!(
                "nesting too deep (limit {})",
                MAX_NESTING_DEPTH
            ))
            .into());
        }

        self.depth += 1;
        let result = self.parse_unary_operand();
        self.depth -= 1;
        result
    }

    fn parse_unary_operand(&mut self) -> Result<Expr> {
        let start = self.current_pos();

        let operator = if self.match_token(&MongoTokenKind::Minus) {
            Some(UnaryOperator::Minus)
        } else if self.match_token(&MongoTokenKind::Plus) {
            Some(UnaryOperator::Plus)
        } else if self.match_token(&MongoTokenKind::Bang) {
            Some(UnaryOperator::Not)
        } else {
            None
        };

        match operator {
            Some(operator) => {
                let argument = self.parse_unary()?;
                let end = self.previous_end();
                Ok(Expr::Unary(Box::new(UnaryExpr::new(
                    operator,
                    argument,
                    start..end,
                ))))
            }
            None => self.parse_member_or_call(),
        }
    }

    /// Parse member expression, call expression, or new expression
    fn parse_member_or_call(&mut self) -> Result<Expr> {
        let start = self.current_pos();

        // Check for 'new' keyword
        if matches!(
            self.current(),
            Some(MongoToken { kind: MongoTokenKind::Ident(name), .. }) if name == "new"
        ) {
            self.advance();
            return self.parse_new_expression(start);
        }

        // Parse the base expression (primary)
        let mut expr = self.parse_primary()?;

        // Handle member access and function calls
        loop {
            if self.match_token(&MongoTokenKind::Dot) {
                // Member access: obj.prop
                let prop_name = self.expect_identifier("Expected property name after '.'")?;
                let end = self.previous_end();
                expr = Expr::Member(Box::new(MemberExpr::new(
                    expr,
                    MemberProperty::Ident(prop_name),
                    start..end,
                )));
            } else if self.check(&MongoTokenKind::LBracket) && !self.newline_ahead() {
                // Computed member access: obj[expr]
                self.advance();
                let property = self.parse_expression()?;
                self.expect_token(
                    &MongoTokenKind::RBracket,
                    "Expected ']' after computed member",
                )?;
                let end = self.previous_end();
                expr = Expr::Member(Box::new(MemberExpr::new(
                    expr,
                    MemberProperty::Computed(property),
                    start..end,
                )));
            } else if self.check(&MongoTokenKind::LParen) && !self.newline_ahead() {
                // Function call: fn(args)
                self.advance();
                let arguments = self.parse_arguments()?;
                self.expect_token(&MongoTokenKind::RParen, "Expected ')' after arguments")?;
                let end = self.previous_end();
                expr = Expr::Call(Box::new(CallExpr::new(expr, arguments, start..end)));
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse new expression: new Ctor(args)
    fn parse_new_expression(&mut self, start: usize) -> Result<Expr> {
        let callee = self.parse_primary()?;

        // Parse arguments if present
        let arguments = if self.match_token(&MongoTokenKind::LParen) {
            let args = self.parse_arguments()?;
            self.expect_token(&MongoTokenKind::RParen, "Expected ')' after new arguments")?;
            args
        } else {
            vec![]
        };

        let end = self.previous_end();
        Ok(Expr::New(Box::new(NewExpr::new(
            callee,
            arguments,
            start..end,
        ))))
    }

    /// Parse primary expression (literals, identifiers, objects, arrays)
    fn parse_primary(&mut self) -> Result<Expr> {
        let start = self.current_pos();

        let Some(token) = self.current() else {
            return Err(ParseError::SyntaxError("Unexpected end of input".to_string()).into());
        };

        match &token.kind {
            // String literal
            MongoTokenKind::String(s) => {
                let value = s.clone();
                self.advance();
                Ok(Expr::String(value))
            }
            // Number literal
            MongoTokenKind::Number(n) => {
                let value = n
                    .parse::<f64>()
                    .map_err(|_| ParseError::SyntaxError(format!("Invalid number: {}", n)))?;
                self.advance();
                Ok(Expr::Number(value))
            }
            // Identifier or keyword
            MongoTokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();

                // Check for special identifiers
                match name.as_str() {
                    "true" => Ok(Expr::Boolean(true)),
                    "false" => Ok(Expr::Boolean(false)),
                    "null" => Ok(Expr::Null),
                    "undefined" => Ok(Expr::Undefined),
                    "Infinity" => Ok(Expr::Number(f64::INFINITY)),
                    "NaN" => Ok(Expr::Number(f64::NAN)),
                    _ => Ok(Expr::Ident(name)),
                }
            }
            // Object literal: { ... }
            MongoTokenKind::LBrace => self.parse_object(start),
            // Array literal: [ ... ]
            MongoTokenKind::LBracket => self.parse_array(start),
            // Parenthesized expression: ( expr )
            MongoTokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(&MongoTokenKind::RParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            MongoTokenKind::EOF => {
                Err(ParseError::SyntaxError("Unexpected end of input".to_string()).into())
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Parse object literal: { key: value, ... }
    fn parse_object(&mut self, start: usize) -> Result<Expr> {
        self.expect_token(&MongoTokenKind::LBrace, "Expected '{'")?;

        let mut properties = Vec::new();

        // Handle empty object
        if self.match_token(&MongoTokenKind::RBrace) {
            let end = self.previous_end();
            return Ok(Expr::Object(ObjectExpr::new(properties, start..end)));
        }

        loop {
            let prop_start = self.current_pos();

            // Parse property key
            let key = self.parse_property_key()?;

            // Expect colon
            self.expect_token(&MongoTokenKind::Colon, "Expected ':' after property key")?;

            // Parse property value
            let value = self.parse_expression()?;

            let prop_end = self.previous_end();
            properties.push(Property::new(key, value, prop_start..prop_end));

            // Check for comma or end of object
            if self.match_token(&MongoTokenKind::Comma) {
                // Allow trailing comma
                if self.check(&MongoTokenKind::RBrace) {
                    break;
                }
                continue;
            } else if self.check(&MongoTokenKind::RBrace) {
                break;
            } else {
                return Err(ParseError::SyntaxError(
                    "Expected ',' or '}' after property".to_string(),
                )
                .into());
            }
        }

        self.expect_token(&MongoTokenKind::RBrace, "Expected '}'")?;
        let end = self.previous_end();

        Ok(Expr::Object(ObjectExpr::new(properties, start..end)))
    }

    /// Parse property key (identifier, string, or number)
    fn parse_property_key(&mut self) -> Result<PropertyKey> {
        let key = match self.current().map(|t| &t.kind) {
            Some(MongoTokenKind::Ident(name)) => PropertyKey::Ident(name.clone()),
            Some(MongoTokenKind::String(s)) => PropertyKey::String(s.clone()),
            Some(MongoTokenKind::Number(n)) => PropertyKey::Number(n.clone()),
            _ => {
                return Err(ParseError::SyntaxError(
                    "Expected property key (identifier, string, or number)".to_string(),
                )
                .into());
            }
        };
        self.advance();
        Ok(key)
    }

    /// Parse array literal: [elem1, elem2, ...]
    fn parse_array(&mut self, start: usize) -> Result<Expr> {
        self.expect_token(&MongoTokenKind::LBracket, "Expected '['")?;

        let mut elements = Vec::new();

        // Handle empty array
        if self.match_token(&MongoTokenKind::RBracket) {
            let end = self.previous_end();
            return Ok(Expr::Array(ArrayExpr::new(elements, start..end)));
        }

        loop {
            elements.push(self.parse_expression()?);

            // Check for comma or end of array
            if self.match_token(&MongoTokenKind::Comma) {
                // Allow trailing comma
                if self.check(&MongoTokenKind::RBracket) {
                    break;
                }
                continue;
            } else if self.check(&MongoTokenKind::RBracket) {
                break;
            } else {
                return Err(ParseError::SyntaxError(
                    "Expected ',' or ']' after array element".to_string(),
                )
                .into());
            }
        }

        self.expect_token(&MongoTokenKind::RBracket, "Expected ']'")?;
        let end = self.previous_end();

        Ok(Expr::Array(ArrayExpr::new(elements, start..end)))
    }

    /// Parse function arguments: arg1, arg2, ...
    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut arguments = Vec::new();

        // Handle empty arguments
        if self.check(&MongoTokenKind::RParen) {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expression()?);

            if self.match_token(&MongoTokenKind::Comma) {
                // Allow trailing comma
                if self.check(&MongoTokenKind::RParen) {
                    break;
                }
                continue;
            } else {
                break;
            }
        }

        Ok(arguments)
    }

    // Token manipulation methods

    /// Get current token
    fn current(&self) -> Option<&MongoToken> {
        self.tokens.get(self.pos)
    }

    /// Check if current token matches the given kind
    fn check(&self, kind: &MongoTokenKind) -> bool {
        self.current()
            .is_some_and(|t| std::mem::discriminant(&t.kind) == std::mem::discriminant(kind))
    }

    /// Whether the current token starts a new line
    fn newline_ahead(&self) -> bool {
        self.current().is_some_and(|t| t.newline_before)
    }

    /// Match and consume token if it matches the given kind
    fn match_token(&mut self, kind: &MongoTokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Expect a specific token kind
    fn expect_token(&mut self, kind: &MongoTokenKind, message: &str) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::SyntaxError(message.to_string()).into())
        }
    }

    /// Expect an identifier and return its name
    fn expect_identifier(&mut self, message: &str) -> Result<String> {
        match self.current().map(|t| &t.kind) {
            Some(MongoTokenKind::Ident(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::SyntaxError(message.to_string()).into()),
        }
    }

    /// Build an "unexpected token" error for the current position
    fn unexpected(&self, expected: &str) -> crate::error::ShellError {
        let found = match self.current().map(|t| &t.kind) {
            Some(MongoTokenKind::Ident(s)) => s.clone(),
            Some(MongoTokenKind::String(s)) => format!("'{}'", s),
            Some(MongoTokenKind::Number(n)) => n.clone(),
            Some(MongoTokenKind::Unknown(c)) => c.to_string(),
            Some(MongoTokenKind::EOF) | None => "end of input".to_string(),
            Some(other) => format!("{:?}", other),
        };
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found,
        }
        .into()
    }

    /// Start offset of the current token
    fn current_pos(&self) -> usize {
        self.current().map(|t| t.span.start).unwrap_or(self.source.len())
    }

    /// End offset of the previously consumed token
    fn previous_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens
                .get(self.pos - 1)
                .map(|t| t.span.end)
                .unwrap_or(self.source.len())
        }
    }
}

/// Remove one pair of matching surrounding quotes
fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    s
}
