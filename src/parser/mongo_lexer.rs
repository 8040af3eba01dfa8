//! Lexer for mongosh script statements
//!
//! Turns pasted shell script text into tokens for [`super::mongo_parser`].
//!
//! # Design Principles
//!
//! - **Never panic** - always return a valid token stream
//! - **Never reject input** - unknown characters become `Unknown` tokens and
//!   the parser decides what to do with them
//! - **Line aware** - every token records whether a line break preceded it,
//!   so the parser can end statements at newlines as the shell does
//! - **Comments** - `// line` and `/* block */` comments are skipped

use std::ops::Range;

/// Token types for mongosh script syntax
#[derive(Debug, Clone, PartialEq)]
pub enum MongoTokenKind {
    /// Identifier (function name, `db`, `new`, `use`, ...)
    Ident(String),
    /// Dot separator
    Dot,
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
    /// Left brace
    LBrace,
    /// Right brace
    RBrace,
    /// Left bracket
    LBracket,
    /// Right bracket
    RBracket,
    /// Comma
    Comma,
    /// Colon
    Colon,
    /// Semicolon
    Semicolon,
    /// Minus sign
    Minus,
    /// Plus sign
    Plus,
    /// Exclamation mark
    Bang,
    /// String literal
    String(String),
    /// Number literal
    Number(String),
    /// End of file
    EOF,
    /// Unknown character
    Unknown(char),
}

/// Token with position information
#[derive(Debug, Clone)]
pub struct MongoToken {
    pub kind: MongoTokenKind,
    /// Character offsets into the source
    pub span: Range<usize>,
    /// Whether a line break appeared between the previous token and this one
    pub newline_before: bool,
}

impl MongoToken {
    /// Create a new token
    pub fn new(kind: MongoTokenKind, span: Range<usize>, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }
}

/// Mongo Shell Lexer - error-tolerant tokenizer
pub struct MongoLexer {
    input: Vec<char>,
    pos: usize,
}

impl MongoLexer {
    /// Create a new lexer from input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(input: &str) -> Vec<MongoToken> {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();

        loop {
            let token = lexer.next_token();
            let is_eof = matches!(token.kind, MongoTokenKind::EOF);
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Get the next token
    fn next_token(&mut self) -> MongoToken {
        let newline_before = self.skip_trivia();

        let start = self.pos;

        if self.is_at_end() {
            return MongoToken::new(MongoTokenKind::EOF, start..start, newline_before);
        }

        let ch = self.current_char();

        let kind = match ch {
            '.' if self.peek_char().is_ascii_digit() => return self.scan_number(start, newline_before),
            '.' => MongoTokenKind::Dot,
            '(' => MongoTokenKind::LParen,
            ')' => MongoTokenKind::RParen,
            '{' => MongoTokenKind::LBrace,
            '}' => MongoTokenKind::RBrace,
            '[' => MongoTokenKind::LBracket,
            ']' => MongoTokenKind::RBracket,
            ',' => MongoTokenKind::Comma,
            ':' => MongoTokenKind::Colon,
            ';' => MongoTokenKind::Semicolon,
            '-' => MongoTokenKind::Minus,
            '+' => MongoTokenKind::Plus,
            '!' => MongoTokenKind::Bang,
            '\'' | '"' => return self.scan_string(ch, start, newline_before),
            '0'..='9' => return self.scan_number(start, newline_before),
            'a'..='z' | 'A'..='Z' | '_' | '$' => {
                return self.scan_identifier(start, newline_before);
            }
            _ => MongoTokenKind::Unknown(ch),
        };

        self.advance();
        MongoToken::new(kind, start..self.pos, newline_before)
    }

    /// Scan a string literal
    fn scan_string(&mut self, quote: char, start: usize, newline_before: bool) -> MongoToken {
        self.advance(); // Skip opening quote

        let mut value = String::new();

        while !self.is_at_end() && self.current_char() != quote {
            let ch = self.current_char();
            if ch == '\\' && self.pos + 1 < self.input.len() {
                self.advance();
                // Handle escape sequences
                match self.current_char() {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '\\' => value.push('\\'),
                    '\'' => value.push('\''),
                    '"' => value.push('"'),
                    ch => {
                        value.push('\\');
                        value.push(ch);
                    }
                }
            } else {
                value.push(ch);
            }
            self.advance();
        }

        // Skip closing quote if present
        if self.current_char() == quote {
            self.advance();
        }

        MongoToken::new(MongoTokenKind::String(value), start..self.pos, newline_before)
    }

    /// Scan a number (integer, decimal or exponent form)
    fn scan_number(&mut self, start: usize, newline_before: bool) -> MongoToken {
        let mut value = String::new();

        self.take_digits(&mut value);

        // Handle decimal point
        if self.current_char() == '.' && self.peek_char().is_ascii_digit() {
            value.push('.');
            self.advance();
            self.take_digits(&mut value);
        }

        // Handle exponent
        if matches!(self.current_char(), 'e' | 'E') {
            let sign = self.peek_char();
            let digits_at = if matches!(sign, '+' | '-') { 2 } else { 1 };
            if self
                .input
                .get(self.pos + digits_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                value.push('e');
                self.advance();
                if digits_at == 2 {
                    value.push(sign);
                    self.advance();
                }
                self.take_digits(&mut value);
            }
        }

        MongoToken::new(MongoTokenKind::Number(value), start..self.pos, newline_before)
    }

    fn take_digits(&mut self, value: &mut String) {
        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            value.push(self.current_char());
            self.advance();
        }
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self, start: usize, newline_before: bool) -> MongoToken {
        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        MongoToken::new(MongoTokenKind::Ident(value), start..self.pos, newline_before)
    }

    /// Skip whitespace and comments, reporting whether a line break was seen
    fn skip_trivia(&mut self) -> bool {
        let mut newline = false;

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch == '\n' {
                newline = true;
                self.advance();
            } else if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_char() == '/' {
                while !self.is_at_end() && self.current_char() != '\n' {
                    self.advance();
                }
            } else if ch == '/' && self.peek_char() == '*' {
                self.advance();
                self.advance();
                while !self.is_at_end() && !(self.current_char() == '*' && self.peek_char() == '/')
                {
                    if self.current_char() == '\n' {
                        newline = true;
                    }
                    self.advance();
                }
                // Closing */
                self.advance();
                self.advance();
            } else {
                break;
            }
        }

        newline
    }

    /// Get current character
    fn current_char(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.input[self.pos]
        }
    }

    /// Peek at next character
    fn peek_char(&self) -> char {
        if self.pos + 1 >= self.input.len() {
            '\0'
        } else {
            self.input[self.pos + 1]
        }
    }

    /// Advance position
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}
