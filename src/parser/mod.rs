//! Script parser for mongosh-compatible statements
//!
//! Scripts are tokenized by [`MongoLexer`] and turned into a list of
//! [`Statement`]s by [`MongoParser`]. The grammar covers what pasted shell
//! scripts use with the compatibility helpers:
//!
//! - helper calls, with or without `new`: `ObjectId("...")`, `new Date("...")`
//! - object, array, string, number, boolean, `null` and `undefined` literals
//! - the `db` global and `db.getName()`
//! - `use(name)` and the shell command form `use name`
//!
//! # Examples
//!
//! ```
//! use mongosh_compat::parser::{Parser, Statement};
//!
//! let statements = Parser::new()
//!     .parse_script("use sales\nObjectId('507f1f77bcf86cd799439011')")
//!     .unwrap();
//! assert!(matches!(statements[0], Statement::Use(ref name, _) if name == "sales"));
//! assert_eq!(statements.len(), 2);
//! ```

mod mongo_ast;
mod mongo_lexer;
mod mongo_parser;

pub use mongo_ast::*;
pub use mongo_lexer::{MongoLexer, MongoToken, MongoTokenKind};
pub use mongo_parser::{MAX_NESTING_DEPTH, MongoParser};

use tracing::trace;

use crate::error::Result;

/// Entry point for parsing script text
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser {}

impl Parser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self {}
    }

    /// Parse a whole script into statements
    pub fn parse_script(&self, input: &str) -> Result<Vec<Statement>> {
        let statements = MongoParser::parse_script(input)?;
        trace!("Parsed {} statement(s)", statements.len());
        Ok(statements)
    }

    /// Parse a single expression
    pub fn parse_expression(&self, input: &str) -> Result<Expr> {
        MongoParser::parse(input.trim())
    }
}
