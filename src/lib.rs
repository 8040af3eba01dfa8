//! mongosh compatibility library
//!
//! Provides the globals scripts written for the MongoDB shell expect
//! (`ObjectId`, `DBRef`, `ISODate`, `Date`, `use` and the `db` binding) on
//! top of a pluggable host, plus a small evaluator for such scripts.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `connection`: MongoDB connection management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and display
//! - `helpers`: The compatibility helpers and the script session
//! - `host`: Host capabilities and the MongoDB-backed host
//! - `parser`: Script parsing
//! - `script`: Script loading and evaluation
//!
//! # Example
//!
//! ```
//! use mongosh_compat::{MongoHost, ScriptEngine, ScriptSession, Value};
//!
//! let session = ScriptSession::new(MongoHost::disconnected());
//! let mut engine = ScriptEngine::new(session);
//!
//! let values = engine.run("ISODate('2020-01-02T03:04:05Z')").unwrap();
//! assert!(matches!(values[0], Value::Date(_)));
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod formatter;
pub mod helpers;
pub mod host;
pub mod parser;
pub mod script;

// Re-export commonly used types
pub use config::Config;
pub use connection::ConnectionManager;
pub use error::{HelperError, Result, ShellError};
pub use formatter::Formatter;
pub use helpers::ScriptSession;
pub use host::{DatabaseHandle, DbRef, MongoHost, ShellHost};
pub use parser::{Parser, Statement};
pub use script::{ScriptEngine, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
