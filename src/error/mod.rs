//! Error handling for mongosh-compat.
//!
//! All fallible operations return [`Result`], whose error is [`ShellError`].
//! The helper-facing taxonomy lives in [`HelperError`]:
//! - `InvalidIdentifierFormat` / `InvalidReferenceConstruction` come from the host
//! - `UnparsableDate` is raised once every date layout has been tried
//! - `DatabaseUnavailable` is raised when `use` cannot obtain a handle
//!
//! # Example
//!
//! ```rust
//! use mongosh_compat::error::{HelperError, Result, ShellError};
//!
//! fn select(name: &str) -> Result<()> {
//!     Err(HelperError::DatabaseUnavailable {
//!         name: name.to_string(),
//!         reason: "not connected".to_string(),
//!     }
//!     .into())
//! }
//!
//! assert!(matches!(select("sales"), Err(ShellError::Helper(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{
    ConfigError, ConnectionError, DateKind, HelperError, ParseError, Result, ScriptError,
    ShellError,
};
