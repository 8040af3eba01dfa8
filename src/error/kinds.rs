use std::{fmt, io};

/// Crate-wide `Result` type using [`ShellError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Top-level error type for mongosh-compat.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum ShellError {
    /// Errors raised by the script helpers (`ObjectId`, `DBRef`, `ISODate`, `Date`, `use`).
    Helper(HelperError),

    /// Script parsing errors.
    Parse(ParseError),

    /// Script evaluation errors.
    Script(ScriptError),

    /// Connection-related errors.
    Connection(ConnectionError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),

    /// JSON serialization errors.
    Json(serde_json::Error),
}

/// Errors surfaced to scripts by the compatibility helpers.
///
/// `InvalidIdentifierFormat` and `InvalidReferenceConstruction` are produced
/// by the host and travel through the helpers untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperError {
    /// The host rejected an identifier string.
    InvalidIdentifierFormat { input: String, reason: String },

    /// The host rejected a (collection, id) pair.
    InvalidReferenceConstruction { collection: String, reason: String },

    /// None of the configured date layouts matched the input.
    UnparsableDate {
        kind: DateKind,
        input: String,
        patterns: Vec<&'static str>,
    },

    /// The host could not hand out a database handle.
    DatabaseUnavailable { name: String, reason: String },
}

/// Which date helper produced an [`HelperError::UnparsableDate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// `ISODate(...)`
    Iso,
    /// `Date(...)`
    Calendar,
}

/// Parsing-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Syntax error in a statement.
    SyntaxError(String),

    /// Unexpected token while parsing.
    UnexpectedToken { expected: String, found: String },

    /// Invalid shell command (e.g. `use` without a name).
    InvalidCommand(String),
}

/// Script evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Script file not found.
    FileNotFound(String),

    /// Script file exceeds the loader's size limit.
    TooLarge { path: String, size: u64, limit: u64 },

    /// Reference to a global the session does not provide.
    UnknownIdentifier(String),

    /// Call to a function the session does not provide.
    UnknownFunction(String),

    /// Wrong argument count or type for a helper.
    InvalidArguments(String),

    /// `db` was read before any database was selected.
    NoCurrentDatabase,

    /// Construct outside the supported script subset.
    Unsupported(String),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Invalid connection URI.
    InvalidUri(String),

    /// Not currently connected to MongoDB.
    NotConnected,
}

/// Configuration-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Helper(e) => write!(f, "{e}"),
            ShellError::Parse(e) => write!(f, "{e}"),
            ShellError::Script(e) => write!(f, "Script error: {e}"),
            ShellError::Connection(e) => write!(f, "Connection error: {e}"),
            ShellError::Config(e) => write!(f, "Configuration error: {e}"),
            ShellError::Io(e) => write!(f, "I/O error: {e}"),
            ShellError::MongoDb(e) => write!(f, "MongoDB error: {e}"),
            ShellError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl fmt::Display for HelperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelperError::InvalidIdentifierFormat { input, reason } => {
                write!(f, "Invalid ObjectId '{input}': {reason}")
            }
            HelperError::InvalidReferenceConstruction { collection, reason } => {
                write!(f, "Invalid DBRef to '{collection}': {reason}")
            }
            HelperError::UnparsableDate {
                kind,
                input,
                patterns,
            } => write!(
                f,
                "Un-parsable {kind}: {input} Configured formats: {}",
                patterns.join(",")
            ),
            HelperError::DatabaseUnavailable { name, reason } => {
                write!(f, "Database '{name}' unavailable: {reason}")
            }
        }
    }
}

impl fmt::Display for DateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateKind::Iso => write!(f, "ISO date"),
            DateKind::Calendar => write!(f, "date"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::SyntaxError(msg) => write!(f, "Syntax error: {msg}"),
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "Expected '{expected}', found '{found}'")
            }
            ParseError::InvalidCommand(cmd) => write!(f, "Invalid command: {cmd}"),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::FileNotFound(path) => write!(f, "Script file not found: {path}"),
            ScriptError::TooLarge { path, size, limit } => {
                write!(f, "Script file {path} is {size} bytes (limit {limit})")
            }
            ScriptError::UnknownIdentifier(name) => write!(f, "{name} is not defined"),
            ScriptError::UnknownFunction(name) => write!(f, "{name} is not a function"),
            ScriptError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            ScriptError::NoCurrentDatabase => {
                write!(f, "No current database, call use(<name>) first")
            }
            ScriptError::Unsupported(what) => write!(f, "Unsupported expression: {what}"),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::InvalidUri(uri) => write!(f, "Invalid connection URI: {uri}"),
            ConnectionError::NotConnected => write!(f, "Not connected to MongoDB"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Io(e) => Some(e),
            ShellError::MongoDb(e) => Some(e),
            ShellError::Json(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for HelperError {}
impl std::error::Error for ParseError {}
impl std::error::Error for ScriptError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to ShellError ========================= */

impl From<HelperError> for ShellError {
    fn from(err: HelperError) -> Self {
        ShellError::Helper(err)
    }
}

impl From<ParseError> for ShellError {
    fn from(err: ParseError) -> Self {
        ShellError::Parse(err)
    }
}

impl From<ScriptError> for ShellError {
    fn from(err: ScriptError) -> Self {
        ShellError::Script(err)
    }
}

impl From<ConnectionError> for ShellError {
    fn from(err: ConnectionError) -> Self {
        ShellError::Connection(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::Config(err)
    }
}

impl From<io::Error> for ShellError {
    fn from(err: io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<mongodb::error::Error> for ShellError {
    fn from(err: mongodb::error::Error) -> Self {
        ShellError::MongoDb(err)
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        ShellError::Json(err)
    }
}

impl ShellError {
    /// Borrow the helper error, if this is one.
    pub fn as_helper(&self) -> Option<&HelperError> {
        match self {
            ShellError::Helper(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparsable_date_message_lists_formats() {
        let err = HelperError::UnparsableDate {
            kind: DateKind::Iso,
            input: "not-a-date".to_string(),
            patterns: vec!["yyyy-MM-dd", "dd-MM-yyyy"],
        };
        assert_eq!(
            err.to_string(),
            "Un-parsable ISO date: not-a-date Configured formats: yyyy-MM-dd,dd-MM-yyyy"
        );
    }

    #[test]
    fn test_helper_error_display_is_unwrapped() {
        let err: ShellError = HelperError::DatabaseUnavailable {
            name: "sales".to_string(),
            reason: "not connected".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Database 'sales' unavailable: not connected");
        assert!(err.as_helper().is_some());
    }

    #[test]
    fn test_script_error_display() {
        let err: ShellError = ScriptError::NoCurrentDatabase.into();
        assert!(err.to_string().starts_with("Script error:"));
        assert!(err.as_helper().is_none());
    }
}
