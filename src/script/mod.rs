//! Script execution for mongosh-compatible scripts
//!
//! This module provides:
//! - [`ScriptLoader`] for reading script files with a size limit
//! - [`ScriptEngine`] for evaluating parsed statements against a
//!   [`ScriptSession`](crate::helpers::ScriptSession)
//! - [`Value`], the result of evaluating one statement

mod engine;

use std::fs;
use std::path::Path;

use bson::Bson;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Result, ScriptError};
use crate::host::DbRef;

pub use engine::ScriptEngine;

/// Value a script statement evaluates to
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `undefined`
    Undefined,
    /// Plain BSON value: strings, numbers, documents, identifiers...
    Bson(Bson),
    /// `DBRef(...)` result
    DbRef(DbRef),
    /// `ISODate(...)` / `Date(...)` result
    Date(DateTime<Utc>),
    /// The `db` binding, by database name
    Database(String),
}

impl Value {
    /// Short type name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::DbRef(_) => "DBRef",
            Value::Date(_) => "Date",
            Value::Database(_) => "database",
            Value::Bson(bson) => match bson {
                Bson::String(_) => "string",
                Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => "number",
                Bson::Boolean(_) => "boolean",
                Bson::Null => "null",
                Bson::ObjectId(_) => "ObjectId",
                Bson::Document(_) => "object",
                Bson::Array(_) => "array",
                _ => "value",
            },
        }
    }

    /// Numeric value, if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bson(Bson::Int32(i)) => Some(f64::from(*i)),
            Value::Bson(Bson::Int64(i)) => Some(*i as f64),
            Value::Bson(Bson::Double(d)) => Some(*d),
            _ => None,
        }
    }

    /// Convert to a BSON value for embedding in a document or array
    pub fn into_bson(self) -> Result<Bson> {
        match self {
            Value::Undefined => Ok(Bson::Null),
            Value::Bson(bson) => Ok(bson),
            Value::DbRef(db_ref) => Ok(db_ref.into()),
            Value::Date(dt) => Ok(Bson::DateTime(bson::DateTime::from_millis(
                dt.timestamp_millis(),
            ))),
            Value::Database(name) => Err(ScriptError::Unsupported(format!(
                "database '{}' cannot be stored in a document",
                name
            ))
            .into()),
        }
    }

    /// String conversion applied to arguments that expect a name
    pub fn to_script_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Database(name) => name.clone(),
            Value::Date(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            Value::DbRef(_) => "[object Object]".to_string(),
            Value::Bson(bson) => bson_to_script_string(bson),
        }
    }
}

fn bson_to_script_string(bson: &Bson) -> String {
    match bson {
        Bson::String(s) => s.clone(),
        Bson::Int32(i) => i.to_string(),
        Bson::Int64(i) => i.to_string(),
        Bson::Double(d) => number_to_script_string(*d),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null => "null".to_string(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::Array(items) => items
            .iter()
            .map(|item| match item {
                Bson::Null => String::new(),
                other => bson_to_script_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        _ => "[object Object]".to_string(),
    }
}

fn number_to_script_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        // f64 Display already drops a zero fraction: 5.0 -> "5"
        n.to_string()
    }
}

impl From<Bson> for Value {
    fn from(bson: Bson) -> Self {
        Value::Bson(bson)
    }
}

/// Script loader for reading and validating script files
#[derive(Debug, Clone)]
pub struct ScriptLoader {
    /// Maximum script size in bytes
    max_size_bytes: u64,
}

impl ScriptLoader {
    /// Create a new script loader with the default 10 MB limit
    pub fn new() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024,
        }
    }

    /// Create a loader with a custom size limit
    pub fn with_max_size(bytes: u64) -> Self {
        Self {
            max_size_bytes: bytes,
        }
    }

    /// Load script from file
    ///
    /// # Arguments
    /// * `path` - Path to script file
    ///
    /// # Returns
    /// * `Result<String>` - Script content or error
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ScriptError::FileNotFound(path.display().to_string()).into());
        }

        let metadata = fs::metadata(path)?;
        if metadata.len() > self.max_size_bytes {
            return Err(ScriptError::TooLarge {
                path: path.display().to_string(),
                size: metadata.len(),
                limit: self.max_size_bytes,
            }
            .into());
        }

        Ok(fs::read_to_string(path)?)
    }

    /// Check if file has a script extension
    pub fn has_valid_extension(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("js") | Some("mongodb")
        )
    }
}

impl Default for ScriptLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use bson::{doc, oid::ObjectId};
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn temp_script(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "mongosh-compat-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_script_loader_reads_file() {
        let path = temp_script("ok.js", "use sales\n");
        let content = ScriptLoader::new().load_file(&path).unwrap();
        assert_eq!(content, "use sales\n");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_script_loader_missing_file() {
        let err = ScriptLoader::new()
            .load_file("/definitely/not/here.js")
            .unwrap_err();
        assert!(matches!(err, ShellError::Script(ScriptError::FileNotFound(_))));
    }

    #[test]
    fn test_script_loader_size_limit() {
        let path = temp_script("big.js", "ObjectId()\n");
        let err = ScriptLoader::with_max_size(4).load_file(&path).unwrap_err();
        assert!(matches!(
            err,
            ShellError::Script(ScriptError::TooLarge { size: 11, limit: 4, .. })
        ));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_script_loader_valid_extension() {
        assert!(ScriptLoader::has_valid_extension(Path::new("seed.js")));
        assert!(ScriptLoader::has_valid_extension(Path::new("seed.mongodb")));
        assert!(!ScriptLoader::has_valid_extension(Path::new("seed.txt")));
        assert!(!ScriptLoader::has_valid_extension(Path::new("seed")));
    }

    #[test]
    fn test_script_string_coercion() {
        assert_eq!(Value::Bson(Bson::String("sales".into())).to_script_string(), "sales");
        assert_eq!(Value::Bson(Bson::Int64(5)).to_script_string(), "5");
        assert_eq!(Value::Bson(Bson::Double(5.0)).to_script_string(), "5");
        assert_eq!(Value::Bson(Bson::Double(2.5)).to_script_string(), "2.5");
        assert_eq!(Value::Bson(Bson::Double(f64::NAN)).to_script_string(), "NaN");
        assert_eq!(Value::Bson(Bson::Boolean(true)).to_script_string(), "true");
        assert_eq!(Value::Bson(Bson::Null).to_script_string(), "null");
        assert_eq!(Value::Undefined.to_script_string(), "undefined");
        assert_eq!(Value::Database("admin".into()).to_script_string(), "admin");
        assert_eq!(
            Value::Bson(Bson::Document(doc! {})).to_script_string(),
            "[object Object]"
        );
    }

    #[test]
    fn test_into_bson() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            Value::Date(dt).into_bson().unwrap(),
            Bson::DateTime(bson::DateTime::from_millis(dt.timestamp_millis()))
        );

        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let db_ref = DbRef {
            collection: "users".to_string(),
            id: Bson::ObjectId(oid),
        };
        assert_eq!(
            Value::DbRef(db_ref).into_bson().unwrap(),
            Bson::Document(doc! { "$ref": "users", "$id": oid })
        );

        assert_eq!(Value::Undefined.into_bson().unwrap(), Bson::Null);
        assert!(Value::Database("admin".into()).into_bson().is_err());
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::Bson(Bson::Int64(1)).kind(), "number");
        assert_eq!(Value::Database("a".into()).kind(), "database");
        assert_eq!(Value::from(Bson::Null).kind(), "null");
    }
}
