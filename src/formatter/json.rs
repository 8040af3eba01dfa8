//! JSON formatting for script values
//!
//! Values are rendered as relaxed Extended JSON, so dates appear as
//! `{"$date": "..."}` and identifiers as `{"$oid": "..."}`. An indent of 0
//! prints a single line.

use bson::Bson;
use serde::Serialize;

use crate::error::Result;
use crate::script::Value;

/// JSON formatter with pretty printing support
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    /// Spaces per nesting level, 0 for compact output
    indent: usize,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// Format a script value as JSON
    pub fn format_value(&self, value: &Value) -> Result<String> {
        let json = match value {
            Value::Undefined => serde_json::Value::Null,
            Value::Database(name) => serde_json::Value::String(name.clone()),
            other => other.clone().into_bson()?.into_relaxed_extjson(),
        };
        Ok(self.render(&json)?)
    }

    /// Format a BSON value as JSON
    pub fn format_bson(&self, bson: &Bson) -> Result<String> {
        Ok(self.render(&bson.clone().into_relaxed_extjson())?)
    }

    fn render<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        if self.indent == 0 {
            return serde_json::to_string(value);
        }

        let mut buf = Vec::new();
        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        // serde_json only writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DbRef;
    use bson::{doc, oid::ObjectId};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_json_formatter_extended_types() {
        let oid = ObjectId::parse_str("65705d84dfc3f3b5094e1f72").unwrap();
        let formatter = JsonFormatter::new(0);
        let result = formatter
            .format_value(&Value::Bson(Bson::Document(doc! { "_id": oid, "n": 1 })))
            .unwrap();
        assert_eq!(result, r#"{"_id":{"$oid":"65705d84dfc3f3b5094e1f72"},"n":1}"#);
    }

    #[test]
    fn test_json_formatter_date() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let result = JsonFormatter::new(0).format_value(&Value::Date(dt)).unwrap();
        assert!(result.starts_with(r#"{"$date":"2020-01-02T03:04:05"#));
    }

    #[test]
    fn test_json_formatter_db_ref() {
        let db_ref = DbRef {
            collection: "users".to_string(),
            id: Bson::Int32(7),
        };
        let result = JsonFormatter::new(0).format_value(&Value::DbRef(db_ref)).unwrap();
        assert_eq!(result, r#"{"$ref":"users","$id":7}"#);
    }

    #[test]
    fn test_json_formatter_plain_values() {
        let formatter = JsonFormatter::new(0);
        assert_eq!(formatter.format_value(&Value::Undefined).unwrap(), "null");
        assert_eq!(
            formatter.format_value(&Value::Database("sales".into())).unwrap(),
            r#""sales""#
        );
    }

    #[test]
    fn test_json_formatter_compact_vs_pretty() {
        let doc = Bson::Document(doc! { "a": 1, "b": 2 });
        let compact = JsonFormatter::new(0).format_bson(&doc).unwrap();
        let pretty = JsonFormatter::new(2).format_bson(&doc).unwrap();

        assert!(!compact.contains('\n'));
        assert_eq!(pretty, "{\n  \"a\": 1,\n  \"b\": 2\n}");
    }
}
