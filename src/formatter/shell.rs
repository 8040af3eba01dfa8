//! Shell-style formatting for script values
//!
//! Values print the way mongosh prints them:
//! - type wrappers for ObjectId, ISODate, Long, Decimal128 and BinData
//! - `DBRef('collection', <id>)` for references
//! - multi-line nested documents and arrays with unquoted keys

use bson::{Bson, Document};
use chrono::{DateTime, SecondsFormat, Utc};

use super::colorizer::Colorizer;
use crate::host::DbRef;
use crate::script::Value;

/// Shell-style formatter (mongosh compatible)
#[derive(Debug, Clone, Copy)]
pub struct ShellFormatter {
    /// Colorizer for output highlighting
    colorizer: Colorizer,

    /// Spaces per nesting level
    indent: usize,
}

impl ShellFormatter {
    /// Create a new shell formatter
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    /// * `indent` - Spaces per nesting level
    pub fn new(use_colors: bool, indent: usize) -> Self {
        Self {
            colorizer: Colorizer::new(use_colors),
            indent,
        }
    }

    /// Format a script value
    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Undefined => self.colorizer.null("undefined"),
            Value::Bson(bson) => self.format_bson_value(bson, 0),
            Value::DbRef(db_ref) => self.format_db_ref(db_ref, 0),
            Value::Date(dt) => self.colorizer.iso_date(&iso_string(dt)),
            Value::Database(name) => name.clone(),
        }
    }

    /// Format a BSON document in shell style
    pub fn format_document(&self, doc: &Document) -> String {
        self.format_document_with_indent(doc, 0)
    }

    /// Format a BSON document with indentation
    fn format_document_with_indent(&self, doc: &Document, indent_level: usize) -> String {
        if doc.is_empty() {
            return "{}".to_string();
        }

        let mut result = String::from("{\n");
        let indent = " ".repeat((indent_level + 1) * self.indent);

        let last = doc.len() - 1;
        for (i, (key, value)) in doc.iter().enumerate() {
            result.push_str(&indent);
            result.push_str(&self.colorizer.field_key(key));
            result.push_str(": ");
            result.push_str(&self.format_bson_value(value, indent_level + 1));

            if i < last {
                result.push(',');
            }
            result.push('\n');
        }

        result.push_str(&" ".repeat(indent_level * self.indent));
        result.push('}');
        result
    }

    /// Format a BSON value in shell style
    fn format_bson_value(&self, value: &Bson, indent_level: usize) -> String {
        match value {
            Bson::ObjectId(oid) => self.colorizer.type_wrapper("ObjectId", &oid.to_hex()),
            Bson::DateTime(dt) => {
                match DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()) {
                    Some(chrono_dt) => self.colorizer.iso_date(&iso_string(&chrono_dt)),
                    // Outside chrono's range
                    None => self
                        .colorizer
                        .type_wrapper("Date", &dt.timestamp_millis().to_string()),
                }
            }
            Bson::Int64(n) => self.colorizer.type_wrapper("Long", &n.to_string()),
            Bson::Decimal128(d) => self.colorizer.type_wrapper("Decimal128", &d.to_string()),
            Bson::String(s) => self.colorizer.string(s),
            Bson::Int32(n) => self.colorizer.number(&n.to_string()),
            Bson::Double(f) => self.colorizer.number(&format_double(*f)),
            Bson::Boolean(b) => self.colorizer.number(&b.to_string()),
            Bson::Null => self.colorizer.null("null"),
            Bson::Undefined => self.colorizer.null("undefined"),
            Bson::Array(arr) => self.format_array(arr, indent_level),
            Bson::Document(doc) => match db_ref_parts(doc) {
                Some(db_ref) => self.format_db_ref(&db_ref, indent_level),
                None => self.format_document_with_indent(doc, indent_level),
            },
            Bson::Binary(bin) => self
                .colorizer
                .bin_data(u8::from(bin.subtype), &hex::encode(&bin.bytes)),
            Bson::RegularExpression(regex) => self.colorizer.regex(&regex.pattern, &regex.options),
            Bson::Timestamp(ts) => self.colorizer.timestamp(ts.time, ts.increment),
            other => other.to_string(),
        }
    }

    fn format_db_ref(&self, db_ref: &DbRef, indent_level: usize) -> String {
        format!(
            "DBRef({}, {})",
            self.colorizer.string(&db_ref.collection),
            self.format_bson_value(&db_ref.id, indent_level)
        )
    }

    /// Format a BSON array in shell style
    fn format_array(&self, arr: &[Bson], indent_level: usize) -> String {
        if arr.is_empty() {
            return "[]".to_string();
        }

        let mut result = String::from("[\n");
        let indent = " ".repeat((indent_level + 1) * self.indent);

        for (i, value) in arr.iter().enumerate() {
            result.push_str(&indent);
            result.push_str(&self.format_bson_value(value, indent_level + 1));

            if i < arr.len() - 1 {
                result.push(',');
            }
            result.push('\n');
        }

        result.push_str(&" ".repeat(indent_level * self.indent));
        result.push(']');
        result
    }
}

/// `{ $ref, $id }` documents print as references
fn db_ref_parts(doc: &Document) -> Option<DbRef> {
    if doc.len() != 2 {
        return None;
    }
    let collection = doc.get_str("$ref").ok()?;
    let id = doc.get("$id")?;
    Some(DbRef {
        collection: collection.to_string(),
        id: id.clone(),
    })
}

fn iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_double(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};
    use chrono::TimeZone;

    const OID: &str = "65705d84dfc3f3b5094e1f72";

    fn plain() -> ShellFormatter {
        ShellFormatter::new(false, 2)
    }

    #[test]
    fn test_shell_formatter_objectid() {
        let oid = ObjectId::parse_str(OID).unwrap();
        let result = plain().format_document(&doc! { "_id": oid });
        assert_eq!(result, format!("{{\n  _id: ObjectId('{OID}')\n}}"));
    }

    #[test]
    fn test_shell_formatter_dates() {
        let dt = Utc.with_ymd_and_hms(2023, 12, 6, 11, 39, 48).unwrap();
        assert_eq!(
            plain().format_value(&Value::Date(dt)),
            "ISODate('2023-12-06T11:39:48.000Z')"
        );

        let bson_dt = bson::DateTime::from_millis(1701862788373);
        let result = plain().format_document(&doc! { "created_time": bson_dt });
        assert!(result.contains("created_time: ISODate('2023-12-06T11:39:48.373Z')"));
    }

    #[test]
    fn test_shell_formatter_scalars() {
        let f = plain();
        assert_eq!(f.format_value(&Value::Bson(Bson::Int64(1))), "Long('1')");
        assert_eq!(f.format_value(&Value::Bson(Bson::Int32(25))), "25");
        assert_eq!(f.format_value(&Value::Bson(Bson::Double(2.5))), "2.5");
        assert_eq!(f.format_value(&Value::Bson(Bson::Double(f64::NAN))), "NaN");
        assert_eq!(f.format_value(&Value::Bson(Bson::String("dalei".into()))), "'dalei'");
        assert_eq!(f.format_value(&Value::Bson(Bson::Boolean(true))), "true");
        assert_eq!(f.format_value(&Value::Bson(Bson::Null)), "null");
        assert_eq!(f.format_value(&Value::Undefined), "undefined");
        assert_eq!(f.format_value(&Value::Database("sales".into())), "sales");
    }

    #[test]
    fn test_shell_formatter_db_ref() {
        let oid = ObjectId::parse_str(OID).unwrap();
        let db_ref = DbRef {
            collection: "users".to_string(),
            id: Bson::ObjectId(oid),
        };
        let expected = format!("DBRef('users', ObjectId('{OID}'))");
        assert_eq!(plain().format_value(&Value::DbRef(db_ref.clone())), expected);

        // Embedded references keep the DBRef form
        let result = plain().format_document(&doc! { "owner": db_ref });
        assert!(result.contains(&format!("owner: {expected}")));
    }

    #[test]
    fn test_shell_formatter_nested_document() {
        let result = plain().format_document(&doc! {
            "user": { "name": "test", "age": 25 },
            "tags": ["rust", "mongodb"],
            "empty": {},
        });
        assert_eq!(
            result,
            "{\n  user: {\n    name: 'test',\n    age: 25\n  },\n  tags: [\n    'rust',\n    'mongodb'\n  ],\n  empty: {}\n}"
        );
    }

    #[test]
    fn test_shell_formatter_binary_uses_hex() {
        let bin = bson::Binary {
            subtype: bson::spec::BinarySubtype::Generic,
            bytes: vec![0x00, 0xff],
        };
        let result = plain().format_value(&Value::Bson(Bson::Binary(bin)));
        assert_eq!(result, "BinData(0, '00ff')");
    }

    #[test]
    fn test_shell_formatter_custom_indent() {
        let result = ShellFormatter::new(false, 4).format_document(&doc! { "a": 1 });
        assert_eq!(result, "{\n    a: 1\n}");
    }
}
