//! Host capabilities required by the script helpers
//!
//! The helpers never build identifiers, references or database handles
//! themselves. They delegate to a [`ShellHost`], which keeps them testable
//! against an in-memory host and lets the binary plug in a real
//! [`MongoHost`] backed by the MongoDB driver.

mod mongo;
#[cfg(test)]
pub(crate) mod testing;

use bson::{Bson, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::HelperError;

pub use mongo::MongoHost;

/// Capabilities a script session needs from its host environment.
pub trait ShellHost {
    /// Handle type returned by [`ShellHost::database`].
    type Database: DatabaseHandle;

    /// Build an identifier from its textual form.
    fn object_id(&self, input: &str) -> Result<ObjectId, HelperError>;

    /// Generate a fresh identifier.
    fn new_object_id(&self) -> ObjectId;

    /// Build a reference to `id` in `collection`.
    fn db_ref(&self, collection: &str, id: Bson) -> Result<DbRef, HelperError>;

    /// Look up a database handle by name.
    fn database(&mut self, name: &str) -> Result<Self::Database, HelperError>;
}

/// A database handle as seen by scripts.
pub trait DatabaseHandle: Clone {
    /// Name of the database this handle points at.
    fn name(&self) -> &str;
}

impl DatabaseHandle for mongodb::Database {
    fn name(&self) -> &str {
        mongodb::Database::name(self)
    }
}

/// Reference to a document in another collection (`DBRef(colName, id)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbRef {
    #[serde(rename = "$ref")]
    pub collection: String,
    #[serde(rename = "$id")]
    pub id: Bson,
}

impl DbRef {
    /// Canonical `{ $ref, $id }` document form.
    pub fn to_document(&self) -> Document {
        doc! {
            "$ref": self.collection.clone(),
            "$id": self.id.clone(),
        }
    }
}

impl From<DbRef> for Bson {
    fn from(db_ref: DbRef) -> Self {
        Bson::Document(db_ref.to_document())
    }
}

/// Check a database name against MongoDB's naming restrictions.
///
/// Returns the reason the name is rejected, if any.
pub fn database_name_violation(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("database name cannot be empty".to_string());
    }
    if name.len() > 64 {
        return Some(format!(
            "database name is {} bytes, the limit is 64",
            name.len()
        ));
    }
    name.chars()
        .find(|ch| {
            matches!(
                ch,
                '/' | '\\' | '.' | ' ' | '"' | '$' | '*' | '<' | '>' | ':' | '|' | '?' | '\0'
            )
        })
        .map(|ch| format!("database name cannot contain {ch:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbref_document_shape() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let db_ref = DbRef {
            collection: "users".to_string(),
            id: Bson::ObjectId(oid),
        };
        let doc = db_ref.to_document();
        assert_eq!(doc.get_str("$ref").unwrap(), "users");
        assert_eq!(doc.get_object_id("$id").unwrap(), oid);
        let keys: Vec<_> = doc.keys().cloned().collect();
        assert_eq!(keys, vec!["$ref", "$id"]);
    }

    #[test]
    fn test_dbref_serializes_with_dollar_keys() {
        let db_ref = DbRef {
            collection: "orders".to_string(),
            id: Bson::Int32(7),
        };
        let json = serde_json::to_value(&db_ref).unwrap();
        assert_eq!(json["$ref"], "orders");
        assert_eq!(json["$id"], 7);
    }

    #[test]
    fn test_database_name_rules() {
        assert!(database_name_violation("sales").is_none());
        assert!(database_name_violation("sales_2024").is_none());
        assert!(database_name_violation("").is_some());
        assert!(database_name_violation("a.b").is_some());
        assert!(database_name_violation("has space").is_some());
        assert!(database_name_violation("$admin").is_some());
        assert!(database_name_violation(&"x".repeat(65)).is_some());
        assert!(database_name_violation(&"x".repeat(64)).is_none());
    }
}
