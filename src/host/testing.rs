//! In-memory host used by unit tests.

use std::collections::HashSet;

use bson::{Bson, oid::ObjectId};

use super::{DatabaseHandle, DbRef, ShellHost};
use crate::error::HelperError;

/// Database handle handed out by [`FakeHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeDatabase {
    pub name: String,
}

impl DatabaseHandle for FakeDatabase {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Host that accepts any database except the ones marked unavailable.
#[derive(Debug, Default)]
pub struct FakeHost {
    unavailable: HashSet<String>,
    pub lookups: Vec<String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unavailable(names: &[&str]) -> Self {
        Self {
            unavailable: names.iter().map(|n| n.to_string()).collect(),
            lookups: Vec::new(),
        }
    }
}

impl ShellHost for FakeHost {
    type Database = FakeDatabase;

    fn object_id(&self, input: &str) -> Result<ObjectId, HelperError> {
        ObjectId::parse_str(input).map_err(|e| HelperError::InvalidIdentifierFormat {
            input: input.to_string(),
            reason: e.to_string(),
        })
    }

    fn new_object_id(&self) -> ObjectId {
        ObjectId::new()
    }

    fn db_ref(&self, collection: &str, id: Bson) -> Result<DbRef, HelperError> {
        if matches!(id, Bson::Null) {
            return Err(HelperError::InvalidReferenceConstruction {
                collection: collection.to_string(),
                reason: "fake host rejects null ids".to_string(),
            });
        }
        Ok(DbRef {
            collection: collection.to_string(),
            id,
        })
    }

    fn database(&mut self, name: &str) -> Result<FakeDatabase, HelperError> {
        self.lookups.push(name.to_string());
        if self.unavailable.contains(name) {
            return Err(HelperError::DatabaseUnavailable {
                name: name.to_string(),
                reason: "fake host marks it unavailable".to_string(),
            });
        }
        Ok(FakeDatabase {
            name: name.to_string(),
        })
    }
}
