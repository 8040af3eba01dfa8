use std::collections::HashMap;

use bson::{Bson, oid::ObjectId};
use mongodb::{Client, Database};
use tracing::{debug, trace};

use super::{DbRef, ShellHost, database_name_violation};
use crate::error::HelperError;

/// Host backed by the MongoDB driver.
///
/// Without a client every database lookup fails with
/// [`HelperError::DatabaseUnavailable`]; the value constructors keep working.
#[derive(Debug, Clone, Default)]
pub struct MongoHost {
    client: Option<Client>,
    databases: HashMap<String, Database>,
}

impl MongoHost {
    /// Create a host around a connected client.
    pub fn new(client: Client) -> Self {
        Self {
            client: Some(client),
            databases: HashMap::new(),
        }
    }

    /// Create a host with no client attached.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Whether a client is attached.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }
}

impl ShellHost for MongoHost {
    type Database = Database;

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
        if matches!(id, Bson::Null | Bson::Undefined) {
            return Err(HelperError::InvalidReferenceConstruction {
                collection: collection.to_string(),
                reason: "id can not be null".to_string(),
            });
        }

        Ok(DbRef {
            collection: collection.to_string(),
            id,
        })
    }

    fn database(&mut self, name: &str) -> Result<Database, HelperError> {
        if let Some(db) = self.databases.get(name) {
            trace!("Reusing cached handle for database '{}'", name);
            return Ok(db.clone());
        }

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| HelperError::DatabaseUnavailable {
                name: name.to_string(),
                reason: "not connected to MongoDB".to_string(),
            })?;

        if let Some(reason) = database_name_violation(name) {
            return Err(HelperError::DatabaseUnavailable {
                name: name.to_string(),
                reason,
            });
        }

        debug!("Opening handle for database '{}'", name);
        let db = client.database(name);
        self.databases.insert(name.to_string(), db.clone());
        Ok(db)
    }
}
