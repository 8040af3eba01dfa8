use std::fmt;

use bson::{Bson, oid::ObjectId};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{HelperResult, date};
use crate::host::{DatabaseHandle, DbRef, ShellHost};

/// One script session: a host plus the session's current database (`db`).
///
/// The `db` binding belongs to the session, so two sessions never observe
/// each other's `use` calls. Selecting a database needs `&mut self`.
pub struct ScriptSession<H: ShellHost> {
    host: H,
    db: Option<H::Database>,
}

impl<H: ShellHost> ScriptSession<H> {
    /// Start a session with `db` unset.
    pub fn new(host: H) -> Self {
        Self { host, db: None }
    }

    /// Start a session with `db` bound to `database`.
    ///
    /// If the host cannot produce that database the session starts with
    /// `db` unset rather than failing.
    pub fn with_database(host: H, database: &str) -> Self {
        let mut session = Self::new(host);
        if let Err(e) = session.use_database(database) {
            warn!("Starting session without a current database: {}", e);
        }
        session
    }

    /// `ObjectId(str)`
    pub fn object_id(&self, input: &str) -> HelperResult<ObjectId> {
        self.host.object_id(input)
    }

    /// `ObjectId()`
    pub fn new_object_id(&self) -> ObjectId {
        self.host.new_object_id()
    }

    /// `DBRef(colName, oid)`
    pub fn db_ref(&self, collection: &str, id: impl Into<Bson>) -> HelperResult<DbRef> {
        self.host.db_ref(collection, id.into())
    }

    /// `ISODate(str)`
    pub fn iso_date(&self, input: &str) -> HelperResult<DateTime<Utc>> {
        date::iso_date(input)
    }

    /// `Date(str)`
    pub fn date(&self, input: &str) -> HelperResult<DateTime<Utc>> {
        date::calendar_date(input)
    }

    /// `use(name)`: select the current database.
    ///
    /// On failure the previous binding is kept.
    pub fn use_database(&mut self, name: impl ToString) -> HelperResult<&H::Database> {
        let name = name.to_string();
        let handle = self.host.database(&name)?;

        match &self.db {
            Some(previous) => debug!("Switching database from '{}' to '{}'", previous.name(), name),
            None => debug!("Selecting database '{}'", name),
        }

        Ok(&*self.db.insert(handle))
    }

    /// The current database binding, if any.
    pub fn db(&self) -> Option<&H::Database> {
        self.db.as_ref()
    }

    /// Name of the current database, if any.
    pub fn database_name(&self) -> Option<&str> {
        self.db.as_ref().map(|db| db.name())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

}

impl<H> fmt::Debug for ScriptSession<H>
where
    H: ShellHost + fmt::Debug,
    H::Database: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptSession")
            .field("host", &self.host)
            .field("db", &self.db)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HelperError;
    use crate::host::testing::{FakeDatabase, FakeHost};

    #[test]
    fn test_use_sets_db() {
        let mut session = ScriptSession::new(FakeHost::new());
        assert!(session.db().is_none());

        let db = session.use_database("sales").unwrap();
        assert_eq!(db.name(), "sales");
        assert_eq!(
            session.db(),
            Some(&FakeDatabase {
                name: "sales".to_string()
            })
        );
    }

    #[test]
    fn test_second_use_overwrites() {
        let mut session = ScriptSession::new(FakeHost::new());
        session.use_database("sales").unwrap();
        session.use_database("other").unwrap();
        assert_eq!(session.database_name(), Some("other"));
        assert_eq!(session.host().lookups, vec!["sales", "other"]);
    }

    #[test]
    fn test_failed_use_keeps_previous_binding() {
        let mut session = ScriptSession::new(FakeHost::with_unavailable(&["offline"]));
        session.use_database("sales").unwrap();

        let err = session.use_database("offline").unwrap_err();
        assert!(matches!(
            err,
            HelperError::DatabaseUnavailable { ref name, .. } if name == "offline"
        ));
        assert_eq!(session.database_name(), Some("sales"));
    }

    #[test]
    fn test_failed_use_leaves_db_unset() {
        let mut session = ScriptSession::new(FakeHost::with_unavailable(&["offline"]));
        assert!(session.use_database("offline").is_err());
        assert!(session.db().is_none());
    }

    #[test]
    fn test_use_coerces_name_to_string() {
        let mut session = ScriptSession::new(FakeHost::new());
        session.use_database(42).unwrap();
        assert_eq!(session.database_name(), Some("42"));
    }

    #[test]
    fn test_with_database_tolerates_unavailable_initial_db() {
        let session = ScriptSession::with_database(FakeHost::with_unavailable(&["admin"]), "admin");
        assert!(session.db().is_none());

        let session = ScriptSession::with_database(FakeHost::new(), "admin");
        assert_eq!(session.database_name(), Some("admin"));
    }

    #[test]
    fn test_object_id_delegates_to_host() {
        let session = ScriptSession::new(FakeHost::new());
        let oid = session.object_id("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(oid.to_hex(), "507f1f77bcf86cd799439011");

        let err = session.object_id("bad").unwrap_err();
        assert!(matches!(err, HelperError::InvalidIdentifierFormat { .. }));
    }

    #[test]
    fn test_db_ref_wraps_object_id() {
        let session = ScriptSession::new(FakeHost::new());
        let oid = session.object_id("507f1f77bcf86cd799439011").unwrap();
        let db_ref = session.db_ref("users", oid).unwrap();
        assert_eq!(db_ref.collection, "users");
        assert_eq!(db_ref.id, Bson::ObjectId(oid));
    }

    #[test]
    fn test_db_ref_host_errors_pass_through() {
        let session = ScriptSession::new(FakeHost::new());
        let err = session.db_ref("users", Bson::Null).unwrap_err();
        assert_eq!(
            err,
            HelperError::InvalidReferenceConstruction {
                collection: "users".to_string(),
                reason: "fake host rejects null ids".to_string(),
            }
        );
    }

    #[test]
    fn test_date_helpers_are_independent() {
        let session = ScriptSession::new(FakeHost::new());
        // A failed ISODate call must not affect a following Date call.
        assert!(session.iso_date("31/12/2020").is_err());
        assert!(session.date("31/12/2020").is_ok());
        assert!(session.iso_date("2020-01-02T03:04:05Z").is_ok());
    }
}
