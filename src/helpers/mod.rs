//! mongosh compatibility helpers
//!
//! Scripts pasted from the MongoDB shell expect a handful of globals:
//!
//! - `ObjectId(str)` - identifier from its hex form
//! - `DBRef(colName, oid)` - reference to a document in another collection
//! - `ISODate(str)` - timestamp in one of six ISO-like layouts
//! - `Date(str)` - calendar date in one of seven common notations
//! - `use(name)` - select the database bound to `db`
//!
//! [`ScriptSession`] provides them on top of a [`ShellHost`](crate::host::ShellHost).

pub mod date;
mod session;

use std::fmt;

use crate::error::HelperError;

pub use date::{CALENDAR_DATE_PATTERNS, DatePattern, ISO_DATE_PATTERNS};
pub use session::ScriptSession;

/// Result type returned by the helpers.
pub type HelperResult<T> = std::result::Result<T, HelperError>;

/// The globals a session installs, by script name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    ObjectId,
    DbRef,
    IsoDate,
    Date,
    Use,
}

impl Helper {
    /// Every helper, in the order they are documented.
    pub const ALL: [Helper; 5] = [
        Helper::ObjectId,
        Helper::DbRef,
        Helper::IsoDate,
        Helper::Date,
        Helper::Use,
    ];

    /// Resolve a global function name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.name() == name)
    }

    /// Name scripts call this helper by.
    pub fn name(&self) -> &'static str {
        match self {
            Helper::ObjectId => "ObjectId",
            Helper::DbRef => "DBRef",
            Helper::IsoDate => "ISODate",
            Helper::Date => "Date",
            Helper::Use => "use",
        }
    }
}

impl fmt::Display for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_names_round_trip() {
        for helper in Helper::ALL {
            assert_eq!(Helper::from_name(helper.name()), Some(helper));
        }
    }

    #[test]
    fn test_helper_names_are_case_sensitive() {
        assert_eq!(Helper::from_name("DBRef"), Some(Helper::DbRef));
        assert_eq!(Helper::from_name("dbref"), None);
        assert_eq!(Helper::from_name("isodate"), None);
        assert_eq!(Helper::from_name("print"), None);
    }
}
