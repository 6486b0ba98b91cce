//! Reference store access layer.
//!
//! The reference dataset is a read-only SQLite file. Every query branch opens
//! its own [`Database`] so no connection is ever shared between threads.

mod catalog;
mod interactions;
mod schema;
mod store;

pub use catalog::*;
pub use interactions::*;
pub use schema::*;
pub use store::*;

use std::fmt;
use std::os::raw::c_int;
use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::{Connection, ErrorCode, OpenFlags};
use thiserror::Error;

use crate::cancel::CancelToken;

/// Number of SQLite VM instructions between cancellation checks.
const PROGRESS_CHECK_OPS: c_int = 1000;

/// Which query an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCategory {
    FoodInteractions,
    AllergyInteractions,
    DrugInteractions,
    DrugLookup,
    AllergyLookup,
    Schema,
}

impl fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueryCategory::FoodInteractions => "food interaction",
            QueryCategory::AllergyInteractions => "allergy interaction",
            QueryCategory::DrugInteractions => "drug-to-drug interaction",
            QueryCategory::DrugLookup => "drug lookup",
            QueryCategory::AllergyLookup => "allergy lookup",
            QueryCategory::Schema => "schema",
        };
        f.write_str(label)
    }
}

/// Reference store errors.
///
/// `Display` names the query category and the SQLite extended result code
/// only; the driver message is reachable through `source()`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{category} query failed ({})", describe_code(.code))]
    Query {
        category: QueryCategory,
        code: Option<i32>,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{category} query timed out")]
    Timeout { category: QueryCategory },

    #[error("{category} query cancelled")]
    Cancelled { category: QueryCategory },

    #[error("Cannot open reference store: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("Reference store is missing table {0}")]
    MissingTable(String),
}

impl StoreError {
    /// Wrap a driver error with the category of the query that produced it.
    pub fn query(category: QueryCategory, source: rusqlite::Error) -> Self {
        let code = match &source {
            rusqlite::Error::SqliteFailure(err, _) => Some(err.extended_code),
            _ => None,
        };
        StoreError::Query {
            category,
            code,
            source,
        }
    }

    /// Category of the failed query, if the error belongs to one.
    pub fn category(&self) -> Option<QueryCategory> {
        match self {
            StoreError::Query { category, .. }
            | StoreError::Timeout { category }
            | StoreError::Cancelled { category } => Some(*category),
            StoreError::Open(_) | StoreError::MissingTable(_) => None,
        }
    }

    /// True when the query was stopped by a sibling's cancellation rather
    /// than failing on its own.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StoreError::Cancelled { .. })
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("sqlite code {}", code),
        None => "no driver code".to_string(),
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a reference dataset read-only.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(StoreError::Open)?;
        Self::from_connection(conn)
    }

    /// Open a dataset for loading, creating the file and schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(StoreError::Open)?;
        let db = Self::from_connection(conn)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        let db = Self::from_connection(conn)?;
        db.initialize_schema()?;
        Ok(db)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        rusqlite::vtab::array::load_module(&conn).map_err(StoreError::Open)?;
        Ok(Self { conn })
    }

    /// Create any missing reference tables.
    pub fn initialize_schema(&self) -> StoreResult<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|err| StoreError::query(QueryCategory::Schema, err))
    }

    /// Check that every table the engine reads is present.
    pub fn verify_schema(&self) -> StoreResult<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?")
            .map_err(|err| StoreError::query(QueryCategory::Schema, err))?;
        for table in REQUIRED_TABLES {
            let present = stmt
                .exists([table])
                .map_err(|err| StoreError::query(QueryCategory::Schema, err))?;
            if !present {
                return Err(StoreError::MissingTable(table.to_string()));
            }
        }
        Ok(())
    }

    /// Get raw connection (for loading data and advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `query` with cancellation and a deadline installed.
    ///
    /// SQLite polls the progress handler every [`PROGRESS_CHECK_OPS`]
    /// instructions; returning `true` interrupts the running statement, which
    /// is then reported as `Cancelled` or `Timeout`.
    pub(crate) fn guarded<T>(
        &self,
        category: QueryCategory,
        cancel: &CancelToken,
        timeout: Duration,
        query: impl FnOnce(&Database) -> rusqlite::Result<T>,
    ) -> StoreResult<T> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled { category });
        }

        let deadline = Instant::now().checked_add(timeout);
        let token = cancel.clone();
        self.conn.progress_handler(
            PROGRESS_CHECK_OPS,
            Some(move || {
                token.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d)
            }),
        );
        let result = query(self);
        self.conn
            .progress_handler(PROGRESS_CHECK_OPS, None::<fn() -> bool>);

        result.map_err(|err| {
            if err.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
                if cancel.is_cancelled() {
                    StoreError::Cancelled { category }
                } else {
                    StoreError::Timeout { category }
                }
            } else {
                StoreError::query(category, err)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOW_QUERY: &str = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 50000000) SELECT count(*) FROM c";

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();
        db.verify_schema().unwrap();
    }

    #[test]
    fn test_verify_schema_reports_missing_table() {
        let db = Database::open_in_memory().unwrap();
        db.conn().execute_batch("DROP TABLE RADIMEF0").unwrap();

        let err = db.verify_schema().unwrap_err();
        assert!(matches!(err, StoreError::MissingTable(ref t) if t == "RADIMEF0"));
    }

    #[test]
    fn test_guarded_times_out() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .guarded(
                QueryCategory::DrugInteractions,
                &CancelToken::new(),
                Duration::ZERO,
                |db| db.conn().query_row(SLOW_QUERY, [], |row| row.get::<_, i64>(0)),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Timeout {
                category: QueryCategory::DrugInteractions
            }
        ));
    }

    #[test]
    fn test_guarded_reports_cancellation() {
        let db = Database::open_in_memory().unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = db
            .guarded(
                QueryCategory::FoodInteractions,
                &cancel,
                Duration::from_secs(60),
                |db| db.conn().query_row(SLOW_QUERY, [], |row| row.get::<_, i64>(0)),
            )
            .unwrap_err();

        assert!(err.is_cancellation());
        assert_eq!(err.category(), Some(QueryCategory::FoodInteractions));
    }

    #[test]
    fn test_guarded_keeps_driver_code() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .guarded(
                QueryCategory::AllergyInteractions,
                &CancelToken::new(),
                Duration::from_secs(60),
                |db| db.conn().execute_batch("SELECT * FROM NO_SUCH_TABLE"),
            )
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("allergy interaction query failed (sqlite code"));
        assert!(!message.contains("NO_SUCH_TABLE"));
        match err {
            StoreError::Query { category, code, .. } => {
                assert_eq!(category, QueryCategory::AllergyInteractions);
                assert!(code.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
