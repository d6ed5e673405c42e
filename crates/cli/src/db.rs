//! Database connection used while seeding.
//!
//! The installer talks to the database through the [`Database`] trait so the
//! seeding flow can run against a recording fake in tests. Production uses
//! [`MySqlDatabase`], a single `sqlx` connection held for the whole seed
//! phase.
//!
//! # Drivers
//!
//! OpenCart's `mysqli`, `mpdo` and `pdo` drivers all speak the MySQL
//! protocol, so they share one implementation. The driver id is still
//! written to `DB_DRIVER` as supplied.

use std::future::Future;
use std::str::FromStr;

use oc_install_core::options::{DatabaseOptions, OptionsError};
use oc_install_core::seed::Escaped;
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use thiserror::Error;

/// Longest statement prefix kept in error messages.
const STATEMENT_PREVIEW_CHARS: usize = 120;

/// Errors that can occur while talking to the database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The driver id is not one the installer can connect with.
    #[error("Unsupported database driver: {0}. Valid drivers: mysqli, mpdo, pdo")]
    UnsupportedDriver(String),

    /// A connection setting cannot be used.
    #[error(transparent)]
    Settings(#[from] OptionsError),

    /// The connection could not be opened or closed cleanly.
    #[error("Database connection error: {0}")]
    Connect(#[source] sqlx::Error),

    /// A statement was rejected.
    #[error("Database error: {source} (statement: {statement})")]
    Query {
        /// Leading part of the failing statement
        statement: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DatabaseError {
    /// Wrap a query failure, keeping a short preview of the statement.
    #[must_use]
    pub fn query(sql: &str, source: sqlx::Error) -> Self {
        let mut statement: String = sql.trim().chars().take(STATEMENT_PREVIEW_CHARS).collect();
        if sql.trim().chars().count() > STATEMENT_PREVIEW_CHARS {
            statement.push_str("...");
        }
        Self::Query { statement, source }
    }
}

/// Supported driver ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    MySqli,
    MPdo,
    Pdo,
}

impl FromStr for Driver {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mysqli" => Ok(Self::MySqli),
            "mpdo" => Ok(Self::MPdo),
            "pdo" => Ok(Self::Pdo),
            other => Err(DatabaseError::UnsupportedDriver(other.to_owned())),
        }
    }
}

/// An open database connection.
pub trait Database {
    /// Execute one statement, returning the number of affected rows.
    fn query(&mut self, sql: &str) -> impl Future<Output = Result<u64, DatabaseError>>;

    /// Auto-increment id generated by the most recent statement, `0` if it
    /// generated none.
    fn last_insert_id(&self) -> u64;

    /// Escape a value for use inside a single-quoted literal.
    fn escape(&self, value: &str) -> Escaped {
        Escaped::mysql(value)
    }

    /// Close the connection.
    fn close(self) -> impl Future<Output = Result<(), DatabaseError>>
    where
        Self: Sized;
}

/// MySQL connection backed by `sqlx`.
pub struct MySqlDatabase {
    conn: MySqlConnection,
    last_insert_id: u64,
}

impl MySqlDatabase {
    /// Open a connection with the installer's database settings.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::UnsupportedDriver`] for unknown driver ids,
    /// [`DatabaseError::Settings`] for an unusable port and
    /// [`DatabaseError::Connect`] when the server cannot be reached or
    /// rejects the credentials.
    pub async fn connect(options: &DatabaseOptions) -> Result<Self, DatabaseError> {
        let driver: Driver = options.driver.parse()?;
        let port = options.port_number()?;

        tracing::info!(
            ?driver,
            host = %options.hostname,
            port,
            database = %options.database,
            "Connecting to database..."
        );

        let conn = MySqlConnectOptions::new()
            .host(&options.hostname)
            .port(port)
            .username(&options.username)
            .password(options.password.expose_secret())
            .database(&options.database)
            .charset("utf8mb4")
            .connect()
            .await
            .map_err(DatabaseError::Connect)?;

        Ok(Self {
            conn,
            last_insert_id: 0,
        })
    }
}

impl Database for MySqlDatabase {
    async fn query(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::raw_sql(sql)
            .execute(&mut self.conn)
            .await
            .map_err(|source| DatabaseError::query(sql, source))?;

        self.last_insert_id = result.last_insert_id();
        Ok(result.rows_affected())
    }

    fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    async fn close(self) -> Result<(), DatabaseError> {
        self.conn.close().await.map_err(DatabaseError::Connect)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_ids() {
        assert_eq!("mysqli".parse::<Driver>().ok(), Some(Driver::MySqli));
        assert_eq!("mpdo".parse::<Driver>().ok(), Some(Driver::MPdo));
        assert_eq!("pdo".parse::<Driver>().ok(), Some(Driver::Pdo));
    }

    #[test]
    fn test_unsupported_driver() {
        let err = "pgsql".parse::<Driver>().unwrap_err();
        assert!(matches!(err, DatabaseError::UnsupportedDriver(ref id) if id == "pgsql"));
        assert_eq!(
            err.to_string(),
            "Unsupported database driver: pgsql. Valid drivers: mysqli, mpdo, pdo"
        );
    }

    #[test]
    fn test_query_error_preview_is_truncated() {
        let sql = format!("INSERT INTO `oc_a` VALUES ('{}');", "x".repeat(500));
        let err = DatabaseError::query(&sql, sqlx::Error::Protocol("boom".to_owned()));
        let DatabaseError::Query { statement, .. } = err else {
            panic!("expected a query error");
        };
        assert_eq!(statement.chars().count(), STATEMENT_PREVIEW_CHARS + 3);
        assert!(statement.ends_with("..."));
    }

    #[test]
    fn test_short_query_error_kept_whole() {
        let err = DatabaseError::query(
            "SET CHARACTER SET utf8\n",
            sqlx::Error::Protocol("boom".to_owned()),
        );
        assert!(err.to_string().ends_with("(statement: SET CHARACTER SET utf8)"));
    }

    /// Connections are driven on one thread and need not be `Send`.
    struct LocalDatabase {
        executed: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl Database for LocalDatabase {
        async fn query(&mut self, sql: &str) -> Result<u64, DatabaseError> {
            self.executed.borrow_mut().push(sql.to_owned());
            Ok(0)
        }

        fn last_insert_id(&self) -> u64 {
            0
        }

        async fn close(self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_connection_need_not_be_send() {
        let executed = std::rc::Rc::default();
        let mut db = LocalDatabase {
            executed: std::rc::Rc::clone(&executed),
        };
        db.query("SET CHARACTER SET utf8").await.unwrap();
        assert_eq!(db.escape("o'k").as_str(), "o\\'k");
        db.close().await.unwrap();
        assert_eq!(*executed.borrow(), ["SET CHARACTER SET utf8"]);
    }

    #[tokio::test]
    async fn test_invalid_port_rejected_before_connecting() {
        let database = DatabaseOptions {
            driver: "mysqli".to_owned(),
            hostname: "localhost".to_owned(),
            username: "root".to_owned(),
            password: secrecy::SecretString::from("pass".to_owned()),
            database: "opencart".to_owned(),
            prefix: "oc_".to_owned(),
            port: "mysql".to_owned(),
        };
        let Err(err) = MySqlDatabase::connect(&database).await else {
            panic!("connect should fail");
        };
        assert!(matches!(err, DatabaseError::Settings(_)));
        assert_eq!(err.to_string(), "Invalid db_port: mysql is not a port number");
    }
}
