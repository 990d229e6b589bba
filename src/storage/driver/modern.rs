//! Modern direct driver with bound parameters.

use rusqlite::Connection;

use super::{sqlite, DirectDriver, DriverError, Outcome};
use crate::storage::connection::ConnectionSpec;
use crate::storage::statement::Statement;

/// Direct-execution driver over `SQLite`.
pub struct ModernDriver {
    spec: ConnectionSpec,
    conn: Option<Connection>,
}

impl ModernDriver {
    #[must_use]
    pub const fn new(spec: ConnectionSpec) -> Self {
        Self { spec, conn: None }
    }
}

impl DirectDriver for ModernDriver {
    fn open(&mut self) -> Result<(), DriverError> {
        self.conn = Some(sqlite::open(&self.spec)?);
        Ok(())
    }

    fn execute(&self, stmt: &Statement) -> Result<Outcome, DriverError> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| DriverError("Connection is not open".to_string()))?;
        sqlite::run(conn, stmt.sql(), stmt.params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::statement::{SqlBuilder, StatementKind};
    use crate::storage::value::Value;

    #[test]
    fn test_binds_null() {
        let mut driver = ModernDriver::new(ConnectionSpec::in_memory());
        driver.open().unwrap();
        driver
            .execute(&Statement::new(
                StatementKind::NonSelect,
                "CREATE TABLE t (a TEXT)",
            ))
            .unwrap();

        driver
            .execute(&SqlBuilder::insert("t").value("a", Value::Null).build())
            .unwrap();

        let Outcome::Rows(rows) = driver
            .execute(&SqlBuilder::select("t").field("a").build())
            .unwrap()
        else {
            panic!("expected rows");
        };
        assert_eq!(rows.first().unwrap().get("a"), Some(&Value::Null));
    }

    #[test]
    fn test_execute_before_open_fails() {
        let driver = ModernDriver::new(ConnectionSpec::in_memory());
        let err = driver
            .execute(&SqlBuilder::select("t").build())
            .unwrap_err();
        assert_eq!(err.0, "Connection is not open");
    }
}
