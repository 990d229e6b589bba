//! Legacy job-queue driver.
//!
//! Statements are submitted as jobs and their outcome is parked until the
//! caller fetches it. The driver only understands SQL text: parameters are
//! rendered inline, and NULL comes out as the quoted literal `'NULL'`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use rusqlite::Connection;

use super::{sqlite, DriverError, JobId, Outcome, PollingDriver};
use crate::storage::connection::ConnectionSpec;
use crate::storage::statement::Statement;
use crate::storage::value::NullLiteral;

/// Submit/poll driver over `SQLite`.
pub struct LegacyDriver {
    spec: ConnectionSpec,
    conn: Option<Connection>,
    jobs: RefCell<HashMap<JobId, Result<Outcome, DriverError>>>,
    next_job: Cell<JobId>,
}

impl LegacyDriver {
    #[must_use]
    pub fn new(spec: ConnectionSpec) -> Self {
        Self {
            spec,
            conn: None,
            jobs: RefCell::new(HashMap::new()),
            next_job: Cell::new(1),
        }
    }

    fn connection(&self) -> Result<&Connection, DriverError> {
        self.conn
            .as_ref()
            .ok_or_else(|| DriverError("Connection is not open".to_string()))
    }
}

impl PollingDriver for LegacyDriver {
    fn open(&mut self) -> Result<(), DriverError> {
        self.conn = Some(sqlite::open(&self.spec)?);
        Ok(())
    }

    fn submit(&self, stmt: &Statement) -> Result<JobId, DriverError> {
        let conn = self.connection()?;
        let sql = self.statement_to_sql(stmt);

        let job = self.next_job.get();
        self.next_job.set(job + 1);

        let outcome = sqlite::run(conn, &sql, &[]);
        self.jobs.borrow_mut().insert(job, outcome);
        Ok(job)
    }

    fn fetch_result(&self, job: JobId) -> Result<Option<Outcome>, DriverError> {
        self.jobs.borrow_mut().remove(&job).transpose()
    }

    fn statement_to_sql(&self, stmt: &Statement) -> String {
        stmt.render(NullLiteral::Quoted)
    }

    fn parse_sql(&self, sql: &str) -> Result<Statement, DriverError> {
        sqlite::parse(self.connection()?, sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::statement::SqlBuilder;
    use crate::storage::value::Value;

    fn open_driver() -> LegacyDriver {
        let mut driver = LegacyDriver::new(ConnectionSpec::in_memory());
        driver.open().unwrap();
        let create = driver
            .parse_sql("CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT)")
            .unwrap();
        let job = driver.submit(&create).unwrap();
        driver.fetch_result(job).unwrap().unwrap();
        driver
    }

    #[test]
    fn test_submit_before_open_fails() {
        let driver = LegacyDriver::new(ConnectionSpec::in_memory());
        let stmt = SqlBuilder::select("t").build();
        assert!(driver.submit(&stmt).is_err());
    }

    #[test]
    fn test_job_result_is_fetched_once() {
        let driver = open_driver();
        let stmt = SqlBuilder::insert("t").value("a", "x").build();

        let job = driver.submit(&stmt).unwrap();
        assert!(matches!(
            driver.fetch_result(job).unwrap(),
            Some(Outcome::Modified(_))
        ));
        assert!(driver.fetch_result(job).unwrap().is_none());
    }

    #[test]
    fn test_renders_null_as_quoted_literal() {
        let driver = open_driver();
        let stmt = SqlBuilder::insert("t").value("a", Value::Null).build();
        assert_eq!(
            driver.statement_to_sql(&stmt),
            "INSERT INTO t (a) VALUES ('NULL')"
        );

        // Without the NULL repair the defect stores the text "NULL".
        let job = driver.submit(&stmt).unwrap();
        driver.fetch_result(job).unwrap();
        let select = driver.parse_sql("SELECT a FROM t").unwrap();
        let job = driver.submit(&select).unwrap();
        let Some(Outcome::Rows(rows)) = driver.fetch_result(job).unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(rows.first().unwrap().get("a"), Some(&Value::from("NULL")));
    }

    #[test]
    fn test_failed_job_reports_error_on_fetch() {
        let driver = open_driver();
        let stmt = Statement::new(
            crate::storage::statement::StatementKind::NonSelect,
            "INSERT INTO missing (a) VALUES (1)",
        );
        let job = driver.submit(&stmt).unwrap();
        assert!(driver.fetch_result(job).is_err());
    }
}
