//! Statement execution over both driver strategies.
//!
//! Whatever the driver generation, callers get a [`RowSet`] for selects and a
//! [`NonSelect`] for everything else, or one of the same errors:
//! `Query`, `Timeout` or the `Cancelled` marker.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::connection::{Backend, Connection};
use super::driver::{DriverError, Outcome, PollingDriver};
use super::shim;
use super::statement::Statement;
use super::value::{NonSelect, RowSet};
use crate::error::ClipstashError;

/// Delay between two polls of a submitted job.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Number of empty polls after which a job is considered timed out.
pub const MAX_POLL_ATTEMPTS: u32 = 10;

fn query_error(e: DriverError) -> ClipstashError {
    ClipstashError::Query(e.to_string())
}

impl Connection {
    /// Execute a select statement.
    ///
    /// # Errors
    ///
    /// - `ClipstashError::Query` if the driver fails or the statement is not a
    ///   selection.
    /// - `ClipstashError::Timeout` if a polled job never completes.
    /// - `ClipstashError::Cancelled` if `token` fires while polling; nothing is
    ///   delivered in that case.
    pub async fn execute_select(
        &self,
        stmt: &Statement,
        token: &CancellationToken,
    ) -> Result<RowSet, ClipstashError> {
        match self.execute(stmt, token).await? {
            Outcome::Rows(rows) => Ok(rows),
            Outcome::Modified(_) => Err(ClipstashError::Query(
                "Statement is not a selection statement".to_string(),
            )),
        }
    }

    /// Execute an insert, update, delete or DDL statement.
    ///
    /// # Errors
    ///
    /// Same as [`Connection::execute_select`], with `Query` raised when the
    /// statement is a selection.
    pub async fn execute_non_select(
        &self,
        stmt: &Statement,
        token: &CancellationToken,
    ) -> Result<NonSelect, ClipstashError> {
        match self.execute(stmt, token).await? {
            Outcome::Modified(result) => Ok(result),
            Outcome::Rows(_) => Err(ClipstashError::Query(
                "Statement is a selection statement".to_string(),
            )),
        }
    }

    async fn execute(
        &self,
        stmt: &Statement,
        token: &CancellationToken,
    ) -> Result<Outcome, ClipstashError> {
        match &self.backend {
            Backend::SubmitPoll(driver) => self.submit_and_poll(driver.as_ref(), stmt, token).await,
            Backend::IdleDispatch(driver) => {
                self.scheduler.idle().await;
                tracing::debug!(sql = stmt.sql(), "dispatching statement");
                driver.execute(stmt).map_err(query_error)
            }
        }
    }

    async fn submit_and_poll(
        &self,
        driver: &dyn PollingDriver,
        stmt: &Statement,
        token: &CancellationToken,
    ) -> Result<Outcome, ClipstashError> {
        let unescaped;
        let stmt = if stmt.has_params() {
            unescaped = shim::unescape_nulls(driver, stmt).map_err(query_error)?;
            &unescaped
        } else {
            stmt
        };

        let job = driver.submit(stmt).map_err(query_error)?;
        tracing::debug!(job, sql = stmt.sql(), "submitted statement");

        let mut attempts = 0;
        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!(job, attempts, "stopped polling, cancelled");
                    return Err(ClipstashError::Cancelled);
                }
                () = self.scheduler.sleep(POLL_INTERVAL) => {}
            }

            if let Some(outcome) = driver.fetch_result(job).map_err(query_error)? {
                tracing::debug!(job, attempts, "job completed");
                return Ok(outcome);
            }

            attempts += 1;
            if attempts >= MAX_POLL_ATTEMPTS {
                tracing::warn!(job, attempts, "gave up waiting for statement result");
                return Err(ClipstashError::Timeout(attempts));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::storage::driver::{DriverHandle, MockDirectDriver, MockPollingDriver};
    use crate::storage::scheduler::VirtualScheduler;
    use crate::storage::statement::{SqlBuilder, StatementKind};
    use crate::storage::value::{RowHandle, Value};

    fn rows() -> RowSet {
        RowSet::new(vec!["id".to_string()], vec![vec![Value::Integer(1)]])
    }

    fn modified() -> NonSelect {
        NonSelect {
            affected_rows: 1,
            last_row: Some(RowHandle(1)),
        }
    }

    fn select() -> Statement {
        Statement::new(StatementKind::Select, "SELECT id FROM clipboard")
    }

    async fn open_polling(
        driver: MockPollingDriver,
        scheduler: &Rc<VirtualScheduler>,
    ) -> Connection {
        let mut driver = driver;
        driver.expect_open().returning(|| Ok(()));
        Connection::open(DriverHandle::Polling(Box::new(driver)), scheduler.clone())
            .await
            .unwrap()
    }

    async fn open_direct(driver: MockDirectDriver, scheduler: &Rc<VirtualScheduler>) -> Connection {
        let mut driver = driver;
        driver.expect_open().returning(|| Ok(()));
        Connection::open(DriverHandle::Direct(Box::new(driver)), scheduler.clone())
            .await
            .unwrap()
    }

    /// Driver whose job completes on the given poll.
    fn completes_on(poll: u32, outcome: Outcome) -> (MockPollingDriver, Arc<AtomicU32>) {
        let polls = Arc::new(AtomicU32::new(0));
        let counter = polls.clone();
        let mut driver = MockPollingDriver::new();
        driver.expect_submit().returning(|_| Ok(42));
        driver.expect_fetch_result().returning(move |job| {
            assert_eq!(job, 42);
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok((n == poll).then(|| outcome.clone()))
        });
        (driver, polls)
    }

    #[tokio::test]
    async fn test_completion_within_budget() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let (driver, polls) = completes_on(6, Outcome::Rows(rows()));
        let conn = open_polling(driver, &scheduler).await;

        let result = conn
            .execute_select(&select(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, rows());
        assert_eq!(polls.load(Ordering::SeqCst), 6);
        assert_eq!(scheduler.elapsed(), POLL_INTERVAL * 6);
    }

    #[tokio::test]
    async fn test_completion_on_last_poll() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let (driver, polls) = completes_on(MAX_POLL_ATTEMPTS, Outcome::Rows(rows()));
        let conn = open_polling(driver, &scheduler).await;

        let result = conn
            .execute_select(&select(), &CancellationToken::new())
            .await;

        assert_eq!(result.unwrap(), rows());
        assert_eq!(polls.load(Ordering::SeqCst), MAX_POLL_ATTEMPTS);
        assert_eq!(scheduler.elapsed(), POLL_INTERVAL * MAX_POLL_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_never_completing_job_times_out() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let (driver, polls) = completes_on(u32::MAX, Outcome::Rows(rows()));
        let conn = open_polling(driver, &scheduler).await;

        let err = conn
            .execute_select(&select(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClipstashError::Timeout(MAX_POLL_ATTEMPTS)));
        assert_eq!(polls.load(Ordering::SeqCst), MAX_POLL_ATTEMPTS);
        assert_eq!(scheduler.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_cancellation_stops_polling_and_drops_result() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let token = CancellationToken::new();
        let trigger = token.clone();
        let polls = Arc::new(AtomicU32::new(0));
        let counter = polls.clone();

        let mut driver = MockPollingDriver::new();
        driver.expect_submit().returning(|_| Ok(7));
        driver.expect_fetch_result().returning(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 3 {
                trigger.cancel();
            }
            // A result would arrive on the fourth poll.
            Ok((n == 4).then(|| Outcome::Rows(rows())))
        });
        let conn = open_polling(driver, &scheduler).await;

        let err = conn.execute_select(&select(), &token).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(polls.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.sleeps(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_poll() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let mut driver = MockPollingDriver::new();
        driver.expect_submit().times(1).returning(|_| Ok(1));
        driver.expect_fetch_result().never();
        let conn = open_polling(driver, &scheduler).await;

        let token = CancellationToken::new();
        token.cancel();

        let err = conn.execute_select(&select(), &token).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(scheduler.sleeps(), 0);
    }

    #[tokio::test]
    async fn test_kind_mismatch_is_query_error() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let (driver, _) = completes_on(1, Outcome::Modified(modified()));
        let conn = open_polling(driver, &scheduler).await;

        let err = conn
            .execute_select(&select(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Query error: Statement is not a selection statement"
        );
    }

    #[tokio::test]
    async fn test_fetch_error_is_query_error() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let mut driver = MockPollingDriver::new();
        driver.expect_submit().returning(|_| Ok(1));
        driver
            .expect_fetch_result()
            .returning(|_| Err(DriverError("no such table: clipboard".to_string())));
        let conn = open_polling(driver, &scheduler).await;

        let err = conn
            .execute_select(&select(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClipstashError::Query(msg) if msg.contains("no such table")));
    }

    #[tokio::test]
    async fn test_parameters_pass_through_null_repair() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let mut driver = MockPollingDriver::new();
        driver
            .expect_statement_to_sql()
            .returning(|stmt: &Statement| stmt.render(crate::storage::value::NullLiteral::Quoted));
        driver
            .expect_parse_sql()
            .withf(|sql: &str| sql == "UPDATE clipboard SET tag = NULL WHERE id = 3")
            .times(1)
            .returning(|sql: &str| Ok(Statement::new(StatementKind::NonSelect, sql)));
        driver
            .expect_submit()
            .withf(|stmt: &Statement| !stmt.has_params())
            .returning(|_| Ok(1));
        driver
            .expect_fetch_result()
            .returning(|_| Ok(Some(Outcome::Modified(modified()))));
        let conn = open_polling(driver, &scheduler).await;

        let stmt = SqlBuilder::update("clipboard")
            .value("tag", Value::Null)
            .where_eq("id", 3_i64)
            .build();
        let result = conn
            .execute_non_select(&stmt, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result, modified());
    }

    #[tokio::test]
    async fn test_idle_dispatch_runs_once() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let mut driver = MockDirectDriver::new();
        driver
            .expect_execute()
            .times(1)
            .returning(|_| Ok(Outcome::Modified(modified())));
        let conn = open_direct(driver, &scheduler).await;

        // The token is not consulted by the idle dispatch.
        let token = CancellationToken::new();
        token.cancel();
        let stmt = SqlBuilder::delete("clipboard").where_eq("id", 1_i64).build();
        let result = conn.execute_non_select(&stmt, &token).await.unwrap();

        assert_eq!(result, modified());
        assert_eq!(scheduler.idles(), 2);
        assert_eq!(scheduler.sleeps(), 0);
    }

    #[tokio::test]
    async fn test_idle_dispatch_classifies_like_polling() {
        let scheduler = Rc::new(VirtualScheduler::default());
        let mut driver = MockDirectDriver::new();
        driver
            .expect_execute()
            .returning(|_| Ok(Outcome::Rows(rows())));
        let conn = open_direct(driver, &scheduler).await;

        let err = conn
            .execute_non_select(&select(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Query error: Statement is a selection statement"
        );
    }
}
