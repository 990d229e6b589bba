//! `rusqlite` plumbing shared by both driver generations.

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};

use super::{DriverError, Outcome};
use crate::storage::connection::{ConnectionSpec, Location};
use crate::storage::statement::{Statement, StatementKind};
use crate::storage::value::{NonSelect, RowHandle, RowSet, Value};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Self::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Self::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
    }
}

/// Open the database addressed by `spec`, creating the file if needed.
pub fn open(spec: &ConnectionSpec) -> Result<Connection, DriverError> {
    let conn = match spec.location() {
        Location::Memory => Connection::open_in_memory(),
        Location::File(path) => Connection::open(path),
    }
    .map_err(|e| DriverError(format!("Failed to open {spec}: {e}")))?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Parse SQL text, deriving the statement kind from its result columns.
pub fn parse(conn: &Connection, sql: &str) -> Result<Statement, DriverError> {
    let prepared = conn.prepare(sql)?;
    let kind = if prepared.column_count() > 0 {
        StatementKind::Select
    } else {
        StatementKind::NonSelect
    };
    Ok(Statement::new(kind, sql))
}

/// Run SQL with bound parameters.
pub fn run(conn: &Connection, sql: &str, params: &[Value]) -> Result<Outcome, DriverError> {
    let mut prepared = conn.prepare(sql)?;

    if prepared.column_count() > 0 {
        let columns: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = columns.len();

        let mut rows = prepared.query(params_from_iter(params.iter()))?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for i in 0..width {
                record.push(from_value_ref(row.get_ref(i)?));
            }
            values.push(record);
        }

        return Ok(Outcome::Rows(RowSet::new(columns, values)));
    }

    let changed = prepared.execute(params_from_iter(params.iter()))?;
    let is_insert = sql
        .trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("INSERT"));

    Ok(Outcome::Modified(NonSelect {
        affected_rows: i64::try_from(changed).unwrap_or(-2),
        last_row: is_insert.then(|| RowHandle(conn.last_insert_rowid())),
    }))
}
