//! Prepared statements and a small SQL builder.
//!
//! Statements carry positional `?` parameters. A driver either binds them
//! (modern) or renders them inline as literals (legacy); see
//! [`Statement::render`].

use super::value::{NullLiteral, Value};

/// Whether a statement produces rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    NonSelect,
}

/// A statement ready to hand to a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    #[must_use]
    pub fn new(kind: StatementKind, sql: impl Into<String>) -> Self {
        Self {
            kind,
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Render the statement as plain SQL text with every parameter inlined.
    ///
    /// Placeholders inside quoted literals are left alone. Placeholders
    /// without a matching parameter are kept as `?`.
    #[must_use]
    pub fn render(&self, null: NullLiteral) -> String {
        let mut out = String::with_capacity(self.sql.len());
        let mut params = self.params.iter();
        let mut in_literal = false;

        for c in self.sql.chars() {
            match c {
                '\'' => {
                    in_literal = !in_literal;
                    out.push(c);
                }
                '?' if !in_literal => match params.next() {
                    Some(value) => out.push_str(&value.to_sql_literal(null)),
                    None => out.push(c),
                },
                _ => out.push(c),
            }
        }

        out
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Equals(String, Value),
    Contains(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

/// Builder for the handful of statement shapes the entry store needs.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    operation: Operation,
    table: String,
    columns: Vec<String>,
    values: Vec<(String, Value)>,
    conditions: Vec<Condition>,
    order_by: Option<(String, bool)>,
    limit: Option<usize>,
}

impl SqlBuilder {
    fn new(operation: Operation, table: &str) -> Self {
        Self {
            operation,
            table: table.to_string(),
            columns: Vec::new(),
            values: Vec::new(),
            conditions: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn select(table: &str) -> Self {
        Self::new(Operation::Select, table)
    }

    #[must_use]
    pub fn insert(table: &str) -> Self {
        Self::new(Operation::Insert, table)
    }

    #[must_use]
    pub fn update(table: &str) -> Self {
        Self::new(Operation::Update, table)
    }

    #[must_use]
    pub fn delete(table: &str) -> Self {
        Self::new(Operation::Delete, table)
    }

    /// Add a selected column.
    #[must_use]
    pub fn field(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    /// Add a column value for insert/update.
    #[must_use]
    pub fn value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.push((column.to_string(), value.into()));
        self
    }

    /// Require `column = value` (or `column IS NULL` for a null value).
    #[must_use]
    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Equals(column.to_string(), value.into()));
        self
    }

    /// Require `column` to contain `needle` as a substring.
    #[must_use]
    pub fn where_contains(mut self, column: &str, needle: &str) -> Self {
        self.conditions
            .push(Condition::Contains(column.to_string(), needle.to_string()));
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: &str, descending: bool) -> Self {
        self.order_by = Some((column.to_string(), descending));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the statement.
    #[must_use]
    pub fn build(self) -> Statement {
        let mut params = Vec::new();
        let mut sql = match self.operation {
            Operation::Select => {
                let columns = if self.columns.is_empty() {
                    "*".to_string()
                } else {
                    self.columns.join(", ")
                };
                format!("SELECT {columns} FROM {}", self.table)
            }
            Operation::Insert => {
                let (columns, values): (Vec<_>, Vec<_>) = self.values.into_iter().unzip();
                let placeholders = vec!["?"; columns.len()].join(", ");
                params.extend(values);
                format!(
                    "INSERT INTO {} ({}) VALUES ({placeholders})",
                    self.table,
                    columns.join(", ")
                )
            }
            Operation::Update => {
                let assignments = self
                    .values
                    .into_iter()
                    .map(|(column, value)| {
                        params.push(value);
                        format!("{column} = ?")
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("UPDATE {} SET {assignments}", self.table)
            }
            Operation::Delete => format!("DELETE FROM {}", self.table),
        };

        if !self.conditions.is_empty() {
            let clauses = self
                .conditions
                .into_iter()
                .map(|condition| match condition {
                    Condition::Equals(column, Value::Null) => format!("{column} IS NULL"),
                    Condition::Equals(column, value) => {
                        params.push(value);
                        format!("{column} = ?")
                    }
                    Condition::Contains(column, needle) => {
                        params.push(Value::Text(format!("%{}%", escape_like(&needle))));
                        format!("{column} LIKE ? ESCAPE '\\'")
                    }
                })
                .collect::<Vec<_>>()
                .join(" AND ");
            sql.push_str(" WHERE ");
            sql.push_str(&clauses);
        }

        if let Some((column, descending)) = self.order_by {
            sql.push_str(&format!(
                " ORDER BY {column} {}",
                if descending { "DESC" } else { "ASC" }
            ));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let kind = if self.operation == Operation::Select {
            StatementKind::Select
        } else {
            StatementKind::NonSelect
        };

        Statement::new(kind, sql).with_params(params)
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
