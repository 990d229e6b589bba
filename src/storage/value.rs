//! SQL values and result rows.

use crate::error::ClipstashError;

/// A single SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// How a driver spells the NULL literal when rendering SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullLiteral {
    /// The bare keyword `NULL`.
    Keyword,
    /// The quoted string `'NULL'`, as produced by the legacy driver.
    Quoted,
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Render this value as an SQL literal.
    ///
    /// Text is single-quoted with embedded quotes doubled. Text equal to
    /// `NULL` is split into a concatenation so it never reads as the quoted
    /// null literal.
    #[must_use]
    pub fn to_sql_literal(&self, null: NullLiteral) -> String {
        match self {
            Self::Null => match null {
                NullLiteral::Keyword => "NULL".to_string(),
                NullLiteral::Quoted => "'NULL'".to_string(),
            },
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => format!("{r:?}"),
            Self::Text(t) if t == "NULL" => "('NUL' || 'L')".to_string(),
            Self::Text(t) => format!("'{}'", t.replace('\'', "''")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Integer(i64::from(b))
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Self::Real(r)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A borrowed row whose values are addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    #[must_use]
    pub const fn new(columns: &'a [String], values: &'a [Value]) -> Self {
        Self { columns, values }
    }

    /// Value of the named field, if the row has such a column.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == field)
            .and_then(|i| self.values.get(i))
    }

    /// Integer value of a required field.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::Database` if the field is missing or not an integer.
    pub fn integer(&self, field: &str) -> Result<i64, ClipstashError> {
        self.get(field)
            .and_then(Value::as_i64)
            .ok_or_else(|| ClipstashError::Database(format!("Column {field} is not an integer")))
    }

    /// Text value of a required field.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::Database` if the field is missing or not text.
    pub fn text(&self, field: &str) -> Result<&'a str, ClipstashError> {
        self.get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| ClipstashError::Database(format!("Column {field} is not text")))
    }

    /// Text value of a nullable field.
    ///
    /// # Errors
    ///
    /// Returns `ClipstashError::Database` if the field is missing or holds a
    /// non-text value.
    pub fn optional_text(&self, field: &str) -> Result<Option<&'a str>, ClipstashError> {
        match self.get(field) {
            Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s)),
            _ => Err(ClipstashError::Database(format!(
                "Column {field} is not nullable text"
            ))),
        }
    }
}

/// The rows returned by a select statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the rows.
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row::new(&self.columns, values))
    }

    /// First row, if any.
    #[must_use]
    pub fn first(&self) -> Option<Row<'_>> {
        self.rows.first().map(|values| Row::new(&self.columns, values))
    }

    /// Split into column names and owned row values.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

/// Opaque handle of the last row touched by a non-select statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHandle(pub i64);

/// Result of a non-select statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonSelect {
    /// Number of rows changed, or `-2` when the driver does not report it.
    pub affected_rows: i64,
    pub last_row: Option<RowHandle>,
}
