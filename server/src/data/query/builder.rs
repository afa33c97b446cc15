//! Filtered query builder
//!
//! Builds a single parameterized SELECT from an ordered set of optional
//! filters. Identifiers (table, columns, sort key) come from the static
//! operation table only; every value goes through a `?` placeholder.

use crate::data::error::DataError;

/// How a filter value is compared against its column(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// `col = ?`
    Exact(&'static str),
    /// `col LIKE ?` with the value wrapped as `%value%`
    Contains(&'static str),
    /// `(a = ? OR b = ?)`, same value bound to both
    ExactEitherOf(&'static str, &'static str),
}

impl Matcher {
    /// Append this matcher's predicate to `clauses` and its values to `params`
    fn push(&self, value: &str, clauses: &mut Vec<String>, params: &mut Vec<BindValue>) {
        match *self {
            Matcher::Exact(col) => {
                clauses.push(format!("{} = ?", col));
                params.push(BindValue::Text(value.to_string()));
            }
            Matcher::Contains(col) => {
                clauses.push(format!("{} LIKE ?", col));
                params.push(BindValue::Text(format!("%{}%", value)));
            }
            Matcher::ExactEitherOf(a, b) => {
                clauses.push(format!("({} = ? OR {} = ?)", a, b));
                params.push(BindValue::Text(value.to_string()));
                params.push(BindValue::Text(value.to_string()));
            }
        }
    }
}

/// Ordered filter criteria. Entries without a value are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    entries: Vec<(Matcher, Option<String>)>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, matcher: Matcher, value: Option<impl Into<String>>) -> Self {
        self.push(matcher, value.map(Into::into));
        self
    }

    pub fn push(&mut self, matcher: Matcher, value: Option<String>) {
        self.entries.push((matcher, value));
    }

    /// Entries whose value is present and not blank, in declaration order
    pub fn supplied(&self) -> impl Iterator<Item = (&Matcher, &str)> {
        self.entries.iter().filter_map(|(matcher, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (matcher, v))
        })
    }
}

/// A bound query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Integer(i64),
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        BindValue::Integer(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Fixed sort key declared by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: OrderDirection::Asc,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: OrderDirection::Desc,
        }
    }
}

/// Query template plus its positional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    sql: String,
    params: Vec<BindValue>,
}

impl QueryPlan {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[BindValue] {
        &self.params
    }
}

/// Build a bounded SELECT over `table`.
///
/// `columns` empty selects `*`. Supplied filters are ANDed in declaration
/// order; the limit is always the last parameter.
pub fn build(
    table: &'static str,
    columns: &'static [&'static str],
    filters: &FilterSpec,
    limit: i64,
    order_by: Option<OrderBy>,
) -> Result<QueryPlan, DataError> {
    if limit <= 0 {
        return Err(DataError::InvalidInput(format!(
            "limit must be a positive integer, got {}",
            limit
        )));
    }

    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };

    let mut sql = format!("SELECT {} FROM {}", projection, table);
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    for (matcher, value) in filters.supplied() {
        matcher.push(value, &mut clauses, &mut params);
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    if let Some(order) = order_by {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            order.column,
            order.direction.as_sql()
        ));
    }

    sql.push_str(" LIMIT ?");
    params.push(BindValue::Integer(limit));

    tracing::trace!(sql = %sql, params = params.len(), "Built query plan");
    Ok(QueryPlan { sql, params })
}
