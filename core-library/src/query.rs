//! Query building blocks for repository reads.
//!
//! [`Filter`] is a small predicate tree rendered into a `sqlx::QueryBuilder`.
//! Column names and expressions are `&'static str`, so only code can decide
//! what SQL text is emitted; every value is sent as a bound parameter.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

/// Value bound into a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl SqlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn push_bind(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            SqlValue::Text(s) => qb.push_bind(s.clone()),
            SqlValue::Int(i) => qb.push_bind(*i),
            SqlValue::Bool(b) => qb.push_bind(*b),
        };
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

/// Predicate tree for `WHERE` clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(&'static str, SqlValue),
    NotEq(&'static str, SqlValue),
    NotNull(&'static str),
    Like(&'static str, String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    /// Matches nothing, rendered as `1 = 2`
    AlwaysFalse,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Filter::Eq(column, value.into())
    }

    pub fn not_eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Filter::NotEq(column, value.into())
    }

    pub fn like(column: &'static str, pattern: impl Into<String>) -> Self {
        Filter::Like(column, pattern.into())
    }

    /// Appends the predicate to the builder
    pub fn push_to(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Filter::Eq(column, value) => {
                qb.push(*column).push(" = ");
                value.push_bind(qb);
            }
            Filter::NotEq(column, value) => {
                qb.push(*column).push(" <> ");
                value.push_bind(qb);
            }
            Filter::NotNull(expr) => {
                qb.push(*expr).push(" IS NOT NULL");
            }
            Filter::Like(column, pattern) => {
                qb.push(*column).push(" LIKE ").push_bind(pattern.clone());
            }
            Filter::And(filters) => push_group(qb, filters, " AND ", "1 = 1"),
            Filter::Or(filters) => push_group(qb, filters, " OR ", "1 = 2"),
            Filter::AlwaysFalse => {
                qb.push("1 = 2");
            }
        }
    }
}

fn push_group(
    qb: &mut QueryBuilder<'_, Sqlite>,
    filters: &[Filter],
    separator: &str,
    when_empty: &str,
) {
    if filters.is_empty() {
        qb.push(when_empty);
        return;
    }

    qb.push("(");
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        filter.push_to(qb);
    }
    qb.push(")");
}

/// Appends ` WHERE ...` joining the filters with `AND`; no-op when empty
pub(crate) fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, filters: Vec<Filter>) {
    if filters.is_empty() {
        return;
    }
    qb.push(" WHERE ");
    Filter::And(filters).push_to(qb);
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Options for listing queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Sort key, resolved by the repository against its own allow-list
    pub sort: String,
    pub order: SortOrder,
    /// Maximum number of rows, 0 for no limit
    pub max: u32,
    pub offset: u32,
    pub filters: Option<Filter>,
}

impl QueryOptions {
    pub fn with_sort(mut self, sort: impl Into<String>, order: SortOrder) -> Self {
        self.sort = sort.into();
        self.order = order;
        self
    }

    pub fn with_page(mut self, max: u32, offset: u32) -> Self {
        self.max = max;
        self.offset = offset;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters = Some(filter);
        self
    }
}

/// Appends `LIMIT`/`OFFSET`; a zero `max` means unlimited
pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Sqlite>, max: u32, offset: u32) {
    if max == 0 && offset == 0 {
        return;
    }
    let limit = if max == 0 { -1 } else { i64::from(max) };
    qb.push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(i64::from(offset));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(filter: &Filter) -> String {
        let mut qb = QueryBuilder::<Sqlite>::new("");
        filter.push_to(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_simple_predicates_bind_values() {
        assert_eq!(render(&Filter::eq("artist.id", "3")), "artist.id = ?");
        assert_eq!(render(&Filter::not_eq("artist.missing", true)), "artist.missing <> ?");
        assert_eq!(
            render(&Filter::like("artist.full_text", "% kraft%")),
            "artist.full_text LIKE ?"
        );
        assert_eq!(
            render(&Filter::NotNull("stats ->> '$.composer'")),
            "stats ->> '$.composer' IS NOT NULL"
        );
    }

    #[test]
    fn test_always_false() {
        assert_eq!(render(&Filter::AlwaysFalse), "1 = 2");
        assert_eq!(render(&Filter::Or(vec![])), "1 = 2");
        assert_eq!(render(&Filter::And(vec![])), "1 = 1");
    }

    #[test]
    fn test_nested_groups() {
        let filter = Filter::And(vec![
            Filter::eq("artist.missing", false),
            Filter::Or(vec![
                Filter::NotNull("stats ->> '$.composer'"),
                Filter::NotNull("stats ->> '$.producer'"),
            ]),
        ]);
        assert_eq!(
            render(&filter),
            "(artist.missing = ? AND (stats ->> '$.composer' IS NOT NULL OR stats ->> '$.producer' IS NOT NULL))"
        );
    }

    #[test]
    fn test_push_where_skips_empty() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM artist");
        push_where(&mut qb, vec![]);
        assert_eq!(qb.sql(), "SELECT * FROM artist");

        push_where(&mut qb, vec![Filter::eq("artist.id", "2")]);
        assert_eq!(qb.sql(), "SELECT * FROM artist WHERE (artist.id = ?)");
    }

    #[test]
    fn test_push_page() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT 1");
        push_page(&mut qb, 0, 0);
        assert_eq!(qb.sql(), "SELECT 1");

        push_page(&mut qb, 10, 20);
        assert_eq!(qb.sql(), "SELECT 1 LIMIT ? OFFSET ?");
    }

    #[test]
    fn test_query_options_builders() {
        let options = QueryOptions::default()
            .with_sort("name", SortOrder::Desc)
            .with_page(5, 10)
            .with_filter(Filter::eq("artist.missing", false));

        assert_eq!(options.sort, "name");
        assert_eq!(options.order, SortOrder::Desc);
        assert_eq!(options.max, 5);
        assert_eq!(options.offset, 10);
        assert_eq!(options.filters, Some(Filter::eq("artist.missing", false)));
    }
}
