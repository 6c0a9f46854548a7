//! A small, store-independent description of a filtered table query.

use std::ops::RangeInclusive;

use time::Date;

/// Comparison applied by a [Filter].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

/// A literal value compared against a column.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Dates are compared as ISO 8601 strings, which sort chronologically.
impl From<Date> for FilterValue {
    fn from(value: Date) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: SortDirection,
}

/// A query against a single table.
///
/// All filters must hold for a row to be returned. `range` selects rows by
/// their zero-based position after ordering, both ends included.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    columns: Vec<String>,
    filters: Vec<Filter>,
    order: Option<Order>,
    range: Option<RangeInclusive<usize>>,
}

impl TableQuery {
    /// Select every column of `table`.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_owned(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            range: None,
        }
    }

    /// Only return `columns` instead of every column.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|column| (*column).to_owned()).collect();
        self
    }

    pub fn eq(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn gte(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lte(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    pub fn order_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.order = Some(Order {
            column: column.to_owned(),
            direction,
        });
        self
    }

    pub fn range(mut self, rows: RangeInclusive<usize>) -> Self {
        self.range = Some(rows);
        self
    }

    fn filter(mut self, column: &str, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        self.filters.push(Filter {
            column: column.to_owned(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The selected columns. Empty means every column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn row_range(&self) -> Option<&RangeInclusive<usize>> {
        self.range.as_ref()
    }
}
