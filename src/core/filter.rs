//! Filter expressions and projections sent to the backend
//!
//! A [`FilterExpression`] is an ordered, implicitly conjunctive list of
//! `(field, operator, value)` conditions. A [`Projection`] names the fields to
//! fetch together with pagination and sort order.

use serde_json::{Value, json};
use std::fmt;

/// Field holding the record identity on every collection
pub const ID_FIELD: &str = "id";

/// Comparison operators understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    In,
    /// Case-insensitive substring match
    ILike,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::In => "in",
            Operator::ILike => "ilike",
        }
    }

    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "=" => Some(Operator::Eq),
            ">" => Some(Operator::Gt),
            "in" => Some(Operator::In),
            "ilike" => Some(Operator::ILike),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(field, operator, value)` predicate
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Wire shape: a 3-element array
    pub fn to_value(&self) -> Value {
        json!([self.field, self.operator.as_str(), self.value])
    }
}

/// Ordered conjunction of conditions
///
/// Order has no effect on which records match, but it is kept so that the
/// encoded domain is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpression {
    conditions: Vec<FilterCondition>,
}

impl FilterExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline for listing a collection: `id > 0`
    ///
    /// The backend keeps some internal records under non-positive ids.
    pub fn positive_ids() -> Self {
        Self::new().with(FilterCondition::new(ID_FIELD, Operator::Gt, 0))
    }

    /// `id = <id>`
    pub fn by_id(id: i64) -> Self {
        Self::new().with(FilterCondition::new(ID_FIELD, Operator::Eq, id))
    }

    /// `id in [<ids>]`, kept even when `ids` is empty
    pub fn id_in(ids: &[i64]) -> Self {
        Self::new().with(FilterCondition::new(ID_FIELD, Operator::In, ids.to_vec()))
    }

    pub fn with(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn push(&mut self, condition: FilterCondition) {
        self.conditions.push(condition);
    }

    /// Add `field ilike term` unless the term is absent or empty
    pub fn with_search(mut self, field: &str, term: Option<&str>) -> Self {
        if let Some(term) = term.filter(|t| !t.is_empty()) {
            self.push(FilterCondition::new(field, Operator::ILike, term));
        }
        self
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Wire shape: an array of 3-element arrays
    pub fn to_domain(&self) -> Value {
        Value::Array(self.conditions.iter().map(FilterCondition::to_value).collect())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn from_ascending(asc: bool) -> Self {
        if asc { Direction::Asc } else { Direction::Desc }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Single-field sort order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Desc)
    }

    /// Parse an order string such as `"id desc"`; direction defaults to asc
    pub fn parse(order: &str) -> Option<Self> {
        let mut parts = order.split_whitespace();
        let field = parts.next()?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(field, direction))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_str())
    }
}

/// Fields to fetch plus pagination and sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub fields: Vec<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub sort: Option<SortOrder>,
}

impl Projection {
    pub fn fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            offset: None,
            limit: None,
            sort: None,
        }
    }

    /// Restrict to one page: offset `page * limit`
    pub fn paged(mut self, page: usize, limit: usize) -> Self {
        self.offset = Some(page.saturating_mul(limit));
        self.limit = Some(limit);
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }
}
