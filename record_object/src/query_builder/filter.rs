//! Filter conditions
//!
//! A condition compares one field against a value and names how it joins the
//! conditions before it.

use serde_json::Value;
use std::fmt;

/// Relational operators a condition can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOperator {
    Eq,  // =
    Ne,  // !=
    Lt,  // <
    Lte, // <=
    Gt,  // >
    Gte, // >=
}

impl RelationalOperator {
    pub const ALL: [RelationalOperator; 6] = [
        RelationalOperator::Eq,
        RelationalOperator::Ne,
        RelationalOperator::Lt,
        RelationalOperator::Lte,
        RelationalOperator::Gt,
        RelationalOperator::Gte,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationalOperator::Eq => "EQ",
            RelationalOperator::Ne => "NE",
            RelationalOperator::Lt => "LT",
            RelationalOperator::Lte => "LTE",
            RelationalOperator::Gt => "GT",
            RelationalOperator::Gte => "GTE",
        }
    }
}

impl fmt::Display for RelationalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a condition joins the expression accumulated before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// Single filter predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub key: String,
    pub operator: RelationalOperator,
    pub value: Value,
    /// Ignored on the first condition of a query
    pub logical: LogicalOperator,
}

impl Condition {
    pub fn new(key: &str, operator: RelationalOperator, value: impl Into<Value>) -> Self {
        Self {
            key: key.to_string(),
            operator,
            value: value.into(),
            logical: LogicalOperator::And,
        }
    }

    pub fn eq(key: &str, value: impl Into<Value>) -> Self {
        Self::new(key, RelationalOperator::Eq, value)
    }

    pub fn ne(key: &str, value: impl Into<Value>) -> Self {
        Self::new(key, RelationalOperator::Ne, value)
    }

    pub fn lt(key: &str, value: impl Into<Value>) -> Self {
        Self::new(key, RelationalOperator::Lt, value)
    }

    pub fn lte(key: &str, value: impl Into<Value>) -> Self {
        Self::new(key, RelationalOperator::Lte, value)
    }

    pub fn gt(key: &str, value: impl Into<Value>) -> Self {
        Self::new(key, RelationalOperator::Gt, value)
    }

    pub fn gte(key: &str, value: impl Into<Value>) -> Self {
        Self::new(key, RelationalOperator::Gte, value)
    }

    /// Join this condition to the previous ones with OR
    pub fn or(mut self) -> Self {
        self.logical = LogicalOperator::Or;
        self
    }

    /// Join this condition to the previous ones with AND (the default)
    pub fn and(mut self) -> Self {
        self.logical = LogicalOperator::And;
        self
    }
}
