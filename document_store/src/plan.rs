//! Query translation for document databases
//!
//! Conditions fold left to right into a binary expression tree, so
//! `a AND b OR c` evaluates as `(a AND b) OR c`.

use record_object::query_builder::{Condition, LogicalOperator, OrderBy, Query, RelationalOperator};
use record_object::{StoreError, StoreResult};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare {
        key: String,
        operator: RelationalOperator,
        value: Value,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn compare(condition: &Condition) -> Self {
        Expr::Compare {
            key: condition.key.clone(),
            operator: condition.operator,
            value: condition.value.clone(),
        }
    }

    fn join(left: Expr, logical: LogicalOperator, right: Expr) -> Self {
        match logical {
            LogicalOperator::And => Expr::And(Box::new(left), Box::new(right)),
            LogicalOperator::Or => Expr::Or(Box::new(left), Box::new(right)),
        }
    }

    /// Every field key referenced by the expression
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Expr::Compare { key, .. } => vec![key.as_str()],
            Expr::And(left, right) | Expr::Or(left, right) => {
                let mut keys = left.keys();
                keys.extend(right.keys());
                keys
            }
        }
    }
}

/// A query in the shape a document database executes it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPlan {
    pub filter: Option<Expr>,
    pub order: Vec<OrderBy>,
    pub projection: Option<Vec<String>>,
    pub sum: Option<String>,
    pub distinct: bool,
}

impl DocumentPlan {
    pub fn from_query(query: &Query) -> StoreResult<Self> {
        let filter = query.fold_conditions(
            |condition| Ok::<_, StoreError>(Expr::compare(condition)),
            Expr::join,
        )?;
        let sum = query.aggregation().sum_field()?.map(str::to_string);

        Ok(Self {
            filter,
            order: query.order_bys().to_vec(),
            projection: query.plucks().map(<[String]>::to_vec),
            sum,
            distinct: query.aggregation().is_distinct(),
        })
    }
}
