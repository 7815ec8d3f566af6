//! Pending query
//!
//! A mutable description of a pending read. The active record appends to it
//! through its fluent methods and replaces it after every successful run.

use super::aggregation::Aggregation;
use super::filter::{Condition, LogicalOperator};
use super::ordering::OrderBy;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    conditions: Vec<Condition>,
    order_bys: Vec<OrderBy>,
    plucks: Option<Vec<String>>,
    aggregation: Aggregation,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition
    pub fn filter(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    /// Add a sort key after the existing ones
    pub fn order(&mut self, order_by: OrderBy) -> &mut Self {
        self.order_bys.push(order_by);
        self
    }

    /// Restrict results to these fields, replacing any earlier projection
    pub fn pluck<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plucks = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn sum<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aggregation
            .set_sum(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.aggregation.set_distinct();
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn order_bys(&self) -> &[OrderBy] {
        &self.order_bys
    }

    pub fn plucks(&self) -> Option<&[String]> {
        self.plucks.as_deref()
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
            && self.order_bys.is_empty()
            && self.plucks.is_none()
            && self.aggregation.is_empty()
    }

    /// Combine the conditions left to right.
    ///
    /// `leaf` translates one condition; `join` merges the expression built so
    /// far with the next translated condition using that condition's logical
    /// operator. The first condition's operator is never consulted. Returns
    /// `None` when there are no conditions.
    pub fn fold_conditions<T, E, L, J>(&self, mut leaf: L, mut join: J) -> Result<Option<T>, E>
    where
        L: FnMut(&Condition) -> Result<T, E>,
        J: FnMut(T, LogicalOperator, T) -> T,
    {
        let mut conditions = self.conditions.iter();
        let Some(first) = conditions.next() else {
            return Ok(None);
        };

        let mut accumulated = leaf(first)?;
        for condition in conditions {
            let next = leaf(condition)?;
            accumulated = join(accumulated, condition.logical, next);
        }

        Ok(Some(accumulated))
    }
}
