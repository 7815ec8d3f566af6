//! Aggregation requests

use crate::errors::StoreError;

/// Aggregations a query can request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    sum: Option<Vec<String>>,
    distinct: bool,
}

impl Aggregation {
    pub fn set_sum(&mut self, fields: Vec<String>) {
        self.sum = Some(fields);
    }

    pub fn set_distinct(&mut self) {
        self.distinct = true;
    }

    pub fn sum_fields(&self) -> Option<&[String]> {
        self.sum.as_deref()
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.sum.is_none() && !self.distinct
    }

    /// The single field to sum. Backends sum exactly one field per query, so
    /// anything else is a translation error.
    pub fn sum_field(&self) -> Result<Option<&str>, StoreError> {
        match self.sum.as_deref() {
            None => Ok(None),
            Some([field]) => Ok(Some(field.as_str())),
            Some([]) => Err(StoreError::Translation(
                "sum requires exactly one field, got none".to_string(),
            )),
            Some(fields) => Err(StoreError::Translation(format!(
                "summing more than one field at a time is not supported: {:?}",
                fields
            ))),
        }
    }
}
