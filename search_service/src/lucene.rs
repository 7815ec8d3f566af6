//! Lucene query-string translation
//!
//! Stored values live under the `value.` namespace of the search index, so a
//! condition on `year` renders as `value.year:2010`. GTE becomes an
//! open-ended inclusive range, `value.year:[2010 TO *]`.

use record_object::query_builder::{Condition, LogicalOperator, OrderBy, Query, RelationalOperator};
use record_object::{StoreError, StoreResult};
use serde_json::Value;

/// Query matching every document
pub const MATCH_ALL: &str = "*";

fn field_path(key: &str) -> StoreResult<String> {
    let valid = key.split('.').all(|segment| {
        !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if !valid {
        return Err(StoreError::Translation(format!("invalid field key '{}'", key)));
    }
    Ok(format!("value.{}", key))
}

/// Escape and quote a string term
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn render_term(key: &str, value: &Value) -> StoreResult<String> {
    match value {
        Value::String(text) => Ok(quote(text)),
        // a bare leading '-' is the prohibit operator
        Value::Number(number) => {
            let text = number.to_string();
            Ok(match text.strip_prefix('-') {
                Some(magnitude) => format!("\\-{}", magnitude),
                None => text,
            })
        }
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(StoreError::Translation(format!(
            "cannot search {} for a {} value",
            key,
            match other {
                Value::Null => "null",
                Value::Array(_) => "list",
                _ => "object",
            }
        ))),
    }
}

pub fn render_condition(condition: &Condition) -> StoreResult<String> {
    let path = field_path(&condition.key)?;
    let term = render_term(&condition.key, &condition.value)?;
    match condition.operator {
        RelationalOperator::Eq => Ok(format!("{}:{}", path, term)),
        RelationalOperator::Gte => Ok(format!("{}:[{} TO *]", path, term)),
        other => Err(StoreError::Translation(format!(
            "unsupported operator {} on {}: the search service supports only EQ and GTE",
            other, condition.key
        ))),
    }
}

fn join(accumulated: String, logical: LogicalOperator, next: String) -> String {
    format!("({} {} {})", accumulated, logical.as_str(), next)
}

/// Render every condition, failing on the first one the service cannot express
pub fn render_query(query: &Query) -> StoreResult<String> {
    Ok(query
        .fold_conditions(render_condition, join)?
        .unwrap_or_else(|| MATCH_ALL.to_string()))
}

/// `value.year:asc,value.model:desc`, or `None` without sort keys
pub fn render_sort(order_bys: &[OrderBy]) -> StoreResult<Option<String>> {
    if order_bys.is_empty() {
        return Ok(None);
    }
    let mut parts = Vec::with_capacity(order_bys.len());
    for order_by in order_bys {
        parts.push(format!("{}:{}", field_path(&order_by.key)?, order_by.order.as_str()));
    }
    Ok(Some(parts.join(",")))
}
