//! Query model tests

use crate::errors::StoreError;
use crate::query_builder::{
    Condition, ListCursor, ListOptions, LogicalOperator, OrderBy, Query, RelationalOperator,
    SortOrder,
};
use serde_json::json;

fn render(query: &Query) -> Option<String> {
    query
        .fold_conditions::<_, StoreError, _, _>(
            |c| Ok(format!("{} {} {}", c.key, c.operator, c.value)),
            |acc, op, next| format!("({} {} {})", acc, op.as_str(), next),
        )
        .unwrap()
}

#[test]
fn test_new_query_is_empty() {
    let query = Query::new();
    assert!(query.is_empty());
    assert!(query.conditions().is_empty());
    assert!(query.plucks().is_none());
    assert!(query.aggregation().sum_fields().is_none());
}

#[test]
fn test_condition_defaults_to_and() {
    let condition = Condition::eq("year", 2010);
    assert_eq!(condition.logical, LogicalOperator::And);
    assert_eq!(condition.operator, RelationalOperator::Eq);
    assert_eq!(condition.value, json!(2010));

    assert_eq!(condition.or().logical, LogicalOperator::Or);
}

#[test]
fn test_fold_conditions_left_to_right() {
    let mut query = Query::new();
    query
        .filter(Condition::eq("year", 1960))
        .filter(Condition::eq("model", "sprite"))
        .filter(Condition::gte("safety_rating", 3).or());

    assert_eq!(
        render(&query).as_deref(),
        Some(r#"((year EQ 1960 AND model EQ "sprite") OR safety_rating GTE 3)"#)
    );
}

#[test]
fn test_first_condition_logical_operator_is_ignored() {
    let mut query = Query::new();
    query.filter(Condition::eq("year", 1960).or());

    assert_eq!(render(&query).as_deref(), Some("year EQ 1960"));
}

#[test]
fn test_fold_without_conditions() {
    assert_eq!(render(&Query::new()), None);
}

#[test]
fn test_fold_stops_at_first_leaf_error() {
    let mut query = Query::new();
    query
        .filter(Condition::eq("year", 1960))
        .filter(Condition::ne("model", "sprite"))
        .filter(Condition::lt("year", 2000));

    let mut visited = Vec::new();
    let result = query.fold_conditions(
        |c| {
            visited.push(c.key.clone());
            match c.operator {
                RelationalOperator::Ne => Err(StoreError::Translation("unsupported operator NE".into())),
                _ => Ok(c.key.clone()),
            }
        },
        |acc, _, next| format!("{}{}", acc, next),
    );

    assert!(matches!(result, Err(StoreError::Translation(_))));
    assert_eq!(visited, vec!["year".to_string(), "model".to_string()]);
}

#[test]
fn test_order_pluck_and_aggregations() {
    let mut query = Query::new();
    query
        .order(OrderBy::asc("year"))
        .order(OrderBy::desc("model"))
        .pluck(["year", "model"])
        .distinct();

    assert_eq!(query.order_bys().len(), 2);
    assert_eq!(query.order_bys()[1].order, SortOrder::Desc);
    assert_eq!(query.plucks(), Some(&["year".to_string(), "model".to_string()][..]));
    assert!(query.aggregation().is_distinct());
    assert!(!query.is_empty());
}

#[test]
fn test_sum_single_field() {
    let mut query = Query::new();
    query.sum(["year"]);
    assert_eq!(query.aggregation().sum_field().unwrap(), Some("year"));
}

#[test]
fn test_sum_multiple_fields_is_rejected() {
    let mut query = Query::new();
    query.sum(["year", "safety_rating"]);
    let err = query.aggregation().sum_field().unwrap_err();
    assert!(matches!(err, StoreError::Translation(_)));
    assert!(err.to_string().contains("more than one field"));
}

#[test]
fn test_list_options_builder() {
    let options = ListOptions::new().limit(25).after("id3");
    assert_eq!(options.limit, Some(25));
    assert_eq!(options.cursor, Some(ListCursor::After("id3".to_string())));

    let options = ListOptions::new().start("id1");
    assert_eq!(options.limit, None);
    assert_eq!(options.cursor, Some(ListCursor::Start("id1".to_string())));
}
