//! JSON value helpers
//!
//! Field lookup, ordering and "blank" detection over `serde_json::Value`, shared
//! by the patch merge and the in-memory backend clients. Ordering follows
//! PostgreSQL `jsonb`: null < string < number < boolean < array < object,
//! arrays and objects by size first. Strings compare bytewise, which matches
//! the database only under the "C" collation.

use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Look up a field in a document. Dotted keys walk nested objects.
pub fn field<'a>(document: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

/// Mutable variant of [`field`]; intermediate objects must already exist
pub fn field_mut<'a>(document: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    key.split('.')
        .try_fold(document, |current, segment| current.as_object_mut()?.get_mut(segment))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values, as `jsonb` orders an extracted field.
///
/// An empty array sorts before null at this level only.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) if x.is_empty() || y.is_empty() => {
            x.len().cmp(&y.len())
        }
        (Value::Array(x), _) if x.is_empty() => Ordering::Less,
        (_, Value::Array(y)) if y.is_empty() => Ordering::Greater,
        _ => compare_nested(a, b),
    }
}

/// jsonb object key order: shorter keys first, then bytewise
fn sorted_keys(map: &Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_by(|l, r| l.len().cmp(&r.len()).then_with(|| l.cmp(r)));
    keys
}

fn compare_nested(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x.len().cmp(&y.len()).then_with(|| {
            x.iter()
                .zip(y.iter())
                .map(|(l, r)| compare_nested(l, r))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        }),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()).then_with(|| {
            sorted_keys(x)
                .into_iter()
                .zip(sorted_keys(y))
                .map(|(l, r)| {
                    l.len()
                        .cmp(&r.len())
                        .then_with(|| l.cmp(r))
                        .then_with(|| compare_nested(&x[l], &y[r]))
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        }),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Order two possibly-missing fields; a missing field sorts after every present value
pub fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => compare(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Whether a value counts as "not provided" in a sparse document
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// The zero value with the same JSON type as `value`
pub fn zero_like(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(_) => Value::String(String::new()),
        Value::Number(n) if n.is_f64() => serde_json::json!(0.0),
        Value::Number(_) => serde_json::json!(0),
        Value::Bool(_) => Value::Bool(false),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(Map::new()),
    }
}

pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// A numeric total as JSON: an integer when it has no fractional part, so it
/// decodes into integer and float types alike
pub fn number_value(total: f64) -> Value {
    if total.fract() == 0.0 && total.abs() < i64::MAX as f64 {
        Value::from(total as i64)
    } else {
        Value::from(total)
    }
}

/// Keep only the listed keys of a document, in the order given
pub fn project(document: &Value, keys: &[String]) -> Value {
    let mut projected = Map::new();
    for key in keys {
        if let Some(value) = field(document, key) {
            projected.insert(key.clone(), value.clone());
        }
    }
    Value::Object(projected)
}

/// Remove duplicates, keeping the first occurrence of each value
pub fn dedup(values: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.iter().any(|seen| compare(seen, &value) == Ordering::Equal) {
            unique.push(value);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_lookup() {
        let doc = json!({"year": 2014, "engine": {"cylinders": 6}});
        assert_eq!(field(&doc, "year"), Some(&json!(2014)));
        assert_eq!(field(&doc, "engine.cylinders"), Some(&json!(6)));
        assert_eq!(field(&doc, "engine.valves"), None);
        assert_eq!(field(&doc, "year.value"), None);
    }

    #[test]
    fn test_compare_same_type() {
        assert_eq!(compare(&json!(1960), &json!(2014)), Ordering::Less);
        assert_eq!(compare(&json!(2010), &json!(2010.0)), Ordering::Equal);
        assert_eq!(compare(&json!("sprite"), &json!("3000")), Ordering::Greater);
        assert_eq!(compare(&json!(false), &json!(true)), Ordering::Less);
    }

    #[test]
    fn test_compare_across_types_follows_jsonb() {
        assert_eq!(compare(&json!(null), &json!("a")), Ordering::Less);
        assert_eq!(compare(&json!("2014"), &json!(1960)), Ordering::Less);
        assert_eq!(compare(&json!(1), &json!(true)), Ordering::Less);
        assert_eq!(compare(&json!([1, 2, 3]), &json!([2])), Ordering::Greater);
        assert_eq!(compare(&json!([1, 2]), &json!([1, 3])), Ordering::Less);
        assert_eq!(compare(&json!({"a": 9}), &json!({"a": 1, "b": 0})), Ordering::Less);
        assert_eq!(compare(&json!({"b": 1}), &json!({"aa": 0})), Ordering::Less);
        assert_eq!(compare(&json!({"a": 2}), &json!({"a": 1})), Ordering::Greater);
    }

    #[test]
    fn test_empty_array_sorts_before_null() {
        assert_eq!(compare(&json!([]), &json!(null)), Ordering::Less);
        assert_eq!(compare(&json!("a"), &json!([])), Ordering::Greater);
        assert_eq!(compare(&json!([]), &json!([])), Ordering::Equal);
        assert_eq!(compare(&json!([[]]), &json!([null])), Ordering::Greater);
    }

    #[test]
    fn test_strings_compare_bytewise() {
        assert_eq!(compare(&json!("Zebra"), &json!("apple")), Ordering::Less);
    }

    #[test]
    fn test_number_value_prefers_integers() {
        assert_eq!(number_value(5984.0), json!(5984));
        assert_eq!(number_value(-3.0), json!(-3));
        assert_eq!(number_value(2.5), json!(2.5));
        assert_eq!(serde_json::from_value::<i64>(number_value(10.0)).unwrap(), 10);
        assert_eq!(serde_json::from_value::<f64>(number_value(10.0)).unwrap(), 10.0);
    }

    #[test]
    fn test_missing_fields_sort_last() {
        assert_eq!(compare_fields(Some(&json!(1)), None), Ordering::Less);
        assert_eq!(compare_fields(None, Some(&json!(1))), Ordering::Greater);
    }

    #[test]
    fn test_blank_values() {
        for blank in [json!(null), json!(""), json!(0), json!(0.0), json!(false), json!([]), json!({})] {
            assert!(is_blank(&blank), "{} should be blank", blank);
        }
        for present in [json!("a"), json!(1), json!(true), json!([0]), json!({"a": null})] {
            assert!(!is_blank(&present), "{} should not be blank", present);
        }
    }

    #[test]
    fn test_project_and_dedup() {
        let doc = json!({"year": 1960, "model": "sprite", "make": "austin healey"});
        let keys = vec!["year".to_string(), "missing".to_string()];
        assert_eq!(project(&doc, &keys), json!({"year": 1960}));

        let values = vec![json!({"year": 1960}), json!({"year": 2014}), json!({"year": 1960})];
        assert_eq!(dedup(values), vec![json!({"year": 1960}), json!({"year": 2014})]);
    }
}
