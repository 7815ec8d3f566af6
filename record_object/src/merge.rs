//! Sparse document merge for partial updates
//!
//! A patch source is a full model instance where only the fields to change
//! are set. Blank source values (empty string, zero, false, null, empty
//! collections) mean "leave as is"; fields listed in `clear` are reset to the
//! zero value of their current type instead.

use crate::traits::ID_FIELD;
use crate::value::{field_mut, is_blank, zero_like};
use serde_json::{Map, Value};

/// Timestamp keys are managed by the save path and never patched
const MANAGED: &[&str] = &[ID_FIELD, "created_at", "updated_at"];

/// Merge `source` into `target` in place
pub fn merge_sparse(target: &mut Value, source: &Value, clear: &[&str]) {
    if let (Some(target), Some(source)) = (target.as_object_mut(), source.as_object()) {
        merge_object(target, source, true);
    }

    for key in clear {
        if MANAGED.contains(key) {
            continue;
        }
        if let Some(existing) = field_mut(target, key) {
            *existing = zero_like(existing);
        }
    }
}

fn merge_object(target: &mut Map<String, Value>, source: &Map<String, Value>, top_level: bool) {
    for (key, value) in source {
        if top_level && MANAGED.contains(&key.as_str()) {
            continue;
        }
        if is_blank(value) {
            continue;
        }

        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                merge_object(existing, nested, false);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
