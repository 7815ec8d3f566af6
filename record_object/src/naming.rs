//! Collection naming
//!
//! A model's collection name is its type name, pluralized and underscored:
//! `Automobile` becomes `automobiles`, `BodyStyle` becomes `body_styles`.
//! Names are computed once per type and cached.

use crate::traits::Model;
use convert_case::{Case, Casing};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
];

const UNCOUNTABLE: &[&str] = &["equipment", "information", "series", "species", "data"];

fn cache() -> &'static RwLock<HashMap<TypeId, &'static str>> {
    static NAMES: OnceLock<RwLock<HashMap<TypeId, &'static str>>> = OnceLock::new();
    NAMES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Collection name for `M`: its custom name when set, otherwise the derived one
pub fn model_name<M: Model>() -> &'static str {
    if let Some(custom) = M::custom_model_name() {
        return custom;
    }

    let type_id = TypeId::of::<M>();
    if let Some(name) = cache().read().ok().and_then(|names| names.get(&type_id).copied()) {
        return name;
    }

    let derived = underscore(&pluralize(short_type_name::<M>()));
    let mut names = match cache().write() {
        Ok(names) => names,
        Err(poisoned) => poisoned.into_inner(),
    };
    *names.entry(type_id).or_insert_with(|| {
        let leaked: &'static str = Box::leak(derived.into_boxed_str());
        leaked
    })
}

/// Last path segment of the type name, without generic arguments
fn short_type_name<M>() -> &'static str {
    let full = std::any::type_name::<M>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Plural form of the last word of `word`
pub fn pluralize(word: &str) -> String {
    let split = word
        .char_indices()
        .filter(|(i, c)| *i > 0 && (c.is_uppercase() || *c == '_' || *c == '-'))
        .map(|(i, c)| if c.is_uppercase() { i } else { i + 1 })
        .last()
        .unwrap_or(0);
    let (head, last) = word.split_at(split);
    let lower = last.to_lowercase();

    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        let mut plural = plural.to_string();
        if last.starts_with(char::is_uppercase) {
            plural = plural.to_case(Case::Pascal);
        }
        return format!("{}{}", head, plural);
    }

    let ends_with_consonant_y = lower.ends_with('y')
        && !lower[..lower.len() - 1].ends_with(&['a', 'e', 'i', 'o', 'u'][..]);
    if ends_with_consonant_y {
        format!("{}{}ies", head, &last[..last.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        format!("{}{}es", head, last)
    } else {
        format!("{}s", word)
    }
}

/// `BodyStyles` to `body_styles`
pub fn underscore(word: &str) -> String {
    word.to_case(Case::Snake)
}

/// `BodyStyles` to `body-styles`
pub fn dasherize(word: &str) -> String {
    word.to_case(Case::Kebab)
}
