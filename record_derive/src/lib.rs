//! Procedural macros for ActiveHaus records
//!
//! `#[derive(Record)]` implements `activehaus::record_object::Model` for a struct with a
//! `String` identifier and an embedded `Timestamps` value.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod generation;
mod parsing;

use generation::generate_model_impl;
use parsing::parse_record;

/// Derive macro for the Model trait
///
/// ```rust,ignore
/// use activehaus::prelude::*;
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize, Record)]
/// #[record(generate_id)]
/// pub struct Automobile {
///     #[record(id)]
///     #[serde(default)]
///     pub id: String,
///
///     #[record(timestamps)]
///     #[serde(flatten)]
///     pub timestamps: Timestamps,
///
///     #[record(required)]
///     #[serde(default)]
///     pub year: i32,
/// }
/// ```
///
/// Container options:
/// - `name = "..."` overrides the collection name
/// - `generate_id` assigns a random identifier before the first save when none is set
/// - `before_save` / `after_save` dispatch to the type's own hook implementations
/// - `validate_with = "path::to::fn"` runs `fn(&Self, &mut Validation)` after the required checks
///
/// Without `#[record(id)]` the field named `id` is used; without
/// `#[record(timestamps)]` the field named `timestamps`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let record = match parse_record(&input) {
        Ok(record) => record,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_model_impl(&input, &record))
}
