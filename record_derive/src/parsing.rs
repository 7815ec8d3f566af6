//! Parsing of `#[record(...)]` container and field attributes

use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Path, Result};

#[derive(Default)]
pub struct RecordInfo {
    pub name: Option<String>,
    pub generate_id: bool,
    pub before_save: bool,
    pub after_save: bool,
    pub validate_with: Option<Path>,
    pub id_field: Option<Ident>,
    pub timestamps_field: Option<Ident>,
    pub required_fields: Vec<Ident>,
}

pub fn parse_record(input: &DeriveInput) -> Result<RecordInfo> {
    let mut info = RecordInfo::default();
    parse_container_attributes(&input.attrs, &mut info)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ))
        }
    };

    let mut fallback_id = None;
    let mut fallback_timestamps = None;

    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        match ident.to_string().as_str() {
            "id" => fallback_id = Some(ident.clone()),
            "timestamps" => fallback_timestamps = Some(ident.clone()),
            _ => {}
        }

        for attr in record_attributes(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    set_once(&mut info.id_field, ident.clone(), &meta.path, "id")
                } else if meta.path.is_ident("timestamps") {
                    set_once(&mut info.timestamps_field, ident.clone(), &meta.path, "timestamps")
                } else if meta.path.is_ident("required") {
                    info.required_fields.push(ident.clone());
                    Ok(())
                } else {
                    Err(meta.error("unknown record field option, expected `id`, `timestamps` or `required`"))
                }
            })?;
        }
    }

    info.id_field = info.id_field.or(fallback_id);
    info.timestamps_field = info.timestamps_field.or(fallback_timestamps);

    if info.id_field.is_none() {
        return Err(Error::new_spanned(
            &input.ident,
            "no identifier field: add a `id: String` field or mark one with #[record(id)]",
        ));
    }
    if info.timestamps_field.is_none() {
        return Err(Error::new_spanned(
            &input.ident,
            "no timestamps field: add a `timestamps: Timestamps` field or mark one with #[record(timestamps)]",
        ));
    }

    Ok(info)
}

fn record_attributes(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("record"))
}

fn parse_container_attributes(attrs: &[Attribute], info: &mut RecordInfo) -> Result<()> {
    for attr in record_attributes(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                validate_collection_name(&value.value())
                    .map_err(|e| Error::new(value.span(), e))?;
                info.name = Some(value.value());
            } else if meta.path.is_ident("generate_id") {
                info.generate_id = true;
            } else if meta.path.is_ident("before_save") {
                info.before_save = true;
            } else if meta.path.is_ident("after_save") {
                info.after_save = true;
            } else if meta.path.is_ident("validate_with") {
                let value: LitStr = meta.value()?.parse()?;
                info.validate_with = Some(value.parse()?);
            } else {
                return Err(meta.error(
                    "unknown record option, expected `name`, `generate_id`, `before_save`, `after_save` or `validate_with`",
                ));
            }
            Ok(())
        })?;

        if info.generate_id && info.before_save {
            return Err(Error::new_spanned(
                attr,
                "`generate_id` and `before_save` cannot be combined: assign the identifier in your own before_save hook",
            ));
        }
    }
    Ok(())
}

fn set_once(slot: &mut Option<Ident>, ident: Ident, path: &Path, option: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::new_spanned(
            path,
            format!("#[record({})] can only be used on one field", option),
        ));
    }
    *slot = Some(ident);
    Ok(())
}

/// Collection names become table names and URL segments
fn validate_collection_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("collection name cannot be empty".to_string());
    }

    if name.len() > 63 {
        return Err(format!(
            "collection name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "collection name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "collection name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "collection name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed",
            name
        ));
    }

    Ok(())
}
