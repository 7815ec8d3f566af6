//! SQL rendering for the PostgreSQL document layout
//!
//! Each collection is a table `(id TEXT PRIMARY KEY, data JSONB NOT NULL)`.
//! Field keys and collection names are validated before they are embedded in
//! SQL; values always travel as bound parameters.

use crate::plan::{DocumentPlan, Expr};
use record_object::query_builder::{ListCursor, ListOptions, OrderBy, RelationalOperator, SortOrder};
use record_object::{StoreError, StoreResult};
use serde_json::Value;

/// A bound statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Param>,
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Quoted table name for a collection
pub fn table_name(collection: &str) -> StoreResult<String> {
    if collection.len() > 63 || !is_identifier(collection) {
        return Err(StoreError::InvalidOption(format!(
            "invalid collection name '{}'",
            collection
        )));
    }
    Ok(format!("\"{}\"", collection))
}

/// `{a,b}` path literal for a dotted key
fn path_literal(key: &str) -> StoreResult<String> {
    let segments: Vec<&str> = key.split('.').collect();
    if !segments.iter().all(|segment| is_identifier(segment)) {
        return Err(StoreError::Translation(format!("invalid field key '{}'", key)));
    }
    Ok(format!("'{{{}}}'", segments.join(",")))
}

fn json_field(key: &str) -> StoreResult<String> {
    Ok(format!("data #> {}", path_literal(key)?))
}

fn text_field(key: &str) -> StoreResult<String> {
    Ok(format!("data #>> {}", path_literal(key)?))
}

fn operator_sql(operator: RelationalOperator) -> &'static str {
    match operator {
        RelationalOperator::Eq => "=",
        RelationalOperator::Ne => "<>",
        RelationalOperator::Lt => "<",
        RelationalOperator::Lte => "<=",
        RelationalOperator::Gt => ">",
        RelationalOperator::Gte => ">=",
    }
}

fn render_expr(expr: &Expr, params: &mut Vec<Param>) -> StoreResult<String> {
    match expr {
        Expr::Compare {
            key,
            operator,
            value,
        } => {
            params.push(Param::Json(value.clone()));
            Ok(format!(
                "{} {} ${}::jsonb",
                json_field(key)?,
                operator_sql(*operator),
                params.len()
            ))
        }
        Expr::And(left, right) => Ok(format!(
            "({} AND {})",
            render_expr(left, params)?,
            render_expr(right, params)?
        )),
        Expr::Or(left, right) => Ok(format!(
            "({} OR {})",
            render_expr(left, params)?,
            render_expr(right, params)?
        )),
    }
}

fn where_clause(plan: &DocumentPlan, params: &mut Vec<Param>) -> StoreResult<String> {
    match &plan.filter {
        Some(expr) => Ok(format!(" WHERE {}", render_expr(expr, params)?)),
        None => Ok(String::new()),
    }
}

/// Sort keys, with the identifier as final tie breaker. Missing fields sort
/// last ascending and first descending.
fn order_terms(order: &[OrderBy]) -> StoreResult<String> {
    let mut terms = Vec::with_capacity(order.len() + 1);
    for order_by in order {
        let direction = match order_by.order {
            SortOrder::Asc => "ASC NULLS LAST",
            SortOrder::Desc => "DESC NULLS FIRST",
        };
        terms.push(format!("{} {}", json_field(&order_by.key)?, direction));
    }
    terms.push("id ASC".to_string());
    Ok(terms.join(", "))
}

/// Document expression for a projection; absent fields are left out
fn projection_expr(keys: &[String]) -> StoreResult<String> {
    if keys.is_empty() {
        return Ok("'{}'::jsonb".to_string());
    }
    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        rows.push(format!("('{}', {})", key, json_field(key)?));
    }
    Ok(format!(
        "(SELECT COALESCE(jsonb_object_agg(p.key, p.value), '{{}}'::jsonb) FROM (VALUES {}) AS p(key, value) WHERE p.value IS NOT NULL)",
        rows.join(", ")
    ))
}

pub fn create_table(collection: &str) -> StoreResult<String> {
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, data JSONB NOT NULL)",
        table_name(collection)?
    ))
}

pub fn drop_table(collection: &str) -> StoreResult<String> {
    Ok(format!("DROP TABLE IF EXISTS {}", table_name(collection)?))
}

pub fn upsert(collection: &str) -> StoreResult<String> {
    Ok(format!(
        "INSERT INTO {} (id, data) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data",
        table_name(collection)?
    ))
}

pub fn select_by_id(collection: &str) -> StoreResult<String> {
    Ok(format!("SELECT data FROM {} WHERE id = $1", table_name(collection)?))
}

pub fn delete_by_id(collection: &str) -> StoreResult<String> {
    Ok(format!("DELETE FROM {} WHERE id = $1", table_name(collection)?))
}

pub fn delete_all(collection: &str) -> StoreResult<String> {
    Ok(format!("DELETE FROM {}", table_name(collection)?))
}

/// Full collection read in identifier order
pub fn scan(collection: &str, options: &ListOptions) -> StoreResult<Statement> {
    let mut sql = format!("SELECT data AS doc FROM {}", table_name(collection)?);
    let mut params = Vec::new();

    match &options.cursor {
        Some(ListCursor::After(key)) => {
            sql.push_str(" WHERE id > $1");
            params.push(Param::Text(key.clone()));
        }
        Some(ListCursor::Start(key)) => {
            sql.push_str(" WHERE id >= $1");
            params.push(Param::Text(key.clone()));
        }
        None => {}
    }

    sql.push_str(" ORDER BY id ASC");
    if let Some(limit) = options.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    Ok(Statement { sql, params })
}

/// Query returning one `doc` column per row, or a single `total` for sums
pub fn select(collection: &str, plan: &DocumentPlan) -> StoreResult<Statement> {
    let table = table_name(collection)?;
    let mut params = Vec::new();
    let filter = where_clause(plan, &mut params)?;

    if let Some(field) = &plan.sum {
        let json = json_field(field)?;
        let text = text_field(field)?;
        let distinct = if plan.distinct { "DISTINCT " } else { "" };
        let sql = format!(
            "SELECT COALESCE(SUM({}CASE WHEN jsonb_typeof({}) = 'number' THEN ({})::numeric END), 0)::float8 AS total FROM {}{}",
            distinct, json, text, table, filter
        );
        return Ok(Statement { sql, params });
    }

    let document = match &plan.projection {
        Some(keys) => projection_expr(keys)?,
        None => "data".to_string(),
    };
    let order = order_terms(&plan.order)?;

    let sql = if plan.distinct {
        format!(
            "SELECT doc FROM (SELECT doc, MIN(rn) AS first_seen FROM (SELECT {} AS doc, ROW_NUMBER() OVER (ORDER BY {}) AS rn FROM {}{}) AS ranked GROUP BY doc) AS uniq ORDER BY first_seen",
            document, order, table, filter
        )
    } else {
        format!(
            "SELECT {} AS doc FROM {}{} ORDER BY {}",
            document, table, filter, order
        )
    };

    Ok(Statement { sql, params })
}
