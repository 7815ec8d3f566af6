//! In-memory search client
//!
//! Keeps values in process and answers searches by parsing the query string
//! the adapter renders, so translation is exercised end to end without the
//! hosted service. Understands the subset [`lucene`](crate::lucene) emits.

use crate::client::SearchClient;
use crate::lucene::MATCH_ALL;
use async_trait::async_trait;
use record_object::query_builder::ListCursor;
use record_object::value::{compare, compare_fields, field};
use record_object::{StoreError, StoreResult};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Parsed query clause
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    All,
    Term { key: String, value: Value },
    AtLeast { key: String, value: Value },
    And(Box<Clause>, Box<Clause>),
    Or(Box<Clause>, Box<Clause>),
}

impl Clause {
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Clause::All => true,
            Clause::Term { key, value } => {
                field(document, key).is_some_and(|actual| compare(actual, value) == Ordering::Equal)
            }
            Clause::AtLeast { key, value } => {
                field(document, key).is_some_and(|actual| compare(actual, value) != Ordering::Less)
            }
            Clause::And(left, right) => left.matches(document) && right.matches(document),
            Clause::Or(left, right) => left.matches(document) || right.matches(document),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error(&self, expected: &str) -> StoreError {
        StoreError::Translation(format!(
            "malformed search query at {}: expected {} in '{}'",
            self.pos, expected, self.input
        ))
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> StoreResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(token))
        }
    }

    fn parse(mut self) -> StoreResult<Clause> {
        let clause = self.clause()?;
        self.skip_whitespace();
        if !self.rest().is_empty() {
            return Err(self.error("end of query"));
        }
        Ok(clause)
    }

    fn clause(&mut self) -> StoreResult<Clause> {
        self.skip_whitespace();

        if self.eat("(") {
            let left = self.clause()?;
            self.skip_whitespace();
            let or = if self.eat("AND") {
                false
            } else if self.eat("OR") {
                true
            } else {
                return Err(self.error("AND or OR"));
            };
            let right = self.clause()?;
            self.skip_whitespace();
            self.expect(")")?;

            let (left, right) = (Box::new(left), Box::new(right));
            return Ok(if or {
                Clause::Or(left, right)
            } else {
                Clause::And(left, right)
            });
        }

        if self.eat(MATCH_ALL) {
            return Ok(Clause::All);
        }

        self.expect("value.")?;
        let key_length = self.rest().find(':').ok_or_else(|| self.error(":"))?;
        let key = self.rest()[..key_length].to_string();
        self.pos += key_length + 1;

        if self.eat("[") {
            let value = self.literal()?;
            self.expect(" TO *]")?;
            Ok(Clause::AtLeast { key, value })
        } else {
            let value = self.literal()?;
            Ok(Clause::Term { key, value })
        }
    }

    fn literal(&mut self) -> StoreResult<Value> {
        if self.eat("\"") {
            let mut text = String::new();
            let mut chars = self.rest().char_indices();
            while let Some((offset, c)) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some((_, escaped)) => text.push(escaped),
                        None => break,
                    },
                    '"' => {
                        self.pos += offset + 1;
                        return Ok(Value::String(text));
                    }
                    other => text.push(other),
                }
            }
            return Err(self.error("closing quote"));
        }

        let length = self
            .rest()
            .find(|c: char| c.is_whitespace() || c == ')')
            .unwrap_or(self.rest().len());
        let token = &self.rest()[..length];
        let token = token.strip_prefix('\\').unwrap_or(token);
        let value = serde_json::from_str::<Value>(token).map_err(|_| self.error("a literal"))?;
        self.pos += length;
        Ok(value)
    }
}

/// Parse a query string produced by [`render_query`](crate::lucene::render_query)
pub fn parse_query(query: &str) -> StoreResult<Clause> {
    Parser::new(query).parse()
}

/// Parse `value.year:asc,value.model:desc` into `(key, descending)` pairs
pub fn parse_sort(sort: &str) -> StoreResult<Vec<(String, bool)>> {
    sort.split(',')
        .map(|part| {
            let malformed = || StoreError::Translation(format!("malformed sort '{}'", sort));
            let (path, direction) = part.rsplit_once(':').ok_or_else(malformed)?;
            let key = path.strip_prefix("value.").ok_or_else(malformed)?;
            match direction {
                "asc" => Ok((key.to_string(), false)),
                "desc" => Ok((key.to_string(), true)),
                _ => Err(malformed()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct MemorySearchClient {
    collections: Arc<RwLock<Collections>>,
    offline: Arc<AtomicBool>,
    requests: Arc<AtomicUsize>,
}

impl MemorySearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with a connection error until reset
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Number of calls that reached the client
    pub fn request_count(&self) -> usize {
        self.requests.load(AtomicOrdering::SeqCst)
    }

    fn begin(&self) -> StoreResult<()> {
        self.requests.fetch_add(1, AtomicOrdering::SeqCst);
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Connection("search service is offline".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.begin()?;
        self.collections
            .read()
            .map_err(|_| StoreError::Backend("search collections lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.begin()?;
        self.collections
            .write()
            .map_err(|_| StoreError::Backend("search collections lock poisoned".to_string()))
    }
}

#[async_trait]
impl SearchClient for MemorySearchClient {
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|values| values.get(key))
            .cloned())
    }

    async fn put(&self, collection: &str, key: &str, value: &Value) -> StoreResult<()> {
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn put_if_absent(&self, collection: &str, key: &str, value: &Value) -> StoreResult<()> {
        let mut collections = self.write()?;
        let values = collections.entry(collection.to_string()).or_default();
        if values.contains_key(key) {
            return Err(StoreError::conflict(collection, key));
        }
        values.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn purge(&self, collection: &str, key: &str) -> StoreResult<()> {
        if let Some(values) = self.write()?.get_mut(collection) {
            values.remove(key);
        }
        Ok(())
    }

    async fn list(
        &self,
        collection: &str,
        limit: usize,
        cursor: Option<&ListCursor>,
    ) -> StoreResult<Vec<Value>> {
        let collections = self.read()?;
        let Some(values) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(values
            .iter()
            .filter(|(key, _)| match cursor {
                Some(ListCursor::After(after)) => *key > after,
                Some(ListCursor::Start(start)) => *key >= start,
                None => true,
            })
            .take(limit)
            .map(|(_, value)| value.clone())
            .collect())
    }

    async fn search(
        &self,
        collection: &str,
        query: &str,
        sort: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Value>> {
        let clause = parse_query(query)?;
        let sort_keys = sort.map(parse_sort).transpose()?.unwrap_or_default();

        let collections = self.read()?;
        let mut results: Vec<Value> = collections
            .get(collection)
            .map(|values| {
                values
                    .values()
                    .filter(|value| clause.matches(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        results.sort_by(|a, b| {
            sort_keys
                .iter()
                .map(|(key, descending)| {
                    let ordering = compare_fields(field(a, key), field(b, key));
                    if *descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        Ok(results.into_iter().skip(offset).take(limit).collect())
    }

    async fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        self.write()?.remove(collection);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.begin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_query() {
        let clause =
            parse_query("((value.year:2010 AND value.model:\"panamera\") OR value.safety_rating:[4 TO *])")
                .unwrap();

        let expected = Clause::Or(
            Box::new(Clause::And(
                Box::new(Clause::Term {
                    key: "year".to_string(),
                    value: json!(2010),
                }),
                Box::new(Clause::Term {
                    key: "model".to_string(),
                    value: json!("panamera"),
                }),
            )),
            Box::new(Clause::AtLeast {
                key: "safety_rating".to_string(),
                value: json!(4),
            }),
        );
        assert_eq!(clause, expected);
    }

    #[test]
    fn test_parse_match_all_and_escapes() {
        assert_eq!(parse_query("*").unwrap(), Clause::All);
        assert_eq!(
            parse_query(r#"value.make:"say \"hi\"""#).unwrap(),
            Clause::Term {
                key: "make".to_string(),
                value: json!("say \"hi\""),
            }
        );
    }

    #[test]
    fn test_parse_escaped_negative_number() {
        assert_eq!(
            parse_query(r"value.year:\-5").unwrap(),
            Clause::Term {
                key: "year".to_string(),
                value: json!(-5),
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_query("year:2010").is_err());
        assert!(parse_query("(value.year:2010 XOR value.year:2014)").is_err());
        assert!(parse_query("value.year:2010 trailing").is_err());
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            parse_sort("value.year:asc,value.model:desc").unwrap(),
            vec![("year".to_string(), false), ("model".to_string(), true)]
        );
        assert!(parse_sort("year:up").is_err());
    }

    #[test]
    fn test_clause_matching() {
        let document = json!({"year": 2014, "model": "model s"});
        let at_least = Clause::AtLeast {
            key: "year".to_string(),
            value: json!(2014),
        };
        assert!(at_least.matches(&document));
        assert!(!at_least.matches(&json!({"model": "sprite"})));
    }

    #[tokio::test]
    async fn test_put_if_absent_conflicts() {
        let client = MemorySearchClient::new();
        let value = json!({"id": "1"});

        client.put_if_absent("automobiles", "1", &value).await.unwrap();
        let err = client
            .put_if_absent("automobiles", "1", &value)
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        client.put("automobiles", "1", &value).await.unwrap();
    }
}
