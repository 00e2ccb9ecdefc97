use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Collection, Filter, Store};
use crate::entities::new_id;
use crate::error::{invalid_input_error, not_found_error, Error};

/// In-process store with the backend's semantics: insertion order is kept,
/// filters compare field values as strings, patches merge top-level fields.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds records as they are, for fixtures.
    pub async fn seed(&self, collection: Collection, records: Vec<Value>) {
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().extend(records);
    }
}

fn id_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn record_id(record: &Value) -> Option<String> {
    record.get("id").and_then(id_string)
}

fn field_matches(record: &Value, field: &str, expected: &str) -> bool {
    match record.get(field) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Bool(b)) => b.to_string() == expected,
        _ => false,
    }
}

fn as_object(record: Value) -> Result<Map<String, Value>, Error> {
    match record {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_input_error("record must be a JSON object")),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self, collection: Collection, filter: Filter<'_>) -> Result<Vec<Value>, Error> {
        let collections = self.collections.read().await;

        Ok(collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.iter().all(|(f, v)| field_matches(r, f, v)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find(&self, collection: Collection, id: &str) -> Result<Option<Value>, Error> {
        let collections = self.collections.read().await;

        Ok(collections.get(&collection).and_then(|records| {
            records
                .iter()
                .find(|r| record_id(r).as_deref() == Some(id))
                .cloned()
        }))
    }

    async fn create(&self, collection: Collection, record: Value) -> Result<Value, Error> {
        let mut map = as_object(record)?;

        let id = match map.get("id") {
            Some(id) => id_string(id)
                .ok_or_else(|| invalid_input_error("id must be a string or a number"))?,
            None => {
                let id = new_id();
                map.insert("id".into(), Value::String(id.clone()));
                id
            }
        };

        let mut collections = self.collections.write().await;
        let records = collections.entry(collection).or_default();

        if records.iter().any(|r| record_id(r).as_deref() == Some(id.as_str())) {
            return Err(invalid_input_error(format!("duplicate id {}", id)));
        }

        let record = Value::Object(map);
        records.push(record.clone());

        Ok(record)
    }

    async fn replace(&self, collection: Collection, id: &str, record: Value) -> Result<Value, Error> {
        let mut map = as_object(record)?;
        map.insert("id".into(), Value::String(id.to_string()));

        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r).as_deref() == Some(id)))
            .ok_or_else(|| not_found_error(collection, id))?;

        *slot = Value::Object(map);

        Ok(slot.clone())
    }

    async fn patch(&self, collection: Collection, id: &str, fields: Value) -> Result<Value, Error> {
        let fields = as_object(fields)?;

        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r).as_deref() == Some(id)))
            .ok_or_else(|| not_found_error(collection, id))?;

        if let Value::Object(map) = &mut *slot {
            for (key, value) in fields {
                if key != "id" {
                    map.insert(key, value);
                }
            }
        }

        Ok(slot.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), Error> {
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(&collection)
            .ok_or_else(|| not_found_error(collection, id))?;

        let before = records.len();
        records.retain(|r| record_id(r).as_deref() != Some(id));

        if records.len() == before {
            return Err(not_found_error(collection, id));
        }

        Ok(())
    }
}
