use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::try_join_all;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    entities::{Account, Profile},
    error::{not_found_error, Error},
    store::{Collection, DynStore, Filter},
};

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    Ok(serde_json::from_value(value)?)
}

pub fn encode<T: Serialize>(value: &T) -> Result<Value, Error> {
    Ok(serde_json::to_value(value)?)
}

#[tracing::instrument(skip(store))]
pub async fn fetch<T: DeserializeOwned>(
    store: &DynStore,
    collection: Collection,
    id: &str,
) -> Result<T, Error> {
    fetch_optional(store, collection, id)
        .await?
        .ok_or_else(|| not_found_error(collection, id))
}

pub async fn fetch_optional<T: DeserializeOwned>(
    store: &DynStore,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, Error> {
    store.find(collection, id).await?.map(decode).transpose()
}

#[tracing::instrument(skip(store))]
pub async fn fetch_all<T: DeserializeOwned>(
    store: &DynStore,
    collection: Collection,
    filter: Filter<'_>,
) -> Result<Vec<T>, Error> {
    store
        .list(collection, filter)
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

pub async fn create<T: Serialize + DeserializeOwned>(
    store: &DynStore,
    collection: Collection,
    record: &T,
) -> Result<T, Error> {
    decode(store.create(collection, encode(record)?).await?)
}

pub async fn replace<T: Serialize + DeserializeOwned>(
    store: &DynStore,
    collection: Collection,
    id: &str,
    record: &T,
) -> Result<T, Error> {
    decode(store.replace(collection, id, encode(record)?).await?)
}

/// Fetches the distinct `ids` concurrently. Missing records are left out
/// of the map; completion order does not matter since results are keyed
/// by id.
pub async fn fetch_by_ids<T: DeserializeOwned>(
    store: &DynStore,
    collection: Collection,
    ids: impl IntoIterator<Item = &str>,
) -> Result<HashMap<String, T>, Error> {
    let unique: HashSet<&str> = ids.into_iter().collect();

    let found = try_join_all(unique.into_iter().map(|id| async move {
        let record = fetch_optional::<T>(store, collection, id).await?;
        Ok::<_, Error>(record.map(|r| (id.to_string(), r)))
    }))
    .await?;

    Ok(found.into_iter().flatten().collect())
}

pub async fn profiles_by_id(store: &DynStore) -> Result<HashMap<String, Profile>, Error> {
    let accounts: Vec<Account> = fetch_all(store, Collection::Users, &[]).await?;

    Ok(accounts
        .iter()
        .map(|a| (a.id.clone(), a.profile()))
        .collect())
}

/// One async mutex per ride request id, so that transitions on the same
/// request run one at a time.
#[derive(Default)]
pub struct RequestLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RequestLocks {
    pub async fn acquire(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // entries only referenced by the map are idle
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id.to_string()).or_default().clone()
        };

        lock.lock_owned().await
    }
}
