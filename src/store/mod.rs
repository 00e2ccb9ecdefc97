mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Vehicles,
    Destinations,
    Rides,
    RideRequests,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Vehicles => "vehicles",
            Self::Destinations => "destinations",
            Self::Rides => "rides",
            Self::RideRequests => "ride-requests",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Field equality filter, e.g. `[("driverId", "d1")]`.
pub type Filter<'a> = &'a [(&'a str, &'a str)];

/// The backend's resource collections.
///
/// Records cross this boundary as JSON and are decoded into entities by the
/// engine, so a store never needs to know the record types.
#[async_trait]
pub trait Store {
    async fn list(&self, collection: Collection, filter: Filter<'_>) -> Result<Vec<Value>, Error>;

    /// `Ok(None)` when the record does not exist.
    async fn find(&self, collection: Collection, id: &str) -> Result<Option<Value>, Error>;

    async fn create(&self, collection: Collection, record: Value) -> Result<Value, Error>;

    async fn replace(&self, collection: Collection, id: &str, record: Value) -> Result<Value, Error>;

    /// Merges `fields` into the stored record and returns the result.
    async fn patch(&self, collection: Collection, id: &str, fields: Value) -> Result<Value, Error>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), Error>;
}

pub type DynStore = std::sync::Arc<dyn Store + Send + Sync>;
