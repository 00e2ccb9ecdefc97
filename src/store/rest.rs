use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::{Collection, Filter, Store};
use crate::error::{invalid_input_error, not_found_error, upstream_error, Error};

/// Talks to the json-server style backend over HTTP.
#[derive(Clone, Debug)]
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, collection: Collection, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, collection.path(), id),
            None => format!("{}/{}", self.base_url, collection.path()),
        }
    }

    #[tracing::instrument(skip(self, request))]
    async fn send(&self, collection: Collection, id: &str, request: RequestBuilder) -> Result<Response, Error> {
        let res = request.send().await?;
        let status_code = res.status();

        if status_code == StatusCode::NOT_FOUND {
            return Err(not_found_error(collection, id));
        } else if status_code.is_client_error() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(%status_code, %body, "backend refused request");
            return Err(invalid_input_error(format!(
                "backend refused request ({})",
                status_code
            )));
        } else if !status_code.is_success() {
            tracing::warn!(%status_code, "backend failed");
            return Err(upstream_error());
        }

        Ok(res)
    }
}

#[async_trait]
impl Store for RestStore {
    async fn list(&self, collection: Collection, filter: Filter<'_>) -> Result<Vec<Value>, Error> {
        let request = self.client.get(self.url(collection, None)).query(filter);
        let res = self.send(collection, "", request).await?;

        Ok(res.json().await?)
    }

    async fn find(&self, collection: Collection, id: &str) -> Result<Option<Value>, Error> {
        let request = self.client.get(self.url(collection, Some(id)));

        match self.send(collection, id, request).await {
            Ok(res) => Ok(Some(res.json().await?)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create(&self, collection: Collection, record: Value) -> Result<Value, Error> {
        let request = self.client.post(self.url(collection, None)).json(&record);
        let res = self.send(collection, "", request).await?;

        Ok(res.json().await?)
    }

    async fn replace(&self, collection: Collection, id: &str, record: Value) -> Result<Value, Error> {
        let request = self.client.put(self.url(collection, Some(id))).json(&record);
        let res = self.send(collection, id, request).await?;

        Ok(res.json().await?)
    }

    async fn patch(&self, collection: Collection, id: &str, fields: Value) -> Result<Value, Error> {
        let request = self.client.patch(self.url(collection, Some(id))).json(&fields);
        let res = self.send(collection, id, request).await?;

        Ok(res.json().await?)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), Error> {
        let request = self.client.delete(self.url(collection, Some(id)));
        self.send(collection, id, request).await?;

        Ok(())
    }
}
