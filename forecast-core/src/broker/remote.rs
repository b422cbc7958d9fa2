use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{BrokerError, ForecastRecord};

use super::DataBroker;

pub const LIST_PATH: &str = "/api/weatherforecast/list";
pub const ADD_PATH: &str = "/api/weatherforecast/add";
pub const DELETE_PATH: &str = "/api/weatherforecast/delete";

/// Broker backed by a forecast API reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteDataBroker {
    base_url: Url,
    http: Client,
}

impl RemoteDataBroker {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid forecast API base URL: {base_url}"))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    /// Send, then check the status, then decode. In that order.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BrokerError> {
        let res = request.send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "forecast API request failed");
            return Err(BrokerError::status(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DataBroker for RemoteDataBroker {
    async fn add(&self, record: ForecastRecord) -> Result<bool, BrokerError> {
        tracing::debug!(id = %record.id, "POST {ADD_PATH}");
        let request = self.http.post(self.endpoint(ADD_PATH)).json(&record);
        self.execute(request).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BrokerError> {
        tracing::debug!(%id, "POST {DELETE_PATH}");
        let request = self.http.post(self.endpoint(DELETE_PATH)).json(&id);
        self.execute(request).await
    }

    async fn list(&self) -> Result<Vec<ForecastRecord>, BrokerError> {
        tracing::debug!("GET {LIST_PATH}");
        let request = self.http.get(self.endpoint(LIST_PATH));
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_replace_base_path() {
        let broker = RemoteDataBroker::new("http://localhost:5080/ignored/").unwrap();

        assert_eq!(
            broker.endpoint(LIST_PATH).as_str(),
            "http://localhost:5080/api/weatherforecast/list"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = RemoteDataBroker::new("localhost without scheme").unwrap_err();
        assert!(err.to_string().contains("Invalid forecast API base URL"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on loopback is practically never listening.
        let broker = RemoteDataBroker::new("http://127.0.0.1:9").unwrap();
        let err = broker.list().await.unwrap_err();

        assert!(matches!(err, BrokerError::Transport(_)));
    }
}
