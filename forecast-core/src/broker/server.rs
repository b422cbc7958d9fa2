use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{BrokerError, ForecastRecord, store::ForecastStore};

use super::DataBroker;

/// Broker that talks straight to an in-process [`ForecastStore`].
///
/// Used by the API host itself; it never fails.
#[derive(Debug, Clone)]
pub struct ServerDataBroker {
    store: Arc<ForecastStore>,
}

impl ServerDataBroker {
    pub fn new(store: Arc<ForecastStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DataBroker for ServerDataBroker {
    async fn add(&self, record: ForecastRecord) -> Result<bool, BrokerError> {
        let id = record.id;
        let added = self.store.add(record);
        tracing::info!(%id, added, "add forecast");
        Ok(added)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BrokerError> {
        let deleted = self.store.delete(id);
        tracing::info!(%id, deleted, "delete forecast");
        Ok(deleted)
    }

    async fn list(&self) -> Result<Vec<ForecastRecord>, BrokerError> {
        Ok(self.store.list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn broker() -> ServerDataBroker {
        ServerDataBroker::new(Arc::new(ForecastStore::new()))
    }

    #[tokio::test]
    async fn add_list_delete_scenario() {
        let broker = broker();
        let record = ForecastRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 20, "Mild");

        assert!(broker.add(record.clone()).await.unwrap());
        assert_eq!(broker.list().await.unwrap(), vec![record.clone()]);
        assert!(broker.delete(record.id).await.unwrap());
        assert!(broker.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_on_empty_store() {
        let broker = broker();

        assert!(!broker.delete(Uuid::new_v4()).await.unwrap());
        assert!(broker.list().await.unwrap().is_empty());
    }
}
