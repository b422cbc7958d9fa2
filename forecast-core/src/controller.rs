//! HTTP surface for the forecast API.
//!
//! Each endpoint delegates one-to-one to the injected [`DataBroker`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    BrokerError, ForecastRecord,
    broker::{
        DataBroker,
        remote::{ADD_PATH, DELETE_PATH, LIST_PATH},
    },
};

pub type SharedBroker = Arc<dyn DataBroker>;

/// Errors surfaced by the API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The injected broker could not complete the call.
    #[error("Upstream broker failed: {0}")]
    Broker(#[from] BrokerError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Broker(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "forecast API request failed");
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Build the forecast API router.
pub fn router(broker: SharedBroker) -> Router {
    Router::new()
        .route(LIST_PATH, get(list_forecasts))
        .route(ADD_PATH, post(add_forecast))
        .route(DELETE_PATH, post(delete_forecast))
        .with_state(broker)
}

async fn list_forecasts(
    State(broker): State<SharedBroker>,
) -> Result<Json<Vec<ForecastRecord>>, ApiError> {
    Ok(Json(broker.list().await?))
}

async fn add_forecast(
    State(broker): State<SharedBroker>,
    Json(record): Json<ForecastRecord>,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(broker.add(record).await?))
}

async fn delete_forecast(
    State(broker): State<SharedBroker>,
    Json(id): Json<Uuid>,
) -> Result<Json<bool>, ApiError> {
    Ok(Json(broker.delete(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{broker::server::ServerDataBroker, store::ForecastStore};
    use axum::{body::Body, http::Request};
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_with(store: Arc<ForecastStore>) -> Router {
        router(Arc::new(ServerDataBroker::new(store)))
    }

    fn post_json(path: &str, body: String) -> Request<Body> {
        Request::post(path)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn record() -> ForecastRecord {
        ForecastRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 20, "Mild")
    }

    #[tokio::test]
    async fn list_returns_json_array() {
        let store = Arc::new(ForecastStore::new());
        let r = record();
        store.add(r.clone());

        let resp = app_with(store)
            .oneshot(Request::get(LIST_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::to_value(vec![r]).unwrap());
    }

    #[tokio::test]
    async fn add_returns_boolean_and_stores_record() {
        let store = Arc::new(ForecastStore::new());
        let r = record();
        let body = serde_json::to_string(&r).unwrap();

        let resp = app_with(store.clone())
            .oneshot(post_json(ADD_PATH, body.clone()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!(true));
        assert_eq!(store.list(), vec![r]);

        let resp = app_with(store.clone())
            .oneshot(post_json(ADD_PATH, body))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, serde_json::json!(false));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_takes_a_raw_id() {
        let store = Arc::new(ForecastStore::new());
        let r = record();
        store.add(r.clone());
        let body = serde_json::to_string(&r.id).unwrap();

        let resp = app_with(store.clone())
            .oneshot(post_json(DELETE_PATH, body.clone()))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, serde_json::json!(true));
        assert!(store.is_empty());

        let resp = app_with(store)
            .oneshot(post_json(DELETE_PATH, body))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, serde_json::json!(false));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_before_the_broker() {
        let store = Arc::new(ForecastStore::new());

        let resp = app_with(store.clone())
            .oneshot(post_json(ADD_PATH, "{not json".to_string()))
            .await
            .unwrap();

        assert!(resp.status().is_client_error());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn wrong_shape_is_rejected() {
        let resp = app_with(Arc::default())
            .oneshot(post_json(DELETE_PATH, r#"{"id": 1}"#.to_string()))
            .await
            .unwrap();

        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn broker_failure_maps_to_bad_gateway() {
        let err = ApiError::from(BrokerError::status(StatusCode::SERVICE_UNAVAILABLE, "down"));
        let resp = err.into_response();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("503"));
    }
}
