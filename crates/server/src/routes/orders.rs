//! Order lookup endpoint.

use axum::Json;
use axum::extract::{Path, State};

use orderline_core::wire;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/order/{id}
///
/// Returns the wire form of the order, or the uniform error body with
/// 404 (unknown id), 400 (malformed id) or 500 (anything else).
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<wire::Order>, ApiError> {
    let order = state.service().get_order(&id).await?;
    Ok(Json(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::cache::OrderCache;
    use crate::routes;
    use crate::service::OrderService;
    use crate::state::AppState;
    use crate::testing::{InMemoryStore, full_order, wire_order};

    /// Router over an in-memory store; the pool is lazy and never connected.
    fn test_app(store: Arc<InMemoryStore>) -> axum::Router {
        let cache = OrderCache::new(store.clone(), 1000);
        let service = Arc::new(OrderService::new(store, cache));
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/orderline_test")
            .unwrap();
        routes::routes().with_state(AppState::new(service, pool))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_known_order_returns_wire_body() {
        let store = Arc::new(InMemoryStore::default());
        let full = full_order(1);
        store.seed(full.clone());
        let app = test_app(store);

        let uri = format!("/api/order/{}", full.order.id);
        let (status, body) = get(app, &uri).await;
        assert_eq!(status, StatusCode::OK);

        let expected = serde_json::to_value(wire_order(1)).unwrap();
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_unknown_order_is_404_with_error_body() {
        let app = test_app(Arc::new(InMemoryStore::default()));

        let (status, body) = get(app, "/api/order/6ba7b810-9dad-11d1-80b4-00c04fd430c8").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "order not found");
    }

    #[tokio::test]
    async fn test_malformed_id_is_400() {
        let app = test_app(Arc::new(InMemoryStore::default()));

        let (status, body) = get(app, "/api/order/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_store_failure_is_500_with_generic_message() {
        let store = Arc::new(InMemoryStore::default());
        store.fail_reads(true);
        let app = test_app(store);

        let (status, body) = get(app, "/api/order/6ba7b810-9dad-11d1-80b4-00c04fd430c8").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "something went wrong, try again later");
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let app = test_app(Arc::new(InMemoryStore::default()));
        let (status, _) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
