use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::routes::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

/// The service is live as soon as it answers; an empty catalog is reported
/// as `waiting` rather than an error because uploads arrive at runtime.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let status = state.engine.status();
    let catalog = if status.loaded {
        HealthCheck {
            status: "ready",
            detail: format!("{} products loaded", status.product_count),
        }
    } else {
        HealthCheck { status: "waiting", detail: "no nomenclature loaded yet".to_string() }
    };

    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "restock-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use restock_core::{Product, ProductId, SubstitutionEngine};

    use crate::health::health;
    use crate::routes::AppState;

    #[tokio::test]
    async fn health_reports_waiting_catalog_before_upload() {
        let engine = Arc::new(SubstitutionEngine::new());

        let (status, Json(payload)) = health(State(AppState::new(engine))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.catalog.status, "waiting");
    }

    #[tokio::test]
    async fn health_reports_loaded_product_count() {
        let engine = Arc::new(SubstitutionEngine::new());
        engine
            .load(vec![Product {
                id: ProductId(1),
                name: "Lapte".to_string(),
                market: "Food".to_string(),
                segment: "Dairy".to_string(),
                category: "Milk".to_string(),
                family: "UHT".to_string(),
                brand: "Zuzu".to_string(),
                origin: "RO".to_string(),
                price: 5.0,
            }])
            .expect("catalog loads");

        let (_, Json(payload)) = health(State(AppState::new(engine))).await;

        assert_eq!(payload.catalog.status, "ready");
        assert_eq!(payload.catalog.detail, "1 products loaded");
    }
}
