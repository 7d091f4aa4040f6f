//! JSON routes for the substitution engine.
//!
//! - `POST   /load-nomenclature`        replace the catalog from nomenclature + sales rows
//! - `GET    /predict/{product_id}`     ranked substitutes for an out-of-stock product
//! - `POST   /train`                    record confirmed substitutions
//! - `GET    /nomenclature-info`        catalog status and product listing
//! - `DELETE /clear-nomenclature`       drop the loaded catalog
//! - `DELETE /feedback`                 reset confirmed-substitution feedback
//! - `GET    /search-products/{query}`  name search over the catalog

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use restock_core::{
    CatalogUpload, InterfaceError, Prediction, Product, ProductId, SearchHit, SubstitutionEngine,
    TrainingBatch,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub(crate) engine: Arc<SubstitutionEngine>,
}

impl AppState {
    pub fn new(engine: Arc<SubstitutionEngine>) -> Self {
        Self { engine }
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NomenclatureInfo {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_upload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

type ApiFailure = (StatusCode, Json<ApiError>);

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(engine: Arc<SubstitutionEngine>, allowed_origins: &[String]) -> Router {
    let state = AppState::new(engine);

    Router::new()
        .route("/load-nomenclature", post(load_nomenclature))
        .route("/predict/{product_id}", get(predict))
        .route("/train", post(train))
        .route("/nomenclature-info", get(nomenclature_info))
        .route("/clear-nomenclature", delete(clear_nomenclature))
        .route("/feedback", delete(reset_feedback))
        .route("/search-products/{query}", get(search_products))
        .route("/health", get(health::health))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(
                    event_name = "system.cors.invalid_origin",
                    origin = %origin,
                    error = %error,
                    "ignoring unparsable CORS origin"
                );
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

fn failure(error: InterfaceError) -> ApiFailure {
    let status = match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ApiError {
            error: error.message().to_string(),
            correlation_id: error.correlation_id().to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub(crate) async fn load_nomenclature(
    State(state): State<AppState>,
    Json(body): Json<CatalogUpload>,
) -> Result<Json<MessageResponse>, ApiFailure> {
    let correlation_id = correlation_id();
    let submitted_rows = body.nomenclature.len();
    let products = body.into_products();
    let product_count = products.len();

    if let Err(error) = state.engine.load(products) {
        warn!(
            event_name = "catalog.upload.rejected",
            correlation_id = %correlation_id,
            submitted_rows,
            error = %error,
            "nomenclature upload rejected"
        );
        return Err(failure(
            restock_core::ApplicationError::from(error).into_interface(correlation_id),
        ));
    }

    info!(
        event_name = "catalog.upload.loaded",
        correlation_id = %correlation_id,
        submitted_rows,
        product_count,
        "nomenclature upload loaded"
    );
    Ok(Json(MessageResponse { message: "Nomenclature + sales loaded!".to_string() }))
}

pub(crate) async fn predict(
    Path(product_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Prediction>, ApiFailure> {
    let correlation_id = correlation_id();
    let prediction = state.engine.predict(ProductId(product_id)).map_err(|error| {
        failure(restock_core::ApplicationError::from(error).into_interface(correlation_id.clone()))
    })?;

    info!(
        event_name = "engine.predict.served",
        correlation_id = %correlation_id,
        product_id,
        substitute_count = prediction.substitutes.len(),
        "prediction served"
    );
    Ok(Json(prediction))
}

pub(crate) async fn train(
    State(state): State<AppState>,
    Json(batch): Json<TrainingBatch>,
) -> Json<MessageResponse> {
    state.engine.train(&batch);
    info!(
        event_name = "feedback.train.accepted",
        correlation_id = %correlation_id(),
        product_id = %batch.product_out_id,
        entries = batch.zero_stock_data.len(),
        "training batch accepted"
    );
    Json(MessageResponse { message: format!("Trained product {}", batch.product_out_id) })
}

pub(crate) async fn nomenclature_info(State(state): State<AppState>) -> Json<NomenclatureInfo> {
    let status = state.engine.status();
    if !status.loaded {
        return Json(NomenclatureInfo {
            exists: false,
            last_upload: None,
            product_count: None,
            products: None,
        });
    }

    Json(NomenclatureInfo {
        exists: true,
        last_upload: status
            .loaded_at
            .map(|loaded_at| loaded_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        product_count: Some(status.product_count),
        products: Some(state.engine.all_products()),
    })
}

pub(crate) async fn clear_nomenclature(State(state): State<AppState>) -> Json<MessageResponse> {
    state.engine.clear();
    info!(
        event_name = "catalog.clear.requested",
        correlation_id = %correlation_id(),
        "nomenclature cleared"
    );
    Json(MessageResponse { message: "Nomenclature cleared successfully.".to_string() })
}

pub(crate) async fn reset_feedback(State(state): State<AppState>) -> Json<MessageResponse> {
    state.engine.reset_feedback();
    Json(MessageResponse { message: "Feedback reset successfully.".to_string() })
}

pub(crate) async fn search_products(
    Path(query): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>, ApiFailure> {
    let results = state.engine.search(&query).map_err(|error| {
        failure(restock_core::ApplicationError::from(error).into_interface(correlation_id()))
    })?;
    Ok(Json(SearchResponse { results }))
}
