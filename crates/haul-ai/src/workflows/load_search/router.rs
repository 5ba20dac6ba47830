use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::catalog::PresetCatalog;
use super::domain::{AppliedFilters, AppliedPreset, FilterPreset, LoadRecord};
use super::overrides::RawOverrides;
use super::resolver::LoadSearchError;
use super::service::{LoadBoardError, LoadBoardService, LoadSource, ProfitabilityReport};
use crate::workflows::cost_model::{CostModelRepository, CostModelSettings, DriverId, RepositoryError};

/// Query keys consumed by the search endpoint itself rather than treated as overrides.
const CONFIGURATION_PARAM: &str = "configuration";
const DRIVER_PARAM: &str = "driverId";

/// Search response in the shape the load board UI consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSearchResponse {
    pub loads: Vec<LoadRecord>,
    pub total: usize,
    pub applied_configuration: Option<AppliedPreset>,
    pub filters: AppliedFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profitability: Option<ProfitabilityReport>,
}

/// Router builder exposing preset lookup, load search, and cost model endpoints.
pub fn load_board_router<C, S, R>(service: Arc<LoadBoardService<C, S, R>>) -> Router
where
    C: PresetCatalog + 'static,
    S: LoadSource + 'static,
    R: CostModelRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/configurations",
            get(list_configurations_handler::<C, S, R>),
        )
        .route(
            "/api/v1/configurations/:reference",
            get(configuration_handler::<C, S, R>),
        )
        .route("/api/v1/loads", get(search_handler::<C, S, R>))
        .route(
            "/api/v1/drivers/:driver_id/cost-model",
            get(get_cost_model_handler::<C, S, R>).put(put_cost_model_handler::<C, S, R>),
        )
        .route(
            "/api/v1/drivers/:driver_id/cost-model/summary",
            get(cost_summary_handler::<C, S, R>),
        )
        .with_state(service)
}

pub(crate) async fn list_configurations_handler<C, S, R>(
    State(service): State<Arc<LoadBoardService<C, S, R>>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response
where
    C: PresetCatalog + 'static,
    S: LoadSource + 'static,
    R: CostModelRepository + 'static,
{
    let keyword = params
        .iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.as_str());
    let presets: Vec<FilterPreset> = service.configurations(keyword);
    let payload = json!({ "total": presets.len(), "configurations": presets });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn configuration_handler<C, S, R>(
    State(service): State<Arc<LoadBoardService<C, S, R>>>,
    Path(reference): Path<String>,
) -> Response
where
    C: PresetCatalog + 'static,
    S: LoadSource + 'static,
    R: CostModelRepository + 'static,
{
    match service.configuration(&reference) {
        Ok(preset) => (StatusCode::OK, axum::Json(preset)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn search_handler<C, S, R>(
    State(service): State<Arc<LoadBoardService<C, S, R>>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response
where
    C: PresetCatalog + 'static,
    S: LoadSource + 'static,
    R: CostModelRepository + 'static,
{
    let mut configuration = None;
    let mut driver = None;
    let mut overrides = Vec::with_capacity(params.len());
    for (key, value) in params {
        match key.as_str() {
            CONFIGURATION_PARAM => configuration = Some(value),
            DRIVER_PARAM => driver = Some(DriverId(value)),
            _ => overrides.push((key, value)),
        }
    }
    let overrides = RawOverrides::from_query_pairs(overrides);

    let outcome = match &driver {
        Some(driver) => service.search_for_driver(configuration.as_deref(), &overrides, driver),
        None => service
            .search(configuration.as_deref(), &overrides)
            .map(|result| (result, None)),
    };

    match outcome {
        Ok((result, profitability)) => {
            let response = LoadSearchResponse {
                total: result.loads.len(),
                loads: result.loads,
                applied_configuration: result.applied_preset,
                filters: result.effective_filters,
                profitability,
            };
            (StatusCode::OK, axum::Json(response)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_cost_model_handler<C, S, R>(
    State(service): State<Arc<LoadBoardService<C, S, R>>>,
    Path(driver_id): Path<String>,
) -> Response
where
    C: PresetCatalog + 'static,
    S: LoadSource + 'static,
    R: CostModelRepository + 'static,
{
    match service.cost_model(&DriverId(driver_id)) {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn put_cost_model_handler<C, S, R>(
    State(service): State<Arc<LoadBoardService<C, S, R>>>,
    Path(driver_id): Path<String>,
    axum::Json(settings): axum::Json<CostModelSettings>,
) -> Response
where
    C: PresetCatalog + 'static,
    S: LoadSource + 'static,
    R: CostModelRepository + 'static,
{
    match service.save_cost_model(&DriverId(driver_id), settings) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cost_summary_handler<C, S, R>(
    State(service): State<Arc<LoadBoardService<C, S, R>>>,
    Path(driver_id): Path<String>,
) -> Response
where
    C: PresetCatalog + 'static,
    S: LoadSource + 'static,
    R: CostModelRepository + 'static,
{
    match service.cost_summary(&DriverId(driver_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LoadBoardError) -> Response {
    let status = match &error {
        LoadBoardError::Search(LoadSearchError::ConfigurationNotFound(_)) => StatusCode::NOT_FOUND,
        LoadBoardError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LoadBoardError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
