use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::cost_model::{RepositoryError, SettingsError};
use crate::workflows::inventory::LoadImportError;
use crate::workflows::load_search::{CatalogError, LoadBoardError, LoadSearchError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Search(LoadBoardError),
    Import(LoadImportError),
    Catalog(CatalogError),
    Settings(SettingsError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Search(LoadBoardError::Search(LoadSearchError::ConfigurationNotFound(_)))
            | AppError::Search(LoadBoardError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Import(_) | AppError::Catalog(_) | AppError::Settings(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Search(LoadBoardError::Repository(RepositoryError::Unavailable(_)))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Search(err) => write!(f, "search error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Catalog(err) => write!(f, "preset catalog error: {}", err),
            AppError::Settings(err) => write!(f, "cost model error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Search(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Settings(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<LoadBoardError> for AppError {
    fn from(value: LoadBoardError) -> Self {
        Self::Search(value)
    }
}

impl From<LoadSearchError> for AppError {
    fn from(value: LoadSearchError) -> Self {
        Self::Search(value.into())
    }
}

impl From<LoadImportError> for AppError {
    fn from(value: LoadImportError) -> Self {
        Self::Import(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<SettingsError> for AppError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}
