use chrono::NaiveDate;
use haul_ai::config::DataConfig;
use haul_ai::error::AppError;
use haul_ai::workflows::cost_model::{
    CostModelRepository, CostModelSettings, DriverId, RepositoryError,
};
use haul_ai::workflows::inventory::{LoadInventory, LoadInventoryImporter};
use haul_ai::workflows::load_search::InMemoryPresetCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCostModelRepository {
    records: Arc<Mutex<HashMap<DriverId, CostModelSettings>>>,
}

impl CostModelRepository for InMemoryCostModelRepository {
    fn fetch(&self, driver: &DriverId) -> Result<Option<CostModelSettings>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(driver).cloned())
    }

    fn save(&self, driver: &DriverId, settings: CostModelSettings) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        guard.insert(driver.clone(), settings);
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("cost model store lock poisoned".to_string())
}

/// Preset catalog from the configured JSON file, or the built-in presets.
pub(crate) fn load_catalog(data: &DataConfig) -> Result<InMemoryPresetCatalog, AppError> {
    match &data.presets_path {
        Some(path) => {
            let catalog = InMemoryPresetCatalog::from_path(path)?;
            info!(path = %path.display(), presets = catalog.len(), "loaded preset catalog");
            Ok(catalog)
        }
        None => Ok(InMemoryPresetCatalog::standard()),
    }
}

/// Load inventory from the configured CSV export; empty when none is configured.
pub(crate) fn load_inventory(data: &DataConfig) -> Result<LoadInventory, AppError> {
    match &data.loads_csv {
        Some(path) => Ok(LoadInventoryImporter::from_path(path)?),
        None => Ok(LoadInventory::default()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Parses a `key=value` filter override given on the command line.
pub(crate) fn parse_override(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("override '{raw}' must look like key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("override '{raw}' is missing a filter name"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_split_on_the_first_equals() {
        assert_eq!(
            parse_override("maxDistance=1000+").expect("valid override"),
            ("maxDistance".to_string(), "1000+".to_string())
        );
        assert_eq!(
            parse_override("origin=Dallas, TX").expect("valid override"),
            ("origin".to_string(), "Dallas, TX".to_string())
        );
        assert!(parse_override("minLoadedRpm").is_err());
        assert!(parse_override("=2.5").is_err());
    }

    #[test]
    fn unset_data_sources_fall_back_to_defaults() {
        let data = DataConfig::default();
        assert!(load_inventory(&data).expect("empty inventory").is_empty());
        assert_eq!(
            load_catalog(&data).expect("standard catalog").len(),
            InMemoryPresetCatalog::standard().len()
        );
    }

    #[test]
    fn repository_round_trips_settings() {
        let repository = InMemoryCostModelRepository::default();
        let driver = DriverId("driver-3".to_string());
        assert!(repository.fetch(&driver).expect("fetch").is_none());

        let settings = CostModelSettings {
            mpg: 7.0,
            ..CostModelSettings::default()
        };
        repository
            .save(&driver, settings.clone())
            .expect("settings saved");
        assert_eq!(repository.fetch(&driver).expect("fetch"), Some(settings));
    }
}
