use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::cost_model::{
    CostModelRepository, CostModelSettings, DriverId, MileageCost, RepositoryError,
};
use crate::workflows::load_search::catalog::InMemoryPresetCatalog;
use crate::workflows::load_search::domain::{FilterPreset, FilterSet, LoadId, LoadRecord};
use crate::workflows::load_search::service::{LoadBoardService, LoadSource};

pub(super) const PREMIUM_PRESET_ID: &str = "premium-confirmed";

/// Deterministic inventory of 100 loads cycling through rates, distances, and tags.
pub(super) fn inventory() -> Vec<LoadRecord> {
    let base = Utc
        .with_ymd_and_hms(2025, 10, 1, 6, 0, 0)
        .single()
        .expect("valid base instant");

    (0..100u32)
        .map(|index| {
            let tags = match index % 4 {
                0 => vec!["hazmat".to_string()],
                1 => vec!["hazmat-placard".to_string(), "drop-and-hook".to_string()],
                2 => vec!["team".to_string()],
                _ => Vec::new(),
            };
            let distance = 100.0 + f64::from((index * 37) % 900);
            let loaded_rpm = 1.5 + f64::from(index % 10) * 0.15;
            let pickup = base + Duration::hours(i64::from(index) * 5);

            LoadRecord {
                id: LoadId(format!("L-{index:03}")),
                origin: if index % 2 == 0 {
                    "Dallas, TX".to_string()
                } else {
                    "Joplin, MO".to_string()
                },
                destination: if index % 5 == 0 {
                    "Memphis, TN".to_string()
                } else {
                    "Denver, CO".to_string()
                },
                distance_num: distance,
                weight_num: 20000.0 + f64::from(index % 7) * 3000.0,
                loaded_rpm_num: loaded_rpm,
                total_rpm_num: Some(loaded_rpm * 0.9),
                price_num: Some(loaded_rpm * distance),
                distance_to_origin: f64::from((index * 13) % 250),
                load_type: (if index % 3 == 0 { "Reefer" } else { "Dry Van" }).to_string(),
                customer: format!("Shipper {}", index % 6),
                service_tags: tags,
                confirmed_appointment: index % 3 != 0,
                pickup_date: pickup,
                drop_date: pickup + Duration::hours(20),
            }
        })
        .collect()
}

pub(super) fn premium_preset() -> FilterPreset {
    let created = Utc
        .with_ymd_and_hms(2025, 3, 1, 0, 0, 0)
        .single()
        .expect("valid instant");
    FilterPreset {
        id: PREMIUM_PRESET_ID.to_string(),
        name: "Premium Confirmed".to_string(),
        description: "Confirmed loads above $2.00 without hazmat".to_string(),
        filters: FilterSet {
            min_loaded_rpm: Some(2.0),
            confirmed_only: Some(true),
            service_exclusions: Some(vec!["hazmat".to_string()]),
            ..FilterSet::default()
        },
        usage_count: 12,
        created_at: created,
        last_used: created,
    }
}

pub(super) fn catalog() -> InMemoryPresetCatalog {
    InMemoryPresetCatalog::new(vec![premium_preset()]).expect("valid catalog")
}

pub(super) fn driver() -> DriverId {
    DriverId("driver-7".to_string())
}

pub(super) fn driver_settings() -> CostModelSettings {
    CostModelSettings {
        mpg: 6.0,
        fuel_price: 4.2,
        simple_maintenance: MileageCost::new(1500.0, 10000.0),
        simple_fixed_monthly: 4330.0,
        margin_cents: 10.0,
        ..CostModelSettings::default()
    }
}

#[derive(Default, Clone)]
pub(super) struct StaticLoads {
    pub(super) loads: Vec<LoadRecord>,
}

impl LoadSource for StaticLoads {
    fn loads(&self) -> Vec<LoadRecord> {
        self.loads.clone()
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCostModels {
    pub(super) records: Arc<Mutex<HashMap<DriverId, CostModelSettings>>>,
}

impl CostModelRepository for MemoryCostModels {
    fn fetch(&self, driver: &DriverId) -> Result<Option<CostModelSettings>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(driver).cloned())
    }

    fn save(&self, driver: &DriverId, settings: CostModelSettings) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(driver.clone(), settings);
        Ok(())
    }
}

pub(super) struct UnavailableCostModels;

impl CostModelRepository for UnavailableCostModels {
    fn fetch(&self, _driver: &DriverId) -> Result<Option<CostModelSettings>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _driver: &DriverId, _settings: CostModelSettings) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type TestService = LoadBoardService<InMemoryPresetCatalog, StaticLoads, MemoryCostModels>;

pub(super) fn build_service() -> (TestService, Arc<MemoryCostModels>) {
    let cost_models = Arc::new(MemoryCostModels::default());
    let service = LoadBoardService::new(
        Arc::new(catalog()),
        Arc::new(StaticLoads { loads: inventory() }),
        cost_models.clone(),
    );
    (service, cost_models)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
