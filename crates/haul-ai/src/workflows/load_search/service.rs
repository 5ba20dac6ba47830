use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::catalog::PresetCatalog;
use super::domain::{AppliedFilters, EffectiveFilterResult, FilterPreset, FilterSet, LoadRecord};
use super::overrides::RawOverrides;
use super::predicates::filter_loads;
use super::resolver::{find_preset, resolve, LoadSearchError};
use crate::workflows::cost_model::{
    rank, AnnotatedLoad, CostModelEvaluator, CostModelRepository, CostModelSettings,
    CostModelSummary, DriverId, ProfitabilityPortfolio, RepositoryError,
};

/// Supplier of the current load inventory.
pub trait LoadSource: Send + Sync {
    fn loads(&self) -> Vec<LoadRecord>;
}

/// Applies already-resolved filters to a load collection and echoes what was applied.
pub fn apply_filters(
    loads: &[LoadRecord],
    filters: &FilterSet,
    preset: Option<&FilterPreset>,
) -> EffectiveFilterResult {
    EffectiveFilterResult {
        loads: filter_loads(loads, filters),
        applied_preset: preset.map(FilterPreset::applied),
        effective_filters: AppliedFilters::from(filters),
    }
}

/// Resolves the preset and overrides, then filters the supplied loads.
pub fn search_loads<C>(
    catalog: &C,
    preset_ref: Option<&str>,
    overrides: &RawOverrides,
    loads: &[LoadRecord],
) -> Result<EffectiveFilterResult, LoadSearchError>
where
    C: PresetCatalog + ?Sized,
{
    let resolved = resolve(catalog, preset_ref, overrides)?;
    Ok(apply_filters(
        loads,
        &resolved.filters,
        resolved.preset.as_ref(),
    ))
}

/// Cost summary plus the ranked verdicts for one search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityReport {
    pub summary: CostModelSummary,
    pub ranked: Vec<AnnotatedLoad>,
    pub portfolio: ProfitabilityPortfolio,
}

impl ProfitabilityReport {
    pub fn build(loads: &[LoadRecord], settings: &CostModelSettings) -> Self {
        let summary = CostModelEvaluator::summarize(settings);
        let ranked = rank(loads, &summary);
        let portfolio = ProfitabilityPortfolio::from_ranked(&ranked);
        Self {
            summary,
            ranked,
            portfolio,
        }
    }
}

/// Service composing the preset catalog, load inventory, and driver cost models.
pub struct LoadBoardService<C, S, R> {
    catalog: Arc<C>,
    source: Arc<S>,
    cost_models: Arc<R>,
}

impl<C, S, R> LoadBoardService<C, S, R>
where
    C: PresetCatalog + 'static,
    S: LoadSource + 'static,
    R: CostModelRepository + 'static,
{
    pub fn new(catalog: Arc<C>, source: Arc<S>, cost_models: Arc<R>) -> Self {
        Self {
            catalog,
            source,
            cost_models,
        }
    }

    pub fn search(
        &self,
        preset_ref: Option<&str>,
        overrides: &RawOverrides,
    ) -> Result<EffectiveFilterResult, LoadBoardError> {
        let loads = self.source.loads();
        let result = search_loads(self.catalog.as_ref(), preset_ref, overrides, &loads)?;

        info!(
            preset = result.applied_preset.as_ref().map(|preset| preset.id.as_str()),
            candidates = loads.len(),
            matched = result.loads.len(),
            "load search completed"
        );

        Ok(result)
    }

    /// Searches and, when the driver has stored settings, ranks the matches by profitability.
    pub fn search_for_driver(
        &self,
        preset_ref: Option<&str>,
        overrides: &RawOverrides,
        driver: &DriverId,
    ) -> Result<(EffectiveFilterResult, Option<ProfitabilityReport>), LoadBoardError> {
        let result = self.search(preset_ref, overrides)?;
        let report = self
            .cost_models
            .fetch(driver)?
            .map(|settings| ProfitabilityReport::build(&result.loads, &settings));
        Ok((result, report))
    }

    pub fn configuration(&self, reference: &str) -> Result<FilterPreset, LoadBoardError> {
        find_preset(self.catalog.as_ref(), reference)
            .ok_or_else(|| LoadSearchError::ConfigurationNotFound(reference.to_string()).into())
    }

    pub fn configurations(&self, keyword: Option<&str>) -> Vec<FilterPreset> {
        match keyword {
            Some(keyword) => self.catalog.search(keyword),
            None => self.catalog.all(),
        }
    }

    pub fn cost_model(&self, driver: &DriverId) -> Result<CostModelSettings, LoadBoardError> {
        let settings = self
            .cost_models
            .fetch(driver)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(settings)
    }

    pub fn save_cost_model(
        &self,
        driver: &DriverId,
        settings: CostModelSettings,
    ) -> Result<CostModelSummary, LoadBoardError> {
        let summary = CostModelEvaluator::summarize(&settings);
        self.cost_models.save(driver, settings)?;
        info!(driver = %driver.0, rcpm = summary.rcpm, "cost model saved");
        Ok(summary)
    }

    pub fn cost_summary(&self, driver: &DriverId) -> Result<CostModelSummary, LoadBoardError> {
        let settings = self.cost_model(driver)?;
        Ok(CostModelEvaluator::summarize(&settings))
    }
}

/// Error raised by the load board service.
#[derive(Debug, thiserror::Error)]
pub enum LoadBoardError {
    #[error(transparent)]
    Search(#[from] LoadSearchError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
