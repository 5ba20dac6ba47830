use tracing::debug;

use super::catalog::PresetCatalog;
use super::domain::{FilterPreset, FilterSet};
use super::overrides::{FilterPatch, RawOverrides};

/// Preset plus overrides merged into the filter set a search will apply.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilters {
    pub preset: Option<FilterPreset>,
    pub filters: FilterSet,
}

/// Errors surfaced while resolving a search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadSearchError {
    #[error("configuration '{0}' not found")]
    ConfigurationNotFound(String),
}

/// Looks a preset up by exact id first, then by case-insensitive name.
pub fn find_preset<C>(catalog: &C, reference: &str) -> Option<FilterPreset>
where
    C: PresetCatalog + ?Sized,
{
    catalog
        .lookup_by_id(reference)
        .or_else(|| catalog.lookup_by_name(reference))
}

/// Seeds the effective filters from the referenced preset and lays the overrides on top.
pub fn resolve<C>(
    catalog: &C,
    preset_ref: Option<&str>,
    overrides: &RawOverrides,
) -> Result<ResolvedFilters, LoadSearchError>
where
    C: PresetCatalog + ?Sized,
{
    let preset = match preset_ref.map(str::trim).filter(|reference| !reference.is_empty()) {
        Some(reference) => Some(
            find_preset(catalog, reference)
                .ok_or_else(|| LoadSearchError::ConfigurationNotFound(reference.to_string()))?,
        ),
        None => None,
    };

    let seeded = preset
        .as_ref()
        .map(|preset| preset.filters.clone())
        .unwrap_or_default();
    let filters = FilterPatch::coerce(overrides).apply(seeded);

    debug!(
        preset = preset.as_ref().map(|preset| preset.id.as_str()),
        overrides = overrides.len(),
        "resolved effective filters"
    );

    Ok(ResolvedFilters { preset, filters })
}
