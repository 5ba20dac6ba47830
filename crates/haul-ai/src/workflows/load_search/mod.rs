//! Preset resolution, override coercion, and the ordered load predicates behind a search.

pub mod catalog;
pub mod domain;
pub mod overrides;
pub mod predicates;
pub mod resolver;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, InMemoryPresetCatalog, PresetCatalog};
pub use domain::{
    parse_window_bound, AppliedFilters, AppliedPreset, EffectiveFilterResult, FilterPreset,
    FilterSet, LoadId, LoadRecord, WindowEdge, STANDARD_NETWORK_RADIUS_MILES,
    UNBOUNDED_DISTANCE,
};
pub use overrides::{FilterPatch, RawOverrides, RawValue};
pub use predicates::filter_loads;
pub use resolver::{find_preset, resolve, LoadSearchError, ResolvedFilters};
pub use router::{load_board_router, LoadSearchResponse};
pub use service::{
    apply_filters, search_loads, LoadBoardError, LoadBoardService, LoadSource,
    ProfitabilityReport,
};
