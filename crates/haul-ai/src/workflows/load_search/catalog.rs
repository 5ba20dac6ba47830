use std::io::Read;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use super::domain::{FilterPreset, FilterSet};

/// Read-only view over the preset catalog so the search service carries no ambient state.
pub trait PresetCatalog: Send + Sync {
    fn lookup_by_id(&self, id: &str) -> Option<FilterPreset>;
    /// Case-insensitive exact name match.
    fn lookup_by_name(&self, name: &str) -> Option<FilterPreset>;
    /// Case-insensitive keyword match over name and description.
    fn search(&self, keyword: &str) -> Vec<FilterPreset>;
    fn all(&self) -> Vec<FilterPreset>;
}

/// Catalog backed by a fixed vector of presets.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPresetCatalog {
    presets: Vec<FilterPreset>,
}

impl InMemoryPresetCatalog {
    pub fn new(presets: Vec<FilterPreset>) -> Result<Self, CatalogError> {
        for (index, preset) in presets.iter().enumerate() {
            if !is_slug(&preset.id) {
                return Err(CatalogError::InvalidId(preset.id.clone()));
            }
            for other in &presets[..index] {
                if other.id == preset.id {
                    return Err(CatalogError::DuplicateId(preset.id.clone()));
                }
                if other.name.to_lowercase() == preset.name.to_lowercase() {
                    return Err(CatalogError::DuplicateName(preset.name.clone()));
                }
            }
        }

        Ok(Self { presets })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let presets: Vec<FilterPreset> = serde_json::from_reader(reader)?;
        Self::new(presets)
    }

    /// Presets shipped with the load board.
    pub fn standard() -> Self {
        Self {
            presets: standard_presets(),
        }
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl PresetCatalog for InMemoryPresetCatalog {
    fn lookup_by_id(&self, id: &str) -> Option<FilterPreset> {
        self.presets.iter().find(|preset| preset.id == id).cloned()
    }

    fn lookup_by_name(&self, name: &str) -> Option<FilterPreset> {
        let needle = name.to_lowercase();
        self.presets
            .iter()
            .find(|preset| preset.name.to_lowercase() == needle)
            .cloned()
    }

    fn search(&self, keyword: &str) -> Vec<FilterPreset> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return self.all();
        }

        self.presets
            .iter()
            .filter(|preset| {
                preset.name.to_lowercase().contains(&needle)
                    || preset.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<FilterPreset> {
        self.presets.clone()
    }
}

fn is_slug(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('-')
        && !id.ends_with('-')
        && id
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read preset catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid preset catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preset id '{0}' must be lowercase words joined by hyphens")]
    InvalidId(String),
    #[error("duplicate preset id '{0}'")]
    DuplicateId(String),
    #[error("duplicate preset name '{0}'")]
    DuplicateName(String),
}

fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn standard_presets() -> Vec<FilterPreset> {
    let seeded = seeded_at();
    let preset = |id: &str, name: &str, description: &str, usage_count: u32, filters| {
        FilterPreset {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            filters,
            usage_count,
            created_at: seeded,
            last_used: seeded,
        }
    };

    vec![
        preset(
            "high-paying-regional",
            "High Paying Regional",
            "Confirmed regional freight paying at least $2.50 per loaded mile",
            42,
            FilterSet {
                min_loaded_rpm: Some(2.5),
                max_distance: Some(500.0),
                confirmed_only: Some(true),
                ..FilterSet::default()
            },
        ),
        preset(
            "long-haul-dry-van",
            "Long Haul Dry Van",
            "Dry van runs over 700 miles with no hazmat or team requirements",
            31,
            FilterSet {
                min_distance: Some(700.0),
                load_type: Some(vec!["Dry Van".to_string()]),
                service_exclusions: Some(vec!["hazmat".to_string(), "team".to_string()]),
                ..FilterSet::default()
            },
        ),
        preset(
            "close-to-home",
            "Close To Home",
            "Standard network pickups under 300 miles",
            18,
            FilterSet {
                max_distance: Some(300.0),
                standard_network_only: Some(true),
                ..FilterSet::default()
            },
        ),
        preset(
            "light-reefer",
            "Light Reefer",
            "Reefer loads under 30,000 lbs",
            9,
            FilterSet {
                load_type: Some(vec!["Reefer".to_string()]),
                max_weight: Some(30000.0),
                ..FilterSet::default()
            },
        ),
    ]
}
