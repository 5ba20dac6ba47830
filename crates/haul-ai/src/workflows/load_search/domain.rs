use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Literal the load board sends when the distance slider sits at its open end.
pub const UNBOUNDED_DISTANCE: &str = "1000+";

/// Deadhead allowance (miles to pickup) for loads inside the standard network.
pub const STANDARD_NETWORK_RADIUS_MILES: f64 = 150.0;

/// Identifier wrapper for load records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(pub String);

/// Candidate trip as published by the load board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRecord {
    pub id: LoadId,
    /// `"City, ST"` label of the pickup.
    pub origin: String,
    /// `"City, ST"` label of the delivery.
    pub destination: String,
    pub distance_num: f64,
    pub weight_num: f64,
    pub loaded_rpm_num: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rpm_num: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_num: Option<f64>,
    /// Deadhead miles from the driver to the pickup.
    pub distance_to_origin: f64,
    pub load_type: String,
    pub customer: String,
    #[serde(default)]
    pub service_tags: Vec<String>,
    #[serde(default)]
    pub confirmed_appointment: bool,
    pub pickup_date: DateTime<Utc>,
    pub drop_date: DateTime<Utc>,
}

impl LoadRecord {
    /// Revenue per mile used for profitability: the posted total RPM, else price over
    /// distance. `None` when neither yields a finite rate.
    pub fn effective_rpm(&self) -> Option<f64> {
        if let Some(total) = self.total_rpm_num {
            return total.is_finite().then_some(total);
        }

        let price = self.price_num?;
        if price.is_finite() && self.distance_num.is_finite() && self.distance_num > 0.0 {
            Some(price / self.distance_num)
        } else {
            None
        }
    }
}

/// Sparse set of constraints. Absent fields do not constrain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_loaded_rpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_distance: Option<f64>,
    /// `None` is unbounded.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_distance_cap"
    )]
    pub max_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_radius: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_network_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_exclusions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_state: Option<String>,

    /// Earliest pickup instant. A plain date means 00:00 UTC of that day.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_window_start"
    )]
    pub start_date: Option<DateTime<Utc>>,
    /// Latest pickup instant. A plain date covers that whole UTC day.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_window_end"
    )]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_window_start"
    )]
    pub destination_date_from: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_window_end"
    )]
    pub destination_date_to: Option<DateTime<Utc>>,
}

/// Which end of a date window a bound sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEdge {
    Start,
    End,
}

/// Parse a window bound from `YYYY-MM-DD` or RFC3339.
///
/// RFC3339 values keep their exact instant, converted to UTC. Plain dates widen to the
/// first or last millisecond of the UTC day depending on `edge`.
pub fn parse_window_bound(raw: &str, edge: WindowEdge) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = match edge {
        WindowEdge::Start => date.and_hms_opt(0, 0, 0),
        WindowEdge::End => date.and_hms_milli_opt(23, 59, 59, 999),
    }?;
    Some(time.and_utc())
}

fn deserialize_window_start<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_window_bound(deserializer, WindowEdge::Start)
}

fn deserialize_window_end<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_window_bound(deserializer, WindowEdge::End)
}

fn deserialize_window_bound<'de, D>(
    deserializer: D,
    edge: WindowEdge,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => parse_window_bound(&text, edge)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date bound `{text}`"))),
    }
}

fn deserialize_distance_cap<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCap {
        Number(f64),
        Text(String),
    }

    match Option::<RawCap>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawCap::Number(value)) => Ok(value.is_finite().then_some(value)),
        Some(RawCap::Text(text)) => {
            let trimmed = text.trim();
            if trimmed == UNBOUNDED_DISTANCE || trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed
                    .parse::<f64>()
                    .map(|value| value.is_finite().then_some(value))
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

/// Named, reusable filter set with usage metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub filters: FilterSet,
    #[serde(default)]
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl FilterPreset {
    pub fn applied(&self) -> AppliedPreset {
        AppliedPreset {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Identity of the preset that seeded a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPreset {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Filters actually applied to a search, defaults filled in for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub min_loaded_rpm: f64,
    pub min_distance: f64,
    /// `null` when unbounded.
    pub max_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_radius: Option<f64>,
    pub confirmed_only: bool,
    pub standard_network_only: bool,
    pub service_exclusions: Vec<String>,
    pub load_type: Vec<String>,
    pub customer: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_date_to: Option<DateTime<Utc>>,
}

impl From<&FilterSet> for AppliedFilters {
    fn from(filters: &FilterSet) -> Self {
        Self {
            min_loaded_rpm: filters.min_loaded_rpm.unwrap_or(0.0),
            min_distance: filters.min_distance.unwrap_or(0.0),
            max_distance: filters.max_distance,
            min_weight: filters.min_weight,
            max_weight: filters.max_weight,
            destination_radius: filters.destination_radius,
            confirmed_only: filters.confirmed_only.unwrap_or(false),
            standard_network_only: filters.standard_network_only.unwrap_or(false),
            service_exclusions: filters.service_exclusions.clone().unwrap_or_default(),
            load_type: filters.load_type.clone().unwrap_or_default(),
            customer: filters.customer.clone().unwrap_or_default(),
            destination: filters.destination.clone(),
            destination_state: filters.destination_state.clone(),
            origin: filters.origin.clone(),
            origin_state: filters.origin_state.clone(),
            start_date: filters.start_date,
            end_date: filters.end_date,
            destination_date_from: filters.destination_date_from,
            destination_date_to: filters.destination_date_to,
        }
    }
}

/// Joint output of preset resolution and load filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveFilterResult {
    pub loads: Vec<LoadRecord>,
    pub applied_preset: Option<AppliedPreset>,
    pub effective_filters: AppliedFilters,
}
