use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{parse_window_bound, FilterSet, WindowEdge, UNBOUNDED_DISTANCE};

/// Loosely typed override value as it arrives from a query string or form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    List(Vec<String>),
}

impl RawValue {
    fn first(&self) -> Option<&str> {
        match self {
            RawValue::Single(value) => Some(value.as_str()),
            RawValue::List(values) => values.first().map(String::as_str),
        }
    }
}

/// Caller-supplied override parameters keyed by filter field name (`minLoadedRpm`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOverrides {
    values: BTreeMap<String, RawValue>,
}

impl RawOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds overrides from decoded query pairs. Blank values are treated as unset and a
    /// key repeated in the query becomes a list.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut overrides = Self::new();
        for (key, value) in pairs {
            let value = value.into();
            if value.trim().is_empty() {
                continue;
            }
            overrides.push(key.into(), value);
        }
        overrides
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values
            .insert(key.into(), RawValue::Single(value.into()));
        self
    }

    pub fn insert_list<S: Into<String>>(
        &mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.values.insert(key.into(), RawValue::List(values));
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    fn push(&mut self, key: String, value: String) {
        match self.values.remove(&key) {
            None => {
                self.values.insert(key, RawValue::Single(value));
            }
            Some(RawValue::Single(existing)) => {
                self.values.insert(key, RawValue::List(vec![existing, value]));
            }
            Some(RawValue::List(mut existing)) => {
                existing.push(value);
                self.values.insert(key, RawValue::List(existing));
            }
        }
    }
}

/// Field-by-field replacement for a seeded filter set.
///
/// The outer `Option` records whether the caller sent the key; the inner one is the
/// coerced value, `None` meaning the field is cleared to "unconstrained".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterPatch {
    pub min_loaded_rpm: Option<Option<f64>>,
    pub min_distance: Option<Option<f64>>,
    pub max_distance: Option<Option<f64>>,
    pub min_weight: Option<Option<f64>>,
    pub max_weight: Option<Option<f64>>,
    pub destination_radius: Option<Option<f64>>,
    pub confirmed_only: Option<Option<bool>>,
    pub standard_network_only: Option<Option<bool>>,
    pub service_exclusions: Option<Option<Vec<String>>>,
    pub load_type: Option<Option<Vec<String>>>,
    pub customer: Option<Option<Vec<String>>>,
    pub destination: Option<Option<String>>,
    pub destination_state: Option<Option<String>>,
    pub origin: Option<Option<String>>,
    pub origin_state: Option<Option<String>>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub destination_date_from: Option<Option<DateTime<Utc>>>,
    pub destination_date_to: Option<Option<DateTime<Utc>>>,
}

impl FilterPatch {
    /// Coerces raw overrides by the fixed field-type table. Unknown keys are ignored.
    pub fn coerce(raw: &RawOverrides) -> Self {
        let mut patch = Self::default();

        for (key, value) in &raw.values {
            match key.as_str() {
                "minLoadedRpm" => patch.min_loaded_rpm = Some(number(key, value)),
                "minDistance" => patch.min_distance = Some(number(key, value)),
                "maxDistance" => patch.max_distance = Some(distance_cap(value)),
                "minWeight" => patch.min_weight = Some(number(key, value)),
                "maxWeight" => patch.max_weight = Some(number(key, value)),
                "destinationRadius" => patch.destination_radius = Some(number(key, value)),
                "confirmedOnly" => patch.confirmed_only = Some(Some(flag(value))),
                "standardNetworkOnly" => patch.standard_network_only = Some(Some(flag(value))),
                "serviceExclusions" => patch.service_exclusions = Some(Some(list(value))),
                "loadType" => patch.load_type = Some(Some(list(value))),
                "customer" => patch.customer = Some(Some(list(value))),
                "destination" => patch.destination = Some(text(value)),
                "destinationState" => patch.destination_state = Some(text(value)),
                "origin" => patch.origin = Some(text(value)),
                "originState" => patch.origin_state = Some(text(value)),
                "startDate" => patch.start_date = Some(bound(key, value, WindowEdge::Start)),
                "endDate" => patch.end_date = Some(bound(key, value, WindowEdge::End)),
                "destinationDateFrom" => {
                    patch.destination_date_from = Some(bound(key, value, WindowEdge::Start))
                }
                "destinationDateTo" => {
                    patch.destination_date_to = Some(bound(key, value, WindowEdge::End))
                }
                other => debug!(key = other, "ignoring unknown filter override"),
            }
        }

        patch
    }

    /// Replaces every field present in the patch; untouched fields keep the seeded value.
    pub fn apply(self, mut base: FilterSet) -> FilterSet {
        fn replace<T>(slot: &mut Option<T>, patch: Option<Option<T>>) {
            if let Some(value) = patch {
                *slot = value;
            }
        }

        replace(&mut base.min_loaded_rpm, self.min_loaded_rpm);
        replace(&mut base.min_distance, self.min_distance);
        replace(&mut base.max_distance, self.max_distance);
        replace(&mut base.min_weight, self.min_weight);
        replace(&mut base.max_weight, self.max_weight);
        replace(&mut base.destination_radius, self.destination_radius);
        replace(&mut base.confirmed_only, self.confirmed_only);
        replace(&mut base.standard_network_only, self.standard_network_only);
        replace(&mut base.service_exclusions, self.service_exclusions);
        replace(&mut base.load_type, self.load_type);
        replace(&mut base.customer, self.customer);
        replace(&mut base.destination, self.destination);
        replace(&mut base.destination_state, self.destination_state);
        replace(&mut base.origin, self.origin);
        replace(&mut base.origin_state, self.origin_state);
        replace(&mut base.start_date, self.start_date);
        replace(&mut base.end_date, self.end_date);
        replace(&mut base.destination_date_from, self.destination_date_from);
        replace(&mut base.destination_date_to, self.destination_date_to);

        base
    }
}

fn number(key: &str, value: &RawValue) -> Option<f64> {
    let raw = value.first()?.trim();
    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed),
        _ => {
            debug!(key, value = raw, "dropping unparseable numeric override");
            None
        }
    }
}

fn distance_cap(value: &RawValue) -> Option<f64> {
    match value.first().map(str::trim) {
        Some(UNBOUNDED_DISTANCE) | None => None,
        Some(_) => number("maxDistance", value),
    }
}

fn flag(value: &RawValue) -> bool {
    value.first() == Some("true")
}

fn list(value: &RawValue) -> Vec<String> {
    match value {
        RawValue::Single(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        RawValue::List(values) => values.clone(),
    }
}

fn text(value: &RawValue) -> Option<String> {
    value.first().map(str::to_string)
}

fn bound(key: &str, value: &RawValue, edge: WindowEdge) -> Option<DateTime<Utc>> {
    let raw = value.first()?;
    let parsed = parse_window_bound(raw, edge);
    if parsed.is_none() {
        debug!(key, value = raw, "dropping unparseable date override");
    }
    parsed
}
