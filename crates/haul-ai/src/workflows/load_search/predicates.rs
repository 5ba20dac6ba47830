//! Ordered per-field rules deciding whether a load satisfies an effective filter set.
//!
//! Each rule treats an absent filter field as "no constraint". Rules run in the order of
//! [`RULES`] and evaluation stops at the first rejection.

use chrono::{DateTime, Utc};

use super::domain::{FilterSet, LoadRecord, STANDARD_NETWORK_RADIUS_MILES};

pub type LoadPredicate = fn(&FilterSet, &LoadRecord) -> bool;

pub const RULES: &[(&str, LoadPredicate)] = &[
    ("min_loaded_rpm", min_loaded_rpm),
    ("distance_range", distance_range),
    ("service_exclusions", service_exclusions),
    ("confirmed_only", confirmed_only),
    ("standard_network_only", standard_network_only),
    ("destination", destination),
    ("origin", origin),
    ("destination_state", destination_state),
    ("origin_state", origin_state),
    ("destination_radius", destination_radius),
    ("weight_range", weight_range),
    ("load_type", load_type),
    ("customer", customer),
    ("pickup_window", pickup_window),
    ("delivery_window", delivery_window),
];

pub fn matches(filters: &FilterSet, load: &LoadRecord) -> bool {
    RULES.iter().all(|(_, rule)| rule(filters, load))
}

/// Name of the first rule rejecting the load, if any.
pub fn first_rejection(filters: &FilterSet, load: &LoadRecord) -> Option<&'static str> {
    RULES
        .iter()
        .find(|(_, rule)| !rule(filters, load))
        .map(|(name, _)| *name)
}

/// Loads satisfying every rule, in input order.
pub fn filter_loads(loads: &[LoadRecord], filters: &FilterSet) -> Vec<LoadRecord> {
    loads
        .iter()
        .filter(|load| matches(filters, load))
        .cloned()
        .collect()
}

pub fn min_loaded_rpm(filters: &FilterSet, load: &LoadRecord) -> bool {
    load.loaded_rpm_num >= filters.min_loaded_rpm.unwrap_or(0.0)
}

pub fn distance_range(filters: &FilterSet, load: &LoadRecord) -> bool {
    let min = filters.min_distance.unwrap_or(0.0);
    let max = filters.max_distance.unwrap_or(f64::INFINITY);
    min <= load.distance_num && load.distance_num <= max
}

/// Rejects a load carrying any excluded tag. Tags compare by exact, case-sensitive
/// equality: excluding `hazmat` does not reject a `hazmat-placard` tag.
pub fn service_exclusions(filters: &FilterSet, load: &LoadRecord) -> bool {
    match filters.service_exclusions.as_deref() {
        Some(excluded) if !excluded.is_empty() => !load
            .service_tags
            .iter()
            .any(|tag| excluded.iter().any(|exclusion| exclusion == tag)),
        _ => true,
    }
}

pub fn confirmed_only(filters: &FilterSet, load: &LoadRecord) -> bool {
    !filters.confirmed_only.unwrap_or(false) || load.confirmed_appointment
}

pub fn standard_network_only(filters: &FilterSet, load: &LoadRecord) -> bool {
    !filters.standard_network_only.unwrap_or(false)
        || load.distance_to_origin <= STANDARD_NETWORK_RADIUS_MILES
}

pub fn destination(filters: &FilterSet, load: &LoadRecord) -> bool {
    contains_ignoring_case(&load.destination, filters.destination.as_deref())
}

pub fn origin(filters: &FilterSet, load: &LoadRecord) -> bool {
    contains_ignoring_case(&load.origin, filters.origin.as_deref())
}

pub fn destination_state(filters: &FilterSet, load: &LoadRecord) -> bool {
    state_starts_with(&load.destination, filters.destination_state.as_deref())
}

pub fn origin_state(filters: &FilterSet, load: &LoadRecord) -> bool {
    state_starts_with(&load.origin, filters.origin_state.as_deref())
}

pub fn destination_radius(filters: &FilterSet, load: &LoadRecord) -> bool {
    filters
        .destination_radius
        .map_or(true, |radius| load.distance_to_origin <= radius)
}

pub fn weight_range(filters: &FilterSet, load: &LoadRecord) -> bool {
    filters.min_weight.map_or(true, |min| load.weight_num >= min)
        && filters.max_weight.map_or(true, |max| load.weight_num <= max)
}

pub fn load_type(filters: &FilterSet, load: &LoadRecord) -> bool {
    is_listed(&load.load_type, filters.load_type.as_deref())
}

pub fn customer(filters: &FilterSet, load: &LoadRecord) -> bool {
    is_listed(&load.customer, filters.customer.as_deref())
}

pub fn pickup_window(filters: &FilterSet, load: &LoadRecord) -> bool {
    within_window(load.pickup_date, filters.start_date, filters.end_date)
}

pub fn delivery_window(filters: &FilterSet, load: &LoadRecord) -> bool {
    within_window(
        load.drop_date,
        filters.destination_date_from,
        filters.destination_date_to,
    )
}

fn contains_ignoring_case(label: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |needle| {
        label.to_lowercase().contains(&needle.to_lowercase())
    })
}

/// State segment of a `"City, ST"` label.
pub fn state_segment(label: &str) -> Option<&str> {
    label.split(',').nth(1).map(str::trim)
}

fn state_starts_with(label: &str, prefix: Option<&str>) -> bool {
    let Some(prefix) = prefix else {
        return true;
    };

    state_segment(label).map_or(false, |state| {
        state
            .to_lowercase()
            .starts_with(&prefix.trim().to_lowercase())
    })
}

fn is_listed(value: &str, allowed: Option<&[String]>) -> bool {
    match allowed {
        Some(allowed) if !allowed.is_empty() => allowed
            .iter()
            .any(|candidate| candidate.to_lowercase() == value.to_lowercase()),
        _ => true,
    }
}

/// Inclusive instant range. Plain-date bounds already span their whole UTC day.
fn within_window(
    instant: DateTime<Utc>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    from.map_or(true, |from| instant >= from) && to.map_or(true, |to| instant <= to)
}
