use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::evaluator::CostModelSummary;
use crate::workflows::load_search::domain::{LoadId, LoadRecord};

/// Three-state verdict shown as a badge next to each load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitabilityClass {
    Contributes,
    Breakeven,
    Burns,
    /// No usable rate per mile could be derived from the load.
    Unclassifiable,
}

impl ProfitabilityClass {
    pub const fn label(self) -> &'static str {
        match self {
            ProfitabilityClass::Contributes => "Contributes",
            ProfitabilityClass::Breakeven => "Breaks even",
            ProfitabilityClass::Burns => "Burns cash",
            ProfitabilityClass::Unclassifiable => "Unclassified",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            ProfitabilityClass::Contributes => 0,
            ProfitabilityClass::Breakeven => 1,
            ProfitabilityClass::Burns => 2,
            ProfitabilityClass::Unclassifiable => 3,
        }
    }
}

/// Per-load profitability against one driver's cost model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityVerdict {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_per_mile: Option<f64>,
    pub margin_per_mile: f64,
    /// Contribution toward fixed costs: positive margin times distance, otherwise zero.
    pub net_profit_total: f64,
    /// `(rpm - rcpm) * distance` with no floor.
    pub signed_net_profit: f64,
    pub classification: ProfitabilityClass,
}

impl ProfitabilityVerdict {
    fn unclassifiable() -> Self {
        Self {
            rate_per_mile: None,
            margin_per_mile: 0.0,
            net_profit_total: 0.0,
            signed_net_profit: 0.0,
            classification: ProfitabilityClass::Unclassifiable,
        }
    }
}

/// Classifies a rate against RCPM with a symmetric margin band.
pub fn classify(rpm: f64, rcpm: f64, margin_threshold: f64) -> ProfitabilityClass {
    if !rpm.is_finite() {
        return ProfitabilityClass::Unclassifiable;
    }
    let rcpm = finite_or_zero(rcpm);
    let margin = finite_or_zero(margin_threshold);

    if rpm >= rcpm + margin {
        ProfitabilityClass::Contributes
    } else if rpm < rcpm - margin {
        ProfitabilityClass::Burns
    } else {
        ProfitabilityClass::Breakeven
    }
}

pub fn annotate(load: &LoadRecord, rcpm: f64, margin_threshold: f64) -> ProfitabilityVerdict {
    let Some(rpm) = load.effective_rpm() else {
        return ProfitabilityVerdict::unclassifiable();
    };

    let margin_per_mile = rpm - finite_or_zero(rcpm);
    let distance = finite_or_zero(load.distance_num);
    let signed_net_profit = finite_or_zero(margin_per_mile * distance);
    let net_profit_total = if margin_per_mile > 0.0 {
        signed_net_profit
    } else {
        0.0
    };

    ProfitabilityVerdict {
        rate_per_mile: Some(rpm),
        margin_per_mile,
        net_profit_total,
        signed_net_profit,
        classification: classify(rpm, rcpm, margin_threshold),
    }
}

/// Load identity paired with its verdict, ready for a comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedLoad {
    pub load_id: LoadId,
    pub origin: String,
    pub destination: String,
    pub distance_num: f64,
    pub verdict: ProfitabilityVerdict,
    pub badge: &'static str,
}

impl AnnotatedLoad {
    fn new(load: &LoadRecord, verdict: ProfitabilityVerdict) -> Self {
        Self {
            load_id: load.id.clone(),
            origin: load.origin.clone(),
            destination: load.destination.clone(),
            distance_num: load.distance_num,
            verdict,
            badge: verdict.classification.label(),
        }
    }
}

/// Annotates loads in input order.
pub fn annotate_all(loads: &[LoadRecord], summary: &CostModelSummary) -> Vec<AnnotatedLoad> {
    loads
        .iter()
        .map(|load| {
            AnnotatedLoad::new(
                load,
                annotate(load, summary.rcpm, summary.margin_threshold),
            )
        })
        .collect()
}

/// Annotates and sorts best first: margin per mile descending, unclassifiable loads last,
/// ties broken by load id.
pub fn rank(loads: &[LoadRecord], summary: &CostModelSummary) -> Vec<AnnotatedLoad> {
    let mut annotated = annotate_all(loads, summary);
    annotated.sort_by(compare_best_first);
    annotated
}

fn compare_best_first(left: &AnnotatedLoad, right: &AnnotatedLoad) -> Ordering {
    let left_unclassified = left.verdict.classification == ProfitabilityClass::Unclassifiable;
    let right_unclassified = right.verdict.classification == ProfitabilityClass::Unclassifiable;

    left_unclassified
        .cmp(&right_unclassified)
        .then_with(|| {
            right
                .verdict
                .margin_per_mile
                .total_cmp(&left.verdict.margin_per_mile)
        })
        .then_with(|| {
            left.verdict
                .classification
                .rank()
                .cmp(&right.verdict.classification.rank())
        })
        .then_with(|| left.load_id.cmp(&right.load_id))
}

/// Verdict counts and totals across a result set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityPortfolio {
    pub contributes: usize,
    pub breakeven: usize,
    pub burns: usize,
    pub unclassifiable: usize,
    pub net_profit_total: f64,
    pub signed_net_profit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_load_id: Option<LoadId>,
}

impl ProfitabilityPortfolio {
    pub fn from_ranked(ranked: &[AnnotatedLoad]) -> Self {
        let mut portfolio = Self::default();

        for entry in ranked {
            match entry.verdict.classification {
                ProfitabilityClass::Contributes => portfolio.contributes += 1,
                ProfitabilityClass::Breakeven => portfolio.breakeven += 1,
                ProfitabilityClass::Burns => portfolio.burns += 1,
                ProfitabilityClass::Unclassifiable => portfolio.unclassifiable += 1,
            }
            portfolio.net_profit_total += entry.verdict.net_profit_total;
            portfolio.signed_net_profit += entry.verdict.signed_net_profit;
        }

        portfolio.best_load_id = ranked
            .iter()
            .find(|entry| entry.verdict.classification != ProfitabilityClass::Unclassifiable)
            .map(|entry| entry.load_id.clone());

        portfolio
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
