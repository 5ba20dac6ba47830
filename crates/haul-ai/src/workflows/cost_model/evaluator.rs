use serde::{Deserialize, Serialize};

use super::settings::{CostMode, CostModelSettings};
use super::units::{per_mile, to_monthly, DAYS_PER_MONTH, WEEKS_PER_MONTH};

/// Single line of the rolling cost, kept so the UI can show where RCPM comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostComponent {
    pub category: String,
    pub per_mile: f64,
}

/// Fixed costs spread over the three reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostTotals {
    pub monthly: f64,
    pub weekly: f64,
    pub daily: f64,
}

impl FixedCostTotals {
    pub fn from_monthly(monthly: f64) -> Self {
        let monthly = finite_or_zero(monthly);
        Self {
            monthly,
            weekly: monthly / WEEKS_PER_MONTH,
            daily: monthly / DAYS_PER_MONTH,
        }
    }
}

/// Evaluated cost model for one driver in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostModelSummary {
    pub mode: CostMode,
    pub rcpm: f64,
    pub fixed_costs: FixedCostTotals,
    pub margin_threshold: f64,
    /// Minimum loaded rate per mile that still clears the margin.
    pub target_rpm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_per_mile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_in_cost_per_mile: Option<f64>,
    pub components: Vec<CostComponent>,
}

/// Stateless evaluator turning settings into RCPM, fixed totals and a margin threshold.
pub struct CostModelEvaluator;

impl CostModelEvaluator {
    /// Evaluates the settings using the mode the driver has selected.
    pub fn summarize(settings: &CostModelSettings) -> CostModelSummary {
        Self::evaluate(settings, settings.mode())
    }

    pub fn evaluate(settings: &CostModelSettings, mode: CostMode) -> CostModelSummary {
        let components = rolling_components(settings, mode);
        let rcpm = total_per_mile(&components);
        let fixed_costs = Self::fixed_costs(settings, mode);
        let margin_threshold = margin_threshold(settings, rcpm);

        let fixed_per_mile = settings
            .planned_monthly_miles
            .map(|miles| per_mile(fixed_costs.monthly, miles));

        CostModelSummary {
            mode,
            rcpm,
            fixed_costs,
            margin_threshold,
            target_rpm: rcpm + margin_threshold,
            fixed_per_mile,
            all_in_cost_per_mile: fixed_per_mile.map(|fixed| rcpm + fixed),
            components,
        }
    }

    pub fn rcpm(settings: &CostModelSettings, mode: CostMode) -> f64 {
        total_per_mile(&rolling_components(settings, mode))
    }

    pub fn fixed_costs(settings: &CostModelSettings, mode: CostMode) -> FixedCostTotals {
        FixedCostTotals::from_monthly(monthly_fixed(settings, mode))
    }
}

fn total_per_mile(components: &[CostComponent]) -> f64 {
    components.iter().map(|component| component.per_mile).sum()
}

fn rolling_components(settings: &CostModelSettings, mode: CostMode) -> Vec<CostComponent> {
    let mut components = vec![component("fuel", per_mile(settings.fuel_price, settings.mpg))];

    match mode {
        CostMode::Simple => {
            let maintenance = settings.simple_maintenance;
            components.push(component(
                "maintenance",
                per_mile(maintenance.dollars, maintenance.miles),
            ));
        }
        CostMode::Detailed => {
            for (category, cost) in settings.mileage_costs() {
                components.push(component(category, per_mile(cost.dollars, cost.miles)));
            }
        }
    }

    components
}

fn component(category: &str, per_mile: f64) -> CostComponent {
    // RCPM is never negative, so each line is floored at zero.
    CostComponent {
        category: category.to_string(),
        per_mile: per_mile.max(0.0),
    }
}

fn monthly_fixed(settings: &CostModelSettings, mode: CostMode) -> f64 {
    match mode {
        CostMode::Simple => finite_or_zero(settings.simple_fixed_monthly),
        CostMode::Detailed => {
            let named = settings
                .named_fixed_costs()
                .iter()
                .map(|(_, cost)| to_monthly(cost.amount, cost.period, cost.unit))
                .sum::<f64>();
            let other = settings
                .other_fixed_costs
                .iter()
                .map(|entry| to_monthly(entry.cost.amount, entry.cost.period, entry.cost.unit))
                .sum::<f64>();
            named + other
        }
    }
}

/// Per-mile cushion a load must clear above RCPM.
///
/// Without `use_whichever_greater` the smaller configured side wins, but a side left at
/// zero defers to the other rather than zeroing the threshold.
pub fn margin_threshold(settings: &CostModelSettings, rcpm: f64) -> f64 {
    let cents = finite_or_zero(settings.margin_cents) / 100.0;
    let percent_of_rcpm = finite_or_zero(rcpm) * (finite_or_zero(settings.margin_percent) / 100.0);

    if settings.use_whichever_greater {
        return cents.max(percent_of_rcpm);
    }

    if cents == 0.0 {
        percent_of_rcpm
    } else if percent_of_rcpm == 0.0 {
        cents
    } else {
        cents.min(percent_of_rcpm)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::cost_model::settings::{FixedCost, MileageCost, NamedFixedCost};
    use crate::workflows::cost_model::units::PeriodUnit;

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    fn detailed_settings() -> CostModelSettings {
        CostModelSettings {
            use_pro_mode: true,
            mpg: 6.0,
            fuel_price: 4.2,
            tires: MileageCost::new(3000.0, 100000.0),
            maintenance: MileageCost::new(1200.0, 10000.0),
            oil: MileageCost::new(400.0, 20000.0),
            def_fluid: MileageCost::new(150.0, 5000.0),
            tolls: MileageCost::new(100.0, 0.0),
            truck_payment: FixedCost::monthly(2200.0),
            insurance: FixedCost::new(14400.0, 1.0, PeriodUnit::Year),
            parking: FixedCost::new(50.0, 1.0, PeriodUnit::Week),
            other_fixed_costs: vec![NamedFixedCost {
                name: "phone".to_string(),
                cost: FixedCost::new(240.0, 3.0, PeriodUnit::Month),
            }],
            ..CostModelSettings::default()
        }
    }

    #[test]
    fn detailed_mode_sums_every_rolling_category() {
        let summary = CostModelEvaluator::evaluate(&detailed_settings(), CostMode::Detailed);

        // fuel 0.70 + tires 0.03 + maintenance 0.12 + oil 0.02 + def 0.03 + tolls 0
        assert!(approx(summary.rcpm, 0.90));
        assert_eq!(summary.components.len(), 6);
        let tolls = summary
            .components
            .iter()
            .find(|component| component.category == "tolls")
            .expect("tolls component present");
        assert_eq!(tolls.per_mile, 0.0);
    }

    #[test]
    fn standalone_rcpm_agrees_with_the_summary() {
        let settings = detailed_settings();
        for mode in [CostMode::Simple, CostMode::Detailed] {
            let summary = CostModelEvaluator::evaluate(&settings, mode);
            assert_eq!(CostModelEvaluator::rcpm(&settings, mode), summary.rcpm);
            assert_eq!(
                CostModelEvaluator::fixed_costs(&settings, mode),
                summary.fixed_costs
            );
        }
    }

    #[test]
    fn detailed_mode_normalizes_fixed_costs() {
        let totals = CostModelEvaluator::fixed_costs(&detailed_settings(), CostMode::Detailed);

        let monthly = 2200.0 + 1200.0 + 50.0 * 4.33 + 80.0;
        assert!(approx(totals.monthly, monthly));
        assert!(approx(totals.weekly, monthly / 4.33));
        assert!(approx(totals.daily, monthly / 30.0));
    }

    #[test]
    fn simple_mode_ignores_detailed_categories() {
        let settings = CostModelSettings {
            mpg: 7.0,
            fuel_price: 3.5,
            simple_maintenance: MileageCost::new(1500.0, 10000.0),
            simple_fixed_monthly: 4000.0,
            ..detailed_settings()
        };

        let summary = CostModelEvaluator::evaluate(&settings, CostMode::Simple);
        assert!(approx(summary.rcpm, 0.5 + 0.15));
        assert_eq!(summary.fixed_costs.monthly, 4000.0);
        assert_eq!(summary.components.len(), 2);
    }

    #[test]
    fn zero_mpg_contributes_no_fuel_cost() {
        let settings = CostModelSettings {
            mpg: 0.0,
            fuel_price: 4.0,
            ..CostModelSettings::default()
        };
        assert_eq!(CostModelEvaluator::rcpm(&settings, CostMode::Simple), 0.0);
    }

    #[test]
    fn negative_entries_do_not_reduce_rcpm() {
        let settings = CostModelSettings {
            mpg: 5.0,
            fuel_price: 4.0,
            simple_maintenance: MileageCost::new(-500.0, 1000.0),
            ..CostModelSettings::default()
        };
        assert!(approx(
            CostModelEvaluator::rcpm(&settings, CostMode::Simple),
            0.8
        ));
    }

    #[test]
    fn margin_threshold_degenerates_to_zero_when_unset() {
        let settings = CostModelSettings::default();
        assert_eq!(margin_threshold(&settings, 2.0), 0.0);
    }

    #[test]
    fn margin_threshold_falls_back_to_configured_side() {
        let cents_only = CostModelSettings {
            margin_cents: 10.0,
            ..CostModelSettings::default()
        };
        assert_eq!(margin_threshold(&cents_only, 2.0), 0.10);

        let percent_only = CostModelSettings {
            margin_percent: 10.0,
            ..CostModelSettings::default()
        };
        assert!(approx(margin_threshold(&percent_only, 2.0), 0.2));
    }

    #[test]
    fn margin_threshold_picks_lesser_or_greater() {
        let mut settings = CostModelSettings {
            margin_cents: 15.0,
            margin_percent: 10.0,
            ..CostModelSettings::default()
        };
        assert!(approx(margin_threshold(&settings, 2.0), 0.15));
        assert!(approx(margin_threshold(&settings, 1.0), 0.10));

        settings.use_whichever_greater = true;
        assert!(approx(margin_threshold(&settings, 2.0), 0.20));
        assert!(approx(margin_threshold(&settings, 1.0), 0.15));
    }

    #[test]
    fn planned_miles_spread_fixed_costs() {
        let settings = CostModelSettings {
            mpg: 5.0,
            fuel_price: 4.0,
            simple_fixed_monthly: 5000.0,
            planned_monthly_miles: Some(10000.0),
            margin_cents: 20.0,
            ..CostModelSettings::default()
        };

        let summary = CostModelEvaluator::summarize(&settings);
        assert_eq!(summary.mode, CostMode::Simple);
        assert_eq!(summary.fixed_per_mile, Some(0.5));
        assert!(approx(summary.all_in_cost_per_mile.expect("all-in"), 1.3));
        assert!(approx(summary.target_rpm, 1.0));
    }

    #[test]
    fn non_finite_fixed_bundle_is_zeroed() {
        let settings = CostModelSettings {
            simple_fixed_monthly: f64::NAN,
            ..CostModelSettings::default()
        };
        let totals = CostModelEvaluator::fixed_costs(&settings, CostMode::Simple);
        assert_eq!(totals, FixedCostTotals::default());
    }
}
