use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::units::PeriodUnit;

/// Failure reading stored cost model settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read cost model settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid cost model settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identifier wrapper for the driver owning a cost model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriverId(pub String);

/// Which evaluation path the driver has switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMode {
    Simple,
    Detailed,
}

impl CostMode {
    pub const fn label(self) -> &'static str {
        match self {
            CostMode::Simple => "simple",
            CostMode::Detailed => "detailed",
        }
    }
}

/// Variable expense tracked as dollars spent over miles driven.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MileageCost {
    pub dollars: f64,
    pub miles: f64,
}

impl MileageCost {
    pub const fn new(dollars: f64, miles: f64) -> Self {
        Self { dollars, miles }
    }
}

/// Time-based expense paid every `period` units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCost {
    pub amount: f64,
    pub period: f64,
    pub unit: PeriodUnit,
}

impl FixedCost {
    pub const fn new(amount: f64, period: f64, unit: PeriodUnit) -> Self {
        Self {
            amount,
            period,
            unit,
        }
    }

    pub const fn monthly(amount: f64) -> Self {
        Self::new(amount, 1.0, PeriodUnit::Month)
    }

    /// Billing cadence for display, e.g. `per year` or `every 3 months`.
    pub fn cadence(&self) -> String {
        if self.period == 1.0 {
            format!("per {}", self.unit.label())
        } else {
            format!("every {} {}s", self.period, self.unit.label())
        }
    }
}

impl Default for FixedCost {
    fn default() -> Self {
        Self::monthly(0.0)
    }
}

/// Driver-defined fixed expense outside the named categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedFixedCost {
    pub name: String,
    #[serde(flatten)]
    pub cost: FixedCost,
}

/// Flat settings record persisted per driver.
///
/// `simple_*` fields feed the simple mode only; the per-category fields feed the detailed
/// mode. Fuel (`mpg`, `fuel_price`) and the margin parameters are shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostModelSettings {
    pub use_pro_mode: bool,
    pub mpg: f64,
    pub fuel_price: f64,

    pub simple_maintenance: MileageCost,
    pub simple_fixed_monthly: f64,

    pub tires: MileageCost,
    pub maintenance: MileageCost,
    pub oil: MileageCost,
    pub def_fluid: MileageCost,
    pub tolls: MileageCost,

    pub truck_payment: FixedCost,
    pub trailer_payment: FixedCost,
    pub insurance: FixedCost,
    pub permits: FixedCost,
    pub subscriptions: FixedCost,
    pub parking: FixedCost,
    pub software: FixedCost,
    pub accounting: FixedCost,
    pub other_fixed_costs: Vec<NamedFixedCost>,

    pub margin_cents: f64,
    pub margin_percent: f64,
    pub use_whichever_greater: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_monthly_miles: Option<f64>,
}

impl CostModelSettings {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SettingsError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn mode(&self) -> CostMode {
        if self.use_pro_mode {
            CostMode::Detailed
        } else {
            CostMode::Simple
        }
    }

    /// Named fixed categories in display order.
    pub fn named_fixed_costs(&self) -> [(&'static str, FixedCost); 8] {
        [
            ("truck_payment", self.truck_payment),
            ("trailer_payment", self.trailer_payment),
            ("insurance", self.insurance),
            ("permits", self.permits),
            ("subscriptions", self.subscriptions),
            ("parking", self.parking),
            ("software", self.software),
            ("accounting", self.accounting),
        ]
    }

    /// Per-mile categories tracked in detailed mode, fuel excluded.
    pub fn mileage_costs(&self) -> [(&'static str, MileageCost); 5] {
        [
            ("tires", self.tires),
            ("maintenance", self.maintenance),
            ("oil", self.oil),
            ("def_fluid", self.def_fluid),
            ("tolls", self.tolls),
        ]
    }
}

impl Default for CostModelSettings {
    fn default() -> Self {
        Self {
            use_pro_mode: false,
            mpg: 0.0,
            fuel_price: 0.0,
            simple_maintenance: MileageCost::default(),
            simple_fixed_monthly: 0.0,
            tires: MileageCost::default(),
            maintenance: MileageCost::default(),
            oil: MileageCost::default(),
            def_fluid: MileageCost::default(),
            tolls: MileageCost::default(),
            truck_payment: FixedCost::default(),
            trailer_payment: FixedCost::default(),
            insurance: FixedCost::default(),
            permits: FixedCost::default(),
            subscriptions: FixedCost::default(),
            parking: FixedCost::default(),
            software: FixedCost::default(),
            accounting: FixedCost::default(),
            other_fixed_costs: Vec::new(),
            margin_cents: 0.0,
            margin_percent: 0.0,
            use_whichever_greater: false,
            planned_monthly_miles: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_camel_case_payloads() {
        let settings: CostModelSettings = serde_json::from_str(
            r#"{
                "useProMode": true,
                "mpg": 6.5,
                "fuelPrice": 3.9,
                "tires": { "dollars": 2400, "miles": 120000 },
                "insurance": { "amount": 14400, "period": 1, "unit": "year" },
                "otherFixedCosts": [{ "name": "phone", "amount": 80, "period": 1, "unit": "month" }],
                "marginCents": 15
            }"#,
        )
        .expect("settings parse");

        assert_eq!(settings.mode(), CostMode::Detailed);
        assert_eq!(settings.tires, MileageCost::new(2400.0, 120000.0));
        assert_eq!(settings.insurance.unit, PeriodUnit::Year);
        assert_eq!(settings.other_fixed_costs[0].name, "phone");
        assert_eq!(settings.truck_payment, FixedCost::monthly(0.0));
        assert!(!settings.use_whichever_greater);
    }

    #[test]
    fn fixed_cost_defaults_to_a_single_month() {
        let cost: FixedCost = serde_json::from_str(r#"{ "amount": 250 }"#).expect("parse");
        assert_eq!(cost, FixedCost::monthly(250.0));
    }

    #[test]
    fn cadence_names_the_billing_unit() {
        assert_eq!(FixedCost::monthly(120.0).cadence(), "per month");
        assert_eq!(
            FixedCost::new(600.0, 3.0, PeriodUnit::Month).cadence(),
            "every 3 months"
        );
        assert_eq!(
            FixedCost::new(16800.0, 1.0, PeriodUnit::Year).cadence(),
            "per year"
        );
        assert_eq!(
            FixedCost::new(150.0, 2.5, PeriodUnit::Week).cadence(),
            "every 2.5 weeks"
        );
    }

    #[test]
    fn mode_labels_match_the_wire_names() {
        for mode in [CostMode::Simple, CostMode::Detailed] {
            let wire = serde_json::to_value(mode).expect("serializes");
            assert_eq!(wire, mode.label());
        }
    }

    #[test]
    fn reader_reports_malformed_json() {
        let error = CostModelSettings::from_reader("{ \"mpg\": ".as_bytes())
            .expect_err("truncated payload");
        assert!(matches!(error, SettingsError::Json(_)));

        let settings =
            CostModelSettings::from_reader(r#"{ "mpg": 7 }"#.as_bytes()).expect("settings parse");
        assert_eq!(settings.mpg, 7.0);
    }
}
