use serde::{Deserialize, Serialize};

/// Weeks per month used for every week/month conversion.
pub const WEEKS_PER_MONTH: f64 = 4.33;
/// Days per month used when spreading monthly fixed costs to a daily figure.
pub const DAYS_PER_MONTH: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Billing cadence attached to a fixed expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Week,
    #[default]
    Month,
    Year,
}

impl PeriodUnit {
    pub const fn label(self) -> &'static str {
        match self {
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
            PeriodUnit::Year => "year",
        }
    }
}

/// Rate per mile, zero whenever the mileage cannot be used as a denominator.
pub fn per_mile(dollars: f64, miles: f64) -> f64 {
    if !dollars.is_finite() || !miles.is_finite() || miles <= 0.0 {
        return 0.0;
    }
    dollars / miles
}

/// Normalizes `amount` paid every `period` units to a monthly figure.
pub fn to_monthly(amount: f64, period: f64, unit: PeriodUnit) -> f64 {
    if !amount.is_finite() || !period.is_finite() || period <= 0.0 {
        return 0.0;
    }

    let per_unit = amount / period;
    match unit {
        PeriodUnit::Week => per_unit * WEEKS_PER_MONTH,
        PeriodUnit::Month => per_unit,
        PeriodUnit::Year => per_unit / MONTHS_PER_YEAR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_mile_divides_usable_pairs() {
        assert_eq!(per_mile(300.0, 1500.0), 0.2);
        assert_eq!(per_mile(0.0, 10.0), 0.0);
    }

    #[test]
    fn per_mile_zeroes_unusable_denominators() {
        assert_eq!(per_mile(120.0, 0.0), 0.0);
        assert_eq!(per_mile(120.0, -5.0), 0.0);
        assert_eq!(per_mile(120.0, f64::NAN), 0.0);
        assert_eq!(per_mile(f64::INFINITY, 100.0), 0.0);
    }

    #[test]
    fn to_monthly_rescales_by_unit() {
        assert_eq!(to_monthly(100.0, 1.0, PeriodUnit::Week), 100.0 * 4.33);
        assert_eq!(to_monthly(1200.0, 1.0, PeriodUnit::Year), 100.0);
        assert_eq!(to_monthly(900.0, 3.0, PeriodUnit::Month), 300.0);
        assert_eq!(to_monthly(200.0, 2.0, PeriodUnit::Week), 100.0 * 4.33);
    }

    #[test]
    fn to_monthly_rejects_invalid_periods() {
        assert_eq!(to_monthly(500.0, 0.0, PeriodUnit::Month), 0.0);
        assert_eq!(to_monthly(500.0, -1.0, PeriodUnit::Week), 0.0);
        assert_eq!(to_monthly(f64::NAN, 1.0, PeriodUnit::Year), 0.0);
        assert_eq!(to_monthly(500.0, f64::INFINITY, PeriodUnit::Month), 0.0);
    }
}
