//! Driver operating cost model and the per-load profitability verdicts derived from it.

mod evaluator;
pub mod profitability;
pub mod repository;
pub mod settings;
pub mod units;

pub use evaluator::{
    margin_threshold, CostComponent, CostModelEvaluator, CostModelSummary, FixedCostTotals,
};
pub use profitability::{
    annotate, annotate_all, classify, rank, AnnotatedLoad, ProfitabilityClass,
    ProfitabilityPortfolio, ProfitabilityVerdict,
};
pub use repository::{CostModelRepository, RepositoryError};
pub use settings::{
    CostMode, CostModelSettings, DriverId, FixedCost, MileageCost, NamedFixedCost, SettingsError,
};
pub use units::{per_mile, to_monthly, PeriodUnit, DAYS_PER_MONTH, WEEKS_PER_MONTH};
