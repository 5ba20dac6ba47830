use crate::infra::{parse_date, parse_override};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use haul_ai::error::AppError;
use haul_ai::workflows::cost_model::{
    CostMode, CostModelEvaluator, CostModelSettings, CostModelSummary, FixedCost, MileageCost,
    NamedFixedCost, PeriodUnit,
};
use haul_ai::workflows::inventory::{LoadInventory, LoadInventoryImporter};
use haul_ai::workflows::load_search::{
    search_loads, EffectiveFilterResult, InMemoryPresetCatalog, LoadId, LoadRecord,
    ProfitabilityReport, RawOverrides,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct LoadSearchArgs {
    /// Load export (CSV) to search
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Saved configuration id or name to start from
    #[arg(long)]
    pub(crate) configuration: Option<String>,
    /// Preset catalog JSON (defaults to the built-in presets)
    #[arg(long)]
    pub(crate) presets: Option<PathBuf>,
    /// Filter override as key=value, repeatable (e.g. --set maxDistance=1000+)
    #[arg(long = "set", value_parser = parse_override)]
    pub(crate) overrides: Vec<(String, String)>,
    /// Driver cost settings JSON used to rank the matches
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
    /// Maximum number of loads to print
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct CostSummaryArgs {
    /// Driver cost settings JSON
    #[arg(long)]
    pub(crate) settings: PathBuf,
    /// Evaluate in this mode instead of the one saved in the settings (simple or detailed)
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<CostMode>,
    /// Print the summary as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Configuration to demo
    #[arg(long, default_value = "high-paying-regional")]
    pub(crate) configuration: String,
    /// Use a real load export instead of the synthetic board
    #[arg(long)]
    pub(crate) loads_csv: Option<PathBuf>,
    /// First pickup date on the synthetic board (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) pickup_from: Option<NaiveDate>,
    /// Number of synthetic loads to generate
    #[arg(long, default_value_t = 60)]
    pub(crate) count: usize,
}

pub(crate) fn run_load_search(args: LoadSearchArgs) -> Result<(), AppError> {
    let LoadSearchArgs {
        csv,
        configuration,
        presets,
        overrides,
        settings,
        limit,
    } = args;

    let catalog = match presets {
        Some(path) => InMemoryPresetCatalog::from_path(path)?,
        None => InMemoryPresetCatalog::standard(),
    };
    let inventory = LoadInventoryImporter::from_path(csv)?;
    let overrides = RawOverrides::from_query_pairs(overrides);

    let result = search_loads(
        &catalog,
        configuration.as_deref(),
        &overrides,
        inventory.records(),
    )?;
    let report = match settings {
        Some(path) => {
            let settings = CostModelSettings::from_path(path)?;
            Some(ProfitabilityReport::build(&result.loads, &settings))
        }
        None => None,
    };

    render_search(&result, report.as_ref(), inventory.len(), limit);
    Ok(())
}

pub(crate) fn run_cost_summary(args: CostSummaryArgs) -> Result<(), AppError> {
    let settings = CostModelSettings::from_path(&args.settings)?;
    let mode = args.mode.unwrap_or_else(|| settings.mode());
    let summary = CostModelEvaluator::evaluate(&settings, mode);

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Summary unavailable: {}", err),
        }
    } else {
        render_cost_summary(&summary, &settings);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        configuration,
        loads_csv,
        pickup_from,
        count,
    } = args;

    let inventory = match loads_csv {
        Some(path) => LoadInventoryImporter::from_path(path)?,
        None => {
            let pickup_from = pickup_from.unwrap_or_else(|| Local::now().date_naive());
            LoadInventory::new(synthetic_loads(pickup_from, count))
        }
    };
    let catalog = InMemoryPresetCatalog::standard();
    let settings = demo_settings();

    println!("Load board demo");
    let summary = CostModelEvaluator::summarize(&settings);
    render_cost_summary(&summary, &settings);

    let plain = search_loads(
        &catalog,
        Some(configuration.as_str()),
        &RawOverrides::new(),
        inventory.records(),
    )?;
    println!("\nConfiguration '{}' as saved", configuration);
    let report = ProfitabilityReport::build(&plain.loads, &settings);
    render_search(&plain, Some(&report), inventory.len(), 10);

    let widened = RawOverrides::new()
        .with("maxDistance", "1000+")
        .with("serviceExclusions", "hazmat");
    let widened = search_loads(
        &catalog,
        Some(configuration.as_str()),
        &widened,
        inventory.records(),
    )?;
    println!("\nSame configuration, any distance, hazmat excluded");
    let report = ProfitabilityReport::build(&widened.loads, &settings);
    render_search(&widened, Some(&report), inventory.len(), 10);

    Ok(())
}

fn parse_mode(raw: &str) -> Result<CostMode, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "simple" => Ok(CostMode::Simple),
        "detailed" | "pro" => Ok(CostMode::Detailed),
        other => Err(format!("unknown cost mode '{other}' (use simple or detailed)")),
    }
}

pub(crate) fn render_search(
    result: &EffectiveFilterResult,
    report: Option<&ProfitabilityReport>,
    candidates: usize,
    limit: usize,
) {
    match &result.applied_preset {
        Some(preset) => println!("- Configuration: {} ({})", preset.name, preset.id),
        None => println!("- Configuration: none"),
    }
    let filters = &result.effective_filters;
    let max_distance = filters
        .max_distance
        .map(|miles| format!("{:.0}", miles))
        .unwrap_or_else(|| "unbounded".to_string());
    println!(
        "- Min loaded RPM ${:.2} | distance {:.0}-{} mi | confirmed only: {}",
        filters.min_loaded_rpm, filters.min_distance, max_distance, filters.confirmed_only
    );
    if !filters.service_exclusions.is_empty() {
        println!("- Excluding: {}", filters.service_exclusions.join(", "));
    }
    println!("- {} of {} loads match", result.loads.len(), candidates);

    match report {
        Some(report) => {
            println!(
                "- Target RPM ${:.2} (RCPM ${:.2} + ${:.2} margin)",
                report.summary.target_rpm, report.summary.rcpm, report.summary.margin_threshold
            );
            for entry in report.ranked.iter().take(limit) {
                let rate = entry
                    .verdict
                    .rate_per_mile
                    .map(|rate| format!("${:.2}/mi", rate))
                    .unwrap_or_else(|| "no rate".to_string());
                println!(
                    "  - {} {} -> {} | {:.0} mi | {} | {:+.2}/mi | net ${:.0} | {}",
                    entry.load_id.0,
                    entry.origin,
                    entry.destination,
                    entry.distance_num,
                    rate,
                    entry.verdict.margin_per_mile,
                    entry.verdict.signed_net_profit,
                    entry.badge
                );
            }
            let portfolio = &report.portfolio;
            println!(
                "- Portfolio: {} contribute | {} break even | {} burn cash | {} unclassified",
                portfolio.contributes, portfolio.breakeven, portfolio.burns, portfolio.unclassifiable
            );
            println!(
                "- Contribution ${:.0} | net after losers ${:.0}",
                portfolio.net_profit_total, portfolio.signed_net_profit
            );
            if let Some(LoadId(best)) = &portfolio.best_load_id {
                println!("- Best load: {}", best);
            }
        }
        None => {
            for load in result.loads.iter().take(limit) {
                println!(
                    "  - {} {} -> {} | {:.0} mi | ${:.2}/mi loaded | {}",
                    load.id.0,
                    load.origin,
                    load.destination,
                    load.distance_num,
                    load.loaded_rpm_num,
                    load.load_type
                );
            }
        }
    }
}

pub(crate) fn render_cost_summary(summary: &CostModelSummary, settings: &CostModelSettings) {
    println!("\nCost model ({} mode)", summary.mode.label());
    println!("- Rolling cost per mile ${:.3}", summary.rcpm);
    for component in &summary.components {
        println!("  - {}: ${:.3}/mi", component.category, component.per_mile);
    }
    println!(
        "- Fixed costs ${:.2}/month | ${:.2}/week | ${:.2}/day",
        summary.fixed_costs.monthly, summary.fixed_costs.weekly, summary.fixed_costs.daily
    );
    if summary.mode == CostMode::Detailed {
        for line in fixed_schedule(settings) {
            println!("  - {}", line);
        }
    }
    println!(
        "- Margin threshold ${:.3}/mi | target RPM ${:.2}",
        summary.margin_threshold, summary.target_rpm
    );
    if let (Some(fixed), Some(all_in)) = (summary.fixed_per_mile, summary.all_in_cost_per_mile) {
        println!("- Fixed per planned mile ${:.3} | all-in ${:.3}/mi", fixed, all_in);
    }
}

/// Non-zero fixed expenses with their billing cadence.
fn fixed_schedule(settings: &CostModelSettings) -> Vec<String> {
    let named: [(&str, FixedCost); 8] = settings.named_fixed_costs();
    let other = settings
        .other_fixed_costs
        .iter()
        .map(|entry| (entry.name.as_str(), entry.cost));

    named
        .into_iter()
        .chain(other)
        .filter(|(_, cost)| cost.amount > 0.0)
        .map(|(name, cost)| format!("{}: ${:.2} {}", name, cost.amount, cost.cadence()))
        .collect()
}

fn demo_settings() -> CostModelSettings {
    CostModelSettings {
        use_pro_mode: true,
        mpg: 6.4,
        fuel_price: 3.85,
        tires: MileageCost::new(3200.0, 150000.0),
        maintenance: MileageCost::new(1800.0, 12000.0),
        oil: MileageCost::new(450.0, 25000.0),
        def_fluid: MileageCost::new(90.0, 5000.0),
        tolls: MileageCost::new(120.0, 10000.0),
        truck_payment: FixedCost::monthly(2150.0),
        trailer_payment: FixedCost::monthly(650.0),
        insurance: FixedCost::new(16800.0, 1.0, PeriodUnit::Year),
        permits: FixedCost::new(2400.0, 1.0, PeriodUnit::Year),
        subscriptions: FixedCost::monthly(120.0),
        parking: FixedCost::new(75.0, 1.0, PeriodUnit::Week),
        software: FixedCost::monthly(60.0),
        accounting: FixedCost::new(600.0, 3.0, PeriodUnit::Month),
        other_fixed_costs: vec![NamedFixedCost {
            name: "phone".to_string(),
            cost: FixedCost::monthly(85.0),
        }],
        margin_cents: 20.0,
        margin_percent: 15.0,
        use_whichever_greater: false,
        planned_monthly_miles: Some(10500.0),
        ..CostModelSettings::default()
    }
}

const DEMO_LANES: [(&str, &str, f64); 8] = [
    ("Dallas, TX", "Houston, TX", 240.0),
    ("Dallas, TX", "Oklahoma City, OK", 205.0),
    ("Fort Worth, TX", "Memphis, TN", 480.0),
    ("Dallas, TX", "Atlanta, GA", 780.0),
    ("Waco, TX", "Denver, CO", 850.0),
    ("Dallas, TX", "Chicago, IL", 925.0),
    ("Tyler, TX", "Little Rock, AR", 290.0),
    ("Austin, TX", "Phoenix, AZ", 1010.0),
];

const DEMO_CUSTOMERS: [&str; 4] = ["Acme Foods", "Lone Star Paper", "Redline Auto", "Bayou Cold"];

/// Deterministic synthetic board cycling through lanes, equipment, and rates.
pub(crate) fn synthetic_loads(pickup_from: NaiveDate, count: usize) -> Vec<LoadRecord> {
    let base = pickup_from.and_hms_opt(6, 0, 0).unwrap_or_default().and_utc();

    (0..count)
        .map(|index| {
            let (origin, destination, lane_miles) = DEMO_LANES[index % DEMO_LANES.len()];
            let step = (index % 9) as f64;
            let distance = lane_miles + step * 7.0;
            let loaded_rpm = 1.65 + step * 0.16;
            let deadhead = ((index * 29) % 220) as f64;
            let total_rpm = loaded_rpm * distance / (distance + deadhead);
            let service_tags = match index % 5 {
                0 => vec!["hazmat".to_string()],
                1 => vec!["team".to_string(), "drop-and-hook".to_string()],
                2 => vec!["hazmat-placard".to_string()],
                _ => Vec::new(),
            };
            let pickup = base + Duration::hours((index as i64) * 3);
            let transit_hours = (distance / 50.0).ceil() as i64;

            LoadRecord {
                id: LoadId(format!("DEMO-{:03}", index + 1)),
                origin: origin.to_string(),
                destination: destination.to_string(),
                distance_num: distance,
                weight_num: 18000.0 + ((index * 2300) % 26000) as f64,
                loaded_rpm_num: loaded_rpm,
                total_rpm_num: (index % 7 != 0).then_some(total_rpm),
                price_num: Some(loaded_rpm * distance),
                distance_to_origin: deadhead,
                load_type: (if index % 4 == 3 { "Reefer" } else { "Dry Van" }).to_string(),
                customer: DEMO_CUSTOMERS[index % DEMO_CUSTOMERS.len()].to_string(),
                service_tags,
                confirmed_appointment: index % 3 != 1,
                pickup_date: pickup,
                drop_date: pickup + Duration::hours(transit_hours),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_board_is_deterministic() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date");
        let first = synthetic_loads(day, 24);
        let second = synthetic_loads(day, 24);

        assert_eq!(first, second);
        assert_eq!(first.len(), 24);
        assert_eq!(first[0].id.0, "DEMO-001");
        assert!(first.iter().all(|load| load.drop_date > load.pickup_date));
        assert!(first[0].total_rpm_num.is_none());
    }

    #[test]
    fn demo_preset_finds_contributing_loads() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date");
        let loads = synthetic_loads(day, 60);
        let result = search_loads(
            &InMemoryPresetCatalog::standard(),
            Some("high-paying-regional"),
            &RawOverrides::new(),
            &loads,
        )
        .expect("preset exists");

        assert!(!result.loads.is_empty());
        let report = ProfitabilityReport::build(&result.loads, &demo_settings());
        assert!(report.portfolio.contributes > 0);
    }

    #[test]
    fn fixed_schedule_lists_billed_categories() {
        let schedule = fixed_schedule(&demo_settings());

        assert_eq!(schedule.len(), 9);
        assert_eq!(schedule[0], "truck_payment: $2150.00 per month");
        assert!(schedule.contains(&"insurance: $16800.00 per year".to_string()));
        assert!(schedule.contains(&"accounting: $600.00 every 3 months".to_string()));
        assert_eq!(schedule[8], "phone: $85.00 per month");

        assert!(fixed_schedule(&CostModelSettings::default()).is_empty());
    }

    #[test]
    fn modes_parse_by_name() {
        assert_eq!(parse_mode("Detailed"), Ok(CostMode::Detailed));
        assert_eq!(parse_mode("simple"), Ok(CostMode::Simple));
        assert!(parse_mode("turbo").is_err());
    }
}
