use crate::cli::ServeArgs;
use crate::infra::{load_catalog, load_inventory, AppState, InMemoryCostModelRepository};
use crate::routes::with_load_board_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use haul_ai::config::AppConfig;
use haul_ai::error::AppError;
use haul_ai::telemetry;
use haul_ai::workflows::load_search::LoadBoardService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(loads_csv) = args.loads_csv.take() {
        config.data.loads_csv = Some(loads_csv);
    }
    if let Some(presets) = args.presets.take() {
        config.data.presets_path = Some(presets);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(load_catalog(&config.data)?);
    let inventory = Arc::new(load_inventory(&config.data)?);
    let cost_models = Arc::new(InMemoryCostModelRepository::default());
    info!(
        presets = catalog.len(),
        loads = inventory.len(),
        "load board data ready"
    );
    let board_service = Arc::new(LoadBoardService::new(catalog, inventory, cost_models));

    let app = with_load_board_routes(board_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "load board service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
