//! Salon Inventory - command line client
//!
//! Restores or opens a session, prints the dashboard summary, warns about
//! materials that ran out and, for admins, confirms or returns a supply
//! given on the command line and exports the recent usage report.

use std::sync::Arc;

use chrono::{Duration, Utc};
use salon_inventory::{
    reports, ApiClient, Config, ConfirmationWorkflow, EntityListController, Notification, Notifier,
    Services, Session, SupplyBoard, TokenFile, TracingNotifier,
};
use shared::{DateRange, Id, LoginCredentials, SupplyFilter, SupplyStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salon_inventory=debug,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    let lang = config.ui.language();

    tracing::info!("Starting Salon Inventory client");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Backend: {}", config.api.base_url);

    let session = Session::with_store(TokenFile::new(&config.session.token_file));
    let services = Services::new(ApiClient::new(&config.api, session.clone())?);
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

    if !session.init()? {
        let Some(login) = &config.login else {
            anyhow::bail!("no stored session; set SALON_LOGIN__EMAIL and SALON_LOGIN__PASSWORD");
        };
        let credentials = LoginCredentials {
            email: login.email.clone(),
            password: login.password.clone(),
        };
        if let Err(e) = services.auth.login(&credentials).await {
            notifier.notify(Notification::from_error(&e, lang));
            return Err(e.into());
        }
    }

    let user = session.require_user()?;
    let dashboard = services.dashboard.current().await?;
    tracing::info!(
        "{}: {} materials ({} units in stock), {} suppliers, {} employees",
        user.username,
        dashboard.total_materials,
        dashboard.total_amount_in_stock,
        dashboard.total_suppliers,
        dashboard.total_employees
    );

    for material in dashboard.out_of_stock_alert() {
        notifier.notify(Notification::warning(format!(
            "{}: {}",
            lang.pick("Закінчився матеріал", "Out of stock"),
            material.name
        )));
    }

    if !user.is_admin() {
        return Ok(());
    }

    // Pending supplies awaiting a decision
    let pending = EntityListController::with_filters(
        services.supplies.clone(),
        Arc::clone(&notifier),
        lang,
        SupplyFilter {
            status: Some(SupplyStatus::Pending),
            ..SupplyFilter::default()
        },
    );
    let workflow = ConfirmationWorkflow::from_config(Arc::new(services.clone()), &config.workflow);
    let mut board = SupplyBoard::new(pending, workflow, session.clone(), Arc::clone(&notifier), lang);
    board.refresh().await;
    if board.list().total_elements() > 0 {
        tracing::info!("{} supplies await confirmation", board.list().total_elements());
    }

    // `salon-inventory confirm <id>` or `salon-inventory reject <id>`
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [action, id] = args.as_slice() {
        let id: Id = id.parse()?;
        match action.as_str() {
            "confirm" => {
                board.confirm(id).await?;
            }
            "reject" => board.reject(id).await?,
            other => anyhow::bail!("unknown action {}; expected confirm or reject", other),
        }
    }

    let today = Utc::now().date_naive();
    let range = DateRange::new(today - Duration::days(config.report.default_days), today)
        .map_err(anyhow::Error::msg)?;
    match reports::export_usage_report(
        &services.usage,
        range,
        &config.report.output_dir,
        lang,
        notifier.as_ref(),
    )
    .await
    {
        Ok(Some(path)) => tracing::info!("Usage report saved to {}", path.display()),
        Ok(None) => {}
        Err(e) => notifier.notify(Notification::from_error(&e, lang)),
    }

    Ok(())
}
