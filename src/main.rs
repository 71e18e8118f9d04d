use chrono::{Datelike, Utc};
use dotenvy::dotenv;
use finance_sync::{
    api::{FileSessionStore, HttpClient, MemorySessionStore, SessionStore},
    config::{
        environment::{self, PASSWORD_VAR, USERNAME_VAR},
        settings::{self, AggregationSettings},
    },
    core::dashboard::Dashboard,
    errors::{Error, Result},
    store::{FinanceStore, StoreOptions},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal
    dotenv().ok();

    // 3. Settings file plus environment overrides
    let mut settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    environment::apply_overrides(&mut settings);
    info!("Using backend at {}", settings.api.base_url);

    // 4. Session storage and client
    let session_store: Arc<dyn SessionStore> = match &settings.session.path {
        Some(path) => Arc::new(FileSessionStore::new(path)),
        None => Arc::new(MemorySessionStore::new()),
    };
    let client = Arc::new(HttpClient::new(&settings.api, session_store)?);

    // 5. Log in only when nothing is stored
    if !client.is_logged_in() {
        let credentials = environment::credentials().ok_or_else(|| Error::Auth {
            message: format!("No stored session; set {USERNAME_VAR} and {PASSWORD_VAR} to log in"),
        })?;
        client
            .login(&credentials.username, &credentials.password)
            .await
            .inspect_err(|e| error!("Login failed: {}", e))?;
    }

    // 6. Load everything and show the dashboard
    let store = FinanceStore::new(
        Arc::clone(&client),
        StoreOptions {
            fetch_timeout: settings.api.timeout(),
        },
    );
    store
        .fetch_all()
        .await
        .inspect_err(|e| {
            if e.is_auth() {
                error!("Session rejected, log in again: {}", e);
            } else {
                error!("Failed to load data: {}", e);
            }
        })?;

    let dashboard = store.dashboard(&settings.aggregation, Utc::now().year()).await;
    print_dashboard(&dashboard, &settings.aggregation);
    Ok(())
}

fn print_dashboard(dashboard: &Dashboard, settings: &AggregationSettings) {
    let summary = &dashboard.summary;
    println!("Income:        {:>12.2}", summary.total_income);
    println!("Expenses:      {:>12.2}", summary.total_expenses);
    println!("Balance:       {:>12.2}", summary.balance);
    println!("Savings rate:  {:>11.1}%", summary.savings_rate);
    println!("Budget health: {:>11.1}%", summary.budget_health.clamp(0.0, 100.0));

    if !dashboard.budgets.is_empty() {
        println!("\nBudgets");
        for progress in &dashboard.budgets {
            println!(
                "  {:<20} {:>10.2} / {:>10.2}  {:>6.1}%  {}",
                progress.category_name,
                progress.spent,
                progress.limit,
                progress.percentage,
                progress.status.label()
            );
        }
    }

    if !dashboard.attention.is_empty() {
        println!("\nNeeds attention");
        for item in &dashboard.attention {
            println!("  {:<20} {:>6.1}% used", item.name, item.percentage_used);
        }
    }

    if !dashboard.breakdown.is_empty() {
        println!("\nSpending by category");
        for spending in &dashboard.breakdown {
            println!("  {:<20} {:>10.2}", spending.name, spending.total);
        }
    }

    let months = dashboard.chart_months(settings);
    if months.is_empty() {
        println!("\nNo transactions recorded for {}", dashboard.trend.year);
    } else {
        println!("\nTrend {}", dashboard.trend.year);
        for month in months {
            println!(
                "  {}  income {:>10.2}  expenses {:>10.2}",
                month.label, month.income, month.expenses
            );
        }
    }
}
