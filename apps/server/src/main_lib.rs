use std::sync::Arc;

use crate::{auth::AuthManager, config::Config};
use budgetwise_core::{
    budgets::{BudgetService, BudgetServiceTrait},
    comparison::{ComparisonService, ComparisonServiceTrait},
    expenses::{ExpenseService, ExpenseServiceTrait},
};
use budgetwise_storage_sqlite::{db, BudgetRepository, DbPool, ExpenseRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub expense_service: Arc<dyn ExpenseServiceTrait>,
    pub comparison_service: Arc<dyn ComparisonServiceTrait>,
    pub pool: Arc<DbPool>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let log_format = std::env::var("BW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let budget_service: Arc<dyn BudgetServiceTrait> =
        Arc::new(BudgetService::new(budget_repository));

    let expense_repository = Arc::new(ExpenseRepository::new(pool.clone(), writer.clone()));
    let expense_service: Arc<dyn ExpenseServiceTrait> =
        Arc::new(ExpenseService::new(expense_repository));

    let comparison_service: Arc<dyn ComparisonServiceTrait> = Arc::new(ComparisonService::new(
        budget_service.clone(),
        expense_service.clone(),
    ));

    Ok(Arc::new(AppState {
        budget_service,
        expense_service,
        comparison_service,
        pool,
        auth: Arc::new(AuthManager::new(&config.auth)),
    }))
}
