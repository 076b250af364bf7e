use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use budgetwise_core::Period;

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthUser,
    error::ApiResult,
    main_lib::AppState,
    models::{
        BudgetListResponse, BudgetResponse, ComparisonResponse, DeletedBudgetResponse,
        PeriodQuery, SetBudgetRequest,
    },
};

async fn set_budget(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<SetBudgetRequest>,
) -> ApiResult<Json<BudgetResponse>> {
    let new_budget = payload.into_new_budget()?;
    let budget = state.budget_service.set_budget(&user_id, new_budget).await?;
    Ok(Json(BudgetResponse::new("Budget set successfully", budget)))
}

async fn get_all_budgets(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Json<BudgetListResponse>> {
    let (month, year) = query.resolve()?;
    let period = Period::resolve(month, year)?;
    let budgets = state.budget_service.get_budgets(&user_id, period)?;
    let message = if budgets.is_empty() {
        "No budgets found"
    } else {
        "Budgets fetched successfully"
    };
    Ok(Json(BudgetListResponse {
        success: true,
        message,
        budgets,
        month: period.month(),
        year: period.year(),
    }))
}

async fn get_budget(
    Path(budget_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<BudgetResponse>> {
    let budget = state.budget_service.get_budget(&user_id, &budget_id)?;
    Ok(Json(BudgetResponse::new("Budget fetched successfully", budget)))
}

async fn get_budget_by_category(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Json<BudgetResponse>> {
    let (month, year) = query.resolve()?;
    let budget = state
        .budget_service
        .get_budget_by_category(&user_id, &category, month, year)?;
    Ok(Json(BudgetResponse::new("Budget fetched successfully", budget)))
}

async fn delete_budget(
    Path(budget_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<DeletedBudgetResponse>> {
    let deleted_budget = state
        .budget_service
        .delete_budget(&user_id, &budget_id)
        .await?;
    Ok(Json(DeletedBudgetResponse {
        success: true,
        message: "Budget deleted successfully",
        deleted_budget,
    }))
}

async fn get_comparison(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Json<ComparisonResponse>> {
    let (month, year) = query.resolve()?;
    let data = state
        .comparison_service
        .get_comparison(&user_id, month, year)?;
    Ok(Json(ComparisonResponse {
        success: true,
        message: "Budget comparison fetched successfully",
        data,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budget/set-budget", post(set_budget))
        .route("/budget/get-all-budgets", get(get_all_budgets))
        .route("/budget/comparison", get(get_comparison))
        .route("/budget/category/{category}", get(get_budget_by_category))
        .route("/budget/delete/{budget_id}", delete(delete_budget))
        .route("/budget/{budget_id}", get(get_budget))
}
