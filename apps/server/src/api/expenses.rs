use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use super::{ApiJson, ApiQuery};
use crate::{
    auth::AuthUser,
    error::ApiResult,
    main_lib::AppState,
    models::{
        AddExpenseRequest, DeletedExpenseResponse, ExpenseListQuery, ExpenseListResponse,
        ExpenseResponse, UpdateExpenseRequest,
    },
};

async fn add_expense(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<AddExpenseRequest>,
) -> ApiResult<(StatusCode, Json<ExpenseResponse>)> {
    let new_expense = payload.into_new_expense()?;
    let expense = state
        .expense_service
        .add_expense(&user_id, new_expense)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse::new("Expense added successfully", expense)),
    ))
}

async fn get_all_expenses(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<ExpenseListQuery>,
) -> ApiResult<Json<ExpenseListResponse>> {
    let (filters, page, limit) = query.into_parts()?;
    let page = state
        .expense_service
        .get_expenses(&user_id, filters, page, limit)?;
    Ok(Json(ExpenseListResponse::from(page)))
}

async fn get_expense(
    Path(expense_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ExpenseResponse>> {
    let expense = state.expense_service.get_expense(&user_id, &expense_id)?;
    Ok(Json(ExpenseResponse::new(
        "Expense fetched successfully",
        expense,
    )))
}

async fn update_expense(
    Path(expense_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<UpdateExpenseRequest>,
) -> ApiResult<Json<ExpenseResponse>> {
    let update = payload.into_update()?;
    let expense = state
        .expense_service
        .update_expense(&user_id, &expense_id, update)
        .await?;
    Ok(Json(ExpenseResponse::new(
        "Expense updated successfully",
        expense,
    )))
}

async fn delete_expense(
    Path(expense_id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<DeletedExpenseResponse>> {
    let deleted_expense = state
        .expense_service
        .delete_expense(&user_id, &expense_id)
        .await?;
    Ok(Json(DeletedExpenseResponse {
        success: true,
        message: "Expense deleted successfully",
        deleted_expense,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/expense/add-expense", post(add_expense))
        .route("/expense/get-all-expense", get(get_all_expenses))
        .route(
            "/expense/update-expense/{expense_id}",
            put(update_expense),
        )
        .route(
            "/expense/delete-expense/{expense_id}",
            delete(delete_expense),
        )
        .route("/expense/{expense_id}", get(get_expense))
}
