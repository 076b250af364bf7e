//! REST client for the Budgetwise API.

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use budgetwise_core::budgets::{Budget, NewBudget};
use budgetwise_core::comparison::BudgetComparison;
use budgetwise_core::expenses::{Expense, ExpensePage, ExpenseUpdate, NewExpense};

use crate::error::{ClientError, Result};
use crate::types::*;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the Budgetwise REST API, bound to one user's access token.
#[derive(Debug, Clone)]
pub struct BudgetwiseClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl BudgetwiseClient {
    /// Create a new client.
    ///
    /// * `base_url` - server origin, e.g. "http://localhost:8080"
    /// * `token` - JWT issued by the identity provider
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ClientError::auth("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api/v1{}", self.base_url, path);
        self.client
            .request(method, url)
            .headers(self.headers.clone())
    }

    /// Parse a JSON response body.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(ClientError::api(status.as_u16(), error.message));
            }
            return Err(ClientError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to deserialize response. Body: {}, Error: {}", body, e);
            ClientError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        Self::parse_response(response).await
    }

    // Budgets

    /// POST /api/v1/budget/set-budget
    pub async fn set_budget(&self, budget: &NewBudget) -> Result<Budget> {
        let response: BudgetResponse =
            Self::send(self.request(Method::POST, "/budget/set-budget").json(budget)).await?;
        Ok(response.budget)
    }

    /// GET /api/v1/budget/get-all-budgets
    pub async fn get_budgets(&self, period: PeriodParams) -> Result<BudgetListResponse> {
        Self::send(
            self.request(Method::GET, "/budget/get-all-budgets")
                .query(&period),
        )
        .await
    }

    /// GET /api/v1/budget/{budgetId}
    pub async fn get_budget(&self, budget_id: &str) -> Result<Budget> {
        let path = format!("/budget/{}", urlencoding::encode(budget_id));
        let response: BudgetResponse = Self::send(self.request(Method::GET, &path)).await?;
        Ok(response.budget)
    }

    /// GET /api/v1/budget/category/{category}
    pub async fn get_budget_by_category(
        &self,
        category: &str,
        period: PeriodParams,
    ) -> Result<Budget> {
        let path = format!("/budget/category/{}", urlencoding::encode(category));
        let response: BudgetResponse =
            Self::send(self.request(Method::GET, &path).query(&period)).await?;
        Ok(response.budget)
    }

    /// DELETE /api/v1/budget/delete/{budgetId}
    pub async fn delete_budget(&self, budget_id: &str) -> Result<Budget> {
        let path = format!("/budget/delete/{}", urlencoding::encode(budget_id));
        let response: DeletedBudgetResponse =
            Self::send(self.request(Method::DELETE, &path)).await?;
        Ok(response.deleted_budget)
    }

    /// GET /api/v1/budget/comparison
    pub async fn get_comparison(&self, period: PeriodParams) -> Result<BudgetComparison> {
        let response: ComparisonResponse = Self::send(
            self.request(Method::GET, "/budget/comparison")
                .query(&period),
        )
        .await?;
        Ok(response.data)
    }

    // Expenses

    /// POST /api/v1/expense/add-expense
    pub async fn add_expense(&self, expense: &NewExpense) -> Result<Expense> {
        let response: ExpenseResponse =
            Self::send(self.request(Method::POST, "/expense/add-expense").json(expense)).await?;
        Ok(response.expense)
    }

    /// GET /api/v1/expense/get-all-expense
    pub async fn get_expenses(&self, params: &ExpenseListParams) -> Result<ExpensePage> {
        let response: ExpenseListResponse = Self::send(
            self.request(Method::GET, "/expense/get-all-expense")
                .query(params),
        )
        .await?;
        Ok(ExpensePage {
            expenses: response.expenses,
            pagination: response.pagination,
        })
    }

    /// GET /api/v1/expense/{expenseId}
    pub async fn get_expense(&self, expense_id: &str) -> Result<Expense> {
        let path = format!("/expense/{}", urlencoding::encode(expense_id));
        let response: ExpenseResponse = Self::send(self.request(Method::GET, &path)).await?;
        Ok(response.expense)
    }

    /// PUT /api/v1/expense/update-expense/{expenseId}
    pub async fn update_expense(&self, expense_id: &str, update: &ExpenseUpdate) -> Result<Expense> {
        let path = format!("/expense/update-expense/{}", urlencoding::encode(expense_id));
        let response: ExpenseResponse =
            Self::send(self.request(Method::PUT, &path).json(update)).await?;
        Ok(response.expense)
    }

    /// DELETE /api/v1/expense/delete-expense/{expenseId}
    pub async fn delete_expense(&self, expense_id: &str) -> Result<Expense> {
        let path = format!("/expense/delete-expense/{}", urlencoding::encode(expense_id));
        let response: DeletedExpenseResponse =
            Self::send(self.request(Method::DELETE, &path)).await?;
        Ok(response.deleted_expense)
    }
}
