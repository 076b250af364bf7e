mod common;

use axum::http::StatusCode;
use common::{spawn_app, TestApp};
use serde_json::{json, Value};

async fn set_budget(app: &TestApp, user: &str, category: &str, amount: Value) -> Value {
    let (status, body) = app
        .post(
            "/api/v1/budget/set-budget",
            user,
            json!({"category": category, "amount": amount, "month": 3, "year": 2024}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

async fn add_expense(app: &TestApp, user: &str, category: &str, amount: f64, date: &str) {
    let (status, body) = app
        .post(
            "/api/v1/expense/add-expense",
            user,
            json!({"amount": amount, "category": category, "date": date}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn set_budget_creates_then_replaces() {
    let app = spawn_app().await;

    let created = set_budget(&app, "user-1", "Food", json!(500)).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Budget set successfully");
    assert_eq!(created["budget"]["category"], "Food");
    assert_eq!(created["budget"]["amount"].as_f64(), Some(500.0));
    assert_eq!(created["budget"]["month"], 3);
    assert_eq!(created["budget"]["year"], 2024);
    assert_eq!(created["budget"]["userId"], "user-1");

    let replaced = set_budget(&app, "user-1", "Food", json!("650.50")).await;
    assert_eq!(replaced["budget"]["id"], created["budget"]["id"]);
    assert_eq!(replaced["budget"]["amount"].as_f64(), Some(650.5));

    let (_, listed) = app
        .get("/api/v1/budget/get-all-budgets?month=3&year=2024", "user-1")
        .await;
    assert_eq!(listed["budgets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn set_budget_rejects_bad_input() {
    let app = spawn_app().await;
    let cases = [
        (
            json!({"category": "Food", "amount": 10, "month": 3}),
            "Category, amount, month, and year are required",
        ),
        (
            json!({"category": "Groceries", "amount": 10, "month": 3, "year": 2024}),
            "Invalid category",
        ),
        (
            json!({"category": "food", "amount": 10, "month": 3, "year": 2024}),
            "Invalid category",
        ),
        (
            json!({"category": "Food", "amount": 0, "month": 3, "year": 2024}),
            "Amount must be a positive number",
        ),
        (
            json!({"category": "Food", "amount": "-4", "month": 3, "year": 2024}),
            "Amount must be a positive number",
        ),
        (
            json!({"category": "Food", "amount": 10, "month": 13, "year": 2024}),
            "Month must be in between 1 and 12",
        ),
    ];

    for (body, message) in cases {
        let (status, response) = app.post("/api/v1/budget/set-budget", "user-1", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"success": false, "message": message}));
    }

    let (_, listed) = app
        .get("/api/v1/budget/get-all-budgets?month=3&year=2024", "user-1")
        .await;
    assert_eq!(listed["budgets"], json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = spawn_app().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/budget/set-budget")
        .header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", app.token("user-1")),
        )
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn list_budgets_orders_by_category_and_echoes_period() {
    let app = spawn_app().await;
    for category in ["Travel", "Bills", "Food"] {
        set_budget(&app, "user-1", category, json!(100)).await;
    }
    set_budget(&app, "user-2", "Shopping", json!(100)).await;

    let (status, body) = app
        .get("/api/v1/budget/get-all-budgets?month=3&year=2024", "user-1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Budgets fetched successfully");
    assert_eq!(body["month"], 3);
    assert_eq!(body["year"], 2024);
    let categories: Vec<&str> = body["budgets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["Bills", "Food", "Travel"]);

    let (status, body) = app
        .get("/api/v1/budget/get-all-budgets?month=4&year=2024", "user-1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No budgets found");
    assert_eq!(body["month"], 4);

    let (status, body) = app
        .get("/api/v1/budget/get-all-budgets?month=abc", "user-1")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Month must be in between 1 and 12");
}

#[tokio::test]
async fn budget_lookups_are_scoped_to_owner() {
    let app = spawn_app().await;
    let created = set_budget(&app, "user-1", "Bills", json!(120)).await;
    let id = created["budget"]["id"].as_str().unwrap();

    let (status, body) = app.get(&format!("/api/v1/budget/{id}"), "user-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Budget fetched successfully");
    assert_eq!(body["budget"]["id"], id);

    let (status, body) = app.get(&format!("/api/v1/budget/{id}"), "user-2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Budget not found or you don't have permission to access it"
    );

    let (status, _) = app.get("/api/v1/budget/missing-id", "user-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn budget_by_category() {
    let app = spawn_app().await;
    set_budget(&app, "user-1", "Food", json!(500)).await;

    let (status, body) = app
        .get("/api/v1/budget/category/Food?month=3&year=2024", "user-1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["budget"]["amount"].as_f64(), Some(500.0));

    let (status, body) = app
        .get("/api/v1/budget/category/Healthcare?month=3&year=2024", "user-1")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Budget not found for this category");

    let (status, body) = app
        .get("/api/v1/budget/category/Groceries?month=3&year=2024", "user-1")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid category");

    let (status, _) = app
        .get("/api/v1/budget/category/Food?month=3&year=2024", "user-2")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_budget_returns_the_removed_record() {
    let app = spawn_app().await;
    let created = set_budget(&app, "user-1", "Others", json!(20)).await;
    let id = created["budget"]["id"].as_str().unwrap();

    let (status, _) = app
        .delete(&format!("/api/v1/budget/delete/{id}"), "user-2")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .delete(&format!("/api/v1/budget/delete/{id}"), "user-1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Budget deleted successfully");
    assert_eq!(body["deletedBudget"]["id"], id);

    let (status, _) = app
        .delete(&format!("/api/v1/budget/delete/{id}"), "user-1")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comparison_for_march_2024() {
    let app = spawn_app().await;
    set_budget(&app, "user-1", "Food", json!(500)).await;
    set_budget(&app, "user-1", "Travel", json!(200)).await;
    add_expense(&app, "user-1", "Food", 150.0, "2024-03-02").await;
    add_expense(&app, "user-1", "Food", 100.0, "2024-03-31T23:59:59").await;
    add_expense(&app, "user-1", "Travel", 250.0, "2024-03-18T12:00:00Z").await;
    // Outside the month or owned by someone else.
    add_expense(&app, "user-1", "Food", 999.0, "2024-04-01").await;
    add_expense(&app, "user-2", "Food", 999.0, "2024-03-10").await;

    let (status, body) = app
        .get("/api/v1/budget/comparison?month=3&year=2024", "user-1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Budget comparison fetched successfully");

    let data = &body["data"];
    assert_eq!(data["month"], 3);
    assert_eq!(data["year"], 2024);

    let food = &data["categories"][0];
    assert_eq!(food["category"], "Food");
    assert_eq!(food["budgetAmount"].as_f64(), Some(500.0));
    assert_eq!(food["spentAmount"].as_f64(), Some(250.0));
    assert_eq!(food["remainingAmount"].as_f64(), Some(250.0));
    assert_eq!(food["percentageUsed"].as_f64(), Some(50.0));
    assert_eq!(food["isOverBudget"], false);

    let travel = &data["categories"][1];
    assert_eq!(travel["category"], "Travel");
    assert_eq!(travel["remainingAmount"].as_f64(), Some(-50.0));
    assert_eq!(travel["percentageUsed"].as_f64(), Some(125.0));
    assert_eq!(travel["isOverBudget"], true);

    let summary = &data["summary"];
    assert_eq!(summary["totalBudget"].as_f64(), Some(700.0));
    assert_eq!(summary["totalSpent"].as_f64(), Some(500.0));
    assert_eq!(summary["totalRemaining"].as_f64(), Some(200.0));
    assert_eq!(summary["overallPercentageUsed"].as_f64(), Some(71.43));
}

#[tokio::test]
async fn comparison_counts_unbudgeted_spend_in_total_only() {
    let app = spawn_app().await;
    set_budget(&app, "user-1", "Food", json!(100)).await;
    add_expense(&app, "user-1", "Shopping", 40.0, "2024-03-05").await;

    let (_, body) = app
        .get("/api/v1/budget/comparison?month=3&year=2024", "user-1")
        .await;
    let data = &body["data"];
    assert_eq!(data["categories"].as_array().unwrap().len(), 1);
    assert_eq!(data["categories"][0]["spentAmount"].as_f64(), Some(0.0));
    assert_eq!(data["summary"]["totalSpent"].as_f64(), Some(40.0));
    assert_eq!(data["summary"]["totalRemaining"].as_f64(), Some(60.0));
}
