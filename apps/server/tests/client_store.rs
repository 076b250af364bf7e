//! Drives the HTTP client and its cache against a live server.

mod common;

use std::str::FromStr;

use budgetwise_client::{
    BudgetStore, BudgetwiseClient, ClientError, ExpenseListParams, PeriodParams,
};
use budgetwise_core::budgets::NewBudget;
use budgetwise_core::categories::Category;
use budgetwise_core::expenses::{ExpenseUpdate, NewExpense};
use budgetwise_core::Period;
use budgetwise_server::{api::app_router, build_state};
use chrono::NaiveDate;
use common::test_config;
use rust_decimal::Decimal;
use tempfile::{tempdir, TempDir};

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn serve(user_id: &str) -> (BudgetStore, TempDir) {
    let dir = tempdir().unwrap();
    let config = test_config(&dir);
    let state = build_state(&config).await.unwrap();
    let token = state.auth.issue_token(user_id).unwrap();
    let router = app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = BudgetwiseClient::new(&format!("http://{addr}"), &token).unwrap();
    (BudgetStore::new(client), dir)
}

fn march() -> Period {
    Period::new(3, 2024).unwrap()
}

#[tokio::test]
async fn store_keeps_cache_in_step_with_server() {
    let (store, _dir) = serve("user-1").await;

    store.load_budgets(march()).await.unwrap();
    store.load_comparison(march()).await.unwrap();

    let food = store
        .set_budget(NewBudget {
            category: "Food".to_string(),
            amount: dec("500"),
            month: 3,
            year: 2024,
        })
        .await
        .unwrap();
    store.read(|cache| {
        assert_eq!(cache.budgets(march()).unwrap(), &[food.clone()][..]);
        assert!(cache.comparison(march()).is_none());
    });

    let date = NaiveDate::from_ymd_opt(2024, 3, 12)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap();
    store
        .load_expenses(&ExpenseListParams::default())
        .await
        .unwrap();
    let lunch = store
        .add_expense(NewExpense {
            amount: dec("620"),
            category: "Food".to_string(),
            description: Some("Banquet".to_string()),
            date: Some(date),
        })
        .await
        .unwrap();
    assert_eq!(lunch.date, date);
    store.read(|cache| {
        assert_eq!(cache.expenses().len(), 1);
        assert_eq!(cache.expenses()[0].id, lunch.id);
    });

    let comparison = store.load_comparison(march()).await.unwrap();
    assert_eq!(comparison.categories[0].category, Category::Food);
    assert_eq!(comparison.categories[0].spent_amount, dec("620"));
    assert!(comparison.categories[0].is_over_budget);
    store.read(|cache| {
        assert_eq!(cache.over_budget_categories(march()).len(), 1);
        assert_eq!(cache.utilization(march()), dec("124"));
    });

    let updated = store
        .update_expense(
            &lunch.id,
            ExpenseUpdate {
                amount: Some(dec("120")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, dec("120"));
    assert_eq!(updated.description.as_deref(), Some("Banquet"));
    store.read(|cache| {
        assert_eq!(cache.total_expenses(), dec("120"));
        assert!(cache.comparison(march()).is_none());
    });

    let client = store.client();
    assert_eq!(client.get_expense(&lunch.id).await.unwrap().amount, dec("120"));
    let by_category = client
        .get_budget_by_category(
            "Food",
            PeriodParams {
                month: Some(3),
                year: Some(2024),
            },
        )
        .await
        .unwrap();
    assert_eq!(by_category.id, food.id);

    store.delete_expense(&lunch.id).await.unwrap();
    store.delete_budget(&food.id).await.unwrap();
    store.read(|cache| {
        assert!(cache.expenses().is_empty());
        assert!(cache.budgets(march()).unwrap().is_empty());
    });
}

#[tokio::test]
async fn server_rejection_rolls_back_and_surfaces_message() {
    let (store, _dir) = serve("user-1").await;
    store.load_budgets(march()).await.unwrap();

    let err = store.delete_budget("missing").await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(
                message,
                "Budget not found or you don't have permission to access it"
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    store.read(|cache| assert!(cache.budgets(march()).unwrap().is_empty()));

    let err = store.client().get_expense("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
