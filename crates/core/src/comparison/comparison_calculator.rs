//! Pure budget-vs-actual reduction.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::comparison_model::{BudgetComparison, CategoryComparison, ComparisonSummary};
use crate::budgets::Budget;
use crate::categories::Category;
use crate::expenses::Expense;
use crate::utils::{percentage_of, Period};

/// Sums expense amounts per category. Categories without expenses are absent.
pub fn spend_by_category(expenses: &[Expense]) -> HashMap<Category, Decimal> {
    let mut spent: HashMap<Category, Decimal> = HashMap::new();
    for expense in expenses {
        *spent.entry(expense.category).or_insert(Decimal::ZERO) += expense.amount;
    }
    spent
}

/// Merges a period's budgets with the expenses that fall inside it.
///
/// The category list follows the order of `budgets`. Spend in categories
/// without a budget is left out of the list but still counts toward
/// `total_spent`.
pub fn build_comparison(
    period: Period,
    budgets: &[Budget],
    expenses: &[Expense],
) -> BudgetComparison {
    let spent = spend_by_category(expenses);

    let categories: Vec<CategoryComparison> = budgets
        .iter()
        .map(|budget| {
            let spent_amount = spent.get(&budget.category).copied().unwrap_or_default();
            CategoryComparison {
                category: budget.category,
                budget_amount: budget.amount,
                spent_amount,
                remaining_amount: budget.amount - spent_amount,
                percentage_used: percentage_of(spent_amount, budget.amount),
                is_over_budget: spent_amount > budget.amount,
            }
        })
        .collect();

    let total_budget: Decimal = budgets.iter().map(|b| b.amount).sum();
    let total_spent: Decimal = spent.values().copied().sum();

    BudgetComparison {
        month: period.month(),
        year: period.year(),
        categories,
        summary: ComparisonSummary {
            total_budget,
            total_spent,
            total_remaining: total_budget - total_spent,
            overall_percentage_used: percentage_of(total_spent, total_budget),
        },
    }
}
