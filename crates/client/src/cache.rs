//! Explicit client-side cache of budgets, comparisons and the last expense page.
//!
//! Invalidation rules:
//! - a budget write patches that period's budget list and drops its comparison;
//! - an expense write patches the cached page and drops every comparison.
//!
//! The expense page remembers the filters and page size it was loaded with,
//! so a patch only places an expense where the server would have listed it
//! and keeps `pagination` in step with the change.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use budgetwise_core::budgets::Budget;
use budgetwise_core::categories::Category;
use budgetwise_core::comparison::{BudgetComparison, CategoryComparison, ComparisonSummary};
use budgetwise_core::expenses::{
    Expense, ExpenseFilters, ExpensePage, ExpenseQuery, PageRequest, Pagination,
};
use budgetwise_core::utils::{parse_timestamp, Period};

use crate::types::ExpenseListParams;

/// Filters and paging a cached expense page was requested with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseView {
    pub query: ExpenseQuery,
    pub request: PageRequest,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ExpenseView {
    /// Validates listing parameters the same way the server does.
    pub fn from_params(params: &ExpenseListParams) -> budgetwise_core::Result<Self> {
        let filters = ExpenseFilters {
            category: present(&params.category).map(str::to_string),
            start_date: present(&params.start_date).map(parse_timestamp).transpose()?,
            end_date: present(&params.end_date).map(parse_timestamp).transpose()?,
        };
        Ok(ExpenseView {
            query: filters.validate()?,
            request: PageRequest::new(params.page, params.limit)?,
        })
    }
}

#[derive(Debug, Clone)]
struct CachedPage {
    page: ExpensePage,
    view: ExpenseView,
}

/// Listing order: newest date first, then newest creation.
fn listing_order(a: &Expense, b: &Expense) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

impl CachedPage {
    fn position(&self, expense_id: &str) -> Option<usize> {
        self.page.expenses.iter().position(|e| e.id == expense_id)
    }

    fn recount(&mut self, total: i64) {
        self.page.pagination = Pagination::new(self.view.request, total);
    }

    /// Counts a new matching expense and places it if it falls on this page.
    fn insert(&mut self, expense: Expense) {
        if !self.view.query.matches(&expense) {
            return;
        }
        let total = self.page.pagination.total_expenses + 1;
        self.recount(total);

        let page_size = self.view.request.page_size as usize;
        let expenses = &mut self.page.expenses;
        match expenses
            .iter()
            .position(|e| listing_order(&expense, e) == Ordering::Less)
        {
            // Sorts ahead of everything here, so it belongs to an earlier page.
            Some(0) if self.view.request.page > 1 => return,
            Some(index) => expenses.insert(index, expense),
            None if expenses.len() < page_size => expenses.push(expense),
            None => return,
        }
        expenses.truncate(page_size);
    }

    fn remove(&mut self, expense_id: &str) -> Option<Expense> {
        let index = self.position(expense_id)?;
        let removed = self.page.expenses.remove(index);
        let total = self.page.pagination.total_expenses - 1;
        self.recount(total);
        Some(removed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientCache {
    budgets: HashMap<Period, Vec<Budget>>,
    comparisons: HashMap<Period, BudgetComparison>,
    expense_page: Option<CachedPage>,
}

fn budget_period(budget: &Budget) -> Option<Period> {
    Period::new(budget.month, budget.year).ok()
}

fn sort_budgets(list: &mut [Budget]) {
    list.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()));
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Reads

    pub fn budgets(&self, period: Period) -> Option<&[Budget]> {
        self.budgets.get(&period).map(Vec::as_slice)
    }

    pub fn comparison(&self, period: Period) -> Option<&BudgetComparison> {
        self.comparisons.get(&period)
    }

    pub fn expense_page(&self) -> Option<&ExpensePage> {
        self.expense_page.as_ref().map(|cached| &cached.page)
    }

    pub fn expense_view(&self) -> Option<&ExpenseView> {
        self.expense_page.as_ref().map(|cached| &cached.view)
    }

    /// Expenses of the cached page, or nothing.
    pub fn expenses(&self) -> &[Expense] {
        self.expense_page()
            .map(|page| page.expenses.as_slice())
            .unwrap_or(&[])
    }

    // Fills from the server

    pub fn store_budgets(&mut self, period: Period, mut budgets: Vec<Budget>) {
        sort_budgets(&mut budgets);
        self.budgets.insert(period, budgets);
    }

    pub fn store_comparison(&mut self, comparison: BudgetComparison) {
        if let Ok(period) = Period::new(comparison.month, comparison.year) {
            self.comparisons.insert(period, comparison);
        }
    }

    pub fn store_expense_page(&mut self, page: ExpensePage, view: ExpenseView) {
        self.expense_page = Some(CachedPage { page, view });
    }

    // Budget patches

    /// Puts a budget into its period's cached list, replacing the entry with
    /// the same id or category. Drops the period's comparison.
    pub fn budget_saved(&mut self, budget: Budget) {
        let Some(period) = budget_period(&budget) else {
            return;
        };
        self.comparisons.remove(&period);

        let Some(list) = self.budgets.get_mut(&period) else {
            return;
        };
        match list
            .iter_mut()
            .find(|b| b.id == budget.id || b.category == budget.category)
        {
            Some(existing) => *existing = budget,
            None => {
                list.push(budget);
                sort_budgets(list);
            }
        }
    }

    /// Removes a budget from whichever period holds it and returns that period.
    pub fn budget_removed(&mut self, budget_id: &str) -> Option<Period> {
        let period = self.find_budget_period(budget_id)?;
        if let Some(list) = self.budgets.get_mut(&period) {
            list.retain(|b| b.id != budget_id);
        }
        self.comparisons.remove(&period);
        Some(period)
    }

    /// Undoes a local budget write: if the cached entry still holds `written`,
    /// it goes back to `previous`, or away when there was none. An entry that
    /// has moved on since is left alone.
    pub fn budget_reverted(&mut self, written: &Budget, previous: Option<Budget>) {
        let Some(list) = budget_period(written).and_then(|p| self.budgets.get_mut(&p)) else {
            return;
        };
        let Some(index) = list.iter().position(|b| b == written) else {
            return;
        };
        match previous {
            Some(previous) => list[index] = previous,
            None => {
                list.remove(index);
            }
        }
    }

    /// Puts back a removed budget unless its slot has been refilled.
    pub fn budget_restored(&mut self, budget: Budget) {
        let Some(list) = budget_period(&budget).and_then(|p| self.budgets.get_mut(&p)) else {
            return;
        };
        if list
            .iter()
            .any(|b| b.id == budget.id || b.category == budget.category)
        {
            return;
        }
        list.push(budget);
        sort_budgets(list);
    }

    /// Period of a cached budget.
    pub fn find_budget_period(&self, budget_id: &str) -> Option<Period> {
        self.budgets
            .iter()
            .find(|(_, list)| list.iter().any(|b| b.id == budget_id))
            .map(|(period, _)| *period)
    }

    // Expense patches

    /// Counts a new expense on the cached page and places it in listing order
    /// when it passes the page's filters and falls on it. Drops every comparison.
    pub fn expense_added(&mut self, expense: Expense) {
        self.comparisons.clear();
        if let Some(cached) = self.expense_page.as_mut() {
            cached.insert(expense);
        }
    }

    /// Replaces a cached expense with its new state, or drops it from the page
    /// when it no longer passes the filters. Drops every comparison.
    pub fn expense_saved(&mut self, expense: Expense) {
        self.comparisons.clear();
        let Some(cached) = self.expense_page.as_mut() else {
            return;
        };
        let Some(index) = cached.position(&expense.id) else {
            return;
        };
        if cached.view.query.matches(&expense) {
            cached.page.expenses[index] = expense;
        } else {
            cached.remove(&expense.id);
        }
    }

    /// Swaps a provisional entry for the stored record.
    pub fn expense_replaced(&mut self, provisional_id: &str, expense: Expense) {
        self.comparisons.clear();
        let Some(cached) = self.expense_page.as_mut() else {
            return;
        };
        if let Some(index) = cached.position(provisional_id) {
            cached.page.expenses[index] = expense;
        }
    }

    /// Undoes a local add: uncounts the provisional record and takes it off
    /// the page.
    pub fn expense_add_reverted(&mut self, provisional: &Expense) {
        let Some(cached) = self.expense_page.as_mut() else {
            return;
        };
        if cached.remove(&provisional.id).is_none() && cached.view.query.matches(provisional) {
            let total = cached.page.pagination.total_expenses - 1;
            cached.recount(total);
        }
    }

    /// Undoes a local update or delete of `previous`. `written` is the local
    /// state the write left behind, `None` for a delete. An entry that has
    /// moved on since is left alone.
    pub fn expense_reverted(&mut self, written: Option<&Expense>, previous: Expense) {
        let Some(cached) = self.expense_page.as_mut() else {
            return;
        };
        match cached.position(&previous.id) {
            Some(index) => {
                if written.is_some_and(|w| cached.page.expenses[index] == *w) {
                    cached.page.expenses[index] = previous;
                }
            }
            None => {
                if written.map_or(true, |w| !cached.view.query.matches(w)) {
                    cached.insert(previous);
                }
            }
        }
    }

    pub fn expense_removed(&mut self, expense_id: &str) {
        self.comparisons.clear();
        if let Some(cached) = self.expense_page.as_mut() {
            cached.remove(expense_id);
        }
    }

    pub fn cached_expense(&self, expense_id: &str) -> Option<&Expense> {
        self.expenses().iter().find(|e| e.id == expense_id)
    }

    // Derived views

    pub fn budget_summary(&self, period: Period) -> Option<&ComparisonSummary> {
        self.comparison(period).map(|c| &c.summary)
    }

    pub fn over_budget_categories(&self, period: Period) -> Vec<&CategoryComparison> {
        self.comparison(period)
            .map(|c| c.categories.iter().filter(|c| c.is_over_budget).collect())
            .unwrap_or_default()
    }

    /// Overall percentage used for the period, 0 when no comparison is cached.
    pub fn utilization(&self, period: Period) -> Decimal {
        self.budget_summary(period)
            .map(|s| s.overall_percentage_used)
            .unwrap_or_default()
    }

    pub fn total_budget(&self, period: Period) -> Decimal {
        self.budgets(period)
            .map(|list| list.iter().map(|b| b.amount).sum())
            .unwrap_or_default()
    }

    pub fn expenses_by_category(&self) -> BTreeMap<Category, Vec<&Expense>> {
        let mut grouped: BTreeMap<Category, Vec<&Expense>> = BTreeMap::new();
        for expense in self.expenses() {
            grouped.entry(expense.category).or_default().push(expense);
        }
        grouped
    }

    /// Sum over the cached page only.
    pub fn total_expenses(&self) -> Decimal {
        self.expenses().iter().map(|e| e.amount).sum()
    }

    pub fn expenses_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<&Expense> {
        self.expenses()
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect()
    }

    /// Forgets everything, e.g. on logout.
    pub fn clear(&mut self) {
        self.budgets.clear();
        self.comparisons.clear();
        self.expense_page = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetwise_core::comparison::build_comparison;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn budget(id: &str, category: Category, amount: Decimal) -> Budget {
        Budget {
            id: id.to_string(),
            user_id: "u1".to_string(),
            category,
            amount,
            month: 3,
            year: 2024,
            created_at: ts(1),
            updated_at: ts(1),
        }
    }

    fn expense(id: &str, category: Category, amount: Decimal, day: u32) -> Expense {
        Expense {
            id: id.to_string(),
            user_id: "u1".to_string(),
            category,
            amount,
            description: None,
            date: ts(day),
            created_at: ts(day),
            updated_at: ts(day),
        }
    }

    fn march() -> Period {
        Period::new(3, 2024).unwrap()
    }

    fn ids(cache: &ClientCache) -> Vec<&str> {
        cache.expenses().iter().map(|e| e.id.as_str()).collect()
    }

    fn total(cache: &ClientCache) -> i64 {
        cache.expense_page().unwrap().pagination.total_expenses
    }

    fn page_of(expenses: Vec<Expense>, view: ExpenseView, total: i64) -> ClientCache {
        let mut cache = ClientCache::new();
        cache.store_expense_page(
            ExpensePage {
                pagination: Pagination::new(view.request, total),
                expenses,
            },
            view,
        );
        cache
    }

    fn seeded() -> ClientCache {
        let budgets = vec![
            budget("b-travel", Category::Travel, dec!(200)),
            budget("b-food", Category::Food, dec!(500)),
        ];
        let expenses = vec![
            expense("e3", Category::Travel, dec!(250), 25),
            expense("e2", Category::Food, dec!(100), 18),
            expense("e1", Category::Food, dec!(150), 2),
        ];
        let mut cache = page_of(expenses.clone(), ExpenseView::default(), 3);
        cache.store_comparison(build_comparison(march(), &budgets, &expenses));
        cache.store_budgets(march(), budgets);
        cache
    }

    #[test]
    fn test_store_budgets_sorts_by_category() {
        let cache = seeded();
        let categories: Vec<Category> = cache
            .budgets(march())
            .unwrap()
            .iter()
            .map(|b| b.category)
            .collect();
        assert_eq!(categories, vec![Category::Food, Category::Travel]);
    }

    #[test]
    fn test_derived_views() {
        let cache = seeded();
        let over = cache.over_budget_categories(march());
        assert_eq!(over.len(), 1);
        assert_eq!(over[0].category, Category::Travel);
        assert_eq!(cache.utilization(march()), dec!(71.43));
        assert_eq!(cache.total_budget(march()), dec!(700));
        assert_eq!(cache.total_expenses(), dec!(500));

        let grouped = cache.expenses_by_category();
        assert_eq!(grouped[&Category::Food].len(), 2);
        assert_eq!(grouped[&Category::Travel].len(), 1);

        assert_eq!(cache.expenses_in_range(ts(1), ts(20)).len(), 2);

        let april = Period::new(4, 2024).unwrap();
        assert_eq!(cache.utilization(april), Decimal::ZERO);
        assert!(cache.over_budget_categories(april).is_empty());
    }

    #[test]
    fn test_budget_write_patches_list_and_drops_period_comparison() {
        let mut cache = seeded();
        let february = Period::new(2, 2024).unwrap();
        cache.store_comparison(build_comparison(february, &[], &[]));

        cache.budget_saved(budget("b-food", Category::Food, dec!(650)));
        assert!(cache.comparison(march()).is_none());
        assert!(cache.comparison(february).is_some());
        assert_eq!(cache.budgets(march()).unwrap()[0].amount, dec!(650));

        cache.budget_saved(budget("b-bills", Category::Bills, dec!(90)));
        let categories: Vec<Category> = cache
            .budgets(march())
            .unwrap()
            .iter()
            .map(|b| b.category)
            .collect();
        assert_eq!(
            categories,
            vec![Category::Bills, Category::Food, Category::Travel]
        );
    }

    #[test]
    fn test_budget_removed() {
        let mut cache = seeded();
        assert_eq!(cache.budget_removed("b-travel"), Some(march()));
        assert_eq!(cache.budgets(march()).unwrap().len(), 1);
        assert!(cache.comparison(march()).is_none());
        assert_eq!(cache.budget_removed("missing"), None);
    }

    #[test]
    fn test_budget_revert_only_touches_its_own_write() {
        let mut cache = seeded();
        let previous = budget("b-food", Category::Food, dec!(500));
        let written = budget("b-food", Category::Food, dec!(650));
        cache.budget_saved(written.clone());
        cache.budget_saved(budget("b-travel", Category::Travel, dec!(300)));

        cache.budget_reverted(&written, Some(previous.clone()));
        let amounts: Vec<Decimal> = cache
            .budgets(march())
            .unwrap()
            .iter()
            .map(|b| b.amount)
            .collect();
        assert_eq!(amounts, vec![dec!(500), dec!(300)]);

        // A later write to the same slot wins over the undo.
        cache.budget_saved(written.clone());
        cache.budget_saved(budget("b-food", Category::Food, dec!(700)));
        cache.budget_reverted(&written, Some(previous));
        assert_eq!(cache.budgets(march()).unwrap()[0].amount, dec!(700));

        let provisional = budget("provisional-1", Category::Bills, dec!(90));
        cache.budget_saved(provisional.clone());
        cache.budget_reverted(&provisional, None);
        assert_eq!(cache.budgets(march()).unwrap().len(), 2);

        let removed = budget("b-travel", Category::Travel, dec!(300));
        cache.budget_removed("b-travel");
        cache.budget_restored(removed.clone());
        cache.budget_restored(removed);
        assert_eq!(cache.budgets(march()).unwrap().len(), 2);
    }

    #[test]
    fn test_expense_write_drops_every_comparison() {
        let mut cache = seeded();
        let february = Period::new(2, 2024).unwrap();
        cache.store_comparison(build_comparison(february, &[], &[]));

        cache.expense_added(expense("e4", Category::Bills, dec!(30), 28));
        assert!(cache.comparison(march()).is_none());
        assert!(cache.comparison(february).is_none());
        assert_eq!(ids(&cache), vec!["e4", "e3", "e2", "e1"]);
        assert_eq!(total(&cache), 4);

        cache.expense_saved(expense("e4", Category::Bills, dec!(35), 28));
        assert_eq!(cache.expenses().len(), 4);
        assert_eq!(cache.expenses()[0].amount, dec!(35));

        cache.expense_removed("e1");
        assert!(cache.cached_expense("e1").is_none());
        assert_eq!(cache.expenses().len(), 3);
        assert_eq!(total(&cache), 3);
    }

    #[test]
    fn test_added_expense_respects_page_filters() {
        let view = ExpenseView {
            query: ExpenseQuery {
                category: Some(Category::Food),
                start_date: Some(ts(1)),
                end_date: Some(ts(31)),
            },
            request: PageRequest::default(),
        };
        let mut cache = page_of(
            vec![
                expense("e2", Category::Food, dec!(100), 18),
                expense("e1", Category::Food, dec!(150), 2),
            ],
            view,
            2,
        );

        cache.expense_added(expense("bills", Category::Bills, dec!(40), 20));
        let mut april = expense("april", Category::Food, dec!(15), 1);
        april.date = NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        cache.expense_added(april);
        assert_eq!(ids(&cache), vec!["e2", "e1"]);
        assert_eq!(total(&cache), 2);

        cache.expense_added(expense("e5", Category::Food, dec!(12), 10));
        assert_eq!(ids(&cache), vec!["e2", "e5", "e1"]);
        assert_eq!(total(&cache), 3);

        // Recategorised out of the filter: leaves the page and the count.
        cache.expense_saved(expense("e5", Category::Bills, dec!(12), 10));
        assert_eq!(ids(&cache), vec!["e2", "e1"]);
        assert_eq!(total(&cache), 2);
    }

    #[test]
    fn test_added_expense_only_lands_on_its_own_page() {
        let first_page = ExpenseView {
            query: ExpenseQuery::default(),
            request: PageRequest::new(Some(1), Some(2)).unwrap(),
        };
        let mut cache = page_of(
            vec![
                expense("e2", Category::Food, dec!(100), 18),
                expense("e1", Category::Food, dec!(150), 10),
            ],
            first_page,
            5,
        );

        cache.expense_added(expense("old", Category::Food, dec!(5), 3));
        assert_eq!(ids(&cache), vec!["e2", "e1"]);
        assert_eq!(total(&cache), 6);

        cache.expense_added(expense("new", Category::Food, dec!(5), 25));
        assert_eq!(ids(&cache), vec!["new", "e2"]);
        let pagination = &cache.expense_page().unwrap().pagination;
        assert_eq!(pagination.total_expenses, 7);
        assert_eq!(pagination.total_pages, 4);
        assert!(pagination.has_next_page);

        let second_page = ExpenseView {
            query: ExpenseQuery::default(),
            request: PageRequest::new(Some(2), Some(2)).unwrap(),
        };
        let mut cache = page_of(
            vec![expense("e1", Category::Food, dec!(150), 10)],
            second_page,
            3,
        );
        cache.expense_added(expense("new", Category::Food, dec!(5), 25));
        assert_eq!(ids(&cache), vec!["e1"]);
        assert_eq!(total(&cache), 4);
    }

    #[test]
    fn test_expense_reverts_only_touch_their_own_entry() {
        let mut cache = seeded();

        let first = expense("provisional-a", Category::Food, dec!(20), 28);
        let second = expense("provisional-b", Category::Food, dec!(30), 27);
        cache.expense_added(first.clone());
        cache.expense_added(second.clone());
        cache.expense_replaced(&second.id, expense("e9", Category::Food, dec!(30), 27));
        assert_eq!(total(&cache), 5);

        cache.expense_add_reverted(&first);
        assert_eq!(ids(&cache), vec!["e9", "e3", "e2", "e1"]);
        assert_eq!(total(&cache), 4);

        let previous = cache.cached_expense("e2").unwrap().clone();
        let written = Expense {
            amount: dec!(175),
            ..previous.clone()
        };
        cache.expense_saved(written.clone());
        cache.expense_reverted(Some(&written), previous.clone());
        assert_eq!(cache.cached_expense("e2").unwrap().amount, dec!(100));

        // A newer state of the same record is kept.
        cache.expense_saved(written.clone());
        cache.expense_saved(Expense {
            amount: dec!(180),
            ..previous.clone()
        });
        cache.expense_reverted(Some(&written), previous);
        assert_eq!(cache.cached_expense("e2").unwrap().amount, dec!(180));

        let removed = cache.cached_expense("e1").unwrap().clone();
        cache.expense_removed("e1");
        assert_eq!(total(&cache), 3);
        cache.expense_reverted(None, removed);
        assert_eq!(ids(&cache), vec!["e9", "e3", "e2", "e1"]);
        assert_eq!(total(&cache), 4);
    }

    #[test]
    fn test_view_from_params() {
        let view = ExpenseView::from_params(&ExpenseListParams {
            category: Some("Food".to_string()),
            start_date: Some("2024-03-01".to_string()),
            end_date: Some(" ".to_string()),
            page: Some(2),
            limit: Some(5),
        })
        .unwrap();
        assert_eq!(view.query.category, Some(Category::Food));
        assert_eq!(
            view.query.start_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(view.query.end_date, None);
        assert_eq!(view.request, PageRequest::new(Some(2), Some(5)).unwrap());

        assert!(ExpenseView::from_params(&ExpenseListParams {
            category: Some("Groceries".to_string()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn test_clear() {
        let mut cache = seeded();
        cache.clear();
        assert!(cache.budgets(march()).is_none());
        assert!(cache.comparison(march()).is_none());
        assert!(cache.expense_page().is_none());
        assert_eq!(cache.total_expenses(), Decimal::ZERO);
    }
}
