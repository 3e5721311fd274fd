// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::app::{NoticeLevel, Notices, ViewTracker};
use homeledger::commands::dashboard::{DashboardQuery, load};
use homeledger::db::LocalStore;
use homeledger::error::{LedgerError, LedgerResult};
use homeledger::models::*;
use homeledger::store::FinanceStore;
use homeledger::cli;
use homeledger::summary::{self, MAX_TREND_MONTHS, UNKNOWN_CATEGORY};
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn category(name: &str, kind: CategoryType) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.into(),
        r#type: kind,
        color: None,
    }
}

fn tx(category_id: Uuid, day: NaiveDate, amount: i64) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        property_id: Uuid::new_v4(),
        date: day,
        amount: Decimal::new(amount, 2),
        category_id,
        expense_id: None,
        description: None,
        tags: None,
        payment_method: None,
        notes: None,
    }
}

#[test]
fn summary_net_and_totals() {
    let salary = category("Salary", CategoryType::Income);
    let rent = category("Rent", CategoryType::Expense);
    let food = category("Food", CategoryType::Expense);
    let cats = vec![salary.clone(), rent.clone(), food.clone()];
    let orphan = Uuid::new_v4();
    let txs = vec![
        tx(salary.id, date(2024, 3, 1), 300000),
        tx(rent.id, date(2024, 3, 2), 120000),
        tx(food.id, date(2024, 3, 5), 4550),
        tx(food.id, date(2024, 3, 9), 2000),
        tx(orphan, date(2024, 3, 10), 1000),
    ];

    let s = summary::summarize(&txs, &cats);
    assert_eq!(s.income, Decimal::new(300000, 2));
    assert_eq!(s.expense, Decimal::new(127550, 2));
    assert_eq!(s.net, s.income - s.expense);
    let abs_total: Decimal = txs.iter().map(|t| t.amount.abs()).sum();
    assert_eq!(s.income + s.expense, abs_total);

    let by_cat = summary::expense_by_category(&txs, &cats);
    let names: Vec<&str> = by_cat.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, vec!["Rent", "Food", UNKNOWN_CATEGORY]);
    assert_eq!(by_cat[1].amount, Decimal::new(6550, 2));

    let recent = summary::recent(&txs, 2);
    assert_eq!(recent[0].date, date(2024, 3, 10));
    assert_eq!(recent[1].date, date(2024, 3, 9));
}

#[test]
fn empty_set_summarizes_to_zero() {
    let s = summary::summarize(&[], &[]);
    assert_eq!(s.income, Decimal::ZERO);
    assert_eq!(s.net, Decimal::ZERO);
}

#[test]
fn trend_fills_missing_months() {
    let salary = category("Salary", CategoryType::Income);
    let rent = category("Rent", CategoryType::Expense);
    let cats = vec![salary.clone(), rent.clone()];
    let txs = vec![
        tx(salary.id, date(2023, 12, 28), 1000),
        tx(rent.id, date(2024, 2, 1), 500),
        tx(rent.id, date(2023, 9, 1), 999),
    ];
    let trend = summary::monthly_trend(&txs, &cats, date(2024, 2, 1), 3);
    let months: Vec<&str> = trend.iter().map(|t| t.month.as_str()).collect();
    assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
    assert_eq!(trend[0].income, Decimal::new(1000, 2));
    assert_eq!(trend[1].income, Decimal::ZERO);
    assert_eq!(trend[2].expense, Decimal::new(500, 2));
}

fn seeded_store() -> LocalStore {
    let store = LocalStore::open_in_memory().unwrap();
    let home = store.create_property(&NewProperty::named("Home")).unwrap();
    let salary = store
        .create_category(&NewCategory {
            name: "Salary".into(),
            r#type: CategoryType::Income,
            color: None,
        })
        .unwrap();
    let bills = store
        .create_category(&NewCategory {
            name: "Bills".into(),
            r#type: CategoryType::Expense,
            color: None,
        })
        .unwrap();
    for (cat, day, amount) in [
        (salary.id, date(2024, 5, 1), "2500"),
        (bills.id, date(2024, 5, 3), "80"),
        (bills.id, date(2024, 4, 3), "75"),
    ] {
        store
            .create_transaction(&NewTransaction {
                property_id: home.id,
                date: day,
                amount: amount.parse().unwrap(),
                category_id: cat,
                expense_id: None,
                description: None,
                tags: None,
                payment_method: None,
                notes: None,
            })
            .unwrap();
    }
    for (name, day) in [("Internet", 20), ("Gym", 2), ("Phone", 25)] {
        store
            .create_expense(&NewExpense {
                name: name.into(),
                amount: Some(Decimal::new(30, 0)),
                category_id: bills.id,
                day_of_month: day,
                expense_type: ExpenseType::Ongoing,
                start_date: date(2024, 1, 1),
                total_payments: None,
                notes: None,
            })
            .unwrap();
    }
    store
        .upsert_monthly_note(&NoteUpsert {
            domain: "finance".into(),
            year: 2024,
            month: Some(5),
            notes: "insurance renewal".into(),
        })
        .unwrap();
    store
}

fn query() -> DashboardQuery {
    DashboardQuery {
        year: 2024,
        month: 5,
        months: 2,
        today: date(2024, 5, 10),
        domain: "finance".into(),
    }
}

#[test]
fn dashboard_loads_every_section() {
    let store = seeded_store();
    let mut notices = Notices::default();
    let views = ViewTracker::default();
    let data = load(&store, &mut notices, &views.begin(), &query())
        .unwrap()
        .unwrap();

    assert_eq!(data.month, "2024-05");
    assert_eq!(data.summary.income, Decimal::new(2500, 0));
    assert_eq!(data.summary.expense, Decimal::new(80, 0));
    assert_eq!(data.summary.net, Decimal::new(2420, 0));
    assert_eq!(data.trend.len(), 2);
    assert_eq!(data.trend[0].expense, Decimal::new(75, 0));
    assert_eq!(data.recent.len(), 2);
    let upcoming: Vec<&str> = data.upcoming.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(upcoming, vec!["Internet", "Phone"]);
    assert_eq!(data.note.unwrap().notes, "insurance renewal");
    assert!(notices.items().is_empty());
}

#[test]
fn torn_down_view_drops_result() {
    let store = seeded_store();
    let mut notices = Notices::default();
    let views = ViewTracker::default();
    let token = views.begin();
    views.teardown();
    assert!(!token.is_current());
    assert!(load(&store, &mut notices, &token, &query()).unwrap().is_none());

    // A fresh token after teardown is live again.
    assert!(views.begin().is_current());
}

/// Delegates to a local store but cannot list categories.
struct NoCategories(LocalStore);

impl FinanceStore for NoCategories {
    fn list_categories(&self) -> LedgerResult<Vec<Category>> {
        Err(LedgerError::RequestFailed {
            status: Some(503),
            message: "maintenance".into(),
        })
    }
    fn get_category(&self, id: Uuid) -> LedgerResult<Category> {
        self.0.get_category(id)
    }
    fn create_category(&self, new: &NewCategory) -> LedgerResult<Category> {
        self.0.create_category(new)
    }
    fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> LedgerResult<Category> {
        self.0.update_category(id, patch)
    }
    fn delete_category(&self, id: Uuid) -> LedgerResult<()> {
        self.0.delete_category(id)
    }
    fn list_expenses(&self, is_active: Option<bool>) -> LedgerResult<Vec<ExpenseDefinition>> {
        self.0.list_expenses(is_active)
    }
    fn get_expense(&self, id: Uuid) -> LedgerResult<ExpenseDefinition> {
        self.0.get_expense(id)
    }
    fn create_expense(&self, new: &NewExpense) -> LedgerResult<ExpenseDefinition> {
        self.0.create_expense(new)
    }
    fn update_expense(&self, id: Uuid, patch: &ExpensePatch) -> LedgerResult<ExpenseDefinition> {
        self.0.update_expense(id, patch)
    }
    fn delete_expense(&self, id: Uuid) -> LedgerResult<()> {
        self.0.delete_expense(id)
    }
    fn generate_transaction(
        &self,
        id: Uuid,
        request: &GenerateRequest,
    ) -> LedgerResult<Generated> {
        self.0.generate_transaction(id, request)
    }
    fn list_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        self.0.list_transactions(filter)
    }
    fn get_transaction(&self, id: Uuid) -> LedgerResult<Transaction> {
        self.0.get_transaction(id)
    }
    fn create_transaction(&self, new: &NewTransaction) -> LedgerResult<Transaction> {
        self.0.create_transaction(new)
    }
    fn delete_transaction(&self, id: Uuid) -> LedgerResult<()> {
        self.0.delete_transaction(id)
    }
    fn list_properties(&self) -> LedgerResult<Vec<Property>> {
        self.0.list_properties()
    }
    fn get_property(&self, id: Uuid) -> LedgerResult<Property> {
        self.0.get_property(id)
    }
    fn create_property(&self, new: &NewProperty) -> LedgerResult<Property> {
        self.0.create_property(new)
    }
    fn update_property(&self, id: Uuid, patch: &PropertyPatch) -> LedgerResult<Property> {
        self.0.update_property(id, patch)
    }
    fn delete_property(&self, id: Uuid) -> LedgerResult<()> {
        self.0.delete_property(id)
    }
    fn list_monthly_notes(&self, domain: &str) -> LedgerResult<Vec<MonthlyNote>> {
        self.0.list_monthly_notes(domain)
    }
    fn monthly_note(
        &self,
        year: i32,
        month: u32,
        domain: &str,
    ) -> LedgerResult<Option<MonthlyNote>> {
        self.0.monthly_note(year, month, domain)
    }
    fn yearly_note(&self, year: i32, domain: &str) -> LedgerResult<Option<MonthlyNote>> {
        self.0.yearly_note(year, domain)
    }
    fn upsert_monthly_note(&self, note: &NoteUpsert) -> LedgerResult<MonthlyNote> {
        self.0.upsert_monthly_note(note)
    }
    fn update_monthly_note(&self, id: Uuid, patch: &NotePatch) -> LedgerResult<MonthlyNote> {
        self.0.update_monthly_note(id, patch)
    }
    fn delete_monthly_note(&self, id: Uuid) -> LedgerResult<()> {
        self.0.delete_monthly_note(id)
    }
}

#[test]
fn failing_section_degrades_to_empty() {
    let store = NoCategories(seeded_store());
    let mut notices = Notices::default();
    let views = ViewTracker::default();
    let data = load(&store, &mut notices, &views.begin(), &query())
        .unwrap()
        .unwrap();

    // Without categories every transaction counts as an expense.
    assert_eq!(data.summary.income, Decimal::ZERO);
    assert_eq!(data.summary.expense, Decimal::new(2580, 0));
    assert_eq!(data.expense_by_category.len(), 1);
    assert_eq!(data.expense_by_category[0].category, UNKNOWN_CATEGORY);
    // The other sections are unaffected.
    assert_eq!(data.upcoming.len(), 2);
    assert!(data.note.is_some());

    assert_eq!(notices.items().len(), 1);
    assert_eq!(notices.items()[0].level, NoticeLevel::Warning);
    assert!(notices.items()[0].message.contains("categories"));
}

#[test]
fn trend_window_is_capped() {
    let trend = summary::monthly_trend(&[], &[], date(2024, 5, 1), u32::MAX);
    assert_eq!(trend.len(), MAX_TREND_MONTHS as usize);
    assert_eq!(trend.last().unwrap().month, "2024-05");

    let months = |n: &str| {
        cli::build_cli()
            .try_get_matches_from(["homeledger", "dashboard", "--months", n])
            .map(|m| {
                let (_, sub) = m.subcommand().unwrap();
                *sub.get_one::<u32>("months").unwrap()
            })
    };
    assert_eq!(months("120").unwrap(), 120);
    assert!(months("0").is_err());
    assert!(months("121").is_err());
    assert!(months("4294967295").is_err());
}
