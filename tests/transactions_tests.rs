// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::db::LocalStore;
use homeledger::error::LedgerError;
use homeledger::models::{CategoryType, NewCategory, NewProperty, NewTransaction, Transaction};
use homeledger::store::FinanceStore;
use homeledger::{cli, commands::transactions};
use rust_decimal::Decimal;
use uuid::Uuid;

struct Fixture {
    store: LocalStore,
    groceries: Uuid,
    home: Uuid,
}

fn setup() -> Fixture {
    let store = LocalStore::open_in_memory().unwrap();
    let groceries = store
        .create_category(&NewCategory {
            name: "Groceries".into(),
            r#type: CategoryType::Expense,
            color: None,
        })
        .unwrap()
        .id;
    let home = store.create_property(&NewProperty::named("Home")).unwrap().id;
    for i in 1..=3 {
        store
            .create_transaction(&new_tx(
                home,
                groceries,
                NaiveDate::from_ymd_opt(2025, 1, i).unwrap(),
                "10",
            ))
            .unwrap();
    }
    Fixture {
        store,
        groceries,
        home,
    }
}

fn new_tx(property_id: Uuid, category_id: Uuid, date: NaiveDate, amount: &str) -> NewTransaction {
    NewTransaction {
        property_id,
        date,
        amount: amount.parse().unwrap(),
        category_id,
        expense_id: None,
        description: Some("Market".into()),
        tags: None,
        payment_method: None,
        notes: None,
    }
}

fn list_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["homeledger", "tx", "list"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return list_m.clone();
        }
    }
    panic!("no tx list subcommand");
}

#[test]
fn list_limit_respected() {
    let f = setup();
    let rows = transactions::query(&f.store, &list_matches(&["--limit", "2"])).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date.to_string(), "2025-01-03");
}

#[test]
fn list_offset_pages_newest_first() {
    let f = setup();
    let rows =
        transactions::query(&f.store, &list_matches(&["--limit", "2", "--offset", "2"])).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date.to_string(), "2025-01-01");
}

#[test]
fn list_month_and_category_filters() {
    let f = setup();
    f.store
        .create_transaction(&new_tx(
            f.home,
            f.groceries,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            "5",
        ))
        .unwrap();
    let jan = transactions::query(&f.store, &list_matches(&["--month", "2025-01"])).unwrap();
    assert_eq!(jan.len(), 3);
    let feb = transactions::query(
        &f.store,
        &list_matches(&["--from", "2025-02-01", "--category", "groceries"]),
    )
    .unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].amount, Decimal::new(5, 0));
}

#[test]
fn amount_must_be_positive() {
    let f = setup();
    for amount in ["0", "-12.50"] {
        let err = f
            .store
            .create_transaction(&new_tx(
                f.home,
                f.groceries,
                NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
                amount,
            ))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}

#[test]
fn references_must_exist() {
    let f = setup();
    let day = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
    let err = f
        .store
        .create_transaction(&new_tx(f.home, Uuid::new_v4(), day, "1"))
        .unwrap_err();
    assert!(err.is_not_found());
    let err = f
        .store
        .create_transaction(&new_tx(Uuid::new_v4(), f.groceries, day, "1"))
        .unwrap_err();
    assert!(err.is_not_found());
    let mut linked = new_tx(f.home, f.groceries, day, "1");
    linked.expense_id = Some(Uuid::new_v4());
    assert!(f.store.create_transaction(&linked).unwrap_err().is_not_found());
}

#[test]
fn tags_round_trip_through_storage() {
    let f = setup();
    let mut new = new_tx(
        f.home,
        f.groceries,
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
        "42.10",
    );
    new.tags = Some(vec!["weekly".into(), "organic".into()]);
    let created = f.store.create_transaction(&new).unwrap();
    let fetched: Transaction = f.store.get_transaction(created.id).unwrap();
    assert_eq!(fetched, created);
    f.store.delete_transaction(created.id).unwrap();
    assert!(f.store.get_transaction(created.id).unwrap_err().is_not_found());
}

#[test]
fn wire_format_accepts_legacy_expense_field() {
    let id = Uuid::new_v4();
    let body = format!(
        r#"{{"id":"{id}","property_id":"{id}","date":"2024-03-15","amount":100.5,
            "category_id":"{id}","recurring_expense_id":"{id}"}}"#
    );
    let tx: Transaction = serde_json::from_str(&body).unwrap();
    assert_eq!(tx.expense_id, Some(id));
    assert_eq!(tx.amount, Decimal::new(1005, 1));
}
