// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use homeledger::db::LocalStore;
use homeledger::error::LedgerError;
use homeledger::models::{DEFAULT_NOTE_DOMAIN, NotePatch, NoteUpsert};
use homeledger::store::FinanceStore;
use homeledger::{cli, commands::notes};
use rusqlite::{Connection, params};
use tempfile::TempDir;
use uuid::Uuid;

fn upsert(year: i32, month: u32, domain: &str, text: &str) -> NoteUpsert {
    NoteUpsert {
        domain: domain.into(),
        year,
        month: Some(month),
        notes: text.into(),
    }
}

#[test]
fn missing_note_is_none_not_error() {
    let store = LocalStore::open_in_memory().unwrap();
    assert_eq!(store.monthly_note(2024, 5, "finance").unwrap(), None);
}

#[test]
fn upsert_keeps_one_note_per_period() {
    let store = LocalStore::open_in_memory().unwrap();
    let first = store
        .upsert_monthly_note(&upsert(2024, 5, "finance", "car service"))
        .unwrap();
    let second = store
        .upsert_monthly_note(&upsert(2024, 5, "finance", "car service, new tyres"))
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(store.list_monthly_notes("finance").unwrap().len(), 1);
    assert_eq!(
        store.monthly_note(2024, 5, "finance").unwrap().unwrap().notes,
        "car service, new tyres"
    );

    // Other domains are separate.
    store
        .upsert_monthly_note(&upsert(2024, 5, "garden", "plant tomatoes"))
        .unwrap();
    assert_eq!(store.list_monthly_notes("finance").unwrap().len(), 1);
    assert_eq!(store.list_monthly_notes("garden").unwrap().len(), 1);
}

#[test]
fn month_out_of_range_is_rejected() {
    let store = LocalStore::open_in_memory().unwrap();
    for month in [0, 13] {
        let err = store
            .upsert_monthly_note(&upsert(2024, month, "finance", "x"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}

#[test]
fn list_is_newest_first_and_edit_delete_work() {
    let store = LocalStore::open_in_memory().unwrap();
    for (y, m) in [(2023, 12), (2024, 2), (2024, 1)] {
        store
            .upsert_monthly_note(&upsert(y, m, "finance", "n"))
            .unwrap();
    }
    let periods: Vec<(i32, Option<u32>)> = store
        .list_monthly_notes("finance")
        .unwrap()
        .iter()
        .map(|n| (n.year, n.month))
        .collect();
    assert_eq!(periods, vec![(2024, Some(2)), (2024, Some(1)), (2023, Some(12))]);

    let note = store.monthly_note(2024, 1, "finance").unwrap().unwrap();
    let edited = store
        .update_monthly_note(
            note.id,
            &NotePatch {
                notes: Some("rewritten".into()),
            },
        )
        .unwrap();
    assert_eq!(edited.notes, "rewritten");

    store.delete_monthly_note(note.id).unwrap();
    assert_eq!(store.monthly_note(2024, 1, "finance").unwrap(), None);
    assert!(store.delete_monthly_note(note.id).unwrap_err().is_not_found());
}

#[test]
fn domain_defaults_to_finance_on_the_wire() {
    let note: NoteUpsert = serde_json::from_str(r#"{"year":2024,"month":5,"notes":"x"}"#).unwrap();
    assert_eq!(note.domain, DEFAULT_NOTE_DOMAIN);
}

fn yearly(year: i32, text: &str) -> NoteUpsert {
    NoteUpsert {
        domain: "finance".into(),
        year,
        month: None,
        notes: text.into(),
    }
}

#[test]
fn yearly_note_lives_beside_monthly_notes() {
    let store = LocalStore::open_in_memory().unwrap();
    let first = store.upsert_monthly_note(&yearly(2024, "pay off car")).unwrap();
    let again = store
        .upsert_monthly_note(&yearly(2024, "pay off car, start ISA"))
        .unwrap();
    assert_eq!(first.id, again.id);
    assert_eq!(again.period(), "2024");

    store
        .upsert_monthly_note(&upsert(2024, 3, "finance", "tax return"))
        .unwrap();
    store
        .upsert_monthly_note(&upsert(2023, 12, "finance", "gifts"))
        .unwrap();

    let yearly_note = store.yearly_note(2024, "finance").unwrap().unwrap();
    assert_eq!(yearly_note.notes, "pay off car, start ISA");
    assert_eq!(yearly_note.month, None);
    assert_eq!(store.monthly_note(2024, 3, "finance").unwrap().unwrap().notes, "tax return");
    assert_eq!(store.yearly_note(2023, "finance").unwrap(), None);
    assert_eq!(store.yearly_note(2024, "garden").unwrap(), None);

    let periods: Vec<String> = store
        .list_monthly_notes("finance")
        .unwrap()
        .iter()
        .map(|n| n.period())
        .collect();
    assert_eq!(periods, vec!["2024", "2024-03", "2023-12"]);
}

#[test]
fn cli_sets_and_shows_yearly_notes() {
    let store = LocalStore::open_in_memory().unwrap();
    let run = |args: &[&str]| {
        let mut argv = vec!["homeledger", "note"];
        argv.extend_from_slice(args);
        cli::build_cli().get_matches_from(argv)
    };

    let m = run(&["set", "--year", "2025", "--text", "new roof"]);
    let (_, note_m) = m.subcommand().unwrap();
    let (_, set_m) = note_m.subcommand().unwrap();
    let saved = notes::set(&store, "finance", set_m).unwrap();
    assert_eq!(saved.month, None);

    let m = run(&["show", "--year", "2025"]);
    let (_, note_m) = m.subcommand().unwrap();
    let (_, show_m) = note_m.subcommand().unwrap();
    let shown = notes::show(&store, "finance", show_m).unwrap().unwrap();
    assert_eq!(shown.notes, "new roof");

    let m = run(&["show", "--month", "2025-01"]);
    let (_, note_m) = m.subcommand().unwrap();
    let (_, show_m) = note_m.subcommand().unwrap();
    assert!(notes::show(&store, "finance", show_m).unwrap().is_none());

    for bad in [
        vec!["homeledger", "note", "show"],
        vec!["homeledger", "note", "show", "--year", "2025", "--month", "2025-01"],
    ] {
        assert!(cli::build_cli().try_get_matches_from(bad).is_err());
    }
}

#[test]
fn monthly_notes_table_is_migrated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.sqlite");
    let id = Uuid::new_v4();
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE monthly_notes(
                id BLOB PRIMARY KEY,
                domain TEXT NOT NULL,
                year INTEGER NOT NULL,
                month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
                notes TEXT NOT NULL,
                UNIQUE(domain, year, month)
            );",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO monthly_notes(id, domain, year, month, notes) VALUES (?1,'finance',2023,7,'boiler')",
            params![id],
        )
        .unwrap();
    }

    let store = LocalStore::open(&path).unwrap();
    let note = store.monthly_note(2023, 7, "finance").unwrap().unwrap();
    assert_eq!(note.id, id);
    assert_eq!(note.notes, "boiler");
    drop(store);

    // Opening again finds nothing left to move.
    let store = LocalStore::open(&path).unwrap();
    assert_eq!(store.list_monthly_notes("finance").unwrap().len(), 1);
}
