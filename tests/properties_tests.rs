// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use homeledger::db::LocalStore;
use homeledger::error::LedgerError;
use homeledger::models::{NewProperty, Property, PropertyPatch, default_property};
use homeledger::store::FinanceStore;
use uuid::Uuid;

fn defaults(store: &LocalStore) -> Vec<String> {
    store
        .list_properties()
        .unwrap()
        .into_iter()
        .filter(|p| p.is_default)
        .map(|p| p.name)
        .collect()
}

#[test]
fn first_property_becomes_default() {
    let store = LocalStore::open_in_memory().unwrap();
    let home = store.create_property(&NewProperty::named("Home")).unwrap();
    assert!(home.is_default);
    let cabin = store.create_property(&NewProperty::named("Cabin")).unwrap();
    assert!(!cabin.is_default);
    assert_eq!(defaults(&store), vec!["Home"]);
}

#[test]
fn setting_default_clears_others() {
    let store = LocalStore::open_in_memory().unwrap();
    store.create_property(&NewProperty::named("Home")).unwrap();
    let cabin = store
        .create_property(&NewProperty {
            is_default: true,
            ..NewProperty::named("Cabin")
        })
        .unwrap();
    assert!(cabin.is_default);
    assert_eq!(defaults(&store), vec!["Cabin"]);
}

#[test]
fn unsetting_default_moves_it() {
    let store = LocalStore::open_in_memory().unwrap();
    let home = store.create_property(&NewProperty::named("Home")).unwrap();
    store.create_property(&NewProperty::named("Cabin")).unwrap();
    let home = store
        .update_property(
            home.id,
            &PropertyPatch {
                is_default: Some(false),
                ..PropertyPatch::default()
            },
        )
        .unwrap();
    assert!(!home.is_default);
    assert_eq!(defaults(&store), vec!["Cabin"]);
}

#[test]
fn only_property_cannot_lose_default_or_be_deleted() {
    let store = LocalStore::open_in_memory().unwrap();
    let home = store.create_property(&NewProperty::named("Home")).unwrap();
    let err = store
        .update_property(
            home.id,
            &PropertyPatch {
                is_default: Some(false),
                ..PropertyPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    let err = store.delete_property(home.id).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(store.get_property(home.id).unwrap().is_default);
}

#[test]
fn deleting_default_reassigns_it() {
    let store = LocalStore::open_in_memory().unwrap();
    let home = store.create_property(&NewProperty::named("Home")).unwrap();
    store.create_property(&NewProperty::named("Cabin")).unwrap();
    store.create_property(&NewProperty::named("Flat")).unwrap();
    store.delete_property(home.id).unwrap();
    assert_eq!(defaults(&store), vec!["Cabin"]);
    assert_eq!(store.list_properties().unwrap().len(), 2);
}

#[test]
fn names_are_required_and_unique() {
    let store = LocalStore::open_in_memory().unwrap();
    store.create_property(&NewProperty::named("Home")).unwrap();
    assert!(matches!(
        store.create_property(&NewProperty::named("  ")).unwrap_err(),
        LedgerError::Validation(_)
    ));
    assert!(matches!(
        store.create_property(&NewProperty::named("HOME")).unwrap_err(),
        LedgerError::Validation(_)
    ));
}

#[test]
fn selection_default_falls_back_to_first() {
    let props = vec![
        Property {
            id: Uuid::new_v4(),
            name: "A".into(),
            is_active: true,
            is_default: false,
        },
        Property {
            id: Uuid::new_v4(),
            name: "B".into(),
            is_active: true,
            is_default: false,
        },
    ];
    assert_eq!(default_property(&props).unwrap().name, "A");
    let mut flagged = props.clone();
    flagged[1].is_default = true;
    assert_eq!(default_property(&flagged).unwrap().name, "B");
    assert!(default_property(&[]).is_none());
}
